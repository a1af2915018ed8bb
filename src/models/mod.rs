// Module exports for models

pub mod event;
pub mod occurrence;
pub mod settings;
pub mod window;
