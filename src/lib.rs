// Coach Calendar Library
// Week-view scheduling core: models, storage, recurrence and the egui-facing
// interaction layer

pub mod models;
pub mod services;
pub mod ui_egui;
pub mod utils;
