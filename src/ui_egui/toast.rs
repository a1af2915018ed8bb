//! Toast notifications for commit feedback.
//!
//! Success toasts fade after a few seconds; error toasts stay until the user
//! dismisses them.

use egui::Color32;
use std::time::{Duration, Instant};

/// Types of toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Success message (green)
    Success,
    /// Error message (red)
    Error,
}

impl ToastLevel {
    /// Get the icon for this toast level
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✗",
        }
    }

    /// Get the text/icon color for this toast level
    pub fn text_color(&self) -> Color32 {
        match self {
            ToastLevel::Success => Color32::from_rgb(30, 120, 50),
            ToastLevel::Error => Color32::from_rgb(180, 40, 40),
        }
    }
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
    /// `None` keeps the toast until dismissed
    pub duration: Option<Duration>,
}

impl Toast {
    fn new(id: u64, message: String, level: ToastLevel) -> Self {
        let duration = match level {
            ToastLevel::Success => Some(Duration::from_secs(3)),
            ToastLevel::Error => None,
        };
        Self {
            id,
            message,
            level,
            created_at: Instant::now(),
            duration,
        }
    }

    /// Set custom duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Check if this toast has expired
    pub fn is_expired(&self) -> bool {
        self.duration
            .map_or(false, |duration| self.created_at.elapsed() >= duration)
    }
}

/// Manager for toast notifications
#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, message: String, level: ToastLevel) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast::new(id, message, level));
        id
    }

    /// Add a success toast
    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(message.into(), ToastLevel::Success)
    }

    /// Add an error toast
    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(message.into(), ToastLevel::Error)
    }

    /// Dismiss a toast by id; returns false when it was already gone
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Remove expired toasts
    pub fn cleanup(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Most recent error still shown
    pub fn latest_error(&self) -> Option<&Toast> {
        self.toasts
            .iter()
            .rev()
            .find(|t| t.level == ToastLevel::Error)
    }

    /// Check if there are any active toasts
    pub fn has_toasts(&self) -> bool {
        !self.toasts.is_empty()
    }
}
