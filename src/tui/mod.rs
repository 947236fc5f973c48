//! TUI module: Terminal User Interface using Ratatui.
//!
//! Two screens:
//! - Questionnaire with the disorder info panel
//! - Risk assessment result

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
