//! Terminal UI for empower-chat
//!
//! A single conversation screen: header, transcript, input line and a
//! status bar, with the feedback prompt drawn as an overlay.

mod app;
pub mod dismissal;
pub mod feedback_overlay;
pub mod interaction;
pub mod keymap;
pub mod scroll_sync;
pub mod state;
pub mod widgets;

pub use app::TuiApp;
