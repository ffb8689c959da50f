//! Presentation layer for empower-chat
//!
//! This crate contains the CLI definition and the terminal UI: the event
//! loop, scroll following, outside-click dismissal of overlays, and the
//! widgets that draw the transcript.

pub mod cli;
pub mod tui;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use tui::{
    TuiApp,
    dismissal::PanelDismissal,
    interaction::{Interaction, InteractionHub, ListenerControl, ListenerGuard},
    scroll_sync::ScrollSync,
};
