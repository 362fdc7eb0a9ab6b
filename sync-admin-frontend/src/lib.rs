//! Sync Admin Frontend
//!
//! Leptos admin panel with one button per sync endpoint. The trigger logic in
//! [`trigger`] is browser-independent; [`commands`] and [`panel`] bind it to the page.

pub mod commands;
pub mod config;
pub mod messages;
pub mod panel;
pub mod stats;
pub mod trigger;

// Re-export commonly used items
pub use config::AdminConfig;
pub use panel::{mount, AdminDashboard, SyncCard};
pub use trigger::{run_sync, SyncAction, SyncError, SyncOutcome, SyncTransport, SyncView};
