//! User interaction seam: confirmation dialogs and alerts.

use tracing::{info, warn};

/// Asks the user to confirm destructive actions and shows failure messages.
pub trait Prompt: Send + Sync {
    /// Returns `true` if the user accepts `message`.
    fn confirm(&self, message: &str) -> bool;

    /// Shows `message` to the user.
    fn alert(&self, message: &str);
}

/// Accepts every confirmation. Alerts go to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Prompt for AutoConfirm {
    fn confirm(&self, message: &str) -> bool {
        info!("auto-confirmed: {message}");
        true
    }

    fn alert(&self, message: &str) {
        warn!("{message}");
    }
}

/// Declines every confirmation. Alerts go to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Prompt for DenyAll {
    fn confirm(&self, message: &str) -> bool {
        info!("declined: {message}");
        false
    }

    fn alert(&self, message: &str) {
        warn!("{message}");
    }
}
