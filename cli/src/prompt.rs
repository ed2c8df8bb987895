//! Confirmations and alerts on the terminal.

use healthcard_sync::Prompt;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Asks on stderr and reads the answer from stdin. Anything but `y`/`yes`
/// declines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "{message} [y/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!("failed to read answer: {e}");
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
