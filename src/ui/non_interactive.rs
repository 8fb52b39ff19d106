//! Non-interactive UI for CI/headless environments.

use crate::error::Result;

use super::theme::ToolsmithTheme;
use super::{OutputMode, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Spinners become single status lines and confirmations take their
/// default answer.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: ToolsmithTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: ToolsmithTheme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn raw(&mut self, text: &str) {
        println!("{}", text);
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        tracing::debug!("Non-interactive: '{}' -> {}", question, default);
        Ok(default)
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(LineSpinner {
            show: self.mode.shows_status(),
            theme: self.theme.clone(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n=== {} ===\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints only the final line.
struct LineSpinner {
    show: bool,
    theme: ToolsmithTheme,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.show {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn finish_warning(&mut self, msg: &str) {
        if self.show {
            println!("{}", self.theme.format_warning(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if self.show {
            println!("{}", self.theme.format_error(msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_returns_default() {
        let mut ui = NonInteractiveUI::new(OutputMode::Normal);
        assert!(ui.confirm("Uninstall?", true).unwrap());
        assert!(!ui.confirm("Uninstall?", false).unwrap());
    }

    #[test]
    fn is_never_interactive() {
        assert!(!NonInteractiveUI::new(OutputMode::Verbose).is_interactive());
    }

    #[test]
    fn spinner_finishes_in_quiet_mode() {
        let mut ui = NonInteractiveUI::new(OutputMode::Quiet);
        let mut spinner = ui.start_spinner("checking");
        spinner.set_message("still checking");
        spinner.finish_success("done");
    }
}
