//! ANSI rendering of styled runs for the terminal chat surface.

use questlog_assistant::{Style, StyledRun};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const ITALIC: &str = "\x1b[3m";
pub const UNDERLINE: &str = "\x1b[4m";
pub const CYAN: &str = "\x1b[36m";
pub const YELLOW: &str = "\x1b[33m";
pub const RED: &str = "\x1b[31m";
pub const BG_GRAY: &str = "\x1b[48;5;236m";

/// Map a run sequence to one ANSI string. Every style resets at the run
/// boundary so partial repaints can't bleed styling into the prompt.
pub fn ansi_render(runs: &[StyledRun]) -> String {
    let mut out = String::new();
    for run in runs {
        match run.style {
            Style::Plain => out.push_str(&run.text),
            Style::Bold => out.push_str(&format!("{BOLD}{}{RESET}", run.text)),
            Style::Italic => out.push_str(&format!("{ITALIC}{}{RESET}", run.text)),
            Style::Code => out.push_str(&format!("{BG_GRAY}{YELLOW}{}{RESET}", run.text)),
            Style::Header(1) => out.push_str(&format!("{BOLD}{CYAN}{UNDERLINE}{}{RESET}", run.text)),
            Style::Header(_) => out.push_str(&format!("{BOLD}{CYAN}{}{RESET}", run.text)),
            Style::List => out.push_str(&format!("{CYAN}{}{RESET}", run.text)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlog_assistant::render;

    #[test]
    fn bold_runs_get_ansi_bold() {
        let out = ansi_render(&render("**hi**"));
        assert!(out.contains("\x1b[1m"));
        assert!(out.contains("hi"));
    }

    #[test]
    fn plain_text_is_untouched() {
        let out = ansi_render(&render("just words"));
        assert_eq!(out, "just words\n");
    }

    #[test]
    fn headers_are_cyan() {
        let out = ansi_render(&render("# title"));
        assert!(out.contains(CYAN));
        assert!(out.contains("title"));
    }
}
