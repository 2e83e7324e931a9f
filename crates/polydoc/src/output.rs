//! Colored terminal output utilities.

use console::{Style, Term};
use polydoc_site::BuildReport;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print the counters of a finished build.
    pub(crate) fn report(&self, report: &BuildReport) {
        for line in report_lines(report) {
            self.info(&line);
        }
        if report.fallbacks > 0 {
            self.warning(&format!(
                "{} page(s) are not documented for their language",
                report.fallbacks
            ));
        }
    }
}

/// Summary lines of a build report.
fn report_lines(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![
        format!("Nodes:     {}", report.nodes),
        format!("Documents: {}", report.documents),
        format!("Fallbacks: {}", report.fallbacks),
        format!("Images:    {}", report.images),
    ];
    if report.skipped_folders > 0 {
        lines.push(format!("Skipped:   {} folder(s) without manifest", report.skipped_folders));
    }
    lines
}
