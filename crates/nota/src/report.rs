//! Styled terminal reporting for build runs.
//!
//! Everything goes to stderr; `public/` is the only thing the build writes
//! to stdout-adjacent places, so the pipeline stays scriptable.

use std::path::Path;

use console::{Style, Term};
use nota_site::BuildSummary;

/// Formats build progress and results for the terminal.
pub(crate) struct Reporter {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Reporter {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Announce what is about to be built.
    pub(crate) fn preamble(&self, root: &Path, theme: &str) {
        let _ = self.term.write_line(&format!("Site root: {}", root.display()));
        let _ = self.term.write_line(&format!("Theme: {theme}"));
    }

    /// Report a finished build: per-post failures as warnings, then the
    /// counters and the green completion line.
    pub(crate) fn summary(&self, summary: &BuildSummary) {
        for (id, err) in &summary.failures {
            let line = failure_line(id, err);
            let _ = self
                .term
                .write_line(&self.yellow.apply_to(line).to_string());
        }
        for line in counter_lines(summary) {
            let _ = self.term.write_line(&line);
        }
        let _ = self
            .term
            .write_line(&self.green.apply_to(completion_line(summary)).to_string());
    }

    /// Print a fatal error (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}

fn failure_line(id: &str, err: &str) -> String {
    format!("Failed to render {id}: {err}")
}

fn counter_lines(summary: &BuildSummary) -> [String; 2] {
    [
        format!(
            "{} of {} posts have been updated",
            summary.updated, summary.total
        ),
        format!(
            "{} of {} posts are published",
            summary.published, summary.total
        ),
    ]
}

fn completion_line(summary: &BuildSummary) -> String {
    format!(
        "Build complete in {:.1}s. Open public/index.html to preview",
        summary.elapsed.as_secs_f64()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn summary() -> BuildSummary {
        BuildSummary {
            total: 4,
            updated: 2,
            published: 3,
            failures: vec![("p1".to_owned(), "boom".to_owned())],
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn counter_lines_report_updated_and_published() {
        let [updated, published] = counter_lines(&summary());
        assert_eq!(updated, "2 of 4 posts have been updated");
        assert_eq!(published, "3 of 4 posts are published");
    }

    #[test]
    fn completion_line_reports_elapsed_seconds() {
        assert_eq!(
            completion_line(&summary()),
            "Build complete in 1.5s. Open public/index.html to preview"
        );
    }

    #[test]
    fn failure_line_names_the_post() {
        assert_eq!(failure_line("p1", "boom"), "Failed to render p1: boom");
    }
}
