//! Terminal reporting for build and serve.
//!
//! Everything goes to stderr; stdout stays free for piping.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};
use pedia_site::{NavigationWarning, PageFailure};

pub(crate) struct Output {
    term: Term,
    ok: Style,
    failed: Style,
    warned: Style,
    slug: Style,
    url: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            failed: Style::new().red(),
            warned: Style::new().yellow().dim(),
            slug: Style::new().red().bold(),
            url: Style::new().cyan().bold(),
        }
    }

    /// Plain status line.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Build summary, the only line a successful build prints.
    pub(crate) fn built(&self, pages: usize, output_dir: &Path) {
        let noun = if pages == 1 { "page" } else { "pages" };
        let msg = format!("Built {pages} {noun} into {}", output_dir.display());
        let _ = self.term.write_line(&self.ok.apply_to(msg).to_string());
    }

    /// One failed document as `slug: reason`.
    pub(crate) fn failure(&self, failure: &PageFailure) {
        let slug = if failure.slug.is_empty() {
            "/"
        } else {
            failure.slug.as_str()
        };
        let _ = self
            .term
            .write_line(&format!("{}: {}", self.slug.apply_to(slug), failure.reason));
    }

    /// Navigation warning. Printed whatever the log level, since the
    /// default orphan policy relies on it.
    pub(crate) fn warning(&self, warning: &NavigationWarning) {
        let _ = self
            .term
            .write_line(&self.warned.apply_to(warning_line(warning)).to_string());
    }

    /// Fatal error.
    pub(crate) fn error(&self, err: &dyn Display) {
        let _ = self
            .term
            .write_line(&self.failed.apply_to(format!("Error: {err}")).to_string());
    }

    /// Address the preview server listens on.
    pub(crate) fn serving(&self, site_name: &str, host: &str, port: u16) {
        let url = format!("http://{host}:{port}");
        let _ = self
            .term
            .write_line(&format!("Serving {site_name} at {}", self.url.apply_to(url)));
    }
}

fn warning_line(warning: &NavigationWarning) -> String {
    format!("warning: {warning}")
}
