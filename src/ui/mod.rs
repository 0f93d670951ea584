//! UI/Progress presentation layer
//!
//! Progress for linking and loose-file extraction goes through the
//! [`ProgressReporter`] trait: a spinner on an interactive stderr, nothing
//! otherwise. Listings and summaries live in [`display`].

pub mod display;

use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for long-running file work
pub trait ProgressReporter {
    /// Begin a phase for `package`
    fn start(&mut self, package: &str, phase: &str);

    /// One file handled
    fn item(&mut self, path: &str);

    fn finish(&mut self);

    /// Stop after an error, leaving the last message visible
    fn abandon(&mut self);
}

/// Pick the spinner when stderr is a terminal
pub fn reporter_for_stderr() -> Box<dyn ProgressReporter> {
    if Term::stderr().is_term() {
        Box::new(SpinnerReporter::default())
    } else {
        Box::new(SilentProgressReporter)
    }
}

/// Spinner with a running file count
#[derive(Default)]
pub struct SpinnerReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter for SpinnerReporter {
    fn start(&mut self, package: &str, phase: &str) {
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold} {pos} files {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner().with_style(style);
        bar.set_prefix(format!("{phase} {package}"));
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    fn item(&mut self, path: &str) {
        if let Some(bar) = &self.bar {
            let shown = match path.char_indices().rev().nth(46) {
                Some((cut, _)) => format!("...{}", &path[cut..]),
                None => path.to_string(),
            };
            bar.set_message(shown);
            bar.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn abandon(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}

/// No-op reporter for pipes and tests
#[derive(Debug, Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start(&mut self, _package: &str, _phase: &str) {}

    fn item(&mut self, _path: &str) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}
