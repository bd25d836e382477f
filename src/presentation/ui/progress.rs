use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

use crate::domain::value_objects::progress::{EntryOutcome, Pass, ProgressObserver};

const PROGRESS_TEMPLATE: &str = "{prefix:>5.bold} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}";
const PROGRESS_CHARS: &str = "=> ";

/// Renders pass events as one indicatif bar per running pass
pub struct ProgressReporter {
    enabled: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    /// Bars are drawn on stderr only when `enabled` and stderr is a terminal
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: enabled && console::Term::stderr().is_term(),
            bar: Mutex::new(None),
        }
    }

    /// A reporter that never draws
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            bar: Mutex::new(None),
        }
    }

    /// Whether bars are drawn
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn create_bar(&self, pass: Pass, total: usize) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(PROGRESS_CHARS);
        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        bar.set_style(style);
        bar.set_prefix(pass.label());
        bar
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        // A poisoned lock only means another worker panicked mid-update
        let guard = match self.bar.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(bar) = guard.as_ref() {
            f(bar);
        }
    }
}

impl ProgressObserver for ProgressReporter {
    fn pass_started(&self, pass: Pass, total: usize) {
        let bar = self.create_bar(pass, total);
        let mut guard = match self.bar.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = guard.replace(bar) {
            previous.finish_and_clear();
        }
    }

    fn entry_started(&self, _pass: Pass, name: &str) {
        self.with_bar(|bar| bar.set_message(name.to_string()));
    }

    fn entry_finished(&self, _pass: Pass, _name: &str, _outcome: EntryOutcome) {
        self.with_bar(|bar| bar.inc(1));
    }

    fn pass_finished(&self, _pass: Pass) {
        let mut guard = match self.bar.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(bar) = guard.take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_reporter_tracks_position() {
        let reporter = ProgressReporter::hidden();
        assert!(!reporter.is_enabled());

        reporter.pass_started(Pass::Clone, 2);
        reporter.entry_started(Pass::Clone, "a");
        reporter.entry_finished(Pass::Clone, "a", EntryOutcome::Cloned);

        let position = reporter.bar.lock().unwrap().as_ref().map(|bar| bar.position());
        assert_eq!(position, Some(1));

        reporter.pass_finished(Pass::Clone);
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_events_without_pass_are_ignored() {
        let reporter = ProgressReporter::hidden();
        reporter.entry_finished(Pass::Fetch, "x", EntryOutcome::Fetched);
        reporter.pass_finished(Pass::Fetch);
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
