//! Stage reporting gated by [`VerbosityMode`] and `debug_times`.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::Instant;

use log::info;
use pbfparquet_core::VerbosityMode;

/// Logs pipeline stages and records how long each took.
#[derive(Debug)]
pub(super) struct StageReporter {
    mode: VerbosityMode,
    debug_times: bool,
    timings: BTreeMap<&'static str, u128>,
}

impl StageReporter {
    pub(super) const fn new(mode: VerbosityMode, debug_times: bool) -> Self {
        Self {
            mode,
            debug_times,
            timings: BTreeMap::new(),
        }
    }

    /// Run one stage, logging its start and, with `debug_times`, its duration.
    pub(super) fn stage<T>(&mut self, name: &'static str, run: impl FnOnce() -> T) -> T {
        if self.mode.reports_stages() {
            info!("{name}");
        }
        let started = Instant::now();
        let outcome = run();
        let elapsed = started.elapsed();
        self.timings.insert(name, elapsed.as_millis());
        if self.debug_times {
            info!("{name} took {elapsed:.2?}");
        }
        outcome
    }

    /// Log a message shown only in verbose mode.
    pub(super) fn detail(&self, message: impl Display) {
        if self.mode.reports_detail() {
            info!("{message}");
        }
    }

    /// Log a message shown unless silent.
    pub(super) fn summary(&self, message: impl Display) {
        if self.mode.reports_stages() {
            info!("{message}");
        }
    }

    /// Stage durations in milliseconds, keyed by stage name.
    pub(super) fn timings(&self) -> BTreeMap<String, u128> {
        self.timings
            .iter()
            .map(|(name, millis)| ((*name).to_owned(), *millis))
            .collect()
    }
}
