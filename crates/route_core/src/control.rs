//! Progress reporting and cancellation for long running preprocessing.
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use indicatif::ProgressBar;

/// Receives `(done, total)` work counters between frontier pops.
pub trait ProgressObserver {
    fn report(&mut self, done: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressObserver for F {
    fn report(&mut self, done: usize, total: usize) {
        self(done, total)
    }
}

impl ProgressObserver for ProgressBar {
    fn report(&mut self, done: usize, total: usize) {
        if self.length() != Some(total as u64) {
            self.set_length(total as u64);
        }
        self.set_position(done as u64);
    }
}

/// Shared flag to abort preprocessing from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Bundles an optional progress observer with an optional cancellation token.
#[derive(Default)]
pub struct Control<'a> {
    observer: Option<&'a mut dyn ProgressObserver>,
    token: Option<CancellationToken>,
}

impl<'a> Control<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: &'a mut dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn report(&mut self, done: usize, total: usize) {
        if let Some(observer) = self.observer.as_mut() {
            observer.report(done, total);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(|t| t.is_cancelled())
    }
}

/// Logs a progress line every `step` percent, switching to finer steps near the end.
pub(crate) struct ProgressLog {
    step: f64,
    next_goal: f64,
    label: &'static str,
}

impl ProgressLog {
    pub(crate) fn new(label: &'static str, step: f64) -> Self {
        Self {
            step,
            next_goal: step,
            label,
        }
    }

    pub(crate) fn tick(&mut self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        let progress = done as f64 / total as f64 * 100.0;
        if progress >= self.next_goal {
            log::info!("{} progress: {:.2}%", self.label, progress);
            if progress >= 95.0 {
                self.step = self.step.min(0.5);
            }
            while self.next_goal <= progress {
                self.next_goal += self.step;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_observer_receives_counters() {
        let mut seen = Vec::new();
        let mut observer = |done: usize, total: usize| seen.push((done, total));
        {
            let mut control = Control::new().with_observer(&mut observer);
            control.report(1, 4);
            control.report(4, 4);
        }
        assert_eq!(seen, vec![(1, 4), (4, 4)]);
    }

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let control = Control::new().with_token(token.clone());
        assert!(!control.is_cancelled());

        token.cancel();
        assert!(control.is_cancelled());
    }
}
