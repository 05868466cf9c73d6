//! Progress display for catalog acquisition

use cardex_core::Progress;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use tracing::info;

/// Percentage bar fed by acquisition progress events.
///
/// Hidden when `quiet` is set or stderr is not a terminal; status lines are
/// then only logged.
pub struct AcquireProgress {
    bar: ProgressBar,
}

impl AcquireProgress {
    pub fn new(quiet: bool) -> Self {
        if quiet || !std::io::stderr().is_terminal() {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    pub fn update(&self, event: &Progress) {
        info!("[{:>3}%] {}", event.percent, event.status);
        self.bar.set_position(u64::from(event.percent));
        self.bar.set_message(event.status.clone());
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
