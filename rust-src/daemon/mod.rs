//! Long-running monitor: periodic ticks plus screen events.

mod monitor;
mod signals;

use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;

pub use monitor::{Monitor, TickReport};
pub use signals::{ScreenEvent, SignalHandler};


/// How often the loop checks signal flags between ticks.
const POLL_INTERVAL: Duration = Duration::from_millis(200);


/// Run ticks every `interval` until shutdown is requested.
///
/// A failed tick is logged; the next interval is the retry.
pub fn run(monitor: &mut Monitor, interval: Duration, signals: &SignalHandler) {
    tracing::info!(interval_secs = interval.as_secs(), "monitor started");
    monitor.announce();

    let mut next_tick = Instant::now();
    while !signals.should_shutdown() {
        match signals.take_screen_event() {
            Some(ScreenEvent::Off) => monitor.screen_off(),
            Some(ScreenEvent::On) => monitor.screen_on(),
            None => {}
        }

        if Instant::now() >= next_tick {
            match monitor.run_tick(Local::now()) {
                Ok(report) => tracing::debug!(
                    sample = report.sample.id,
                    delta_bytes = report.sample.total_bytes(),
                    "tick ok"
                ),
                Err(e) => tracing::warn!(error = %e, "tick failed"),
            }
            next_tick = Instant::now() + interval;
        }

        thread::sleep(POLL_INTERVAL.min(interval));
    }

    tracing::info!("monitor stopped");
}
