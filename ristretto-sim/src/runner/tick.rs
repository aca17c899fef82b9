//! Real-time shot loop
//!
//! Paces the controller with an embassy `Ticker`. Each tick passes the
//! measured time since the previous one, so a late wakeup shows up as a
//! longer step rather than a slower shot.

use std::io::Write;

use embassy_time::{Duration, Instant, Ticker};
use tracing::info;

use ristretto_core::controller::BrewController;
use ristretto_core::traits::ProfileSource;

use super::shot::{ShotReport, ShotRunner};
use crate::error::Result;

/// Run a shot to completion at the runner's tick period
pub async fn run_realtime<W: Write, S: ProfileSource>(
    runner: &mut ShotRunner<W>,
    ctrl: &mut BrewController<S>,
) -> Result<ShotReport> {
    let tick_ms = runner.options().tick_ms.max(1);
    info!("Real-time loop started ({} ms ticks)", tick_ms);

    runner.begin(ctrl)?;

    let mut ticker = Ticker::every(Duration::from_millis(tick_ms as u64));
    let mut last = Instant::now();

    loop {
        ticker.next().await;

        let now = Instant::now();
        let dt_s = now.duration_since(last).as_micros() as f32 / 1_000_000.0;
        last = now;

        if let Some(reason) = runner.step(ctrl, dt_s)? {
            return runner.finish(ctrl, reason);
        }
    }
}
