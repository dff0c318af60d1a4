//! Randomized pacing between simulated interactions
//!
//! Every wait in the crate goes through [`wait_with_jitter`]. It is the only
//! place where the engine yields to the runtime, so it is also where the
//! callers poll the stop flag.

use rand::Rng;
use std::time::Duration;

/// Base delay used when the caller passes a negative or non-numeric value
pub const DEFAULT_BASE_MS: f64 = 100.0;

/// Compute the effective delay for a base duration and a jitter percentage.
///
/// The result is `base + uniform(0, base * min(100, jitter) / 100)`, rounded to
/// the nearest millisecond.
pub fn jittered_delay(base_ms: f64, jitter_percent: f64) -> Duration {
    jittered_delay_with(&mut rand::thread_rng(), base_ms, jitter_percent)
}

/// Same as [`jittered_delay`] with an explicit random source
pub fn jittered_delay_with<R: Rng + ?Sized>(rng: &mut R, base_ms: f64, jitter_percent: f64) -> Duration {
    let base = if base_ms.is_finite() && base_ms >= 0.0 {
        base_ms
    } else {
        log::warn!("Invalid base delay ({}), using {}ms", base_ms, DEFAULT_BASE_MS);
        DEFAULT_BASE_MS
    };

    let jitter = if jitter_percent.is_finite() && jitter_percent >= 0.0 {
        jitter_percent.min(100.0)
    } else {
        0.0
    };

    let max_extra = base * jitter / 100.0;
    let extra = if max_extra > 0.0 { rng.gen_range(0.0..=max_extra) } else { 0.0 };

    Duration::from_millis((base + extra).round() as u64)
}

/// Suspend for `base_ms` plus a random share of it.
///
/// Never fails. Invalid inputs are normalized (see [`jittered_delay`]).
pub async fn wait_with_jitter(base_ms: f64, jitter_percent: f64) {
    let delay = jittered_delay(base_ms, jitter_percent);
    log::trace!("Waiting {}ms (base {}ms, jitter {}%)", delay.as_millis(), base_ms, jitter_percent);
    tokio::time::sleep(delay).await;
}
