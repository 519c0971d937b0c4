// ImpactWatch — Initialization Supervisor
//
// Retry-with-delay wrapper around hardware bring-up. Retries forever: the
// device runs untethered with no operator present, so giving up is worse
// than waiting for the hardware to come back.

use std::thread;
use std::time::Duration;

/// Run `attempt` until it succeeds, sleeping `retry_delay` after each
/// failure. Every failure is logged with the operation name.
pub fn supervise<T>(
    what: &str,
    retry_delay: Duration,
    mut attempt: impl FnMut() -> anyhow::Result<T>,
) -> T {
    loop {
        match attempt() {
            Ok(value) => return value,
            Err(e) => {
                log::error!("Error during {}: {:#}", what, e);
                log::info!("Retrying {} in {:?}...", what, retry_delay);
                thread::sleep(retry_delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn returns_first_success() {
        let value = supervise("test", Duration::ZERO, || Ok::<_, anyhow::Error>(42));
        assert_eq!(value, 42);
    }

    #[test]
    fn retries_until_success() {
        let mut attempts = 0;
        let value = supervise("test", Duration::ZERO, || {
            attempts += 1;
            if attempts <= 5 {
                anyhow::bail!("simulated bring-up failure {}", attempts);
            }
            Ok(attempts)
        });
        // 5 failures, success on the 6th attempt.
        assert_eq!(value, 6);
    }

    #[test]
    fn sleeps_between_attempts() {
        let delay = Duration::from_millis(20);
        let start = Instant::now();
        let mut attempts = 0;
        supervise("test", delay, || {
            attempts += 1;
            if attempts <= 2 {
                anyhow::bail!("not yet");
            }
            Ok(())
        });
        // Two failures → at least two full delays elapsed.
        assert!(start.elapsed() >= delay * 2);
    }
}
