//! Bounded client-side polling.
//!
//! Fixed attempt count with a fixed delay between attempts, no hidden
//! infinite retry. The future is cancellable by dropping it; there is no
//! server-side state and no ordering guarantee beyond "eventually observe
//! success or exhaust attempts".

use std::future::Future;
use std::time::Duration;

/// Poll `op` until it succeeds or `max_attempts` is exhausted.
///
/// Returns the first success, or the last error once attempts run out.
/// Sleeps `delay` between attempts (not after the final one).
pub async fn poll_until<T, E, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    assert!(max_attempts > 0, "max_attempts must be at least 1");

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts => {
                tracing::warn!(attempt, max_attempts, error = %err, "polling exhausted");
                return Err(err);
            }
            Err(err) => {
                tracing::debug!(attempt, max_attempts, error = %err, "poll attempt failed; retrying");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_immediate_success_takes_one_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = poll_until(5, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42) }
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = poll_until(5, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("not yet".to_string())
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error_after_exact_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = poll_until(3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("attempt {}", n)) }
        })
        .await;
        assert_eq!(result, Err("attempt 2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
