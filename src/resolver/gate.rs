//! Minimum-interval rate gate.
//!
//! A single shared gate in front of all outbound provider requests. Unlike a
//! per-call delay, the gate is a mutex over the time of the last request, so
//! concurrent callers serialize and the interval holds globally.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Serializes outbound requests so no two pass closer together than the
/// configured interval.
pub struct MinIntervalGate {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl MinIntervalGate {
    /// Creates a gate with the given minimum spacing between passes.
    pub fn new(interval: Duration) -> Self {
        MinIntervalGate {
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// Waits until at least the configured interval has elapsed since the
    /// previous pass, then records this pass.
    ///
    /// The lock is held across the wait: a burst of concurrent callers comes
    /// out spaced one interval apart rather than all waiting the same delay
    /// and stampeding together.
    pub async fn pass(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_pass_is_immediate() {
        let gate = MinIntervalGate::new(Duration::from_millis(200));
        let start = Instant::now();
        gate.pass().await;
        assert!(
            start.elapsed() < Duration::from_millis(100),
            "first pass should not wait"
        );
    }

    #[tokio::test]
    async fn test_sequential_passes_are_spaced() {
        let gate = MinIntervalGate::new(Duration::from_millis(50));
        gate.pass().await;
        let start = Instant::now();
        gate.pass().await;
        assert!(
            start.elapsed() >= Duration::from_millis(45),
            "second pass should wait out the interval, waited {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn test_concurrent_passes_serialize() {
        let gate = Arc::new(MinIntervalGate::new(Duration::from_millis(40)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move {
                gate.pass().await;
            }));
        }
        for handle in handles {
            handle.await.expect("gate task should not panic");
        }

        // Three passes through a 40ms gate cannot complete in under 80ms.
        assert!(
            start.elapsed() >= Duration::from_millis(75),
            "concurrent passes should serialize, finished in {:?}",
            start.elapsed()
        );
    }
}
