//! Injectable sleep source for bounded polling loops

use std::time::Duration;

use trait_variant::make;

#[make(Send)]
pub trait Clock: Send + Sync + 'static {
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
pub use test_clock::RecordingClock;


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_sleeps() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_secs(1)).await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_recording_clock_records() {
        let clock = RecordingClock::new();
        clock.sleep(Duration::from_millis(5)).await;
        clock.sleep(Duration::from_millis(7)).await;
        assert_eq!(
            clock.sleeps().await,
            vec![Duration::from_millis(5), Duration::from_millis(7)]
        );
    }
}
