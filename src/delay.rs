//! [`DelayNs`] for hosts running tokio.

use core::time::Duration;

use embedded_hal_async::delay::DelayNs;

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

impl DelayNs for TokioDelay {
    async fn delay_ns(&mut self, ns: u32) {
        tokio::time::sleep(Duration::from_nanos(ns.into())).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        tokio::time::sleep(Duration::from_millis(ms.into())).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleeps_on_the_tokio_clock() {
        let start = tokio::time::Instant::now();
        TokioDelay.delay_ms(5).await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
