//! The VL53L8CX raises its `INT` line when a new measurement is ready, and
//! also reports readiness over the bus. This module provides a trait for
//! waiting for a result, regardless of how you connect the sensor to the
//! microcontroller.

use core::pin::pin;

use embedded_hal_async::{delay::DelayNs, digital::Wait};

use crate::{sensor::RangingSensor, Error};

/// How long a single wait may take before giving up (milliseconds).
pub const WAIT_TIMEOUT_MS: u32 = 1000;

/// Trait for waiting for a result to be ready.
pub trait WaitForResult<S, DELAY>
where
    S: RangingSensor,
    DELAY: DelayNs,
{
    /// Wait for a result to be ready.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if the sensor does not respond within around 1 second.
    /// - [`Error::Gpio`] if a GPIO error occurs.
    /// - [`Error::Sensor`] if the sensor cannot be queried.
    #[allow(async_fn_in_trait)]
    async fn wait_for_result(
        &mut self,
        sensor: &mut S,
        delay: &mut DELAY,
    ) -> Result<(), Error<S::Error>>;
}

/// Wait for new results by asking the sensor every millisecond.
pub struct Poll;

impl<S, DELAY> WaitForResult<S, DELAY> for Poll
where
    S: RangingSensor,
    DELAY: DelayNs,
{
    #[inline]
    async fn wait_for_result(
        &mut self,
        sensor: &mut S,
        delay: &mut DELAY,
    ) -> Result<(), Error<S::Error>> {
        for _ in 0..WAIT_TIMEOUT_MS {
            if sensor.is_data_ready().await.map_err(Error::Sensor)? {
                return Ok(());
            }
            delay.delay_ms(1).await;
        }

        Err(Error::Timeout)
    }
}

/// Wait for `INT` (the sensor's interrupt output) to go low.
pub struct Interrupt<PIN>(pub PIN);

impl<PIN, S, DELAY> WaitForResult<S, DELAY> for Interrupt<PIN>
where
    S: RangingSensor,
    DELAY: DelayNs,
    PIN: Wait,
{
    #[inline]
    async fn wait_for_result(
        &mut self,
        _sensor: &mut S,
        delay: &mut DELAY,
    ) -> Result<(), Error<S::Error>> {
        use futures_util::future::{select, Either};

        match select(pin!(delay.delay_ms(WAIT_TIMEOUT_MS)), pin!(self.0.wait_for_low())).await {
            Either::Left(_) => Err(Error::Timeout),
            Either::Right((Ok(()), _)) => Ok(()),
            Either::Right((Err(_gpio_err), _)) => Err(Error::Gpio),
        }
    }
}
