//! Simple ranging application for the [VL53L8A1 expansion board](https://www.st.com/en/evaluation-tools/x-nucleo-53l8a1.html),
//! built around the VL53L8CX multizone ToF sensor.
//!
//! The sensor itself is reached through the [`RangingSensor`] trait, so the
//! vendor middleware, a register-level driver or a simulator can sit behind
//! it. On top of that this crate provides the demo loop: configure a
//! ranging profile, start the sensor, poll for results, print them on a
//! serial console and react to single-key commands.
//!
//! ```
//! use embedded_hal_async::delay::DelayNs;
//! use vl53l8a1_ranging::{AppConfig, Clock, Console, RangingSensor, SimpleRanging};
//!
//! async fn simple_ranging<S, C, D, T>(sensor: S, uart: C, delay: D, tick: T)
//! where
//!     S: RangingSensor,
//!     C: Console,
//!     D: DelayNs,
//!     T: Clock,
//! {
//!     let mut app = SimpleRanging::new(sensor, uart, delay, tick, AppConfig::default());
//!
//!     match app.run().await {
//!         Ok(never) => match never {},
//!         // init or start failed, the message is already on the console
//!         Err(e) => vl53l8a1_ranging::halt(e),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod app;
pub mod button;
pub mod command;
pub mod console;
#[cfg(feature = "tokio")]
pub mod delay;
pub mod display;
pub mod profile;
pub mod sensor;
pub mod wait;

use core::fmt;

pub use app::{halt, AppConfig, DisplayMode, SimpleRanging};
pub use button::ButtonFlag;
pub use command::Command;
pub use console::{Clock, Console};
#[cfg(feature = "tokio")]
pub use delay::TokioDelay;
pub use display::Region;
pub use profile::{ProfileConfig, RangingProfile};
pub use sensor::{Capabilities, Mode, RangingResult, RangingSensor, ZoneResult};

/// Default timing budget (milliseconds). Must stay within
/// [`MIN_TIMING_BUDGET_MS`] and [`MAX_TIMING_BUDGET_MS`].
pub const TIMING_BUDGET_MS: u32 = 30;

/// Default ranging frequency (Hz). Has to be consistent with the timing
/// budget: one measurement must fit inside one ranging period.
pub const RANGING_FREQUENCY_HZ: u32 = 30;

/// Refresh period matching [`RANGING_FREQUENCY_HZ`] (milliseconds).
pub const POLLING_PERIOD_MS: u32 = 1000 / RANGING_FREQUENCY_HZ;

/// Delay between two iterations of the polling loop (milliseconds).
pub const POLL_DELAY_MS: u32 = 5;

/// Shortest timing budget accepted by the sensor (milliseconds).
pub const MIN_TIMING_BUDGET_MS: u32 = 5;

/// Longest timing budget accepted by the sensor (milliseconds).
pub const MAX_TIMING_BUDGET_MS: u32 = 100;

/// Errors reported by this crate. `E` is the error type of the
/// underlying [`RangingSensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<E> {
    /// The sensor failed during normal operation.
    Sensor(E),
    /// The sensor could not be initialized.
    Init(E),
    /// Ranging could not be started.
    Start(E),
    /// The ranging profile is out of the range the sensor accepts.
    InvalidProfile,
    /// No result became available in time.
    Timeout,
    /// The interrupt line could not be read.
    Gpio,
    /// Writing to the console failed.
    Console,
}

impl<E> Error<E> {
    /// Whether the firmware should halt after this error. Only a failed
    /// initialization or start is fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Init(_) | Error::Start(_) | Error::InvalidProfile)
    }
}

impl<E> From<fmt::Error> for Error<E> {
    fn from(_: fmt::Error) -> Self {
        Error::Console
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Sensor(e) => write!(f, "sensor error: {:?}", e),
            Error::Init(e) => write!(f, "sensor init failed: {:?}", e),
            Error::Start(e) => write!(f, "sensor start failed: {:?}", e),
            Error::InvalidProfile => f.write_str("invalid ranging profile"),
            Error::Timeout => f.write_str("timed out waiting for a ranging result"),
            Error::Gpio => f.write_str("interrupt pin error"),
            Error::Console => f.write_str("console write failed"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn polling_period_matches_frequency() {
        assert_eq!(POLLING_PERIOD_MS, 33);
        assert!((MIN_TIMING_BUDGET_MS..=MAX_TIMING_BUDGET_MS).contains(&TIMING_BUDGET_MS));
    }

    #[test]
    fn only_bring_up_errors_are_fatal() {
        assert!(Error::Init(()).is_fatal());
        assert!(Error::Start(()).is_fatal());
        assert!(Error::<()>::InvalidProfile.is_fatal());
        assert!(!Error::Sensor(()).is_fatal());
        assert!(!Error::<()>::Timeout.is_fatal());
        assert!(!Error::<()>::Console.is_fatal());
    }

    #[test]
    fn display_includes_sensor_error() {
        let e: Error<u8> = Error::Start(7);
        assert_eq!(e.to_string(), "sensor start failed: 7");
        let e: Error<u8> = fmt::Error.into();
        assert_eq!(e, Error::Console);
    }
}
