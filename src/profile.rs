//! Ranging profile: grid resolution, timing and which auxiliary channels
//! (ambient, signal) the sensor reports.

use crate::{Error, MAX_TIMING_BUDGET_MS, MIN_TIMING_BUDGET_MS, RANGING_FREQUENCY_HZ, TIMING_BUDGET_MS};

/// Grid resolution and ranging mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum RangingProfile {
    /// 4x4 zones, ranging back to back.
    Res4x4Continuous,
    /// 4x4 zones, low power with an idle period between measurements.
    Res4x4Autonomous,
    /// 8x8 zones, ranging back to back.
    Res8x8Continuous,
    /// 8x8 zones, low power with an idle period between measurements.
    Res8x8Autonomous,
}

impl RangingProfile {
    /// Number of zones in one row (and one column) of the grid.
    #[inline]
    pub const fn zones_per_line(&self) -> usize {
        match self {
            RangingProfile::Res8x8Continuous | RangingProfile::Res8x8Autonomous => 8,
            RangingProfile::Res4x4Continuous | RangingProfile::Res4x4Autonomous => 4,
        }
    }

    /// Total number of zones reported per measurement.
    #[inline]
    pub const fn number_of_zones(&self) -> usize {
        self.zones_per_line() * self.zones_per_line()
    }

    /// Whether the sensor idles between measurements.
    #[inline]
    pub const fn is_autonomous(&self) -> bool {
        matches!(
            self,
            RangingProfile::Res4x4Autonomous | RangingProfile::Res8x8Autonomous
        )
    }

    /// The same ranging mode with the other resolution.
    pub const fn toggled_resolution(&self) -> Self {
        match self {
            RangingProfile::Res4x4Autonomous => RangingProfile::Res8x8Autonomous,
            RangingProfile::Res4x4Continuous => RangingProfile::Res8x8Continuous,
            RangingProfile::Res8x8Autonomous => RangingProfile::Res4x4Autonomous,
            RangingProfile::Res8x8Continuous => RangingProfile::Res4x4Continuous,
        }
    }
}

/// Profile pushed to the sensor before ranging starts.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct ProfileConfig {
    /// Resolution and ranging mode.
    pub profile: RangingProfile,
    /// Integration time of one measurement (milliseconds).
    pub timing_budget_ms: u32,
    /// Measurements per second.
    pub frequency_hz: u32,
    /// Report the ambient rate of each zone.
    pub enable_ambient: bool,
    /// Report the signal rate of each zone.
    pub enable_signal: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            profile: RangingProfile::Res8x8Continuous,
            timing_budget_ms: TIMING_BUDGET_MS,
            frequency_hz: RANGING_FREQUENCY_HZ,
            enable_ambient: true,
            enable_signal: true,
        }
    }
}

impl ProfileConfig {
    /// Check the profile against the limits of the sensor: the timing
    /// budget must be within [5, 100] ms and one measurement must fit
    /// inside one ranging period.
    pub fn validate<E>(&self) -> Result<(), Error<E>> {
        if !(MIN_TIMING_BUDGET_MS..=MAX_TIMING_BUDGET_MS).contains(&self.timing_budget_ms) {
            return Err(Error::InvalidProfile);
        }

        if self.frequency_hz == 0 || self.timing_budget_ms.saturating_mul(self.frequency_hz) > 1000 {
            return Err(Error::InvalidProfile);
        }

        Ok(())
    }

    /// Time between two measurements (milliseconds).
    #[inline]
    pub fn polling_period_ms(&self) -> u32 {
        1000 / self.frequency_hz.max(1)
    }

    /// Whether a second line per zone (signal and ambient) is worth printing.
    #[inline]
    pub fn shows_signal_or_ambient(&self) -> bool {
        self.enable_ambient || self.enable_signal
    }

    /// Switch between 4x4 and 8x8.
    pub fn toggle_resolution(&mut self) {
        self.profile = self.profile.toggled_resolution();
    }

    /// Flip both auxiliary channels.
    pub fn toggle_signal_and_ambient(&mut self) {
        self.enable_ambient = !self.enable_ambient;
        self.enable_signal = !self.enable_signal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile() {
        let cfg = ProfileConfig::default();
        assert_eq!(cfg.profile, RangingProfile::Res8x8Continuous);
        assert_eq!(cfg.timing_budget_ms, 30);
        assert_eq!(cfg.frequency_hz, 30);
        assert!(cfg.enable_ambient && cfg.enable_signal);
        assert_eq!(cfg.polling_period_ms(), 33);
        assert!(cfg.validate::<()>().is_ok());
    }

    #[test]
    fn zone_counts() {
        assert_eq!(RangingProfile::Res4x4Continuous.number_of_zones(), 16);
        assert_eq!(RangingProfile::Res4x4Autonomous.zones_per_line(), 4);
        assert_eq!(RangingProfile::Res8x8Autonomous.number_of_zones(), 64);
        assert!(RangingProfile::Res8x8Autonomous.is_autonomous());
        assert!(!RangingProfile::Res4x4Continuous.is_autonomous());
    }

    #[test]
    fn resolution_toggle_keeps_mode() {
        let mut cfg = ProfileConfig::default();
        cfg.toggle_resolution();
        assert_eq!(cfg.profile, RangingProfile::Res4x4Continuous);
        cfg.toggle_resolution();
        assert_eq!(cfg.profile, RangingProfile::Res8x8Continuous);

        cfg.profile = RangingProfile::Res4x4Autonomous;
        cfg.toggle_resolution();
        assert_eq!(cfg.profile, RangingProfile::Res8x8Autonomous);
    }

    #[test]
    fn signal_and_ambient_flip_independently() {
        let mut cfg = ProfileConfig {
            enable_ambient: false,
            ..ProfileConfig::default()
        };
        cfg.toggle_signal_and_ambient();
        assert!(cfg.enable_ambient);
        assert!(!cfg.enable_signal);
        assert!(cfg.shows_signal_or_ambient());

        cfg.enable_ambient = false;
        assert!(!cfg.shows_signal_or_ambient());
    }

    #[test]
    fn timing_budget_limits() {
        let mut cfg = ProfileConfig {
            frequency_hz: 1,
            ..ProfileConfig::default()
        };

        for budget in [5, 50, 100] {
            cfg.timing_budget_ms = budget;
            assert!(cfg.validate::<()>().is_ok(), "{budget} ms rejected");
        }

        for budget in [0, 4, 101, 1000] {
            cfg.timing_budget_ms = budget;
            assert_eq!(cfg.validate::<()>(), Err(Error::InvalidProfile));
        }
    }

    #[test]
    fn budget_must_fit_in_period() {
        let cfg = ProfileConfig {
            timing_budget_ms: 50,
            frequency_hz: 30,
            ..ProfileConfig::default()
        };
        assert_eq!(cfg.validate::<()>(), Err(Error::InvalidProfile));

        let cfg = ProfileConfig {
            frequency_hz: 0,
            ..ProfileConfig::default()
        };
        assert_eq!(cfg.validate::<()>(), Err(Error::InvalidProfile));
    }
}
