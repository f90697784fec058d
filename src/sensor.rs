//! The ranging sensor as seen by the application, plus the data it
//! reports.

use crate::profile::ProfileConfig;

/// Targets reported per zone.
pub const NB_TARGETS_PER_ZONE: usize = 1;

/// Zones in the largest (8x8) grid.
pub const MAX_ZONES: usize = 64;

/// Status of a valid target once mapped with [`map_target_status`].
pub const STATUS_VALID: u32 = 0;

/// Status of a zone that was not updated.
pub const STATUS_NO_UPDATE: u32 = 255;

/// Map a raw VL53L8CX target status to the value stored in
/// [`ZoneResult::status`]. Statuses 5 and 9 are both fully valid ranges and
/// become [`STATUS_VALID`], 0 means the zone wasn't updated, anything else is
/// kept as is.
pub const fn map_target_status(raw: u8) -> u32 {
    match raw {
        5 | 9 => STATUS_VALID,
        0 => STATUS_NO_UPDATE,
        other => other as u32,
    }
}

/// How the sensor produces results.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Mode {
    /// Keep ranging, [`RangingSensor::get_distance`] waits for a result.
    BlockingContinuous,
    /// Range once, [`RangingSensor::get_distance`] waits for the result.
    BlockingOneShot,
    /// Keep ranging, [`RangingSensor::get_distance`] returns immediately.
    AsyncContinuous,
    /// Range once, [`RangingSensor::get_distance`] returns immediately.
    AsyncOneShot,
}

impl Mode {
    /// Whether reading a result can return without new data.
    #[inline]
    pub const fn is_async(&self) -> bool {
        matches!(self, Mode::AsyncContinuous | Mode::AsyncOneShot)
    }
}

/// What the sensor is able to do. Read once at start-up.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Capabilities {
    /// Zones in the largest supported grid.
    pub number_of_zones: u32,
    /// Targets the sensor can separate within one zone.
    pub max_number_of_targets_per_zone: u32,
    /// A custom region of interest can be programmed.
    pub custom_roi: bool,
    /// Distance thresholds can trigger the interrupt line.
    pub threshold_detection: bool,
}

/// Measurement of a single zone.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct ZoneResult {
    /// Targets detected in this zone. Zero means the values below are stale.
    pub number_of_targets: u32,
    /// Distance to each target (millimeters).
    pub distance_mm: [u32; NB_TARGETS_PER_ZONE],
    /// Mapped status of each target, see [`map_target_status`].
    pub status: [u32; NB_TARGETS_PER_ZONE],
    /// Ambient rate (kcps/spad), only meaningful if ambient is enabled.
    pub ambient: [u32; NB_TARGETS_PER_ZONE],
    /// Signal rate (kcps/spad), only meaningful if signal is enabled.
    pub signal: [u32; NB_TARGETS_PER_ZONE],
}

impl ZoneResult {
    /// Whether `target` was detected with a valid status.
    #[inline]
    pub fn is_valid(&self, target: usize) -> bool {
        target < NB_TARGETS_PER_ZONE
            && (target as u32) < self.number_of_targets
            && self.status[target] == STATUS_VALID
    }
}

/// One complete measurement. The application keeps a single instance and
/// lets the sensor overwrite it on every read.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct RangingResult {
    /// Number of valid entries at the start of `zones`.
    pub number_of_zones: usize,
    /// Zone results, row by row.
    pub zones: [ZoneResult; MAX_ZONES],
}

impl Default for RangingResult {
    fn default() -> Self {
        Self {
            number_of_zones: 0,
            zones: [ZoneResult::default(); MAX_ZONES],
        }
    }
}

impl RangingResult {
    /// The zones filled in by the last measurement.
    #[inline]
    pub fn zones(&self) -> &[ZoneResult] {
        &self.zones[..self.number_of_zones.min(MAX_ZONES)]
    }

    /// Zone `index`, if the last measurement covered it.
    #[inline]
    pub fn zone(&self, index: usize) -> Option<&ZoneResult> {
        self.zones().get(index)
    }

    /// Forget the last measurement.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A multizone ToF sensor. Implemented on top of the vendor ranging
/// middleware, a native driver or a simulator.
///
/// The calls mirror the life cycle of the sensor: [`Self::init`] once, then
/// [`Self::config_profile`] and [`Self::start`], then results until
/// [`Self::stop`]. The profile can only be changed while stopped.
#[allow(async_fn_in_trait)]
pub trait RangingSensor {
    /// Error reported by the sensor or its bus.
    type Error: core::fmt::Debug;

    /// Boot the sensor and load its firmware.
    async fn init(&mut self) -> Result<(), Self::Error>;

    /// Read the device identifier.
    async fn read_id(&mut self) -> Result<u32, Self::Error>;

    /// Describe what the sensor supports.
    async fn capabilities(&mut self) -> Result<Capabilities, Self::Error>;

    /// Apply a ranging profile. The sensor must be stopped.
    async fn config_profile(&mut self, profile: &ProfileConfig) -> Result<(), Self::Error>;

    /// Begin ranging.
    async fn start(&mut self, mode: Mode) -> Result<(), Self::Error>;

    /// Stop ranging.
    async fn stop(&mut self) -> Result<(), Self::Error>;

    /// Check whether a new result can be read.
    async fn is_data_ready(&mut self) -> Result<bool, Self::Error>;

    /// Read the latest result into `result`. Returns `false`, leaving
    /// `result` untouched, if an async mode has nothing new yet.
    async fn get_distance(&mut self, result: &mut RangingResult) -> Result<bool, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_status_mapping() {
        assert_eq!(map_target_status(5), STATUS_VALID);
        assert_eq!(map_target_status(9), STATUS_VALID);
        assert_eq!(map_target_status(0), STATUS_NO_UPDATE);
        assert_eq!(map_target_status(4), 4);
        assert_eq!(map_target_status(255), 255);
    }

    #[test]
    fn zone_validity() {
        let mut zone = ZoneResult {
            number_of_targets: 1,
            distance_mm: [420],
            ..ZoneResult::default()
        };
        assert!(zone.is_valid(0));
        assert!(!zone.is_valid(1));

        zone.status[0] = 4;
        assert!(!zone.is_valid(0));

        zone.status[0] = STATUS_VALID;
        zone.number_of_targets = 0;
        assert!(!zone.is_valid(0));
    }

    #[test]
    fn result_only_exposes_measured_zones() {
        let mut result = RangingResult::default();
        assert!(result.zones().is_empty());

        result.number_of_zones = 16;
        result.zones[15].distance_mm[0] = 1234;
        assert_eq!(result.zones().len(), 16);
        assert_eq!(result.zone(15).map(|z| z.distance_mm[0]), Some(1234));
        assert_eq!(result.zone(16), None);

        result.clear();
        assert_eq!(result, RangingResult::default());
    }

    #[test]
    fn async_modes() {
        assert!(Mode::AsyncContinuous.is_async());
        assert!(Mode::AsyncOneShot.is_async());
        assert!(!Mode::BlockingContinuous.is_async());
        assert!(!Mode::BlockingOneShot.is_async());
    }
}
