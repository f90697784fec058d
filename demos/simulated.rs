//! Runs the simple ranging application on the host against a simulated
//! 8x8 sensor. Keys typed on stdin (followed by enter) act as console
//! commands.
//!
//! ```text
//! cargo run --example simulated -- table
//! ```

use std::f32::consts::TAU;
use std::fmt;
use std::io::{Stdout, Write as _};
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use vl53l8a1_ranging::sensor::{map_target_status, Capabilities, Mode, RangingResult, RangingSensor};
use vl53l8a1_ranging::{
    AppConfig, Console, DisplayMode, ProfileConfig, Region, SimpleRanging, TokioDelay,
};

/// Distance to the back wall (millimeters).
const WALL_MM: f32 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimError {
    NotInitialized,
    NotStarted,
    Busy,
}

/// A wall with a hand sweeping left and right in front of it.
struct SimulatedSensor {
    initialized: bool,
    running: Option<Mode>,
    profile: ProfileConfig,
    epoch: Instant,
    last_frame: Instant,
}

impl SimulatedSensor {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            initialized: false,
            running: None,
            profile: ProfileConfig::default(),
            epoch: now,
            last_frame: now,
        }
    }

    fn render(&self, result: &mut RangingResult) {
        let n = self.profile.profile.zones_per_line();
        let t = self.epoch.elapsed().as_secs_f32();
        let hand_col = (t * TAU / 4.0).sin() * 0.5 + 0.5;

        result.number_of_zones = n * n;
        for (i, zone) in result.zones.iter_mut().take(n * n).enumerate() {
            let (row, col) = (i / n, i % n);
            let x = col as f32 / (n - 1) as f32;

            let hand = (x - hand_col).abs() < 0.2 && row >= n / 4;
            let distance = if hand { 400.0 } else { WALL_MM + row as f32 * 15.0 };

            // far corners are too dark to range reliably
            let raw_status = if !hand && row == 0 && (col == 0 || col == n - 1) { 6 } else { 5 };

            zone.number_of_targets = 1;
            zone.distance_mm[0] = distance as u32;
            zone.status[0] = map_target_status(raw_status);
            zone.signal[0] = if self.profile.enable_signal {
                (4_000_000.0 / (distance * distance) * 100.0) as u32
            } else {
                0
            };
            zone.ambient[0] = if self.profile.enable_ambient { 2 + (row as u32 % 3) } else { 0 };
        }
    }
}

impl RangingSensor for SimulatedSensor {
    type Error = SimError;

    async fn init(&mut self) -> Result<(), SimError> {
        tokio::time::sleep(Duration::from_millis(50)).await; // firmware upload
        self.initialized = true;
        Ok(())
    }

    async fn read_id(&mut self) -> Result<u32, SimError> {
        if !self.initialized {
            return Err(SimError::NotInitialized);
        }
        Ok(0xf00c)
    }

    async fn capabilities(&mut self) -> Result<Capabilities, SimError> {
        Ok(Capabilities {
            number_of_zones: 64,
            max_number_of_targets_per_zone: 4,
            custom_roi: false,
            threshold_detection: true,
        })
    }

    async fn config_profile(&mut self, profile: &ProfileConfig) -> Result<(), SimError> {
        if self.running.is_some() {
            return Err(SimError::Busy);
        }
        self.profile = *profile;
        Ok(())
    }

    async fn start(&mut self, mode: Mode) -> Result<(), SimError> {
        if !self.initialized {
            return Err(SimError::NotInitialized);
        }
        self.running = Some(mode);
        self.last_frame = Instant::now();
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), SimError> {
        self.running = None;
        Ok(())
    }

    async fn is_data_ready(&mut self) -> Result<bool, SimError> {
        if self.running.is_none() {
            return Err(SimError::NotStarted);
        }
        let period = Duration::from_millis(self.profile.polling_period_ms().into());
        Ok(self.last_frame.elapsed() >= period)
    }

    async fn get_distance(&mut self, result: &mut RangingResult) -> Result<bool, SimError> {
        let Some(mode) = self.running else {
            return Err(SimError::NotStarted);
        };

        if !self.is_data_ready().await? {
            if mode.is_async() {
                return Ok(false);
            }
            let period = Duration::from_millis(self.profile.polling_period_ms().into());
            tokio::time::sleep(period.saturating_sub(self.last_frame.elapsed())).await;
        }

        self.last_frame = Instant::now();
        self.render(result);

        if matches!(mode, Mode::AsyncOneShot | Mode::BlockingOneShot) {
            self.running = None;
        }

        Ok(true)
    }
}

/// stdout for output, keys forwarded from a stdin task.
struct Terminal {
    out: Stdout,
    keys: mpsc::UnboundedReceiver<u8>,
}

impl fmt::Write for Terminal {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        if s.ends_with('\n') {
            self.out.flush().map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

impl Console for Terminal {
    fn read_key(&mut self) -> Option<u8> {
        self.keys.try_recv().ok()
    }
}

fn display_mode(arg: Option<&str>) -> anyhow::Result<DisplayMode> {
    Ok(match arg {
        None | Some("rate") => DisplayMode::Rate,
        Some("table") => DisplayMode::Table,
        Some("list") => DisplayMode::ZoneList,
        Some("grid") => DisplayMode::DistanceGrid(None),
        Some("left") => DisplayMode::DistanceGrid(Some(Region::Left)),
        Some("right") => DisplayMode::DistanceGrid(Some(Region::Right)),
        Some("up") => DisplayMode::DistanceGrid(Some(Region::Up)),
        Some(other) => anyhow::bail!(
            "unknown display mode {other:?}, expected rate, table, list, grid, left, right or up"
        ),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let display = display_mode(std::env::args().nth(1).as_deref())?;

    let (tx, keys) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        while let Ok(key) = stdin.read_u8().await {
            if tx.send(key).is_err() {
                break;
            }
        }
    });

    let terminal = Terminal {
        out: std::io::stdout(),
        keys,
    };
    let config = AppConfig {
        display,
        ..AppConfig::default()
    };

    let mut app = SimpleRanging::new(SimulatedSensor::new(), terminal, TokioDelay, Instant::now(), config);

    match app.run().await {
        Ok(never) => match never {},
        Err(e) => Err(e.into()),
    }
}
