//! The simple ranging application: bring the sensor up, then poll it,
//! print what it measures and react to console commands.

use core::convert::Infallible;
use core::fmt;

use embedded_hal_async::delay::DelayNs;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace, warn};

use crate::{
    button::ButtonFlag,
    command::Command,
    console::{Clock, Console},
    display::{self, Region},
    profile::ProfileConfig,
    sensor::{Capabilities, Mode, RangingResult, RangingSensor},
    wait::WaitForResult,
    Error, POLL_DELAY_MS,
};

/// What gets printed for every new result.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum DisplayMode {
    /// Target and measured refresh rate, see [`display::print_rate`].
    Rate,
    /// Full table, see [`display::print_table`].
    Table,
    /// One line per row, see [`display::print_zone_list`].
    ZoneList,
    /// Upright distance grid, see [`display::print_distance_grid`].
    DistanceGrid(Option<Region>),
    /// Nothing.
    Silent,
}

/// Application settings.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct AppConfig {
    /// Profile pushed to the sensor at start-up.
    pub profile: ProfileConfig,
    /// Mode ranging is started (and restarted) in.
    pub mode: Mode,
    /// How results are printed.
    pub display: DisplayMode,
    /// Pause between two loop iterations (milliseconds).
    pub poll_delay_ms: u32,
    /// Read single-key commands from the console.
    pub commands_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: ProfileConfig::default(),
            mode: Mode::AsyncContinuous,
            display: DisplayMode::Rate,
            poll_delay_ms: POLL_DELAY_MS,
            commands_enabled: true,
        }
    }
}

/// The demo application, owning the sensor and the console.
pub struct SimpleRanging<S, C, D, T> {
    sensor: S,
    console: C,
    delay: D,
    clock: T,
    config: AppConfig,
    capabilities: Capabilities,
    result: RangingResult,
    last_result_ms: u32,
    button: Option<&'static ButtonFlag>,
    button_presses: u32,
}

impl<S, C, D, T> SimpleRanging<S, C, D, T>
where
    S: RangingSensor,
    C: Console,
    D: DelayNs,
    T: Clock,
{
    /// Construct the application without touching the sensor. Call
    /// [`Self::run`], or [`Self::init`] and [`Self::start`] followed by
    /// [`Self::poll_once`].
    pub fn new(sensor: S, console: C, delay: D, clock: T, config: AppConfig) -> Self {
        Self {
            sensor,
            console,
            delay,
            clock,
            config,
            capabilities: Capabilities::default(),
            result: RangingResult::default(),
            last_result_ms: 0,
            button: None,
            button_presses: 0,
        }
    }

    /// Watch a push button latched by an interrupt handler.
    pub fn with_button(mut self, button: &'static ButtonFlag) -> Self {
        self.button = Some(button);
        self
    }

    /// Initialize the sensor. On failure the reason is printed on the
    /// console and [`Error::Init`] is returned.
    #[cfg_attr(feature = "tracing", instrument(err, skip(self)))]
    pub async fn init(&mut self) -> Result<(), Error<S::Error>> {
        if let Err(e) = self.sensor.init().await {
            let _ = self.console.write_str("VL53L8A1_RANGING_SENSOR_Init failed\n");
            let _ = self.console.write_str(
                "Check you're using ONLY the center device soldered on the shield, NO satellite shall be connected !\n",
            );
            return Err(Error::Init(e));
        }

        #[cfg(feature = "tracing")]
        debug!("sensor initialized");

        Ok(())
    }

    /// Identify the sensor, push the profile and start ranging. Only a
    /// failure of the start itself (or an invalid profile) is reported;
    /// the sensor gets the chance to start even if the steps before it
    /// complained.
    #[cfg_attr(feature = "tracing", instrument(err, skip(self)))]
    pub async fn start(&mut self) -> Result<(), Error<S::Error>> {
        if let Err(e) = self.config.profile.validate::<S::Error>() {
            let _ = writeln!(self.console, "Invalid ranging profile {:?}", self.config.profile);
            return Err(e);
        }

        let id = self.sensor.read_id().await;
        #[cfg(feature = "tracing")]
        match &id {
            Ok(id) => debug!("sensor id {:#x}", id),
            Err(e) => warn!("failed to read sensor id: {:?}", e),
        }
        let _ = id;

        match self.sensor.capabilities().await {
            Ok(capabilities) => self.capabilities = capabilities,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                warn!("failed to read capabilities: {:?}", _e);
            }
        }

        #[cfg(feature = "tracing")]
        debug!(capabilities = ?self.capabilities, "capabilities");

        if let Err(_e) = self.sensor.config_profile(&self.config.profile).await {
            #[cfg(feature = "tracing")]
            warn!("failed to apply profile: {:?}", _e);
        }

        if let Err(e) = self.sensor.start(self.config.mode).await {
            let _ = self.console.write_str("VL53L8A1_RANGING_SENSOR_Start failed\n");
            return Err(Error::Start(e));
        }

        self.last_result_ms = self.clock.now_ms();

        Ok(())
    }

    /// One iteration of the polling loop: read a result if there is one
    /// and print it, handle a pending console key and button press, then
    /// wait [`AppConfig::poll_delay_ms`].
    ///
    /// Returns whether a new result was read. A failed read counts as no
    /// result.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub async fn poll_once(&mut self) -> Result<bool, Error<S::Error>> {
        let fresh = match self.sensor.get_distance(&mut self.result).await {
            Ok(fresh) => fresh,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                trace!("read data error: {:?}", _e);
                false
            }
        };

        if fresh {
            self.display_result()?;
        }

        if self.config.commands_enabled {
            if let Some(cmd) = self.console.read_key().and_then(Command::from_key) {
                self.handle_command(cmd).await?;
            }
        }

        if self.button.is_some_and(ButtonFlag::take) {
            self.button_presses = self.button_presses.wrapping_add(1);

            #[cfg(feature = "tracing")]
            debug!(presses = self.button_presses, "button pressed");
        }

        self.delay.delay_ms(self.config.poll_delay_ms).await;

        Ok(fresh)
    }

    /// Initialize, start and poll forever. Returns only if bringing the
    /// sensor up failed; errors while polling are skipped.
    pub async fn run(&mut self) -> Result<Infallible, Error<S::Error>> {
        self.init().await?;
        self.start().await?;

        loop {
            if let Err(_e) = self.poll_once().await {
                #[cfg(feature = "tracing")]
                warn!("poll failed: {}", _e);
                self.delay.delay_ms(self.config.poll_delay_ms).await;
            }
        }
    }

    /// Wait for the next result with `wait` and read it, instead of
    /// polling blindly.
    pub async fn measure<W>(&mut self, wait: &mut W) -> Result<&RangingResult, Error<S::Error>>
    where
        W: WaitForResult<S, D>,
    {
        wait.wait_for_result(&mut self.sensor, &mut self.delay).await?;

        if !self
            .sensor
            .get_distance(&mut self.result)
            .await
            .map_err(Error::Sensor)?
        {
            return Err(Error::Timeout);
        }

        Ok(&self.result)
    }

    /// Print the current result the way [`AppConfig::display`] asks for,
    /// and note when it arrived.
    pub fn display_result(&mut self) -> Result<(), Error<S::Error>> {
        let now = self.clock.now_ms();
        let elapsed = now.wrapping_sub(self.last_result_ms);
        self.last_result_ms = now;

        let profile = &self.config.profile;
        match self.config.display {
            DisplayMode::Rate => display::print_rate(&mut self.console, profile.frequency_hz, elapsed)?,
            DisplayMode::Table => display::print_table(&mut self.console, &self.result, profile)?,
            DisplayMode::ZoneList => display::print_zone_list(&mut self.console, &self.result, profile)?,
            DisplayMode::DistanceGrid(region) => {
                display::print_distance_grid(&mut self.console, &self.result, profile, region)?
            }
            DisplayMode::Silent => {}
        }

        Ok(())
    }

    /// Execute a console command. Toggles stop the sensor, change the
    /// profile and start it again, then every command clears the screen.
    #[cfg_attr(feature = "tracing", instrument(err, skip(self)))]
    pub async fn handle_command(&mut self, cmd: Command) -> Result<(), Error<S::Error>> {
        let restarted = if cmd.reconfigures_sensor() {
            self.reconfigure(cmd).await
        } else {
            Ok(())
        };

        display::clear_screen(&mut self.console)?;

        restarted
    }

    async fn reconfigure(&mut self, cmd: Command) -> Result<(), Error<S::Error>> {
        let stopped = self.sensor.stop().await;

        match cmd {
            Command::ToggleResolution => self.config.profile.toggle_resolution(),
            Command::ToggleSignalAndAmbient => self.config.profile.toggle_signal_and_ambient(),
            Command::ClearScreen => {}
        }
        self.result.clear();

        let configured = self.sensor.config_profile(&self.config.profile).await;
        let started = self.sensor.start(self.config.mode).await;
        if started.is_ok() {
            self.last_result_ms = self.clock.now_ms();
        }

        stopped.and(configured).and(started).map_err(Error::Sensor)
    }

    /// The active configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The active ranging profile.
    pub fn profile(&self) -> &ProfileConfig {
        &self.config.profile
    }

    /// Switch how results are printed.
    pub fn set_display(&mut self, display: DisplayMode) {
        self.config.display = display;
    }

    /// What the sensor reported at start-up.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// The last result read.
    pub fn result(&self) -> &RangingResult {
        &self.result
    }

    /// Button presses seen so far.
    pub fn button_presses(&self) -> u32 {
        self.button_presses
    }

    /// The sensor.
    pub fn sensor(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// The console.
    pub fn console(&mut self) -> &mut C {
        &mut self.console
    }

    /// Give back the sensor and the console.
    pub fn release(self) -> (S, C) {
        (self.sensor, self.console)
    }
}

/// Stop here for good, the way the firmware does after a failed bring-up.
pub fn halt<E: fmt::Debug>(error: Error<E>) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!("halting: {}", error);
    #[cfg(not(feature = "tracing"))]
    let _ = error;

    loop {
        core::hint::spin_loop();
    }
}
