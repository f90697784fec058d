//! Single-key commands accepted on the console.

/// A console command.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Command {
    /// `r`: switch between 4x4 and 8x8.
    ToggleResolution,
    /// `s`: switch signal and ambient reporting on or off.
    ToggleSignalAndAmbient,
    /// `c`: clear the terminal.
    ClearScreen,
}

impl Command {
    /// Parse a received byte. Unknown keys are ignored.
    pub const fn from_key(key: u8) -> Option<Self> {
        match key {
            b'r' => Some(Command::ToggleResolution),
            b's' => Some(Command::ToggleSignalAndAmbient),
            b'c' => Some(Command::ClearScreen),
            _ => None,
        }
    }

    /// The key bound to this command.
    pub const fn key(&self) -> char {
        match self {
            Command::ToggleResolution => 'r',
            Command::ToggleSignalAndAmbient => 's',
            Command::ClearScreen => 'c',
        }
    }

    /// Text shown next to the key in the banner.
    pub const fn help(&self) -> &'static str {
        match self {
            Command::ToggleResolution => "change resolution",
            Command::ToggleSignalAndAmbient => "enable signal and ambient",
            Command::ClearScreen => "clear screen",
        }
    }

    /// Whether the sensor has to be stopped and reconfigured.
    pub const fn reconfigures_sensor(&self) -> bool {
        !matches!(self, Command::ClearScreen)
    }

    /// All commands, in banner order.
    pub const ALL: [Command; 3] = [
        Command::ToggleResolution,
        Command::ToggleSignalAndAmbient,
        Command::ClearScreen,
    ];
}
