//! Console renderers. Everything here writes plain text (with a few ANSI
//! escapes) to any [`core::fmt::Write`].

use core::fmt::{self, Write};

use crate::{
    command::Command,
    profile::ProfileConfig,
    sensor::{RangingResult, ZoneResult, NB_TARGETS_PER_ZONE, STATUS_VALID},
};

const ESC: char = '\x1b';
const GREEN: &str = "\x1b[38;5;10m";
const RESET: &str = "\x1b[0m";
const CELL_TOP: &str = " -----------------";
const CELL_BLANK: &str = "|                 ";

/// Side of the field of view. Defined on the 8x8 grid, as seen after
/// [`distance_grid`] has turned the image upright.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Region {
    /// Rows 2 to 5, columns 0 to 3.
    Left,
    /// Rows 2 to 5, columns 4 to 7.
    Right,
    /// Rows 0 to 4, columns 2 to 5.
    Up,
}

impl Region {
    /// Whether the zone at `row`, `col` belongs to this region.
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        match self {
            Region::Left => row > 1 && row < 6 && col < 4,
            Region::Right => row > 1 && row < 6 && col > 3,
            Region::Up => row < 5 && col > 1 && col < 6,
        }
    }
}

/// Erase the whole terminal.
pub fn clear_screen<W: Write + ?Sized>(w: &mut W) -> fmt::Result {
    write!(w, "{}[2J", ESC)
}

/// Move the cursor home and print the application title and key bindings.
pub fn commands_banner<W: Write + ?Sized>(w: &mut W) -> fmt::Result {
    write!(w, "{}[2H", ESC)?;

    w.write_str("53L8A1 Simple Ranging demo application\n")?;
    w.write_str("--------------------------------------\n\n")?;

    w.write_str("Use the following keys to control application\n")?;
    for cmd in Command::ALL {
        writeln!(w, " '{}' : {}", cmd.key(), cmd.help())?;
    }
    w.write_str("\n")
}

/// Target and measured refresh rate, one line per result.
///
/// `elapsed_ms` is the time since the previous result. Zero is counted as
/// one millisecond.
pub fn print_rate<W: Write + ?Sized>(w: &mut W, target_hz: u32, elapsed_ms: u32) -> fmt::Result {
    write!(w, "{} {} \r\n", target_hz, 1000 / elapsed_ms.max(1))
}

/// Full-screen table: banner, legend, then one bordered cell per zone.
///
/// Zones of a row are printed from the highest index down, which shows
/// the scene the right way round since the sensor sees it mirrored.
pub fn print_table<W: Write + ?Sized>(
    w: &mut W,
    result: &RangingResult,
    profile: &ProfileConfig,
) -> fmt::Result {
    let zones_per_line = profile.profile.zones_per_line();
    let aux = profile.shows_signal_or_ambient();

    commands_banner(w)?;

    w.write_str("Cell Format :\n\n")?;
    for _ in 0..NB_TARGETS_PER_ZONE {
        writeln!(w, " {}{:>20}{} : {:>20}", GREEN, "Distance [mm]", RESET, "Status")?;
        if aux {
            writeln!(w, " {:>20} : {:>20}", "Signal [kcps/spad]", "Ambient [kcps/spad]")?;
        }
    }

    w.write_str("\n\n")?;

    for row_start in (0..result.number_of_zones).step_by(zones_per_line) {
        border(w, zones_per_line)?;

        for _ in 0..zones_per_line {
            w.write_str(CELL_BLANK)?;
        }
        w.write_str("|\n")?;

        for target in 0..NB_TARGETS_PER_ZONE {
            for k in (0..zones_per_line).rev() {
                match detected(result, row_start + k) {
                    Some(zone) => write!(
                        w,
                        "| {}{:5}{}  :  {:5} ",
                        GREEN, zone.distance_mm[target], RESET, zone.status[target]
                    )?,
                    None => write!(w, "| {:>5}  :  {:>5} ", "X", "X")?,
                }
            }
            w.write_str("|\n")?;

            if aux {
                for k in (0..zones_per_line).rev() {
                    match detected(result, row_start + k) {
                        Some(zone) => {
                            if profile.enable_signal {
                                write!(w, "| {:5}  :  ", zone.signal[target])?;
                            } else {
                                write!(w, "| {:>5}  :  ", "X")?;
                            }

                            if profile.enable_ambient {
                                write!(w, "{:5} ", zone.ambient[target])?;
                            } else {
                                write!(w, "{:>5} ", "X")?;
                            }
                        }
                        None => write!(w, "| {:>5}  :  {:>5} ", "X", "X")?,
                    }
                }
                w.write_str("|\n")?;
            }
        }
    }

    border(w, zones_per_line)
}

/// Compact dump: one line per row, each zone as
/// `distance(status)(ambient/signal)`.
pub fn print_zone_list<W: Write + ?Sized>(
    w: &mut W,
    result: &RangingResult,
    profile: &ProfileConfig,
) -> fmt::Result {
    let zones_per_line = profile.profile.zones_per_line();
    let empty = ZoneResult::default();

    for row in 0..zones_per_line {
        for col in 0..zones_per_line {
            let zone = result.zone(row * zones_per_line + col).unwrap_or(&empty);
            write!(
                w,
                "{:5}({:2})({:5}/{:5}) ",
                zone.distance_mm[0], zone.status[0], zone.ambient[0], zone.signal[0]
            )?;
        }
        w.write_str("\r\n")?;
    }
    w.write_str("\r\n")
}

/// Distances of the first target turned 180 degrees, so row 0 is the top
/// of the scene and column 0 its left side. Zones without a valid status
/// read 0, and so do zones outside `region` when one is given. Only the
/// top-left `zones_per_line` square is used for 4x4 profiles.
pub fn distance_grid(
    result: &RangingResult,
    profile: &ProfileConfig,
    region: Option<Region>,
) -> [[u32; 8]; 8] {
    let n = profile.profile.zones_per_line();
    let mut grid = [[0u32; 8]; 8];

    for (row, line) in grid.iter_mut().enumerate().take(n) {
        for (col, cell) in line.iter_mut().enumerate().take(n) {
            if region.is_some_and(|r| !r.contains(row, col)) {
                continue;
            }

            let index = (n - 1 - row) * n + (n - 1 - col);
            *cell = match result.zone(index) {
                Some(zone) if zone.status[0] == STATUS_VALID => zone.distance_mm[0],
                _ => 0,
            };
        }
    }

    grid
}

/// Print [`distance_grid`] as rows of space separated millimeters.
pub fn print_distance_grid<W: Write + ?Sized>(
    w: &mut W,
    result: &RangingResult,
    profile: &ProfileConfig,
    region: Option<Region>,
) -> fmt::Result {
    let n = profile.profile.zones_per_line();
    let grid = distance_grid(result, profile, region);

    for line in grid.iter().take(n) {
        for distance in line.iter().take(n) {
            write!(w, "{} ", distance)?;
        }
        w.write_str("\r\n")?;
    }
    w.write_str("\r\n")
}

fn border<W: Write + ?Sized>(w: &mut W, zones_per_line: usize) -> fmt::Result {
    for _ in 0..zones_per_line {
        w.write_str(CELL_TOP)?;
    }
    w.write_str("\n")
}

/// The zone at `index` if it holds at least one target.
fn detected(result: &RangingResult, index: usize) -> Option<&ZoneResult> {
    result.zone(index).filter(|zone| zone.number_of_targets > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RangingProfile;
    use std::string::String;
    use std::vec::Vec;

    fn result_4x4() -> RangingResult {
        let mut result = RangingResult {
            number_of_zones: 16,
            ..RangingResult::default()
        };
        for (i, zone) in result.zones.iter_mut().take(16).enumerate() {
            zone.number_of_targets = 1;
            zone.distance_mm[0] = 100 + i as u32;
            zone.signal[0] = 500 + i as u32;
            zone.ambient[0] = 7;
        }
        result
    }

    fn profile_4x4() -> ProfileConfig {
        ProfileConfig {
            profile: RangingProfile::Res4x4Continuous,
            ..ProfileConfig::default()
        }
    }

    #[test]
    fn rate_line() {
        let mut out = String::new();
        print_rate(&mut out, 30, 33).unwrap();
        print_rate(&mut out, 30, 0).unwrap();
        assert_eq!(out, "30 30 \r\n30 1000 \r\n");
    }

    #[test]
    fn banner_lists_every_command() {
        let mut out = String::new();
        commands_banner(&mut out).unwrap();
        assert!(out.starts_with("\x1b[2H53L8A1 Simple Ranging demo application\n"));
        assert!(out.contains(" 'r' : change resolution\n"));
        assert!(out.contains(" 's' : enable signal and ambient\n"));
        assert!(out.contains(" 'c' : clear screen\n"));

        let mut out = String::new();
        clear_screen(&mut out).unwrap();
        assert_eq!(out, "\x1b[2J");
    }

    #[test]
    fn table_rows_are_mirrored() {
        let mut out = String::new();
        print_table(&mut out, &result_4x4(), &profile_4x4()).unwrap();

        let first_row = out
            .lines()
            .find(|l| l.contains("103"))
            .expect("first row of zones");
        let cells: Vec<&str> = first_row.split('|').filter(|c| !c.is_empty()).collect();
        assert_eq!(cells.len(), 4);
        assert!(cells[0].contains("  103"));
        assert!(cells[3].contains("  100"));
        assert!(first_row.ends_with('|'));

        // 4 rows of zones plus the closing border
        assert_eq!(out.lines().filter(|l| l.starts_with(" ---")).count(), 5);
        assert!(out.contains("|   515  :      7 "));
    }

    #[test]
    fn table_marks_missing_targets_and_disabled_channels() {
        let mut result = result_4x4();
        result.zones[0].number_of_targets = 0;
        let profile = ProfileConfig {
            enable_signal: false,
            ..profile_4x4()
        };

        let mut out = String::new();
        print_table(&mut out, &result, &profile).unwrap();
        assert!(out.contains("|     X  :      X |"));
        assert!(out.contains("|     X  :      7 "));
        assert!(out.contains("Signal [kcps/spad]"));
    }

    #[test]
    fn table_without_auxiliary_lines() {
        let profile = ProfileConfig {
            enable_signal: false,
            enable_ambient: false,
            ..profile_4x4()
        };

        let mut out = String::new();
        print_table(&mut out, &result_4x4(), &profile).unwrap();
        assert!(!out.contains("Signal [kcps/spad]"));
        assert!(!out.contains("515"));
        for distance in 100..116 {
            assert!(out.contains(&std::format!("{:5}", distance)));
        }
    }

    #[test]
    fn zone_list_contains_every_distance() {
        let mut out = String::new();
        print_zone_list(&mut out, &result_4x4(), &profile_4x4()).unwrap();

        let lines: Vec<&str> = out.split("\r\n").collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "  100( 0)(    7/  500)   101( 0)(    7/  501)   102( 0)(    7/  502)   103( 0)(    7/  503) ");
        assert!(lines[3].starts_with("  112( 0)"));
    }

    #[test]
    fn grid_is_rotated() {
        let grid = distance_grid(&result_4x4(), &profile_4x4(), None);
        assert_eq!(grid[0][..4], [115, 114, 113, 112]);
        assert_eq!(grid[3][..4], [103, 102, 101, 100]);
        assert_eq!(grid[4], [0; 8]);
    }

    #[test]
    fn grid_drops_invalid_zones_and_applies_region() {
        let mut result = RangingResult {
            number_of_zones: 64,
            ..RangingResult::default()
        };
        for zone in result.zones.iter_mut() {
            zone.number_of_targets = 1;
            zone.distance_mm[0] = 1000;
        }
        result.zones[63].status[0] = 4;

        let profile = ProfileConfig::default();
        let grid = distance_grid(&result, &profile, None);
        assert_eq!(grid[0][0], 0);
        assert_eq!(grid[7][7], 1000);

        let up = distance_grid(&result, &profile, Some(Region::Up));
        for (row, line) in up.iter().enumerate() {
            for (col, &d) in line.iter().enumerate() {
                let expected = if Region::Up.contains(row, col) { 1000 } else { 0 };
                assert_eq!(d, expected, "zone {row},{col}");
            }
        }

        let mut out = String::new();
        print_distance_grid(&mut out, &result, &profile, Some(Region::Up)).unwrap();
        assert!(out.starts_with("0 0 1000 1000 1000 1000 0 0 \r\n"));
        assert!(out.ends_with("0 0 0 0 0 0 0 0 \r\n\r\n"));
    }

    #[test]
    fn regions() {
        assert!(Region::Left.contains(2, 0));
        assert!(!Region::Left.contains(1, 0));
        assert!(!Region::Left.contains(2, 4));
        assert!(Region::Right.contains(5, 7));
        assert!(!Region::Right.contains(6, 7));
        assert!(Region::Up.contains(0, 2));
        assert!(!Region::Up.contains(5, 2));
        assert!(!Region::Up.contains(0, 6));
    }
}
