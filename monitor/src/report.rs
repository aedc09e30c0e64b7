//! The text line streamed over the USB serial port.

use core::fmt::Write;

use heapless::String;

/// Size of the buffer a report line is formatted into.
pub const LINE_CAPACITY: usize = 200;

pub type Line = String<LINE_CAPACITY>;

/// Length of the line for two five-digit counts, the widest a `u16` pair gets.
pub const LONGEST_LINE: usize = 58;

const _: () = assert!(LONGEST_LINE <= LINE_CAPACITY);

/// Nominal ADC reference of the board: VDDANA (3.314 V) / 1.48.
pub const DEFAULT_VREF_MV: u32 = 2239;

const FULL_SCALE: u64 = 4095;

/// One streaming iteration worth of raw ADC counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reading {
    pub variable_resistor: u16,
    pub battery: u16,
}

impl Reading {
    pub fn new(variable_resistor: u16, battery: u16) -> Self {
        Reading {
            variable_resistor,
            battery,
        }
    }

    /// Formats the reading the way a terminal program on the host expects it, counts
    /// zero-padded to four digits and the line ending as `\n\r`.
    pub fn format_line(&self) -> Line {
        let mut line = Line::new();
        // Never longer than LONGEST_LINE, so the buffer cannot run out.
        write!(
            line,
            "ADC Values : Variable Resistor : {:04}, Battery : {:04} \n\r",
            self.variable_resistor, self.battery
        )
        .ok();
        line
    }
}

/// Converts a 12-bit result to millivolts for a reference of `vref_mv`. Counts above full scale
/// give values above `vref_mv`, saturating at `u32::MAX`.
pub fn counts_to_millivolts(counts: u16, vref_mv: u32) -> u32 {
    u32::try_from(u64::from(counts) * u64::from(vref_mv) / FULL_SCALE).unwrap_or(u32::MAX)
}
