//! ADC multiplexer input codes of the SAMD21.

use core::fmt;

/// Positive multiplexer input (`INPUTCTRL.MUXPOS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MuxPos(pub u8);

impl MuxPos {
    /// AIN2, pin PB08 (A1 on the Feather M0).
    pub const AIN2: MuxPos = MuxPos(0x02);
    /// AIN7, pin PA07 (D9 on the Feather M0).
    pub const AIN7: MuxPos = MuxPos(0x07);
}

/// Negative multiplexer input (`INPUTCTRL.MUXNEG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MuxNeg(pub u8);

impl MuxNeg {
    /// Ground reference for single-ended conversions.
    pub const GROUND: MuxNeg = MuxNeg(0x19);
}

/// A complete multiplexer routing: what gets measured against what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MuxSelection {
    positive: MuxPos,
    negative: MuxNeg,
}

impl MuxSelection {
    pub const fn new(positive: MuxPos, negative: MuxNeg) -> Self {
        MuxSelection { positive, negative }
    }

    pub const fn positive(&self) -> MuxPos {
        self.positive
    }

    pub const fn negative(&self) -> MuxNeg {
        self.negative
    }
}

impl fmt::Display for MuxSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}/{:#04x}", self.positive.0, self.negative.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MuxSelection {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u8:#x}/{=u8:#x}", self.positive.0, self.negative.0)
    }
}

/// The variable resistor divider on AIN2.
pub const VARIABLE_RESISTOR: MuxSelection = MuxSelection::new(MuxPos::AIN2, MuxNeg::GROUND);

/// The battery divider on AIN7.
pub const BATTERY: MuxSelection = MuxSelection::new(MuxPos::AIN7, MuxNeg::GROUND);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_selections_use_board_codes() {
        assert_eq!(VARIABLE_RESISTOR.positive(), MuxPos(0x02));
        assert_eq!(BATTERY.positive(), MuxPos(0x07));
        assert_eq!(VARIABLE_RESISTOR.negative(), MuxNeg(0x19));
        assert_eq!(BATTERY.negative(), MuxNeg(0x19));
        assert_ne!(VARIABLE_RESISTOR, BATTERY);
    }

    #[test]
    fn display_shows_both_codes() {
        assert_eq!(BATTERY.to_string(), "0x07/0x19");
    }
}
