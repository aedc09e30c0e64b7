use crate::mux::MuxSelection;

/// Which inputs the idle branch converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdleInput {
    /// Keep whatever selection was programmed last, as the hardware does when the multiplexer is
    /// left alone. After streaming this is the variable resistor, but any other read in between
    /// changes it.
    #[default]
    Retained,
    /// Always route this selection before converting.
    Fixed(MuxSelection),
}

/// Monitor tuning. Build it with [`Config::new`] and the setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub enumeration_poll_ms: u32,
    pub idle_input: IdleInput,
    pub log_every: u32,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            enumeration_poll_ms: 1,
            idle_input: IdleInput::Retained,
            log_every: 0,
        }
    }

    /// Delay between two enumeration checks. Each check also toggles the LED.
    pub fn enumeration_poll_ms(mut self, ms: u32) -> Self {
        self.enumeration_poll_ms = ms;
        self
    }

    pub fn idle_input(mut self, input: IdleInput) -> Self {
        self.idle_input = input;
        self
    }

    /// Log every `n`th streamed reading at debug level. 0 turns it off.
    pub fn log_every(mut self, n: u32) -> Self {
        self.log_every = n;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
