//! The monitoring state machine.
//!
//! ```text
//! Idle --switch on--> Enumerating --configured--> Streaming
//!  ^                       |                          |
//!  +-------switch off------+----------switch off------+
//! ```
//!
//! Each call to [`Monitor::step`] does the work of one pass of the firmware's main loop and
//! reports what happened as a [`Step`]. The switch is polled at the start of every step, so a
//! release is seen before the next line is written.

use crate::board::Board;
use crate::config::{Config, IdleInput};
use crate::error::Error;
use crate::mux::{MuxSelection, BATTERY, VARIABLE_RESISTOR};
use crate::report::{counts_to_millivolts, Reading, DEFAULT_VREF_MV};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Switch released. Sample one input and blink.
    Idle,
    /// USB is up, waiting for the host to configure the serial port.
    Enumerating,
    /// Writing one reading per step to the serial port.
    Streaming,
}

/// What a single [`Monitor::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Idle sample taken and the LED toggled.
    Sampled(u16),
    /// Switch asserted, USB brought up.
    Attached,
    /// Still waiting for enumeration. The LED was toggled and the poll delay spent.
    Waiting,
    /// The host configured the serial port.
    Enumerated,
    /// A reading was offered to the serial port and the LED toggled.
    Reported(Reading),
    /// Switch released, USB torn down.
    Detached,
}

/// Running counters, mostly useful when debugging on the bench.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    pub idle_samples: u32,
    pub attaches: u32,
    pub enumerations: u32,
    pub reports: u32,
    /// Reports the serial endpoint did not take in full.
    pub dropped_lines: u32,
    pub detaches: u32,
    /// Idle periods that converted something other than the variable resistor.
    pub stale_idle_warnings: u32,
}

pub struct Monitor {
    config: Config,
    state: State,
    mux: MuxSelection,
    stats: Stats,
    retained_warned: bool,
}

impl Monitor {
    pub fn new(config: Config) -> Self {
        Monitor {
            config,
            state: State::Idle,
            mux: VARIABLE_RESISTOR,
            stats: Stats::default(),
            retained_warned: false,
        }
    }

    /// Enables the ADC. Must be called once before the first [`Monitor::step`].
    pub fn start<B: Board>(&mut self, board: &mut B) -> Result<(), Error<B::Error>> {
        board.enable_adc().map_err(Error::Board)?;
        self.mux = VARIABLE_RESISTOR;
        info!("ADC enabled, inputs {}", self.mux);
        Ok(())
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// The selection programmed by the most recent sample.
    pub fn mux(&self) -> MuxSelection {
        self.mux
    }

    /// Converts `selection` once. The selection is remembered and is what the idle branch reads
    /// next when configured with [`IdleInput::Retained`].
    pub fn sample<B: Board>(
        &mut self,
        board: &mut B,
        selection: MuxSelection,
    ) -> Result<u16, Error<B::Error>> {
        self.mux = selection;
        board.sample(selection).map_err(Error::Board)
    }

    /// Runs one pass of the loop.
    pub fn step<B: Board>(&mut self, board: &mut B) -> Result<Step, Error<B::Error>> {
        let asserted = board.switch_asserted().map_err(Error::Board)?;

        match self.state {
            State::Idle if asserted => self.attach(board),
            State::Idle => self.idle(board),
            State::Enumerating | State::Streaming if !asserted => self.detach(board),
            State::Enumerating => self.wait_for_enumeration(board),
            State::Streaming => self.report(board),
        }
    }

    /// Steps forever. Only returns when the board reports an error.
    pub fn run<B: Board>(&mut self, board: &mut B) -> Error<B::Error> {
        loop {
            if let Err(e) = self.step(board) {
                return e;
            }
        }
    }

    fn idle<B: Board>(&mut self, board: &mut B) -> Result<Step, Error<B::Error>> {
        let selection = match self.config.idle_input {
            IdleInput::Retained => self.mux,
            IdleInput::Fixed(selection) => selection,
        };

        if selection != VARIABLE_RESISTOR && !self.retained_warned {
            warn!("idle branch converting {}, not the variable resistor", selection);
            self.retained_warned = true;
            self.stats.stale_idle_warnings = self.stats.stale_idle_warnings.wrapping_add(1);
        }

        let counts = self.sample(board, selection)?;
        board.toggle_led().map_err(Error::Board)?;
        self.stats.idle_samples = self.stats.idle_samples.wrapping_add(1);

        Ok(Step::Sampled(counts))
    }

    fn attach<B: Board>(&mut self, board: &mut B) -> Result<Step, Error<B::Error>> {
        board.usb_up().map_err(Error::Board)?;
        self.state = State::Enumerating;
        self.retained_warned = false;
        self.stats.attaches = self.stats.attaches.wrapping_add(1);
        info!("switch on, USB up");

        Ok(Step::Attached)
    }

    fn wait_for_enumeration<B: Board>(&mut self, board: &mut B) -> Result<Step, Error<B::Error>> {
        if board.usb_enumerated().map_err(Error::Board)? {
            self.state = State::Streaming;
            self.stats.enumerations = self.stats.enumerations.wrapping_add(1);
            info!("serial port configured, streaming");
            return Ok(Step::Enumerated);
        }

        board.toggle_led().map_err(Error::Board)?;
        board.delay_ms(self.config.enumeration_poll_ms);

        Ok(Step::Waiting)
    }

    fn report<B: Board>(&mut self, board: &mut B) -> Result<Step, Error<B::Error>> {
        let battery = self.sample(board, BATTERY)?;
        let variable_resistor = self.sample(board, VARIABLE_RESISTOR)?;
        let reading = Reading::new(variable_resistor, battery);

        let line = reading.format_line();
        if !write_all(board, line.as_bytes())? {
            self.stats.dropped_lines = self.stats.dropped_lines.wrapping_add(1);
        }
        board.toggle_led().map_err(Error::Board)?;
        self.stats.reports = self.stats.reports.wrapping_add(1);

        let every = self.config.log_every;
        if every != 0 && self.stats.reports % every == 0 {
            debug!(
                "line {}: variable resistor {} mV, battery {} mV",
                self.stats.reports,
                counts_to_millivolts(variable_resistor, DEFAULT_VREF_MV),
                counts_to_millivolts(battery, DEFAULT_VREF_MV)
            );
        }

        Ok(Step::Reported(reading))
    }

    fn detach<B: Board>(&mut self, board: &mut B) -> Result<Step, Error<B::Error>> {
        board.usb_down().map_err(Error::Board)?;
        self.state = State::Idle;
        self.stats.detaches = self.stats.detaches.wrapping_add(1);
        info!("switch off, USB down");

        Ok(Step::Detached)
    }
}

/// Feeds `line` to the board for as long as it takes bytes and reports whether all of it went
/// out. Whatever the board does not take is dropped.
fn write_all<B: Board>(board: &mut B, line: &[u8]) -> Result<bool, Error<B::Error>> {
    let mut remaining = line;
    while !remaining.is_empty() {
        let written = board.write_line(remaining).map_err(Error::Board)?;
        if written == 0 {
            return Ok(false);
        }
        remaining = &remaining[written.min(remaining.len())..];
    }
    Ok(true)
}

impl Default for Monitor {
    fn default() -> Self {
        Monitor::new(Config::default())
    }
}
