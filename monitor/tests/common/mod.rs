use std::collections::VecDeque;

use adc_monitor::{Board, MuxSelection, BATTERY, VARIABLE_RESISTOR};

/// Board operations as seen from the outside. Switch polls are not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    EnableAdc,
    Toggle,
    Sample(MuxSelection),
    UsbUp,
    UsbDown,
    Write(String),
    Delay(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    Write,
    Sample,
}

/// A scripted board. The switch plays back `switch` one level per poll and holds the last level
/// once the script runs out.
pub struct SimBoard {
    switch: VecDeque<bool>,
    level: bool,
    pub enumerate_after: usize,
    attached: bool,
    polls_since_up: usize,
    pub variable_resistor: u16,
    pub battery: u16,
    /// Bytes the serial endpoint takes per write. `None` takes everything.
    pub write_budget: Option<usize>,
    pub fail_write: bool,
    pub fail_sample: bool,
    pub led: bool,
    pub events: Vec<Event>,
}

impl SimBoard {
    pub fn new(switch: &[bool]) -> Self {
        SimBoard {
            switch: switch.iter().copied().collect(),
            level: false,
            enumerate_after: 0,
            attached: false,
            polls_since_up: 0,
            variable_resistor: 3549,
            battery: 26,
            write_budget: None,
            fail_write: false,
            fail_sample: false,
            led: false,
            events: Vec::new(),
        }
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    pub fn writes(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Write(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Board for SimBoard {
    type Error = SimError;

    fn enable_adc(&mut self) -> Result<(), SimError> {
        self.events.push(Event::EnableAdc);
        Ok(())
    }

    fn switch_asserted(&mut self) -> Result<bool, SimError> {
        if let Some(level) = self.switch.pop_front() {
            self.level = level;
        }
        Ok(self.level)
    }

    fn toggle_led(&mut self) -> Result<(), SimError> {
        self.led = !self.led;
        self.events.push(Event::Toggle);
        Ok(())
    }

    fn sample(&mut self, selection: MuxSelection) -> Result<u16, SimError> {
        if self.fail_sample {
            return Err(SimError::Sample);
        }
        self.events.push(Event::Sample(selection));
        Ok(match selection {
            s if s == VARIABLE_RESISTOR => self.variable_resistor,
            s if s == BATTERY => self.battery,
            _ => 0,
        })
    }

    fn usb_up(&mut self) -> Result<(), SimError> {
        self.attached = true;
        self.polls_since_up = 0;
        self.events.push(Event::UsbUp);
        Ok(())
    }

    fn usb_down(&mut self) -> Result<(), SimError> {
        self.attached = false;
        self.events.push(Event::UsbDown);
        Ok(())
    }

    fn usb_enumerated(&mut self) -> Result<bool, SimError> {
        let done = self.attached && self.polls_since_up >= self.enumerate_after;
        self.polls_since_up += 1;
        Ok(done)
    }

    fn write_line(&mut self, line: &[u8]) -> Result<usize, SimError> {
        if self.fail_write {
            return Err(SimError::Write);
        }
        let taken = line.len().min(self.write_budget.unwrap_or(usize::MAX));
        if taken > 0 {
            let chunk = String::from_utf8(line[..taken].to_vec()).unwrap();
            self.events.push(Event::Write(chunk));
        }
        Ok(taken)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.events.push(Event::Delay(ms));
    }
}
