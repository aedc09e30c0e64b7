use crate::mux::MuxSelection;

/// Hardware capabilities the monitoring loop needs from a board.
///
/// Every call blocks until it is done, except [`Board::write_line`], which never waits for the
/// host. An implementation must not rely on an input selection programmed by an earlier call:
/// [`Board::sample`] is told which inputs to route every time.
pub trait Board {
    type Error;

    /// Enables the ADC channel used for every conversion. Called once, before the first sample.
    fn enable_adc(&mut self) -> Result<(), Self::Error>;

    /// Current level of the USB enable switch. No debouncing.
    fn switch_asserted(&mut self) -> Result<bool, Self::Error>;

    fn toggle_led(&mut self) -> Result<(), Self::Error>;

    /// Routes `selection` through the ADC multiplexer and runs one blocking conversion.
    fn sample(&mut self, selection: MuxSelection) -> Result<u16, Self::Error>;

    /// Brings up the USB device stack so the host can enumerate the serial port.
    fn usb_up(&mut self) -> Result<(), Self::Error>;

    /// Tears down the USB device stack.
    fn usb_down(&mut self) -> Result<(), Self::Error>;

    /// Whether the host has configured the CDC ACM function since the last
    /// [`Board::usb_up`]. A configuration left over from an earlier session does not count.
    fn usb_enumerated(&mut self) -> Result<bool, Self::Error>;

    /// Offers `line` to the serial endpoint and returns how many bytes it took. Returns 0 when
    /// the endpoint is full, for example because no terminal is reading the port.
    fn write_line(&mut self, line: &[u8]) -> Result<usize, Self::Error>;

    fn delay_ms(&mut self, ms: u32);
}
