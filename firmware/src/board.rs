use core::convert::Infallible;

use adc_monitor::{
    Board, LinkSession, LinkState, MuxNeg, MuxSelection, BATTERY, VARIABLE_RESISTOR,
};
use derive_more::From;
use embedded_hal::adc::OneShot;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::{InputPin, ToggleableOutputPin};
use feather_m0::hal;
use hal::adc::{Adc, Gain, Reference, Resolution, SampleRate};
use hal::delay::Delay;
use hal::gpio::{AlternateB, Pin, PullDownInput, PushPullOutput, PA07, PA16, PA17, PB08};
use hal::pac::{ADC, USB};
use hal::usb::UsbBus;
use usb_device::device::{UsbDevice, UsbDeviceState};
use usb_device::UsbError;
use usbd_serial::SerialPort;

pub type VariableResistorPin = Pin<PB08, AlternateB>;
pub type BatteryPin = Pin<PA07, AlternateB>;
pub type EnableSwitch = Pin<PA16, PullDownInput>;
pub type StatusLed = Pin<PA17, PushPullOutput>;

#[derive(Debug, From)]
pub enum BoardError {
    /// GPIO errors. The SAMD21 pins never fail.
    Infallible(Infallible),
    Usb(UsbError),
    /// The ADC refused a conversion.
    #[from(ignore)]
    Adc,
    /// No pin on this board is wired to the requested multiplexer input.
    #[from(ignore)]
    UnroutedInput(MuxSelection),
}

impl defmt::Format for BoardError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            BoardError::Infallible(_) => defmt::write!(f, "Infallible error encountered!"),
            BoardError::Usb(e) => defmt::write!(f, "USB error: {}", defmt::Debug2Format(e)),
            BoardError::Adc => defmt::write!(f, "ADC conversion failed"),
            BoardError::UnroutedInput(selection) => {
                defmt::write!(f, "no pin routed to mux inputs {}", selection)
            }
        }
    }
}

/// USB device plus its one CDC ACM port. While the link is down the pull-up on D+ is off, so
/// the host sees nothing plugged in, and the device is not polled.
pub struct UsbLink {
    device: UsbDevice<'static, UsbBus>,
    serial: SerialPort<'static, UsbBus>,
    session: LinkSession,
}

impl UsbLink {
    /// Takes a freshly built device and detaches it again. Building enables the bus, which
    /// attaches to the host straight away.
    pub fn new(device: UsbDevice<'static, UsbBus>, serial: SerialPort<'static, UsbBus>) -> Self {
        set_detached(true);
        UsbLink {
            device,
            serial,
            session: LinkSession::new(),
        }
    }

    fn up(&mut self) {
        self.session.up();
        set_detached(false);
    }

    fn down(&mut self) {
        set_detached(true);
        self.session.down();
    }

    // Throw away incoming data
    fn poll(&mut self) -> Result<(), UsbError> {
        if !self.session.is_up() {
            return Ok(());
        }

        let has_data = self.device.poll(&mut [&mut self.serial]);
        self.session.observe(link_state(self.device.state()));
        if !has_data {
            return Ok(());
        }

        let mut buf = [0; 64];
        loop {
            match self.serial.read(&mut buf) {
                Ok(0) | Err(UsbError::WouldBlock) => return Ok(()),
                Ok(_) => {}
                Err(e) => return Err(e),
            }
        }
    }
}

fn link_state(state: UsbDeviceState) -> LinkState {
    match state {
        UsbDeviceState::Default => LinkState::Default,
        UsbDeviceState::Addressed => LinkState::Addressed,
        UsbDeviceState::Configured => LinkState::Configured,
        UsbDeviceState::Suspend => LinkState::Suspend,
    }
}

/// Drives `CTRLB.DETACH`. The HAL only clears it once, when the bus is enabled.
#[allow(unsafe_code)]
fn set_detached(detached: bool) {
    // SAFETY: a single read-modify-write of CTRLB from the main loop. The HAL's USB driver is
    // only entered from the same loop, through `UsbDevice::poll`.
    let usb = unsafe { &*USB::ptr() }.device();
    usb.ctrlb.modify(|_, w| w.detach().bit(detached));
}

pub struct Feather {
    adc: Adc<ADC>,
    variable_resistor: VariableResistorPin,
    battery: BatteryPin,
    switch: EnableSwitch,
    led: StatusLed,
    delay: Delay,
    usb: UsbLink,
}

impl Feather {
    pub fn new(
        adc: Adc<ADC>,
        variable_resistor: VariableResistorPin,
        battery: BatteryPin,
        switch: EnableSwitch,
        led: StatusLed,
        delay: Delay,
        usb: UsbLink,
    ) -> Self {
        Feather {
            adc,
            variable_resistor,
            battery,
            switch,
            led,
            delay,
            usb,
        }
    }
}

impl Board for Feather {
    type Error = BoardError;

    fn enable_adc(&mut self) -> Result<(), BoardError> {
        // 12 bit, single sample, full range against VDDANA / 1.48.
        self.adc.samples(SampleRate::_1);
        self.adc.resolution(Resolution::_12BIT);
        self.adc.gain(Gain::_1X);
        self.adc.reference(Reference::INTVCC0);
        Ok(())
    }

    fn switch_asserted(&mut self) -> Result<bool, BoardError> {
        Ok(InputPin::is_high(&self.switch)?)
    }

    fn toggle_led(&mut self) -> Result<(), BoardError> {
        Ok(ToggleableOutputPin::toggle(&mut self.led)?)
    }

    fn sample(&mut self, selection: MuxSelection) -> Result<u16, BoardError> {
        // The HAL converts single ended, so only ground can be the negative input.
        if selection.negative() != MuxNeg::GROUND {
            return Err(BoardError::UnroutedInput(selection));
        }

        let counts: Result<u16, ()> = if selection == VARIABLE_RESISTOR {
            nb::block!(OneShot::read(&mut self.adc, &mut self.variable_resistor))
        } else if selection == BATTERY {
            nb::block!(OneShot::read(&mut self.adc, &mut self.battery))
        } else {
            return Err(BoardError::UnroutedInput(selection));
        };

        counts.map_err(|()| BoardError::Adc)
    }

    fn usb_up(&mut self) -> Result<(), BoardError> {
        self.usb.up();
        Ok(())
    }

    fn usb_down(&mut self) -> Result<(), BoardError> {
        self.usb.down();
        Ok(())
    }

    fn usb_enumerated(&mut self) -> Result<bool, BoardError> {
        self.usb.poll()?;
        Ok(self.usb.session.enumerated())
    }

    fn write_line(&mut self, line: &[u8]) -> Result<usize, BoardError> {
        self.usb.poll()?;
        match self.usb.serial.write(line) {
            Ok(written) => Ok(written),
            Err(UsbError::WouldBlock) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        DelayMs::<u32>::delay_ms(&mut self.delay, ms);
    }
}
