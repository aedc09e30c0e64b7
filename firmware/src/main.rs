#![no_main]
#![no_std]
#![deny(unsafe_code)]

use defmt_rtt as _;
use panic_halt as _;

use adc_monitor::{Config, Monitor};
use defmt::{error, info};
#[cfg(feature = "fixed-idle-input")]
use adc_monitor::{IdleInput, VARIABLE_RESISTOR};
use feather_m0 as bsp;
use bsp::hal;
use bsp::entry;
use hal::adc::Adc;
use hal::clock::GenericClockController;
use hal::delay::Delay;
use hal::pac::{CorePeripherals, Peripherals};
use hal::usb::UsbBus;
use usb_device::bus::UsbBusAllocator;
use usb_device::device::{UsbDeviceBuilder, UsbVidPid};
use usbd_serial::{SerialPort, USB_CLASS_CDC};

mod board;

use board::{Feather, UsbLink};

// VID and PID are the shared V-USB pair for CDC ACM devices
const USB_VID: u16 = 0x16c0;
const USB_PID: u16 = 0x27dd;
const USB_MANUFACTURER: &str = "Adafruit";
const USB_PRODUCT: &str = "Feather M0 ADC Monitor";
const USB_SERIAL_NUMBER: &str = "0001";

const ENUMERATION_POLL_MS: u32 = 1;
const LOG_EVERY: u32 = 1000;

fn monitor_config() -> Config {
    let config = Config::new()
        .enumeration_poll_ms(ENUMERATION_POLL_MS)
        .log_every(LOG_EVERY);

    #[cfg(feature = "fixed-idle-input")]
    let config = config.idle_input(IdleInput::Fixed(VARIABLE_RESISTOR));

    config
}

#[entry]
fn main() -> ! {
    let mut peripherals = Peripherals::take().unwrap();
    let core = CorePeripherals::take().unwrap();
    // CPU and USB both run from the 48 MHz DFLL locked to the internal 32k oscillator. The ADC
    // clock gets divided down by the HAL's prescaler.
    let mut clocks = GenericClockController::with_internal_32kosc(
        peripherals.GCLK,
        &mut peripherals.PM,
        &mut peripherals.SYSCTRL,
        &mut peripherals.NVMCTRL,
    );
    let delay = Delay::new(core.SYST, &mut clocks);

    let pins = bsp::Pins::new(peripherals.PORT);
    let switch = pins.d11.into_pull_down_input();
    let led = pins.d13.into_push_pull_output();
    let variable_resistor = pins.a1.into_alternate();
    let battery = pins.d9.into_alternate();

    let adc = Adc::adc(peripherals.ADC, &mut peripherals.PM, &mut clocks);

    let usb_allocator: &'static UsbBusAllocator<UsbBus> = cortex_m::singleton!(
        : UsbBusAllocator<UsbBus> = bsp::usb_allocator(
            peripherals.USB,
            &mut clocks,
            &mut peripherals.PM,
            pins.usb_dm,
            pins.usb_dp,
        )
    )
    .unwrap();

    // `build` enables the bus and attaches to the host. `UsbLink::new` detaches again until the
    // switch is pressed.
    let usb_serial = SerialPort::new(usb_allocator);
    let usb_device = UsbDeviceBuilder::new(usb_allocator, UsbVidPid(USB_VID, USB_PID))
        .manufacturer(USB_MANUFACTURER)
        .product(USB_PRODUCT)
        .serial_number(USB_SERIAL_NUMBER)
        .device_class(USB_CLASS_CDC)
        .build();
    let usb = UsbLink::new(usb_device, usb_serial);

    let mut board = Feather::new(
        adc,
        variable_resistor,
        battery,
        switch,
        led,
        delay,
        usb,
    );

    let mut monitor = Monitor::new(monitor_config());
    if let Err(e) = monitor.start(&mut board) {
        error!("ADC bring-up failed: {}", e);
        panic!();
    }
    info!("monitor running");

    let e = monitor.run(&mut board);
    error!("monitor stopped: {} ({})", e, monitor.stats());
    panic!();
}
