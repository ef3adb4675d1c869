//! FEZ Cerbuino (STM32F4, Arduino form factor).
//!
//! Digital and analog headers follow the Arduino numbering.  PWM-capable
//! headers are exposed twice, as `Dn` (GPIO) and `Dnpwm` (timer channel);
//! the two names reach one pin and cannot be claimed together.

use crate::board::{BoardAliasLayer, BoardBuilder};
use crate::chip::ChipFamily;

pub const NAME: &str = "FEZ-Cerbuino";

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

const DIGITAL: &[(&str, &str)] = &[
    ("D0", "GpioPin/PB11"),
    ("D1", "GpioPin/PB10"),
    ("D2", "GpioPin/PB12"),
    ("D3", "GpioPin/PA8"),
    ("D4", "GpioPin/PB8"),
    ("D5", "GpioPin/PC8"),
    ("D6", "GpioPin/PA2"),
    ("D7", "GpioPin/PC3"),
    ("D8", "GpioPin/PB9"),
    ("D9", "GpioPin/PC6"),
    ("D10", "GpioPin/PA15"),
    ("D11", "GpioPin/PA7"),
    ("D12", "GpioPin/PA6"),
    ("D13", "GpioPin/PA5"),
];

const PWM: &[(&str, &str)] = &[
    ("D3pwm", "PwmChannel/TIM1/PA8"),
    ("D5pwm", "PwmChannel/TIM3/PC8"),
    ("D6pwm", "PwmChannel/TIM5/PA2"),
    ("D9pwm", "PwmChannel/TIM3/PC6"),
    ("D10pwm", "PwmChannel/TIM2/PA15"),
];

const ANALOG: &[(&str, &str)] = &[
    ("A0", "AdcChannel/ADC1/PB1"),
    ("A1", "AdcChannel/ADC1/PA5"),
    ("A2", "AdcChannel/ADC1/PB0"),
    ("A3", "AdcChannel/ADC1/PC3"),
    ("A4", "AdcChannel/ADC1/PC1"),
    ("A5", "AdcChannel/ADC1/PA4"),
];

const PERIPHERALS: &[(&str, &str)] = &[
    ("Led1", "GpioPin/PB2"),
    ("Uart", "UartPort/USART3"),
    ("Spi", "SpiBus/SPI1"),
    ("I2c", "I2cBus/I2C1"),
    ("Can", "CanBus/CAN1"),
    ("Usb", "UsbPort/OTG_FS"),
    ("SdCard", "SdCard"),
    ("Rtc", "Rtc"),
];

pub fn layer(chip: &ChipFamily) -> BoardAliasLayer {
    let mut b = BoardBuilder::new(NAME);
    b.reexport_all(chip, DIGITAL)
        .reexport_all(chip, PWM)
        .reexport_all(chip, ANALOG)
        .reexport_all(chip, PERIPHERALS)
        // Legacy name of the first PWM header.
        .same_as("Mod", "D3");

    // XBee socket breaks out the D0/D1 serial pins.
    b.socket("Xbee").same_as("Rx", "D0").same_as("Tx", "D1");
    b.build()
}
