//! FEZ Lemur (G30 module, Arduino form factor).
//!
//! Built on the G30 layer rather than the bare chip; the module's names
//! stay reachable under `G30/`.

use crate::board::{BoardAliasLayer, BoardBuilder};
use crate::chip::ChipFamily;

use super::g30;

pub const NAME: &str = "FEZ-Lemur";

const DIGITAL: &[(&str, &str)] = &[
    ("D0", "GpioPin/PA10"),
    ("D1", "GpioPin/PA9"),
    ("D2", "GpioPin/PC12"),
    ("D3", "GpioPin/PA8"),
    ("D4", "GpioPin/PB2"),
    ("D5", "GpioPin/PB5"),
    ("D6", "GpioPin/PB1"),
    ("D7", "GpioPin/PC14"),
    ("D8", "GpioPin/PC15"),
    ("D9", "GpioPin/PB0"),
    ("D10", "GpioPin/PA15"),
    ("D11", "GpioPin/PB15"),
    ("D12", "GpioPin/PB14"),
    ("D13", "GpioPin/PB13"),
];

const PWM: &[(&str, &str)] = &[
    ("D3pwm", "PwmChannel/TIM1/PA8"),
    ("D5pwm", "PwmChannel/TIM3/PB5"),
    ("D6pwm", "PwmChannel/TIM3/PB1"),
    ("D9pwm", "PwmChannel/TIM3/PB0"),
    ("D10pwm", "PwmChannel/TIM2/PA15"),
];

const ANALOG: &[(&str, &str)] = &[
    ("A0", "AdcChannel/ADC1/PA0"),
    ("A1", "AdcChannel/ADC1/PA1"),
    ("A2", "AdcChannel/ADC1/PA2"),
    ("A3", "AdcChannel/ADC1/PA3"),
    ("A4", "AdcChannel/ADC1/PA4"),
    ("A5", "AdcChannel/ADC1/PA5"),
];

const PERIPHERALS: &[(&str, &str)] = &[
    ("Led1", "Led"),
    ("Uart", "UartPort/USART1"),
    ("Spi", "SpiBus/SPI2"),
    ("I2c", "I2cBus/I2C1"),
    ("Usb", "UsbPort/OTG_FS"),
    ("SdCard", "SdCard"),
];

pub fn layer(chip: &ChipFamily) -> BoardAliasLayer {
    let module = g30::layer(chip);
    let mut b = BoardBuilder::new(NAME);
    b.import_under(&module, "G30")
        .reexport_all(&module, DIGITAL)
        .reexport_all(&module, PWM)
        .reexport_all(&module, ANALOG)
        .reexport_all(&module, PERIPHERALS);
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chips::stm32f401;
    use crate::config::ResolverConfig;
    use crate::path::AliasPath;
    use crate::resolver::validate;

    #[test]
    fn module_names_are_nested() {
        let chip = stm32f401::chip().unwrap();
        let board = validate(&layer(&chip), &chip, &ResolverConfig::default()).unwrap();
        let nested = board.get(&AliasPath::parse("G30.GpioPin.PA8").unwrap()).unwrap();
        let d3 = board.get(&AliasPath::parse("D3").unwrap()).unwrap();
        assert_eq!(nested.target, d3.target);
    }

    #[test]
    fn led_follows_the_module() {
        let chip = stm32f401::chip().unwrap();
        let board = validate(&layer(&chip), &chip, &ResolverConfig::strict()).unwrap();
        let led = board.get(&AliasPath::parse("Led1").unwrap()).unwrap();
        let module_led = board.get(&AliasPath::parse("G30/Led").unwrap()).unwrap();
        assert_eq!(led.target, module_led.target);
        assert!(board.shared_targets().is_empty());
    }
}
