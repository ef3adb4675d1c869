//! STM32F40x/41x (LQFP64) family.
//!
//! Base chip of the G80 module and the FEZ Cerbuino boards.

use super::{load_bus, load_channels, ChannelTable, SignalTable};
use crate::chip::ChipFamily;
use crate::error::CatalogError;
use crate::resource::signal::{can, i2c, spi, uart, usb};
use crate::resource::{PhysicalResource, ResourceKind};

pub const NAME: &str = "STM32F4";

// ---------------------------------------------------------------------------
// Analog
// ---------------------------------------------------------------------------

const ADC1: ChannelTable = &[
    (0, "PA0"),
    (1, "PA1"),
    (2, "PA2"),
    (3, "PA3"),
    (4, "PA4"),
    (5, "PA5"),
    (6, "PA6"),
    (7, "PA7"),
    (8, "PB0"),
    (9, "PB1"),
    (10, "PC0"),
    (11, "PC1"),
    (12, "PC2"),
    (13, "PC3"),
    (14, "PC4"),
    (15, "PC5"),
];

/// DAC outputs share PA4/PA5 with ADC1 channels 4 and 5.
const DAC: ChannelTable = &[(0, "PA4"), (1, "PA5")];

// ---------------------------------------------------------------------------
// Timers (channel 0 = CH1)
// ---------------------------------------------------------------------------

const TIM1: ChannelTable = &[(0, "PA8"), (1, "PA9"), (2, "PA10"), (3, "PA11")];
const TIM2: ChannelTable = &[(0, "PA15"), (1, "PB3"), (2, "PB10"), (3, "PB11")];
const TIM3: ChannelTable = &[(0, "PC6"), (1, "PC7"), (2, "PC8"), (3, "PC9")];
const TIM4: ChannelTable = &[(0, "PB6"), (1, "PB7"), (2, "PB8"), (3, "PB9")];
const TIM5: ChannelTable = &[(0, "PA0"), (1, "PA1"), (2, "PA2"), (3, "PA3")];
const TIM12: ChannelTable = &[(0, "PB14"), (1, "PB15")];

// ---------------------------------------------------------------------------
// Serial buses
// ---------------------------------------------------------------------------

const USART1: SignalTable = &[("Tx", uart::TX, "PA9"), ("Rx", uart::RX, "PA10")];
const USART2: SignalTable = &[
    ("Tx", uart::TX, "PA2"),
    ("Rx", uart::RX, "PA3"),
    ("Rts", uart::RTS, "PA1"),
    ("Cts", uart::CTS, "PA0"),
];
const USART3: SignalTable = &[("Tx", uart::TX, "PB10"), ("Rx", uart::RX, "PB11")];
const UART4: SignalTable = &[("Tx", uart::TX, "PA0"), ("Rx", uart::RX, "PA1")];
const USART6: SignalTable = &[("Tx", uart::TX, "PC6"), ("Rx", uart::RX, "PC7")];

const I2C1: SignalTable = &[("Sda", i2c::SDA, "PB7"), ("Scl", i2c::SCL, "PB6")];
const I2C2: SignalTable = &[("Sda", i2c::SDA, "PB11"), ("Scl", i2c::SCL, "PB10")];

const SPI1: SignalTable = &[
    ("Sck", spi::SCK, "PA5"),
    ("Miso", spi::MISO, "PA6"),
    ("Mosi", spi::MOSI, "PA7"),
];
const SPI2: SignalTable = &[
    ("Sck", spi::SCK, "PB13"),
    ("Miso", spi::MISO, "PB14"),
    ("Mosi", spi::MOSI, "PB15"),
];
const SPI3: SignalTable = &[
    ("Sck", spi::SCK, "PC10"),
    ("Miso", spi::MISO, "PC11"),
    ("Mosi", spi::MOSI, "PC12"),
];

const CAN1: SignalTable = &[("Tx", can::TX, "PB9"), ("Rx", can::RX, "PB8")];
const CAN2: SignalTable = &[("Tx", can::TX, "PB13"), ("Rx", can::RX, "PB12")];

const OTG_FS: SignalTable = &[
    ("Dm", usb::DM, "PA11"),
    ("Dp", usb::DP, "PA12"),
    ("Id", usb::ID, "PA10"),
    ("Vbus", usb::VBUS, "PA9"),
];

/// Build the family catalog, mux table and raw names.
pub fn chip() -> Result<ChipFamily, CatalogError> {
    let mut chip = ChipFamily::new(NAME);
    for port in ['A', 'B', 'C'] {
        chip.add_gpio_port(port, 16)?;
    }
    chip.add_gpio_port('D', 3)?;

    load_channels(&mut chip, "AdcChannel", ResourceKind::AdcChannel, "ADC1", ADC1)?;
    load_channels(&mut chip, "DacChannel", ResourceKind::DacChannel, "DAC", DAC)?;
    for (timer, table) in [
        ("TIM1", TIM1),
        ("TIM2", TIM2),
        ("TIM3", TIM3),
        ("TIM4", TIM4),
        ("TIM5", TIM5),
        ("TIM12", TIM12),
    ] {
        load_channels(&mut chip, "PwmChannel", ResourceKind::PwmChannel, timer, table)?;
    }

    for (port, table) in [
        ("USART1", USART1),
        ("USART2", USART2),
        ("USART3", USART3),
        ("UART4", UART4),
        ("USART6", USART6),
    ] {
        load_bus(&mut chip, "UartPort", ResourceKind::UartLine, port, table)?;
    }
    load_bus(&mut chip, "I2cBus", ResourceKind::I2cLine, "I2C1", I2C1)?;
    load_bus(&mut chip, "I2cBus", ResourceKind::I2cLine, "I2C2", I2C2)?;
    load_bus(&mut chip, "SpiBus", ResourceKind::SpiLine, "SPI1", SPI1)?;
    load_bus(&mut chip, "SpiBus", ResourceKind::SpiLine, "SPI2", SPI2)?;
    load_bus(&mut chip, "SpiBus", ResourceKind::SpiLine, "SPI3", SPI3)?;
    load_bus(&mut chip, "CanBus", ResourceKind::CanLine, "CAN1", CAN1)?;
    load_bus(&mut chip, "CanBus", ResourceKind::CanLine, "CAN2", CAN2)?;
    load_bus(&mut chip, "UsbPort", ResourceKind::UsbLine, "OTG_FS", OTG_FS)?;

    chip.add_unbacked("Rtc", PhysicalResource::new(ResourceKind::RtcUnit, None, 0)?)?;
    chip.add_unbacked(
        "SdCard",
        PhysicalResource::on(ResourceKind::StorageSlot, "SDIO", 0)?,
    )?;

    // Sampling and driving the same analog node is a supported mode.
    chip.declare_independent(ResourceKind::AdcChannel, ResourceKind::DacChannel);

    chip.announce();
    Ok(chip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{AliasTarget, Namespace};
    use crate::path::AliasPath;
    use crate::resource::{BusId, GpioLine};

    #[test]
    fn loads_and_audits_clean() {
        let chip = chip().unwrap();
        assert!(chip.audit().is_empty());
        assert_eq!(chip.name(), NAME);
    }

    #[test]
    fn pa8_carries_gpio_and_tim1_ch1() {
        let chip = chip().unwrap();
        let pa8 = GpioLine::parse("PA8").unwrap();
        let roles = chip.mux().alternate_functions(pa8);
        assert!(roles.contains(ResourceKind::Gpio));
        assert!(roles.contains(ResourceKind::PwmChannel));
        let tim1 = PhysicalResource::on(ResourceKind::PwmChannel, "TIM1", 0).unwrap();
        assert_eq!(chip.catalog().backing_pin(&tim1), Some(pa8));
    }

    #[test]
    fn buses_are_named_with_their_lines() {
        let chip = chip().unwrap();
        let path = AliasPath::parse("UartPort/USART2").unwrap();
        let bus = BusId::new(ResourceKind::UartLine, "USART2").unwrap();
        assert_eq!(chip.target_of(&path), Some(&AliasTarget::Bus(bus.clone())));
        assert_eq!(chip.catalog().bus_lines(&bus).len(), 4);
    }

    #[test]
    fn adc_and_dac_share_pa4() {
        let chip = chip().unwrap();
        let pa4 = GpioLine::parse("PA4").unwrap();
        assert!(!chip
            .mux()
            .are_exclusive_on(pa4, ResourceKind::AdcChannel, ResourceKind::DacChannel));
        assert!(chip
            .mux()
            .are_exclusive_on(pa4, ResourceKind::AdcChannel, ResourceKind::Gpio));
    }
}
