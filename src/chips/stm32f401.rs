//! STM32F401 (UFQFPN48) family.
//!
//! Smaller sibling of [`stm32f4`](super::stm32f4): no DAC, no CAN, fewer
//! UARTs, and I2C3 in place of I2C2.  Base chip of the G30 module.

use super::{load_bus, load_channels, ChannelTable, SignalTable};
use crate::chip::ChipFamily;
use crate::error::CatalogError;
use crate::resource::signal::{i2c, spi, uart, usb};
use crate::resource::{PhysicalResource, ResourceKind};

pub const NAME: &str = "STM32F401";

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
];

const TIM1: ChannelTable = &[(0, "PA8"), (1, "PA9"), (2, "PA10"), (3, "PA11")];
const TIM2: ChannelTable = &[(0, "PA15"), (1, "PB3"), (2, "PB10")];
const TIM3: ChannelTable = &[(0, "PB4"), (1, "PB5"), (2, "PB0"), (3, "PB1")];
const TIM4: ChannelTable = &[(0, "PB6"), (1, "PB7"), (2, "PB8"), (3, "PB9")];
const TIM5: ChannelTable = &[(0, "PA0"), (1, "PA1"), (2, "PA2"), (3, "PA3")];

const USART1: SignalTable = &[("Tx", uart::TX, "PA9"), ("Rx", uart::RX, "PA10")];
const USART2: SignalTable = &[("Tx", uart::TX, "PA2"), ("Rx", uart::RX, "PA3")];
const USART6: SignalTable = &[("Tx", uart::TX, "PA11"), ("Rx", uart::RX, "PA12")];

const I2C1: SignalTable = &[("Sda", i2c::SDA, "PB7"), ("Scl", i2c::SCL, "PB6")];
const I2C3: SignalTable = &[("Sda", i2c::SDA, "PB4"), ("Scl", i2c::SCL, "PA8")];

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

const OTG_FS: SignalTable = &[("Dm", usb::DM, "PA11"), ("Dp", usb::DP, "PA12")];

pub fn chip() -> Result<ChipFamily, CatalogError> {
    let mut chip = ChipFamily::new(NAME);
    chip.add_gpio_port('A', 16)?;
    chip.add_gpio_port('B', 16)?;
    chip.add_gpio_port('C', 16)?;

    load_channels(&mut chip, "AdcChannel", ResourceKind::AdcChannel, "ADC1", ADC1)?;
    for (timer, table) in [
        ("TIM1", TIM1),
        ("TIM2", TIM2),
        ("TIM3", TIM3),
        ("TIM4", TIM4),
        ("TIM5", TIM5),
    ] {
        load_channels(&mut chip, "PwmChannel", ResourceKind::PwmChannel, timer, table)?;
    }
    for (port, table) in [("USART1", USART1), ("USART2", USART2), ("USART6", USART6)] {
        load_bus(&mut chip, "UartPort", ResourceKind::UartLine, port, table)?;
    }
    load_bus(&mut chip, "I2cBus", ResourceKind::I2cLine, "I2C1", I2C1)?;
    load_bus(&mut chip, "I2cBus", ResourceKind::I2cLine, "I2C3", I2C3)?;
    load_bus(&mut chip, "SpiBus", ResourceKind::SpiLine, "SPI1", SPI1)?;
    load_bus(&mut chip, "SpiBus", ResourceKind::SpiLine, "SPI2", SPI2)?;
    load_bus(&mut chip, "UsbPort", ResourceKind::UsbLine, "OTG_FS", OTG_FS)?;

    chip.add_unbacked("Rtc", PhysicalResource::new(ResourceKind::RtcUnit, None, 0)?)?;
    chip.add_unbacked(
        "SdCard",
        PhysicalResource::on(ResourceKind::StorageSlot, "SDIO", 0)?,
    )?;

    chip.announce();
    Ok(chip)
}
