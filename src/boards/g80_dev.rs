//! G80 development board.
//!
//! Carries the G80 module (its names stay reachable under `G80/`) and
//! breaks it out to four numbered sockets.  Socket pins follow the usual
//! 10-pin layout: pins 1, 2 and 10 are power, 3 to 9 are signals.

use crate::board::{BoardAliasLayer, BoardBuilder};
use crate::chip::ChipFamily;

use super::g80;

pub const NAME: &str = "G80-Dev";

pub fn layer(chip: &ChipFamily) -> BoardAliasLayer {
    let module = g80::layer(chip);
    let mut b = BoardBuilder::new(NAME);
    b.import_under(&module, "G80");

    // UART socket
    b.socket("Socket1").reexport_all(
        &module,
        &[
            ("Pin3", "GpioPin/PC0"),
            ("Pin4", "GpioPin/PA9"),
            ("Pin5", "GpioPin/PA10"),
            ("Pin6", "GpioPin/PC1"),
            ("Uart", "UartPort/USART1"),
        ],
    );

    // I2C + PWM socket
    b.socket("Socket2").reexport_all(
        &module,
        &[
            ("Pin3", "GpioPin/PB12"),
            ("Pin7", "PwmChannel/TIM3/PC6"),
            ("Pin8", "GpioPin/PB7"),
            ("Pin9", "GpioPin/PB6"),
            ("I2c", "I2cBus/I2C1"),
        ],
    );

    // SPI socket
    b.socket("Socket3").reexport_all(
        &module,
        &[
            ("Pin3", "GpioPin/PC2"),
            ("Pin4", "GpioPin/PC3"),
            ("Pin5", "GpioPin/PC4"),
            ("Pin6", "GpioPin/PB2"),
            ("Pin7", "GpioPin/PA7"),
            ("Pin8", "GpioPin/PA6"),
            ("Pin9", "GpioPin/PA5"),
            ("Spi", "SpiBus/SPI1"),
        ],
    );

    // Analog socket
    b.socket("Socket4").reexport_all(
        &module,
        &[
            ("Pin3", "AdcChannel/ADC1/PB0"),
            ("Pin4", "AdcChannel/ADC1/PA4"),
            ("Pin5", "DacChannel/DAC/PA4"),
        ],
    );

    b.reexport("Led1", &module, "Led")
        .reexport("Button", &module, "GpioPin/PD2")
        .reexport("Can", &module, "CanBus/CAN1")
        .reexport("Usb", &module, "UsbPort/OTG_FS")
        .reexport("SdCard", &module, "SdCard")
        .reexport("Rtc", &module, "Rtc");
    b.build()
}
