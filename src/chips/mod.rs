//! Built-in chip families.
//!
//! Each family is literal table data loaded through the [`ChipFamily`]
//! builder API.  Raw names follow one scheme across families:
//!
//! ```text
//!   GpioPin/PA8                 every GPIO line
//!   AdcChannel/ADC1/PA0         analog inputs, named by pin
//!   PwmChannel/TIM1/PA8         timer channels, named by pin
//!   UartPort/USART1[/Tx]        bus, or one of its signal lines
//!   Rtc, SdCard                 resources without a pin
//! ```

pub mod stm32f4;
pub mod stm32f401;

use crate::chip::ChipFamily;
use crate::error::CatalogError;
use crate::resource::{BusId, PhysicalResource, ResourceKind};

/// `(channel, pin)` for one controller.
pub(crate) type ChannelTable = &'static [(u16, &'static str)];

/// `(signal name, signal index, pin)` for one bus controller.
pub(crate) type SignalTable = &'static [(&'static str, u16, &'static str)];

/// Route every channel of `controller` under `<prefix>/<controller>/<pin>`.
pub(crate) fn load_channels(
    chip: &mut ChipFamily,
    prefix: &str,
    kind: ResourceKind,
    controller: &str,
    table: ChannelTable,
) -> Result<(), CatalogError> {
    for &(channel, pin) in table {
        let resource = PhysicalResource::on(kind, controller, channel)?;
        chip.route(&format!("{prefix}/{controller}/{pin}"), resource, pin)?;
    }
    Ok(())
}

/// Route the signal lines of one bus and name the bus itself.
pub(crate) fn load_bus(
    chip: &mut ChipFamily,
    prefix: &str,
    kind: ResourceKind,
    controller: &str,
    table: SignalTable,
) -> Result<(), CatalogError> {
    for &(signal, index, pin) in table {
        let resource = PhysicalResource::on(kind, controller, index)?;
        chip.route(&format!("{prefix}/{controller}/{signal}"), resource, pin)?;
    }
    chip.add_bus(&format!("{prefix}/{controller}"), BusId::new(kind, controller)?)
}
