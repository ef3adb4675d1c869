//! Physical resource identities.
//!
//! A [`PhysicalResource`] names one addressable unit on a chip: a GPIO line,
//! an ADC/DAC channel, a PWM channel of a timer, one signal line of a bus
//! controller, a storage slot or an RTC unit.  Identity is the tuple
//! `(kind, controller, index)`; nothing else is compared.
//!
//! GPIO lines are numbered `port_index * 16 + pin_offset`, so `PA8` is line 8
//! and `PC5` is line 37.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;

/// Maximum length of a controller identifier (`"USART2"`, `"OTG_FS"`).
pub const CONTROLLER_ID_LEN: usize = 16;

/// Pins per GPIO port.
pub const PINS_PER_PORT: u16 = 16;

/// Highest port letter accepted by [`GpioLine::parse`].
const LAST_PORT: char = 'K';

// ---------------------------------------------------------------------------
// Kind / role
// ---------------------------------------------------------------------------

/// What a physical resource is, and equally the role a driver requests when
/// it claims one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResourceKind {
    Gpio = 0,
    AdcChannel = 1,
    DacChannel = 2,
    PwmChannel = 3,
    UartLine = 4,
    I2cLine = 5,
    SpiLine = 6,
    CanLine = 7,
    UsbLine = 8,
    StorageSlot = 9,
    RtcUnit = 10,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        Self::Gpio,
        Self::AdcChannel,
        Self::DacChannel,
        Self::PwmChannel,
        Self::UartLine,
        Self::I2cLine,
        Self::SpiLine,
        Self::CanLine,
        Self::UsbLine,
        Self::StorageSlot,
        Self::RtcUnit,
    ];

    /// Bit used for this kind inside a [`RoleSet`](crate::mux::RoleSet).
    pub const fn mask(self) -> u16 {
        1 << (self as u8)
    }

    /// Kinds whose identity is meaningless without the owning controller.
    pub const fn requires_controller(self) -> bool {
        matches!(
            self,
            Self::PwmChannel | Self::UartLine | Self::I2cLine | Self::SpiLine | Self::CanLine
        )
    }

    /// Raw GPIO lines are numbered chip-wide and never carry a controller.
    pub const fn forbids_controller(self) -> bool {
        matches!(self, Self::Gpio)
    }

    /// Kinds that are signal lines of a multi-line bus.
    pub const fn is_bus(self) -> bool {
        matches!(
            self,
            Self::UartLine | Self::I2cLine | Self::SpiLine | Self::CanLine | Self::UsbLine
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Gpio => "gpio",
            Self::AdcChannel => "adc",
            Self::DacChannel => "dac",
            Self::PwmChannel => "pwm",
            Self::UartLine => "uart",
            Self::I2cLine => "i2c",
            Self::SpiLine => "spi",
            Self::CanLine => "can",
            Self::UsbLine => "usb",
            Self::StorageSlot => "storage",
            Self::RtcUnit => "rtc",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Bus signal numbering
// ---------------------------------------------------------------------------

/// Fixed line indices for bus signals.
pub mod signal {
    pub mod uart {
        pub const TX: u16 = 0;
        pub const RX: u16 = 1;
        pub const RTS: u16 = 2;
        pub const CTS: u16 = 3;
    }

    pub mod i2c {
        pub const SDA: u16 = 0;
        pub const SCL: u16 = 1;
    }

    pub mod spi {
        pub const SCK: u16 = 0;
        pub const MISO: u16 = 1;
        pub const MOSI: u16 = 2;
    }

    pub mod can {
        pub const TX: u16 = 0;
        pub const RX: u16 = 1;
    }

    pub mod usb {
        pub const DM: u16 = 0;
        pub const DP: u16 = 1;
        pub const ID: u16 = 2;
        pub const VBUS: u16 = 3;
    }
}

// ---------------------------------------------------------------------------
// Controller identifier
// ---------------------------------------------------------------------------

/// Opaque name of a controller instance (`TIM1`, `USART2`, `ADC1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "heapless::String<16>", into = "heapless::String<16>")]
pub struct ControllerId(heapless::String<CONTROLLER_ID_LEN>);

impl ControllerId {
    pub fn new(name: &str) -> Result<Self, ResourceError> {
        if name.is_empty()
            || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            return Err(ResourceError::InvalidController);
        }
        let mut s = heapless::String::new();
        s.push_str(name)
            .map_err(|()| ResourceError::InvalidController)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<heapless::String<CONTROLLER_ID_LEN>> for ControllerId {
    type Error = ResourceError;

    fn try_from(value: heapless::String<CONTROLLER_ID_LEN>) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ControllerId> for heapless::String<CONTROLLER_ID_LEN> {
    fn from(id: ControllerId) -> Self {
        id.0
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// GPIO line
// ---------------------------------------------------------------------------

/// Chip-wide GPIO line number (`port_index * 16 + pin_offset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GpioLine(u16);

impl GpioLine {
    pub const fn new(port: u8, pin: u8) -> Self {
        Self(port as u16 * PINS_PER_PORT + pin as u16)
    }

    pub const fn from_index(index: u16) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u16 {
        self.0
    }

    pub const fn port(self) -> u8 {
        (self.0 / PINS_PER_PORT) as u8
    }

    pub const fn pin(self) -> u8 {
        (self.0 % PINS_PER_PORT) as u8
    }

    /// Parse a datasheet pin name such as `PA8` or `PK15`.
    pub fn parse(name: &str) -> Result<Self, ResourceError> {
        let mut chars = name.chars();
        if chars.next() != Some('P') {
            return Err(ResourceError::InvalidLine);
        }
        let port = chars.next().ok_or(ResourceError::InvalidLine)?;
        if !('A'..=LAST_PORT).contains(&port) {
            return Err(ResourceError::InvalidLine);
        }
        let digits = chars.as_str();
        let canonical = match digits.as_bytes() {
            [] => false,
            [b'0', _, ..] => false,
            bytes => bytes.iter().all(u8::is_ascii_digit),
        };
        if !canonical {
            return Err(ResourceError::InvalidLine);
        }
        let pin: u8 = digits.parse().map_err(|_| ResourceError::InvalidLine)?;
        if u16::from(pin) >= PINS_PER_PORT {
            return Err(ResourceError::InvalidLine);
        }
        Ok(Self::new(port as u8 - b'A', pin))
    }
}

impl fmt::Display for GpioLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port() {
            p @ 0..=25 => write!(f, "P{}{}", char::from(b'A' + p), self.pin()),
            _ => write!(f, "line{}", self.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Physical resource
// ---------------------------------------------------------------------------

/// Identity of one addressable unit on a chip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalResource {
    kind: ResourceKind,
    controller: Option<ControllerId>,
    index: u16,
}

impl PhysicalResource {
    /// Build a resource, enforcing the controller rules of its kind.
    pub fn new(
        kind: ResourceKind,
        controller: Option<ControllerId>,
        index: u16,
    ) -> Result<Self, ResourceError> {
        match (&controller, kind) {
            (None, k) if k.requires_controller() => Err(ResourceError::MissingController(k)),
            (Some(_), k) if k.forbids_controller() => Err(ResourceError::UnexpectedController(k)),
            _ => Ok(Self {
                kind,
                controller,
                index,
            }),
        }
    }

    /// Shorthand for resources owned by a named controller.
    pub fn on(kind: ResourceKind, controller: &str, index: u16) -> Result<Self, ResourceError> {
        Self::new(kind, Some(ControllerId::new(controller)?), index)
    }

    pub fn gpio(line: GpioLine) -> Self {
        Self {
            kind: ResourceKind::Gpio,
            controller: None,
            index: line.index(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn controller(&self) -> Option<&ControllerId> {
        self.controller.as_ref()
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    /// The GPIO line this resource *is*, for Gpio resources.
    pub fn as_gpio(&self) -> Option<GpioLine> {
        (self.kind == ResourceKind::Gpio).then_some(GpioLine(self.index))
    }

    /// The bus this line belongs to, for bus kinds.
    pub fn bus(&self) -> Option<BusId> {
        match (&self.controller, self.kind.is_bus()) {
            (Some(c), true) => Some(BusId {
                kind: self.kind,
                controller: c.clone(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for PhysicalResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.controller, self.kind) {
            (None, ResourceKind::Gpio) => write!(f, "gpio:{}", GpioLine(self.index)),
            (None, k) => write!(f, "{k}:{}", self.index),
            (Some(c), k) => write!(f, "{k}:{c}/{}", self.index),
        }
    }
}

// ---------------------------------------------------------------------------
// Bus identity
// ---------------------------------------------------------------------------

/// A whole bus: every line of one controller of one bus kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BusId {
    kind: ResourceKind,
    controller: ControllerId,
}

impl BusId {
    pub fn new(kind: ResourceKind, controller: &str) -> Result<Self, ResourceError> {
        if !kind.is_bus() {
            return Err(ResourceError::NotABus(kind));
        }
        Ok(Self {
            kind,
            controller: ControllerId::new(controller)?,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn controller(&self) -> &ControllerId {
        &self.controller
    }

    /// Identifier string handed to bus drivers.
    pub fn identifier(&self) -> &str {
        self.controller.as_str()
    }

    /// True if `resource` is one of this bus's lines.
    pub fn contains(&self, resource: &PhysicalResource) -> bool {
        resource.kind == self.kind && resource.controller.as_ref() == Some(&self.controller)
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpio_line_numbering() {
        let pa8 = GpioLine::parse("PA8").unwrap();
        assert_eq!(pa8.index(), 8);
        let pc5 = GpioLine::parse("PC5").unwrap();
        assert_eq!(pc5.index(), 2 * 16 + 5);
        assert_eq!(pc5.to_string(), "PC5");
        assert_eq!(GpioLine::new(7, 15).to_string(), "PH15");
        assert_eq!(GpioLine::parse("PA0").unwrap().index(), 0);
        assert_eq!(GpioLine::parse("PB10").unwrap().to_string(), "PB10");
    }

    #[test]
    fn gpio_line_rejects_garbage() {
        for bad in [
            "", "P", "PA", "PA16", "QA1", "PZ1", "PA-1", "pa1", "PA+5", "PA05", "PA00", "PA 5",
        ] {
            assert!(GpioLine::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn controller_rules_per_kind() {
        assert_eq!(
            PhysicalResource::new(ResourceKind::PwmChannel, None, 0),
            Err(ResourceError::MissingController(ResourceKind::PwmChannel))
        );
        let tim = ControllerId::new("TIM1").unwrap();
        assert_eq!(
            PhysicalResource::new(ResourceKind::Gpio, Some(tim), 8),
            Err(ResourceError::UnexpectedController(ResourceKind::Gpio))
        );
        assert!(PhysicalResource::new(ResourceKind::AdcChannel, None, 3).is_ok());
        assert!(PhysicalResource::new(ResourceKind::RtcUnit, None, 0).is_ok());
    }

    #[test]
    fn controller_id_limits() {
        assert!(ControllerId::new("").is_err());
        assert!(ControllerId::new("USART 1").is_err());
        assert!(ControllerId::new("A_VERY_LONG_CONTROLLER_NAME").is_err());
        assert_eq!(ControllerId::new("OTG_FS").unwrap().as_str(), "OTG_FS");
    }

    #[test]
    fn bus_membership() {
        let tx = PhysicalResource::on(ResourceKind::UartLine, "USART1", signal::uart::TX).unwrap();
        let bus = tx.bus().unwrap();
        assert_eq!(bus.identifier(), "USART1");
        assert!(bus.contains(&tx));
        let other = PhysicalResource::on(ResourceKind::UartLine, "USART2", signal::uart::TX).unwrap();
        assert!(!bus.contains(&other));
        assert!(BusId::new(ResourceKind::PwmChannel, "TIM1").is_err());
    }

    #[test]
    fn display_forms() {
        let pwm = PhysicalResource::on(ResourceKind::PwmChannel, "TIM1", 0).unwrap();
        assert_eq!(pwm.to_string(), "pwm:TIM1/0");
        let gpio = PhysicalResource::gpio(GpioLine::new(0, 8));
        assert_eq!(gpio.to_string(), "gpio:PA8");
    }

    #[test]
    fn serde_roundtrip() {
        let pwm = PhysicalResource::on(ResourceKind::PwmChannel, "TIM1", 2).unwrap();
        let json = serde_json::to_string(&pwm).unwrap();
        let back: PhysicalResource = serde_json::from_str(&json).unwrap();
        assert_eq!(pwm, back);
    }
}
