//! Chip families.
//!
//! A [`ChipFamily`] bundles the resource catalog, the alternate-function
//! table and the chip's own raw names (`GpioPin/PA8`, `PwmChannel/TIM1/PA8`,
//! `UartPort/USART1`).  Boards re-export those raw names under their own
//! aliases; see [`crate::board`].

use std::collections::BTreeMap;

use log::info;

use crate::board::{AliasTarget, Namespace};
use crate::catalog::Catalog;
use crate::error::{CatalogError, ConflictError, PathError};
use crate::mux::MuxTable;
use crate::path::AliasPath;
use crate::resource::{BusId, GpioLine, PhysicalResource, ResourceKind, PINS_PER_PORT};

/// Namespace holding one raw name per GPIO line.
pub const GPIO_NAMESPACE: &str = "GpioPin";

#[derive(Debug, Clone)]
pub struct ChipFamily {
    name: String,
    catalog: Catalog,
    mux: MuxTable,
    names: BTreeMap<AliasPath, AliasTarget>,
}

impl ChipFamily {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            catalog: Catalog::new(),
            mux: MuxTable::new(),
            names: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn mux(&self) -> &MuxTable {
        &self.mux
    }

    /// Direct access for chip tables that need to narrow a line's functions.
    pub fn mux_mut(&mut self) -> &mut MuxTable {
        &mut self.mux
    }

    /// Register `pins` GPIO lines of port `port` (`'A'`..) as `GpioPin/P<port><n>`.
    pub fn add_gpio_port(&mut self, port: char, pins: u8) -> Result<(), CatalogError> {
        if !port.is_ascii_uppercase() || u16::from(pins) > PINS_PER_PORT {
            return Err(CatalogError::Malformed(crate::error::ResourceError::InvalidLine));
        }
        let port_index = port as u8 - b'A';
        for pin in 0..pins {
            let line = GpioLine::new(port_index, pin);
            let resource = PhysicalResource::gpio(line);
            self.catalog.register(resource.clone())?;
            self.mux.allow(line, ResourceKind::Gpio);
            self.define(&format!("{GPIO_NAMESPACE}/{line}"), resource)?;
        }
        Ok(())
    }

    /// Register `resource` on `pin`, allow its role there, and name it.
    pub fn route(
        &mut self,
        name: &str,
        resource: PhysicalResource,
        pin: &str,
    ) -> Result<(), CatalogError> {
        let line = GpioLine::parse(pin)?;
        let kind = resource.kind();
        self.catalog.register_on(resource.clone(), line)?;
        self.mux.allow(line, kind);
        self.define(name, resource)?;
        Ok(())
    }

    /// Register a resource that is not carried by any pin (RTC, storage).
    pub fn add_unbacked(&mut self, name: &str, resource: PhysicalResource) -> Result<(), CatalogError> {
        self.catalog.register(resource.clone())?;
        self.define(name, resource)?;
        Ok(())
    }

    /// Name a whole bus.  Its lines are registered separately with [`route`](Self::route).
    pub fn add_bus(&mut self, name: &str, bus: BusId) -> Result<(), CatalogError> {
        self.define(name, bus)?;
        Ok(())
    }

    /// Add or replace a raw chip name.  Returns the previous target, if any.
    ///
    /// Boards that already imported this chip keep their own copy.
    pub fn define(
        &mut self,
        name: &str,
        target: impl Into<AliasTarget>,
    ) -> Result<Option<AliasTarget>, PathError> {
        let path = AliasPath::parse(name)?;
        Ok(self.names.insert(path, target.into()))
    }

    pub fn declare_independent(&mut self, a: ResourceKind, b: ResourceKind) {
        self.mux.declare_independent(a, b);
    }

    /// Whole-catalog consistency check against the mux table.
    pub fn audit(&self) -> Vec<ConflictError> {
        self.catalog.audit(&self.mux)
    }

    /// Log a one-line summary; called by chip tables once populated.
    pub(crate) fn announce(&self) {
        info!(
            "Chip {}: {} resources on {} lines, {} names",
            self.name,
            self.catalog.len(),
            self.mux.len(),
            self.names.len()
        );
    }
}

impl Namespace for ChipFamily {
    fn namespace_name(&self) -> &str {
        &self.name
    }

    fn target_of(&self, path: &AliasPath) -> Option<&AliasTarget> {
        self.names.get(path)
    }

    fn entries(&self) -> Vec<(&AliasPath, &AliasTarget)> {
        self.names.iter().collect()
    }
}
