//! Physical resource catalog.
//!
//! One catalog per chip family.  Every resource is registered exactly once;
//! resources that live on a pin (PWM outputs, bus lines, ADC inputs) record
//! the GPIO line that physically carries them so claims on different
//! resources sharing one line can be serialised.

use std::collections::HashMap;

use crate::error::{CatalogError, ConflictError, DuplicateResourceError};
use crate::mux::MuxTable;
use crate::resource::{BusId, ControllerId, GpioLine, PhysicalResource, ResourceKind};

/// One registered resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub resource: PhysicalResource,
    /// Line carrying the resource, if it is routed to a pin.
    pub pin: Option<GpioLine>,
}

/// Exhaustive set of physical resource identities of one chip family.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<PhysicalResource, CatalogEntry>,
    by_pin: HashMap<GpioLine, Vec<PhysicalResource>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource that is not routed to a pin (or is a pin).
    pub fn register(&mut self, resource: PhysicalResource) -> Result<(), DuplicateResourceError> {
        let pin = resource.as_gpio();
        self.insert(CatalogEntry { resource, pin })
    }

    /// Register a resource carried by `pin`.
    pub fn register_on(
        &mut self,
        resource: PhysicalResource,
        pin: GpioLine,
    ) -> Result<(), CatalogError> {
        if resource.as_gpio().is_some_and(|own| own != pin) {
            return Err(CatalogError::UnbackedPin(pin));
        }
        if !self.entries.contains_key(&PhysicalResource::gpio(pin)) && resource.as_gpio().is_none() {
            return Err(CatalogError::UnbackedPin(pin));
        }
        self.insert(CatalogEntry {
            resource,
            pin: Some(pin),
        })?;
        Ok(())
    }

    fn insert(&mut self, entry: CatalogEntry) -> Result<(), DuplicateResourceError> {
        if self.entries.contains_key(&entry.resource) {
            return Err(DuplicateResourceError {
                resource: entry.resource,
            });
        }
        if let Some(pin) = entry.pin {
            self.by_pin
                .entry(pin)
                .or_default()
                .push(entry.resource.clone());
        }
        self.entries.insert(entry.resource.clone(), entry);
        Ok(())
    }

    pub fn lookup(
        &self,
        kind: ResourceKind,
        controller: Option<&ControllerId>,
        index: u16,
    ) -> Option<&PhysicalResource> {
        let key = PhysicalResource::new(kind, controller.cloned(), index).ok()?;
        self.entries.get(&key).map(|e| &e.resource)
    }

    pub fn entry(&self, resource: &PhysicalResource) -> Option<&CatalogEntry> {
        self.entries.get(resource)
    }

    pub fn contains(&self, resource: &PhysicalResource) -> bool {
        self.entries.contains_key(resource)
    }

    pub fn backing_pin(&self, resource: &PhysicalResource) -> Option<GpioLine> {
        self.entries.get(resource).and_then(|e| e.pin)
    }

    /// Every resource carried by `pin`, the pin itself included.
    pub fn resources_on(&self, pin: GpioLine) -> &[PhysicalResource] {
        self.by_pin.get(&pin).map_or(&[], Vec::as_slice)
    }

    /// Lines of one bus, ordered by signal index.
    pub fn bus_lines(&self, bus: &BusId) -> Vec<&CatalogEntry> {
        let mut lines: Vec<_> = self
            .entries
            .values()
            .filter(|e| bus.contains(&e.resource))
            .collect();
        lines.sort_by_key(|e| e.resource.index());
        lines
    }

    pub fn has_bus(&self, bus: &BusId) -> bool {
        self.entries.keys().any(|r| bus.contains(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every routed resource against the chip's alternate functions.
    ///
    /// Findings are sorted so repeated audits report identically.
    pub fn audit(&self, mux: &MuxTable) -> Vec<ConflictError> {
        let mut found: Vec<_> = self
            .entries
            .values()
            .filter_map(|e| check_backing(e, mux))
            .collect();
        found.sort_by_cached_key(ToString::to_string);
        found
    }
}

/// A routed resource whose kind its pin cannot serve.
pub(crate) fn check_backing(entry: &CatalogEntry, mux: &MuxTable) -> Option<ConflictError> {
    let pin = entry.pin?;
    (!mux.supports(pin, entry.resource.kind())).then(|| ConflictError::IncompatibleBacking {
        resource: entry.resource.clone(),
        pin,
    })
}
