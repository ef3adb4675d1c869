//! Lookup facade.
//!
//! The only surface peripheral drivers touch.  Lookups go straight to the
//! immutable [`ResolvedBoard`]; claims go through one claim table guarded by
//! a blocking mutex.  Claims on resources carried by a pin are keyed by that
//! pin, so `D3` (GPIO PA8) and `D3pwm` (TIM1 channel on PA8) contend for the
//! same entry.  Unrouted resources (RTC, storage) are keyed by themselves.
//!
//! ```text
//!   driver ──resolve("Socket9.Pin5")──▶ ResolvedBoard (lock-free)
//!   driver ──claim(resource, role)────▶ ClaimTable (one lock, no waiting)
//! ```
//!
//! `claim` never waits: it either succeeds or returns the conflicting
//! holder.  Retrying is the caller's business.

use core::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::debug;

use crate::config::ResolverConfig;
use crate::error::{ClaimConflictError, ClaimError};
use crate::path::AliasPath;
use crate::ports::{AcquireError, PeripheralDriver};
use crate::resolver::{ResolvedBinding, ResolvedBoard};
use crate::resource::{BusId, GpioLine, PhysicalResource, ResourceKind};

static NEXT_MAP_ID: AtomicU32 = AtomicU32::new(1);

/// What a claim is serialised on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ClaimKey {
    Pin(GpioLine),
    Unrouted(PhysicalResource),
}

#[derive(Debug, Clone)]
struct ActiveClaim {
    token: u32,
    resource: PhysicalResource,
    role: ResourceKind,
}

#[derive(Debug, Default)]
struct ClaimTable {
    next_token: u32,
    active: HashMap<ClaimKey, Vec<ActiveClaim>>,
}

impl ClaimTable {
    fn issue(&mut self) -> u32 {
        self.next_token = self.next_token.wrapping_add(1);
        self.next_token
    }

    fn remove(&mut self, key: &ClaimKey, token: u32) -> bool {
        let Some(claims) = self.active.get_mut(key) else {
            return false;
        };
        let before = claims.len();
        claims.retain(|c| c.token != token);
        let removed = claims.len() != before;
        if claims.is_empty() {
            self.active.remove(key);
        }
        removed
    }
}

/// Proof of an active claim.  Hand it back to [`PinMap::release`].
#[must_use = "dropping a ClaimHandle without release() keeps the line claimed"]
#[derive(Debug, PartialEq, Eq)]
pub struct ClaimHandle {
    map: u32,
    token: u32,
    key: ClaimKey,
    resource: PhysicalResource,
    role: ResourceKind,
}

impl ClaimHandle {
    pub fn resource(&self) -> &PhysicalResource {
        &self.resource
    }

    pub fn role(&self) -> ResourceKind {
        self.role
    }

    /// Physical line the claim is held on, for routed resources.
    pub fn pin(&self) -> Option<GpioLine> {
        match self.key {
            ClaimKey::Pin(pin) => Some(pin),
            ClaimKey::Unrouted(_) => None,
        }
    }
}

/// Every line of one bus, claimed together.
#[must_use = "dropping a BusClaim without release_bus() keeps the bus claimed"]
#[derive(Debug)]
pub struct BusClaim {
    bus: BusId,
    handles: Vec<ClaimHandle>,
}

impl BusClaim {
    pub fn bus(&self) -> &BusId {
        &self.bus
    }

    pub fn lines(&self) -> &[ClaimHandle] {
        &self.handles
    }
}

/// Validated board plus its runtime claim table.
pub struct PinMap {
    id: u32,
    board: Arc<ResolvedBoard>,
    max_claims_per_line: usize,
    claims: Mutex<CriticalSectionRawMutex, RefCell<ClaimTable>>,
}

impl PinMap {
    pub fn new(board: Arc<ResolvedBoard>) -> Self {
        Self::with_config(board, &ResolverConfig::default())
    }

    pub fn with_config(board: Arc<ResolvedBoard>, config: &ResolverConfig) -> Self {
        Self {
            id: NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed),
            board,
            max_claims_per_line: usize::from(config.max_claims_per_line.max(1)),
            claims: Mutex::new(RefCell::new(ClaimTable::default())),
        }
    }

    pub fn board(&self) -> &ResolvedBoard {
        &self.board
    }

    // ── Lookups ───────────────────────────────────────────────

    /// Binding for a logical name or socket path (`D3`, `Socket9.Pin5`).
    pub fn binding(&self, name: &str) -> Option<&ResolvedBinding> {
        let path = AliasPath::parse(name).ok()?;
        self.board.get(&path)
    }

    /// Resolve a name to the physical resource it denotes.
    pub fn resolve(&self, name: &str) -> Option<&PhysicalResource> {
        self.binding(name)?.resource()
    }

    /// Resolve a name that denotes a whole bus.
    pub fn resolve_bus(&self, name: &str) -> Option<&BusId> {
        self.binding(name)?.target.as_bus()
    }

    /// Role currently claimed on the resource's line, if any.
    pub fn active_role(&self, resource: &PhysicalResource) -> Option<ResourceKind> {
        self.active_roles(resource).into_iter().next()
    }

    /// Every role currently claimed on the resource's line.
    pub fn active_roles(&self, resource: &PhysicalResource) -> Vec<ResourceKind> {
        let Some(key) = self.key_for(resource) else {
            return Vec::new();
        };
        self.claims.lock(|cell| {
            cell.borrow()
                .active
                .get(&key)
                .map(|claims| claims.iter().map(|c| c.role).collect())
                .unwrap_or_default()
        })
    }

    /// Number of lines or unrouted resources with at least one claim.
    pub fn claimed_count(&self) -> usize {
        self.claims.lock(|cell| cell.borrow().active.len())
    }

    fn key_for(&self, resource: &PhysicalResource) -> Option<ClaimKey> {
        let entry = self.board.catalog().entry(resource)?;
        Some(match entry.pin {
            Some(pin) => ClaimKey::Pin(pin),
            None => ClaimKey::Unrouted(resource.clone()),
        })
    }

    // ── Claims ────────────────────────────────────────────────

    /// Claim `resource` for `role`.
    ///
    /// Fails if the line already carries a claim whose role excludes
    /// `role`.  A role always excludes itself.
    pub fn claim(
        &self,
        resource: &PhysicalResource,
        role: ResourceKind,
    ) -> Result<ClaimHandle, ClaimError> {
        let key = self
            .key_for(resource)
            .ok_or_else(|| ClaimError::NotInCatalog(resource.clone()))?;
        self.check_role(&key, resource, role)?;

        let mux = self.board.mux();
        let handle = self.claims.lock(|cell| {
            let mut table = cell.borrow_mut();
            if let Some(held) = table.active.get(&key) {
                let blocking = held.iter().find(|c| match &key {
                    ClaimKey::Pin(pin) => mux.are_exclusive_on(*pin, c.role, role),
                    ClaimKey::Unrouted(_) => mux.are_exclusive(c.role, role),
                });
                if let Some(c) = blocking {
                    return Err(ClaimError::Conflict(ClaimConflictError {
                        requested: resource.clone(),
                        role,
                        held_by: c.resource.clone(),
                        held_role: c.role,
                        pin: match &key {
                            ClaimKey::Pin(pin) => Some(*pin),
                            ClaimKey::Unrouted(_) => None,
                        },
                    }));
                }
                if held.len() >= self.max_claims_per_line {
                    if let ClaimKey::Pin(pin) = key {
                        return Err(ClaimError::LineSaturated(pin));
                    }
                }
            }
            let token = table.issue();
            table.active.entry(key.clone()).or_default().push(ActiveClaim {
                token,
                resource: resource.clone(),
                role,
            });
            Ok(ClaimHandle {
                map: self.id,
                token,
                key,
                resource: resource.clone(),
                role,
            })
        })?;
        debug!("claim {} as {} (token {})", resource, role, handle.token);
        Ok(handle)
    }

    fn check_role(
        &self,
        key: &ClaimKey,
        resource: &PhysicalResource,
        role: ResourceKind,
    ) -> Result<(), ClaimError> {
        let supported = match key {
            ClaimKey::Pin(pin) => self.board.mux().supports(*pin, role),
            ClaimKey::Unrouted(_) => role == resource.kind(),
        };
        if supported {
            Ok(())
        } else {
            Err(ClaimError::UnsupportedRole {
                resource: resource.clone(),
                role,
            })
        }
    }

    /// Resolve `name`, then claim it in `role`.
    pub fn claim_name(&self, name: &str, role: ResourceKind) -> Result<ClaimHandle, ClaimError> {
        let (_, resource) = self.single_resource(name)?;
        self.claim(resource, role)
    }

    /// Binding of `name` together with the one resource it denotes.
    fn single_resource(
        &self,
        name: &str,
    ) -> Result<(&ResolvedBinding, &PhysicalResource), ClaimError> {
        let binding = self
            .binding(name)
            .ok_or_else(|| ClaimError::UnknownName(name.to_owned()))?;
        let resource = binding
            .resource()
            .ok_or_else(|| ClaimError::NotAResource(name.to_owned()))?;
        Ok((binding, resource))
    }

    /// Claim every line of `bus`, or none of them.
    pub fn claim_bus(&self, bus: &BusId) -> Result<BusClaim, ClaimError> {
        let lines: Vec<PhysicalResource> = self
            .board
            .catalog()
            .bus_lines(bus)
            .into_iter()
            .map(|e| e.resource.clone())
            .collect();
        if lines.is_empty() {
            return Err(ClaimError::EmptyBus(bus.clone()));
        }
        let mut handles = Vec::with_capacity(lines.len());
        for line in &lines {
            match self.claim(line, line.kind()) {
                Ok(h) => handles.push(h),
                Err(e) => {
                    for h in handles {
                        self.release(h);
                    }
                    return Err(e);
                }
            }
        }
        Ok(BusClaim {
            bus: bus.clone(),
            handles,
        })
    }

    /// Drop a claim.  Always succeeds.
    ///
    /// Handles issued by another map are ignored.
    pub fn release(&self, handle: ClaimHandle) {
        if handle.map != self.id {
            debug!(
                "ignoring release of {} as {}: handle belongs to map {}, not {}",
                handle.resource, handle.role, handle.map, self.id
            );
            return;
        }
        let removed = self
            .claims
            .lock(|cell| cell.borrow_mut().remove(&handle.key, handle.token));
        debug!(
            "release {} as {} (token {}{})",
            handle.resource,
            handle.role,
            handle.token,
            if removed { "" } else { ", already gone" }
        );
    }

    pub fn release_bus(&self, claim: BusClaim) {
        for h in claim.handles {
            self.release(h);
        }
    }

    /// Claim `name` for `driver` and let it configure itself.
    ///
    /// The claim is rolled back if the driver refuses the binding.
    pub fn acquire<D: PeripheralDriver>(
        &self,
        name: &str,
        driver: &mut D,
    ) -> Result<ClaimHandle, AcquireError<D::Error>> {
        let (binding, resource) = self.single_resource(name)?;
        let handle = self.claim(resource, driver.role())?;
        if let Err(e) = driver.configure(binding) {
            self.release(handle);
            return Err(AcquireError::Driver(e));
        }
        Ok(handle)
    }

    /// Shut `driver` down, then release its claim.
    pub fn relinquish<D: PeripheralDriver>(&self, handle: ClaimHandle, driver: &mut D) {
        driver.shutdown();
        self.release(handle);
    }
}
