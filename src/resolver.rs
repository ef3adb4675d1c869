//! Board resolver / validator.
//!
//! Turns a [`BoardAliasLayer`] into an immutable [`ResolvedBoard`]:
//!
//! ```text
//!   builder faults ──┐
//!   path uniqueness ─┤
//!   catalog lookup ──┼──▶ errors? ──yes──▶ Err(Vec<BoardError>)
//!   pin backing ─────┤        │
//!   shared targets ──┘        no
//!                             ▼
//!               exclusivity groups per pin ──▶ ResolvedBoard
//! ```
//!
//! Several names for one resource, or several resources on one pin, are not
//! errors: boards expose a pin under every role it can take and the driver
//! picks one at runtime.  Such pins become [`ExclusivityGroup`]s so the
//! facade and reports know only one member can be claimed at a time.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::board::{AliasTarget, BoardAliasLayer, Namespace, Origin};
use crate::catalog::{check_backing, Catalog};
use crate::chip::ChipFamily;
use crate::config::{Policy, ResolverConfig};
use crate::error::{BoardError, ConflictError, UnknownResourceError};
use crate::mux::{MuxTable, RoleSet};
use crate::path::AliasPath;
use crate::resource::{GpioLine, PhysicalResource, ResourceKind};

// ═══════════════════════════════════════════════════════════════
//  Output types
// ═══════════════════════════════════════════════════════════════

/// One alias after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBinding {
    pub path: AliasPath,
    pub target: AliasTarget,
    /// Physical line carrying the target (resources only).
    pub pin: Option<GpioLine>,
}

impl ResolvedBinding {
    pub fn resource(&self) -> Option<&PhysicalResource> {
        self.target.as_resource()
    }
}

/// Aliases reaching one physical line through different resources.
///
/// Members whose roles are exclusive on `pin` cannot be claimed together;
/// independent pairs (ADC and DAC on the STM32F4) can.  Use
/// [`ResolvedBoard::excludes`] to tell which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusivityGroup {
    pub pin: GpioLine,
    pub members: Vec<AliasPath>,
    pub roles: RoleSet,
}

/// Several declared aliases in one namespace naming the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedTarget {
    pub resource: PhysicalResource,
    pub paths: Vec<AliasPath>,
}

/// A validated board: every alias flattened to its physical identity.
#[derive(Debug, Clone)]
pub struct ResolvedBoard {
    name: String,
    chip: String,
    bindings: HashMap<AliasPath, ResolvedBinding>,
    groups: Vec<ExclusivityGroup>,
    group_by_pin: HashMap<GpioLine, usize>,
    shared: Vec<SharedTarget>,
    catalog: Arc<Catalog>,
    mux: Arc<MuxTable>,
}

impl ResolvedBoard {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chip(&self) -> &str {
        &self.chip
    }

    pub fn get(&self, path: &AliasPath) -> Option<&ResolvedBinding> {
        self.bindings.get(path)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings ordered by path.
    pub fn bindings(&self) -> Vec<&ResolvedBinding> {
        let mut all: Vec<_> = self.bindings.values().collect();
        all.sort_by(|a, b| a.path.cmp(&b.path));
        all
    }

    pub fn exclusivity_groups(&self) -> &[ExclusivityGroup] {
        &self.groups
    }

    pub fn group_for_pin(&self, pin: GpioLine) -> Option<&ExclusivityGroup> {
        self.group_by_pin.get(&pin).map(|i| &self.groups[*i])
    }

    /// The exclusivity group an alias belongs to, if any.
    pub fn group_for(&self, path: &AliasPath) -> Option<&ExclusivityGroup> {
        let pin = self.bindings.get(path)?.pin?;
        self.group_for_pin(pin).filter(|g| g.members.contains(path))
    }

    /// Whether claiming `a` and `b` at the same time is impossible because
    /// they reach a common line in roles exclusive on that line.
    pub fn excludes(&self, a: &AliasPath, b: &AliasPath) -> bool {
        let Some(group) = self.group_for(a) else {
            return false;
        };
        if !group.members.contains(b) {
            return false;
        }
        match (self.role_on(a, group.pin), self.role_on(b, group.pin)) {
            (Some(ra), Some(rb)) => self.mux.are_exclusive_on(group.pin, ra, rb),
            _ => false,
        }
    }

    /// Role in which `path` reaches `pin`, through a resource or a bus line.
    fn role_on(&self, path: &AliasPath, pin: GpioLine) -> Option<ResourceKind> {
        let binding = self.bindings.get(path)?;
        match &binding.target {
            AliasTarget::Resource(r) => (binding.pin == Some(pin)).then(|| r.kind()),
            AliasTarget::Bus(bus) => self
                .catalog
                .bus_lines(bus)
                .into_iter()
                .find(|e| e.pin == Some(pin))
                .map(|e| e.resource.kind()),
        }
    }

    pub fn shared_targets(&self) -> &[SharedTarget] {
        &self.shared
    }

    /// Frozen copy of the chip catalog taken at validation time.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn mux(&self) -> &MuxTable {
        &self.mux
    }
}

impl Namespace for ResolvedBoard {
    fn namespace_name(&self) -> &str {
        &self.name
    }

    fn target_of(&self, path: &AliasPath) -> Option<&AliasTarget> {
        self.bindings.get(path).map(|b| &b.target)
    }

    fn entries(&self) -> Vec<(&AliasPath, &AliasTarget)> {
        self.bindings()
            .into_iter()
            .map(|b| (&b.path, &b.target))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Validation
// ═══════════════════════════════════════════════════════════════

/// Resolve and check `layer` against `chip`.
///
/// Every finding is collected; a board with any error yields no
/// [`ResolvedBoard`].
pub fn validate(
    layer: &BoardAliasLayer,
    chip: &ChipFamily,
    config: &ResolverConfig,
) -> Result<ResolvedBoard, Vec<BoardError>> {
    let catalog = chip.catalog();
    let mux = chip.mux();
    let mut errors: Vec<BoardError> = layer.faults().to_vec();

    // ── 1. Path uniqueness ────────────────────────────────────
    let mut first_seen: HashMap<&AliasPath, usize> = HashMap::new();
    let mut redefined: HashSet<&AliasPath> = HashSet::new();
    let mut unique = Vec::new();
    for (i, binding) in layer.bindings().iter().enumerate() {
        match first_seen.get(&binding.path) {
            None => {
                first_seen.insert(&binding.path, i);
                unique.push(binding);
            }
            Some(&j) => {
                let first = &layer.bindings()[j];
                if first.target != binding.target {
                    errors.push(
                        ConflictError::AliasCollision {
                            path: binding.path.clone(),
                            first: first.target.clone(),
                            second: binding.target.clone(),
                        }
                        .into(),
                    );
                } else if redefined.insert(&binding.path) {
                    match config.redefinitions {
                        Policy::Allow => debug!("{}: {} redefined", layer.name(), binding.path),
                        Policy::Warn => warn!("{}: {} redefined", layer.name(), binding.path),
                        Policy::Deny => errors.push(
                            ConflictError::Redefinition {
                                path: binding.path.clone(),
                            }
                            .into(),
                        ),
                    }
                }
            }
        }
    }

    // ── 2. Catalog lookup and pin backing ─────────────────────
    let mut reported: HashSet<PhysicalResource> = HashSet::new();
    let mut resolved = HashMap::with_capacity(unique.len());
    // Per pin: (alias, resource reaching the pin through it).
    let mut on_pin: BTreeMap<GpioLine, Vec<(&AliasPath, &PhysicalResource)>> = BTreeMap::new();

    for binding in &unique {
        let pin = match &binding.target {
            AliasTarget::Resource(resource) => {
                let Some(entry) = catalog.entry(resource) else {
                    errors.push(unknown(binding.path.clone(), binding.target.clone()));
                    continue;
                };
                if let Some(conflict) = check_backing(entry, mux) {
                    if reported.insert(resource.clone()) {
                        errors.push(conflict.into());
                    }
                }
                if let Some(pin) = entry.pin {
                    on_pin.entry(pin).or_default().push((&binding.path, &entry.resource));
                }
                entry.pin
            }
            AliasTarget::Bus(bus) => {
                let lines = catalog.bus_lines(bus);
                if lines.is_empty() {
                    errors.push(unknown(binding.path.clone(), binding.target.clone()));
                    continue;
                }
                for entry in lines {
                    if let Some(conflict) = check_backing(entry, mux) {
                        if reported.insert(entry.resource.clone()) {
                            errors.push(conflict.into());
                        }
                    }
                    if let Some(pin) = entry.pin {
                        on_pin.entry(pin).or_default().push((&binding.path, &entry.resource));
                    }
                }
                None
            }
        };
        resolved.insert(
            binding.path.clone(),
            ResolvedBinding {
                path: binding.path.clone(),
                target: binding.target.clone(),
                pin,
            },
        );
    }

    if config.audit_catalog {
        for conflict in catalog.audit(mux) {
            if let ConflictError::IncompatibleBacking { resource, .. } = &conflict {
                if !reported.insert(resource.clone()) {
                    continue;
                }
            }
            errors.push(conflict.into());
        }
    }

    // ── 3. Shared targets (copy-paste signature) ──────────────
    let shared = shared_targets(&unique);
    for s in &shared {
        match config.shared_targets {
            Policy::Allow => {}
            Policy::Warn => warn!(
                "{}: {} aliases name {}: {:?}",
                layer.name(),
                s.paths.len(),
                s.resource,
                s.paths.iter().map(AliasPath::as_str).collect::<Vec<_>>()
            ),
            Policy::Deny => errors.push(
                ConflictError::SharedTarget {
                    resource: s.resource.clone(),
                    paths: s.paths.clone(),
                }
                .into(),
            ),
        }
    }

    if !errors.is_empty() {
        error!(
            "Board {} on {}: validation failed with {} error(s)",
            layer.name(),
            chip.name(),
            errors.len()
        );
        return Err(errors);
    }

    // ── 4. Exclusivity groups ─────────────────────────────────
    let groups = exclusivity_groups(&on_pin, mux);
    let group_by_pin = groups.iter().enumerate().map(|(i, g)| (g.pin, i)).collect();

    info!(
        "Board {} on {}: {} aliases, {} exclusivity groups, {} shared targets",
        layer.name(),
        chip.name(),
        resolved.len(),
        groups.len(),
        shared.len()
    );

    Ok(ResolvedBoard {
        name: layer.name().to_owned(),
        chip: chip.name().to_owned(),
        bindings: resolved,
        groups,
        group_by_pin,
        shared,
        catalog: Arc::new(catalog.clone()),
        mux: Arc::new(mux.clone()),
    })
}

fn unknown(path: AliasPath, target: AliasTarget) -> BoardError {
    UnknownResourceError { path, target }.into()
}

/// Declared aliases sharing both a namespace and a resource.
///
/// Imports and `same_as` names are deliberate and never counted.
fn shared_targets(unique: &[&crate::board::AliasBinding]) -> Vec<SharedTarget> {
    let mut by_key: BTreeMap<(&str, &PhysicalResource), Vec<AliasPath>> = BTreeMap::new();
    for binding in unique {
        if binding.origin != Origin::Declared {
            continue;
        }
        if let AliasTarget::Resource(r) = &binding.target {
            by_key
                .entry((binding.path.namespace(), r))
                .or_default()
                .push(binding.path.clone());
        }
    }
    by_key
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|((_, resource), mut paths)| {
            paths.sort();
            SharedTarget {
                resource: resource.clone(),
                paths,
            }
        })
        .collect()
}

fn exclusivity_groups(
    on_pin: &BTreeMap<GpioLine, Vec<(&AliasPath, &PhysicalResource)>>,
    mux: &MuxTable,
) -> Vec<ExclusivityGroup> {
    let mut groups = Vec::new();
    for (&pin, reaching) in on_pin {
        let mut distinct: Vec<&PhysicalResource> = reaching.iter().map(|(_, r)| *r).collect();
        distinct.sort();
        distinct.dedup();
        if distinct.len() < 2 {
            continue;
        }
        let contended = distinct.iter().enumerate().any(|(i, a)| {
            distinct[i + 1..]
                .iter()
                .any(|b| mux.are_exclusive_on(pin, a.kind(), b.kind()))
        });
        if !contended {
            continue;
        }
        let mut members: Vec<AliasPath> = reaching.iter().map(|(p, _)| (*p).clone()).collect();
        members.sort();
        members.dedup();
        let roles = distinct.iter().fold(RoleSet::EMPTY, |s, r| s.with(r.kind()));
        debug!("{pin}: exclusive roles {roles} across {} aliases", members.len());
        groups.push(ExclusivityGroup {
            pin,
            members,
            roles,
        });
    }
    groups
}
