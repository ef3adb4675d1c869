//! Role compatibility (pin multiplexing) table.
//!
//! Each GPIO line lists the roles it can alternately serve.  Two roles on
//! the same line exclude each other unless the chip declares them
//! independent, either chip-wide or for one line.  A role always excludes
//! itself: one line is never driven by two owners of the same function.

use core::fmt;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::resource::{GpioLine, ResourceKind};

/// Bitset over [`ResourceKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(u16);

impl RoleSet {
    pub const EMPTY: Self = Self(0);

    pub const fn only(role: ResourceKind) -> Self {
        Self(role.mask())
    }

    pub fn of(roles: &[ResourceKind]) -> Self {
        roles.iter().fold(Self::EMPTY, |set, r| set.with(*r))
    }

    #[must_use]
    pub const fn with(self, role: ResourceKind) -> Self {
        Self(self.0 | role.mask())
    }

    pub const fn contains(self, role: ResourceKind) -> bool {
        self.0 & role.mask() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(move |k| self.contains(*k))
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, role) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{role}")?;
        }
        f.write_str("}")
    }
}

/// Unordered role pair used as an independence key.
fn pair(a: ResourceKind, b: ResourceKind) -> (ResourceKind, ResourceKind) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Per-chip alternate-function table.
#[derive(Debug, Clone, Default)]
pub struct MuxTable {
    functions: HashMap<GpioLine, RoleSet>,
    independent: HashSet<(ResourceKind, ResourceKind)>,
    independent_on: HashSet<(GpioLine, ResourceKind, ResourceKind)>,
}

impl MuxTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `role` to the alternate functions of `line`.
    pub fn allow(&mut self, line: GpioLine, role: ResourceKind) {
        let set = self.functions.entry(line).or_default();
        *set = set.with(role);
    }

    /// Replace the alternate functions of `line`.
    pub fn set_functions(&mut self, line: GpioLine, roles: RoleSet) {
        self.functions.insert(line, roles);
    }

    /// Every role `line` may be multiplexed into.
    pub fn alternate_functions(&self, line: GpioLine) -> RoleSet {
        self.functions.get(&line).copied().unwrap_or_default()
    }

    pub fn supports(&self, line: GpioLine, role: ResourceKind) -> bool {
        self.alternate_functions(line).contains(role)
    }

    /// Let `a` and `b` be active together on any line of the chip.
    pub fn declare_independent(&mut self, a: ResourceKind, b: ResourceKind) {
        if a != b {
            self.independent.insert(pair(a, b));
        }
    }

    /// Let `a` and `b` be active together on `line` only.
    pub fn declare_independent_on(&mut self, line: GpioLine, a: ResourceKind, b: ResourceKind) {
        if a != b {
            let (a, b) = pair(a, b);
            self.independent_on.insert((line, a, b));
        }
    }

    /// Chip-wide exclusivity of two roles.
    pub fn are_exclusive(&self, a: ResourceKind, b: ResourceKind) -> bool {
        a == b || !self.independent.contains(&pair(a, b))
    }

    /// Exclusivity of two roles on one particular line.
    pub fn are_exclusive_on(&self, line: GpioLine, a: ResourceKind, b: ResourceKind) -> bool {
        if !self.are_exclusive(a, b) {
            return false;
        }
        let (a, b) = pair(a, b);
        a == b || !self.independent_on.contains(&(line, a, b))
    }

    /// Lines with at least one function.
    pub fn lines(&self) -> impl Iterator<Item = GpioLine> + '_ {
        self.functions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ResourceKind::*;

    fn pa(pin: u8) -> GpioLine {
        GpioLine::new(0, pin)
    }

    #[test]
    fn roleset_basics() {
        let set = RoleSet::of(&[Gpio, PwmChannel, UartLine]);
        assert_eq!(set.len(), 3);
        assert!(set.contains(PwmChannel));
        assert!(!set.contains(AdcChannel));
        assert_eq!(set.to_string(), "{gpio, pwm, uart}");
        assert!(RoleSet::EMPTY.is_empty());
    }

    #[test]
    fn alternate_functions_accumulate() {
        let mut mux = MuxTable::new();
        mux.allow(pa(8), Gpio);
        mux.allow(pa(8), PwmChannel);
        assert_eq!(mux.alternate_functions(pa(8)), RoleSet::of(&[Gpio, PwmChannel]));
        assert!(mux.alternate_functions(pa(9)).is_empty());
        mux.set_functions(pa(8), RoleSet::only(Gpio));
        assert!(!mux.supports(pa(8), PwmChannel));
    }

    #[test]
    fn exclusive_by_default() {
        let mux = MuxTable::new();
        assert!(mux.are_exclusive(Gpio, PwmChannel));
        assert!(mux.are_exclusive(Gpio, Gpio));
    }

    #[test]
    fn chip_wide_independence_is_symmetric() {
        let mut mux = MuxTable::new();
        mux.declare_independent(DacChannel, AdcChannel);
        assert!(!mux.are_exclusive(AdcChannel, DacChannel));
        assert!(!mux.are_exclusive(DacChannel, AdcChannel));
        assert!(!mux.are_exclusive_on(pa(4), AdcChannel, DacChannel));
    }

    #[test]
    fn per_line_independence() {
        let mut mux = MuxTable::new();
        mux.declare_independent_on(pa(0), Gpio, AdcChannel);
        assert!(!mux.are_exclusive_on(pa(0), AdcChannel, Gpio));
        assert!(mux.are_exclusive_on(pa(1), AdcChannel, Gpio));
        assert!(mux.are_exclusive(Gpio, AdcChannel));
    }

    #[test]
    fn self_independence_is_ignored() {
        let mut mux = MuxTable::new();
        mux.declare_independent(Gpio, Gpio);
        mux.declare_independent_on(pa(3), PwmChannel, PwmChannel);
        assert!(mux.are_exclusive(Gpio, Gpio));
        assert!(mux.are_exclusive_on(pa(3), PwmChannel, PwmChannel));
    }
}
