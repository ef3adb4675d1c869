//! Mock peripheral driver for integration tests.
//!
//! Records every configure/shutdown call so tests can assert on the full
//! history without touching real hardware.

use pinmap::{GpioLine, PeripheralDriver, ResolvedBinding, ResourceKind};

// ── Driver call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Configure { target: String, pin: Option<GpioLine> },
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refused;

impl core::fmt::Display for Refused {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("driver refused binding")
    }
}

// ── MockDriver ────────────────────────────────────────────────

pub struct MockDriver {
    role: ResourceKind,
    refuse: bool,
    pub calls: Vec<DriverCall>,
}

#[allow(dead_code)]
impl MockDriver {
    pub fn new(role: ResourceKind) -> Self {
        Self {
            role,
            refuse: false,
            calls: Vec::new(),
        }
    }

    /// A driver whose `configure` always fails.
    pub fn refusing(role: ResourceKind) -> Self {
        Self {
            refuse: true,
            ..Self::new(role)
        }
    }

    pub fn configured(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                DriverCall::Configure { .. } => Some(true),
                DriverCall::Shutdown => Some(false),
            })
            .unwrap_or(false)
    }
}

impl PeripheralDriver for MockDriver {
    type Error = Refused;

    fn role(&self) -> ResourceKind {
        self.role
    }

    fn configure(&mut self, binding: &ResolvedBinding) -> Result<(), Refused> {
        self.calls.push(DriverCall::Configure {
            target: binding.target.to_string(),
            pin: binding.pin,
        });
        if self.refuse { Err(Refused) } else { Ok(()) }
    }

    fn shutdown(&mut self) {
        self.calls.push(DriverCall::Shutdown);
    }
}
