//! Port traits: the boundary between the pin map and peripheral drivers.
//!
//! ```text
//!   PeripheralDriver ──▶ PinMap::acquire ──▶ claim table
//! ```
//!
//! Drivers implement [`PeripheralDriver`]; [`PinMap::acquire`] claims the
//! named resource in the driver's role and hands it the resolved binding.
//!
//! [`PinMap::acquire`]: crate::facade::PinMap::acquire

use core::fmt;

use crate::error::ClaimError;
use crate::resolver::ResolvedBinding;
use crate::resource::ResourceKind;

// ───────────────────────────────────────────────────────────────
// Driver port
// ───────────────────────────────────────────────────────────────

/// A driver that configures hardware from a resolved binding.
pub trait PeripheralDriver {
    type Error;

    /// Role the driver needs the line in.
    fn role(&self) -> ResourceKind;

    /// Set up the peripheral.  An error rolls the claim back.
    fn configure(&mut self, binding: &ResolvedBinding) -> Result<(), Self::Error>;

    /// Called before the caller releases the claim.
    fn shutdown(&mut self) {}
}

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

/// Failure of [`PinMap::acquire`](crate::facade::PinMap::acquire).
#[derive(Debug, PartialEq, Eq)]
pub enum AcquireError<E> {
    /// The line could not be claimed.
    Claim(ClaimError),
    /// The driver rejected the binding; nothing stays claimed.
    Driver(E),
}

impl<E> From<ClaimError> for AcquireError<E> {
    fn from(e: ClaimError) -> Self {
        Self::Claim(e)
    }
}

impl<E: fmt::Display> fmt::Display for AcquireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claim(e) => write!(f, "claim failed: {e}"),
            Self::Driver(e) => write!(f, "driver setup failed: {e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for AcquireError<E> {}
