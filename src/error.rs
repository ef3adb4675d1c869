//! Unified error types for the pin registry.
//!
//! Build-time errors (catalog, path, board validation) are fatal to the
//! chip or board being built.  [`ClaimError`] is the only runtime error and
//! is always handed back to the caller.  Every error converts into the
//! crate-wide [`Error`].

use core::fmt;

use crate::board::AliasTarget;
use crate::path::AliasPath;
use crate::resource::{BusId, GpioLine, PhysicalResource, ResourceKind};

// ---------------------------------------------------------------------------
// Resource construction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceError {
    /// The kind is owned by a controller but none was given.
    MissingController(ResourceKind),
    /// Raw GPIO lines never carry a controller.
    UnexpectedController(ResourceKind),
    /// Controller identifier empty, too long, or not `[A-Za-z0-9_]`.
    InvalidController,
    /// Pin name is not of the form `P<port><pin>`.
    InvalidLine,
    /// A bus was requested for a kind that is not a bus line.
    NotABus(ResourceKind),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingController(k) => write!(f, "{k} resources require a controller"),
            Self::UnexpectedController(k) => write!(f, "{k} resources take no controller"),
            Self::InvalidController => write!(f, "invalid controller identifier"),
            Self::InvalidLine => write!(f, "invalid GPIO line name"),
            Self::NotABus(k) => write!(f, "{k} is not a bus kind"),
        }
    }
}

// ---------------------------------------------------------------------------
// Alias paths
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    Empty,
    EmptySegment,
    InvalidChar(char),
    TooDeep,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty path"),
            Self::EmptySegment => write!(f, "empty path segment"),
            Self::InvalidChar(c) => write!(f, "invalid character {c:?} in path"),
            Self::TooDeep => write!(f, "path nested too deeply"),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The `(kind, controller, index)` tuple is already registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateResourceError {
    pub resource: PhysicalResource,
}

impl fmt::Display for DuplicateResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource {} registered twice", self.resource)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Duplicate(DuplicateResourceError),
    /// A resource was backed by a line that is not a registered GPIO.
    UnbackedPin(GpioLine),
    Malformed(ResourceError),
    BadName(PathError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(e) => write!(f, "{e}"),
            Self::UnbackedPin(line) => write!(f, "{line} is not a registered GPIO line"),
            Self::Malformed(e) => write!(f, "malformed resource: {e}"),
            Self::BadName(e) => write!(f, "bad chip name: {e}"),
        }
    }
}

impl From<DuplicateResourceError> for CatalogError {
    fn from(e: DuplicateResourceError) -> Self {
        Self::Duplicate(e)
    }
}

impl From<ResourceError> for CatalogError {
    fn from(e: ResourceError) -> Self {
        Self::Malformed(e)
    }
}

impl From<PathError> for CatalogError {
    fn from(e: PathError) -> Self {
        Self::BadName(e)
    }
}

// ---------------------------------------------------------------------------
// Board validation
// ---------------------------------------------------------------------------

/// An alias references something the chip catalog never registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResourceError {
    pub path: AliasPath,
    pub target: AliasTarget,
}

impl fmt::Display for UnknownResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} refers to unregistered {}", self.path, self.target)
    }
}

/// Hard contradictions in a board or its chip tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// Two distinct targets registered under one alias path.
    AliasCollision {
        path: AliasPath,
        first: AliasTarget,
        second: AliasTarget,
    },
    /// A resource is wired to a line that cannot serve its kind.
    IncompatibleBacking {
        resource: PhysicalResource,
        pin: GpioLine,
    },
    /// The same alias was defined twice (strict redefinition policy).
    Redefinition { path: AliasPath },
    /// Several names point at one resource (strict shared-target policy).
    SharedTarget {
        resource: PhysicalResource,
        paths: Vec<AliasPath>,
    },
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AliasCollision {
                path,
                first,
                second,
            } => write!(f, "{path} maps to both {first} and {second}"),
            Self::IncompatibleBacking { resource, pin } => {
                write!(f, "{resource} is wired to {pin}, which cannot serve {}", resource.kind())
            }
            Self::Redefinition { path } => write!(f, "{path} defined more than once"),
            Self::SharedTarget { resource, paths } => {
                write!(f, "{resource} is named by {} aliases:", paths.len())?;
                for p in paths {
                    write!(f, " {p}")?;
                }
                Ok(())
            }
        }
    }
}

/// Everything validation of one board can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    Unknown(UnknownResourceError),
    Conflict(ConflictError),
    /// An alias path given to the builder did not parse.
    InvalidPath { raw: String, reason: PathError },
    /// A re-export named a source entry that does not exist.
    UnresolvedReexport { path: AliasPath, source: AliasPath },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(e) => write!(f, "unknown resource: {e}"),
            Self::Conflict(e) => write!(f, "conflict: {e}"),
            Self::InvalidPath { raw, reason } => write!(f, "invalid alias {raw:?}: {reason}"),
            Self::UnresolvedReexport { path, source } => {
                write!(f, "{path} re-exports missing name {source}")
            }
        }
    }
}

impl From<UnknownResourceError> for BoardError {
    fn from(e: UnknownResourceError) -> Self {
        Self::Unknown(e)
    }
}

impl From<ConflictError> for BoardError {
    fn from(e: ConflictError) -> Self {
        Self::Conflict(e)
    }
}

// ---------------------------------------------------------------------------
// Runtime claims
// ---------------------------------------------------------------------------

/// The physical line (or unbacked resource) is already held in a role that
/// excludes the requested one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimConflictError {
    pub requested: PhysicalResource,
    pub role: ResourceKind,
    pub held_by: PhysicalResource,
    pub held_role: ResourceKind,
    pub pin: Option<GpioLine>,
}

impl fmt::Display for ClaimConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot claim {} as {}: {} already held as {}",
            self.requested, self.role, self.held_by, self.held_role
        )?;
        if let Some(pin) = self.pin {
            write!(f, " on {pin}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    Conflict(ClaimConflictError),
    /// The resource's line cannot be multiplexed into the requested role.
    UnsupportedRole {
        resource: PhysicalResource,
        role: ResourceKind,
    },
    /// The resource is not part of the board's chip catalog.
    NotInCatalog(PhysicalResource),
    /// No alias of that name exists on the board.
    UnknownName(String),
    /// The alias names a whole bus; use `claim_bus` instead.
    NotAResource(String),
    /// Too many independent claims already share the line.
    LineSaturated(GpioLine),
    /// The bus has no registered lines.
    EmptyBus(BusId),
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict(e) => write!(f, "{e}"),
            Self::UnsupportedRole { resource, role } => {
                write!(f, "{resource} cannot be used as {role}")
            }
            Self::NotInCatalog(r) => write!(f, "{r} is not in the chip catalog"),
            Self::UnknownName(n) => write!(f, "no alias named {n:?}"),
            Self::NotAResource(n) => {
                write!(f, "{n:?} names a bus, not a single resource; claim it with claim_bus")
            }
            Self::LineSaturated(pin) => write!(f, "too many claims on {pin}"),
            Self::EmptyBus(bus) => write!(f, "bus {bus} has no lines"),
        }
    }
}

impl From<ClaimConflictError> for ClaimError {
    fn from(e: ClaimConflictError) -> Self {
        Self::Conflict(e)
    }
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Resource(ResourceError),
    Path(PathError),
    Catalog(CatalogError),
    /// A board failed validation; all findings are kept.
    Validation { board: String, errors: Vec<BoardError> },
    Claim(ClaimError),
    /// Configuration is invalid.
    Config(&'static str),
    /// No built-in profile with that name.
    UnknownProfile(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(e) => write!(f, "resource: {e}"),
            Self::Path(e) => write!(f, "path: {e}"),
            Self::Catalog(e) => write!(f, "catalog: {e}"),
            Self::Validation { board, errors } => {
                write!(f, "board {board} failed validation with {} error(s)", errors.len())?;
                for e in errors {
                    write!(f, "\n  - {e}")?;
                }
                Ok(())
            }
            Self::Claim(e) => write!(f, "claim: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::UnknownProfile(name) => write!(f, "no board profile named {name:?}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ResourceError> for Error {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Self::Path(e)
    }
}

impl From<CatalogError> for Error {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

impl From<ClaimError> for Error {
    fn from(e: ClaimError) -> Self {
        Self::Claim(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
