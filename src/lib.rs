//! Board pin alias registry and peripheral conflict resolver.
//!
//! Maps board-level names (`D3`, `Socket9.Pin5`, `Led1`) onto the physical
//! resources of the underlying chip, checks every board once for naming and
//! multiplexing conflicts, and arbitrates runtime claims on shared pins.
//!
//! ```text
//!   chips::*  ──▶ ChipFamily (Catalog + MuxTable + raw names)
//!                     │
//!   boards::* ──▶ BoardBuilder ──▶ BoardAliasLayer
//!                     │
//!                 validate()  ──▶ ResolvedBoard ──▶ PinMap ──▶ drivers
//! ```

#![deny(unused_must_use)]

pub mod board;
pub mod boards;
pub mod catalog;
pub mod chip;
pub mod chips;
pub mod config;
pub mod error;
pub mod facade;
pub mod mux;
pub mod path;
pub mod ports;
pub mod report;
pub mod resolver;
pub mod resource;

pub use board::{define_board, AliasTarget, BoardAliasLayer, BoardBuilder, Namespace, Origin};
pub use catalog::Catalog;
pub use chip::ChipFamily;
pub use config::{Policy, ResolverConfig};
pub use error::{BoardError, ClaimError, Error, Result};
pub use facade::{BusClaim, ClaimHandle, PinMap};
pub use mux::{MuxTable, RoleSet};
pub use path::AliasPath;
pub use ports::{AcquireError, PeripheralDriver};
pub use report::BoardReport;
pub use resolver::{validate, ResolvedBinding, ResolvedBoard};
pub use resource::{BusId, ControllerId, GpioLine, PhysicalResource, ResourceKind};
