//! Board alias layer.
//!
//! A board is an append-only list of [`AliasBinding`]s built with a
//! [`BoardBuilder`].  Names come from three places:
//!
//! - direct aliases (`alias`, `reexport`), the board's own pin table;
//! - deliberate second names for an existing alias (`same_as`);
//! - bulk imports of another namespace (`import*`), copied at build time.
//!
//! Re-exports and imports copy the source's *current* target.  Nothing keeps
//! a live reference, so a chip table edited later never changes a board that
//! was already built, and `board = other_board = chip` chains collapse into
//! one direct reference per alias.
//!
//! Builder methods never fail; malformed paths and dangling re-exports are
//! recorded and reported by [`validate`](crate::resolver::validate).

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::path::AliasPath;
use crate::resource::{BusId, PhysicalResource};

// ---------------------------------------------------------------------------
// Targets and bindings
// ---------------------------------------------------------------------------

/// What an alias resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasTarget {
    Resource(PhysicalResource),
    Bus(BusId),
}

impl AliasTarget {
    pub fn as_resource(&self) -> Option<&PhysicalResource> {
        match self {
            Self::Resource(r) => Some(r),
            Self::Bus(_) => None,
        }
    }

    pub fn as_bus(&self) -> Option<&BusId> {
        match self {
            Self::Bus(b) => Some(b),
            Self::Resource(_) => None,
        }
    }
}

impl From<PhysicalResource> for AliasTarget {
    fn from(r: PhysicalResource) -> Self {
        Self::Resource(r)
    }
}

impl From<BusId> for AliasTarget {
    fn from(b: BusId) -> Self {
        Self::Bus(b)
    }
}

impl fmt::Display for AliasTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(r) => write!(f, "{r}"),
            Self::Bus(b) => write!(f, "bus {b}"),
        }
    }
}

/// How a binding entered the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Part of the board's own pin table.
    Declared,
    /// Second name for another alias of the same board.
    AliasOf(AliasPath),
    /// Bulk copy from another chip or board.
    Imported(String),
}

/// One named board-level reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasBinding {
    pub board: Arc<str>,
    pub path: AliasPath,
    pub target: AliasTarget,
    pub origin: Origin,
}

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// Anything that maps names to targets and can be re-exported from.
pub trait Namespace {
    /// Name used in logs and import records.
    fn namespace_name(&self) -> &str;

    fn target_of(&self, path: &AliasPath) -> Option<&AliasTarget>;

    /// All entries, ordered by path.
    fn entries(&self) -> Vec<(&AliasPath, &AliasTarget)>;
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Start defining a board.
pub fn define_board(name: &str) -> BoardBuilder {
    BoardBuilder::new(name)
}

pub struct BoardBuilder {
    name: Arc<str>,
    bindings: Vec<AliasBinding>,
    faults: Vec<BoardError>,
}

impl BoardBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            bindings: Vec::new(),
            faults: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn parse(&mut self, raw: &str) -> Option<AliasPath> {
        match AliasPath::parse(raw) {
            Ok(p) => Some(p),
            Err(reason) => {
                self.faults.push(BoardError::InvalidPath {
                    raw: raw.to_owned(),
                    reason,
                });
                None
            }
        }
    }

    fn push(&mut self, path: AliasPath, target: AliasTarget, origin: Origin) {
        self.bindings.push(AliasBinding {
            board: Arc::clone(&self.name),
            path,
            target,
            origin,
        });
    }

    /// Add one alias.
    pub fn alias(&mut self, path: &str, target: impl Into<AliasTarget>) -> &mut Self {
        if let Some(path) = self.parse(path) {
            self.push(path, target.into(), Origin::Declared);
        }
        self
    }

    /// Add an alias whose target is copied from `source` right now.
    pub fn reexport(&mut self, path: &str, source: &dyn Namespace, source_path: &str) -> &mut Self {
        let (Some(path), Some(from)) = (self.parse(path), self.parse(source_path)) else {
            return self;
        };
        match source.target_of(&from) {
            Some(target) => {
                let target = target.clone();
                self.push(path, target, Origin::Declared);
            }
            None => self
                .faults
                .push(BoardError::UnresolvedReexport { path, source: from }),
        }
        self
    }

    /// Re-export a `(board name, source name)` table.
    pub fn reexport_all(&mut self, source: &dyn Namespace, table: &[(&str, &str)]) -> &mut Self {
        for (path, source_path) in table {
            self.reexport(path, source, source_path);
        }
        self
    }

    /// Give an alias already on this board a second name.
    pub fn same_as(&mut self, path: &str, existing: &str) -> &mut Self {
        let (Some(path), Some(existing)) = (self.parse(path), self.parse(existing)) else {
            return self;
        };
        let found = self
            .bindings
            .iter()
            .find(|b| b.path == existing)
            .map(|b| b.target.clone());
        match found {
            Some(target) => self.push(path, target, Origin::AliasOf(existing)),
            None => self.faults.push(BoardError::UnresolvedReexport {
                path,
                source: existing,
            }),
        }
        self
    }

    /// Copy every name of `source` unchanged.
    pub fn import(&mut self, source: &dyn Namespace) -> &mut Self {
        self.import_namespace(source, "", "")
    }

    /// Copy every name of `source` under `prefix`.
    pub fn import_under(&mut self, source: &dyn Namespace, prefix: &str) -> &mut Self {
        self.import_namespace(source, "", prefix)
    }

    /// Copy the names of `source` living in `namespace`, re-rooted at `prefix`.
    pub fn import_namespace(
        &mut self,
        source: &dyn Namespace,
        namespace: &str,
        prefix: &str,
    ) -> &mut Self {
        let origin = Origin::Imported(source.namespace_name().to_owned());
        let mut copied = Vec::new();
        for (path, target) in source.entries() {
            let Some(relative) = path.strip_namespace(namespace) else {
                continue;
            };
            match relative.prefixed(prefix) {
                Ok(p) => copied.push((p, target.clone())),
                Err(reason) => self.faults.push(BoardError::InvalidPath {
                    raw: format!("{prefix}/{relative}"),
                    reason,
                }),
            }
        }
        for (path, target) in copied {
            self.push(path, target, origin.clone());
        }
        self
    }

    /// Scope further aliases under a socket/connector namespace.
    pub fn socket(&mut self, namespace: &str) -> SocketBuilder<'_> {
        SocketBuilder {
            board: self,
            namespace: namespace.to_owned(),
        }
    }

    pub fn build(self) -> BoardAliasLayer {
        BoardAliasLayer {
            name: self.name,
            bindings: self.bindings,
            faults: self.faults,
        }
    }
}

/// Builder view that prefixes every alias with a socket namespace.
pub struct SocketBuilder<'a> {
    board: &'a mut BoardBuilder,
    namespace: String,
}

impl SocketBuilder<'_> {
    fn path(&self, name: &str) -> String {
        format!("{}/{name}", self.namespace)
    }

    pub fn alias(&mut self, name: &str, target: impl Into<AliasTarget>) -> &mut Self {
        let path = self.path(name);
        self.board.alias(&path, target);
        self
    }

    pub fn reexport(&mut self, name: &str, source: &dyn Namespace, source_path: &str) -> &mut Self {
        let path = self.path(name);
        self.board.reexport(&path, source, source_path);
        self
    }

    pub fn reexport_all(&mut self, source: &dyn Namespace, table: &[(&str, &str)]) -> &mut Self {
        for (name, source_path) in table {
            self.reexport(name, source, source_path);
        }
        self
    }

    /// Second name inside the socket for another board alias.
    pub fn same_as(&mut self, name: &str, existing: &str) -> &mut Self {
        let path = self.path(name);
        self.board.same_as(&path, existing);
        self
    }
}

// ---------------------------------------------------------------------------
// Built layer
// ---------------------------------------------------------------------------

/// A board's bindings, frozen but not yet validated.
#[derive(Debug, Clone)]
pub struct BoardAliasLayer {
    name: Arc<str>,
    bindings: Vec<AliasBinding>,
    faults: Vec<BoardError>,
}

impl BoardAliasLayer {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bindings in definition order, duplicates included.
    pub fn bindings(&self) -> &[AliasBinding] {
        &self.bindings
    }

    /// Problems recorded while building.
    pub fn faults(&self) -> &[BoardError] {
        &self.faults
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Namespace for BoardAliasLayer {
    fn namespace_name(&self) -> &str {
        &self.name
    }

    /// First definition wins, matching what validation keeps.
    fn target_of(&self, path: &AliasPath) -> Option<&AliasTarget> {
        self.bindings
            .iter()
            .find(|b| &b.path == path)
            .map(|b| &b.target)
    }

    fn entries(&self) -> Vec<(&AliasPath, &AliasTarget)> {
        let mut seen = std::collections::HashSet::new();
        let mut out: Vec<_> = self
            .bindings
            .iter()
            .filter(|b| seen.insert(&b.path))
            .map(|b| (&b.path, &b.target))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}
