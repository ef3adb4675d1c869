//! Built-in board profiles.
//!
//! A profile pairs a chip family with the function that lays out the
//! board's aliases.  Modules (G80, G30) re-export their chip wholesale;
//! carrier boards import a module and add their own pin tables.
//!
//! ```text
//!   STM32F4   ──▶ G80 ──▶ G80 Dev
//!             └─▶ FEZ Cerbuino
//!   STM32F401 ──▶ G30 ──▶ FEZ Lemur
//! ```

pub mod fez_cerbuino;
pub mod fez_lemur;
pub mod g30;
pub mod g80;
pub mod g80_dev;

use std::sync::Arc;

use log::info;

use crate::board::BoardAliasLayer;
use crate::chip::ChipFamily;
use crate::chips::{stm32f4, stm32f401};
use crate::config::ResolverConfig;
use crate::error::{CatalogError, Error};
use crate::facade::PinMap;
use crate::resolver::{validate, ResolvedBoard};

/// One buildable board.
pub struct BoardProfile {
    pub name: &'static str,
    pub chip: fn() -> Result<ChipFamily, CatalogError>,
    pub layer: fn(&ChipFamily) -> BoardAliasLayer,
}

impl BoardProfile {
    /// Build the chip and the board's alias layer.
    pub fn build(&self) -> Result<(ChipFamily, BoardAliasLayer), Error> {
        let chip = (self.chip)()?;
        let layer = (self.layer)(&chip);
        Ok((chip, layer))
    }

    pub fn resolve(&self, config: &ResolverConfig) -> Result<ResolvedBoard, Error> {
        let (chip, layer) = self.build()?;
        validate(&layer, &chip, config).map_err(|errors| Error::Validation {
            board: self.name.to_owned(),
            errors,
        })
    }

    /// Resolve and wrap in a ready-to-claim [`PinMap`].
    pub fn pin_map(&self, config: &ResolverConfig) -> Result<PinMap, Error> {
        let board = self.resolve(config)?;
        info!("Pin map ready for {}", self.name);
        Ok(PinMap::with_config(Arc::new(board), config))
    }
}

pub const PROFILES: &[BoardProfile] = &[
    BoardProfile {
        name: g80::NAME,
        chip: stm32f4::chip,
        layer: g80::layer,
    },
    BoardProfile {
        name: g80_dev::NAME,
        chip: stm32f4::chip,
        layer: g80_dev::layer,
    },
    BoardProfile {
        name: fez_cerbuino::NAME,
        chip: stm32f4::chip,
        layer: fez_cerbuino::layer,
    },
    BoardProfile {
        name: g30::NAME,
        chip: stm32f401::chip,
        layer: g30::layer,
    },
    BoardProfile {
        name: fez_lemur::NAME,
        chip: stm32f401::chip,
        layer: fez_lemur::layer,
    },
];

/// Look a profile up by name, ignoring ASCII case.
pub fn profile(name: &str) -> Result<&'static BoardProfile, Error> {
    PROFILES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownProfile(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        for (i, a) in PROFILES.iter().enumerate() {
            for b in &PROFILES[i + 1..] {
                assert!(!a.name.eq_ignore_ascii_case(b.name), "{}", a.name);
            }
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(profile("fez-cerbuino").unwrap().name, fez_cerbuino::NAME);
        assert!(matches!(profile("Arduino"), Err(Error::UnknownProfile(_))));
    }

    #[test]
    fn every_profile_validates_strictly() {
        for p in PROFILES {
            if let Err(e) = p.resolve(&ResolverConfig::strict()) {
                panic!("{e}");
            }
        }
    }
}
