//! Property tests for the catalog, alias paths and the claim table.

use std::sync::Arc;

use pinmap::chips::stm32f4;
use pinmap::{
    validate, AliasPath, BoardBuilder, GpioLine, PhysicalResource, PinMap, ResolverConfig,
    ResourceKind,
};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,7}"
}

proptest! {
    /// Every registered resource is found again by its identity triple.
    #[test]
    fn lookup_returns_registered_resource(pick in 0usize..10_000) {
        let chip = stm32f4::chip().unwrap();
        let all: Vec<_> = chip.catalog().iter().collect();
        let entry = all[pick % all.len()];
        let r = &entry.resource;
        prop_assert_eq!(
            chip.catalog().lookup(r.kind(), r.controller(), r.index()),
            Some(r)
        );
    }

    /// Dotted and slashed spellings parse to the same path.
    #[test]
    fn separators_are_interchangeable(segs in prop::collection::vec(segment(), 1..=6)) {
        let dotted = AliasPath::parse(&segs.join(".")).unwrap();
        let slashed = AliasPath::parse(&segs.join("/")).unwrap();
        prop_assert_eq!(&dotted, &slashed);
        prop_assert_eq!(dotted.depth(), segs.len());
        prop_assert_eq!(dotted.name(), segs.last().unwrap().as_str());
    }

    /// Paths deeper than the limit are always rejected.
    #[test]
    fn overly_deep_paths_are_rejected(segs in prop::collection::vec(segment(), 7..12)) {
        prop_assert!(AliasPath::parse(&segs.join("/")).is_err());
    }

    /// Two aliases naming one resource resolve identically.
    #[test]
    fn aliasing_is_reflexive(port in 0u8..3, pin in 0u8..16) {
        let chip = stm32f4::chip().unwrap();
        let raw = format!("GpioPin/{}", GpioLine::new(port, pin));
        let mut b = BoardBuilder::new("reflexive");
        b.reexport("First", &chip, &raw).same_as("Second", "First");
        let map = PinMap::new(Arc::new(
            validate(&b.build(), &chip, &ResolverConfig::strict()).unwrap(),
        ));
        let expected = PhysicalResource::gpio(GpioLine::new(port, pin));
        prop_assert_eq!(map.resolve("First"), Some(&expected));
        prop_assert_eq!(map.resolve("Second"), Some(&expected));
    }

    /// After claim + release, the line takes any role it supports.
    #[test]
    fn release_restores_full_availability(
        first in prop::sample::select(vec![ResourceKind::Gpio, ResourceKind::PwmChannel]),
        second in prop::sample::select(vec![ResourceKind::Gpio, ResourceKind::PwmChannel]),
    ) {
        let chip = stm32f4::chip().unwrap();
        let mut b = BoardBuilder::new("cycle");
        b.reexport("D3", &chip, "GpioPin/PA8");
        let map = PinMap::new(Arc::new(
            validate(&b.build(), &chip, &ResolverConfig::default()).unwrap(),
        ));
        let h = map.claim_name("D3", first).unwrap();
        prop_assert!(map.claim_name("D3", second).is_err());
        map.release(h);
        let h = map.claim_name("D3", second).unwrap();
        map.release(h);
        prop_assert_eq!(map.claimed_count(), 0);
    }

    /// A path declared twice never validates under the default config,
    /// whether or not the targets agree.
    #[test]
    fn colliding_paths_fail_validation(a in 0u8..16, b in 0u8..16) {
        let chip = stm32f4::chip().unwrap();
        let mut board = BoardBuilder::new("collide");
        board
            .reexport("X", &chip, &format!("GpioPin/PA{a}"))
            .reexport("X", &chip, &format!("GpioPin/PA{b}"));
        prop_assert!(validate(&board.build(), &chip, &ResolverConfig::default()).is_err());
    }
}
