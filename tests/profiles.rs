//! Every built-in profile validates, and its pin map is usable.

use pinmap::boards::{self, fez_cerbuino, g80_dev, PROFILES};
use pinmap::{BoardReport, Error, ResolverConfig, ResourceKind};

#[test]
fn all_profiles_validate_with_defaults_and_strict() {
    for config in [ResolverConfig::default(), ResolverConfig::strict()] {
        for p in PROFILES {
            let board = p.resolve(&config).unwrap_or_else(|e| panic!("{e}"));
            assert!(!board.is_empty(), "{} has no aliases", p.name);
        }
    }
}

#[test]
fn reports_render_for_every_profile() {
    for p in PROFILES {
        let board = p.resolve(&ResolverConfig::default()).unwrap();
        let report = BoardReport::valid(&board);
        assert!(report.is_valid());
        assert!(report.to_string().starts_with(p.name));
        serde_json::to_string(&report).unwrap();
    }
}

#[test]
fn dev_board_socket_names_claim_module_pins() {
    let map = boards::profile(g80_dev::NAME)
        .unwrap()
        .pin_map(&ResolverConfig::default())
        .unwrap();
    let pin = map.claim_name("Socket3.Pin9", ResourceKind::Gpio).unwrap();
    let spi = map.resolve_bus("Socket3.Spi").unwrap().clone();
    assert!(map.claim_bus(&spi).is_err(), "SPI1 SCK shares PA5 with Pin9");
    map.release(pin);
    let bus = map.claim_bus(&spi).unwrap();
    assert_eq!(bus.lines().len(), 3);
    map.release_bus(bus);
}

#[test]
fn unknown_profile_is_an_error() {
    assert!(matches!(
        boards::profile("FEZ-Panda"),
        Err(Error::UnknownProfile(name)) if name == "FEZ-Panda"
    ));
    assert!(boards::profile(&fez_cerbuino::NAME.to_lowercase()).is_ok());
}
