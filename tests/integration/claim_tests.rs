//! Claim arbitration on a hand-built chip: the dual-role D3/D3pwm pin.

use std::sync::Arc;
use std::thread;

use pinmap::error::ClaimError;
use pinmap::{
    validate, AliasPath, BoardBuilder, ChipFamily, PhysicalResource, PinMap, ResolverConfig,
    ResourceKind,
};

fn chip() -> ChipFamily {
    let mut chip = ChipFamily::new("scenario");
    chip.add_gpio_port('A', 16).unwrap();
    chip.route(
        "PwmChannel/TIM1/PA8",
        PhysicalResource::on(ResourceKind::PwmChannel, "TIM1", 0).unwrap(),
        "PA8",
    )
    .unwrap();
    chip
}

fn map() -> PinMap {
    let chip = chip();
    let mut b = BoardBuilder::new("scenario-board");
    b.reexport("D3", &chip, "GpioPin/PA8")
        .reexport("D3pwm", &chip, "PwmChannel/TIM1/PA8");
    let board = validate(&b.build(), &chip, &ResolverConfig::default()).unwrap();
    PinMap::new(Arc::new(board))
}

#[test]
fn validation_reports_the_dual_role_group() {
    let map = map();
    let groups = map.board().exclusivity_groups();
    assert_eq!(groups.len(), 1);
    let names: Vec<&str> = groups[0].members.iter().map(AliasPath::as_str).collect();
    assert_eq!(names, ["D3", "D3pwm"]);
    assert_eq!(groups[0].pin.index(), 8);
}

#[test]
fn gpio_then_pwm_conflicts_until_release() {
    let map = map();
    let d3 = map.claim_name("D3", ResourceKind::Gpio).unwrap();

    match map.claim_name("D3pwm", ResourceKind::PwmChannel) {
        Err(ClaimError::Conflict(c)) => {
            assert_eq!(c.held_role, ResourceKind::Gpio);
            assert_eq!(c.held_by.to_string(), "gpio:PA8");
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    map.release(d3);
    let pwm = map.claim_name("D3pwm", ResourceKind::PwmChannel).unwrap();
    assert_eq!(
        map.active_role(map.resolve("D3").unwrap()),
        Some(ResourceKind::PwmChannel)
    );
    map.release(pwm);
}

#[test]
fn release_frees_the_line_for_any_role() {
    let map = map();
    for role in [ResourceKind::Gpio, ResourceKind::PwmChannel, ResourceKind::Gpio] {
        let h = map.claim_name("D3", role).unwrap();
        map.release(h);
    }
    assert!(map.active_roles(map.resolve("D3pwm").unwrap()).is_empty());
}

#[test]
fn concurrent_claims_have_exactly_one_winner() {
    let map = Arc::new(map());
    let workers: Vec<_> = (0..8)
        .map(|i| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                let (name, role) = if i % 2 == 0 {
                    ("D3", ResourceKind::Gpio)
                } else {
                    ("D3pwm", ResourceKind::PwmChannel)
                };
                map.claim_name(name, role).ok()
            })
        })
        .collect();

    let winners: Vec<_> = workers
        .into_iter()
        .filter_map(|w| w.join().unwrap())
        .collect();
    assert_eq!(winners.len(), 1);
    for h in winners {
        map.release(h);
    }
    assert_eq!(map.claimed_count(), 0);
}
