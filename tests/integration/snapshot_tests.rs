//! Boards copy their sources: later chip edits never leak into them.

use pinmap::chips::stm32f4;
use pinmap::{
    validate, AliasPath, AliasTarget, BoardBuilder, GpioLine, Namespace, PhysicalResource,
    ResolverConfig,
};

#[test]
fn mutating_the_chip_after_import_changes_neither_board() {
    let mut chip = stm32f4::chip().unwrap();
    let pa8 = AliasPath::parse("GpioPin/PA8").unwrap();
    let original = chip.target_of(&pa8).cloned().unwrap();

    let mut first = BoardBuilder::new("first");
    first.import(&chip);
    let first = first.build();
    let mut second = BoardBuilder::new("second");
    second.import_under(&chip, "Chip");
    let second = second.build();

    let moved = PhysicalResource::gpio(GpioLine::parse("PA9").unwrap());
    chip.define("GpioPin/PA8", moved).unwrap();

    let a = validate(&first, &chip, &ResolverConfig::default()).unwrap();
    let b = validate(&second, &chip, &ResolverConfig::default()).unwrap();
    assert_eq!(a.target_of(&pa8), Some(&original));
    assert_eq!(
        b.target_of(&AliasPath::parse("Chip/GpioPin/PA8").unwrap()),
        Some(&original)
    );
}

#[test]
fn reexport_chains_collapse_to_the_chip_resource() {
    let chip = stm32f4::chip().unwrap();
    let mut module = BoardBuilder::new("module");
    module.reexport("Pwm", &chip, "PwmChannel/TIM1/PA8");
    let module = module.build();
    let mut carrier = BoardBuilder::new("carrier");
    carrier.reexport("Fan", &module, "Pwm");
    let carrier = validate(&carrier.build(), &chip, &ResolverConfig::default()).unwrap();

    let fan = carrier.get(&AliasPath::parse("Fan").unwrap()).unwrap();
    assert_eq!(
        fan.target,
        AliasTarget::Resource(
            PhysicalResource::on(pinmap::ResourceKind::PwmChannel, "TIM1", 0).unwrap()
        )
    );
    assert_eq!(fan.pin, Some(GpioLine::parse("PA8").unwrap()));
}
