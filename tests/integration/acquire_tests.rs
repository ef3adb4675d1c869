//! Driver acquisition through `PinMap::acquire` on the FEZ Cerbuino profile.

use crate::mock_driver::{DriverCall, MockDriver, Refused};

use pinmap::boards::{self, fez_cerbuino};
use pinmap::{AcquireError, ClaimError, GpioLine, PinMap, ResolverConfig, ResourceKind};

fn cerbuino() -> PinMap {
    boards::profile(fez_cerbuino::NAME)
        .unwrap()
        .pin_map(&ResolverConfig::default())
        .unwrap()
}

#[test]
fn acquire_configures_driver_with_resolved_pin() {
    let map = cerbuino();
    let mut pwm = MockDriver::new(ResourceKind::PwmChannel);

    let handle = map.acquire("D3pwm", &mut pwm).unwrap();

    assert_eq!(
        pwm.calls,
        vec![DriverCall::Configure {
            target: "pwm:TIM1/0".into(),
            pin: Some(GpioLine::parse("PA8").unwrap()),
        }]
    );
    assert_eq!(handle.role(), ResourceKind::PwmChannel);
    map.relinquish(handle, &mut pwm);
    assert!(!pwm.configured());
    assert_eq!(map.claimed_count(), 0);
}

#[test]
fn refused_configuration_rolls_back_the_claim() {
    let map = cerbuino();
    let mut led = MockDriver::refusing(ResourceKind::Gpio);

    let err = map.acquire("Led1", &mut led).unwrap_err();

    assert_eq!(err, AcquireError::Driver(Refused));
    assert_eq!(map.claimed_count(), 0);
    let again = map.claim_name("Led1", ResourceKind::Gpio).unwrap();
    map.release(again);
}

#[test]
fn second_driver_on_same_pin_is_turned_away() {
    let map = cerbuino();
    let mut gpio = MockDriver::new(ResourceKind::Gpio);
    let mut pwm = MockDriver::new(ResourceKind::PwmChannel);

    let held = map.acquire("Mod", &mut gpio).unwrap();
    let err = map.acquire("D3pwm", &mut pwm).unwrap_err();

    assert!(matches!(err, AcquireError::Claim(ClaimError::Conflict(_))));
    assert!(pwm.calls.is_empty(), "driver must not be touched on conflict");
    map.release(held);
}

#[test]
fn unknown_names_and_bus_names_are_not_acquirable() {
    let map = cerbuino();
    let mut drv = MockDriver::new(ResourceKind::UartLine);

    assert!(matches!(
        map.acquire("D99", &mut drv),
        Err(AcquireError::Claim(ClaimError::UnknownName(_)))
    ));
    assert!(matches!(
        map.acquire("Uart", &mut drv),
        Err(AcquireError::Claim(ClaimError::NotAResource(_)))
    ));
    assert!(drv.calls.is_empty());
}
