//! G80 system-on-module (STM32F4).
//!
//! Exposes the chip's raw names unchanged, plus the on-module LED.

use crate::board::{BoardAliasLayer, BoardBuilder};
use crate::chip::ChipFamily;

pub const NAME: &str = "G80";

pub fn layer(chip: &ChipFamily) -> BoardAliasLayer {
    let mut b = BoardBuilder::new(NAME);
    b.import(chip).reexport("Led", chip, "GpioPin/PC13");
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Namespace;
    use crate::chips::stm32f4;
    use crate::config::ResolverConfig;
    use crate::path::AliasPath;
    use crate::resolver::validate;

    #[test]
    fn mirrors_every_chip_name() {
        let chip = stm32f4::chip().unwrap();
        let board = layer(&chip);
        assert_eq!(board.entries().len(), chip.entries().len() + 1);
        let pa8 = AliasPath::parse("PwmChannel/TIM1/PA8").unwrap();
        assert_eq!(board.target_of(&pa8), chip.target_of(&pa8));
    }

    #[test]
    fn validates() {
        let chip = stm32f4::chip().unwrap();
        let resolved = validate(&layer(&chip), &chip, &ResolverConfig::default()).unwrap();
        assert!(resolved.group_for(&AliasPath::parse("GpioPin/PA8").unwrap()).is_some());
    }
}
