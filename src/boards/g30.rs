//! G30 system-on-module (STM32F401).

use crate::board::{define_board, BoardAliasLayer};
use crate::chip::ChipFamily;

pub const NAME: &str = "G30";

pub fn layer(chip: &ChipFamily) -> BoardAliasLayer {
    let mut b = define_board(NAME);
    b.import(chip).reexport("Led", chip, "GpioPin/PC13");
    b.build()
}
