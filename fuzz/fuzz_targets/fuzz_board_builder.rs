//! Fuzz target: `BoardBuilder` + `validate`
//!
//! Each input line is one builder command against the STM32F4 chip:
//! `name=raw` re-exports a chip name, `name~existing` adds a second name,
//! `@prefix` imports the whole chip under a prefix.
//!
//! Invariants checked:
//! - No panics under any command sequence
//! - A board that validates has unique paths and every binding resolves
//!   through the returned board
//!
//! cargo fuzz run fuzz_board_builder

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinmap::chips::stm32f4;
use pinmap::{validate, BoardBuilder, Namespace, ResolverConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(chip) = stm32f4::chip() else {
        return;
    };

    let mut b = BoardBuilder::new("fuzz");
    for line in text.lines().take(64) {
        if let Some(prefix) = line.strip_prefix('@') {
            b.import_under(&chip, prefix);
        } else if let Some((name, raw)) = line.split_once('=') {
            b.reexport(name, &chip, raw);
        } else if let Some((name, existing)) = line.split_once('~') {
            b.same_as(name, existing);
        }
    }
    let layer = b.build();

    if let Ok(board) = validate(&layer, &chip, &ResolverConfig::default()) {
        for binding in board.bindings() {
            assert_eq!(board.target_of(&binding.path), Some(&binding.target));
        }
        for group in board.exclusivity_groups() {
            assert!(group.members.len() >= 2 || group.roles.len() >= 2);
        }
    }
});
