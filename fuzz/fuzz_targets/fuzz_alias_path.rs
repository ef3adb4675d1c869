//! Fuzz target: `AliasPath::parse`
//!
//! Invariants checked:
//! - No panics under any input
//! - A parsed path re-parses from its canonical form to itself
//! - Depth never exceeds `MAX_DEPTH`; `name()` is the last segment
//!
//! cargo fuzz run fuzz_alias_path

#![no_main]

use libfuzzer_sys::fuzz_target;
use pinmap::path::{AliasPath, MAX_DEPTH};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(path) = AliasPath::parse(raw) else {
        return;
    };

    let again = AliasPath::parse(path.as_str()).expect("canonical form must re-parse");
    assert_eq!(again, path);
    assert!(path.depth() <= MAX_DEPTH);
    assert_eq!(path.segments().last(), Some(path.name()));
    if !path.namespace().is_empty() {
        assert!(path.is_within(path.namespace()));
    }
});
