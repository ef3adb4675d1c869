//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below exercises one subsystem end to end, through the public
//! API only, against the built-in chip tables and a mock driver.

mod acquire_tests;
mod claim_tests;
mod mock_driver;
mod snapshot_tests;
