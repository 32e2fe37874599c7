#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based test suite entry point.
//!
//! ```bash
//! cargo test --test property
//! PROPTEST_CASES=512 cargo test --test property
//! ```

mod state_machine;
