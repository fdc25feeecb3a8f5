//! Workspace root crate.
//!
//! Carries no code of its own; it exists so the `cargo-husky` git-hook
//! bootstrap in dev-dependencies runs on `cargo test`. All functionality
//! lives in the `crates/` members.
