//! Scanners that turn score text into the [`crate::model`] structures.
//!
//! Deliberately line/regex oriented: each stage recognises one layer of the
//! notation and never fails; anything it cannot recognise is left for the
//! validators to report.

pub mod header;
pub mod snippet;
pub mod syllable;
