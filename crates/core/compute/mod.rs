//! Normalization primitives.
//!
//! - [`list`]: list-valued fields (qualities, kernel names, kernel types)
//! - [`times`]: ephemeris time sequences, explicit or derived from ranges
//! - [`literal`]: numeric literals supplied as text
//! - [`validation`]: scalar field coercion

pub mod list;
pub mod literal;
pub mod times;
pub mod validation;

pub use list::normalize_list;
pub use times::{TimeInputs, derive_times, expand_time_spec, resolve_time_spec};
