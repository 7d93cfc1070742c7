//! # ephemq-types
//!
//! Plain data types shared by the ephemq normalization core and server:
//!
//! - **Raw values**: `RawValue`, the loosely-typed shape of any request field
//! - **Time specifications**: `TimeSpec`, explicit times or computed ranges
//! - **Kernel options**: `KernelSearchOptions` and the default quality/type lists
//!
//! All types are serializable with Serde.
//!
//! ## Examples
//!
//! ```rust
//! use ephemq_types::raw::RawValue;
//! use ephemq_types::time::TimeSpec;
//!
//! let ets: RawValue = serde_json::from_str("[690201375.83, 690201389.28]").unwrap();
//! assert!(ets.is_list());
//!
//! let spec = TimeSpec::by_duration(0.0, 10.0, 3.0);
//! assert!(!spec.is_explicit());
//! ```

pub mod kernel;
pub mod raw;
pub mod time;
