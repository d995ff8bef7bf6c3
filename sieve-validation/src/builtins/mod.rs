//! Built-in rule catalogs.
//!
//! Both catalogs are fixed name-to-function tables built once on first use.

pub mod filters;
pub mod validators;

/// Values the `boolean` rules accept as true.
pub(crate) const TRUES: &[&str] = &["1", "true", "yes", "on"];

/// Values the `boolean` validator accepts as false.
pub(crate) const FALSES: &[&str] = &["0", "false", "no", "off"];
