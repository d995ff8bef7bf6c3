//! Message catalogs for sieve validation errors.
//!
//! A [`Catalog`] maps a language tag to a [`MessageBundle`], which maps a rule
//! name to a message template such as `"The {field} field is required"`.
//! English and French bundles are compiled in; more can be loaded from a
//! directory of `<tag>.json` files.
//!
//! ```rust
//! use sieve_lang::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! assert_eq!(
//!     catalog.get("en", "min_len"),
//!     Some("The {field} field needs to be at least {param} characters")
//! );
//! ```

mod bundle;
mod catalog;
mod error;
mod locale;

pub use bundle::MessageBundle;
pub use catalog::Catalog;
pub use error::LangError;
pub use locale::LangTag;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, LangError>;
