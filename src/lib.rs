//! oneterm-i18n
//!
//! Locale resource registry for the OneTerm bastion console: loads nested translation tables,
//! validates them and resolves dotted keys with locale fallback.

pub mod bundle;
pub mod config;
pub mod coverage;
pub mod error;
pub mod loader;
pub mod negotiate;
pub mod registry;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use bundle::LocaleBundle;
pub use error::RegistryError;
pub use registry::{
    Localizer,
    Registry,
};
pub use types::KeyPath;
