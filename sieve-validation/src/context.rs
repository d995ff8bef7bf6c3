//! Process-wide state: settings, custom rules, readable field names,
//! message overrides and the message catalog.
//!
//! A [`Context`] is normally shared through [`SharedContext`]. Registration
//! takes the write lock; a validation or filter pass holds the read lock
//! for its whole duration.

use crate::registry::{RuleCall, RuleRegistry};
use crate::report::Verdict;
use crate::rule::{Delimiters, Param};
use crate::settings::Settings;
use crate::Result;
use parking_lot::RwLock;
use serde_json::Value;
use sieve_lang::Catalog;
use sieve_log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

/// A context shared between [`Validation`](crate::Validation) instances.
pub type SharedContext = Arc<RwLock<Context>>;

#[derive(Debug, Clone)]
pub struct Context {
    settings: Settings,
    delimiters: Delimiters,
    registry: RuleRegistry,
    field_names: HashMap<String, String>,
    messages: HashMap<String, String>,
    catalog: Catalog,
}

impl Context {
    /// Default settings and the built-in catalog.
    pub fn new() -> Result<Self> {
        Self::with_settings(Settings::default())
    }

    /// Validate `settings`, then build the catalog (built-in bundles plus
    /// `lang_dir`, if set).
    pub fn with_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let catalog = load_catalog(&settings)?;

        Ok(Self {
            delimiters: settings.delimiters(),
            settings,
            registry: RuleRegistry::new(),
            field_names: HashMap::new(),
            messages: HashMap::new(),
            catalog,
        })
    }

    /// Wrap in a [`SharedContext`].
    pub fn into_shared(self) -> SharedContext {
        Arc::new(RwLock::new(self))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings, keeping registrations and overrides. The
    /// catalog is rebuilt from the new `lang_dir`.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.catalog = load_catalog(&settings)?;
        self.delimiters = settings.delimiters();
        self.settings = settings;
        info!("settings updated, delimiters {:?}", self.delimiters);
        Ok(())
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Register a custom validator and its message template.
    pub fn add_validator<F, R>(&mut self, name: &str, callback: F, message: &str) -> Result<()>
    where
        F: Fn(&RuleCall<'_>) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        self.registry.add_validator(name, callback)?;
        self.messages.insert(name.to_string(), message.to_string());
        Ok(())
    }

    pub fn add_filter<F>(&mut self, name: &str, callback: F) -> Result<()>
    where
        F: Fn(Value, &[Param]) -> Value + Send + Sync + 'static,
    {
        self.registry.add_filter(name, callback)
    }

    pub fn add_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(Value, &[String]) -> Value + Send + Sync + 'static,
    {
        self.registry.add_function(name, function);
    }

    /// Set the readable name used for `field` in messages.
    pub fn set_field_name(&mut self, field: &str, readable: &str) {
        debug!("readable name for '{}' is '{}'", field, readable);
        self.field_names.insert(field.to_string(), readable.to_string());
    }

    pub fn set_field_names<I, K, V>(&mut self, names: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (field, readable) in names {
            self.set_field_name(field.as_ref(), readable.as_ref());
        }
    }

    pub fn field_name(&self, field: &str) -> Option<&str> {
        self.field_names.get(field).map(String::as_str)
    }

    /// Override the message template of `rule` for every field.
    pub fn set_error_message(&mut self, rule: &str, template: &str) {
        self.messages.insert(rule.to_string(), template.to_string());
    }

    pub fn set_error_messages<I, K, V>(&mut self, messages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (rule, template) in messages {
            self.set_error_message(rule.as_ref(), template.as_ref());
        }
    }

    pub fn message_override(&self, rule: &str) -> Option<&str> {
        self.messages.get(rule).map(String::as_str)
    }
}

fn load_catalog(settings: &Settings) -> Result<Catalog> {
    let mut catalog = Catalog::builtin()?;
    if let Some(dir) = &settings.lang_dir {
        catalog.load_from_dir(dir)?;
    }
    Ok(catalog)
}
