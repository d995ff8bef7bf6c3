//! Engine settings: delimiters, field-name separators and language.
//!
//! Settings are read from TOML, from `SIEVE_*` environment variables
//! (optionally after loading a `.env` file), or built in code.
//!
//! ```toml
//! rules_delimiter = "|"
//! rules_parameters_delimiter = ","
//! rules_parameters_arrays_delimiter = ";"
//! field_chars_to_spaces = ["_", "-"]
//! default_lang = "en"
//! lang_dir = "langs/"
//! ```

use crate::rule::Delimiters;
use crate::{Result, SieveError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SIEVE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Separates rules in a chain (`required|max_len,5`)
    pub rules_delimiter: String,
    /// Separates a rule name from its parameters (`max_len,5`)
    pub rules_parameters_delimiter: String,
    /// Separates list parameters (`between_len,3;8`)
    pub rules_parameters_arrays_delimiter: String,
    /// Replaced by spaces when a field key is turned into a label
    pub field_chars_to_spaces: Vec<String>,
    /// Language used by `Validation::default_lang()` and the shared instance
    pub default_lang: String,
    /// Extra `<tag>.json` message bundles merged over the built-in ones
    pub lang_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules_delimiter: "|".to_string(),
            rules_parameters_delimiter: ",".to_string(),
            rules_parameters_arrays_delimiter: ";".to_string(),
            field_chars_to_spaces: vec!["_".to_string(), "-".to_string()],
            default_lang: "en".to_string(),
            lang_dir: None,
        }
    }
}

impl Settings {
    /// Parse TOML; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Read `SIEVE_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load a `.env` file (the given path, or `./.env` if present), then
    /// read the environment.
    pub fn from_dotenv(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| SieveError::Settings(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Self::from_env()
    }

    /// Build settings from any key lookup, using the `SIEVE_` variable names.
    ///
    /// `SIEVE_FIELD_CHARS_TO_SPACES` lists separator characters as one
    /// string (`"_-."`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut settings = Self::default();

        if let Some(value) = var("RULES_DELIMITER") {
            settings.rules_delimiter = value;
        }
        if let Some(value) = var("RULES_PARAMETERS_DELIMITER") {
            settings.rules_parameters_delimiter = value;
        }
        if let Some(value) = var("RULES_PARAMETERS_ARRAYS_DELIMITER") {
            settings.rules_parameters_arrays_delimiter = value;
        }
        if let Some(value) = var("FIELD_CHARS_TO_SPACES") {
            settings.field_chars_to_spaces = value.chars().map(String::from).collect();
        }
        if let Some(value) = var("LANG") {
            settings.default_lang = value;
        }
        if let Some(value) = var("LANG_DIR") {
            settings.lang_dir = Some(PathBuf::from(value));
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject delimiters that would make the grammar ambiguous.
    pub fn validate(&self) -> Result<()> {
        let delimiters = [
            ("rules_delimiter", &self.rules_delimiter),
            ("rules_parameters_delimiter", &self.rules_parameters_delimiter),
            (
                "rules_parameters_arrays_delimiter",
                &self.rules_parameters_arrays_delimiter,
            ),
        ];

        for (name, value) in delimiters {
            if value.is_empty() {
                return Err(SieveError::Settings(format!("{} must not be empty", name)));
            }
        }

        if self.rules_delimiter == self.rules_parameters_delimiter
            || self.rules_delimiter == self.rules_parameters_arrays_delimiter
            || self.rules_parameters_delimiter == self.rules_parameters_arrays_delimiter
        {
            return Err(SieveError::Settings(
                "rule, parameter and parameter-array delimiters must differ".to_string(),
            ));
        }

        if self.default_lang.trim().is_empty() {
            return Err(SieveError::Settings("default_lang must not be empty".to_string()));
        }

        Ok(())
    }

    /// The grammar delimiters.
    pub fn delimiters(&self) -> Delimiters {
        Delimiters {
            rule: self.rules_delimiter.clone(),
            param: self.rules_parameters_delimiter.clone(),
            array: self.rules_parameters_arrays_delimiter.clone(),
        }
    }
}
