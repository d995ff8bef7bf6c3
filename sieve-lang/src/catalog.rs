//! The message catalog: one bundle per language.

use crate::{LangError, LangTag, MessageBundle, Result};
use sieve_log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_BUNDLES: &[(&str, &str)] = &[
    ("en", include_str!("../langs/en.json")),
    ("fr", include_str!("../langs/fr.json")),
];

/// Message bundles keyed by language tag.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bundles: HashMap<String, MessageBundle>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the bundles shipped with the crate (`en`, `fr`).
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for (tag, json) in BUILTIN_BUNDLES {
            catalog.add_bundle(&LangTag::parse(tag)?, MessageBundle::from_json(json)?);
        }
        Ok(catalog)
    }

    /// Add a bundle. Templates merge over an existing bundle for the same tag.
    pub fn add_bundle(&mut self, tag: &LangTag, bundle: MessageBundle) {
        self.bundles
            .entry(tag.to_string())
            .or_default()
            .merge(&bundle);
    }

    /// Bundle for `lang`, falling back from `xx-YY` to `xx`.
    pub fn bundle(&self, lang: &str) -> Result<&MessageBundle> {
        let tag = LangTag::parse(lang).map_err(|_| LangError::BundleNotFound(lang.to_string()))?;

        if let Some(bundle) = self.bundles.get(&tag.to_string()) {
            return Ok(bundle);
        }

        if tag.region.is_some() {
            if let Some(bundle) = self.bundles.get(&tag.language_only().to_string()) {
                return Ok(bundle);
            }
        }

        Err(LangError::BundleNotFound(lang.to_string()))
    }

    /// Template for `rule` in `lang`, if any.
    pub fn get(&self, lang: &str, rule: &str) -> Option<&str> {
        self.bundle(lang).ok().and_then(|bundle| bundle.get(rule))
    }

    /// Whether `lang` resolves to a bundle.
    pub fn supports(&self, lang: &str) -> bool {
        self.bundle(lang).is_ok()
    }

    /// Known language tags, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.bundles.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Load every `<tag>.json` in `dir`.
    ///
    /// Files whose stem is not a language tag are skipped; a malformed file
    /// aborts the load.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();

        if !dir.is_dir() {
            return Err(LangError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Directory not found: {:?}", dir),
            )));
        }

        let mut loaded = 0usize;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let Ok(tag) = LangTag::parse(stem) else {
                debug!("skipping {:?}: not a language tag", path);
                continue;
            };

            let bundle = MessageBundle::from_json(&fs::read_to_string(&path)?)?;
            self.add_bundle(&tag, bundle);
            loaded += 1;
        }

        info!("loaded {} message bundle(s) from {:?}", loaded, dir);
        Ok(())
    }
}
