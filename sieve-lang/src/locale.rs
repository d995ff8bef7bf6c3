//! Language tags.

use crate::{LangError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language tag: ISO 639 language plus optional region (`en`, `fr-CA`).
///
/// ```
/// use sieve_lang::LangTag;
///
/// let tag: LangTag = "pt_br".parse().unwrap();
/// assert_eq!(tag.to_string(), "pt-BR");
/// assert_eq!(tag.language_only().to_string(), "pt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LangTag {
    /// Lower-case language code
    pub language: String,
    /// Upper-case region code
    pub region: Option<String>,
}

impl LangTag {
    /// Parse `xx`, `xx-YY` or `xx_YY`.
    pub fn parse(tag: &str) -> Result<Self> {
        let mut parts = tag.trim().split(['-', '_']);
        let language = parts.next().unwrap_or_default().to_lowercase();

        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(LangError::InvalidLocale(tag.to_string()));
        }

        let region = match parts.next() {
            Some(region)
                if (2..=3).contains(&region.len())
                    && region.chars().all(|c| c.is_ascii_alphanumeric()) =>
            {
                Some(region.to_uppercase())
            }
            Some(_) => return Err(LangError::InvalidLocale(tag.to_string())),
            None => None,
        };

        if parts.next().is_some() {
            return Err(LangError::InvalidLocale(tag.to_string()));
        }

        Ok(Self { language, region })
    }

    /// The tag without its region.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            region: None,
        }
    }
}

impl FromStr for LangTag {
    type Err = LangError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LangTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_only() {
        let tag = LangTag::parse("EN").unwrap();
        assert_eq!(tag.language, "en");
        assert_eq!(tag.region, None);
    }

    #[test]
    fn test_parse_with_region() {
        assert_eq!(LangTag::parse("fr-ca").unwrap().to_string(), "fr-CA");
        assert_eq!(LangTag::parse("en_US").unwrap().to_string(), "en-US");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(LangTag::parse("").is_err());
        assert!(LangTag::parse("english").is_err());
        assert!(LangTag::parse("e1").is_err());
        assert!(LangTag::parse("en-US-x").is_err());
        assert!(LangTag::parse("../en").is_err());
    }
}
