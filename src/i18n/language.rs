//! `Language`: a handle to one enabled entry of the language table.

use crate::i18n::registry::LANGUAGES;
use crate::i18n::{LanguageConfig, LanguageRegistry, LanguageStrings};
use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// An enabled language.
///
/// Only [`Language::from_code`] and the constants create one, so holding a
/// `Language` means the code was already checked against the registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    position: usize,
}

impl Language {
    pub const ENGLISH: Language = Language { position: 0 };

    pub const HUNGARIAN: Language = Language { position: 1 };

    pub fn from_code(code: &str) -> Result<Language> {
        let registry = LanguageRegistry::get();

        let Some(position) = registry.position(code) else {
            bail!("Unknown language code: '{}'", code);
        };
        if !LANGUAGES[position].enabled {
            bail!("Language '{}' is not enabled", code);
        }

        Ok(Language { position })
    }

    /// The language whose activity names are the activity ids.
    pub fn canonical() -> Language {
        Language {
            position: LanguageRegistry::get().canonical_position(),
        }
    }

    /// Every enabled language, canonical first.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .enabled_positions()
            .map(|position| Language { position })
            .collect()
    }

    pub fn config(&self) -> &'static LanguageConfig {
        &LANGUAGES[self.position]
    }

    pub fn code(&self) -> &'static str {
        self.config().code
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }

    pub fn strings(&self) -> &'static LanguageStrings {
        LanguageStrings::for_language(*self)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Language").field(&self.code()).finish()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Language::from_code(&code).map_err(serde::de::Error::custom)
    }
}
