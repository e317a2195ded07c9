//! Supported languages.
//!
//! [`LANGUAGES`] is the fixed language table. [`LanguageRegistry`] indexes it
//! by code on first use and checks that exactly one entry is canonical, so
//! every later lookup is infallible for a code that passed validation.

use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// ISO 639-1 code
    pub code: &'static str,

    /// English name of the language
    pub name: &'static str,

    /// Name of the language in itself
    pub native_name: &'static str,

    /// Activity names in the canonical language double as activity ids.
    pub is_canonical: bool,

    pub enabled: bool,
}

/// Canonical language first. `Language::ENGLISH` and `Language::HUNGARIAN`
/// index into this table.
pub(crate) static LANGUAGES: [LanguageConfig; 2] = [
    LanguageConfig {
        code: "en",
        name: "English",
        native_name: "English",
        is_canonical: true,
        enabled: true,
    },
    LanguageConfig {
        code: "hu",
        name: "Hungarian",
        native_name: "Magyar",
        is_canonical: false,
        enabled: true,
    },
];

#[derive(Debug)]
pub struct LanguageRegistry {
    table: &'static [LanguageConfig],
    by_code: HashMap<&'static str, usize>,
    canonical: usize,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry::index(&LANGUAGES))
    }

    /// # Panics
    /// Panics if a code repeats, or unless exactly one entry is canonical and
    /// that entry is enabled. The table is static, so this is a build mistake.
    fn index(table: &'static [LanguageConfig]) -> Self {
        let mut by_code = HashMap::with_capacity(table.len());
        for (position, config) in table.iter().enumerate() {
            if by_code.insert(config.code, position).is_some() {
                panic!("language code '{}' is registered twice", config.code);
            }
        }

        let mut canonical = table
            .iter()
            .enumerate()
            .filter(|(_, config)| config.is_canonical)
            .map(|(position, _)| position);
        let canonical = match (canonical.next(), canonical.next()) {
            (Some(position), None) => position,
            _ => panic!("language table needs exactly one canonical language"),
        };
        if !table[canonical].enabled {
            panic!("canonical language '{}' is disabled", table[canonical].code);
        }

        Self {
            table,
            by_code,
            canonical,
        }
    }

    /// Table position of `code`, whether or not it is enabled.
    pub(crate) fn position(&self, code: &str) -> Option<usize> {
        self.by_code.get(code).copied()
    }

    pub fn lookup(&self, code: &str) -> Option<&'static LanguageConfig> {
        self.position(code).map(|position| &self.table[position])
    }

    pub(crate) fn canonical_position(&self) -> usize {
        self.canonical
    }

    pub fn canonical(&self) -> &'static LanguageConfig {
        &self.table[self.canonical]
    }

    /// Positions of the enabled languages, canonical first, then table order.
    pub(crate) fn enabled_positions(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.canonical).chain(
            self.table
                .iter()
                .enumerate()
                .filter(move |(position, config)| *position != self.canonical && config.enabled)
                .map(|(position, _)| position),
        )
    }

    pub fn enabled(&self) -> impl Iterator<Item = &'static LanguageConfig> + '_ {
        let table = self.table;
        self.enabled_positions().map(move |position| &table[position])
    }

    pub fn accepts(&self, code: &str) -> bool {
        self.lookup(code).is_some_and(|config| config.enabled)
    }
}
