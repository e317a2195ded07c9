//! Immutable activity catalog.
//!
//! Holds the per-language metadata of every activity and the bidirectional
//! name table that maps a localized display name to the canonical id. The
//! catalog is built once from the seed and never changes, so it is shared
//! without any locking.

use crate::i18n::Language;
use crate::seed::SeedError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Canonical, language-neutral activity identifier.
///
/// The canonical-language display name doubles as the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ActivityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Localized text of one activity in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityText {
    pub name: String,
    pub description: String,
    pub schedule: String,
}

/// Input record for [`Catalog::new`].
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: ActivityId,
    pub capacity: usize,
    pub texts: HashMap<Language, ActivityText>,
}

/// An activity projected into one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityView<'a> {
    pub id: &'a ActivityId,
    pub display_name: &'a str,
    pub description: &'a str,
    pub schedule: &'a str,
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("no activity named '{name}' in language '{language}'")]
    ActivityNotFound { name: String, language: Language },

    #[error("unknown activity id '{0}'")]
    UnknownId(ActivityId),
}

#[derive(Debug)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<ActivityId, usize>,
    by_name: HashMap<Language, HashMap<String, usize>>,
}

impl Catalog {
    /// Build the catalog, checking that the name table is a bijection.
    ///
    /// Every activity must have a positive capacity and text for every
    /// enabled language, its canonical display name must equal its id, and
    /// display names must be unique within each language.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, SeedError> {
        let languages = Language::all();
        let canonical = Language::canonical();

        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_name: HashMap<Language, HashMap<String, usize>> = languages
            .iter()
            .map(|lang| (*lang, HashMap::with_capacity(entries.len())))
            .collect();

        for (index, entry) in entries.iter().enumerate() {
            if entry.id.as_str().trim().is_empty() {
                return Err(SeedError::EmptyId);
            }
            if entry.capacity == 0 {
                return Err(SeedError::ZeroCapacity(entry.id.clone()));
            }
            if by_id.insert(entry.id.clone(), index).is_some() {
                return Err(SeedError::DuplicateId(entry.id.clone()));
            }

            for lang in &languages {
                let text = entry
                    .texts
                    .get(lang)
                    .ok_or_else(|| SeedError::MissingTranslation {
                        id: entry.id.clone(),
                        language: *lang,
                    })?;

                if *lang == canonical && text.name != entry.id.as_str() {
                    return Err(SeedError::CanonicalNameMismatch {
                        id: entry.id.clone(),
                        name: text.name.clone(),
                    });
                }

                let names = by_name.entry(*lang).or_default();
                if names.insert(text.name.clone(), index).is_some() {
                    return Err(SeedError::DuplicateName {
                        name: text.name.clone(),
                        language: *lang,
                    });
                }
            }
        }

        Ok(Self {
            entries,
            by_id,
            by_name,
        })
    }

    /// Translate a localized activity name into its canonical id.
    ///
    /// For the canonical language the name is checked directly against the
    /// id set. There is no cross-language fallback: a Hungarian request must
    /// use the Hungarian name.
    pub fn resolve(&self, name: &str, language: Language) -> Result<&ActivityId, CatalogError> {
        let not_found = || CatalogError::ActivityNotFound {
            name: name.to_string(),
            language,
        };

        let index = if language.is_canonical() {
            self.by_id.get(name)
        } else {
            self.by_name.get(&language).and_then(|names| names.get(name))
        };

        index
            .map(|&index| &self.entries[index].id)
            .ok_or_else(not_found)
    }

    /// Project an activity into `language`.
    pub fn describe(&self, id: &str, language: Language) -> Result<ActivityView<'_>, CatalogError> {
        let entry = self
            .by_id
            .get(id)
            .map(|&index| &self.entries[index])
            .ok_or_else(|| CatalogError::UnknownId(ActivityId::new(id)))?;

        // Construction guarantees a text for every enabled language.
        let text = &entry.texts[&language];

        Ok(ActivityView {
            id: &entry.id,
            display_name: &text.name,
            description: &text.description,
            schedule: &text.schedule,
            capacity: entry.capacity,
        })
    }

    /// Every activity projected into `language`, in catalog order.
    pub fn views(&self, language: Language) -> impl Iterator<Item = ActivityView<'_>> {
        self.entries.iter().map(move |entry| {
            let text = &entry.texts[&language];
            ActivityView {
                id: &entry.id,
                display_name: &text.name,
                description: &text.description,
                schedule: &text.schedule,
                capacity: entry.capacity,
            }
        })
    }

    /// Localized display name of an activity.
    pub fn display_name(&self, id: &str, language: Language) -> Result<&str, CatalogError> {
        self.describe(id, language).map(|view| view.display_name)
    }

    /// Canonical ids in catalog order.
    pub fn all_ids(&self) -> impl Iterator<Item = &ActivityId> {
        self.entries.iter().map(|entry| &entry.id)
    }

    /// Canonical ids as a set.
    pub fn id_set(&self) -> HashSet<&ActivityId> {
        self.all_ids().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
