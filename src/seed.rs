//! Seed dataset for the catalog and the ledger.
//!
//! A seed lists every activity once with its capacity, initial participants,
//! and per-language text. It can come from the built-in school dataset or
//! from a JSON file:
//!
//! ```json
//! {
//!   "activities": [
//!     {
//!       "id": "Chess Club",
//!       "capacity": 12,
//!       "participants": ["michael@mergington.edu"],
//!       "translations": {
//!         "en": { "name": "Chess Club", "description": "...", "schedule": "..." },
//!         "hu": { "name": "Sakk Klub", "description": "...", "schedule": "..." }
//!       }
//!     }
//!   ]
//! }
//! ```

use crate::catalog::{ActivityId, ActivityText, Catalog, CatalogEntry};
use crate::email::{EmailAddress, InvalidEmail};
use crate::i18n::Language;
use crate::ledger::Ledger;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("activity id must not be empty")]
    EmptyId,

    #[error("activity '{0}' is listed more than once")]
    DuplicateId(ActivityId),

    #[error("activity '{0}' must have a capacity greater than zero")]
    ZeroCapacity(ActivityId),

    #[error("activity '{id}' has no '{language}' translation")]
    MissingTranslation { id: ActivityId, language: Language },

    #[error("activity '{id}' has a translation for unsupported language '{code}'")]
    UnknownLanguage { id: ActivityId, code: String },

    #[error("activity '{id}' must use its id as its canonical name, found '{name}'")]
    CanonicalNameMismatch { id: ActivityId, name: String },

    #[error("display name '{name}' is used by more than one activity in '{language}'")]
    DuplicateName { name: String, language: Language },

    #[error("activity '{id}' has an invalid participant: {source}")]
    InvalidParticipant {
        id: ActivityId,
        #[source]
        source: InvalidEmail,
    },

    #[error("participant '{email}' is listed twice for activity '{id}'")]
    DuplicateParticipant { id: ActivityId, email: String },

    #[error("activity '{id}' starts with {participants} participants but holds only {capacity}")]
    OverCapacity {
        id: ActivityId,
        participants: usize,
        capacity: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedActivity {
    pub id: String,
    pub capacity: usize,
    #[serde(default)]
    pub participants: Vec<String>,
    /// Keyed by language code.
    pub translations: BTreeMap<String, ActivityText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub activities: Vec<SeedActivity>,
}

impl Seed {
    /// Load a seed from a JSON file (format in the module docs).
    ///
    /// Only parses; call [`Seed::build`] to validate.
    ///
    /// # Returns
    /// * `Ok(Seed)` if the file could be read and parsed
    /// * `Err` naming the file if reading or parsing failed
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse seed file {}", path.display()))
    }

    /// Validate the seed and build the catalog and ledger from it.
    ///
    /// Checks, in order: every translation uses an enabled language code,
    /// participants are valid and distinct emails, the catalog rules of
    /// [`Catalog::new`] hold, and no activity starts over capacity. An
    /// activity may start exactly full.
    ///
    /// # Returns
    /// * `Ok((Catalog, Ledger))` covering the same activity ids
    /// * `Err(SeedError)` for the first violation found
    pub fn build(&self) -> Result<(Catalog, Ledger), SeedError> {
        let mut entries = Vec::with_capacity(self.activities.len());
        let mut initial = Vec::with_capacity(self.activities.len());

        for activity in &self.activities {
            let id = ActivityId::new(activity.id.clone());

            let mut texts = HashMap::with_capacity(activity.translations.len());
            for (code, text) in &activity.translations {
                let language =
                    Language::from_code(code).map_err(|_| SeedError::UnknownLanguage {
                        id: id.clone(),
                        code: code.clone(),
                    })?;
                texts.insert(language, text.clone());
            }

            let participants = validate_participants(&id, activity)?;

            entries.push(CatalogEntry {
                id: id.clone(),
                capacity: activity.capacity,
                texts,
            });
            initial.push((id, participants));
        }

        // Catalog validation runs first so a zero capacity is reported as such
        // rather than as an over-capacity participant list.
        let catalog = Catalog::new(entries)?;
        for ((id, participants), activity) in initial.iter().zip(&self.activities) {
            if participants.len() > activity.capacity {
                return Err(SeedError::OverCapacity {
                    id: id.clone(),
                    participants: participants.len(),
                    capacity: activity.capacity,
                });
            }
        }

        Ok((catalog, Ledger::new(initial)))
    }

    /// The built-in Mergington High School activities.
    pub fn school_default() -> Self {
        let activities = SCHOOL_ACTIVITIES
            .iter()
            .map(|row| SeedActivity {
                id: row.en.0.to_string(),
                capacity: row.capacity,
                participants: row.participants.iter().map(|p| p.to_string()).collect(),
                translations: BTreeMap::from([
                    ("en".to_string(), text(row.en)),
                    ("hu".to_string(), text(row.hu)),
                ]),
            })
            .collect();

        Self { activities }
    }
}

fn validate_participants(
    id: &ActivityId,
    activity: &SeedActivity,
) -> Result<Vec<EmailAddress>, SeedError> {
    let mut participants: Vec<EmailAddress> = Vec::with_capacity(activity.participants.len());

    for raw in &activity.participants {
        let email = EmailAddress::parse(raw).map_err(|source| SeedError::InvalidParticipant {
            id: id.clone(),
            source,
        })?;
        if participants.contains(&email) {
            return Err(SeedError::DuplicateParticipant {
                id: id.clone(),
                email: email.to_string(),
            });
        }
        participants.push(email);
    }

    Ok(participants)
}

// ==================== Built-in Dataset ====================

/// (name, description, schedule)
type Text = (&'static str, &'static str, &'static str);

struct SchoolActivity {
    capacity: usize,
    participants: &'static [&'static str],
    en: Text,
    hu: Text,
}

fn text((name, description, schedule): Text) -> ActivityText {
    ActivityText {
        name: name.to_string(),
        description: description.to_string(),
        schedule: schedule.to_string(),
    }
}

const SCHOOL_ACTIVITIES: &[SchoolActivity] = &[
    SchoolActivity {
        capacity: 12,
        participants: &["michael@mergington.edu", "daniel@mergington.edu"],
        en: (
            "Chess Club",
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
        ),
        hu: (
            "Sakk Klub",
            "Tanulj stratégiákat és versenyezz sakkversenyeken",
            "Péntek, 15:30 - 17:00",
        ),
    },
    SchoolActivity {
        capacity: 20,
        participants: &["emma@mergington.edu", "sophia@mergington.edu"],
        en: (
            "Programming Class",
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
        ),
        hu: (
            "Programozás Tanfolyam",
            "Tanuld meg a programozás alapjait és készíts szoftverprojekteket",
            "Kedd és csütörtök, 15:30 - 16:30",
        ),
    },
    SchoolActivity {
        capacity: 30,
        participants: &["john@mergington.edu", "olivia@mergington.edu"],
        en: (
            "Gym Class",
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
        ),
        hu: (
            "Tornaterem",
            "Testnevelés és sporttevékenységek",
            "Hétfő, szerda, péntek, 14:00 - 15:00",
        ),
    },
    SchoolActivity {
        capacity: 22,
        participants: &["alex@mergington.edu", "sarah@mergington.edu"],
        en: (
            "Soccer Team",
            "Join the varsity soccer team for practices and competitive matches",
            "Mondays and Wednesdays, 4:00 PM - 6:00 PM",
        ),
        hu: (
            "Focicsapat",
            "Csatlakozz az iskolai focicsapathoz edzésekre és bajnoki mérkőzésekre",
            "Hétfő és szerda, 16:00 - 18:00",
        ),
    },
    SchoolActivity {
        capacity: 15,
        participants: &["ryan@mergington.edu"],
        en: (
            "Swimming Club",
            "Swimming lessons and training for all skill levels",
            "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
        ),
        hu: (
            "Úszó Klub",
            "Úszásoktatás és edzés minden tudásszinten",
            "Kedd és csütörtök, 16:00 - 17:30",
        ),
    },
    SchoolActivity {
        capacity: 25,
        participants: &["lily@mergington.edu", "james@mergington.edu"],
        en: (
            "Drama Club",
            "Perform in plays and learn acting techniques",
            "Wednesdays, 3:30 PM - 5:30 PM",
        ),
        hu: (
            "Drámakör",
            "Lépj fel színdarabokban és tanulj színészi technikákat",
            "Szerda, 15:30 - 17:30",
        ),
    },
    SchoolActivity {
        capacity: 18,
        participants: &["ava@mergington.edu"],
        en: (
            "Art Studio",
            "Explore painting, drawing, and sculpture",
            "Thursdays, 3:30 PM - 5:00 PM",
        ),
        hu: (
            "Művészeti Stúdió",
            "Fedezd fel a festészetet, a rajzot és a szobrászatot",
            "Csütörtök, 15:30 - 17:00",
        ),
    },
    SchoolActivity {
        capacity: 16,
        participants: &["noah@mergington.edu", "mia@mergington.edu"],
        en: (
            "Debate Team",
            "Develop critical thinking and public speaking skills through competitive debates",
            "Tuesdays, 4:00 PM - 5:30 PM",
        ),
        hu: (
            "Vitakör",
            "Fejleszd a kritikai gondolkodást és a nyilvános beszédet versenyvitákon",
            "Kedd, 16:00 - 17:30",
        ),
    },
    SchoolActivity {
        capacity: 20,
        participants: &["ethan@mergington.edu", "isabella@mergington.edu"],
        en: (
            "Science Olympiad",
            "Compete in science competitions and conduct experiments",
            "Fridays, 3:00 PM - 5:00 PM",
        ),
        hu: (
            "Tudományos Olimpia",
            "Versenyezz tudományos versenyeken és végezz kísérleteket",
            "Péntek, 15:00 - 17:00",
        ),
    },
];
