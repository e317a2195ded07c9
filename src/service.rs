//! Activity service: the façade over the catalog and the ledger.
//!
//! Every request goes through the same steps: resolve the localized activity
//! name to its canonical id, run one guarded ledger operation, and map the
//! outcome to a result in the caller's terms. Existence is always checked
//! before any duplicate or capacity rule.

use crate::catalog::{ActivityId, Catalog};
use crate::email::EmailAddress;
use crate::i18n::Language;
use crate::ledger::{AddRejection, Ledger, RemoveRejection};
use crate::metrics::RegistrationMetrics;
use crate::seed::{Seed, SeedError};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupError {
    #[error("activity '{name}' not found")]
    ActivityNotFound { name: String },

    #[error("{email} is already signed up for '{activity}'")]
    StudentAlreadyRegistered { activity: ActivityId, email: String },

    #[error("activity '{activity}' is full")]
    ActivityFull { activity: ActivityId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnregisterError {
    #[error("activity '{name}' not found")]
    ActivityNotFound { name: String },

    #[error("{email} is not signed up for '{activity}'")]
    StudentNotRegistered { activity: ActivityId, email: String },
}

/// One activity as shown in a language view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    #[serde(rename = "max_participants")]
    pub capacity: usize,
    #[serde(rename = "participants")]
    pub registrants: Vec<EmailAddress>,
}

/// All activities in one language, keyed by display name, in catalog order.
///
/// Serializes as a JSON object whose keys keep catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityBoard {
    entries: Vec<(String, ActivityDetails)>,
}

impl ActivityBoard {
    pub fn get(&self, display_name: &str) -> Option<&ActivityDetails> {
        self.entries
            .iter()
            .find(|(name, _)| name == display_name)
            .map(|(_, details)| details)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActivityDetails)> {
        self.entries
            .iter()
            .map(|(name, details)| (name.as_str(), details))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ActivityBoard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, details) in &self.entries {
            map.serialize_entry(name, details)?;
        }
        map.end()
    }
}

#[derive(Debug)]
pub struct ActivityService {
    catalog: Catalog,
    ledger: Ledger,
    metrics: RegistrationMetrics,
}

impl ActivityService {
    pub fn new(catalog: Catalog, ledger: Ledger) -> Self {
        Self {
            catalog,
            ledger,
            metrics: RegistrationMetrics::new(),
        }
    }

    pub fn from_seed(seed: &Seed) -> Result<Self, SeedError> {
        let (catalog, ledger) = seed.build()?;
        Ok(Self::new(catalog, ledger))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn metrics(&self) -> &RegistrationMetrics {
        &self.metrics
    }

    /// Every activity with its current registrants, projected into `language`.
    ///
    /// Each entry is read under its own lock; the board as a whole is not a
    /// single atomic snapshot.
    pub fn list_activities(&self, language: Language) -> ActivityBoard {
        let entries = self
            .catalog
            .views(language)
            .map(|view| {
                let details = ActivityDetails {
                    description: view.description.to_string(),
                    schedule: view.schedule.to_string(),
                    capacity: view.capacity,
                    registrants: self.ledger.list(view.id.as_str()),
                };
                (view.display_name.to_string(), details)
            })
            .collect();

        ActivityBoard { entries }
    }

    /// Register `identity` for the activity called `activity_name` in `language`.
    pub fn signup(
        &self,
        activity_name: &str,
        identity: &EmailAddress,
        language: Language,
    ) -> Result<ActivityId, SignupError> {
        let view = match self
            .catalog
            .resolve(activity_name, language)
            .and_then(|id| self.catalog.describe(id.as_str(), language))
        {
            Ok(view) => view,
            Err(e) => {
                self.metrics.record_not_found();
                info!("Signup for {} rejected: {}", identity, e);
                return Err(SignupError::ActivityNotFound {
                    name: activity_name.to_string(),
                });
            }
        };

        match self.ledger.try_add(view.id.as_str(), identity, view.capacity) {
            Ok(()) => {
                self.metrics.record_signup();
                debug!("Signed up {} for {} ({})", identity, view.id, language);
                Ok(view.id.clone())
            }
            Err(AddRejection::AlreadyRegistered) => {
                self.metrics.record_duplicate();
                info!("{} is already registered for {}", identity, view.id);
                Err(SignupError::StudentAlreadyRegistered {
                    activity: view.id.clone(),
                    email: identity.to_string(),
                })
            }
            Err(AddRejection::CapacityExceeded) => {
                self.metrics.record_full();
                info!(
                    "{} is full ({} places), rejected {}",
                    view.id, view.capacity, identity
                );
                Err(SignupError::ActivityFull {
                    activity: view.id.clone(),
                })
            }
        }
    }

    /// Remove `identity` from the activity called `activity_name` in `language`.
    pub fn unregister(
        &self,
        activity_name: &str,
        identity: &EmailAddress,
        language: Language,
    ) -> Result<ActivityId, UnregisterError> {
        let id = match self.catalog.resolve(activity_name, language) {
            Ok(id) => id,
            Err(e) => {
                self.metrics.record_not_found();
                info!("Unregister for {} rejected: {}", identity, e);
                return Err(UnregisterError::ActivityNotFound {
                    name: activity_name.to_string(),
                });
            }
        };

        match self.ledger.try_remove(id.as_str(), identity) {
            Ok(()) => {
                self.metrics.record_unregistration();
                debug!("Unregistered {} from {} ({})", identity, id, language);
                Ok(id.clone())
            }
            Err(RemoveRejection::NotRegistered) => {
                self.metrics.record_not_registered();
                info!("{} is not registered for {}", identity, id);
                Err(UnregisterError::StudentNotRegistered {
                    activity: id.clone(),
                    email: identity.to_string(),
                })
            }
        }
    }
}
