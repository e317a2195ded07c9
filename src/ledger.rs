//! Registration ledger: who is registered for which activity.
//!
//! Registrants are stored once per canonical activity id, so every language
//! view reads the same list. Each activity has its own mutex; `try_add` and
//! `try_remove` perform their check and their mutation under that one lock,
//! which closes the check-then-act race between concurrent requests. Locks
//! are never held across an `.await` and never nested, so the ledger cannot
//! deadlock.

use crate::catalog::ActivityId;
use crate::email::EmailAddress;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Why `try_add` refused an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddRejection {
    #[error("identity is already registered")]
    AlreadyRegistered,

    #[error("activity is at capacity")]
    CapacityExceeded,
}

/// Why `try_remove` refused an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RemoveRejection {
    #[error("identity is not registered")]
    NotRegistered,
}

#[derive(Debug)]
pub struct Ledger {
    slots: HashMap<ActivityId, Mutex<Vec<EmailAddress>>>,
}

impl Ledger {
    /// Create the ledger from its initial registrants.
    ///
    /// The id set is fixed from here on. Callers are expected to have checked
    /// the initial lists for duplicates and capacity (see `Seed::build`).
    pub fn new(initial: impl IntoIterator<Item = (ActivityId, Vec<EmailAddress>)>) -> Self {
        let slots = initial
            .into_iter()
            .map(|(id, registrants)| (id, Mutex::new(registrants)))
            .collect();
        Self { slots }
    }

    /// Lock the registrant list of `id`.
    ///
    /// # Panics
    /// Panics on an unknown id. The service only calls the ledger with ids
    /// the catalog resolved, so an unknown id means the catalog and ledger
    /// were built from different seeds.
    fn registrants(&self, id: &str) -> MutexGuard<'_, Vec<EmailAddress>> {
        match self.slots.get(id) {
            // Every critical section leaves the list consistent before it can
            // panic, so a poisoned lock still guards valid data.
            Some(slot) => slot.lock().unwrap_or_else(PoisonError::into_inner),
            None => panic!(
                "activity id '{}' is not in the ledger; catalog and ledger seeds disagree",
                id
            ),
        }
    }

    /// Current registrants in insertion order.
    pub fn list(&self, id: &str) -> Vec<EmailAddress> {
        self.registrants(id).clone()
    }

    pub fn contains(&self, id: &str, identity: &EmailAddress) -> bool {
        self.registrants(id).contains(identity)
    }

    pub fn count(&self, id: &str) -> usize {
        self.registrants(id).len()
    }

    /// Register `identity` unless it is already present or the activity is full.
    ///
    /// Check and insert happen under the activity's lock, so concurrent
    /// callers can never push the count past `capacity`. The duplicate check
    /// runs before the capacity check, so re-registering into a full activity
    /// reports `AlreadyRegistered`.
    ///
    /// # Arguments
    /// * `id` - Canonical activity id; must be known to the ledger
    /// * `identity` - The student to register
    /// * `capacity` - Maximum registrants, taken from the catalog
    ///
    /// # Returns
    /// * `Ok(())` if `identity` was appended
    /// * `Err(AddRejection::AlreadyRegistered)` if it was already present
    /// * `Err(AddRejection::CapacityExceeded)` if the activity is full
    ///
    /// # Panics
    /// Panics on an unknown `id` (see `registrants`).
    pub fn try_add(
        &self,
        id: &str,
        identity: &EmailAddress,
        capacity: usize,
    ) -> Result<(), AddRejection> {
        let mut registrants = self.registrants(id);

        if registrants.contains(identity) {
            return Err(AddRejection::AlreadyRegistered);
        }
        if registrants.len() >= capacity {
            return Err(AddRejection::CapacityExceeded);
        }

        registrants.push(identity.clone());
        Ok(())
    }

    /// Remove `identity` if it is registered.
    ///
    /// # Returns
    /// * `Ok(())` if `identity` was removed; later registrants keep their order
    /// * `Err(RemoveRejection::NotRegistered)` if it was not present
    pub fn try_remove(&self, id: &str, identity: &EmailAddress) -> Result<(), RemoveRejection> {
        let mut registrants = self.registrants(id);

        let position = registrants
            .iter()
            .position(|registered| registered == identity)
            .ok_or(RemoveRejection::NotRegistered)?;

        registrants.remove(position);
        Ok(())
    }

    /// Activity ids tracked by the ledger, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &ActivityId> {
        self.slots.keys()
    }
}
