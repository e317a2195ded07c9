//! Registration outcome counters.
//!
//! Each [`ActivityService`](crate::service::ActivityService) owns one
//! `RegistrationMetrics`, so separate service instances (and tests) never
//! share counts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct RegistrationMetrics {
    started_at: DateTime<Utc>,

    /// Successful signups
    signups: AtomicUsize,

    /// Successful unregistrations
    unregistrations: AtomicUsize,

    /// Requests naming an activity that does not exist in the request language
    not_found: AtomicUsize,

    /// Signups for an identity that was already registered
    duplicates: AtomicUsize,

    /// Signups refused because the activity was full
    full: AtomicUsize,

    /// Unregistrations for an identity that was not registered
    not_registered: AtomicUsize,
}

impl RegistrationMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            signups: AtomicUsize::new(0),
            unregistrations: AtomicUsize::new(0),
            not_found: AtomicUsize::new(0),
            duplicates: AtomicUsize::new(0),
            full: AtomicUsize::new(0),
            not_registered: AtomicUsize::new(0),
        }
    }

    pub fn record_signup(&self) {
        self.signups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unregistration(&self) {
        self.unregistrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_full(&self) {
        self.full.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_not_registered(&self) {
        self.not_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn signups(&self) -> usize {
        self.signups.load(Ordering::Relaxed)
    }

    pub fn unregistrations(&self) -> usize {
        self.unregistrations.load(Ordering::Relaxed)
    }

    pub fn not_found(&self) -> usize {
        self.not_found.load(Ordering::Relaxed)
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates.load(Ordering::Relaxed)
    }

    pub fn full(&self) -> usize {
        self.full.load(Ordering::Relaxed)
    }

    pub fn not_registered(&self) -> usize {
        self.not_registered.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> MetricsReport {
        let accepted = self.signups() + self.unregistrations();
        let rejected =
            self.not_found() + self.duplicates() + self.full() + self.not_registered();
        let total = accepted + rejected;
        let rejection_rate = if total > 0 {
            (rejected as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            since: self.started_at,
            signups: self.signups(),
            unregistrations: self.unregistrations(),
            not_found: self.not_found(),
            duplicates: self.duplicates(),
            full: self.full(),
            not_registered: self.not_registered(),
            rejection_rate,
        }
    }
}

impl Default for RegistrationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the registration counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub since: DateTime<Utc>,
    pub signups: usize,
    pub unregistrations: usize,
    pub not_found: usize,
    pub duplicates: usize,
    pub full: usize,
    pub not_registered: usize,

    /// Rejected operations as a percentage of all operations (0-100)
    pub rejection_rate: f64,
}
