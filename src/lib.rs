//! Bilingual sign-up service for extracurricular school activities.
//!
//! The [`catalog`] holds immutable per-language activity metadata, the
//! [`ledger`] holds who is registered for what (one lock per activity), and
//! the [`service`] ties them together and enforces the business rules.
//! [`server`] exposes the service over HTTP.

pub mod catalog;
pub mod config;
pub mod email;
pub mod error;
pub mod i18n;
pub mod ledger;
pub mod metrics;
pub mod seed;
pub mod server;
pub mod service;
