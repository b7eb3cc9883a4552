//! Engagement and posting-cadence statistics over collected video metadata.
//!
//! Flow: [`loader`] reads `*_metadata.json` documents, [`classifier`] assigns
//! a content type, [`analyzers`] computes engagement means, content shares
//! and weekly posting velocity, and [`output`] writes the tables.

pub mod analyzers;
pub mod classifier;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod record;
