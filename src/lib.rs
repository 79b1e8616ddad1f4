//! Deterministic Pricing Engine for Tree Service Estimates
//!
//! This crate prices tree-service jobs from crew, equipment, travel, and
//! fee inputs against time-versioned rate tables, producing a single
//! reproducible, checksummed monetary total. All arithmetic is exact
//! decimal; the same input and rate snapshot always yield the same result.

#![warn(missing_docs)]

pub mod calculation;
pub mod error;
pub mod models;
pub mod rates;
