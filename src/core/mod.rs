//! Core tax data model, country tables, and errors.
//!
//! This module provides the types that flow between the extractor,
//! the classifier, and the aggregator in [`crate::tax`].

mod builder;
pub mod countries;
mod error;
mod types;

pub use builder::*;
pub use countries::{is_eu_country, is_known_country_code, normalize_country};
pub use error::*;
pub use types::*;
