//! Request dispatch module
//!
//! Builds the vendor requests for each connector and sends them.
//!
//! # Overview
//!
//! - `Variant` - the strategy object each connector implements
//! - `Dispatcher` - sends per-item requests, submits and collects batch jobs
//! - `build_variant` - picks the variant for a parsed configuration

mod dispatcher;
mod types;
mod variants;

pub use dispatcher::Dispatcher;
pub use types::{Association, DispatchMode, Variant};
pub use variants::{
    build_variant, DatasetVariant, ScrapeVariant, SerpVariant, UnlockerVariant,
};
