//! Catalog of recordings and anchors.
//!
//! The catalog is parsed once from a JSON document and never mutated. It
//! holds the interchangeable recordings of a single work plus the anchor
//! collections used by segment and window modes.

mod error;
mod load;
mod model;

pub use error::CatalogError;
pub use model::*;
