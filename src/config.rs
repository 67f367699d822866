//! Layered settings: built-in defaults, then an optional TOML file, then
//! `CADENZA__*` environment variables.
//!
//! The schema lives in `config::schema`; loading, validation and TOML
//! rendering in `config::load`.

mod load;
mod schema;

pub use schema::*;
