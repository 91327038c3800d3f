//! Folder/track model for the browsed WebDAV tree.
//!
//! `model` holds the in-memory listing types; `enrich` probes embedded
//! audio tags fetched over HTTP.

mod enrich;
mod model;

pub use enrich::*;
pub use model::*;

#[cfg(test)]
mod tests;
