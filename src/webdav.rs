//! WebDAV listing client.
//!
//! `client` issues PROPFIND requests against the configured share; `parse`
//! turns the multistatus body into a [`crate::library::Listing`] using a
//! deliberate naive delimiter scan over `<d:href>` pairs (no XML parser;
//! a server answering with a different namespace prefix yields an empty
//! listing).

mod client;
mod parse;

pub use client::*;
