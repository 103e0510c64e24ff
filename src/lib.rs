//! Columnar cleaning pipeline behind the Rusty Scrub viewer.
//!
//! The [`data`] module holds the pure transforms (ingestion, cleaning,
//! selection removal, windowing, export). [`state`] is the session a host
//! drives them through, [`settings`] its configuration.

pub mod data;
pub mod settings;
pub mod state;
