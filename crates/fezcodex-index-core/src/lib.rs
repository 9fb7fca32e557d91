//! # Fezcodex Index Core
//!
//! Shared, I/O-free logic for the Fezcodex search index: the unified
//! record model, the per-source normalization functions, the content
//! source abstraction, and the substring filter engine.
//!
//! This crate contains no tokio, network, or filesystem code. The
//! application crate (`fezcodex-index`) supplies HTTP and directory
//! sources and drives the fan-out build.
//!
//! ```text
//! ContentSource ──▶ normalize::* ──▶ Vec<SearchableRecord> ──▶ filter::filter_items
//! ```

pub mod catalog;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod source;
