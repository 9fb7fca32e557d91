//! # Fezcodex Index
//!
//! Builds the searchable index behind the Fezcodex command palette and
//! search box, and filters it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ContentSource │──▶│   indexer   │──▶│ SearchIndex  │
//! │ HTTP / Dir   │   │ fan-out/in  │   │ watch state  │
//! └──────────────┘   └─────────────┘   └──────┬───────┘
//!                                             │ filter_items
//!                       ┌─────────────────────┤
//!                       ▼                     ▼
//!                 ┌──────────┐          ┌──────────┐
//!                 │   CLI    │          │   HTTP   │
//!                 │ (fezdex) │          │  (axum)  │
//!                 └──────────┘          └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! fezdex --base-url https://fezcode.com index
//! fezdex --root ./public search "gorillaz music"
//! fezdex --config ./config/fezdex.toml serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`source_http`] | HTTP content source |
//! | [`source_fs`] | Local directory content source |
//! | [`sources`] | Source selection and resource health |
//! | [`indexer`] | Fan-out/fan-in index build |
//! | [`index`] | Live index with loading flag and stale-build guard |
//! | [`search`] | CLI search |
//! | [`index_cmd`] | CLI index summary |
//! | [`server`] | HTTP JSON API |
//!
//! The record model, normalization, and filter engine live in
//! [`fezcodex_index_core`], re-exported as [`index_core`].

pub use fezcodex_index_core as index_core;

pub mod config;
pub mod index;
pub mod index_cmd;
pub mod indexer;
pub mod search;
pub mod server;
pub mod source_fs;
pub mod source_http;
pub mod sources;
