//! # Favz Architecture
//!
//! Favz keeps a user's favorite books in a string key-value store and heals
//! that store when its contents go bad. The core is a library; the `favz`
//! binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, prints, owns exit codes and logging    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Parses selectors, dispatches, collects notifications     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - Turn store outcomes into CmdResult data and messages     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                             │
//! │  - FavoritesStore over a StorageMedium                      │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr. Problems the user
//! should hear about travel as [`notify::Notice`]s; diagnostics go through
//! `tracing`, and only the binary installs a subscriber.
//!
//! ## Identity
//!
//! A favorite's id is derived from its title and author (see [`identity`]),
//! so the same book always maps to the same id and can be added once.
//! The CLI also numbers favorites `1..n` for typing convenience (see [`index`]).
//!
//! ## Testing
//!
//! Command and store logic is tested in-module against [`store::mem_backend::MemBackend`]
//! with a [`clock::ManualClock`]. `tests/` covers the filesystem backend and
//! the binary end to end.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade every client calls
//! - [`commands`]: One module per CLI command
//! - [`store`]: Storage media, probe, recovery and the favorites store
//! - [`model`]: `Book` and `FavoriteRecord`
//! - [`identity`]: Deterministic ids
//! - [`grouping`]: Category projections
//! - [`index`]: Display indexes and selectors
//! - [`notify`]: User-facing notifications
//! - [`clock`]: Time source
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod grouping;
pub mod identity;
pub mod index;
pub mod model;
pub mod notify;
pub mod store;
