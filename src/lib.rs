//! # journal-rank
//!
//! Recommends target journals for an academic paper from a local AJG
//! catalog. A paper (title, abstract, field, objective mode) is matched
//! against a keyword lexicon, narrowed by a topic-fit gate, scored on six
//! signals and optionally reshaped so the allowed rating tiers are evenly
//! represented.
//!
//! ## Architecture
//!
//! ```text
//!        ┌──────────────────────────┐
//!        │  Query + RecommendOptions│
//!        └────────────┬─────────────┘
//!                     ▼
//!        ┌──────────────────────────┐
//!        │ Field scope (ECON expands│
//!        │ to IB&AREA, PUB SEC, ...)│
//!        └────────────┬─────────────┘
//!                     ▼
//!        ┌──────────────────────────┐
//!        │ CandidateFilter hook     │
//!        └────────────┬─────────────┘
//!                     ▼
//!        ┌──────────────────────────┐
//!        │ Topic-fit gate           │
//!        │ width max(topk·8, 80)    │
//!        └────────────┬─────────────┘
//!                     ▼
//!        ┌──────────────────────────┐      fewer than topk?
//!        │ Six-signal scoring       │◄──── re-gate once at
//!        │ + rating filter          │      width × 3
//!        └──────┬─────────────┬─────┘
//!               │             │
//!               ▼             ▼
//!   ┌───────────────────┐  ┌───────────────────┐
//!   │ Quota rebalance   │  │ Candidate pool    │
//!   │ (optional), top-k │  │ JSON export       │
//!   └───────────────────┘  └───────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration and tunable ranking constants
//! - [`models`] - Ratings, modes, catalog rows, queries and score bundles
//! - [`catalog`] - The journal catalog, field scoping and the CSV loader
//! - [`ranking::lexicon`] - Named keyword profiles, built-in and from JSON
//! - [`ranking::scoring`] - Fit, ease, value, prestige, method and domain signals
//! - [`ranking::gate`] - Topic-fit top-N gate
//! - [`ranking::rebalance`] - Tier quota planning with adjacent fill
//! - [`ranking::pipeline`] - The orchestrator tying the stages together
//! - [`ranking::pool`] - Candidate pool export and selection validation
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod ranking;
pub mod state;
