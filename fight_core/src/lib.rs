//! FightCast Core - fighter resolution and win probability scoring.
//!
//! This crate provides:
//! - Immutable fighter statistics repository with exact/partial/prefix name
//!   resolution and substring search
//! - Schema-versioned feature differencing for paired fighters (baseline,
//!   rebalanced and extended feature sets)
//! - Scoring adapter over pre-trained win probability artifacts, with column
//!   alignment against the model's advertised input order
//! - Response composition: predicted winner, confidence tier, close-fight
//!   flag and per-metric advantage breakdown
//! - Batch card prediction via rayon

pub mod config;
pub mod error;
pub mod features;
pub mod models;
pub mod repository;
pub mod response;
pub mod schema;
pub mod scoring;
pub mod service;

pub use config::PredictorConfig;
pub use error::{PredictError, Result};
pub use features::FeatureVector;
pub use models::*;
pub use repository::FighterRepository;
pub use response::{compose, evaluate};
pub use schema::{SchemaVersion, TierPolicy};
pub use scoring::{LogisticModel, ScoringAdapter, WinModel};
pub use service::PredictionService;
