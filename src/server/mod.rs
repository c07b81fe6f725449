//! HTTP server for the decision pipeline.
//!
//! Lets perception and actuator services reach the pipeline over HTTP.
//!
//! # Endpoints
//!
//! - `GET  /health`   liveness probe
//! - `GET  /personas` persona descriptions
//! - `POST /decide`   one decision for a context snapshot
//! - `POST /reward`   feedback for an earlier decision
//! - `GET  /learner`  learner statistics

pub mod routes;

pub use routes::{app_router, AppState, RewardRequest};
