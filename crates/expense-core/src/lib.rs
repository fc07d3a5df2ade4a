//! Core library for the student expense predictor
//!
//! This crate provides the core functionality for:
//! - Collecting and encoding survey answers
//! - Loading the trained model artifact
//! - Building feature records and running inference
//! - Formatting predictions and affordability insights
//! - Health checks and observability

pub mod collector;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use error::{PredictorError, Result};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ExpenseMetrics, StructuredLogger};
