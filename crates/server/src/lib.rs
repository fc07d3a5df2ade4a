//! REST front-end for the student expense predictor

pub mod api;
pub mod config;
