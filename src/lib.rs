#![forbid(unsafe_code)]

//! Personal task planner backend.
//!
//! Ranks tasks for a daily plan, detects workload overload, and proposes
//! rule-based and reflection-derived suggestions.

pub mod capture;
pub mod config;
pub mod engine;
pub mod errors;
pub mod generative;
pub mod http;
pub mod models;
pub mod persistence;
pub mod planner;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
