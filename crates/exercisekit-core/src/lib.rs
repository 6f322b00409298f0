//! exercisekit-core — Question model, normalizer, and exercise dispatcher.
//!
//! This crate defines the question and response contract, the casing
//! normalizer, the widget traits, and the dispatcher that the widget
//! crates plug into.

pub mod config;
pub mod data;
pub mod debug;
pub mod dispatch;
pub mod error;
pub mod grading;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod notice;
pub mod response;
pub mod scoring;
pub mod traits;
