//! Chaejeom - Korean HTML grading proxy API
//!
//! A small backend that keeps the OpenAI credential server-side, runs fast
//! local spelling checks, and centralizes the scoring policy.

pub mod category;
pub mod checker;
pub mod config;
pub mod extractor;
pub mod llm;
pub mod score;
pub mod server;
