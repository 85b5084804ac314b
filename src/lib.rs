//! Steadfast - Structured guidance for emotionally charged messages
//!
//! This crate turns raw, distressed or heated input into schema-validated
//! guidance through language-model agents: crisis translation, conversation
//! mediation and proactive coaching, optionally personalized from a stored
//! communication profile.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
