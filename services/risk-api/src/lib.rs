//! Risk API Service Library
//!
//! This crate provides the HTTP layer over a [`risk_processor::RiskDataset`]:
//! configuration, routing, handlers and the listener bootstrap.

pub mod config;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
