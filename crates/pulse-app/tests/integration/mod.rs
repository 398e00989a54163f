//! Integration tests for pulse-app.
//!
//! These tests verify the interaction between components:
//! - Ticker stream connection lifecycle
//! - Snapshot → reconcile → view pipeline against a live socket

pub mod common;
