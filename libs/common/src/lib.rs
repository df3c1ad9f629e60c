//! Common library for the Chow platform
//!
//! This crate provides the shared persistence plumbing used by the services:
//! connection pooling, schema migrations and the store-boundary error type.

pub mod database;
pub mod error;
