//! Chow API service
//!
//! HTTP backend for a location-aware community platform: users register,
//! submit joints (points of interest), vote on them, search them by text or
//! by distance, and file complaints that moderators resolve.

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

pub use state::AppState;
