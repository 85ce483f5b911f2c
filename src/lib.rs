//! Core library for the Stocksim classroom stock-trading client.
//!
//! Students trade simulated shares with funds issued by their teacher;
//! all business logic (pricing, balances, trade execution) runs on the
//! backend. This crate is the headless core a client front-end links
//! against:
//!
//! - [`auth`]: session lifecycle, secure credential persistence, and the
//!   periodic token-expiry watcher
//! - [`api`]: authenticated HTTP client for the backend
//! - [`models`]: JSON shapes of the backend contract
//! - [`chart`]: time-windowed downsampling of portfolio series for display
//! - [`config`]: on-disk application configuration

pub mod api;
pub mod auth;
pub mod chart;
pub mod config;
pub mod models;
