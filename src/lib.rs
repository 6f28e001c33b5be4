//! Library crate for pickem-pool, exposing the scoring engine, standings and
//! services to the binaries and integration tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod services;
pub mod state;
