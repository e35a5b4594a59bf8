// src/lib.rs — Library root for tripmate

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod infra;
pub mod memory;
pub mod provider;
