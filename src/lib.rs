//! Core library for the `reqflow` CLI.
//!
//! `reqflow` runs HTTP requests described in a config file, either as a
//! batch (optionally concurrent) or as a chain where values extracted from
//! one JSON response feed the path, headers and bodies of the requests that
//! depend on it. The binary wires these pieces together; this crate exposes
//! them: CLI argument types, config loading and validation, the HTTP
//! collaborators, the chain and batch engines, and terminal output.
pub mod args;
pub mod chain;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod http;
pub mod report;
