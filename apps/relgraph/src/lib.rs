//! # relgraph
//!
//! Hosting layer for the relgraph engine: configuration, snapshot sources
//! and the HTTP API. The binary's CLI is built on top of this library.

pub mod api;
pub mod config;
pub mod source;
