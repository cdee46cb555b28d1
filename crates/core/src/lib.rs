//! `discovery-core` -- scan model and the concurrent dispatch core.
//!
//! Holds everything the discovery service needs that is independent of
//! HTTP: the niche/result data model, the pluggable [`Scanner`] leaf,
//! and the bounded [`ScanPool`] that fans a batch of niches out to
//! concurrent workers and collects exactly one result per niche.
//!
//! [`Scanner`]: scanner::Scanner
//! [`ScanPool`]: pool::ScanPool

pub mod error;
pub mod pool;
pub mod scanner;
pub mod types;
