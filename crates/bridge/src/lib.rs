//! `discovery-bridge` -- best-effort forwarding of scan results to the
//! downstream analysis API.
//!
//! [`AnalysisBridge`](client::AnalysisBridge) performs a single
//! `POST {base_url}/discovery/analyze` per result.
//! [`Forwarder`](forwarder::Forwarder) runs those calls as detached,
//! tracked tasks so the scan response never waits on them.

pub mod client;
pub mod config;
pub mod error;
pub mod forwarder;
pub mod payload;
