//! # fairq: client-side tracking for distributed QoS scheduling
//!
//! A client in a distributed quality-of-service scheme talks to many independent servers at once.
//! Each server schedules requests fairly on its own, with no server-to-server coordination and no
//! shared clock, so it cannot see the load this client is placing *elsewhere*. The client closes
//! that gap: it counts its completed responses globally and per server, and tags every outgoing
//! request with two numbers conventionally called **delta** and **rho** — how many responses
//! completed at *other* servers (total, and reservation-phase only) since this server was last
//! contacted. The server's admission control folds those tags into its reservation/weight/limit
//! arithmetic to keep throughput fair across clients.
//!
//! ## API
//!
//! Everything revolves around a single shared [ServiceTracker]:
//! - [ServiceTracker::request_params] — call once per outgoing request, before dispatch; returns
//!   the [ReqParams] to embed in the request tag.
//! - [ServiceTracker::track_response] — call exactly once per completed response, success or
//!   failure, with the [Phase] the server reported.
//!
//! Both operations are synchronous and lock-based; the tracker is safe to share across threads
//! and never blocks on anything but its own mutex.
//!
//! Server entries accumulate for the tracker's lifetime by default. Clients that contact many
//! one-off servers can bound the map with [TrackerConfig::idle_horizon].

mod config;
mod entry;
mod params;
mod tracker;

pub use config::*;
pub use params::*;
pub use tracker::*;
