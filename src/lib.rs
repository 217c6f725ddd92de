//! Live polling service.
//!
//! Polls live in an in-memory [`store::PollStore`] owned by a
//! [`service::PollService`]. Clients create polls and vote over the JSON API
//! under `/api`, or push the same actions over the `/ws` socket. Every change
//! is broadcast as a whole poll to all connected observers, and a new observer
//! first receives a `currentPolls` snapshot of everything created so far.
//!
//! State is process memory only and is lost on restart.

pub mod config;
pub mod error;
pub mod events;
pub mod polls;
pub mod service;
pub mod startup;
pub mod store;

pub use config::Config;
pub use service::PollService;
pub use startup::build_router;
