//! # Robeau Core
//!
//! The dialogue resolution engine. Given a node - an utterance or a system
//! marker - it queries the dialogue graph for outgoing typed edges, applies
//! them to a timed conversation state, decides which edges fire, and follows
//! the fired responses recursively. A background loop ages the state once per
//! tick and fires scheduled initiations.
//!
//! ## Core Components
//!
//! - **conversation_state**: Locks, unlocks, expectations, primes and initiations with countdowns
//! - **resolution**: Classification, definitions, modifications and activation of edges
//! - **engine**: The recursive node processor
//! - **expiry**: The timed-expiry background loop
//! - **session**: Engine plus expiry loop, with cooperative shutdown
//! - **events**: Outputs and expectation signals reported to the driver
//!
//! ## Design Philosophy
//!
//! - **Script-Driven**: All dialogue behavior lives in the graph; the engine only interprets edge types
//! - **Explicit State**: Every operation receives its store and state handles, nothing is global
//! - **One Lock**: Each read-modify-write on the conversation state happens under a single mutex

pub mod config;
pub mod conversation_state;
pub mod engine;
pub mod error;
pub mod events;
pub mod expiry;
pub mod resolution;
pub mod session;

pub use config::*;
pub use conversation_state::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use expiry::*;
pub use resolution::*;
pub use session::*;
