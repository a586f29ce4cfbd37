//! # Robeau Graph
//!
//! The dialogue script crate - the vocabulary the engine and the graph store
//! agree on, plus the narrow read-only interface through which the engine
//! queries outgoing edges. This crate does not resolve anything; it only
//! describes and serves the script.
//!
//! ## Core Components
//!
//! - **vocabulary**: Node labels, query sources, the relationship taxonomy and the reserved marker nodes
//! - **edge**: Typed, parameterized connections between two nodes
//! - **store**: The `GraphStore` trait, an in-memory store and script file loading

pub mod edge;
pub mod error;
pub mod store;
pub mod vocabulary;

pub use edge::*;
pub use error::*;
pub use store::*;
pub use vocabulary::*;
