//! Resolution - what a node's outgoing edges do.
//!
//! Resolving one node runs in phases:
//! 1. **Classify**: Partition edges by relationship type
//! 2. **Define**: Write locks, unlocks, primes, expectations and initiations
//! 3. **Modify**: Disable primes and initiations, revert locks and unlocks
//! 4. **Activate**: Pick the edges that fire, by priority, locking and pooling

mod activation;
mod classifier;
mod definitions;
mod modifications;
mod pool;

pub use activation::*;
pub use classifier::*;
pub use definitions::*;
pub use modifications::*;
pub use pool::*;
