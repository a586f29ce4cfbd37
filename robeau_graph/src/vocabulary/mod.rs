//! Vocabulary shared between the engine and the store content.
//!
//! - **Labels**: The fixed set of node labels and the source that queries them
//! - **Relationships**: The closed 12-member edge taxonomy, grouped by family
//! - **Markers**: Reserved node texts with engine-defined meaning

mod label;
mod marker;
mod relationship;

pub use label::*;
pub use marker::*;
pub use relationship::*;

/// Case-insensitive comparison of two node texts.
///
/// Nodes are addressed by their text regardless of case, both in the store
/// and in the conversation state.
pub fn same_node(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Normalized lookup key for a node text.
pub fn node_key(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_node_ignores_case() {
        assert!(same_node("Hello", "hello"));
        assert!(same_node("ÉCOLE", "école"));
        assert!(!same_node("hello", "hello there"));
    }

    #[test]
    fn test_node_key() {
        assert_eq!(node_key("Hi There"), "hi there");
    }
}
