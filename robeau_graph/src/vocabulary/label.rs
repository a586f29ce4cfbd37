//! Node labels and query sources.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::GraphError;

/// Who originated the current processing step.
///
/// The source decides which label a node text is looked up under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuerySource {
    /// Text typed or spoken by the user.
    User,
    /// A response produced by the engine itself.
    Robeau,
    /// An engine-internal marker such as the expectation signals.
    System,
}

impl QuerySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuerySource::User => "USER",
            QuerySource::Robeau => "ROBEAU",
            QuerySource::System => "SYSTEM",
        }
    }

    /// The label a node text from this source is looked up under.
    ///
    /// User input switches to `Answer` while expectations are pending; that
    /// decision belongs to the engine.
    pub fn label(&self) -> Label {
        match self {
            QuerySource::User => Label::Prompt,
            QuerySource::Robeau => Label::Response,
            QuerySource::System => Label::Input,
        }
    }
}

impl std::fmt::Display for QuerySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of node labels found in a dialogue script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    // Spoken by the user
    Prompt,
    Whisper,
    Plea,
    Answer,
    Greeting,

    // Spoken by the engine
    Response,
    Question,
    Test,

    // Engine plumbing
    Input,
    Output,
    LogicGate,
    TrafficGate,
}

impl Label {
    pub const ALL: [Label; 12] = [
        Label::Prompt,
        Label::Whisper,
        Label::Plea,
        Label::Answer,
        Label::Greeting,
        Label::Response,
        Label::Question,
        Label::Test,
        Label::Input,
        Label::Output,
        Label::LogicGate,
        Label::TrafficGate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Prompt => "Prompt",
            Label::Whisper => "Whisper",
            Label::Plea => "Plea",
            Label::Answer => "Answer",
            Label::Greeting => "Greeting",
            Label::Response => "Response",
            Label::Question => "Question",
            Label::Test => "Test",
            Label::Input => "Input",
            Label::Output => "Output",
            Label::LogicGate => "LogicGate",
            Label::TrafficGate => "TrafficGate",
        }
    }
}

impl FromStr for Label {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .iter()
            .find(|label| label.as_str() == s)
            .copied()
            .ok_or_else(|| GraphError::UnknownLabel(s.to_string()))
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_label() {
        for label in Label::ALL {
            assert_eq!(label.as_str().parse::<Label>().unwrap(), label);
        }
    }

    #[test]
    fn test_unknown_label() {
        let err = "Shout".parse::<Label>().unwrap_err();
        assert!(matches!(err, GraphError::UnknownLabel(s) if s == "Shout"));
    }

    #[test]
    fn test_source_label() {
        assert_eq!(QuerySource::User.label(), Label::Prompt);
        assert_eq!(QuerySource::Robeau.label(), Label::Response);
        assert_eq!(QuerySource::System.label(), Label::Input);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(QuerySource::Robeau.to_string(), "ROBEAU");
    }
}
