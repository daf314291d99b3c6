use serde::Serialize;

/// A translation error. Every run either succeeds completely or yields
/// exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilError {
    /// Malformed input: the first lexical or syntactic violation found.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },

    /// A node that cannot be reduced to, or rendered as, one of the known
    /// entity kinds.
    #[error("unsupported construct: {construct}")]
    Unsupported { construct: String },
}

impl FilError {
    pub fn syntax(line: u32, column: u32, message: impl Into<String>) -> Self {
        FilError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn unsupported(construct: impl Into<String>) -> Self {
        FilError::Unsupported {
            construct: construct.into(),
        }
    }

    /// Source position of the error, when it has one.
    pub fn position(&self) -> Option<(u32, u32)> {
        match self {
            FilError::Syntax { line, column, .. } => Some((*line, *column)),
            FilError::Unsupported { .. } => None,
        }
    }

    /// Serialize to a JSON object that always carries every field
    /// (null for the ones that do not apply).
    pub fn to_json_value(&self) -> serde_json::Value {
        let (line, column) = match self.position() {
            Some((l, c)) => (Some(l), Some(c)),
            None => (None, None),
        };
        let (kind, message) = match self {
            FilError::Syntax { message, .. } => ("syntax", message.as_str()),
            FilError::Unsupported { construct } => ("unsupported", construct.as_str()),
        };
        serde_json::json!({
            "column":  column,
            "kind":    kind,
            "line":    line,
            "message": message,
            "text":    self.to_string(),
        })
    }
}
