//! Error types for JSONPath operations
//!
//! Parse and syntax errors carry the offending input and byte position so
//! callers can point at the exact character that broke the expression.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// JSONPath error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JSONPathError {
    /// Parse errors during JSONPath expression parsing
    #[error("Parse error at position {position}: {message}")]
    Parse {
        message: String,
        position: usize,
        input: String,
    },

    /// Syntax errors with the tokens that would have been accepted
    #[error("Syntax error: {message}")]
    Syntax {
        message: String,
        position: usize,
        input: String,
        expected: Vec<String>,
        found: String,
    },

    /// Runtime execution errors
    #[error("Execution error: {message}")]
    Execution { message: String, path: String },

    /// Valid JSONPath that this engine does not evaluate
    #[error("Unsupported feature: {feature}")]
    Unsupported {
        feature: String,
        alternative: Option<String>,
    },
}

impl JSONPathError {
    /// Create a parse error with position and context
    pub fn parse(message: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            position,
            input: input.into(),
        }
    }

    /// Create a syntax error with detailed information
    pub fn syntax(
        message: impl Into<String>,
        position: usize,
        input: impl Into<String>,
        expected: Vec<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
            input: input.into(),
            expected,
            found: found.into(),
        }
    }

    pub fn execution(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn unsupported(feature: impl Into<String>, alternative: Option<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
            alternative,
        }
    }

    /// Byte offset into the expression, for errors raised while parsing
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse { position, .. } | Self::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Get the error message with a caret under the failing character
    pub fn detailed_message(&self) -> String {
        match self {
            Self::Parse {
                message,
                position,
                input,
            } => {
                let mut result = format!("Parse error at position {}: {}", position, message);
                push_caret(&mut result, input, *position);
                result
            }
            Self::Syntax {
                message,
                position,
                input,
                expected,
                found,
            } => {
                let mut result = format!("Syntax error at position {}: {}", position, message);
                result.push_str(&format!("\nExpected one of: {}", expected.join(", ")));
                result.push_str(&format!("\nFound: {}", found));
                push_caret(&mut result, input, *position);
                result
            }
            Self::Unsupported {
                feature,
                alternative: Some(alternative),
            } => format!("Unsupported feature: {}\nUse {} instead", feature, alternative),
            _ => self.to_string(),
        }
    }
}

fn push_caret(result: &mut String, input: &str, position: usize) {
    if input.is_empty() {
        return;
    }
    result.push_str(&format!("\nInput: {}", input));
    if position <= input.len() {
        let column = input[..position.min(input.len())].chars().count();
        result.push_str(&format!("\n       {}^", " ".repeat(column)));
    }
}
