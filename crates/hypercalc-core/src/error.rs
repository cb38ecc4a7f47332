use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("invalid number `{text}`: {reason}")]
    Literal { text: String, reason: String },

    #[error("syntax error in `{text}` at offset {offset}: {reason}")]
    Syntax {
        text: String,
        offset: usize,
        reason: String,
    },

    #[error("unbalanced parentheses in `{0}`")]
    Unbalanced(String),

    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("no result for `{expression}`")]
    NoResult { expression: String },

    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    #[error("invalid binding: {0}")]
    Binding(String),
}

impl CalcError {
    pub fn literal(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Literal {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn syntax(text: impl Into<String>, offset: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            text: text.into(),
            offset,
            reason: reason.into(),
        }
    }

    pub fn no_result(expression: impl Into<String>) -> Self {
        Self::NoResult {
            expression: expression.into(),
        }
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
