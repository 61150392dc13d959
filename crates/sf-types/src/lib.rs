#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type tag for a column. Closed over the three supported element types;
/// every consumer matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DType {
    String,
    Int,
    Float,
}

impl DType {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Integer",
            Self::Float => "Float",
        }
    }

    /// Parse a textual type tag. This is the only place an unrecognized
    /// tag can enter the system; everywhere else `DType` is already closed.
    pub fn parse(tag: &str) -> Result<Self, TypeParseError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(Self::String),
            "int" | "integer" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            _ => Err(TypeParseError::UnknownType {
                value: tag.to_owned(),
            }),
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("unknown column type: {value}")]
    UnknownType { value: String },
}

#[cfg(test)]
mod tests {
    use super::{DType, TypeParseError};

    #[test]
    fn parse_accepts_every_tag_spelling() {
        assert_eq!(DType::parse("string").expect("string"), DType::String);
        assert_eq!(DType::parse("str").expect("str"), DType::String);
        assert_eq!(DType::parse("Integer").expect("integer"), DType::Int);
        assert_eq!(DType::parse(" int ").expect("int"), DType::Int);
        assert_eq!(DType::parse("FLOAT").expect("float"), DType::Float);
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        let err = DType::parse("decimal").expect_err("must fail");
        assert_eq!(
            err,
            TypeParseError::UnknownType {
                value: "decimal".to_owned()
            }
        );
        assert_eq!(err.to_string(), "unknown column type: decimal");
    }

    #[test]
    fn display_matches_tag_vocabulary() {
        assert_eq!(DType::String.to_string(), "String");
        assert_eq!(DType::Int.to_string(), "Integer");
        assert_eq!(DType::Float.to_string(), "Float");
    }
}
