//! Selector parser

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("selector must start with '$': {0}")]
    MissingRoot(String),
    #[error("trailing dot in selector: {0}")]
    TrailingDot(String),
    #[error("empty field name in selector: {0}")]
    EmptyFieldName(String),
    #[error("doubled dot in selector: {0}")]
    DoubledDot(String),
    #[error("unexpected character '{ch}' in selector: {selector}")]
    UnexpectedCharacter { ch: char, selector: String },
    #[error("unsupported index {index} in selector: {selector} (only [*] is allowed)")]
    UnsupportedIndex { index: String, selector: String },
}

/// One access step of a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `.name` - look up a key on a mapping
    Field(String),
    /// `[*]` - expand every element of a sequence
    Wildcard,
}

/// A parsed selector such as `$.items[*].id`
///
/// Immutable once parsed. Displaying a selector reproduces the text it was
/// parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    segments: Vec<Segment>,
}

impl Selector {
    /// Parse selector text
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        parse_selector(input)
    }

    /// The selector that matches the root value itself (`$`)
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when no wildcard step is present, so at most one value can match
    pub fn is_scalar(&self) -> bool {
        !self
            .segments
            .iter()
            .any(|segment| matches!(segment, Segment::Wildcard))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Wildcard => f.write_str("[*]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}

/// Parse a selector string
///
/// Accepted forms are `$`, `$.field`, `$.a.b.c` and any chain of `.field`
/// and `[*]` steps. Numeric indices and filters are rejected.
pub fn parse_selector(input: &str) -> Result<Selector, SelectorError> {
    if input.is_empty() {
        return Err(SelectorError::Empty);
    }
    let mut rest = input
        .strip_prefix('$')
        .ok_or_else(|| SelectorError::MissingRoot(input.to_string()))?;

    let mut segments = Vec::new();

    while let Some(first) = rest.chars().next() {
        match first {
            '.' => {
                let after_dot = &rest[1..];
                match after_dot.chars().next() {
                    None => return Err(SelectorError::TrailingDot(input.to_string())),
                    Some('.') => return Err(SelectorError::DoubledDot(input.to_string())),
                    Some('[') => return Err(SelectorError::EmptyFieldName(input.to_string())),
                    Some(_) => {}
                }
                let end = after_dot.find(['.', '[']).unwrap_or(after_dot.len());
                segments.push(Segment::Field(after_dot[..end].to_string()));
                rest = &after_dot[end..];
            }
            '[' => {
                if let Some(after) = rest.strip_prefix("[*]") {
                    segments.push(Segment::Wildcard);
                    rest = after;
                } else {
                    let index = match rest.find(']') {
                        Some(close) => &rest[..=close],
                        None => rest,
                    };
                    return Err(SelectorError::UnsupportedIndex {
                        index: index.to_string(),
                        selector: input.to_string(),
                    });
                }
            }
            ch => {
                return Err(SelectorError::UnexpectedCharacter {
                    ch,
                    selector: input.to_string(),
                })
            }
        }
    }

    Ok(Selector { segments })
}
