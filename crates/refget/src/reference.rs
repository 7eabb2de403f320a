use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::schema::{self, Schema};

/// A value as written by the user: either a literal or `schema:remainder`.
///
/// Splitting never fails. A string whose prefix is not in the grammar is a
/// literal, even if it contains colons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    schema: Option<Schema>,
    remainder: String,
}

impl Reference {
    /// Split `input` at its first colon (see [`schema::split`])
    pub fn parse(input: &str) -> Self {
        let (prefix, remainder) = schema::split(input);

        Self {
            schema: Schema::parse(prefix),
            remainder: remainder.to_string(),
        }
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Everything after the first colon, or the whole input for literals
    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    /// Check if this is a literal value (not a reference)
    pub fn is_literal(&self) -> bool {
        self.schema.is_none()
    }

    /// Backend name for logging/errors
    pub fn backend_name(&self) -> &'static str {
        self.schema
            .as_ref()
            .map_or("literal", |schema| schema.backend_name())
    }
}

impl FromStr for Reference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Renders the input it was parsed from
impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}:{}", schema.as_str(), self.remainder),
            None => f.write_str(&self.remainder),
        }
    }
}

/// Custom serde deserializer so config fields can hold references directly
impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Reference::parse(&s))
    }
}
