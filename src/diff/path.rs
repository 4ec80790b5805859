//! Attribute paths in standard attribute notation.
//!
//! A path names an attribute or one sub-attribute of a complex attribute,
//! optionally qualified by the URI of the schema defining it:
//!
//! ```text
//! [schema:]attribute[.subAttribute]
//! ```
//!
//! The schema is everything before the last `:`, so URNs such as
//! `urn:ietf:params:scim:schemas:core:2.0:User` are handled even though they
//! contain both `:` and `.`.

use crate::error::{ParseError, ParseResult};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A parsed `(schema, attribute, sub-attribute)` triple.
///
/// Equality, ordering and hashing ignore ASCII case on every component.
/// Display output parses back to an equal path.
#[derive(Debug, Clone)]
pub struct AttributePath {
    schema: Option<String>,
    attribute_name: String,
    sub_attribute_name: Option<String>,
}

impl AttributePath {
    /// Build a path from already validated parts. An empty schema is treated
    /// as no schema.
    pub fn new(
        schema: Option<&str>,
        attribute_name: impl Into<String>,
        sub_attribute_name: Option<&str>,
    ) -> Self {
        Self {
            schema: schema.filter(|s| !s.is_empty()).map(str::to_string),
            attribute_name: attribute_name.into(),
            sub_attribute_name: sub_attribute_name.map(str::to_string),
        }
    }

    /// Parse a path such as `name.givenName` or
    /// `urn:ietf:params:scim:schemas:extension:enterprise:2.0:User:manager.value`.
    pub fn parse(text: &str) -> ParseResult<Self> {
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let (schema, remainder) = match text.rfind(':') {
            Some(index) => {
                let schema = &text[..index];
                if schema.is_empty() {
                    return Err(ParseError::EmptySchema {
                        path: text.to_string(),
                    });
                }
                (Some(schema), &text[index + 1..])
            }
            None => (None, text),
        };

        let mut parts = remainder.split('.');
        let attribute_name = parts.next().unwrap_or_default();
        let sub_attribute_name = parts.next();
        if parts.next().is_some() {
            return Err(ParseError::TooManySeparators {
                token: remainder.to_string(),
            });
        }

        if attribute_name.is_empty() {
            return Err(ParseError::EmptyAttributeName {
                path: text.to_string(),
            });
        }
        validate_name(attribute_name)?;

        if let Some(sub) = sub_attribute_name {
            if sub.is_empty() {
                return Err(ParseError::EmptySubAttributeName {
                    path: text.to_string(),
                });
            }
            validate_name(sub)?;
        }

        Ok(Self::new(schema, attribute_name, sub_attribute_name))
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// The schema, or `default` when the path is unqualified.
    pub fn schema_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.schema.as_deref().unwrap_or(default)
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    pub fn sub_attribute_name(&self) -> Option<&str> {
        self.sub_attribute_name.as_deref()
    }

    /// Drop the schema qualifier when it is the resource's default schema.
    pub fn relative_to(mut self, default_schema: &str) -> Self {
        if self
            .schema
            .as_deref()
            .is_some_and(|schema| schema.eq_ignore_ascii_case(default_schema))
        {
            self.schema = None;
        }
        self
    }

    fn normalized(&self) -> (Option<String>, String, Option<String>) {
        (
            self.schema.as_deref().map(str::to_ascii_lowercase),
            self.attribute_name.to_ascii_lowercase(),
            self.sub_attribute_name.as_deref().map(str::to_ascii_lowercase),
        )
    }
}

/// ATTRNAME from RFC 7644: letters, digits, `_`, `-`, plus `$` for `$ref`.
fn validate_name(name: &str) -> ParseResult<()> {
    match name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$')))
    {
        Some(character) => Err(ParseError::InvalidCharacter {
            token: name.to_string(),
            character,
        }),
        None => Ok(()),
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}:", schema)?;
        }
        f.write_str(&self.attribute_name)?;
        if let Some(sub) = &self.sub_attribute_name {
            write!(f, ".{}", sub)?;
        }
        Ok(())
    }
}

impl FromStr for AttributePath {
    type Err = ParseError;

    fn from_str(s: &str) -> ParseResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for AttributePath {
    type Error = ParseError;

    fn try_from(value: &str) -> ParseResult<Self> {
        Self::parse(value)
    }
}

impl PartialEq for AttributePath {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for AttributePath {}

impl Hash for AttributePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl PartialOrd for AttributePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized().cmp(&other.normalized())
    }
}
