//! Error types for SCIM diff operations.
//!
//! Path parsing, resource materialization and schema lookups each have their
//! own error type; [`ScimError`] ties them together for the public API.

/// Main error type for diff and patch-body operations.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// An attribute path given to the selector could not be parsed
    #[error("Invalid attribute path: {0}")]
    InvalidPath(#[from] ParseError),

    /// The resource factory rejected the assembled attribute tree
    #[error("Invalid {resource_type} resource: {source}")]
    InvalidResource {
        resource_type: String,
        #[source]
        source: ValidationError,
    },

    /// No resource descriptor is registered under this name
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    /// Schema not found errors
    #[error("Schema not found: {schema_id}")]
    SchemaNotFound { schema_id: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while parsing attribute path text such as `name.givenName`.
///
/// Every variant carries the offending token so callers can point at it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The path text was empty
    #[error("attribute path is empty")]
    Empty,

    /// A `schema:` prefix was present but the schema part was empty
    #[error("empty schema in attribute path '{path}'")]
    EmptySchema { path: String },

    /// The attribute name was empty
    #[error("empty attribute name in attribute path '{path}'")]
    EmptyAttributeName { path: String },

    /// A `.` separator was not followed by a sub-attribute name
    #[error("empty sub-attribute name in attribute path '{path}'")]
    EmptySubAttributeName { path: String },

    /// More than one `.` separator after the schema
    #[error("too many '.' separators in '{token}'")]
    TooManySeparators { token: String },

    /// A name contained a character outside the attribute name grammar
    #[error("invalid character '{character}' in '{token}'")]
    InvalidCharacter { token: String, character: char },
}

/// Structural errors found while building or materializing a resource.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Resource JSON is not an object
    #[error("Resource must be a JSON object")]
    NotAnObject,

    /// Attribute is not defined by any schema of the resource type
    #[error("Unknown attribute '{attribute}' in schema '{schema_id}'")]
    UnknownAttribute {
        attribute: String,
        schema_id: String,
    },

    /// Schema is not part of the resource type
    #[error("Schema '{schema_id}' is not supported by resource type '{resource_type}'")]
    UnsupportedSchema {
        schema_id: String,
        resource_type: String,
    },

    /// Complex value contains an undefined sub-attribute
    #[error("Complex attribute '{attribute}' contains unknown sub-attribute '{sub_attribute}'")]
    UnknownSubAttribute {
        attribute: String,
        sub_attribute: String,
    },

    /// Attribute value doesn't match expected type
    #[error("Attribute '{attribute}' has invalid type, expected {expected}, got {actual}")]
    InvalidAttributeType {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Invalid datetime format
    #[error("Attribute '{attribute}' has invalid datetime format: {value}")]
    InvalidDateTimeFormat { attribute: String, value: String },

    /// Multi-valued attribute provided as single value
    #[error("Attribute '{attribute}' must be multi-valued (array)")]
    ExpectedMultiValue { attribute: String },

    /// Single-valued attribute provided as array or with several values
    #[error("Attribute '{attribute}' must be single-valued")]
    ExpectedSingleValue { attribute: String },

    /// Attribute holds no values at all
    #[error("Attribute '{attribute}' has no values")]
    EmptyAttribute { attribute: String },

    /// Nested complex attributes (not allowed)
    #[error("Nested complex attributes are not allowed: '{attribute}'")]
    NestedComplexAttributes { attribute: String },

    /// The factory expected a different resource type
    #[error("Expected resource type '{expected}', got '{actual}'")]
    ResourceTypeMismatch { expected: String, actual: String },

    /// General validation error with custom message
    #[error("Validation failed: {message}")]
    Custom { message: String },
}

impl ScimError {
    /// Create a schema not found error
    pub fn schema_not_found(schema_id: impl Into<String>) -> Self {
        Self::SchemaNotFound {
            schema_id: schema_id.into(),
        }
    }

    /// Wrap a factory failure for the given resource type
    pub fn invalid_resource(resource_type: impl Into<String>, source: ValidationError) -> Self {
        Self::InvalidResource {
            resource_type: resource_type.into(),
            source,
        }
    }
}

impl ValidationError {
    /// Create an invalid type error
    pub fn invalid_type(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidAttributeType {
            attribute: attribute.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a custom validation error
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type ParseResult<T> = Result<T, ParseError>;
