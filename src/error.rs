//! Error types for parsing, resolving and generating Ecore models

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, EcoreError>;

/// Model toolkit errors
#[derive(Error, Debug)]
pub enum EcoreError {
    #[error("Unexpected attribute '{attribute}' on {element}")]
    UnexpectedAttribute { attribute: String, element: String },

    #[error("Invalid value '{value}' for attribute '{attribute}': expected {expected}")]
    InvalidAttributeValue {
        attribute: String,
        value: String,
        expected: &'static str,
    },

    #[error("Missing type discriminator on <{tag}>")]
    MissingDiscriminator { tag: String },

    #[error("Unrecognized {tag} type '{value}'")]
    UnrecognizedDiscriminator { tag: String, value: String },

    #[error("Unexpected element <{tag}>{}", suffix(" inside ", .parent, ""))]
    UnexpectedElement { tag: String, parent: Option<String> },

    #[error("Unbalanced element events: {0}")]
    UnbalancedEvents(String),

    #[error("Expected {expected}, found {found}")]
    KindMismatch { expected: String, found: String },

    #[error("Duplicate name '{name}' in {container}")]
    DuplicateName { container: String, name: String },

    #[error("Element {element} is already contained by another element")]
    AlreadyContained { element: String },

    #[error("Unable to resolve uri {uri}{}", suffix(" (referenced from ", .element, ")"))]
    UnresolvableReference { uri: String, element: Option<String> },

    #[error("No EPackage for namespace prefix {prefix} (uri {uri})")]
    MissingPackage { prefix: String, uri: String },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

fn suffix(lead: &str, value: &Option<String>, tail: &str) -> String {
    value
        .as_ref()
        .map(|v| format!("{}{}{}", lead, v, tail))
        .unwrap_or_default()
}

impl EcoreError {
    /// Create an XML error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create an unresolvable reference error
    pub fn unresolvable(uri: impl Into<String>, element: Option<String>) -> Self {
        Self::UnresolvableReference {
            uri: uri.into(),
            element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_context_in_messages() {
        let bare = EcoreError::unresolvable("#//X", None);
        assert_eq!(bare.to_string(), "Unable to resolve uri #//X");

        let located = EcoreError::unresolvable("#//X", Some("p.A".to_string()));
        assert_eq!(located.to_string(), "Unable to resolve uri #//X (referenced from p.A)");

        let nested = EcoreError::UnexpectedElement {
            tag: "eFoo".to_string(),
            parent: Some("EClass".to_string()),
        };
        assert_eq!(nested.to_string(), "Unexpected element <eFoo> inside EClass");
    }
}
