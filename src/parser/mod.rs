//! Event-Stream Parser
//!
//! Builds model elements from nested start/end events.
//!
//! Architecture:
//! - `events`: format-independent `Event` stream
//! - `attributes`: inherited per-kind attribute tables
//! - `builder`: construction stack driving the model's add-methods
//! - `xml`: quick-xml adapter producing events from `.ecore` documents
//!
//! Symbolic fields are stored as written; see [`crate::resolver`].

pub mod attributes;
pub mod builder;
pub mod events;
pub mod xml;

pub use builder::Builder;
pub use events::{Attributes, Event};
pub use xml::{parse_bytes, parse_str, XmlEvents};

use serde::{Deserialize, Serialize};

/// Parser settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Attribute that picks the concrete kind of `eClassifiers` / `eStructuralFeatures`
    pub type_discriminator: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            type_discriminator: "xsi:type".to_string(),
        }
    }
}
