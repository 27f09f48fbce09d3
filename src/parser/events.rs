//! Builder input events

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attribute map of a start event, in document order
pub type Attributes = IndexMap<String, String>;

/// One nesting event of a schema document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Start { tag: String, attributes: Attributes },
    End,
}

impl Event {
    pub fn start<K, V>(tag: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Start {
            tag: tag.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Start event without attributes
    pub fn open(tag: impl Into<String>) -> Self {
        Self::Start {
            tag: tag.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn end() -> Self {
        Self::End
    }
}
