//! Element Payloads
//!
//! Per-kind data carried by an [`Element`](super::Element). Shared parts of the
//! Ecore hierarchy (classifier, typed element, structural feature) are
//! embedded structs rather than inherited fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ElementId, Link};

// =============================================================================
// Shared Parts
// =============================================================================

/// Fields common to classes, data types and enums
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Classifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<ElementId>,
    /// Owning package (set by `add_class` / `add_data_type`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<ElementId>,
}

/// Fields common to attributes, references, operations and parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_type: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_type: Option<ElementId>,
    pub lower_bound: i32,
    /// `-1` is unbounded, `-2` unspecified
    pub upper_bound: i32,
    pub ordered: bool,
    pub unique: bool,
}

impl Default for TypedElement {
    fn default() -> Self {
        Self {
            e_type: None,
            generic_type: None,
            lower_bound: 0,
            upper_bound: 1,
            ordered: true,
            unique: false,
        }
    }
}

impl TypedElement {
    /// Unbounded, unspecified and upper bounds above one hold many values
    pub fn is_many(&self) -> bool {
        self.upper_bound < 0 || self.upper_bound > 1
    }

    pub fn is_required(&self) -> bool {
        self.lower_bound >= 1
    }
}

/// Fields common to attributes and references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralFeature {
    pub typed: TypedElement,
    pub changeable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value_literal: Option<String>,
    pub derived: bool,
    pub transient: bool,
    pub unsettable: bool,
    pub volatile: bool,
    /// Owning class (set by `add_attribute` / `add_reference`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containing_class: Option<ElementId>,
}

impl Default for StructuralFeature {
    fn default() -> Self {
        Self {
            typed: TypedElement::default(),
            changeable: true,
            default_value_literal: None,
            derived: false,
            transient: false,
            unsettable: false,
            volatile: false,
            containing_class: None,
        }
    }
}

// =============================================================================
// Concrete Kinds
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EPackage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ns_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ns_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_instance: Option<Link>,
    pub classes: IndexMap<String, ElementId>,
    pub data_types: IndexMap<String, ElementId>,
    pub subpackages: IndexMap<String, ElementId>,
    /// Enclosing package for subpackages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<ElementId>,
    /// Set once every symbolic link below this package has been resolved
    #[serde(default)]
    pub resolved: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EClass {
    pub classifier: Classifier,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    #[serde(rename = "interface")]
    pub is_interface: bool,
    pub super_types: Vec<Link>,
    pub attributes: Vec<ElementId>,
    pub references: Vec<ElementId>,
    pub operations: Vec<ElementId>,
    pub generic_super_types: Vec<ElementId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EDataType {
    pub classifier: Classifier,
    pub serializable: bool,
}

impl Default for EDataType {
    fn default() -> Self {
        Self {
            classifier: Classifier::default(),
            serializable: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EEnum {
    pub data_type: EDataType,
    pub literals: Vec<ElementId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EEnumLiteral {
    pub value: i32,
    /// Literal text; the literal's name stands in when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<ElementId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EAttribute {
    pub feature: StructuralFeature,
    pub id: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EReference {
    pub feature: StructuralFeature,
    pub containment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opposite: Option<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<Link>,
    /// Hint for lazy proxy handling; resolution is always eager here
    pub resolve_proxies: bool,
}

impl Default for EReference {
    fn default() -> Self {
        Self {
            feature: StructuralFeature::default(),
            containment: false,
            opposite: None,
            keys: Vec::new(),
            resolve_proxies: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EOperation {
    pub typed: TypedElement,
    pub parameters: Vec<ElementId>,
    pub type_parameters: Vec<ElementId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containing_class: Option<ElementId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EParameter {
    pub typed: TypedElement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<ElementId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ETypeParameter {
    pub bounds: Vec<ElementId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EAnnotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub details: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<ElementId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Link>,
}

/// A parameterized type expression
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EGenericType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_parameter: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<ElementId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<ElementId>,
    pub type_arguments: Vec<ElementId>,
}
