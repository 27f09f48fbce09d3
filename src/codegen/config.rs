//! Codegen Configuration
//!
//! Three groups of settings:
//! - `NamingConfig`: identifier conventions for generated items
//! - `TypeMappings`: how Ecore types are rendered as Rust types
//! - `EmitConfig`: which parts of the output are produced
//!
//! Type mapping tables are data only; classification of a typed element into a
//! [`TypeDesignation`](super::types::TypeDesignation) happens in `types`.

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// Code generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Naming conventions
    pub naming: NamingConfig,

    /// Ecore to Rust type mappings
    pub types: TypeMappings,

    /// Output selection
    pub emit: EmitConfig,
}

/// Naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Appended to a class name to form its implementation struct
    pub impl_suffix: String,

    /// Prefix applied to identifiers that collide with Rust keywords
    pub keyword_escape: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            impl_suffix: "Impl".to_string(),
            keyword_escape: "r#".to_string(),
        }
    }
}

/// Output selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Emit enums and traits
    pub interfaces: bool,

    /// Emit `<Name>Impl` structs for concrete classes
    pub implementations: bool,

    /// Emit `// @model` comments above generated items
    pub model_comments: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            interfaces: true,
            implementations: true,
            model_comments: true,
        }
    }
}

// =============================================================================
// Type Mappings
// =============================================================================

/// Scalar category of a mapped data type, which drives default values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Boolean,
    Integer,
    Float,
    String,
    /// Mapped to a Rust type without a known default
    Other,
}

impl ScalarKind {
    /// `Copy` scalars are returned by value from getters
    pub fn is_copy(self) -> bool {
        matches!(self, Self::Boolean | Self::Integer | Self::Float)
    }
}

/// One Ecore data type and the Rust type it becomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeMapping {
    /// Ecore data type name, e.g. `EInt`
    pub ecore: String,
    /// Rust type, e.g. `i32`
    pub rust: String,
    pub scalar: ScalarKind,
}

impl DataTypeMapping {
    pub fn new(ecore: &str, rust: &str, scalar: ScalarKind) -> Self {
        Self {
            ecore: ecore.to_string(),
            rust: rust.to_string(),
            scalar,
        }
    }
}

/// Rust renderings of Ecore types. `{}` in a template is the element type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeMappings {
    /// Template for many-valued features
    pub many: String,

    /// Type used for many-valued `EStringToStringMapEntry` features
    pub string_map: String,

    /// Template for references to generated class traits
    pub class_ref: String,

    /// Type for data types without a mapping and for unmodelled classes
    pub fallback: String,

    /// Data type table, looked up by Ecore name. Configured entries are
    /// registered over the built-in table.
    #[serde(deserialize_with = "merge_data_types")]
    pub data_types: Vec<DataTypeMapping>,
}

fn merge_data_types<'de, D>(deserializer: D) -> Result<Vec<DataTypeMapping>, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = Vec::<DataTypeMapping>::deserialize(deserializer)?;
    let mut types = TypeMappings::default();
    for mapping in configured {
        types.register(mapping);
    }
    Ok(types.data_types)
}

impl Default for TypeMappings {
    fn default() -> Self {
        use ScalarKind as S;
        let data_types = [
            ("EString", "String", S::String),
            ("EChar", "String", S::String),
            ("ECharacterObject", "String", S::String),
            ("EBoolean", "bool", S::Boolean),
            ("EBooleanObject", "bool", S::Boolean),
            ("EInt", "i32", S::Integer),
            ("EIntegerObject", "i32", S::Integer),
            ("ELong", "i64", S::Integer),
            ("ELongObject", "i64", S::Integer),
            ("EShort", "i16", S::Integer),
            ("EShortObject", "i16", S::Integer),
            ("EByte", "i8", S::Integer),
            ("EByteObject", "i8", S::Integer),
            ("EFloat", "f32", S::Float),
            ("EFloatObject", "f32", S::Float),
            ("EDouble", "f64", S::Float),
            ("EDoubleObject", "f64", S::Float),
            ("EByteArray", "Vec<u8>", S::Other),
        ]
        .into_iter()
        .map(|(ecore, rust, scalar)| DataTypeMapping::new(ecore, rust, scalar))
        .collect();

        Self {
            many: "Vec<{}>".to_string(),
            string_map: "HashMap<String, String>".to_string(),
            class_ref: "Rc<dyn {}>".to_string(),
            fallback: "Box<dyn Any>".to_string(),
            data_types,
        }
    }
}

impl TypeMappings {
    /// Mapping registered for the Ecore data type `name`
    pub fn data_type(&self, name: &str) -> Option<&DataTypeMapping> {
        self.data_types.iter().find(|m| m.ecore == name)
    }

    /// Register or replace a data type mapping
    pub fn register(&mut self, mapping: DataTypeMapping) {
        match self.data_types.iter_mut().find(|m| m.ecore == mapping.ecore) {
            Some(existing) => *existing = mapping,
            None => self.data_types.push(mapping),
        }
    }

    pub fn many_of(&self, element: &str) -> String {
        self.many.replace("{}", element)
    }

    pub fn class_ref_of(&self, trait_path: &str) -> String {
        self.class_ref.replace("{}", trait_path)
    }
}
