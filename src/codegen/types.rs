//! Type Mapping
//!
//! Classifies typed elements into a [`TypeDesignation`] and materializes the
//! default value a generated field starts with.
//!
//! - data types map through [`TypeMappings::data_types`], unknown ones to the fallback
//! - enums map to their generated enum, classes to the `class_ref` template
//! - many-valued elements wrap with the `many` template, except
//!   `EStringToStringMapEntry` which becomes a string map
//! - fields without a default become `Option<T>` starting at `None`

use super::config::{ScalarKind, TypeMappings};
use super::names;
use crate::model::{ElementId, ElementKind, Link, Model, ECORE_NS_URI, STRING_TO_STRING_MAP_ENTRY};

// =============================================================================
// Type Designation
// =============================================================================

/// Rust-side category of an Ecore type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesignation {
    Scalar { rust: String, kind: ScalarKind },
    /// Generated enum, addressed by `path`
    Enum { path: String, id: ElementId },
    /// Generated class trait, addressed by `path`
    Class { path: String },
    /// Fallback type
    Object,
    StringMap,
    Many(Box<TypeDesignation>),
    /// Operation without a return type
    Unit,
}

impl TypeDesignation {
    /// Rust type text
    pub fn render(&self, types: &TypeMappings) -> String {
        match self {
            Self::Scalar { rust, .. } => rust.clone(),
            Self::Enum { path, .. } => path.clone(),
            Self::Class { path } => types.class_ref_of(path),
            Self::Object => types.fallback.clone(),
            Self::StringMap => types.string_map.clone(),
            Self::Many(inner) => types.many_of(&inner.render(types)),
            Self::Unit => "()".to_string(),
        }
    }

    /// Returned by value from getters
    pub fn is_copy(&self) -> bool {
        match self {
            Self::Scalar { kind, .. } => kind.is_copy(),
            Self::Enum { .. } => true,
            _ => false,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Scalar { kind: ScalarKind::Boolean, .. })
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_) | Self::StringMap)
    }
}

/// A structural feature's Rust field type and initial value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub designation: TypeDesignation,
    /// Initial value expression; `None` makes the field optional
    pub default: Option<String>,
}

impl FieldType {
    pub fn is_optional(&self) -> bool {
        self.default.is_none()
    }

    /// Declared field type
    pub fn render(&self, types: &TypeMappings) -> String {
        let inner = self.designation.render(types);
        if self.is_optional() {
            format!("Option<{}>", inner)
        } else {
            inner
        }
    }

    /// Initial value expression
    pub fn init(&self) -> &str {
        self.default.as_deref().unwrap_or("None")
    }

    /// Return type of the getter
    pub fn getter_type(&self, types: &TypeMappings) -> String {
        let inner = self.designation.render(types);
        match (self.is_optional(), self.designation.is_copy()) {
            (true, true) => format!("Option<{}>", inner),
            (true, false) => format!("Option<&{}>", inner),
            (false, true) => inner,
            (false, false) => format!("&{}", inner),
        }
    }

    /// Getter body reading `self.<field>`
    pub fn getter_body(&self, field: &str) -> String {
        match (self.is_optional(), self.designation.is_copy()) {
            (true, false) => format!("self.{}.as_ref()", field),
            (false, false) => format!("&self.{}", field),
            (_, true) => format!("self.{}", field),
        }
    }
}

// =============================================================================
// Type Mapper
// =============================================================================

/// Maps typed elements relative to the package being generated
pub struct TypeMapper<'a> {
    model: &'a Model,
    types: &'a TypeMappings,
    keyword_escape: &'a str,
    current: Option<ElementId>,
}

impl<'a> TypeMapper<'a> {
    pub fn new(model: &'a Model, types: &'a TypeMappings, keyword_escape: &'a str) -> Self {
        Self {
            model,
            types,
            keyword_escape,
            current: None,
        }
    }

    /// Package whose items need no path qualification
    pub fn set_current(&mut self, package: ElementId) {
        self.current = Some(package);
    }

    pub fn types(&self) -> &TypeMappings {
        self.types
    }

    /// Designation of an attribute, reference, operation or parameter.
    ///
    /// # Panics
    /// When the element's type is still a symbolic link.
    pub fn map(&self, typed_element: ElementId) -> TypeDesignation {
        let element = self.model.get(typed_element);
        let Some(typed) = element.typed() else {
            return TypeDesignation::Object;
        };
        let many = typed.is_many();

        let target = typed
            .e_type
            .as_ref()
            .map(Link::expect_resolved)
            .or_else(|| self.generic_classifier(typed.generic_type));
        let Some(target) = target else {
            return match element.kind() {
                ElementKind::Operation => TypeDesignation::Unit,
                _ if many => TypeDesignation::Many(Box::new(TypeDesignation::Object)),
                _ => TypeDesignation::Object,
            };
        };

        if many && self.model.name(target) == STRING_TO_STRING_MAP_ENTRY {
            return TypeDesignation::StringMap;
        }
        let single = self.map_classifier(target);
        if many {
            TypeDesignation::Many(Box::new(single))
        } else {
            single
        }
    }

    fn generic_classifier(&self, generic: Option<ElementId>) -> Option<ElementId> {
        let generic = self.model.get(generic?).as_generic_type()?;
        generic.classifier.as_ref().map(Link::expect_resolved)
    }

    /// Designation of one value of `classifier`
    pub fn map_classifier(&self, classifier: ElementId) -> TypeDesignation {
        match self.model.kind(classifier) {
            ElementKind::Enum => TypeDesignation::Enum {
                path: self.path(classifier),
                id: classifier,
            },
            ElementKind::DataType => match self.types.data_type(self.model.name(classifier)) {
                Some(mapping) => TypeDesignation::Scalar {
                    rust: mapping.rust.clone(),
                    kind: mapping.scalar,
                },
                None => TypeDesignation::Object,
            },
            ElementKind::Class if !self.is_builtin(classifier) => TypeDesignation::Class {
                path: self.path(classifier),
            },
            _ => TypeDesignation::Object,
        }
    }

    /// Classes of the Ecore package itself are not generated
    fn is_builtin(&self, classifier: ElementId) -> bool {
        self.model
            .containing_package(classifier)
            .and_then(|p| self.model.package(p))
            .and_then(|p| p.ns_uri.as_deref())
            == Some(ECORE_NS_URI)
    }

    /// Module path of a generated classifier as seen from the current package
    pub fn path(&self, classifier: ElementId) -> String {
        let name = self.model.name(classifier).to_string();
        let package = self.model.containing_package(classifier);
        if package.is_none() || package == self.current {
            return name;
        }

        let mut modules = Vec::new();
        let mut cursor = package;
        while let Some(p) = cursor {
            modules.push(names::escape_keyword(
                &names::underscore(self.model.name(p)),
                self.keyword_escape,
            ));
            cursor = self.model.get(p).parent;
        }
        modules.reverse();
        format!("crate::{}::{}", modules.join("::"), name)
    }

    /// Field type and initial value for a structural feature
    pub fn field(&self, feature: ElementId) -> FieldType {
        let designation = self.map(feature);
        let literal = self
            .model
            .get(feature)
            .feature()
            .and_then(|f| f.default_value_literal.as_deref());
        let default = self.materialize(&designation, literal);
        FieldType {
            designation,
            default,
        }
    }

    /// Default value expression for `designation`, given the feature's literal
    pub fn materialize(
        &self,
        designation: &TypeDesignation,
        literal: Option<&str>,
    ) -> Option<String> {
        match designation {
            TypeDesignation::Scalar { rust, kind } => match kind {
                ScalarKind::Boolean => {
                    let value = literal.map(str::trim) == Some("true");
                    Some(value.to_string())
                }
                ScalarKind::Integer => Some(
                    literal
                        .and_then(|l| integer_literal(rust, l))
                        .unwrap_or_else(|| "0".to_string()),
                ),
                ScalarKind::Float => Some(
                    literal
                        .and_then(|l| float_literal(rust, l))
                        .unwrap_or_else(|| "0.0".to_string()),
                ),
                ScalarKind::String => literal.map(|l| format!("String::from({:?})", l)),
                ScalarKind::Other => None,
            },
            TypeDesignation::Enum { path, id } => {
                let literal = literal?;
                enum_variants(self.model, *id)
                    .into_iter()
                    .find(|(lit, _)| {
                        self.model.name(*lit) == literal || self.model.literal_text(*lit) == literal
                    })
                    .map(|(_, variant)| format!("{}::{}", path, variant))
            }
            TypeDesignation::Many(_) if self.types.many.starts_with("Vec<") => {
                Some("Vec::new()".to_string())
            }
            TypeDesignation::StringMap if self.types.string_map.starts_with("HashMap<") => {
                Some("HashMap::new()".to_string())
            }
            TypeDesignation::Many(_) | TypeDesignation::StringMap => {
                Some("Default::default()".to_string())
            }
            TypeDesignation::Class { .. } | TypeDesignation::Object | TypeDesignation::Unit => None,
        }
    }
}

/// Integer literal, if it lies in the range of the Rust type `rust`.
/// Unknown integer types are checked against `i64`.
fn integer_literal(rust: &str, literal: &str) -> Option<String> {
    let value = literal.trim().parse::<i128>().ok()?;
    let (min, max) = match rust {
        "i8" => (i8::MIN as i128, i8::MAX as i128),
        "i16" => (i16::MIN as i128, i16::MAX as i128),
        "i32" => (i32::MIN as i128, i32::MAX as i128),
        "i128" => (i128::MIN, i128::MAX),
        "u8" => (0, u8::MAX as i128),
        "u16" => (0, u16::MAX as i128),
        "u32" => (0, u32::MAX as i128),
        "u64" | "usize" => (0, u64::MAX as i128),
        _ => (i64::MIN as i128, i64::MAX as i128),
    };
    (min..=max).contains(&value).then(|| value.to_string())
}

/// Finite float literal that `rust` can represent
fn float_literal(rust: &str, literal: &str) -> Option<String> {
    let value = literal.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    if rust == "f32" {
        let narrow = value as f32;
        return narrow.is_finite().then(|| format!("{:?}", narrow));
    }
    Some(format!("{:?}", value))
}

/// Variant identifiers of an enum, in literal order, unique within the enum
pub fn enum_variants(model: &Model, en: ElementId) -> Vec<(ElementId, String)> {
    let literals = model
        .get(en)
        .as_enum()
        .map(|e| e.literals.clone())
        .unwrap_or_default();

    let mut taken: Vec<String> = Vec::with_capacity(literals.len());
    let mut variants = Vec::with_capacity(literals.len());
    for literal in literals {
        let base = names::pascal_case(model.name(literal));
        let mut variant = base.clone();
        let mut n = 2;
        while taken.contains(&variant) {
            variant = format!("{}{}", base, n);
            n += 1;
        }
        taken.push(variant.clone());
        variants.push((literal, variant));
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        model: Model,
        package: ElementId,
        class: ElementId,
        string: ElementId,
        color: ElementId,
    }

    fn fixture() -> Fixture {
        let mut model = Model::new();
        let ecore = model.add_ecore_package().unwrap();
        let string = model.package(ecore).unwrap().data_types["EString"];
        let package = model.create_named(ElementKind::Package, "shapes");
        let class = model.create_named(ElementKind::Class, "Shape");
        model.add_class(package, class).unwrap();

        let color = model.create_named(ElementKind::Enum, "Color");
        model.add_data_type(package, color).unwrap();
        for name in ["red", "DARK_RED"] {
            let literal = model.create_named(ElementKind::EnumLiteral, name);
            model.add_literal(color, literal).unwrap();
        }
        Fixture {
            model,
            package,
            class,
            string,
            color,
        }
    }

    fn feature(
        model: &mut Model,
        kind: ElementKind,
        name: &str,
        target: ElementId,
        upper: i32,
    ) -> ElementId {
        let id = model.create_named(kind, name);
        let typed = model.get_mut(id).typed_mut().unwrap();
        typed.e_type = Some(Link::Resolved(target));
        typed.upper_bound = upper;
        id
    }

    #[test]
    fn test_scalar_and_many() {
        let mut f = fixture();
        let name = feature(&mut f.model, ElementKind::Attribute, "name", f.string, 1);
        let tags = feature(&mut f.model, ElementKind::Attribute, "tags", f.string, -1);
        let types = TypeMappings::default();
        let mapper = TypeMapper::new(&f.model, &types, "r#");

        let single = mapper.field(name);
        assert_eq!(single.render(&types), "Option<String>");
        assert_eq!(single.getter_type(&types), "Option<&String>");

        let many = mapper.field(tags);
        assert_eq!(many.render(&types), "Vec<String>");
        assert_eq!(many.init(), "Vec::new()");
        assert_eq!(many.getter_body("tags"), "&self.tags");
    }

    #[test]
    fn test_string_literal_default() {
        let mut f = fixture();
        let name = feature(&mut f.model, ElementKind::Attribute, "name", f.string, 1);
        f.model.get_mut(name).feature_mut().unwrap().default_value_literal =
            Some("anon".to_string());
        let types = TypeMappings::default();
        let mapper = TypeMapper::new(&f.model, &types, "r#");

        let field = mapper.field(name);
        assert_eq!(field.render(&types), "String");
        assert_eq!(field.init(), "String::from(\"anon\")");
    }

    #[test]
    fn test_enum_default_matches_literal() {
        let mut f = fixture();
        let shade = feature(&mut f.model, ElementKind::Attribute, "shade", f.color, 1);
        f.model.get_mut(shade).feature_mut().unwrap().default_value_literal =
            Some("DARK_RED".to_string());
        let other = feature(&mut f.model, ElementKind::Attribute, "other", f.color, 1);
        let types = TypeMappings::default();
        let mut mapper = TypeMapper::new(&f.model, &types, "r#");
        mapper.set_current(f.package);

        assert_eq!(mapper.field(shade).init(), "Color::DarkRed");
        assert_eq!(mapper.field(shade).getter_type(&types), "Color");
        assert_eq!(mapper.field(other).render(&types), "Option<Color>");
    }

    #[test]
    fn test_class_path_and_string_map() {
        let mut f = fixture();
        let owner = feature(&mut f.model, ElementKind::Reference, "owner", f.class, 1);
        let ecore = f.model.package_by_uri(ECORE_NS_URI).unwrap();
        let entry = f.model.package(ecore).unwrap().classes[STRING_TO_STRING_MAP_ENTRY];
        let props = feature(&mut f.model, ElementKind::Reference, "props", entry, -1);
        let types = TypeMappings::default();
        let mut mapper = TypeMapper::new(&f.model, &types, "r#");

        assert_eq!(mapper.field(owner).render(&types), "Option<Rc<dyn crate::shapes::Shape>>");
        mapper.set_current(f.package);
        assert_eq!(mapper.field(owner).render(&types), "Option<Rc<dyn Shape>>");
        assert_eq!(mapper.field(props).render(&types), "HashMap<String, String>");
        assert_eq!(mapper.field(props).init(), "HashMap::new()");
    }

    #[test]
    fn test_numeric_defaults() {
        let f = fixture();
        let types = TypeMappings::default();
        let mapper = TypeMapper::new(&f.model, &types, "r#");
        let int = TypeDesignation::Scalar { rust: "i32".into(), kind: ScalarKind::Integer };
        let float = TypeDesignation::Scalar { rust: "f64".into(), kind: ScalarKind::Float };
        let boolean = TypeDesignation::Scalar { rust: "bool".into(), kind: ScalarKind::Boolean };

        assert_eq!(mapper.materialize(&int, None).as_deref(), Some("0"));
        assert_eq!(mapper.materialize(&int, Some("42")).as_deref(), Some("42"));
        assert_eq!(mapper.materialize(&float, Some("1")).as_deref(), Some("1.0"));
        assert_eq!(mapper.materialize(&float, None).as_deref(), Some("0.0"));
        assert_eq!(mapper.materialize(&boolean, Some("true")).as_deref(), Some("true"));
        assert_eq!(mapper.materialize(&TypeDesignation::Object, Some("x")), None);
    }

    #[test]
    fn test_out_of_range_literals_fall_back() {
        let f = fixture();
        let types = TypeMappings::default();
        let mapper = TypeMapper::new(&f.model, &types, "r#");
        let scalar = |rust: &str, kind| TypeDesignation::Scalar { rust: rust.into(), kind };
        let int = scalar("i32", ScalarKind::Integer);
        let long = scalar("i64", ScalarKind::Integer);
        let byte = scalar("i8", ScalarKind::Integer);
        let single = scalar("f32", ScalarKind::Float);

        assert_eq!(mapper.materialize(&int, Some("99999999999")).as_deref(), Some("0"));
        assert_eq!(mapper.materialize(&long, Some("99999999999")).as_deref(), Some("99999999999"));
        assert_eq!(mapper.materialize(&int, Some("-2147483648")).as_deref(), Some("-2147483648"));
        assert_eq!(mapper.materialize(&byte, Some("128")).as_deref(), Some("0"));
        assert_eq!(mapper.materialize(&single, Some("1e300")).as_deref(), Some("0.0"));
        assert_eq!(mapper.materialize(&single, Some("2.5")).as_deref(), Some("2.5"));
    }

    #[test]
    fn test_operation_without_type_is_unit() {
        let mut f = fixture();
        let op = f.model.create_named(ElementKind::Operation, "run");
        f.model.add_operation(f.class, op).unwrap();
        let types = TypeMappings::default();
        let mapper = TypeMapper::new(&f.model, &types, "r#");
        assert_eq!(mapper.map(op), TypeDesignation::Unit);
    }

    #[test]
    fn test_enum_variants_are_unique() {
        let mut f = fixture();
        let literal = f.model.create_named(ElementKind::EnumLiteral, "RED");
        f.model.add_literal(f.color, literal).unwrap();
        let variants: Vec<String> = enum_variants(&f.model, f.color)
            .into_iter()
            .map(|(_, v)| v)
            .collect();
        assert_eq!(variants, vec!["Red", "DarkRed", "Red2"]);
    }
}
