//! Ecore Metamodel
//!
//! Arena-backed entity graph for packages, classifiers, features and operations.
//!
//! Architecture:
//! - `Model`: owns every element; several root packages may share one arena
//! - `ElementId`: stable index into the arena, used for containment and cross-links
//! - `Link`: a cross-reference that is symbolic until the resolver rewrites it
//!
//! Containment is tree-shaped: each element records its single container in
//! `parent`, set only by the add-methods below. Cross-references (`e_type`,
//! `super_types`, `opposite`, ...) are `Link`s and never own their target.

mod ecore;
mod elements;
mod ordering;

pub use ecore::{ECORE_NS_PREFIX, ECORE_NS_URI, STRING_TO_STRING_MAP_ENTRY};

pub use elements::{
    Classifier, EAnnotation, EAttribute, EClass, EDataType, EEnum, EEnumLiteral, EGenericType,
    EOperation, EPackage, EParameter, EReference, ETypeParameter, StructuralFeature, TypedElement,
};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EcoreError, Result};

// =============================================================================
// Identifiers
// =============================================================================

/// Index of an element inside its [`Model`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u32);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cross-reference to another element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
    /// URI-like path as written in the source document
    Symbolic(String),
    /// Direct link, produced by the resolver
    Resolved(ElementId),
}

impl Link {
    pub fn symbolic(uri: impl Into<String>) -> Self {
        Self::Symbolic(uri.into())
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Target of a resolved link
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::Resolved(id) => Some(*id),
            Self::Symbolic(_) => None,
        }
    }

    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Symbolic(uri) => Some(uri),
            Self::Resolved(_) => None,
        }
    }

    /// Target of a link that must already be resolved.
    ///
    /// Generators call this; meeting a symbolic link there means resolution
    /// was skipped, which is a contract violation rather than bad input.
    pub fn expect_resolved(&self) -> ElementId {
        match self {
            Self::Resolved(id) => *id,
            Self::Symbolic(uri) => panic!("unresolved reference `{}` reached code generation", uri),
        }
    }
}

// =============================================================================
// Element Kinds
// =============================================================================

/// Concrete metamodel kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Package,
    Class,
    DataType,
    Enum,
    EnumLiteral,
    Attribute,
    Reference,
    Operation,
    Parameter,
    TypeParameter,
    Annotation,
    GenericType,
}

impl ElementKind {
    /// Ecore metaclass name (also used by qualified references)
    pub fn ecore_name(self) -> &'static str {
        match self {
            Self::Package => "EPackage",
            Self::Class => "EClass",
            Self::DataType => "EDataType",
            Self::Enum => "EEnum",
            Self::EnumLiteral => "EEnumLiteral",
            Self::Attribute => "EAttribute",
            Self::Reference => "EReference",
            Self::Operation => "EOperation",
            Self::Parameter => "EParameter",
            Self::TypeParameter => "ETypeParameter",
            Self::Annotation => "EAnnotation",
            Self::GenericType => "EGenericType",
        }
    }

    pub fn is_classifier(self) -> bool {
        matches!(self, Self::Class | Self::DataType | Self::Enum)
    }

    pub fn is_data_type(self) -> bool {
        matches!(self, Self::DataType | Self::Enum)
    }

    pub fn is_structural_feature(self) -> bool {
        matches!(self, Self::Attribute | Self::Reference)
    }

    pub fn is_typed(self) -> bool {
        matches!(
            self,
            Self::Attribute | Self::Reference | Self::Operation | Self::Parameter
        )
    }

    /// Annotations and generic types carry no name
    pub fn is_named(self) -> bool {
        !matches!(self, Self::Annotation | Self::GenericType)
    }

    /// Whether an element of this kind may stand where `ecore_name` is expected
    pub fn conforms_to(self, ecore_name: &str) -> bool {
        match ecore_name {
            "EClassifier" => self.is_classifier(),
            "EDataType" => self.is_data_type(),
            "EStructuralFeature" => self.is_structural_feature(),
            "ETypedElement" => self.is_typed(),
            "ENamedElement" => self.is_named(),
            "EModelElement" | "EObject" => self != Self::GenericType,
            other => self.ecore_name() == other,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ecore_name())
    }
}

// =============================================================================
// Element
// =============================================================================

/// Kind-specific payload of an element
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementBody {
    Package(EPackage),
    Class(EClass),
    DataType(EDataType),
    Enum(EEnum),
    EnumLiteral(EEnumLiteral),
    Attribute(EAttribute),
    Reference(EReference),
    Operation(EOperation),
    Parameter(EParameter),
    TypeParameter(ETypeParameter),
    Annotation(EAnnotation),
    GenericType(EGenericType),
}

impl ElementBody {
    /// Empty payload for a kind, with Ecore defaults applied
    pub fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Package => Self::Package(EPackage::default()),
            ElementKind::Class => Self::Class(EClass::default()),
            ElementKind::DataType => Self::DataType(EDataType::default()),
            ElementKind::Enum => Self::Enum(EEnum::default()),
            ElementKind::EnumLiteral => Self::EnumLiteral(EEnumLiteral::default()),
            ElementKind::Attribute => Self::Attribute(EAttribute::default()),
            ElementKind::Reference => Self::Reference(EReference::default()),
            ElementKind::Operation => Self::Operation(EOperation::default()),
            ElementKind::Parameter => Self::Parameter(EParameter::default()),
            ElementKind::TypeParameter => Self::TypeParameter(ETypeParameter::default()),
            ElementKind::Annotation => Self::Annotation(EAnnotation::default()),
            ElementKind::GenericType => Self::GenericType(EGenericType::default()),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Package(_) => ElementKind::Package,
            Self::Class(_) => ElementKind::Class,
            Self::DataType(_) => ElementKind::DataType,
            Self::Enum(_) => ElementKind::Enum,
            Self::EnumLiteral(_) => ElementKind::EnumLiteral,
            Self::Attribute(_) => ElementKind::Attribute,
            Self::Reference(_) => ElementKind::Reference,
            Self::Operation(_) => ElementKind::Operation,
            Self::Parameter(_) => ElementKind::Parameter,
            Self::TypeParameter(_) => ElementKind::TypeParameter,
            Self::Annotation(_) => ElementKind::Annotation,
            Self::GenericType(_) => ElementKind::GenericType,
        }
    }
}

/// A node of the model graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Containing element; `None` for root packages and detached elements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<ElementId>,
    #[serde(flatten)]
    pub body: ElementBody,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn classifier(&self) -> Option<&Classifier> {
        match &self.body {
            ElementBody::Class(c) => Some(&c.classifier),
            ElementBody::DataType(d) => Some(&d.classifier),
            ElementBody::Enum(e) => Some(&e.data_type.classifier),
            _ => None,
        }
    }

    pub fn classifier_mut(&mut self) -> Option<&mut Classifier> {
        match &mut self.body {
            ElementBody::Class(c) => Some(&mut c.classifier),
            ElementBody::DataType(d) => Some(&mut d.classifier),
            ElementBody::Enum(e) => Some(&mut e.data_type.classifier),
            _ => None,
        }
    }

    pub fn typed(&self) -> Option<&TypedElement> {
        match &self.body {
            ElementBody::Attribute(a) => Some(&a.feature.typed),
            ElementBody::Reference(r) => Some(&r.feature.typed),
            ElementBody::Operation(o) => Some(&o.typed),
            ElementBody::Parameter(p) => Some(&p.typed),
            _ => None,
        }
    }

    pub fn typed_mut(&mut self) -> Option<&mut TypedElement> {
        match &mut self.body {
            ElementBody::Attribute(a) => Some(&mut a.feature.typed),
            ElementBody::Reference(r) => Some(&mut r.feature.typed),
            ElementBody::Operation(o) => Some(&mut o.typed),
            ElementBody::Parameter(p) => Some(&mut p.typed),
            _ => None,
        }
    }

    pub fn feature(&self) -> Option<&StructuralFeature> {
        match &self.body {
            ElementBody::Attribute(a) => Some(&a.feature),
            ElementBody::Reference(r) => Some(&r.feature),
            _ => None,
        }
    }

    pub fn feature_mut(&mut self) -> Option<&mut StructuralFeature> {
        match &mut self.body {
            ElementBody::Attribute(a) => Some(&mut a.feature),
            ElementBody::Reference(r) => Some(&mut r.feature),
            _ => None,
        }
    }
}

/// Typed payload accessors, one per concrete kind
macro_rules! body_accessors {
    ($($get:ident, $get_mut:ident => $variant:ident($ty:ty);)*) => {
        impl Element {
            $(
                pub fn $get(&self) -> Option<&$ty> {
                    match &self.body {
                        ElementBody::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                pub fn $get_mut(&mut self) -> Option<&mut $ty> {
                    match &mut self.body {
                        ElementBody::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            )*
        }
    };
}

body_accessors! {
    as_package, as_package_mut => Package(EPackage);
    as_class, as_class_mut => Class(EClass);
    as_data_type, as_data_type_mut => DataType(EDataType);
    as_enum, as_enum_mut => Enum(EEnum);
    as_enum_literal, as_enum_literal_mut => EnumLiteral(EEnumLiteral);
    as_attribute, as_attribute_mut => Attribute(EAttribute);
    as_reference, as_reference_mut => Reference(EReference);
    as_operation, as_operation_mut => Operation(EOperation);
    as_parameter, as_parameter_mut => Parameter(EParameter);
    as_type_parameter, as_type_parameter_mut => TypeParameter(ETypeParameter);
    as_annotation, as_annotation_mut => Annotation(EAnnotation);
    as_generic_type, as_generic_type_mut => GenericType(EGenericType);
}

// =============================================================================
// Model
// =============================================================================

/// Arena holding one or more package trees
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    elements: Vec<Element>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Create a detached, empty element of `kind`
    pub fn create(&mut self, kind: ElementKind) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            id,
            name: None,
            parent: None,
            annotations: Vec::new(),
            body: ElementBody::empty(kind),
        });
        id
    }

    pub fn create_named(&mut self, kind: ElementKind, name: impl Into<String>) -> ElementId {
        let id = self.create(kind);
        self.get_mut(id).name = Some(name.into());
        id
    }

    /// Element by id. Ids are only minted by this model.
    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.index()]
    }

    pub fn try_get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn kind(&self, id: ElementId) -> ElementKind {
        self.get(id).kind()
    }

    pub fn name(&self, id: ElementId) -> &str {
        self.get(id).name()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Packages without a container
    pub fn roots(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .filter(|e| e.parent.is_none() && e.kind() == ElementKind::Package)
            .map(|e| e.id)
    }

    pub fn package(&self, id: ElementId) -> Option<&EPackage> {
        self.get(id).as_package()
    }

    pub fn class(&self, id: ElementId) -> Option<&EClass> {
        self.get(id).as_class()
    }

    /// Resolved supertypes of a class; symbolic entries are skipped
    pub fn super_types(&self, class: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.class(class)
            .into_iter()
            .flat_map(|c| c.super_types.iter().filter_map(Link::target))
    }

    /// Literal text of an enum literal, falling back to its name
    pub fn literal_text(&self, literal: ElementId) -> &str {
        let element = self.get(literal);
        element
            .as_enum_literal()
            .and_then(|l| l.literal.as_deref())
            .unwrap_or_else(|| element.name())
    }

    /// Whether the package tree rooted at `package` went through resolution
    pub fn is_resolved(&self, package: ElementId) -> bool {
        self.package(package).map(|p| p.resolved).unwrap_or(false)
    }

    /// Nearest enclosing package (the element itself if it is one)
    pub fn containing_package(&self, id: ElementId) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(cur) = current {
            if self.kind(cur) == ElementKind::Package {
                return Some(cur);
            }
            current = self.get(cur).parent;
        }
        None
    }

    /// Dotted path of names from the root package, e.g. `library.Book.title`
    pub fn qualified_name(&self, id: ElementId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let element = self.get(cur);
            match &element.name {
                Some(name) => segments.push(name.clone()),
                None => segments.push(format!("<{}>", element.kind())),
            }
            current = element.parent;
        }
        segments.reverse();
        segments.join(".")
    }

    fn describe(&self, id: ElementId) -> String {
        format!("{} '{}'", self.kind(id), self.qualified_name(id))
    }

    fn expect_kind(&self, id: ElementId, expected: &str, ok: bool) -> Result<()> {
        if ok {
            Ok(())
        } else {
            Err(EcoreError::KindMismatch {
                expected: expected.to_string(),
                found: self.describe(id),
            })
        }
    }

    fn check_uncontained(&self, parent: ElementId, child: ElementId) -> Result<()> {
        if parent == child || self.get(child).parent.is_some() {
            return Err(EcoreError::AlreadyContained {
                element: self.describe(child),
            });
        }
        Ok(())
    }

    /// Record `parent` as the single container of `child`
    fn adopt(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.check_uncontained(parent, child)?;
        self.get_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Like `adopt`, but the child is only contained once its name is in the table
    fn adopt_named(
        &mut self,
        package: ElementId,
        child: ElementId,
        select: fn(&mut EPackage) -> &mut indexmap::IndexMap<String, ElementId>,
    ) -> Result<()> {
        self.check_uncontained(package, child)?;
        self.insert_named(package, child, select)?;
        self.get_mut(child).parent = Some(package);
        Ok(())
    }

    fn insert_named(
        &mut self,
        package: ElementId,
        child: ElementId,
        select: fn(&mut EPackage) -> &mut indexmap::IndexMap<String, ElementId>,
    ) -> Result<()> {
        let name = self.name(child).to_string();
        let container = self.describe(package);
        let map = self
            .get_mut(package)
            .as_package_mut()
            .map(select)
            .ok_or_else(|| EcoreError::KindMismatch {
                expected: "EPackage".to_string(),
                found: container.clone(),
            })?;
        if map.contains_key(&name) {
            return Err(EcoreError::DuplicateName { container, name });
        }
        map.insert(name, child);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Add-methods (the only place containment is established)
    // -------------------------------------------------------------------------

    pub fn add_class(&mut self, package: ElementId, class: ElementId) -> Result<()> {
        self.expect_kind(package, "EPackage", self.kind(package) == ElementKind::Package)?;
        self.expect_kind(class, "EClass", self.kind(class) == ElementKind::Class)?;
        self.adopt_named(package, class, |p| &mut p.classes)?;
        if let Some(c) = self.get_mut(class).classifier_mut() {
            c.package = Some(package);
        }
        Ok(())
    }

    /// Adds a data type or an enum
    pub fn add_data_type(&mut self, package: ElementId, data_type: ElementId) -> Result<()> {
        self.expect_kind(package, "EPackage", self.kind(package) == ElementKind::Package)?;
        self.expect_kind(data_type, "EDataType", self.kind(data_type).is_data_type())?;
        self.adopt_named(package, data_type, |p| &mut p.data_types)?;
        if let Some(c) = self.get_mut(data_type).classifier_mut() {
            c.package = Some(package);
        }
        Ok(())
    }

    pub fn add_subpackage(&mut self, package: ElementId, subpackage: ElementId) -> Result<()> {
        self.expect_kind(package, "EPackage", self.kind(package) == ElementKind::Package)?;
        self.expect_kind(subpackage, "EPackage", self.kind(subpackage) == ElementKind::Package)?;
        self.adopt_named(package, subpackage, |p| &mut p.subpackages)?;
        if let Some(p) = self.get_mut(subpackage).as_package_mut() {
            p.package = Some(package);
        }
        Ok(())
    }

    pub fn add_attribute(&mut self, class: ElementId, attribute: ElementId) -> Result<()> {
        self.expect_kind(class, "EClass", self.kind(class) == ElementKind::Class)?;
        self.expect_kind(attribute, "EAttribute", self.kind(attribute) == ElementKind::Attribute)?;
        self.adopt(class, attribute)?;
        if let Some(c) = self.get_mut(class).as_class_mut() {
            c.attributes.push(attribute);
        }
        if let Some(f) = self.get_mut(attribute).feature_mut() {
            f.containing_class = Some(class);
        }
        Ok(())
    }

    pub fn add_reference(&mut self, class: ElementId, reference: ElementId) -> Result<()> {
        self.expect_kind(class, "EClass", self.kind(class) == ElementKind::Class)?;
        self.expect_kind(reference, "EReference", self.kind(reference) == ElementKind::Reference)?;
        self.adopt(class, reference)?;
        if let Some(c) = self.get_mut(class).as_class_mut() {
            c.references.push(reference);
        }
        if let Some(f) = self.get_mut(reference).feature_mut() {
            f.containing_class = Some(class);
        }
        Ok(())
    }

    pub fn add_operation(&mut self, class: ElementId, operation: ElementId) -> Result<()> {
        self.expect_kind(class, "EClass", self.kind(class) == ElementKind::Class)?;
        self.expect_kind(operation, "EOperation", self.kind(operation) == ElementKind::Operation)?;
        self.adopt(class, operation)?;
        if let Some(c) = self.get_mut(class).as_class_mut() {
            c.operations.push(operation);
        }
        if let Some(o) = self.get_mut(operation).as_operation_mut() {
            o.containing_class = Some(class);
        }
        Ok(())
    }

    pub fn add_generic_super_type(&mut self, class: ElementId, generic: ElementId) -> Result<()> {
        self.expect_kind(class, "EClass", self.kind(class) == ElementKind::Class)?;
        self.expect_generic(generic)?;
        self.adopt(class, generic)?;
        if let Some(c) = self.get_mut(class).as_class_mut() {
            c.generic_super_types.push(generic);
        }
        Ok(())
    }

    pub fn add_parameter(&mut self, operation: ElementId, parameter: ElementId) -> Result<()> {
        self.expect_kind(operation, "EOperation", self.kind(operation) == ElementKind::Operation)?;
        self.expect_kind(parameter, "EParameter", self.kind(parameter) == ElementKind::Parameter)?;
        self.adopt(operation, parameter)?;
        if let Some(o) = self.get_mut(operation).as_operation_mut() {
            o.parameters.push(parameter);
        }
        if let Some(p) = self.get_mut(parameter).as_parameter_mut() {
            p.operation = Some(operation);
        }
        Ok(())
    }

    /// Type parameters belong to classifiers or operations
    pub fn add_type_parameter(
        &mut self,
        owner: ElementId,
        type_parameter: ElementId,
    ) -> Result<()> {
        let owner_kind = self.kind(owner);
        self.expect_kind(
            owner,
            "EClassifier or EOperation",
            owner_kind.is_classifier() || owner_kind == ElementKind::Operation,
        )?;
        self.expect_kind(
            type_parameter,
            "ETypeParameter",
            self.kind(type_parameter) == ElementKind::TypeParameter,
        )?;
        self.adopt(owner, type_parameter)?;
        let element = self.get_mut(owner);
        if let Some(o) = element.as_operation_mut() {
            o.type_parameters.push(type_parameter);
        } else if let Some(c) = element.classifier_mut() {
            c.type_parameters.push(type_parameter);
        }
        Ok(())
    }

    pub fn add_literal(&mut self, en: ElementId, literal: ElementId) -> Result<()> {
        self.expect_kind(en, "EEnum", self.kind(en) == ElementKind::Enum)?;
        self.expect_kind(literal, "EEnumLiteral", self.kind(literal) == ElementKind::EnumLiteral)?;
        self.adopt(en, literal)?;
        if let Some(e) = self.get_mut(en).as_enum_mut() {
            e.literals.push(literal);
        }
        if let Some(l) = self.get_mut(literal).as_enum_literal_mut() {
            l.owner = Some(en);
        }
        Ok(())
    }

    /// Annotations attach to any model element (generic types excluded)
    pub fn add_annotation(&mut self, element: ElementId, annotation: ElementId) -> Result<()> {
        self.expect_kind(
            element,
            "EModelElement",
            self.kind(element) != ElementKind::GenericType,
        )?;
        self.expect_kind(
            annotation,
            "EAnnotation",
            self.kind(annotation) == ElementKind::Annotation,
        )?;
        self.adopt(element, annotation)?;
        self.get_mut(element).annotations.push(annotation);
        Ok(())
    }

    pub fn add_detail(
        &mut self,
        annotation: ElementId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let found = self.describe(annotation);
        let a = self
            .get_mut(annotation)
            .as_annotation_mut()
            .ok_or_else(|| EcoreError::KindMismatch {
                expected: "EAnnotation".to_string(),
                found,
            })?;
        a.details.insert(key.into(), value.into());
        Ok(())
    }

    pub fn add_bound(&mut self, type_parameter: ElementId, bound: ElementId) -> Result<()> {
        self.expect_kind(
            type_parameter,
            "ETypeParameter",
            self.kind(type_parameter) == ElementKind::TypeParameter,
        )?;
        self.expect_generic(bound)?;
        self.adopt(type_parameter, bound)?;
        if let Some(t) = self.get_mut(type_parameter).as_type_parameter_mut() {
            t.bounds.push(bound);
        }
        Ok(())
    }

    pub fn add_type_argument(&mut self, generic: ElementId, argument: ElementId) -> Result<()> {
        self.expect_generic(generic)?;
        self.expect_generic(argument)?;
        self.adopt(generic, argument)?;
        if let Some(g) = self.get_mut(generic).as_generic_type_mut() {
            g.type_arguments.push(argument);
        }
        Ok(())
    }

    pub fn set_generic_type(&mut self, typed: ElementId, generic: ElementId) -> Result<()> {
        self.expect_kind(typed, "ETypedElement", self.kind(typed).is_typed())?;
        self.expect_generic(generic)?;
        self.adopt(typed, generic)?;
        if let Some(t) = self.get_mut(typed).typed_mut() {
            t.generic_type = Some(generic);
        }
        Ok(())
    }

    pub fn set_lower_bound(&mut self, generic: ElementId, bound: ElementId) -> Result<()> {
        self.expect_generic(generic)?;
        self.expect_generic(bound)?;
        self.adopt(generic, bound)?;
        if let Some(g) = self.get_mut(generic).as_generic_type_mut() {
            g.lower_bound = Some(bound);
        }
        Ok(())
    }

    pub fn set_upper_bound(&mut self, generic: ElementId, bound: ElementId) -> Result<()> {
        self.expect_generic(generic)?;
        self.expect_generic(bound)?;
        self.adopt(generic, bound)?;
        if let Some(g) = self.get_mut(generic).as_generic_type_mut() {
            g.upper_bound = Some(bound);
        }
        Ok(())
    }

    fn expect_generic(&self, id: ElementId) -> Result<()> {
        self.expect_kind(id, "EGenericType", self.kind(id) == ElementKind::GenericType)
    }
}
