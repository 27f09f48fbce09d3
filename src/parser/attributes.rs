//! Per-kind attribute tables
//!
//! Each concrete kind's table is its own entries laid over the table of its
//! Ecore supertype, composed once on first use. A start-event attribute that
//! is missing from the active kind's table is rejected.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{EcoreError, Result};
use crate::model::{Classifier, Element, ElementKind, Link, StructuralFeature, TypedElement};

use super::events::Attributes;

/// Writes one parsed attribute value into an element
pub type Setter = fn(&mut Element, &str) -> Result<()>;

/// Attribute name -> setter, including every inherited entry
#[derive(Clone, Default)]
pub struct AttributeTable {
    entries: HashMap<&'static str, Setter>,
}

impl AttributeTable {
    /// `base` with `own` entries added on top
    pub fn extend(base: &AttributeTable, own: &[(&'static str, Setter)]) -> Self {
        let mut entries = base.entries.clone();
        entries.extend(own.iter().copied());
        Self { entries }
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.entries.contains_key(attribute)
    }

    pub fn get(&self, attribute: &str) -> Option<Setter> {
        self.entries.get(attribute).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

// =============================================================================
// Value Parsing
// =============================================================================

static QUALIFIED_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+:\w+$").unwrap_or_else(|e| panic!("invalid built-in pattern: {}", e))
});

fn parse_bool(attribute: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(EcoreError::InvalidAttributeValue {
            attribute: attribute.to_string(),
            value: value.to_string(),
            expected: "true or false",
        }),
    }
}

fn parse_int(attribute: &str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| EcoreError::InvalidAttributeValue {
            attribute: attribute.to_string(),
            value: value.to_string(),
            expected: "a 32-bit integer",
        })
}

/// Split a whitespace-separated URI list, keeping `prefix:Kind uri#//Name` whole
pub fn split_uris(value: &str) -> Vec<String> {
    let mut uris = Vec::new();
    let mut tokens = value.split_whitespace();
    while let Some(token) = tokens.next() {
        if QUALIFIED_HEAD.is_match(token) {
            match tokens.next() {
                Some(rest) => uris.push(format!("{} {}", token, rest)),
                None => uris.push(token.to_string()),
            }
        } else {
            uris.push(token.to_string());
        }
    }
    uris
}

fn links(value: &str) -> Vec<Link> {
    split_uris(value).into_iter().map(Link::Symbolic).collect()
}

fn typed(element: &mut Element) -> Result<&mut TypedElement> {
    let found = element.kind().to_string();
    element.typed_mut().ok_or(EcoreError::KindMismatch {
        expected: "ETypedElement".to_string(),
        found,
    })
}

fn feature(element: &mut Element) -> Result<&mut StructuralFeature> {
    let found = element.kind().to_string();
    element.feature_mut().ok_or(EcoreError::KindMismatch {
        expected: "EStructuralFeature".to_string(),
        found,
    })
}

fn classifier(element: &mut Element) -> Result<&mut Classifier> {
    let found = element.kind().to_string();
    element.classifier_mut().ok_or(EcoreError::KindMismatch {
        expected: "EClassifier".to_string(),
        found,
    })
}

/// Assign `$field` on the `$as_mut` projection, or fail with a kind mismatch
macro_rules! set {
    ($element:expr, $as_mut:ident, $name:literal, $field:ident = $value:expr) => {{
        let found = $element.kind().to_string();
        let target = $element.$as_mut().ok_or(EcoreError::KindMismatch {
            expected: $name.to_string(),
            found,
        })?;
        target.$field = $value;
        Ok(())
    }};
}

// =============================================================================
// Own Entries
// =============================================================================

const NAMED: &[(&str, Setter)] = &[("name", |e, v| {
    e.name = Some(v.to_string());
    Ok(())
})];

const PACKAGE: &[(&str, Setter)] = &[
    ("nsURI", |e, v| set!(e, as_package_mut, "EPackage", ns_uri = Some(v.to_string()))),
    ("nsPrefix", |e, v| set!(e, as_package_mut, "EPackage", ns_prefix = Some(v.to_string()))),
    ("eFactoryInstance", |e, v| {
        set!(e, as_package_mut, "EPackage", factory_instance = Some(Link::symbolic(v)))
    }),
];

const CLASSIFIER: &[(&str, Setter)] = &[
    ("instanceClassName", |e, v| {
        classifier(e)?.instance_class_name = Some(v.to_string());
        Ok(())
    }),
    ("instanceTypeName", |e, v| {
        classifier(e)?.instance_type_name = Some(v.to_string());
        Ok(())
    }),
];

const CLASS: &[(&str, Setter)] = &[
    ("abstract", |e, v| set!(e, as_class_mut, "EClass", is_abstract = parse_bool("abstract", v)?)),
    ("interface", |e, v| {
        set!(e, as_class_mut, "EClass", is_interface = parse_bool("interface", v)?)
    }),
    ("eSuperTypes", |e, v| set!(e, as_class_mut, "EClass", super_types = links(v))),
];

const DATA_TYPE: &[(&str, Setter)] = &[("serializable", |e, v| {
    let serializable = parse_bool("serializable", v)?;
    if let Some(en) = e.as_enum_mut() {
        en.data_type.serializable = serializable;
        return Ok(());
    }
    set!(e, as_data_type_mut, "EDataType", serializable = serializable)
})];

const ENUM_LITERAL: &[(&str, Setter)] = &[
    ("value", |e, v| set!(e, as_enum_literal_mut, "EEnumLiteral", value = parse_int("value", v)?)),
    ("literal", |e, v| {
        set!(e, as_enum_literal_mut, "EEnumLiteral", literal = Some(v.to_string()))
    }),
];

const TYPED: &[(&str, Setter)] = &[
    ("eType", |e, v| {
        typed(e)?.e_type = Some(Link::symbolic(v));
        Ok(())
    }),
    ("lowerBound", |e, v| {
        typed(e)?.lower_bound = parse_int("lowerBound", v)?;
        Ok(())
    }),
    ("upperBound", |e, v| {
        typed(e)?.upper_bound = parse_int("upperBound", v)?;
        Ok(())
    }),
    ("ordered", |e, v| {
        typed(e)?.ordered = parse_bool("ordered", v)?;
        Ok(())
    }),
    ("unique", |e, v| {
        typed(e)?.unique = parse_bool("unique", v)?;
        Ok(())
    }),
];

const FEATURE: &[(&str, Setter)] = &[
    ("changeable", |e, v| {
        feature(e)?.changeable = parse_bool("changeable", v)?;
        Ok(())
    }),
    ("defaultValueLiteral", |e, v| {
        feature(e)?.default_value_literal = Some(v.to_string());
        Ok(())
    }),
    ("derived", |e, v| {
        feature(e)?.derived = parse_bool("derived", v)?;
        Ok(())
    }),
    ("transient", |e, v| {
        feature(e)?.transient = parse_bool("transient", v)?;
        Ok(())
    }),
    ("unsettable", |e, v| {
        feature(e)?.unsettable = parse_bool("unsettable", v)?;
        Ok(())
    }),
    ("volatile", |e, v| {
        feature(e)?.volatile = parse_bool("volatile", v)?;
        Ok(())
    }),
];

const ATTRIBUTE: &[(&str, Setter)] = &[("iD", |e, v| {
    set!(e, as_attribute_mut, "EAttribute", id = parse_bool("iD", v)?)
})];

const REFERENCE: &[(&str, Setter)] = &[
    ("containment", |e, v| {
        set!(e, as_reference_mut, "EReference", containment = parse_bool("containment", v)?)
    }),
    ("eOpposite", |e, v| {
        set!(e, as_reference_mut, "EReference", opposite = Some(Link::symbolic(v)))
    }),
    ("resolveProxies", |e, v| {
        set!(e, as_reference_mut, "EReference", resolve_proxies = parse_bool("resolveProxies", v)?)
    }),
    ("eKeys", |e, v| set!(e, as_reference_mut, "EReference", keys = links(v))),
];

const OPERATION: &[(&str, Setter)] = &[("eExceptions", |e, v| {
    set!(e, as_operation_mut, "EOperation", exceptions = links(v))
})];

const ANNOTATION: &[(&str, Setter)] = &[
    ("source", |e, v| set!(e, as_annotation_mut, "EAnnotation", source = Some(v.to_string()))),
    ("references", |e, v| set!(e, as_annotation_mut, "EAnnotation", references = links(v))),
];

const GENERIC_TYPE: &[(&str, Setter)] = &[
    ("eClassifier", |e, v| {
        set!(e, as_generic_type_mut, "EGenericType", classifier = Some(Link::symbolic(v)))
    }),
    ("eTypeParameter", |e, v| {
        set!(e, as_generic_type_mut, "EGenericType", type_parameter = Some(Link::symbolic(v)))
    }),
];

// =============================================================================
// Composition
// =============================================================================

static TABLES: LazyLock<HashMap<ElementKind, AttributeTable>> = LazyLock::new(|| {
    let root = AttributeTable::default();
    let named = AttributeTable::extend(&root, NAMED);
    let classifier = AttributeTable::extend(&named, CLASSIFIER);
    let data_type = AttributeTable::extend(&classifier, DATA_TYPE);
    let typed = AttributeTable::extend(&named, TYPED);
    let feature = AttributeTable::extend(&typed, FEATURE);

    let mut tables = HashMap::new();
    tables.insert(ElementKind::Package, AttributeTable::extend(&named, PACKAGE));
    tables.insert(ElementKind::Class, AttributeTable::extend(&classifier, CLASS));
    tables.insert(ElementKind::Enum, data_type.clone());
    tables.insert(ElementKind::DataType, data_type);
    tables.insert(ElementKind::EnumLiteral, AttributeTable::extend(&named, ENUM_LITERAL));
    tables.insert(ElementKind::Attribute, AttributeTable::extend(&feature, ATTRIBUTE));
    tables.insert(ElementKind::Reference, AttributeTable::extend(&feature, REFERENCE));
    tables.insert(ElementKind::Operation, AttributeTable::extend(&typed, OPERATION));
    tables.insert(ElementKind::Parameter, typed);
    tables.insert(ElementKind::TypeParameter, named);
    tables.insert(ElementKind::Annotation, AttributeTable::extend(&root, ANNOTATION));
    tables.insert(ElementKind::GenericType, AttributeTable::extend(&root, GENERIC_TYPE));
    tables
});

static EMPTY: LazyLock<AttributeTable> = LazyLock::new(AttributeTable::default);

/// Merged table for a concrete kind
pub fn table_for(kind: ElementKind) -> &'static AttributeTable {
    TABLES.get(&kind).unwrap_or(&EMPTY)
}

/// Apply every attribute except `skip` (the type discriminator) to `element`
pub fn apply(element: &mut Element, attributes: &Attributes, skip: &str) -> Result<()> {
    let table = table_for(element.kind());
    for (attribute, value) in attributes {
        if attribute == skip {
            continue;
        }
        let setter = table
            .get(attribute)
            .ok_or_else(|| EcoreError::UnexpectedAttribute {
                attribute: attribute.clone(),
                element: element.kind().to_string(),
            })?;
        setter(element, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reference_table_inherits_feature_entries() {
        let table = table_for(ElementKind::Reference);
        for name in ["name", "eType", "upperBound", "changeable", "containment", "eOpposite"] {
            assert!(table.contains(name), "missing {}", name);
        }
        assert!(!table.contains("iD"));
        assert!(!table_for(ElementKind::Attribute).contains("containment"));
    }

    #[test]
    fn test_apply_sets_typed_fields() {
        let mut model = Model::new();
        let id = model.create(ElementKind::Attribute);
        let element = model.get_mut(id);
        apply(
            element,
            &attrs(&[("name", "count"), ("upperBound", "-1"), ("iD", "true"), ("eType", "#//Int")]),
            "xsi:type",
        )
        .unwrap();

        let attr = element.as_attribute().unwrap();
        assert_eq!(element.name(), "count");
        assert_eq!(attr.feature.typed.upper_bound, -1);
        assert!(attr.id);
        assert_eq!(attr.feature.typed.e_type, Some(Link::symbolic("#//Int")));
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let mut model = Model::new();
        let id = model.create(ElementKind::Class);
        let err = apply(model.get_mut(id), &attrs(&[("containment", "true")]), "xsi:type")
            .unwrap_err();
        assert!(matches!(err, EcoreError::UnexpectedAttribute { .. }));
    }

    #[test]
    fn test_discriminator_is_skipped() {
        let mut model = Model::new();
        let id = model.create(ElementKind::Class);
        apply(model.get_mut(id), &attrs(&[("xsi:type", "ecore:EClass")]), "xsi:type").unwrap();
    }

    #[test]
    fn test_bad_boolean_is_rejected() {
        let mut model = Model::new();
        let id = model.create(ElementKind::Class);
        let err = apply(model.get_mut(id), &attrs(&[("abstract", "yes")]), "xsi:type").unwrap_err();
        assert!(matches!(err, EcoreError::InvalidAttributeValue { .. }));
    }

    #[test]
    fn test_split_uris_keeps_qualified_form() {
        let uris = split_uris("#//A ecore:EClass http://www.eclipse.org/emf/2002/Ecore#//EObject #//B");
        assert_eq!(
            uris,
            vec![
                "#//A".to_string(),
                "ecore:EClass http://www.eclipse.org/emf/2002/Ecore#//EObject".to_string(),
                "#//B".to_string(),
            ]
        );
    }
}
