//! The built-in Ecore package
//!
//! Schema documents type their features with `ecore:EDataType
//! http://www.eclipse.org/emf/2002/Ecore#//EString` and similar. This package
//! provides those targets so qualified references against prefix `ecore`
//! resolve like any other peer.

use super::{ElementId, ElementKind, Link, Model};
use crate::error::Result;

pub const ECORE_NS_URI: &str = "http://www.eclipse.org/emf/2002/Ecore";
pub const ECORE_NS_PREFIX: &str = "ecore";

/// Ecore data types with their instance class names
const DATA_TYPES: &[(&str, &str)] = &[
    ("EBigDecimal", "java.math.BigDecimal"),
    ("EBigInteger", "java.math.BigInteger"),
    ("EBoolean", "boolean"),
    ("EBooleanObject", "java.lang.Boolean"),
    ("EByte", "byte"),
    ("EByteArray", "byte[]"),
    ("EByteObject", "java.lang.Byte"),
    ("EChar", "char"),
    ("ECharacterObject", "java.lang.Character"),
    ("EDate", "java.util.Date"),
    ("EDouble", "double"),
    ("EDoubleObject", "java.lang.Double"),
    ("EFloat", "float"),
    ("EFloatObject", "java.lang.Float"),
    ("EInt", "int"),
    ("EIntegerObject", "java.lang.Integer"),
    ("EJavaClass", "java.lang.Class"),
    ("EJavaObject", "java.lang.Object"),
    ("ELong", "long"),
    ("ELongObject", "java.lang.Long"),
    ("EShort", "short"),
    ("EShortObject", "java.lang.Short"),
    ("EString", "java.lang.String"),
];

/// Name of the map-entry class that generators turn into string maps
pub const STRING_TO_STRING_MAP_ENTRY: &str = "EStringToStringMapEntry";

impl Model {
    /// Add the built-in Ecore package as a resolved root
    pub fn add_ecore_package(&mut self) -> Result<ElementId> {
        let package = self.create_named(ElementKind::Package, ECORE_NS_PREFIX);
        if let Some(p) = self.get_mut(package).as_package_mut() {
            p.ns_uri = Some(ECORE_NS_URI.to_string());
            p.ns_prefix = Some(ECORE_NS_PREFIX.to_string());
            p.resolved = true;
        }

        let mut string_type = None;
        for &(name, instance_class) in DATA_TYPES {
            let data_type = self.create_named(ElementKind::DataType, name);
            if let Some(c) = self.get_mut(data_type).classifier_mut() {
                c.instance_class_name = Some(instance_class.to_string());
            }
            self.add_data_type(package, data_type)?;
            if name == "EString" {
                string_type = Some(data_type);
            }
        }

        let object = self.create_named(ElementKind::Class, "EObject");
        self.add_class(package, object)?;

        let entry = self.create_named(ElementKind::Class, STRING_TO_STRING_MAP_ENTRY);
        if let Some(c) = self.get_mut(entry).classifier_mut() {
            c.instance_class_name = Some("java.util.Map$Entry".to_string());
        }
        self.add_class(package, entry)?;
        for feature in ["key", "value"] {
            let attribute = self.create_named(ElementKind::Attribute, feature);
            if let Some(t) = self.get_mut(attribute).typed_mut() {
                t.e_type = string_type.map(Link::Resolved);
            }
            self.add_attribute(entry, attribute)?;
        }
        Ok(package)
    }

    /// Root or nested package with the given namespace URI
    pub fn package_by_uri(&self, ns_uri: &str) -> Option<ElementId> {
        self.elements()
            .filter(|e| e.as_package().and_then(|p| p.ns_uri.as_deref()) == Some(ns_uri))
            .map(|e| e.id)
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecore_package_contents() {
        let mut model = Model::new();
        let ecore = model.add_ecore_package().unwrap();

        let package = model.package(ecore).unwrap();
        assert!(package.data_types.contains_key("EString"));
        assert!(package.classes.contains_key("EObject"));
        assert!(model.is_resolved(ecore));
        assert_eq!(model.package_by_uri(ECORE_NS_URI), Some(ecore));

        let entry = package.classes[STRING_TO_STRING_MAP_ENTRY];
        assert_eq!(model.class(entry).unwrap().attributes.len(), 2);
    }
}
