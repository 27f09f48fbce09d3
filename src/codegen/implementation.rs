//! Implementation Generator
//!
//! Emits a `<Name>Impl` struct for every concrete class of a package:
//! fields for all features (ancestors first), a `Default` impl built from
//! materialized defaults, mutators, and one trait impl per ancestor plus the
//! class itself. Abstract and interface classes only get their trait.

use std::collections::HashMap;

use super::config::CodegenConfig;
use super::names::{self, Names};
use super::types::{FieldType, TypeDesignation, TypeMapper};
use crate::error::Result;
use crate::model::{ElementId, Model};
use crate::visit::{self, Acceptor};

pub struct ImplementationGenerator<'g> {
    mapper: &'g TypeMapper<'g>,
    names: &'g mut Names,
    config: &'g CodegenConfig,
    /// Structs written so far
    pub type_count: usize,
}

/// A feature as laid out in an implementation struct
struct Field {
    id: ElementId,
    /// Every feature stored in this field, the kept one first
    declared_by: Vec<ElementId>,
    ident: String,
    stem: String,
    ty: FieldType,
}

impl<'g> ImplementationGenerator<'g> {
    pub fn new(
        mapper: &'g TypeMapper<'g>,
        names: &'g mut Names,
        config: &'g CodegenConfig,
    ) -> Self {
        Self {
            mapper,
            names,
            config,
            type_count: 0,
        }
    }

    /// Features of `class` and its ancestors, first declaration of a name wins
    fn fields(&mut self, model: &Model, class: ElementId) -> Vec<Field> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut fields: Vec<Field> = Vec::new();
        for id in model.all_features(class) {
            let ident = self.names.attribute(model.name(id));
            if let Some(&index) = seen.get(&ident) {
                // redeclared in a subclass: the kept field serves both traits
                fields[index].declared_by.push(id);
                continue;
            }
            seen.insert(ident.clone(), fields.len());
            fields.push(Field {
                id,
                declared_by: vec![id],
                ident,
                stem: self.names.stem(model.name(id)),
                ty: self.mapper.field(id),
            });
        }
        fields
    }

    fn emit_mutators(&self, model: &Model, field: &Field, out: &mut String) {
        let Some(feature) = model.get(field.id).feature() else {
            return;
        };
        if !feature.changeable {
            return;
        }
        let types = self.mapper.types();
        let value = field.ty.designation.render(types);
        let ident = &field.ident;

        out.push_str(&format!(
            "\n    pub fn set_{}(&mut self, {}: {}) {{\n",
            field.stem, ident, value
        ));
        if field.ty.is_optional() {
            out.push_str(&format!("        self.{} = Some({});\n", ident, ident));
        } else {
            out.push_str(&format!("        self.{} = {};\n", ident, ident));
        }
        out.push_str("    }\n");

        if feature.unsettable {
            out.push_str(&format!("\n    pub fn unset_{}(&mut self) {{\n", field.stem));
            out.push_str(&format!("        self.{} = {};\n", ident, field.ty.init()));
            out.push_str("    }\n");
        }

        match &field.ty.designation {
            TypeDesignation::Many(inner) => {
                let one = names::escape_keyword(
                    &names::singular(&field.stem),
                    &self.config.naming.keyword_escape,
                );
                out.push_str(&format!(
                    "\n    pub fn add_{}(&mut self, {}: {}) {{\n",
                    names::singular(&field.stem),
                    one,
                    inner.render(types)
                ));
                if types.many.starts_with("Vec<") {
                    out.push_str(&format!("        self.{}.push({});\n", ident, one));
                } else {
                    out.push_str(&format!(
                        "        self.{}.extend(std::iter::once({}));\n",
                        ident, one
                    ));
                }
                out.push_str("    }\n");
            }
            TypeDesignation::StringMap => {
                out.push_str(&format!(
                    "\n    pub fn add_{}(&mut self, key: String, value: String) {{\n",
                    names::singular(&field.stem)
                ));
                out.push_str(&format!("        self.{}.insert(key, value);\n", ident));
                out.push_str("    }\n");
            }
            _ => {}
        }
    }

    fn emit_trait_impl(
        &self,
        model: &Model,
        owner: ElementId,
        struct_name: &str,
        fields: &[Field],
        out: &mut String,
    ) {
        let TypeDesignation::Class { path } = self.mapper.map_classifier(owner) else {
            return;
        };
        let types = self.mapper.types();
        let declared_here = |feature: ElementId| {
            model.get(feature).feature().and_then(|f| f.containing_class) == Some(owner)
        };
        let own: Vec<&Field> = fields
            .iter()
            .filter(|f| f.declared_by.iter().any(|&d| declared_here(d)))
            .collect();

        out.push('\n');
        if own.is_empty() {
            out.push_str(&format!("impl {} for {} {{}}\n", path, struct_name));
            return;
        }
        out.push_str(&format!("impl {} for {} {{\n", path, struct_name));
        for (i, field) in own.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let getter = if field.ty.designation.is_boolean() && !field.stem.starts_with("is_") {
                format!("is_{}", field.stem)
            } else {
                field.ident.clone()
            };
            out.push_str(&format!(
                "    fn {}(&self) -> {} {{\n",
                getter,
                field.ty.getter_type(types)
            ));
            out.push_str(&format!("        {}\n", field.ty.getter_body(&field.ident)));
            out.push_str("    }\n");
        }
        out.push_str("}\n");
    }
}

impl Acceptor<String> for ImplementationGenerator<'_> {
    fn accept_package(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        for class in model.sorted_classes(id) {
            visit::accept(self, model, class, out)?;
        }
        Ok(())
    }

    fn accept_class(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        let Some(class) = model.class(id) else {
            return Ok(());
        };
        if class.is_abstract || class.is_interface {
            return Ok(());
        }
        let struct_name = self.names.impl_name(model.name(id));
        let fields = self.fields(model, id);
        let types = self.mapper.types();

        out.push('\n');
        if fields.is_empty() {
            out.push_str(&format!("pub struct {} {{}}\n", struct_name));
        } else {
            out.push_str(&format!("pub struct {} {{\n", struct_name));
            for field in &fields {
                out.push_str(&format!("    {}: {},\n", field.ident, field.ty.render(types)));
            }
            out.push_str("}\n");
        }

        out.push_str(&format!("\nimpl Default for {} {{\n", struct_name));
        out.push_str("    fn default() -> Self {\n");
        if fields.is_empty() {
            out.push_str("        Self {}\n");
        } else {
            out.push_str("        Self {\n");
            for field in &fields {
                out.push_str(&format!("            {}: {},\n", field.ident, field.ty.init()));
            }
            out.push_str("        }\n");
        }
        out.push_str("    }\n}\n");

        out.push_str(&format!("\nimpl {} {{\n", struct_name));
        out.push_str("    pub fn new() -> Self {\n        Self::default()\n    }\n");
        for field in &fields {
            self.emit_mutators(model, field, out);
        }
        out.push_str("}\n");

        for owner in model.ancestors(id).into_iter().chain(std::iter::once(id)) {
            self.emit_trait_impl(model, owner, &struct_name, &fields, out);
        }

        self.type_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, Link};

    struct Sample {
        model: Model,
        package: ElementId,
    }

    /// `Base` (abstract, `size: EInt`) and `Item: Base` with `label`, `tags*` and `enabled`
    fn sample() -> Sample {
        let mut model = Model::new();
        let ecore = model.add_ecore_package().unwrap();
        let types = model.package(ecore).unwrap().data_types.clone();
        let package = model.create_named(ElementKind::Package, "shop");

        let base = model.create_named(ElementKind::Class, "Base");
        model.get_mut(base).as_class_mut().unwrap().is_abstract = true;
        model.add_class(package, base).unwrap();
        let item = model.create_named(ElementKind::Class, "Item");
        model.get_mut(item).as_class_mut().unwrap().super_types.push(Link::Resolved(base));
        model.add_class(package, item).unwrap();

        let attribute = |model: &mut Model, class, name: &str, ty: &str, upper: i32| {
            let id = model.create_named(ElementKind::Attribute, name);
            let typed = model.get_mut(id).typed_mut().unwrap();
            typed.e_type = Some(Link::Resolved(types[ty]));
            typed.upper_bound = upper;
            model.add_attribute(class, id).unwrap();
            id
        };
        attribute(&mut model, base, "size", "EInt", 1);
        let label = attribute(&mut model, item, "label", "EString", 1);
        model.get_mut(label).feature_mut().unwrap().unsettable = true;
        attribute(&mut model, item, "tags", "EString", -1);
        let enabled = attribute(&mut model, item, "enabled", "EBoolean", 1);
        model.get_mut(enabled).feature_mut().unwrap().changeable = false;

        Sample { model, package }
    }

    fn generate(sample: &Sample) -> (String, usize) {
        let config = CodegenConfig::default();
        let mut mapper = TypeMapper::new(&sample.model, &config.types, &config.naming.keyword_escape);
        mapper.set_current(sample.package);
        let mut names = Names::new(config.naming.clone());
        let mut generator = ImplementationGenerator::new(&mapper, &mut names, &config);
        let mut out = String::new();
        visit::accept(&mut generator, &sample.model, sample.package, &mut out).unwrap();
        let count = generator.type_count;
        (out, count)
    }

    #[test]
    fn test_abstract_class_has_no_struct() {
        let (code, count) = generate(&sample());
        assert!(!code.contains("BaseImpl"));
        assert!(code.contains("pub struct ItemImpl {"));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_fields_and_defaults() {
        let (code, _) = generate(&sample());
        assert!(code.contains(
            "pub struct ItemImpl {\n    size: i32,\n    label: Option<String>,\n    tags: Vec<String>,\n    enabled: bool,\n}"
        ));
        assert!(code.contains("            size: 0,\n            label: None,\n            tags: Vec::new(),\n            enabled: false,\n"));
    }

    #[test]
    fn test_mutators() {
        let (code, _) = generate(&sample());
        assert!(code.contains("    pub fn set_label(&mut self, label: String) {\n        self.label = Some(label);\n"));
        assert!(code.contains("    pub fn unset_label(&mut self) {\n        self.label = None;\n"));
        assert!(code.contains("    pub fn add_tag(&mut self, tag: String) {\n        self.tags.push(tag);\n"));
        assert!(!code.contains("set_enabled"));
    }

    #[test]
    fn test_trait_impls_per_ancestor() {
        let (code, _) = generate(&sample());
        let base_impl = code.find("impl Base for ItemImpl {").unwrap();
        let item_impl = code.find("impl Item for ItemImpl {").unwrap();
        assert!(base_impl < item_impl);
        assert!(code.contains("    fn size(&self) -> i32 {\n        self.size\n"));
        assert!(code.contains("    fn label(&self) -> Option<&String> {\n        self.label.as_ref()\n"));
        assert!(code.contains("    fn is_enabled(&self) -> bool {\n        self.enabled\n"));
    }

    #[test]
    fn test_redeclared_feature_implements_both_traits() {
        let mut sample = sample();
        let model = &mut sample.model;
        let item = model.package(sample.package).unwrap().classes["Item"];
        let int = model
            .get(model.all_features(item)[0])
            .typed()
            .unwrap()
            .e_type
            .clone();
        let size = model.create_named(ElementKind::Attribute, "size");
        model.get_mut(size).typed_mut().unwrap().e_type = int;
        model.add_attribute(item, size).unwrap();

        let (code, _) = generate(&sample);
        assert_eq!(code.matches("    size: i32,\n").count(), 1);
        assert!(!code.contains("impl Item for ItemImpl {}"));
        let item_impl = code.find("impl Item for ItemImpl {").unwrap();
        assert!(code[item_impl..].contains("    fn size(&self) -> i32 {\n        self.size\n"));
    }
}
