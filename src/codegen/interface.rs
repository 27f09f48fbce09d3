//! Interface Generator
//!
//! Emits the public surface of a package:
//! - one Rust enum per `EEnum`, with `literal()`, `value()` and `Default`
//! - one trait per `EClass` in class order, with supertypes as supertraits
//!
//! Traits declare a getter per structural feature and a defaulted method per
//! operation. `set*` operations taking one parameter become `&mut self`
//! setters. An operation whose method name is already taken by an accessor
//! of the same class is skipped.

use std::collections::HashSet;

use super::config::CodegenConfig;
use super::model_string::ModelString;
use super::names::Names;
use super::types::{enum_variants, TypeDesignation, TypeMapper};
use crate::error::Result;
use crate::model::{ElementId, Model};
use crate::visit::{self, Acceptor};

pub struct InterfaceGenerator<'g> {
    mapper: &'g TypeMapper<'g>,
    names: &'g mut Names,
    config: &'g CodegenConfig,
    /// Enums and traits written so far
    pub type_count: usize,
}

impl<'g> InterfaceGenerator<'g> {
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

    fn model_comment(
        &self,
        model: &Model,
        id: ElementId,
        indent: &str,
        out: &mut String,
    ) -> Result<()> {
        if self.config.emit.model_comments {
            out.push_str(&format!("{}// @model {}\n", indent, ModelString::render(model, id)?));
        }
        Ok(())
    }
}

/// `setFoo` style operation with a single parameter
pub fn is_setter(model: &Model, operation: ElementId) -> bool {
    let name = model.name(operation);
    let shaped = name
        .strip_prefix("set")
        .and_then(|rest| rest.chars().next())
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false);
    let params = model
        .get(operation)
        .as_operation()
        .map(|o| o.parameters.len())
        .unwrap_or(0);
    shaped && params == 1
}

impl Acceptor<String> for InterfaceGenerator<'_> {
    fn accept_package(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        let Some(package) = model.package(id) else {
            return Ok(());
        };
        for &data_type in package.data_types.values() {
            visit::accept(self, model, data_type, out)?;
        }
        for class in model.sorted_classes(id) {
            visit::accept(self, model, class, out)?;
        }
        Ok(())
    }

    fn accept_enum(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        let name = model.name(id);
        let variants = enum_variants(model, id);

        out.push('\n');
        self.model_comment(model, id, "", out)?;
        if variants.is_empty() {
            out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
        } else {
            out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]\n");
        }
        out.push_str(&format!("pub enum {} {{\n", name));
        for (i, (_, variant)) in variants.iter().enumerate() {
            if i == 0 {
                out.push_str("    #[default]\n");
            }
            out.push_str(&format!("    {},\n", variant));
        }
        out.push_str("}\n\n");

        out.push_str(&format!("impl {} {{\n", name));
        out.push_str("    pub fn literal(&self) -> &'static str {\n");
        if variants.is_empty() {
            out.push_str("        match *self {}\n");
        } else {
            out.push_str("        match self {\n");
            for (literal, variant) in &variants {
                out.push_str(&format!(
                    "            Self::{} => {:?},\n",
                    variant,
                    model.literal_text(*literal)
                ));
            }
            out.push_str("        }\n");
        }
        out.push_str("    }\n\n");

        out.push_str("    pub fn value(&self) -> i32 {\n");
        if variants.is_empty() {
            out.push_str("        match *self {}\n");
        } else {
            out.push_str("        match self {\n");
            for (literal, variant) in &variants {
                let value = model.get(*literal).as_enum_literal().map(|l| l.value).unwrap_or(0);
                out.push_str(&format!("            Self::{} => {},\n", variant, value));
            }
            out.push_str("        }\n");
        }
        out.push_str("    }\n");
        out.push_str("}\n");

        self.type_count += 1;
        Ok(())
    }

    fn accept_data_type(
        &mut self,
        _model: &Model,
        _id: ElementId,
        _out: &mut String,
    ) -> Result<()> {
        // plain data types map onto existing Rust types
        Ok(())
    }

    fn accept_class(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        let Some(class) = model.class(id) else {
            return Ok(());
        };
        let types = self.mapper.types();

        let supertraits: Vec<String> = model
            .super_types(id)
            .filter_map(|s| match self.mapper.map_classifier(s) {
                TypeDesignation::Class { path } => Some(path),
                _ => None,
            })
            .collect();

        out.push('\n');
        self.model_comment(model, id, "", out)?;
        if supertraits.is_empty() {
            out.push_str(&format!("pub trait {} {{\n", model.name(id)));
        } else {
            out.push_str(&format!(
                "pub trait {}: {} {{\n",
                model.name(id),
                supertraits.join(" + ")
            ));
        }

        let mut taken = HashSet::new();
        let mut first = true;
        for &feature in class.attributes.iter().chain(&class.references) {
            let field = self.mapper.field(feature);
            let getter = self.names.getter(model.name(feature), field.designation.is_boolean());
            taken.insert(getter.clone());

            if !first {
                out.push('\n');
            }
            first = false;
            self.model_comment(model, feature, "    ", out)?;
            out.push_str(&format!("    fn {}(&self) -> {};\n", getter, field.getter_type(types)));
        }

        for &operation in &class.operations {
            let setter = is_setter(model, operation);
            let returns = self.mapper.map(operation);
            let base = self.names.method(model.name(operation));
            let method = if setter {
                format!("set_{}", base.trim_start_matches("r#"))
            } else if returns.is_boolean() && !base.starts_with("is_") {
                format!("is_{}", base.trim_start_matches("r#"))
            } else {
                base
            };
            if !taken.insert(method.clone()) {
                continue;
            }

            let params: Vec<String> = model
                .get(operation)
                .as_operation()
                .map(|o| o.parameters.clone())
                .unwrap_or_default()
                .into_iter()
                .map(|p| {
                    format!(
                        "{}: {}",
                        self.names.attribute(model.name(p)),
                        self.mapper.map(p).render(types)
                    )
                })
                .collect();
            let receiver = if setter { "&mut self" } else { "&self" };
            let signature = std::iter::once(receiver.to_string())
                .chain(params)
                .collect::<Vec<_>>()
                .join(", ");
            let ret = match returns {
                TypeDesignation::Unit => String::new(),
                other => format!(" -> {}", other.render(types)),
            };

            if !first {
                out.push('\n');
            }
            first = false;
            self.model_comment(model, operation, "    ", out)?;
            out.push_str(&format!("    fn {}({}){} {{\n", method, signature, ret));
            out.push_str(&format!(
                "        unimplemented!(\"{}::{}\")\n",
                model.name(id),
                model.name(operation)
            ));
            out.push_str("    }\n");
        }
        out.push_str("}\n");

        self.type_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, Link};

    fn generate(model: &Model, package: ElementId) -> String {
        let config = CodegenConfig::default();
        let mut mapper = TypeMapper::new(model, &config.types, &config.naming.keyword_escape);
        mapper.set_current(package);
        let mut names = Names::new(config.naming.clone());
        let mut generator = InterfaceGenerator::new(&mapper, &mut names, &config);
        let mut out = String::new();
        visit::accept(&mut generator, model, package, &mut out).unwrap();
        out
    }

    fn typed(model: &mut Model, kind: ElementKind, name: &str, target: ElementId) -> ElementId {
        let id = model.create_named(kind, name);
        model.get_mut(id).typed_mut().unwrap().e_type = Some(Link::Resolved(target));
        id
    }

    #[test]
    fn test_enum_emission() {
        let mut model = Model::new();
        let package = model.create_named(ElementKind::Package, "p");
        let color = model.create_named(ElementKind::Enum, "Color");
        model.add_data_type(package, color).unwrap();
        for (i, name) in ["red", "green"].into_iter().enumerate() {
            let literal = model.create_named(ElementKind::EnumLiteral, name);
            model.get_mut(literal).as_enum_literal_mut().unwrap().value = i as i32;
            model.add_literal(color, literal).unwrap();
        }

        let code = generate(&model, package);
        assert!(code.contains("pub enum Color {\n    #[default]\n    Red,\n    Green,\n}"));
        assert!(code.contains("Self::Green => \"green\","));
        assert!(code.contains("Self::Green => 1,"));
    }

    #[test]
    fn test_trait_with_supertrait_and_accessors() {
        let mut model = Model::new();
        let ecore = model.add_ecore_package().unwrap();
        let boolean = model.package(ecore).unwrap().data_types["EBoolean"];
        let package = model.create_named(ElementKind::Package, "p");
        let base = model.create_named(ElementKind::Class, "Base");
        model.add_class(package, base).unwrap();
        let derived = model.create_named(ElementKind::Class, "Derived");
        model.get_mut(derived).as_class_mut().unwrap().super_types.push(Link::Resolved(base));
        model.add_class(package, derived).unwrap();

        let active = typed(&mut model, ElementKind::Attribute, "active", boolean);
        model.add_attribute(derived, active).unwrap();
        // shadowed by the `active` accessor
        let is_active = typed(&mut model, ElementKind::Operation, "isActive", boolean);
        model.add_operation(derived, is_active).unwrap();
        let set_owner = model.create_named(ElementKind::Operation, "setOwner");
        let param = typed(&mut model, ElementKind::Parameter, "owner", base);
        model.add_parameter(set_owner, param).unwrap();
        model.add_operation(derived, set_owner).unwrap();

        let code = generate(&model, package);
        let base_at = code.find("pub trait Base {").unwrap();
        let derived_at = code.find("pub trait Derived: Base {").unwrap();
        assert!(base_at < derived_at);
        assert!(code.contains("    fn is_active(&self) -> bool;\n"));
        assert_eq!(code.matches("fn is_active").count(), 1);
        assert!(code.contains("    fn set_owner(&mut self, owner: Rc<dyn Base>) {\n"));
        assert!(code.contains("unimplemented!(\"Derived::setOwner\")"));
    }

    #[test]
    fn test_model_comments_can_be_disabled() {
        let mut model = Model::new();
        let package = model.create_named(ElementKind::Package, "p");
        let class = model.create_named(ElementKind::Class, "Thing");
        model.add_class(package, class).unwrap();

        let mut config = CodegenConfig::default();
        config.emit.model_comments = false;
        let mapper = TypeMapper::new(&model, &config.types, &config.naming.keyword_escape);
        let mut names = Names::new(config.naming.clone());
        let mut generator = InterfaceGenerator::new(&mapper, &mut names, &config);
        let mut out = String::new();
        visit::accept(&mut generator, &model, package, &mut out).unwrap();

        assert!(!out.contains("@model"));
        assert!(out.contains("pub trait Thing {\n}"));
        assert_eq!(generator.type_count, 1);
    }
}
