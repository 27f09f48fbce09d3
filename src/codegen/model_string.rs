//! Model Strings
//!
//! One-line summaries of model elements, emitted as `// @model` comments:
//! ```text
//! EPackage[foo] (ns_uri='http://foo.bar/foo', ns_prefix=foo)
//! EClass[B]<[A]> (abstract)
//! EAttribute[EInt] intAttr (bounds=[1,1], id)
//! EReference[A] owner (opposite=B/children, containment)
//! ```
//! Bounds are printed unless they are `[0,1]`.

use crate::error::Result;
use crate::model::{ElementId, Link, Model, StructuralFeature, TypedElement};
use crate::visit::{self, Acceptor};

/// Acceptor writing the model string of one element into a `String`
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelString;

impl ModelString {
    pub fn render(model: &Model, id: ElementId) -> Result<String> {
        let mut out = String::new();
        visit::accept(&mut ModelString, model, id, &mut out)?;
        Ok(out)
    }
}

/// Name of a link target, or the symbolic text while unresolved
fn link_name(model: &Model, link: Option<&Link>) -> String {
    match link {
        Some(Link::Resolved(id)) => model.name(*id).to_string(),
        Some(Link::Symbolic(uri)) => uri.clone(),
        None => "?".to_string(),
    }
}

fn output_options(options: &[String], out: &mut String) {
    if !options.is_empty() {
        out.push_str(" (");
        out.push_str(&options.join(", "));
        out.push(')');
    }
}

fn bounds(typed: &TypedElement, options: &mut Vec<String>) {
    if typed.lower_bound != 0 || typed.upper_bound != 1 {
        options.push(format!("bounds=[{},{}]", typed.lower_bound, typed.upper_bound));
    }
}

fn feature_options(feature: &StructuralFeature, options: &mut Vec<String>) {
    if !feature.changeable {
        options.push("unchangeable".to_string());
    }
    if feature.derived {
        options.push("derived".to_string());
    }
    if feature.transient {
        options.push("transient".to_string());
    }
    if feature.unsettable {
        options.push("unsettable".to_string());
    }
    if feature.volatile {
        options.push("volatile".to_string());
    }
    if let Some(literal) = &feature.default_value_literal {
        options.push(format!("default_value_literal='{}'", literal));
    }
}

impl Acceptor<String> for ModelString {
    fn accept_package(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        out.push_str(&format!("EPackage[{}]", model.name(id)));
        let mut options = Vec::new();
        if let Some(package) = model.package(id) {
            if let Some(uri) = &package.ns_uri {
                options.push(format!("ns_uri='{}'", uri));
            }
            if let Some(prefix) = &package.ns_prefix {
                options.push(format!("ns_prefix={}", prefix));
            }
        }
        output_options(&options, out);
        Ok(())
    }

    fn accept_class(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        out.push_str(&format!("EClass[{}]", model.name(id)));
        let mut options = Vec::new();
        if let Some(class) = model.class(id) {
            if !class.super_types.is_empty() {
                let supers: Vec<String> = class
                    .super_types
                    .iter()
                    .map(|s| link_name(model, Some(s)))
                    .collect();
                out.push_str(&format!("<[{}]>", supers.join(",")));
            }
            if class.is_abstract {
                options.push("abstract".to_string());
            }
            if class.is_interface {
                options.push("interface".to_string());
            }
        }
        output_options(&options, out);
        Ok(())
    }

    fn accept_data_type(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        out.push_str(&format!("EDataType[{}]", model.name(id)));
        let mut options = Vec::new();
        let instance_class = model
            .get(id)
            .classifier()
            .and_then(|c| c.instance_class_name.as_ref());
        if let Some(class_name) = instance_class {
            options.push(format!("instance_class='{}'", class_name));
        }
        output_options(&options, out);
        Ok(())
    }

    fn accept_enum(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        out.push_str(&format!("EEnum[{}]", model.name(id)));
        Ok(())
    }

    fn accept_enum_literal(
        &mut self,
        model: &Model,
        id: ElementId,
        out: &mut String,
    ) -> Result<()> {
        out.push_str(&format!("EEnumLiteral[{}]", model.name(id)));
        let mut options = Vec::new();
        if let Some(literal) = model.get(id).as_enum_literal() {
            options.push(format!("value={}", literal.value));
            if let Some(text) = &literal.literal {
                options.push(format!("literal='{}'", text));
            }
        }
        output_options(&options, out);
        Ok(())
    }

    fn accept_attribute(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        let Some(attribute) = model.get(id).as_attribute() else {
            return Ok(());
        };
        let typed = &attribute.feature.typed;
        out.push_str(&format!(
            "EAttribute[{}] {}",
            link_name(model, typed.e_type.as_ref()),
            model.name(id)
        ));
        let mut options = Vec::new();
        bounds(typed, &mut options);
        if attribute.id {
            options.push("id".to_string());
        }
        feature_options(&attribute.feature, &mut options);
        output_options(&options, out);
        Ok(())
    }

    fn accept_reference(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        let Some(reference) = model.get(id).as_reference() else {
            return Ok(());
        };
        let typed = &reference.feature.typed;
        out.push_str(&format!(
            "EReference[{}] {}",
            link_name(model, typed.e_type.as_ref()),
            model.name(id)
        ));
        let mut options = Vec::new();
        bounds(typed, &mut options);
        match &reference.opposite {
            Some(Link::Resolved(opposite)) => {
                let owner = model
                    .get(*opposite)
                    .typed()
                    .and_then(|t| t.e_type.as_ref());
                options.push(format!(
                    "opposite={}/{}",
                    link_name(model, owner),
                    model.name(*opposite)
                ));
            }
            Some(Link::Symbolic(uri)) => options.push(format!("opposite={}", uri)),
            None => {}
        }
        if reference.containment {
            options.push("containment".to_string());
        }
        if !reference.resolve_proxies {
            options.push("lazy_proxies".to_string());
        }
        feature_options(&reference.feature, &mut options);
        output_options(&options, out);
        Ok(())
    }

    fn accept_operation(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        let Some(operation) = model.get(id).as_operation() else {
            return Ok(());
        };
        let return_type = match &operation.typed.e_type {
            Some(link) => link_name(model, Some(link)),
            None => "void".to_string(),
        };
        out.push_str(&format!("EOperation[{}] {}", return_type, model.name(id)));
        let mut options = Vec::new();
        bounds(&operation.typed, &mut options);
        output_options(&options, out);
        Ok(())
    }

    fn accept_parameter(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        let Some(parameter) = model.get(id).as_parameter() else {
            return Ok(());
        };
        out.push_str(&format!(
            "EParameter[{}] {}",
            link_name(model, parameter.typed.e_type.as_ref()),
            model.name(id)
        ));
        let mut options = Vec::new();
        bounds(&parameter.typed, &mut options);
        output_options(&options, out);
        Ok(())
    }
}
