//! Acceptor / Traversal Framework
//!
//! Routes an element to the handler for its concrete kind. Every default
//! handler forwards to the handler of the kind's Ecore supertype, so an
//! acceptor that overrides only `accept_named_element` still sees every
//! named element exactly once.
//!
//! Fallback chain:
//! ```text
//! attribute, reference -> structural_feature -> typed_element -> named_element
//! operation, parameter -> typed_element
//! class, data_type -> classifier -> named_element      (enum -> data_type)
//! package, enum_literal, type_parameter -> named_element
//! named_element, annotation -> model_element -> default
//! generic_type -> default
//! ```
//!
//! Setting [`Acceptor::RECURSE`] turns an acceptor into a traversal: the
//! default handlers then also visit contained elements (see [`walk`]).
//! Overriding a handler replaces the default; call the matching `walk_*`
//! function to keep falling back and recursing.

pub mod walk;

pub use walk::*;

use crate::error::Result;
use crate::model::{ElementId, ElementKind, Model};

/// Kind-dispatched handler set over a [`Model`], with a user context `C`
pub trait Acceptor<C: ?Sized = ()> {
    /// Whether the default handlers descend into contained elements
    const RECURSE: bool = false;

    /// Catch-all reached at the end of every fallback chain
    fn accept_default(&mut self, _model: &Model, _id: ElementId, _cx: &mut C) -> Result<()> {
        Ok(())
    }

    fn accept_model_element(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_model_element(self, model, id, cx)
    }

    fn accept_named_element(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_named_element(self, model, id, cx)
    }

    fn accept_package(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_package(self, model, id, cx)
    }

    fn accept_classifier(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_classifier(self, model, id, cx)
    }

    fn accept_class(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_class(self, model, id, cx)
    }

    fn accept_data_type(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_data_type(self, model, id, cx)
    }

    fn accept_enum(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_enum(self, model, id, cx)
    }

    fn accept_enum_literal(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_enum_literal(self, model, id, cx)
    }

    fn accept_typed_element(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_typed_element(self, model, id, cx)
    }

    fn accept_structural_feature(
        &mut self,
        model: &Model,
        id: ElementId,
        cx: &mut C,
    ) -> Result<()> {
        walk_structural_feature(self, model, id, cx)
    }

    fn accept_attribute(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_attribute(self, model, id, cx)
    }

    fn accept_reference(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_reference(self, model, id, cx)
    }

    fn accept_operation(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_operation(self, model, id, cx)
    }

    fn accept_parameter(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_parameter(self, model, id, cx)
    }

    fn accept_type_parameter(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_type_parameter(self, model, id, cx)
    }

    fn accept_annotation(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_annotation(self, model, id, cx)
    }

    fn accept_generic_type(&mut self, model: &Model, id: ElementId, cx: &mut C) -> Result<()> {
        walk_generic_type(self, model, id, cx)
    }
}

/// Invoke the most specific handler for `element`; `None` is a no-op
pub fn dispatch<A, C>(
    acceptor: &mut A,
    model: &Model,
    element: Option<ElementId>,
    cx: &mut C,
) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    match element {
        Some(id) => accept(acceptor, model, id, cx),
        None => Ok(()),
    }
}

/// Invoke the most specific handler for `id`
pub fn accept<A, C>(acceptor: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    match model.kind(id) {
        ElementKind::Package => acceptor.accept_package(model, id, cx),
        ElementKind::Class => acceptor.accept_class(model, id, cx),
        ElementKind::DataType => acceptor.accept_data_type(model, id, cx),
        ElementKind::Enum => acceptor.accept_enum(model, id, cx),
        ElementKind::EnumLiteral => acceptor.accept_enum_literal(model, id, cx),
        ElementKind::Attribute => acceptor.accept_attribute(model, id, cx),
        ElementKind::Reference => acceptor.accept_reference(model, id, cx),
        ElementKind::Operation => acceptor.accept_operation(model, id, cx),
        ElementKind::Parameter => acceptor.accept_parameter(model, id, cx),
        ElementKind::TypeParameter => acceptor.accept_type_parameter(model, id, cx),
        ElementKind::Annotation => acceptor.accept_annotation(model, id, cx),
        ElementKind::GenericType => acceptor.accept_generic_type(model, id, cx),
    }
}
