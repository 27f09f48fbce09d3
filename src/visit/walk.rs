//! Default handler bodies
//!
//! Each `walk_*` function first runs the handler of the kind's supertype and
//! then, for traversals, dispatches the elements the kind itself contains.
//! Packages visit data types, then classes in class order, then subpackages.

use super::{dispatch, Acceptor};
use crate::error::Result;
use crate::model::{ElementId, Model};

fn each<A, C>(a: &mut A, model: &Model, ids: &[ElementId], cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    for &id in ids {
        dispatch(a, model, Some(id), cx)?;
    }
    Ok(())
}

pub fn walk_model_element<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_default(model, id, cx)?;
    if A::RECURSE {
        each(a, model, &model.get(id).annotations, cx)?;
    }
    Ok(())
}

pub fn walk_named_element<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_model_element(model, id, cx)
}

pub fn walk_package<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_named_element(model, id, cx)?;
    if A::RECURSE {
        if let Some(package) = model.package(id) {
            let data_types: Vec<ElementId> = package.data_types.values().copied().collect();
            each(a, model, &data_types, cx)?;
            each(a, model, &model.sorted_classes(id), cx)?;
            let subpackages: Vec<ElementId> = package.subpackages.values().copied().collect();
            each(a, model, &subpackages, cx)?;
        }
    }
    Ok(())
}

pub fn walk_classifier<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_named_element(model, id, cx)?;
    if A::RECURSE {
        if let Some(classifier) = model.get(id).classifier() {
            each(a, model, &classifier.type_parameters, cx)?;
        }
    }
    Ok(())
}

pub fn walk_class<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_classifier(model, id, cx)?;
    if A::RECURSE {
        if let Some(class) = model.class(id) {
            each(a, model, &class.attributes, cx)?;
            each(a, model, &class.references, cx)?;
            each(a, model, &class.operations, cx)?;
            each(a, model, &class.generic_super_types, cx)?;
        }
    }
    Ok(())
}

pub fn walk_data_type<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_classifier(model, id, cx)
}

pub fn walk_enum<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_data_type(model, id, cx)?;
    if A::RECURSE {
        if let Some(en) = model.get(id).as_enum() {
            each(a, model, &en.literals, cx)?;
        }
    }
    Ok(())
}

pub fn walk_enum_literal<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_named_element(model, id, cx)
}

pub fn walk_typed_element<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_named_element(model, id, cx)?;
    if A::RECURSE {
        let generic = model.get(id).typed().and_then(|t| t.generic_type);
        dispatch(a, model, generic, cx)?;
    }
    Ok(())
}

pub fn walk_structural_feature<A, C>(
    a: &mut A,
    model: &Model,
    id: ElementId,
    cx: &mut C,
) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_typed_element(model, id, cx)
}

pub fn walk_attribute<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_structural_feature(model, id, cx)
}

pub fn walk_reference<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_structural_feature(model, id, cx)
}

pub fn walk_operation<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_typed_element(model, id, cx)?;
    if A::RECURSE {
        if let Some(op) = model.get(id).as_operation() {
            each(a, model, &op.parameters, cx)?;
            each(a, model, &op.type_parameters, cx)?;
        }
    }
    Ok(())
}

pub fn walk_parameter<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_typed_element(model, id, cx)
}

pub fn walk_type_parameter<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_named_element(model, id, cx)?;
    if A::RECURSE {
        if let Some(tp) = model.get(id).as_type_parameter() {
            each(a, model, &tp.bounds, cx)?;
        }
    }
    Ok(())
}

pub fn walk_annotation<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_model_element(model, id, cx)?;
    if A::RECURSE {
        if let Some(annotation) = model.get(id).as_annotation() {
            each(a, model, &annotation.contents, cx)?;
        }
    }
    Ok(())
}

pub fn walk_generic_type<A, C>(a: &mut A, model: &Model, id: ElementId, cx: &mut C) -> Result<()>
where
    A: Acceptor<C> + ?Sized,
    C: ?Sized,
{
    a.accept_default(model, id, cx)?;
    if A::RECURSE {
        if let Some(generic) = model.get(id).as_generic_type() {
            dispatch(a, model, generic.lower_bound, cx)?;
            dispatch(a, model, generic.upper_bound, cx)?;
            each(a, model, &generic.type_arguments, cx)?;
        }
    }
    Ok(())
}
