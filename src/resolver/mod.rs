//! Reference Resolution
//!
//! Rewrites every `Link::Symbolic` below a root package into a
//! `Link::Resolved` pointing at the target element.
//!
//! Architecture:
//! - `Resolver`: a traversal over the read-only model. Entering a package
//!   pushes it on the open-package stack; each element resolves its own
//!   symbolic fields after its supertype handler ran, and records a patch.
//! - Patches apply only once the whole pass succeeded, so a failed pass
//!   leaves the model untouched. Applying marks the package tree resolved.
//!
//! Sibling packages (peers) are searched for qualified references but are
//! never modified.

pub mod uri;

pub use uri::SymbolicUri;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::{EcoreError, Result};
use crate::model::{ElementId, ElementKind, Link, Model};
use crate::visit::{self, Acceptor};

/// Counts from one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    /// Links rewritten by this pass
    pub resolved: usize,
    /// Links that were already direct
    pub already_resolved: usize,
}

/// Field holding a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    EType,
    SuperTypes,
    Opposite,
    Keys,
    Exceptions,
    Classifier,
    TypeParameter,
    FactoryInstance,
    References,
}

#[derive(Debug, Clone, Copy)]
struct Patch {
    element: ElementId,
    slot: Slot,
    index: usize,
    target: ElementId,
}

/// Patches collected by a pass
#[derive(Debug, Default)]
struct Plan {
    patches: Vec<Patch>,
    already_resolved: usize,
}

/// Resolve every symbolic link in the package tree rooted at `root`.
///
/// `peers` are other root packages in the same model. Qualified references
/// (`prefix:Kind uri#//Name`) look for the prefix among the open packages,
/// innermost first, then among the peers and their subpackages.
#[instrument(skip_all, fields(root = %root))]
pub fn resolve(model: &mut Model, root: ElementId, peers: &[ElementId]) -> Result<ResolveStats> {
    if model.kind(root) != ElementKind::Package {
        return Err(EcoreError::KindMismatch {
            expected: "EPackage".to_string(),
            found: model.kind(root).to_string(),
        });
    }

    let mut plan = Plan::default();
    let mut resolver = Resolver {
        open: Vec::new(),
        peers,
    };
    visit::accept(&mut resolver, model, root, &mut plan)?;

    let stats = ResolveStats {
        resolved: plan.patches.len(),
        already_resolved: plan.already_resolved,
    };
    for patch in plan.patches {
        apply(model, patch);
    }
    mark_resolved(model, root);

    debug!(
        package = %model.name(root),
        resolved = stats.resolved,
        already_resolved = stats.already_resolved,
        "resolved package"
    );
    Ok(stats)
}

fn slot_mut(model: &mut Model, patch: Patch) -> Option<&mut Link> {
    let element = model.get_mut(patch.element);
    match patch.slot {
        Slot::EType => element.typed_mut()?.e_type.as_mut(),
        Slot::SuperTypes => element.as_class_mut()?.super_types.get_mut(patch.index),
        Slot::Opposite => element.as_reference_mut()?.opposite.as_mut(),
        Slot::Keys => element.as_reference_mut()?.keys.get_mut(patch.index),
        Slot::Exceptions => element.as_operation_mut()?.exceptions.get_mut(patch.index),
        Slot::Classifier => element.as_generic_type_mut()?.classifier.as_mut(),
        Slot::TypeParameter => element.as_generic_type_mut()?.type_parameter.as_mut(),
        Slot::FactoryInstance => element.as_package_mut()?.factory_instance.as_mut(),
        Slot::References => element.as_annotation_mut()?.references.get_mut(patch.index),
    }
}

fn apply(model: &mut Model, patch: Patch) {
    if let Some(link) = slot_mut(model, patch) {
        *link = Link::Resolved(patch.target);
    }
}

fn mark_resolved(model: &mut Model, package: ElementId) {
    let subpackages: Vec<ElementId> = match model.get_mut(package).as_package_mut() {
        Some(p) => {
            p.resolved = true;
            p.subpackages.values().copied().collect()
        }
        None => return,
    };
    for sub in subpackages {
        mark_resolved(model, sub);
    }
}

// =============================================================================
// Traversal
// =============================================================================

struct Resolver<'p> {
    /// Packages entered so far, innermost last
    open: Vec<ElementId>,
    peers: &'p [ElementId],
}

impl Resolver<'_> {
    fn link(
        &self,
        model: &Model,
        plan: &mut Plan,
        element: ElementId,
        slot: Slot,
        index: usize,
        link: &Link,
    ) -> Result<()> {
        match link {
            Link::Resolved(_) => {
                plan.already_resolved += 1;
                Ok(())
            }
            Link::Symbolic(uri) => {
                let target = self.resolve_uri(model, uri).map_err(|e| match e {
                    EcoreError::UnresolvableReference { uri, element: None } => {
                        EcoreError::unresolvable(uri, Some(model.qualified_name(element)))
                    }
                    other => other,
                })?;
                trace!(uri = %uri, target = %model.qualified_name(target), "resolved link");
                plan.patches.push(Patch {
                    element,
                    slot,
                    index,
                    target,
                });
                Ok(())
            }
        }
    }

    fn links(
        &self,
        model: &Model,
        plan: &mut Plan,
        element: ElementId,
        slot: Slot,
        links: &[Link],
    ) -> Result<()> {
        for (index, link) in links.iter().enumerate() {
            self.link(model, plan, element, slot, index, link)?;
        }
        Ok(())
    }

    /// Target of one symbolic reference
    fn resolve_uri(&self, model: &Model, uri: &str) -> Result<ElementId> {
        match SymbolicUri::parse(uri) {
            Some(SymbolicUri::Local { path }) => {
                let package = self
                    .open
                    .last()
                    .copied()
                    .ok_or_else(|| EcoreError::unresolvable(uri, None))?;
                resolve_path(model, package, &path)
                    .ok_or_else(|| EcoreError::unresolvable(uri, None))
            }
            Some(SymbolicUri::Qualified { prefix, kind, path, .. }) => {
                let package = self
                    .find_package(model, prefix)
                    .ok_or_else(|| EcoreError::MissingPackage {
                        prefix: prefix.to_string(),
                        uri: uri.to_string(),
                    })?;
                let target = resolve_path(model, package, &path)
                    .ok_or_else(|| EcoreError::unresolvable(uri, None))?;
                if model.kind(target).conforms_to(kind) {
                    Ok(target)
                } else {
                    Err(EcoreError::unresolvable(uri, None))
                }
            }
            None => Err(EcoreError::unresolvable(uri, None)),
        }
    }

    fn find_package(&self, model: &Model, prefix: &str) -> Option<ElementId> {
        let has_prefix = |id: &ElementId| {
            model
                .package(*id)
                .and_then(|p| p.ns_prefix.as_deref())
                .map(|p| p == prefix)
                .unwrap_or(false)
        };
        if let Some(open) = self.open.iter().rev().find(|id| has_prefix(id)) {
            return Some(*open);
        }
        let mut pending: Vec<ElementId> = self.peers.iter().rev().copied().collect();
        while let Some(candidate) = pending.pop() {
            if has_prefix(&candidate) {
                return Some(candidate);
            }
            if let Some(p) = model.package(candidate) {
                pending.extend(p.subpackages.values().rev().copied());
            }
        }
        None
    }
}

/// Walk a fragment path from `package`
fn resolve_path(model: &Model, package: ElementId, path: &[&str]) -> Option<ElementId> {
    let mut scope = package;
    for segment in path {
        scope = resolve_segment(model, scope, segment)?;
    }
    Some(scope)
}

fn find_named(model: &Model, ids: &[ElementId], name: &str) -> Option<ElementId> {
    ids.iter().copied().find(|&id| model.name(id) == name)
}

fn resolve_segment(model: &Model, scope: ElementId, segment: &str) -> Option<ElementId> {
    let element = model.get(scope);
    if let Some(package) = element.as_package() {
        return package
            .classes
            .get(segment)
            .or_else(|| package.data_types.get(segment))
            .or_else(|| package.subpackages.get(segment))
            .copied();
    }
    if let Some(class) = element.as_class() {
        return find_named(model, &class.attributes, segment)
            .or_else(|| find_named(model, &class.references, segment))
            .or_else(|| find_named(model, &class.operations, segment))
            .or_else(|| find_named(model, &class.classifier.type_parameters, segment));
    }
    if let Some(en) = element.as_enum() {
        return find_named(model, &en.literals, segment);
    }
    if let Some(op) = element.as_operation() {
        return find_named(model, &op.parameters, segment)
            .or_else(|| find_named(model, &op.type_parameters, segment));
    }
    element
        .classifier()
        .and_then(|c| find_named(model, &c.type_parameters, segment))
}

impl Acceptor<Plan> for Resolver<'_> {
    const RECURSE: bool = true;

    fn accept_package(&mut self, model: &Model, id: ElementId, plan: &mut Plan) -> Result<()> {
        self.open.push(id);
        let result = visit::walk_package(self, model, id, plan).and_then(|_| {
            match model.package(id).and_then(|p| p.factory_instance.as_ref()) {
                Some(link) => self.link(model, plan, id, Slot::FactoryInstance, 0, link),
                None => Ok(()),
            }
        });
        self.open.pop();
        result
    }

    fn accept_class(&mut self, model: &Model, id: ElementId, plan: &mut Plan) -> Result<()> {
        visit::walk_class(self, model, id, plan)?;
        let Some(class) = model.class(id) else {
            return Ok(());
        };
        let start = plan.patches.len();
        self.links(model, plan, id, Slot::SuperTypes, &class.super_types)?;
        // supertypes must name classes, whatever the fragment reached
        let misfit = plan.patches[start..]
            .iter()
            .find(|patch| model.kind(patch.target) != ElementKind::Class);
        if let Some(patch) = misfit {
            let uri = class.super_types[patch.index].uri().unwrap_or_default();
            return Err(EcoreError::unresolvable(uri, Some(model.qualified_name(id))));
        }
        Ok(())
    }

    fn accept_typed_element(
        &mut self,
        model: &Model,
        id: ElementId,
        plan: &mut Plan,
    ) -> Result<()> {
        visit::walk_typed_element(self, model, id, plan)?;
        if let Some(link) = model.get(id).typed().and_then(|t| t.e_type.as_ref()) {
            self.link(model, plan, id, Slot::EType, 0, link)?;
        }
        Ok(())
    }

    fn accept_reference(&mut self, model: &Model, id: ElementId, plan: &mut Plan) -> Result<()> {
        visit::walk_reference(self, model, id, plan)?;
        if let Some(reference) = model.get(id).as_reference() {
            if let Some(link) = &reference.opposite {
                self.link(model, plan, id, Slot::Opposite, 0, link)?;
            }
            self.links(model, plan, id, Slot::Keys, &reference.keys)?;
        }
        Ok(())
    }

    fn accept_operation(&mut self, model: &Model, id: ElementId, plan: &mut Plan) -> Result<()> {
        visit::walk_operation(self, model, id, plan)?;
        if let Some(op) = model.get(id).as_operation() {
            self.links(model, plan, id, Slot::Exceptions, &op.exceptions)?;
        }
        Ok(())
    }

    fn accept_annotation(&mut self, model: &Model, id: ElementId, plan: &mut Plan) -> Result<()> {
        visit::walk_annotation(self, model, id, plan)?;
        if let Some(annotation) = model.get(id).as_annotation() {
            self.links(model, plan, id, Slot::References, &annotation.references)?;
        }
        Ok(())
    }

    fn accept_generic_type(&mut self, model: &Model, id: ElementId, plan: &mut Plan) -> Result<()> {
        visit::walk_generic_type(self, model, id, plan)?;
        if let Some(generic) = model.get(id).as_generic_type() {
            if let Some(link) = &generic.classifier {
                self.link(model, plan, id, Slot::Classifier, 0, link)?;
            }
            if let Some(link) = &generic.type_parameter {
                self.link(model, plan, id, Slot::TypeParameter, 0, link)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        model: Model,
        p: ElementId,
        a: ElementId,
        foo: ElementId,
    }

    /// Package `p` with class `A { foo }`
    fn fixture() -> Fixture {
        let mut model = Model::new();
        let p = model.create_named(ElementKind::Package, "p");
        model.get_mut(p).as_package_mut().unwrap().ns_prefix = Some("p".into());
        let a = model.create_named(ElementKind::Class, "A");
        model.add_class(p, a).unwrap();
        let foo = model.create_named(ElementKind::Attribute, "foo");
        model.add_attribute(a, foo).unwrap();
        Fixture { model, p, a, foo }
    }

    fn add_reference(model: &mut Model, class: ElementId, name: &str, e_type: &str) -> ElementId {
        let r = model.create_named(ElementKind::Reference, name);
        model.add_reference(class, r).unwrap();
        model.get_mut(r).typed_mut().unwrap().e_type = Some(Link::symbolic(e_type));
        r
    }

    #[test]
    fn test_local_member_fragment() {
        let Fixture { mut model, p, a, foo } = fixture();
        let r = add_reference(&mut model, a, "self_ref", "#//A");
        model.get_mut(r).as_reference_mut().unwrap().opposite = Some(Link::symbolic("#//A/foo"));

        let stats = resolve(&mut model, p, &[]).unwrap();
        assert_eq!(stats.resolved, 2);
        let reference = model.get(r).as_reference().unwrap();
        assert_eq!(reference.opposite, Some(Link::Resolved(foo)));
        assert_eq!(reference.feature.typed.e_type, Some(Link::Resolved(a)));
        assert!(model.is_resolved(p));
    }

    #[test]
    fn test_missing_member_fails() {
        let Fixture { mut model, p, a, .. } = fixture();
        add_reference(&mut model, a, "broken", "#//A/bar");

        let err = resolve(&mut model, p, &[]).unwrap_err();
        match err {
            EcoreError::UnresolvableReference { uri, element } => {
                assert_eq!(uri, "#//A/bar");
                assert_eq!(element.as_deref(), Some("p.A.broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failed_pass_leaves_model_unchanged() {
        let Fixture { mut model, p, a, .. } = fixture();
        let good = add_reference(&mut model, a, "good", "#//A");
        add_reference(&mut model, a, "bad", "#//Nope");

        assert!(resolve(&mut model, p, &[]).is_err());
        assert_eq!(
            model.get(good).typed().unwrap().e_type,
            Some(Link::symbolic("#//A"))
        );
        assert!(!model.is_resolved(p));
    }

    #[test]
    fn test_qualified_against_peer() {
        let Fixture { mut model, p, a, .. } = fixture();
        let q = model.create_named(ElementKind::Package, "q");
        model.get_mut(q).as_package_mut().unwrap().ns_prefix = Some("q".into());
        let r = add_reference(&mut model, a, "other", "q:EClass http://example/q#//X");

        let err = resolve(&mut model, p, &[q]).unwrap_err();
        assert!(matches!(err, EcoreError::UnresolvableReference { .. }));

        let x = model.create_named(ElementKind::Class, "X");
        model.add_class(q, x).unwrap();
        resolve(&mut model, p, &[q]).unwrap();
        assert_eq!(model.get(r).typed().unwrap().e_type, Some(Link::Resolved(x)));
        // peers are read, never resolved
        assert!(!model.is_resolved(q));
    }

    #[test]
    fn test_missing_prefix() {
        let Fixture { mut model, p, a, .. } = fixture();
        add_reference(&mut model, a, "other", "z:EClass http://example/z#//X");

        let err = resolve(&mut model, p, &[]).unwrap_err();
        assert!(matches!(err, EcoreError::MissingPackage { prefix, .. } if prefix == "z"));
    }

    #[test]
    fn test_qualified_kind_is_checked() {
        let Fixture { mut model, p, a, .. } = fixture();
        add_reference(&mut model, a, "wrong", "p:EDataType http://example/p#//A");

        let err = resolve(&mut model, p, &[]).unwrap_err();
        assert!(matches!(err, EcoreError::UnresolvableReference { .. }));
    }

    #[test]
    fn test_supertype_must_be_class() {
        let Fixture { mut model, p, .. } = fixture();
        let money = model.create_named(ElementKind::DataType, "Money");
        model.add_data_type(p, money).unwrap();
        let b = model.create_named(ElementKind::Class, "B");
        model.add_class(p, b).unwrap();
        model.get_mut(b).as_class_mut().unwrap().super_types = vec![Link::symbolic("#//Money")];

        let err = resolve(&mut model, p, &[]).unwrap_err();
        match err {
            EcoreError::UnresolvableReference { uri, element } => {
                assert_eq!(uri, "#//Money");
                assert_eq!(element.as_deref(), Some("p.B"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            model.class(b).unwrap().super_types,
            vec![Link::symbolic("#//Money")]
        );
        assert!(!model.is_resolved(p));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let Fixture { mut model, p, a, .. } = fixture();
        let b = model.create_named(ElementKind::Class, "B");
        model.add_class(p, b).unwrap();
        model.get_mut(b).as_class_mut().unwrap().super_types = vec![Link::symbolic("#//A")];

        let first = resolve(&mut model, p, &[]).unwrap();
        let snapshot = serde_json::to_value(&model).unwrap();
        let second = resolve(&mut model, p, &[]).unwrap();

        assert_eq!(first.resolved, 1);
        assert_eq!(second.resolved, 0);
        assert_eq!(second.already_resolved, 1);
        assert_eq!(serde_json::to_value(&model).unwrap(), snapshot);
        assert_eq!(model.super_types(b).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_nested_package_scope() {
        let Fixture { mut model, p, .. } = fixture();
        let inner = model.create_named(ElementKind::Package, "inner");
        model.add_subpackage(p, inner).unwrap();
        let y = model.create_named(ElementKind::Class, "Y");
        model.add_class(inner, y).unwrap();
        let z = model.create_named(ElementKind::Class, "Z");
        model.add_class(inner, z).unwrap();
        model.get_mut(z).as_class_mut().unwrap().super_types = vec![Link::symbolic("#//Y")];

        resolve(&mut model, p, &[]).unwrap();
        assert_eq!(model.super_types(z).collect::<Vec<_>>(), vec![y]);
        assert!(model.is_resolved(inner));
    }
}
