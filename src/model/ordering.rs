//! Class ordering
//!
//! Supertypes always sort before their subtypes. Unrelated classes are ordered
//! by the length of their longest supertype chain, then by name.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::{ElementId, ElementKind, Model};

impl Model {
    /// Whether `sub` is `class` or (transitively) one of its subtypes
    pub fn is_assignable(&self, class: ElementId, sub: ElementId) -> bool {
        if class == sub {
            return true;
        }
        let mut visited = HashSet::new();
        let mut pending = vec![sub];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            for parent in self.super_types(current) {
                if parent == class {
                    return true;
                }
                pending.push(parent);
            }
        }
        false
    }

    /// Length of the longest supertype chain ending at `class`; a root class is 1
    pub fn super_chain(&self, class: ElementId) -> usize {
        let mut on_path = HashSet::new();
        self.chain_depth(class, &mut on_path)
    }

    fn chain_depth(&self, class: ElementId, on_path: &mut HashSet<ElementId>) -> usize {
        if !on_path.insert(class) {
            // cycle: stop here
            return 0;
        }
        let deepest = self
            .super_types(class)
            .collect::<Vec<_>>()
            .into_iter()
            .map(|parent| self.chain_depth(parent, on_path))
            .max()
            .unwrap_or(0);
        on_path.remove(&class);
        deepest + 1
    }

    /// Total order over classes: supertypes first, then chain length, then name
    pub fn compare_classes(&self, a: ElementId, b: ElementId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        if self.is_assignable(a, b) {
            return Ordering::Less;
        }
        if self.is_assignable(b, a) {
            return Ordering::Greater;
        }
        self.super_chain(a)
            .cmp(&self.super_chain(b))
            .then_with(|| self.name(a).cmp(self.name(b)))
            .then_with(|| a.cmp(&b))
    }

    /// Classes of `package` in class order
    pub fn sorted_classes(&self, package: ElementId) -> Vec<ElementId> {
        let mut classes: Vec<ElementId> = self
            .package(package)
            .map(|p| p.classes.values().copied().collect())
            .unwrap_or_default();
        self.sort_classes(&mut classes);
        classes
    }

    /// Sort by chain length and name, which already keeps every supertype
    /// ahead of its subtypes in an acyclic hierarchy
    pub fn sort_classes(&self, classes: &mut [ElementId]) {
        let mut keyed: Vec<(usize, ElementId)> =
            classes.iter().map(|&c| (self.super_chain(c), c)).collect();
        keyed.sort_by(|(da, a), (db, b)| {
            da.cmp(db)
                .then_with(|| self.name(*a).cmp(self.name(*b)))
                .then_with(|| a.cmp(b))
        });
        for (slot, (_, class)) in classes.iter_mut().zip(keyed) {
            *slot = class;
        }
    }

    /// Every transitive supertype of `class`, in class order, excluding `class`
    pub fn ancestors(&self, class: ElementId) -> Vec<ElementId> {
        let mut seen = HashSet::new();
        let mut pending: Vec<ElementId> = self.super_types(class).collect();
        while let Some(current) = pending.pop() {
            if current != class && seen.insert(current) {
                pending.extend(self.super_types(current));
            }
        }
        let mut ancestors: Vec<ElementId> = seen.into_iter().collect();
        self.sort_classes(&mut ancestors);
        ancestors
    }

    /// Attributes and references of `class` and its ancestors, ancestor features first
    pub fn all_features(&self, class: ElementId) -> Vec<ElementId> {
        let mut owners = self.ancestors(class);
        owners.push(class);
        owners
            .into_iter()
            .filter(|&c| self.kind(c) == ElementKind::Class)
            .filter_map(|c| self.class(c))
            .flat_map(|c| c.attributes.iter().chain(c.references.iter()).copied())
            .collect()
    }
}
