//! Model Linting
//!
//! Structural checks over a package tree that the builder does not enforce:
//!
//! ## Errors
//! 1. **missing-name**: named elements without a name
//! 2. **negative-lower-bound** / **upper-below-lower**: impossible multiplicities
//! 3. **attribute-typed-by-class** / **reference-typed-by-non-class**
//! 4. **supertype-not-class** / **opposite-not-reference**
//! 5. **containment-both-ends**: both sides of an opposite pair contain the other
//! 6. **inheritance-cycle**: supertype links that loop back (SCC over the class graph)
//!
//! ## Warnings
//! - **opposite-mismatch**: `a.opposite == b` but `b.opposite != a`
//! - **unresolved-link**: a link still in symbolic form
//! - **redeclared-feature**: a feature named like one an ancestor declares

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::error::Result;
use crate::model::{ElementId, ElementKind, Link, Model};
use crate::visit::{self, Acceptor};

/// Result of linting a package tree
#[derive(Debug, Default)]
pub struct LintResult {
    pub package: String,
    pub errors: Vec<LintError>,
    pub warnings: Vec<LintWarning>,
}

impl LintResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    fn error(&mut self, code: &'static str, message: String, path: String) {
        self.errors.push(LintError { code, message, path });
    }

    fn warning(&mut self, code: &'static str, message: String, path: String) {
        self.warnings.push(LintWarning { code, message, path });
    }
}

#[derive(Debug)]
pub struct LintError {
    pub code: &'static str,
    pub message: String,
    pub path: String,
}

#[derive(Debug)]
pub struct LintWarning {
    pub code: &'static str,
    pub message: String,
    pub path: String,
}

/// The model linter
#[derive(Debug, Default)]
pub struct ModelLinter {
    /// Classes met during traversal, for the cycle check
    classes: Vec<ElementId>,
}

impl ModelLinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lint the package tree rooted at `package`
    pub fn lint(&mut self, model: &Model, package: ElementId) -> Result<LintResult> {
        self.classes.clear();
        let mut result = LintResult {
            package: model.qualified_name(package),
            ..Default::default()
        };
        visit::accept(self, model, package, &mut result)?;
        self.check_cycles(model, &mut result);
        Ok(result)
    }

    fn unresolved(model: &Model, id: ElementId, what: &str, link: &Link, result: &mut LintResult) {
        if let Link::Symbolic(uri) = link {
            result.warning(
                "unresolved-link",
                format!("{} still refers to '{}'", what, uri),
                model.qualified_name(id),
            );
        }
    }

    /// Features whose name is already declared by an ancestor
    fn check_redeclared(model: &Model, class: ElementId, result: &mut LintResult) {
        let Some(own) = model.class(class) else {
            return;
        };
        let inherited: HashMap<&str, ElementId> = model
            .ancestors(class)
            .into_iter()
            .filter_map(|a| model.class(a))
            .flat_map(|a| a.attributes.iter().chain(&a.references).copied())
            .map(|f| (model.name(f), f))
            .collect();
        for &feature in own.attributes.iter().chain(&own.references) {
            if let Some(&original) = inherited.get(model.name(feature)) {
                result.warning(
                    "redeclared-feature",
                    format!("Redeclares inherited feature {}", model.qualified_name(original)),
                    model.qualified_name(feature),
                );
            }
        }
    }

    fn check_cycles(&self, model: &Model, result: &mut LintResult) {
        let mut graph: DiGraph<ElementId, ()> = DiGraph::new();
        let mut nodes: HashMap<ElementId, NodeIndex> = HashMap::new();
        let mut node = |graph: &mut DiGraph<ElementId, ()>, id: ElementId| {
            *nodes.entry(id).or_insert_with(|| graph.add_node(id))
        };

        for &class in &self.classes {
            let from = node(&mut graph, class);
            for super_type in model.super_types(class) {
                if model.kind(super_type) == ElementKind::Class {
                    let to = node(&mut graph, super_type);
                    graph.add_edge(from, to, ());
                }
            }
        }

        for scc in kosaraju_scc(&graph) {
            let looped = scc.len() > 1 || graph.contains_edge(scc[0], scc[0]);
            if !looped {
                continue;
            }
            let mut members: Vec<ElementId> = scc.iter().map(|&n| graph[n]).collect();
            members.sort();
            let names: Vec<String> = members.iter().map(|&c| model.qualified_name(c)).collect();
            result.error(
                "inheritance-cycle",
                format!("Inheritance cycle through {}", names.join(", ")),
                names[0].clone(),
            );
        }
    }
}

impl Acceptor<LintResult> for ModelLinter {
    const RECURSE: bool = true;

    fn accept_named_element(
        &mut self,
        model: &Model,
        id: ElementId,
        result: &mut LintResult,
    ) -> Result<()> {
        if model.get(id).name.as_deref().map_or(true, str::is_empty) {
            result.error(
                "missing-name",
                format!("{} has no name", model.kind(id)),
                model.qualified_name(id),
            );
        }
        visit::walk_named_element(self, model, id, result)
    }

    fn accept_typed_element(
        &mut self,
        model: &Model,
        id: ElementId,
        result: &mut LintResult,
    ) -> Result<()> {
        if let Some(typed) = model.get(id).typed() {
            if typed.lower_bound < 0 {
                result.error(
                    "negative-lower-bound",
                    format!("Lower bound {} is negative", typed.lower_bound),
                    model.qualified_name(id),
                );
            }
            if typed.upper_bound >= 0 && typed.upper_bound < typed.lower_bound {
                result.error(
                    "upper-below-lower",
                    format!(
                        "Upper bound {} is below lower bound {}",
                        typed.upper_bound, typed.lower_bound
                    ),
                    model.qualified_name(id),
                );
            }
            if let Some(link) = &typed.e_type {
                Self::unresolved(model, id, "Type", link, result);
            }
        }
        visit::walk_typed_element(self, model, id, result)
    }

    fn accept_attribute(
        &mut self,
        model: &Model,
        id: ElementId,
        result: &mut LintResult,
    ) -> Result<()> {
        let target = model.get(id).typed().and_then(|t| t.e_type.as_ref()).and_then(Link::target);
        if let Some(target) = target {
            if model.kind(target) == ElementKind::Class {
                result.error(
                    "attribute-typed-by-class",
                    format!("Attribute is typed by class '{}'", model.name(target)),
                    model.qualified_name(id),
                );
            }
        }
        visit::walk_attribute(self, model, id, result)
    }

    fn accept_reference(
        &mut self,
        model: &Model,
        id: ElementId,
        result: &mut LintResult,
    ) -> Result<()> {
        if let Some(reference) = model.get(id).as_reference() {
            if let Some(target) = reference.feature.typed.e_type.as_ref().and_then(Link::target) {
                if model.kind(target) != ElementKind::Class {
                    result.error(
                        "reference-typed-by-non-class",
                        format!(
                            "Reference is typed by {} '{}'",
                            model.kind(target),
                            model.name(target)
                        ),
                        model.qualified_name(id),
                    );
                }
            }

            match &reference.opposite {
                Some(Link::Resolved(opposite)) => match model.get(*opposite).as_reference() {
                    None => result.error(
                        "opposite-not-reference",
                        format!(
                            "Opposite is {} '{}'",
                            model.kind(*opposite),
                            model.name(*opposite)
                        ),
                        model.qualified_name(id),
                    ),
                    Some(other) => {
                        if other.opposite.as_ref().and_then(Link::target) != Some(id) {
                            result.warning(
                                "opposite-mismatch",
                                format!(
                                    "Opposite '{}' does not point back",
                                    model.qualified_name(*opposite)
                                ),
                                model.qualified_name(id),
                            );
                        }
                        // reported once per pair
                        if reference.containment && other.containment && id < *opposite {
                            result.error(
                                "containment-both-ends",
                                format!(
                                    "Both '{}' and its opposite are containments",
                                    model.name(id)
                                ),
                                model.qualified_name(id),
                            );
                        }
                    }
                },
                Some(link) => Self::unresolved(model, id, "Opposite", link, result),
                None => {}
            }
        }
        visit::walk_reference(self, model, id, result)
    }

    fn accept_class(
        &mut self,
        model: &Model,
        id: ElementId,
        result: &mut LintResult,
    ) -> Result<()> {
        self.classes.push(id);
        if let Some(class) = model.class(id) {
            for link in &class.super_types {
                match link {
                    Link::Resolved(super_type) if model.kind(*super_type) != ElementKind::Class => {
                        result.error(
                            "supertype-not-class",
                            format!(
                                "Supertype is {} '{}'",
                                model.kind(*super_type),
                                model.name(*super_type)
                            ),
                            model.qualified_name(id),
                        );
                    }
                    Link::Resolved(_) => {}
                    Link::Symbolic(_) => Self::unresolved(model, id, "Supertype", link, result),
                }
            }
            Self::check_redeclared(model, id, result);
        }
        visit::walk_class(self, model, id, result)
    }
}
