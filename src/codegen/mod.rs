//! Code Generation
//!
//! Generates Rust source from a resolved package tree.
//!
//! Architecture:
//! - `config`: naming, type mapping and output settings
//! - `names`: identifier normalization (snake_case, PascalCase, keyword escaping)
//! - `types`: `TypeMapper` classifying typed elements and materializing defaults
//! - `model_string`: `// @model` summaries of elements
//! - `interface`: enums and one trait per class
//! - `implementation`: `<Name>Impl` structs for concrete classes
//!
//! Every package becomes a `pub mod` holding its interfaces, then its
//! implementations, then its subpackages. Generators only read resolved
//! links; reaching a symbolic one is a contract violation and panics.

pub mod config;
pub mod implementation;
pub mod interface;
pub mod model_string;
pub mod names;
pub mod types;

pub use config::{
    CodegenConfig, DataTypeMapping, EmitConfig, NamingConfig, ScalarKind, TypeMappings,
};
pub use implementation::ImplementationGenerator;
pub use interface::InterfaceGenerator;
pub use model_string::ModelString;
pub use names::Names;
pub use types::{FieldType, TypeDesignation, TypeMapper};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{EcoreError, Result};
use crate::model::{ElementId, ElementKind, Model};
use crate::visit::{self, Acceptor};

// =============================================================================
// Generated Output
// =============================================================================

/// Output from code generation
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedOutput {
    /// Generated code as a string
    pub code: String,
    /// Number of enums, traits and structs generated
    pub type_count: usize,
}

// =============================================================================
// Package Driver
// =============================================================================

/// Writes one `pub mod` per package and drives the item generators
struct RustGenerator<'c> {
    config: &'c CodegenConfig,
    names: Names,
    type_count: usize,
}

fn indent(block: &str) -> String {
    let mut out = String::with_capacity(block.len() + block.len() / 8);
    for line in block.lines() {
        if !line.is_empty() {
            out.push_str("    ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

impl Acceptor<String> for RustGenerator<'_> {
    fn accept_package(&mut self, model: &Model, id: ElementId, out: &mut String) -> Result<()> {
        let config = self.config;
        let mut mapper = TypeMapper::new(model, &config.types, &config.naming.keyword_escape);
        mapper.set_current(id);

        let mut body = String::new();
        body.push_str("#![allow(dead_code, unused_imports, unused_variables)]\n\n");
        body.push_str("use std::any::Any;\n");
        body.push_str("use std::collections::HashMap;\n");
        body.push_str("use std::rc::Rc;\n");

        if config.emit.interfaces {
            let mut interfaces = InterfaceGenerator::new(&mapper, &mut self.names, config);
            visit::accept(&mut interfaces, model, id, &mut body)?;
            self.type_count += interfaces.type_count;
        }
        if config.emit.implementations {
            let mut implementations =
                ImplementationGenerator::new(&mapper, &mut self.names, config);
            visit::accept(&mut implementations, model, id, &mut body)?;
            self.type_count += implementations.type_count;
        }

        let subpackages: Vec<ElementId> = model
            .package(id)
            .map(|p| p.subpackages.values().copied().collect())
            .unwrap_or_default();
        for sub in subpackages {
            body.push('\n');
            visit::accept(self, model, sub, &mut body)?;
        }

        if config.emit.model_comments {
            out.push_str(&format!("// @model {}\n", ModelString::render(model, id)?));
        }
        out.push_str(&format!("pub mod {} {{\n", self.names.module(model.name(id))));
        out.push_str(&indent(&body));
        out.push_str("}\n");

        debug!(package = %model.qualified_name(id), "generated package");
        Ok(())
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Generate Rust code for the package tree rooted at `root`.
///
/// # Panics
/// When `root` has not been through resolution.
#[instrument(skip_all, fields(root = %root))]
pub fn generate_rust(
    model: &Model,
    root: ElementId,
    config: &CodegenConfig,
) -> Result<GeneratedOutput> {
    if model.kind(root) != ElementKind::Package {
        return Err(EcoreError::KindMismatch {
            expected: ElementKind::Package.to_string(),
            found: model.kind(root).to_string(),
        });
    }
    assert!(
        model.is_resolved(root),
        "package '{}' must be resolved before code generation",
        model.qualified_name(root)
    );

    let mut generator = RustGenerator {
        config,
        names: Names::new(config.naming.clone()),
        type_count: 0,
    };

    let mut code = String::new();
    code.push_str("//! Generated from Ecore models - DO NOT EDIT\n\n");
    visit::accept(&mut generator, model, root, &mut code)?;

    Ok(GeneratedOutput {
        code,
        type_count: generator.type_count,
    })
}
