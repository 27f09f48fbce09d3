//! Ecore Schema Toolkit
//!
//! Reads Ecore metamodels (`.ecore` documents), links their cross references
//! and generates Rust interfaces and implementations from them.
//!
//! ## Features
//!
//! - **Arena Model**: packages, classifiers, features and operations addressed by `ElementId`
//! - **Acceptor Traversal**: kind-dispatched handlers with Ecore supertype fallback
//! - **Event Builder**: format-independent start/end events, with a quick-xml adapter
//! - **Two-Phase Resolution**: symbolic URIs resolved against open packages and peers
//! - **Linting**: multiplicity, typing and inheritance-cycle checks
//! - **Code Generation**: traits, enums and `<Name>Impl` structs in class order
//!
//! ## Architecture
//!
//! ```text
//! .ecore ──xml──▶ Event stream ──Builder──▶ Model (symbolic links)
//!                                             │
//!                                        resolver::resolve
//!                                             ▼
//!                                  Model (resolved) ──▶ lint
//!                                             │
//!                                    codegen::generate_rust
//!                                             ▼
//!                                         Rust source
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod lint;
pub mod loader;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod visit;

pub use codegen::{generate_rust, CodegenConfig, GeneratedOutput};
pub use config::ToolkitConfig;
pub use error::{EcoreError, Result};
pub use lint::{LintResult, ModelLinter};
pub use loader::{load_and_resolve, LoadConfig};
pub use model::{Element, ElementId, ElementKind, Link, Model};
pub use parser::{Builder, Event, ParserConfig};
pub use resolver::{resolve, ResolveStats};
pub use visit::Acceptor;
