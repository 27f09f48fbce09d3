//! End-to-end tests: parse, resolve, lint and generate

use std::path::PathBuf;

use ecore_schemas::codegen::{CodegenConfig, ModelString, ScalarKind, TypeDesignation, TypeMapper};
use ecore_schemas::loader::{self, LoadConfig};
use ecore_schemas::model::{ElementId, Link, Model};
use ecore_schemas::parser::{self, Builder, Event, ParserConfig};
use ecore_schemas::{generate_rust, resolve, ModelLinter};

const FOO: &str = include_str!("fixtures/foo.ecore");

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_foo() -> (Model, ElementId) {
    let mut model = Model::new();
    let root = loader::load_str(&mut model, FOO, &ParserConfig::default()).unwrap();
    loader::resolve_all(&mut model, &[root]).unwrap();
    (model, root)
}

fn class(model: &Model, package: ElementId, name: &str) -> ElementId {
    model.package(package).unwrap().classes[name]
}

fn feature(model: &Model, class: ElementId, name: &str) -> ElementId {
    model
        .all_features(class)
        .into_iter()
        .find(|&f| model.name(f) == name)
        .unwrap()
}

/// The same document as `foo.ecore`, written as builder events
fn foo_events() -> Vec<Event> {
    const ESTRING: &str = "ecore:EDataType http://www.eclipse.org/emf/2002/Ecore#//EString";
    const EINT: &str = "ecore:EDataType http://www.eclipse.org/emf/2002/Ecore#//EInt";
    vec![
        Event::start(
            "EPackage",
            [("name", "Foo"), ("nsURI", "http://foo.bar/foo"), ("nsPrefix", "foo")],
        ),
        Event::start(
            "eClassifiers",
            [("xsi:type", "ecore:EClass"), ("name", "B"), ("eSuperTypes", "#//A")],
        ),
        Event::start(
            "eStructuralFeatures",
            [
                ("xsi:type", "ecore:EAttribute"),
                ("name", "name"),
                ("lowerBound", "1"),
                ("eType", ESTRING),
            ],
        ),
        Event::end(),
        Event::start(
            "eStructuralFeatures",
            [
                ("xsi:type", "ecore:EReference"),
                ("name", "owner"),
                ("lowerBound", "1"),
                ("eType", "#//A"),
                ("containment", "true"),
            ],
        ),
        Event::end(),
        Event::end(),
        Event::start(
            "eClassifiers",
            [("xsi:type", "ecore:EClass"), ("name", "A"), ("abstract", "true")],
        ),
        Event::start(
            "eStructuralFeatures",
            [("xsi:type", "ecore:EAttribute"), ("name", "intAttr"), ("eType", EINT)],
        ),
        Event::end(),
        Event::end(),
        Event::end(),
    ]
}

// =============================================================================
// Foo Scenario
// =============================================================================

#[test]
fn test_foo_class_order_and_supertype() {
    let (model, root) = load_foo();
    assert_eq!(model.name(root), "Foo");
    assert_eq!(
        model.package(root).unwrap().ns_uri.as_deref(),
        Some("http://foo.bar/foo")
    );

    let a = class(&model, root, "A");
    let b = class(&model, root, "B");
    assert_eq!(model.sorted_classes(root), vec![a, b]);
    assert_eq!(model.class(b).unwrap().super_types, vec![Link::Resolved(a)]);
    assert!(model.class(a).unwrap().is_abstract);
}

#[test]
fn test_foo_feature_types() {
    let (model, root) = load_foo();
    let a = class(&model, root, "A");
    let b = class(&model, root, "B");
    let config = CodegenConfig::default();
    let mut mapper = TypeMapper::new(&model, &config.types, &config.naming.keyword_escape);
    mapper.set_current(root);

    let int_attr = feature(&model, a, "intAttr");
    assert!(matches!(
        mapper.map(int_attr),
        TypeDesignation::Scalar { ref rust, kind } if rust == "i32" && kind == ScalarKind::Integer
    ));
    assert!(model.get(int_attr).feature().unwrap().default_value_literal.is_none());

    let name = feature(&model, b, "name");
    assert_eq!(model.get(name).typed().unwrap().lower_bound, 1);
    assert!(matches!(
        mapper.map(name),
        TypeDesignation::Scalar { ref rust, .. } if rust == "String"
    ));

    let owner = feature(&model, b, "owner");
    let reference = model.get(owner).as_reference().unwrap();
    assert!(reference.containment);
    assert!(!reference.feature.typed.is_many());
    assert_eq!(reference.feature.typed.e_type, Some(Link::Resolved(a)));
    assert_eq!(mapper.map(owner), TypeDesignation::Class { path: "A".to_string() });
    assert_eq!(
        ModelString::render(&model, owner).unwrap(),
        "EReference[A] owner (bounds=[1,1], containment)"
    );
}

#[test]
fn test_foo_generated_code() {
    let (model, root) = load_foo();
    let output = generate_rust(&model, root, &CodegenConfig::default()).unwrap();
    let code = &output.code;

    assert!(code.contains("// @model EPackage[Foo] (ns_uri='http://foo.bar/foo', ns_prefix=foo)\npub mod foo {\n"));
    let a = code.find("    pub trait A {\n").unwrap();
    let b = code.find("    pub trait B: A {\n").unwrap();
    assert!(a < b);
    assert!(code.contains("        fn int_attr(&self) -> i32;\n"));
    assert!(code.contains("        fn name(&self) -> Option<&String>;\n"));
    assert!(code.contains("        fn owner(&self) -> Option<&Rc<dyn A>>;\n"));

    assert!(!code.contains("AImpl"));
    assert!(code.contains(
        "    pub struct BImpl {\n        int_attr: i32,\n        name: Option<String>,\n        owner: Option<Rc<dyn A>>,\n    }\n"
    ));
    assert!(code.contains("    impl A for BImpl {\n"));
    assert!(code.contains("    impl B for BImpl {\n"));
    // traits A and B, struct BImpl
    assert_eq!(output.type_count, 3);
}

#[test]
fn test_foo_lints_clean() {
    let (model, root) = load_foo();
    let result = ModelLinter::new().lint(&model, root).unwrap();
    assert!(result.is_clean(), "{:?}", result.errors);
    assert!(!result.has_warnings(), "{:?}", result.warnings);
}

#[test]
fn test_xml_and_events_build_same_graph() {
    let mut from_xml = Model::new();
    parser::parse_str(&mut from_xml, FOO, &ParserConfig::default()).unwrap();

    let mut from_events = Model::new();
    Builder::build(&mut from_events, foo_events()).unwrap();

    assert_eq!(
        serde_json::to_value(&from_xml).unwrap(),
        serde_json::to_value(&from_events).unwrap()
    );
}

#[test]
fn test_resolution_is_idempotent() {
    let (mut model, root) = load_foo();
    let peers: Vec<ElementId> = model.roots().filter(|&r| r != root).collect();
    let before = serde_json::to_value(&model).unwrap();

    let stats = resolve(&mut model, root, &peers).unwrap();
    assert_eq!(stats.resolved, 0);
    assert_eq!(serde_json::to_value(&model).unwrap(), before);
}

// =============================================================================
// Cross-Package Scenario
// =============================================================================

#[test]
fn test_directory_resolves_cross_references() {
    let dir = fixtures_path().join("library");
    let (model, roots) =
        loader::load_and_resolve(&dir, &LoadConfig::default(), &ParserConfig::default()).unwrap();
    assert_eq!(roots.len(), 2);

    let library = roots[0];
    let people = roots[1];
    assert_eq!(model.name(library), "library");

    let book = class(&model, library, "Book");
    let person = class(&model, people, "Person");
    let authors = feature(&model, book, "authors");
    let books = feature(&model, person, "books");

    let reference = model.get(authors).as_reference().unwrap();
    assert_eq!(reference.feature.typed.e_type, Some(Link::Resolved(person)));
    assert_eq!(reference.opposite, Some(Link::Resolved(books)));

    let result = ModelLinter::new().lint(&model, library).unwrap();
    assert!(result.is_clean(), "{:?}", result.errors);
}

#[test]
fn test_cross_package_generation() {
    let dir = fixtures_path().join("library");
    let (model, roots) =
        loader::load_and_resolve(&dir, &LoadConfig::default(), &ParserConfig::default()).unwrap();
    let output = generate_rust(&model, roots[0], &CodegenConfig::default()).unwrap();
    let code = &output.code;

    assert!(code.contains("        NonFiction,\n"));
    assert!(code.contains("            Self::NonFiction => \"non-fiction\",\n"));
    assert!(code.contains("        fn authors(&self) -> &Vec<Rc<dyn crate::people::Person>>;\n"));
    assert!(code.contains("        fn genre(&self) -> Genre;\n"));
    assert!(code.contains("            genre: Genre::Fiction,\n"));
    assert!(code.contains("        pub fn add_author(&mut self, author: Rc<dyn crate::people::Person>) {\n"));
    // the isBorrowed operation coincides with the `borrowed` accessor
    assert_eq!(code.matches("fn is_borrowed(&self)").count(), 2);
    assert!(!code.contains("unimplemented!(\"Book::isBorrowed\")"));
}
