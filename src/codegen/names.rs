//! Identifier Normalization
//!
//! Turns Ecore names (camelCase features, PascalCase classifiers, free-form
//! literals) into Rust identifiers:
//! - `underscore`: snake_case, collapsing runs of single letters (`nsURI` -> `ns_uri`)
//! - `method_name`: snake_case without a `get_`/`set_`/`is_` prefix
//! - `singular`: element name used by `add_*` adders
//! - `pascal_case`: enum variants
//! - `escape_keyword`: keyword-safe identifiers
//!
//! [`Names`] memoizes the conversions for one generation run.

use std::collections::HashMap;

use super::config::NamingConfig;

// =============================================================================
// Free Functions
// =============================================================================

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers
const NON_RAW: &[&str] = &["crate", "self", "Self", "super"];

pub fn is_keyword(ident: &str) -> bool {
    KEYWORDS.contains(&ident)
}

/// Prefix `ident` with `escape` when it is a keyword.
///
/// With the raw-identifier escape `r#`, keywords that cannot be raw get a
/// trailing underscore instead.
pub fn escape_keyword(ident: &str, escape: &str) -> String {
    if !is_keyword(ident) {
        ident.to_string()
    } else if escape == "r#" && NON_RAW.contains(&ident) {
        format!("{}_", ident)
    } else {
        format!("{}{}", escape, ident)
    }
}

/// Split at separators and before every uppercase letter, lowercasing
fn lower_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c == '_' || c == '-' || c == ' ' || c == '.' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(c.to_lowercase());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// snake_case form of a camelCase name.
///
/// Consecutive one-letter words merge, so acronyms stay whole:
/// `nsURI` -> `ns_uri`, `iD` -> `id`, `eIDAttribute` -> `eid_attribute`.
pub fn underscore(name: &str) -> String {
    let mut merged: Vec<String> = Vec::new();
    let mut run = String::new();
    for word in lower_words(name) {
        if word.chars().count() == 1 {
            run.push_str(&word);
        } else {
            if !run.is_empty() {
                merged.push(std::mem::take(&mut run));
            }
            merged.push(word);
        }
    }
    if !run.is_empty() {
        merged.push(run);
    }
    merged.join("_")
}

/// Method name for an operation: snake_case without accessor prefixes
pub fn method_name(name: &str) -> String {
    let snake = underscore(name);
    for prefix in ["get_", "set_", "is_"] {
        if let Some(rest) = snake.strip_prefix(prefix) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    snake
}

/// Singular form used to name the argument of an adder
pub fn singular(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{}y", stem);
        }
    }
    if name.ends_with("ss") {
        return name.to_string();
    }
    match name.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('_') => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Capitalize the first letter, lowercasing the rest when `shout` is set
fn capitalize(word: &str, shout: bool) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut result: String = first.to_uppercase().collect();
            if shout {
                result.extend(chars.flat_map(|c| c.to_lowercase()));
            } else {
                result.push_str(chars.as_str());
            }
            result
        }
    }
}

/// PascalCase form of `s` (`dark_red`, `DARK_RED` and `darkRed` all give `DarkRed`)
pub fn pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for chunk in s.split(|c: char| !c.is_alphanumeric()).filter(|c| !c.is_empty()) {
        let shout = !chunk.chars().any(|c| c.is_lowercase());
        result.push_str(&capitalize(chunk, shout));
    }
    if result.is_empty() {
        return "Value".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, 'V');
    }
    result
}

// =============================================================================
// Memoized Names
// =============================================================================

/// Cached identifier conversions for one generation run
#[derive(Debug, Clone)]
pub struct Names {
    naming: NamingConfig,
    attributes: HashMap<String, String>,
    methods: HashMap<String, String>,
}

impl Names {
    pub fn new(naming: NamingConfig) -> Self {
        Self {
            naming,
            attributes: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    fn escape(&self, ident: &str) -> String {
        escape_keyword(ident, &self.naming.keyword_escape)
    }

    /// Field, getter and parameter name for a feature or parameter
    pub fn attribute(&mut self, name: &str) -> String {
        if let Some(cached) = self.attributes.get(name) {
            return cached.clone();
        }
        let ident = self.escape(&underscore(name));
        self.attributes.insert(name.to_string(), ident.clone());
        ident
    }

    /// Prefix-stripped method name for an operation
    pub fn method(&mut self, name: &str) -> String {
        if let Some(cached) = self.methods.get(name) {
            return cached.clone();
        }
        let ident = self.escape(&method_name(name));
        self.methods.insert(name.to_string(), ident.clone());
        ident
    }

    /// Getter for a feature; booleans read as `is_<name>`
    pub fn getter(&mut self, name: &str, boolean: bool) -> String {
        let base = underscore(name);
        if boolean && !base.starts_with("is_") {
            format!("is_{}", base)
        } else {
            self.escape(&base)
        }
    }

    /// Un-prefixed snake_case name, used to build `set_`, `unset_` and `add_` names
    pub fn stem(&self, name: &str) -> String {
        underscore(name)
    }

    pub fn module(&self, name: &str) -> String {
        self.escape(&underscore(name))
    }

    pub fn variant(&self, name: &str) -> String {
        pascal_case(name)
    }

    pub fn impl_name(&self, class_name: &str) -> String {
        format!("{}{}", class_name, self.naming.impl_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_collapses_single_letters() {
        assert_eq!(underscore("nsURI"), "ns_uri");
        assert_eq!(underscore("iD"), "id");
        assert_eq!(underscore("x_y"), "xy");
        assert_eq!(underscore("eIDAttribute"), "eid_attribute");
        assert_eq!(underscore("intAttr"), "int_attr");
        assert_eq!(underscore("name"), "name");
        assert_eq!(underscore("Foo"), "foo");
    }

    #[test]
    fn test_method_name_strips_prefixes() {
        assert_eq!(method_name("getName"), "name");
        assert_eq!(method_name("setName"), "name");
        assert_eq!(method_name("isActive"), "active");
        assert_eq!(method_name("compute"), "compute");
        assert_eq!(method_name("settle"), "settle");
    }

    #[test]
    fn test_singular() {
        assert_eq!(singular("children"), "children");
        assert_eq!(singular("entries"), "entry");
        assert_eq!(singular("books"), "book");
        assert_eq!(singular("address"), "address");
        assert_eq!(singular("s"), "s");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("red"), "Red");
        assert_eq!(pascal_case("DARK_RED"), "DarkRed");
        assert_eq!(pascal_case("lightBlue"), "LightBlue");
        assert_eq!(pascal_case("2d"), "V2d");
        assert_eq!(pascal_case("--"), "Value");
    }

    #[test]
    fn test_keyword_escape() {
        assert_eq!(escape_keyword("type", "r#"), "r#type");
        assert_eq!(escape_keyword("self", "r#"), "self_");
        assert_eq!(escape_keyword("kind", "r#"), "kind");
        assert_eq!(escape_keyword("type", "e_"), "e_type");
    }

    #[test]
    fn test_names_cache() {
        let mut names = Names::new(NamingConfig::default());
        assert_eq!(names.attribute("type"), "r#type");
        assert_eq!(names.attribute("type"), "r#type");
        assert_eq!(names.method("getType"), "r#type");
        assert_eq!(names.getter("enabled", true), "is_enabled");
        assert_eq!(names.getter("isEnabled", true), "is_enabled");
        assert_eq!(names.impl_name("Node"), "NodeImpl");
        assert_eq!(names.module("MyPackage"), "my_package");
    }
}
