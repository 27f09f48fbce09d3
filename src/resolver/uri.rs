//! Symbolic reference grammar
//!
//! - local fragment: `#//Seg1/Seg2/...`
//! - qualified: `<prefix>:<Kind> <namespace-uri>#//Seg1/...`

use regex::Regex;
use std::sync::LazyLock;

static QUALIFIED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+):(\w+)\s+([^#]+)#//(.+)?$")
        .unwrap_or_else(|e| panic!("invalid built-in pattern: {}", e))
});

/// A parsed symbolic reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicUri<'a> {
    Local {
        path: Vec<&'a str>,
    },
    Qualified {
        prefix: &'a str,
        kind: &'a str,
        namespace: &'a str,
        path: Vec<&'a str>,
    },
}

impl<'a> SymbolicUri<'a> {
    /// `None` when `uri` matches neither form or names an empty path
    pub fn parse(uri: &'a str) -> Option<Self> {
        if let Some(fragment) = uri.strip_prefix("#//") {
            let path = segments(fragment)?;
            return Some(Self::Local { path });
        }
        let captures = QUALIFIED.captures(uri.trim())?;
        let prefix = captures.get(1)?.as_str();
        let kind = captures.get(2)?.as_str();
        let namespace = captures.get(3)?.as_str().trim();
        let path = segments(captures.get(4)?.as_str())?;
        Some(Self::Qualified {
            prefix,
            kind,
            namespace,
            path,
        })
    }

    pub fn path(&self) -> &[&'a str] {
        match self {
            Self::Local { path } | Self::Qualified { path, .. } => path,
        }
    }
}

fn segments(fragment: &str) -> Option<Vec<&str>> {
    let path: Vec<&str> = fragment.split('/').collect();
    if path.iter().any(|segment| segment.is_empty()) {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_fragment() {
        assert_eq!(
            SymbolicUri::parse("#//A/foo"),
            Some(SymbolicUri::Local { path: vec!["A", "foo"] })
        );
    }

    #[test]
    fn test_parse_qualified() {
        let uri = SymbolicUri::parse("ecore:EDataType http://www.eclipse.org/emf/2002/Ecore#//EString").unwrap();
        assert_eq!(
            uri,
            SymbolicUri::Qualified {
                prefix: "ecore",
                kind: "EDataType",
                namespace: "http://www.eclipse.org/emf/2002/Ecore",
                path: vec!["EString"],
            }
        );
    }

    #[test]
    fn test_reject_malformed() {
        assert_eq!(SymbolicUri::parse("A"), None);
        assert_eq!(SymbolicUri::parse("#//"), None);
        assert_eq!(SymbolicUri::parse("#//A//b"), None);
        assert_eq!(SymbolicUri::parse("q:EClass http://example/q#//"), None);
    }
}
