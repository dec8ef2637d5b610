//! The pattern table and the scanner trait it implements.

use classdeps_core::model::{ReferenceKind, TypeReference};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Result of scanning one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    /// Name of the first class declared in the file.
    pub primary_type: Option<String>,
    /// Referenced type names in first-seen order, without duplicates or self-references.
    pub references: Vec<TypeReference>,
}

/// Extracts type information from raw source text.
///
/// Implementations receive unstripped content and are responsible for
/// ignoring comments themselves.
pub trait ReferenceScanner: Send + Sync {
    /// Name of the primary type declared in `content`, if any.
    fn primary_type(&self, content: &str) -> Option<String>;

    /// Primary type plus every referenced type name.
    fn scan(&self, content: &str) -> FileScan;

    /// Whether a class declared in `content` lists `base` in its base-type list.
    fn declares_base(&self, content: &str, base: &str) -> bool;

    /// Names of the interfaces declared in `content`, in source order.
    fn declared_interfaces(&self, content: &str) -> Vec<String>;
}

/// Names rejected even though they start with an uppercase letter, plus
/// lowercase keywords that the patterns routinely capture.
const DENYLIST: &[&str] = &[
    "var", "void", "int", "string", "bool", "float", "double", "decimal", "object", "dynamic",
    "long", "short", "byte", "char", "uint", "ulong", "ushort", "sbyte", "String", "Object",
    "Boolean", "Byte", "Char", "Decimal", "Double", "Single", "Int16", "Int32", "Int64",
    "UInt16", "UInt32", "UInt64", "Void",
];

/// One named entry of the pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    /// `new Name(...)`, `new Name<T>()`, `new Name { ... }`.
    Instantiation,
    /// `class Name : Base, IFace` base-type lists.
    Inheritance,
    /// `using A.B.Name;` (last segment).
    Using,
    /// `Name.Member`.
    StaticUsage,
    /// `Name ident =`, `Name ident;`, `Name ident,` `Name ident)`, `Name Prop { get`.
    Declaration,
    /// `Outer<Inner, Other>`.
    GenericDeclaration,
}

impl PatternKind {
    fn reference_kind(self) -> ReferenceKind {
        match self {
            Self::Instantiation | Self::Declaration => ReferenceKind::Instantiation,
            Self::Inheritance => ReferenceKind::Inheritance,
            Self::Using | Self::StaticUsage => ReferenceKind::StaticUsage,
            Self::GenericDeclaration => ReferenceKind::GenericParameter,
        }
    }
}

struct Patterns {
    table: Vec<(PatternKind, Regex)>,
    primary: Regex,
    interface_decl: Regex,
    comments: Regex,
    identifier: Regex,
    where_clause: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let table = vec![
            (
                PatternKind::Instantiation,
                Regex::new(r"\bnew\s+(?:[\p{L}_]\w*\s*\.\s*)*([\p{L}_]\w*)").unwrap(),
            ),
            (
                PatternKind::Inheritance,
                Regex::new(
                    r"\b(class|struct|record|interface)\s+[\p{L}_]\w*\s*(?:<[^>{]*>)?\s*(?:\([^)]*\))?\s*:\s*([^{;]+)",
                )
                .unwrap(),
            ),
            (
                PatternKind::Using,
                Regex::new(
                    r"(?m)^\s*(?:global\s+)?using\s+(?:static\s+)?(?:[\p{L}_]\w*\s*=\s*)?([\p{L}_][\w.]*)\s*;",
                )
                .unwrap(),
            ),
            (
                PatternKind::StaticUsage,
                Regex::new(r"\b([\p{L}_]\w*)\s*\.\s*[\p{L}_]\w*").unwrap(),
            ),
            (
                PatternKind::Declaration,
                Regex::new(
                    r"\b([\p{L}_]\w*)(?:\s*<[^;=(){}]*>)?(?:\[\s*\])?\??\s+[\p{L}_]\w*\s*(?:[=;,)]|\{\s*get\b)",
                )
                .unwrap(),
            ),
            (
                PatternKind::GenericDeclaration,
                Regex::new(r"\b([\p{L}_]\w*)\s*<([\w\s,.<>\[\]?]+?)>").unwrap(),
            ),
        ];
        Patterns {
            table,
            primary: Regex::new(r"\bclass\s+([\p{L}_]\w*)").unwrap(),
            interface_decl: Regex::new(r"\binterface\s+([\p{L}_]\w*)").unwrap(),
            comments: Regex::new(r#""(?:\\.|[^"\\\n])*"|//[^\n]*|/\*[\s\S]*?\*/"#).unwrap(),
            identifier: Regex::new(r"[\p{L}_]\w*").unwrap(),
            where_clause: Regex::new(r"\bwhere\b").unwrap(),
        }
    })
}

/// Remove `//` line comments and `/* */` block comments.
///
/// String literals are recognized so that `"http://host"` survives. Block
/// comments become a single space to keep neighbouring tokens apart.
pub fn strip_comments(content: &str) -> String {
    patterns()
        .comments
        .replace_all(content, |caps: &regex::Captures| {
            let m = &caps[0];
            if m.starts_with('"') {
                m.to_string()
            } else if m.starts_with("/*") {
                " ".to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// `Foo<Bar>` → `Foo`, `A.B.Foo` → `Foo`, `Base(arg)` → `Base`.
fn sanitize(name: &str) -> &str {
    let name = name.split(['<', '(']).next().unwrap_or("").trim();
    name.rsplit('.').next().unwrap_or("").trim()
}

/// Leading `I` followed by another uppercase letter, e.g. `IOrderService`.
pub fn is_interface_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I')
        && chars.next().is_some_and(char::is_uppercase)
        && chars.next().is_some()
}

/// Heuristic for "is a type name worth resolving".
fn is_candidate(name: &str, primary: Option<&str>) -> bool {
    !name.is_empty()
        && Some(name) != primary
        && !DENYLIST.contains(&name)
        && name.chars().next().is_some_and(char::is_uppercase)
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Split a base-type list at top-level commas, dropping any `where` constraints.
fn split_base_list(list: &str) -> Vec<&str> {
    let list = match patterns().where_clause.find(list) {
        Some(m) => &list[..m.start()],
        None => list,
    };
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(list[start..].trim());
    items.retain(|s| !s.is_empty());
    items
}

/// The default scanner: a fixed regex table for C#-style sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexScanner;

impl RegexScanner {
    pub fn new() -> Self {
        Self
    }

    fn primary_in_stripped(stripped: &str) -> Option<String> {
        patterns()
            .primary
            .captures(stripped)
            .map(|caps| caps[1].to_string())
    }

    /// Apply the pattern table to already-stripped content.
    fn references_in_stripped(stripped: &str, primary: Option<&str>) -> Vec<TypeReference> {
        let p = patterns();
        let mut seen: HashSet<String> = HashSet::new();
        let mut refs = Vec::new();

        let mut push = |raw: &str, kind: ReferenceKind| {
            let name = sanitize(raw);
            if !is_candidate(name, primary) || seen.contains(name) {
                return;
            }
            seen.insert(name.to_string());
            let kind = if is_interface_name(name) {
                ReferenceKind::Interface
            } else {
                kind
            };
            refs.push(TypeReference::new(name, kind));
        };

        for (pattern_kind, regex) in &p.table {
            let kind = pattern_kind.reference_kind();
            for caps in regex.captures_iter(stripped) {
                match pattern_kind {
                    PatternKind::Inheritance => {
                        let Some(list) = caps.get(2) else { continue };
                        for base in split_base_list(list.as_str()) {
                            push(base, kind);
                        }
                    }
                    PatternKind::GenericDeclaration => {
                        if let Some(outer) = caps.get(1) {
                            push(outer.as_str(), kind);
                        }
                        if let Some(inner) = caps.get(2) {
                            for ident in p.identifier.find_iter(inner.as_str()) {
                                push(ident.as_str(), kind);
                            }
                        }
                    }
                    _ => {
                        if let Some(m) = caps.get(1) {
                            push(m.as_str(), kind);
                        }
                    }
                }
            }
        }
        refs
    }
}

impl ReferenceScanner for RegexScanner {
    fn primary_type(&self, content: &str) -> Option<String> {
        Self::primary_in_stripped(&strip_comments(content))
    }

    fn scan(&self, content: &str) -> FileScan {
        let stripped = strip_comments(content);
        let primary_type = Self::primary_in_stripped(&stripped);
        let references = Self::references_in_stripped(&stripped, primary_type.as_deref());
        FileScan {
            primary_type,
            references,
        }
    }

    fn declares_base(&self, content: &str, base: &str) -> bool {
        let stripped = strip_comments(content);
        let Some((_, inheritance)) = patterns()
            .table
            .iter()
            .find(|(kind, _)| *kind == PatternKind::Inheritance)
        else {
            return false;
        };
        inheritance.captures_iter(&stripped).any(|caps| {
            &caps[1] != "interface"
                && caps.get(2).is_some_and(|list| {
                    split_base_list(list.as_str())
                        .into_iter()
                        .any(|item| sanitize(item) == base)
                })
        })
    }

    fn declared_interfaces(&self, content: &str) -> Vec<String> {
        let stripped = strip_comments(content);
        patterns()
            .interface_decl
            .captures_iter(&stripped)
            .map(|caps| caps[1].to_string())
            .collect()
    }
}
