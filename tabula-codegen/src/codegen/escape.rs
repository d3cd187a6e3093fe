//! Escaping of identifiers, property names, string literals and comments
//! for generated TypeScript

use crate::error::{CodegenError, Result};

/// Characters allowed anywhere in a bare identifier
fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Characters allowed as the first character of a bare identifier
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Check if a name is a legal bare identifier (keywords included)
pub fn is_legal_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => is_ident_start(first) && chars.all(is_ident_part),
        None => false,
    }
}

/// Check if a name is a reserved word in TypeScript
pub fn is_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "new"
            | "null"
            | "return"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "implements"
            | "interface"
            | "let"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "static"
            | "yield"
            | "any"
            | "boolean"
            | "number"
            | "string"
            | "symbol"
            | "type"
            | "unknown"
            | "never"
            | "object"
            | "undefined"
    )
}

/// Uppercase the first character of a word
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turn an arbitrary name into a legal bare identifier.
///
/// Already-legal names pass through (reserved words get their first letter
/// capitalized). Anything else is split on non-identifier characters and the
/// title-cased fragments are concatenated. A name without a single
/// alphanumeric character is rejected.
pub fn escape_identifier(raw: &str) -> Result<String> {
    let trimmed = raw.trim_matches(|c: char| !is_ident_part(c));
    if !trimmed.chars().any(char::is_alphanumeric) {
        return Err(CodegenError::UnsalvageableName(raw.to_string()));
    }

    if is_legal_identifier(trimmed) {
        return Ok(if is_reserved_word(trimmed) {
            title_case(trimmed)
        } else {
            trimmed.to_string()
        });
    }

    let joined: String = trimmed
        .split(|c: char| !is_ident_part(c))
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect();

    match joined.chars().next() {
        Some(first) if !is_ident_start(first) => Ok(format!("_{}", joined)),
        _ => Ok(joined),
    }
}

/// Property names stay bare when legal, otherwise they become string literals
pub fn escape_field_name(raw: &str) -> String {
    if is_legal_identifier(raw) {
        raw.to_string()
    } else {
        escape_string(raw)
    }
}

/// Quote a value as a single-quoted string literal
pub fn escape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('\'');
    for c in raw.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Make a value safe to embed inside a `/** ... */` comment
pub fn escape_comment(raw: &str) -> String {
    raw.replace("*/", "*\\/")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}
