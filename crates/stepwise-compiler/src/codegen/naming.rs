//! Identifier conversion for generated modules

use stepwise_core::ast::Procedure;

/// Reserved words that cannot name a module
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Convert a name to a snake_case module identifier.
///
/// `ValidateOrder` becomes `validate_order`, `HTTPRequest` becomes
/// `http_request`. Keywords get a trailing underscore.
pub fn module_ident(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut ident = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            if c.is_uppercase() && i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                    push_separator(&mut ident);
                }
            }
            ident.extend(c.to_lowercase());
        } else {
            push_separator(&mut ident);
        }
    }

    let mut ident = ident.trim_matches('_').to_string();
    if ident.is_empty() {
        ident.push_str("step");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Name of the step's input argument: `input`, unless a procedure variable
/// already uses it
pub fn input_argument(procedure: &Procedure) -> String {
    let mut name = String::from("input");
    while procedure
        .variables
        .iter()
        .any(|(_, variable)| variable.name() == name)
    {
        name.push('_');
    }
    name
}

fn push_separator(ident: &mut String) {
    if !ident.is_empty() && !ident.ends_with('_') {
        ident.push('_');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_ident() {
        assert_eq!(module_ident("One"), "one");
        assert_eq!(module_ident("Step1"), "step1");
        assert_eq!(module_ident("ValidateOrder"), "validate_order");
        assert_eq!(module_ident("HTTPRequest"), "http_request");
        assert_eq!(module_ident("already_snake"), "already_snake");
        assert_eq!(module_ident("Step 2b"), "step_2b");
    }

    #[test]
    fn test_input_argument() {
        let mut builder = Procedure::builder("operation");
        builder.parameter("id", "u64");
        assert_eq!(input_argument(&builder.clone().build().unwrap()), "input");

        builder.local("input", "String");
        builder.local("input_", "String");
        assert_eq!(input_argument(&builder.build().unwrap()), "input__");
    }

    #[test]
    fn test_module_ident_edge_cases() {
        assert_eq!(module_ident("Loop"), "loop_");
        assert_eq!(module_ident("1st"), "_1st");
        assert_eq!(module_ident("--"), "step");
    }
}
