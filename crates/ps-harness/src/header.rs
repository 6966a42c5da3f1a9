use std::collections::BTreeMap;
use std::sync::OnceLock;

use ps_core::{GlobalAccess, ScriptValue, Signature, SignatureParam};
use regex::Regex;

use crate::error::PageScriptError;
use crate::literal::parse_literal;

#[derive(Debug)]
pub(crate) struct HeaderPlan {
    pub(crate) plan: Vec<(String, GlobalAccess)>,
    pub(crate) signature: Signature,
}

pub(crate) fn parse_header(
    header: &[String],
    globals: &BTreeMap<String, ScriptValue>,
) -> Result<HeaderPlan, PageScriptError> {
    let mut plan: Vec<(String, GlobalAccess)> = globals
        .keys()
        .map(|name| (name.clone(), GlobalAccess::Injected))
        .collect();
    let mut signature = Signature::default();

    for line in header {
        let Some(rest) = line.strip_prefix("##") else {
            continue;
        };
        let directive = rest.trim();
        if let Some(captures) = bind_regex().captures(directive) {
            let name = captures[1].to_string();
            // First writer wins: construction globals and earlier binds keep
            // their access path.
            if plan.iter().all(|(existing, _)| existing != &name) {
                let target = captures[2].to_string();
                plan.push((name, GlobalAccess::SlotOrLiteral { target }));
            }
            continue;
        }
        if let Some(captures) = params_regex().captures(directive) {
            signature = parse_parameters(&captures[1])?;
        }
    }

    Ok(HeaderPlan { plan, signature })
}

fn parse_parameters(raw: &str) -> Result<Signature, PageScriptError> {
    let mut signature = Signature::default();
    for part in split_by_top_level_comma(raw) {
        if let Some(name) = part.strip_prefix("**") {
            let name = name.trim();
            if signature.catch_all.is_some() {
                return Err(parameters_error("only one **name catch-all is allowed"));
            }
            if !identifier_regex().is_match(name) {
                return Err(parameters_error(format!(
                    "invalid catch-all name {:?}",
                    name
                )));
            }
            signature.catch_all = Some(name.to_string());
            continue;
        }
        let Some((name, default)) = part.split_once('=') else {
            return Err(parameters_error(format!(
                "expected name=default, found {:?}",
                part
            )));
        };
        let name = name.trim();
        if !identifier_regex().is_match(name) {
            return Err(parameters_error(format!(
                "invalid parameter name {:?}",
                name
            )));
        }
        if signature.declares(name) {
            return Err(parameters_error(format!("parameter {:?} repeated", name)));
        }
        let default = parse_literal(default.trim()).map_err(parameters_error)?;
        signature.params.push(SignatureParam {
            name: name.to_string(),
            default,
        });
    }
    if let Some(catch_all) = &signature.catch_all {
        if signature.declares(catch_all) {
            return Err(parameters_error(format!(
                "parameter {:?} repeated",
                catch_all
            )));
        }
    }
    Ok(signature)
}

fn parameters_error(message: impl Into<String>) -> PageScriptError {
    PageScriptError::HeaderSyntax {
        directive: "parameters".to_string(),
        message: message.into(),
    }
}

fn split_by_top_level_comma(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut paren_depth = 0usize;
    let mut bracket_depth = 0usize;
    let mut brace_depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in raw.chars() {
        if let Some(active_quote) = quote {
            current.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == active_quote {
                quote = None;
            }
            continue;
        }

        if ch == '\'' || ch == '"' {
            quote = Some(ch);
            current.push(ch);
            continue;
        }

        match ch {
            '(' => paren_depth += 1,
            ')' if paren_depth > 0 => paren_depth -= 1,
            '[' => bracket_depth += 1,
            ']' if bracket_depth > 0 => bracket_depth -= 1,
            '{' => brace_depth += 1,
            '}' if brace_depth > 0 => brace_depth -= 1,
            ',' if paren_depth == 0 && bracket_depth == 0 && brace_depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }

        current.push(ch);
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

fn bind_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^bind\s+([^\s=]+)\s*=\s*(\S+)$").expect("bind directive regex"))
}

fn params_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^parameters\s*=\s*(.*)$").expect("parameters directive regex")
    })
}

fn identifier_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_][0-9A-Za-z_]*$").expect("identifier regex"))
}
