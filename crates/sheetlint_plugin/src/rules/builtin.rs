//! Built-in stylesheet rules.

use std::collections::HashSet;

use super::{Declaration, Finding, Rule, Stylesheet};
use crate::Severity;

/// Disallow blocks with no declarations and no nested blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockNoEmpty;

impl Rule for BlockNoEmpty {
    fn id(&self) -> &'static str {
        "block-no-empty"
    }

    fn check(&self, sheet: &Stylesheet, _options: &serde_json::Value, findings: &mut Vec<Finding>) {
        for block in &sheet.blocks {
            if block.close.is_some() && block.declarations.is_empty() && block.children == 0 {
                findings.push(Finding::new(block.open, "Empty block"));
            }
        }
    }
}

/// Disallow `!important` in declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationNoImportant;

impl Rule for DeclarationNoImportant {
    fn id(&self) -> &'static str {
        "declaration-no-important"
    }

    fn check(&self, sheet: &Stylesheet, _options: &serde_json::Value, findings: &mut Vec<Finding>) {
        for decl in sheet.blocks.iter().flat_map(|b| &b.declarations) {
            let chars: Vec<char> = decl.value.chars().collect();
            let Some(bang) = chars.iter().position(|c| *c == '!') else {
                continue;
            };
            let rest: String = chars[bang + 1..].iter().collect();
            if rest.trim_start().to_ascii_lowercase().starts_with("important") {
                findings.push(Finding::new(
                    decl.loc_in_value(bang),
                    format!("Use of !important on \"{}\"", decl.property),
                ));
            }
        }
    }
}

/// Disallow the same property twice in one block.
///
/// Options: `{ "ignore": ["property", ...] }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationBlockNoDuplicateProperties;

impl Rule for DeclarationBlockNoDuplicateProperties {
    fn id(&self) -> &'static str {
        "declaration-block-no-duplicate-properties"
    }

    fn check(&self, sheet: &Stylesheet, options: &serde_json::Value, findings: &mut Vec<Finding>) {
        let ignored: HashSet<String> = options
            .get("ignore")
            .and_then(|v| v.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_ascii_lowercase)
                    .collect()
            })
            .unwrap_or_default();

        for block in &sheet.blocks {
            let mut seen = HashSet::new();
            for decl in &block.declarations {
                let name = decl.property.to_ascii_lowercase();
                if ignored.contains(&name) {
                    continue;
                }
                if !seen.insert(name) {
                    findings.push(Finding::new(
                        decl.property_loc,
                        format!("Duplicate property \"{}\"", decl.property),
                    ));
                }
            }
        }
    }
}

/// Disallow units on zero lengths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthZeroNoUnit;

const LENGTH_UNITS: &[&str] = &[
    "px", "em", "rem", "ex", "ch", "vw", "vh", "vmin", "vmax", "cm", "mm", "q", "in", "pt", "pc",
];

impl Rule for LengthZeroNoUnit {
    fn id(&self) -> &'static str {
        "length-zero-no-unit"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, sheet: &Stylesheet, _options: &serde_json::Value, findings: &mut Vec<Finding>) {
        for decl in sheet.blocks.iter().flat_map(|b| &b.declarations) {
            if decl.property.starts_with("--") {
                continue;
            }
            for (start, token) in value_tokens(decl) {
                let number_len = token
                    .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                    .unwrap_or(token.len());
                let (number, unit) = token.split_at(number_len);
                let is_zero = !number.is_empty() && number.parse::<f64>().is_ok_and(|n| n == 0.0);
                if is_zero && LENGTH_UNITS.contains(&unit.to_ascii_lowercase().as_str()) {
                    findings.push(Finding::new(
                        decl.loc_in_value(start),
                        format!("Unit on zero length \"{}\"", token),
                    ));
                }
            }
        }
    }
}

/// Disallow malformed hex colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorNoInvalidHex;

impl Rule for ColorNoInvalidHex {
    fn id(&self) -> &'static str {
        "color-no-invalid-hex"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, sheet: &Stylesheet, _options: &serde_json::Value, findings: &mut Vec<Finding>) {
        for decl in sheet.blocks.iter().flat_map(|b| &b.declarations) {
            if decl.value.contains("url(") {
                continue;
            }
            for (start, token) in value_tokens(decl) {
                let Some(hex) = token.strip_prefix('#') else {
                    continue;
                };
                let valid_len = matches!(hex.len(), 3 | 4 | 6 | 8);
                if !valid_len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    findings.push(Finding::new(
                        decl.loc_in_value(start),
                        format!("Invalid hex color \"{}\"", token),
                    ));
                }
            }
        }
    }
}

/// Splits a declaration value into `(char_index, token)` pairs.
fn value_tokens(decl: &Declaration) -> Vec<(usize, String)> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0;

    for (idx, c) in decl.value.chars().enumerate() {
        if c.is_whitespace() || matches!(c, ',' | '(' | ')' | '/') {
            if !current.is_empty() {
                tokens.push((start, std::mem::take(&mut current)));
            }
        } else {
            if current.is_empty() {
                start = idx;
            }
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push((start, current));
    }
    tokens
}
