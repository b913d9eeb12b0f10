//! Automake fragment renderer.
//!
//! Every list is sorted before it is joined, so the output depends only on
//! the set of inputs and never on the order they were read in.

use crate::model::{RuleGroup, Rules};
use std::collections::BTreeSet;

const HEADER: &str = "\
# Do not edit. Generated by make-man-rules.py.
# Regenerate with 'make update-man-list'.

";

/// Stands in for an empty list so the continuation line stays valid make.
const PLACEHOLDER: &str = "#";

const LIST_SEPARATOR: &str = " \\\n\t";

/// Render the complete fragment: header, one block per conditional, cleanup list.
pub fn render(rules: &Rules, spares: &BTreeSet<String>) -> String {
    let mut output = String::from(HEADER);

    let blocks: Vec<String> = rules
        .iter()
        .map(|(conditional, group)| render_group(conditional, group))
        .collect();
    output.push_str(&blocks.join("\n"));

    output.push_str("\nCLEANFILES += \\\n\t");
    output.push_str(&join_list(spares.iter().map(String::as_str)));
    output.push('\n');

    output
}

/// Render one conditional block. The guard is omitted for the empty conditional.
fn render_group(conditional: &str, group: &RuleGroup) -> String {
    let mut out = String::new();

    if !conditional.is_empty() {
        out.push_str(&format!("if {}\n", conditional));
    }

    let manpages: BTreeSet<&str> = group.values().map(String::as_str).collect();
    out.push_str("MANPAGES += \\\n\t");
    out.push_str(&join_list(manpages));
    out.push('\n');

    // RuleGroup is ordered by alias
    let aliases: Vec<(&String, &String)> = group.iter().filter(|(k, v)| k != v).collect();

    out.push_str("MANPAGES_ALIAS += \\\n\t");
    out.push_str(&join_list(aliases.iter().map(|(k, _)| k.as_str())));
    out.push('\n');

    let rules: Vec<String> = aliases
        .iter()
        .map(|(alias, target)| format!("{}: {}", alias, target))
        .collect();
    out.push_str(&rules.join("\n"));
    out.push('\n');

    if !conditional.is_empty() {
        out.push_str("endif\n");
    }

    out
}

/// Join sorted entries with backslash-newline-tab continuations.
fn join_list<'a, I: IntoIterator<Item = &'a str>>(items: I) -> String {
    let mut items: Vec<&str> = items.into_iter().collect();
    if items.is_empty() {
        return PLACEHOLDER.to_string();
    }
    items.sort_unstable();
    items.join(LIST_SEPARATOR)
}
