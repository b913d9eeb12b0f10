//! Data model for man page sources and the rules derived from them.

use std::collections::BTreeMap;

/// Facts extracted from a single refentry document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManPageDoc {
    /// Root `conditional` attribute, empty when the page is always built
    pub conditional: String,
    /// `refmeta/refentrytitle`
    pub title: String,
    /// `refmeta/manvolnum`
    pub section: String,
    /// `refnamediv/refname` entries in declaration order, never empty for a
    /// parsed page
    pub names: Vec<String>,
}

impl ManPageDoc {
    /// Target of the first declared name. Every other name links to it.
    ///
    /// Panics if `names` is empty.
    pub fn canonical_target(&self) -> String {
        target_path(&self.names[0], &self.section)
    }

    /// Target paths for every declared name, first name included.
    pub fn alias_targets(&self) -> impl Iterator<Item = String> + '_ {
        self.names
            .iter()
            .map(move |name| target_path(name, &self.section))
    }
}

/// Alias target → canonical target for one conditional.
pub type RuleGroup = BTreeMap<String, String>;

/// Conditional → rule group. The empty conditional sorts first.
pub type Rules = BTreeMap<String, RuleGroup>;

/// Generated file path for a page name in a manual section.
pub fn target_path(name: &str, section: &str) -> String {
    format!("man/{}.{}", name, section)
}
