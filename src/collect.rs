//! Rule collection: group every page's alias targets by conditional.
//!
//! A target path may be claimed only once across the whole input set,
//! regardless of conditional, since any combination of conditionals can be
//! enabled at the same time.

use crate::error::{Error, Result};
use crate::model::{ManPageDoc, Rules};
use crate::parser;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Accumulates rules while tracking which document claimed each target.
#[derive(Debug, Default)]
pub struct Collector {
    rules: Rules,
    claimed: HashMap<String, PathBuf>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every name of `doc` to the group for its conditional.
    ///
    /// Nothing is inserted if any of the document's targets is already taken.
    pub fn add(&mut self, path: &Path, doc: &ManPageDoc) -> Result<()> {
        if doc.names.is_empty() {
            return Err(Error::Schema {
                path: path.to_path_buf(),
                field: "refnamediv/refname",
            });
        }
        let canonical = doc.canonical_target();

        let mut pending: Vec<String> = Vec::with_capacity(doc.names.len());
        for alias in doc.alias_targets() {
            let first = if pending.contains(&alias) {
                Some(path)
            } else {
                self.claimed.get(&alias).map(PathBuf::as_path)
            };
            if let Some(first) = first {
                return Err(Error::DuplicateAlias {
                    alias,
                    first: first.to_path_buf(),
                    second: path.to_path_buf(),
                });
            }
            pending.push(alias);
        }

        let group = self.rules.entry(doc.conditional.clone()).or_default();
        for alias in pending {
            tracing::debug!(%alias, target = %canonical, conditional = %doc.conditional, "rule");
            self.claimed.insert(alias.clone(), path.to_path_buf());
            group.insert(alias, canonical.clone());
        }
        Ok(())
    }

    pub fn finish(self) -> Rules {
        self.rules
    }
}

/// Read every source and build the conditional → rule group mapping.
///
/// Sources are processed in sorted order so that diagnostics do not depend on
/// the order paths were given in. Paths are not deduplicated: the same page
/// given twice claims its targets twice.
pub fn collect<P: AsRef<Path>>(paths: &[P]) -> Result<Rules> {
    let mut sorted: Vec<&Path> = paths.iter().map(|p| p.as_ref()).collect();
    sorted.sort();

    let mut collector = Collector::new();
    for path in sorted {
        let doc = parser::read(path)?;
        collector.add(path, &doc)?;
    }
    Ok(collector.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn doc(conditional: &str, names: &[&str], section: &str) -> ManPageDoc {
        ManPageDoc {
            conditional: conditional.to_string(),
            title: names[0].to_string(),
            section: section.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    fn write_page(dir: &TempDir, file: &str, conditional: &str, names: &[&str]) -> PathBuf {
        let cond = if conditional.is_empty() {
            String::new()
        } else {
            format!(" conditional=\"{}\"", conditional)
        };
        let refnames: String = names
            .iter()
            .map(|n| format!("<refname>{}</refname>", n))
            .collect();
        let xml = format!(
            "<refentry{cond}><refmeta><refentrytitle>{}</refentrytitle>\
             <manvolnum>1</manvolnum></refmeta><refnamediv>{refnames}</refnamediv></refentry>",
            names[0]
        );
        let path = dir.path().join(file);
        fs::write(&path, xml).unwrap();
        path
    }

    #[test]
    fn aliases_map_to_first_name() {
        let mut c = Collector::new();
        c.add(Path::new("a.xml"), &doc("", &["a", "b", "c"], "5"))
            .unwrap();
        let rules = c.finish();

        let group = &rules[""];
        assert_eq!(group.len(), 3);
        assert_eq!(group["man/a.5"], "man/a.5");
        assert_eq!(group["man/b.5"], "man/a.5");
        assert_eq!(group["man/c.5"], "man/a.5");
    }

    #[test]
    fn grouped_by_conditional() {
        let mut c = Collector::new();
        c.add(Path::new("a.xml"), &doc("", &["a"], "1")).unwrap();
        c.add(Path::new("b.xml"), &doc("ENABLE_B", &["b", "bb"], "8"))
            .unwrap();
        let rules = c.finish();

        assert_eq!(rules.keys().collect::<Vec<_>>(), vec!["", "ENABLE_B"]);
        assert!(rules[""].contains_key("man/a.1"));
        assert!(!rules[""].contains_key("man/b.8"));
        assert_eq!(rules["ENABLE_B"]["man/bb.8"], "man/b.8");
    }

    #[test]
    fn duplicate_across_documents() {
        let mut c = Collector::new();
        c.add(Path::new("one.xml"), &doc("", &["one", "dupe"], "1"))
            .unwrap();
        let err = c
            .add(Path::new("two.xml"), &doc("", &["two", "dupe"], "1"))
            .unwrap_err();
        match err {
            Error::DuplicateAlias {
                alias,
                first,
                second,
            } => {
                assert_eq!(alias, "man/dupe.1");
                assert_eq!(first, Path::new("one.xml"));
                assert_eq!(second, Path::new("two.xml"));
            }
            other => panic!("expected duplicate alias, got: {other}"),
        }
    }

    #[test]
    fn duplicate_across_conditionals() {
        let mut c = Collector::new();
        c.add(Path::new("x.xml"), &doc("HAVE_X", &["x", "shared"], "1"))
            .unwrap();
        let err = c
            .add(Path::new("y.xml"), &doc("HAVE_Y", &["y", "shared"], "1"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateAlias { .. }));
    }

    #[test]
    fn alias_cannot_reuse_a_canonical_target() {
        let mut c = Collector::new();
        c.add(Path::new("foo.xml"), &doc("", &["foo"], "1")).unwrap();
        let err = c
            .add(Path::new("bar.xml"), &doc("", &["bar", "foo"], "1"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateAlias { .. }));
    }

    #[test]
    fn duplicate_within_one_document() {
        let mut c = Collector::new();
        let err = c
            .add(Path::new("foo.xml"), &doc("", &["foo", "bar", "bar"], "1"))
            .unwrap_err();
        match err {
            Error::DuplicateAlias { first, second, .. } => assert_eq!(first, second),
            other => panic!("expected duplicate alias, got: {other}"),
        }
        assert!(c.finish().is_empty());
    }

    #[test]
    fn document_without_names_is_rejected() {
        let mut c = Collector::new();
        let nameless = ManPageDoc {
            title: "foo".to_string(),
            section: "1".to_string(),
            ..ManPageDoc::default()
        };
        let err = c.add(Path::new("foo.xml"), &nameless).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema { field: "refnamediv/refname", .. }
        ));
        assert!(c.finish().is_empty());
    }

    #[test]
    fn same_name_in_different_sections_is_distinct() {
        let mut c = Collector::new();
        c.add(Path::new("a.xml"), &doc("", &["systemd"], "1")).unwrap();
        c.add(Path::new("b.xml"), &doc("", &["systemd"], "8")).unwrap();
        assert_eq!(c.finish()[""].len(), 2);
    }

    #[test]
    fn failed_add_leaves_state_untouched() {
        let mut c = Collector::new();
        c.add(Path::new("a.xml"), &doc("", &["a", "taken"], "1"))
            .unwrap();
        assert!(c
            .add(Path::new("b.xml"), &doc("", &["b", "taken"], "1"))
            .is_err());
        let rules = c.finish();
        assert!(!rules[""].contains_key("man/b.1"));
    }

    #[test]
    fn collect_from_files() {
        let dir = TempDir::new().unwrap();
        let a = write_page(&dir, "a.xml", "", &["a", "a2"]);
        let b = write_page(&dir, "b.xml", "ENABLE_B", &["b"]);

        let rules = collect(&[b, a]).unwrap();
        assert_eq!(rules[""]["man/a2.1"], "man/a.1");
        assert_eq!(rules["ENABLE_B"]["man/b.1"], "man/b.1");
    }

    #[test]
    fn collect_reports_first_document_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        let a = write_page(&dir, "a.xml", "", &["a", "dupe"]);
        let b = write_page(&dir, "b.xml", "", &["b", "dupe"]);

        let err = collect(&[b.clone(), a.clone()]).unwrap_err();
        match err {
            Error::DuplicateAlias { first, second, .. } => {
                assert_eq!(first, a);
                assert_eq!(second, b);
            }
            other => panic!("expected duplicate alias, got: {other}"),
        }
    }

    #[test]
    fn two_spellings_of_one_file_collide() {
        let dir = TempDir::new().unwrap();
        let a = write_page(&dir, "a.xml", "", &["a"]);
        let respelled = dir.path().join(".").join("a.xml");

        let err = collect(&[a, respelled]).unwrap_err();
        assert!(matches!(err, Error::DuplicateAlias { .. }), "got: {err}");
    }
}
