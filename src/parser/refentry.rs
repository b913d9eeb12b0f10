//! DocBook `refentry` extraction.
//!
//! Only a fixed handful of paths are read, all relative to the root element:
//!
//! - `@conditional` — build conditional, absent means always built
//! - `refmeta/refentrytitle` — page title, must equal the first name
//! - `refmeta/manvolnum` — manual section
//! - `refnamediv/refname` — every name the page is installed under

use crate::error::{Error, Result};
use crate::model::ManPageDoc;
use roxmltree::{Document, Node, ParsingOptions};
use std::path::Path;

/// Parse refentry markup into a [`ManPageDoc`].
///
/// `path` is only used for diagnostics.
pub fn parse(path: &Path, content: &str) -> Result<ManPageDoc> {
    // DocBook sources declare the DocBook DTD
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let xml = Document::parse_with_options(content, options).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let root = xml.root_element();

    let conditional = root.attribute("conditional").unwrap_or_default().to_string();

    let refmeta = child(root, "refmeta").ok_or_else(|| schema(path, "refmeta"))?;
    let title = child_text(refmeta, "refentrytitle")
        .ok_or_else(|| schema(path, "refmeta/refentrytitle"))?;
    let section =
        child_text(refmeta, "manvolnum").ok_or_else(|| schema(path, "refmeta/manvolnum"))?;

    // DocBook allows several refnamediv blocks
    let names = root
        .children()
        .filter(|n| n.has_tag_name("refnamediv"))
        .flat_map(|div| div.children().filter(|n| n.has_tag_name("refname")))
        .map(element_text)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| schema(path, "refnamediv/refname text"))?;
    let first = names
        .first()
        .ok_or_else(|| schema(path, "refnamediv/refname"))?;

    if title != *first {
        return Err(Error::TitleMismatch {
            path: path.to_path_buf(),
            title,
            name: first.clone(),
        });
    }

    Ok(ManPageDoc {
        conditional,
        title,
        section,
        names,
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn child_text(node: Node, name: &str) -> Option<String> {
    child(node, name).and_then(element_text)
}

/// Concatenated text children, skipping comments and processing instructions.
fn element_text(node: Node) -> Option<String> {
    let text: String = node
        .children()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    (!text.is_empty()).then_some(text)
}

fn schema(path: &Path, field: &'static str) -> Error {
    Error::Schema {
        path: path.to_path_buf(),
        field,
    }
}
