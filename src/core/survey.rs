//! Loading TMLU documents and walking their leg records.
//!
//! A leg is an `EX` element whose parent is `SRVD`, wherever that `SRVD` sits
//! in the tree. Its length lives in `LG` siblings under the same parent.

use crate::domain::model::LegRecord;
use crate::utils::error::{Result, TallyError};
use roxmltree::{Descendants, Document, Node, ParsingOptions};

const LEG_TAG: &str = "SRVD";
const LEG_TEXT_TAG: &str = "EX";
const LENGTH_TAG: &str = "LG";

/// Parses raw file bytes into a document. Nothing is returned on failure.
pub fn parse_document<'input>(path: &str, bytes: &'input [u8]) -> Result<Document<'input>> {
    let text = std::str::from_utf8(bytes).map_err(|e| TallyError::file_load(path, e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options).map_err(|e| TallyError::file_load(path, e))
}

/// Lazily yields every leg in `doc`, in document order.
pub fn legs<'a, 'input: 'a>(doc: &'a Document<'input>, source: &'a str) -> Legs<'a, 'input> {
    Legs {
        nodes: doc.descendants(),
        source,
    }
}

/// Loads one file's worth of legs; the document is dropped before returning.
pub fn load_legs(path: &str, bytes: &[u8]) -> Result<Vec<LegRecord>> {
    let doc = parse_document(path, bytes)?;
    Ok(legs(&doc, path).collect())
}

pub fn parse_length(source: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| TallyError::LengthParse {
            path: source.to_string(),
            value: raw.to_string(),
            source: e,
        })
}

pub struct Legs<'a, 'input: 'a> {
    nodes: Descendants<'a, 'input>,
    source: &'a str,
}

impl<'a, 'input: 'a> Iterator for Legs<'a, 'input> {
    type Item = LegRecord;

    fn next(&mut self) -> Option<LegRecord> {
        let source = self.source;
        self.nodes
            .find(is_leg_text)
            .map(|ex| LegRecord {
                source: source.to_string(),
                text: element_text(ex),
                lengths: companion_lengths(ex),
            })
    }
}

fn is_leg_text(node: &Node) -> bool {
    node.has_tag_name(LEG_TEXT_TAG)
        && node
            .parent_element()
            .is_some_and(|parent| parent.has_tag_name(LEG_TAG))
}

// Text and CDATA children only; nested elements are ignored.
fn element_text(node: Node) -> String {
    node.children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect()
}

fn companion_lengths(ex: Node) -> Vec<String> {
    let Some(parent) = ex.parent_element() else {
        return Vec::new();
    };
    parent
        .children()
        .filter(|child| child.has_tag_name(LENGTH_TAG))
        .map(element_text)
        .collect()
}
