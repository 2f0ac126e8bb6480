use crate::domain::model::{ExtractionMode, Role};
use crate::utils::error::Result;
use regex::Regex;

/// Pulls comma-separated participant names out of `EX` pseudo-tags.
#[derive(Debug, Clone)]
pub struct NameParser {
    mode: ExtractionMode,
    explorer: Regex,
    surveyor: Regex,
}

impl NameParser {
    pub fn new(mode: ExtractionMode) -> Result<Self> {
        Ok(Self {
            mode,
            explorer: role_pattern(Role::Explorer)?,
            surveyor: role_pattern(Role::Surveyor)?,
        })
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Names credited for `role`, in order of appearance. Duplicates and
    /// empty entries are kept.
    pub fn names(&self, text: &str, role: Role) -> Vec<String> {
        match self.mode {
            ExtractionMode::Pattern => self
                .pattern(role)
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .flat_map(|list| split_names(list.as_str()))
                .collect(),
            ExtractionMode::FirstOccurrence => first_occurrence(text, role.tag())
                .map(|list| split_names(list).collect())
                .unwrap_or_default(),
        }
    }

    fn pattern(&self, role: Role) -> &Regex {
        match role {
            Role::Explorer => &self.explorer,
            Role::Surveyor => &self.surveyor,
        }
    }
}

fn role_pattern(role: Role) -> Result<Regex> {
    let tag = role.tag();
    Ok(Regex::new(&format!("<{tag}>(.*?)</{tag}>"))?)
}

fn split_names(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',').map(|name| name.trim().to_string())
}

// Legacy extraction: the opening and closing tags are located independently,
// so multiple blocks or reversed tags produce a wrong span.
fn first_occurrence<'t>(text: &'t str, tag: &str) -> Option<&'t str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let start = text.find(&open)? + open.len();
    let end = text.find(&close)?;
    if end < start {
        tracing::debug!("closing </{}> precedes opening tag; no names taken", tag);
        return None;
    }
    Some(&text[start..end])
}
