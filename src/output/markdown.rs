//! Markdown rendering of product records
//!
//! This module renders each `ProductRecord` as a document section and owns
//! the `OutputDocument` that accumulates those sections for the run.

use crate::crawler::{DetailLayout, ProductRecord};
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Terminates every rendered section
pub const SECTION_SEPARATOR: &str = "---\n\n";

/// Renders one product record as a Markdown section
///
/// Rendering is pure: the same record always yields the same text.
///
/// ```text
/// ## {title}
///
/// **URL**: [{url}]({url})
///
/// **Description**:
///
/// {description}
///
/// **Specifications**:
///
/// - {item}
///
/// ---
/// ```
pub fn render_section(record: &ProductRecord) -> String {
    let mut md = String::new();

    md.push_str(&format!("## {}\n\n", record.title));
    md.push_str(&format!(
        "**URL**: [{url}]({url})\n\n",
        url = record.source_url
    ));
    md.push_str(&format!("**Description**:\n\n{}\n\n", record.description));
    md.push_str(&format!(
        "**{}**:\n\n{}\n\n",
        record.layout.label(),
        render_details(record)
    ));
    md.push_str(SECTION_SEPARATOR);

    md
}

/// Renders the details block; a fallback entry is always a plain line
fn render_details(record: &ProductRecord) -> String {
    if !record.details_found {
        return record.details.join("\n");
    }

    match record.layout {
        DetailLayout::ListContainer => record
            .details
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n"),
        DetailLayout::Scattered => record.details.join("\n"),
    }
}

/// The accumulated crawl output
///
/// Sections are only ever appended. The document is owned by the crawl loop
/// and written once, when the loop is done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputDocument {
    title: String,
    sections: Vec<String>,
}

impl OutputDocument {
    /// Creates an empty document with the given top-level heading
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Appends a rendered section
    pub fn push_section(&mut self, section: String) {
        self.sections.push(section);
    }

    /// Returns the number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns whether no section has been appended
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Renders the full document text
    pub fn render(&self) -> String {
        let mut md = format!("# {}\n\n", self.title);
        for section in &self.sections {
            md.push_str(section);
        }
        md
    }

    /// Writes the document to `path`, replacing any existing file
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of bytes written
    /// * `Err(OutputError)` - Failed to write the document
    pub fn write_to(&self, path: &Path) -> OutputResult<usize> {
        let markdown = self.render();

        let mut file = File::create(path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(markdown.len())
    }
}
