// src/types.rs
//
// Source descriptors and the raw, pre-cleaning document shapes handed from
// ingestion to processing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::PipelineError;

/// Selects the ingestion/processing/visualization strategy for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Json,
    Csv,
    Pdf,
    Pptx,
}

impl FormatTag {
    pub const ALL: [FormatTag; 4] = [
        FormatTag::Json,
        FormatTag::Csv,
        FormatTag::Pdf,
        FormatTag::Pptx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Json => "json",
            FormatTag::Csv => "csv",
            FormatTag::Pdf => "pdf",
            FormatTag::Pptx => "pptx",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(FormatTag::Json),
            "csv" => Ok(FormatTag::Csv),
            "pdf" => Ok(FormatTag::Pdf),
            "pptx" => Ok(FormatTag::Pptx),
            other => Err(PipelineError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A (format, location) pair; the tag is explicit, never sniffed from the
/// file extension or content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub tag: FormatTag,
    pub location: PathBuf,
}

impl SourceDescriptor {
    pub fn new(tag: FormatTag, location: impl Into<PathBuf>) -> Self {
        Self {
            tag,
            location: location.into(),
        }
    }
}

/// Header row plus string cells, as read from a CSV file or reassembled from
/// extracted PDF text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of a named column, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// A table shape on a slide: the full cell grid, header row included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideTable {
    pub cells: Vec<Vec<String>>,
}

/// Free text runs (one entry per paragraph) and table shapes of one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub texts: Vec<String>,
    pub tables: Vec<SlideTable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    /// All extractable free text across all slides, one paragraph per line.
    /// Table cells are collected separately and do not appear here.
    pub fn combined_text(&self) -> String {
        self.slides
            .iter()
            .flat_map(|s| s.texts.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrips_through_str() {
        for tag in FormatTag::ALL {
            assert_eq!(tag.as_str().parse::<FormatTag>().unwrap(), tag);
        }
    }

    #[test]
    fn unknown_tag_is_rejected_by_name() {
        let err = "xml".parse::<FormatTag>().unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(ref t) if t == "xml"));
        assert_eq!(err.to_string(), "unsupported data type: xml");
    }

    #[test]
    fn raw_table_column_lookup() {
        let table = RawTable {
            headers: vec!["Year".into(), "Quarter".into()],
            rows: vec![],
        };
        assert_eq!(table.column("Quarter"), Some(1));
        assert_eq!(table.column("Revenue"), None);
    }
}
