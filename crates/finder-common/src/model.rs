use bytes::Bytes;
use serde::{Deserialize, Serialize};

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A spreadsheet picked by the user, held in memory until it is searched.
///
/// Clones share `content`; the bytes are read once on upload.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub name: String,
    pub media_type: String,
    pub content: Bytes,
}

impl AttachedFile {
    /// Builds an attachment, resolving the media type from the declared value
    /// first and the file extension second.
    pub fn new(name: impl Into<String>, media_type: Option<&str>, content: impl Into<Bytes>) -> Self {
        let name = name.into();
        let media_type = media_type
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| guess_media_type(&name));
        Self {
            name,
            media_type,
            content: content.into(),
        }
    }
}

impl std::fmt::Debug for AttachedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachedFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.content.len())
            .finish()
    }
}

fn guess_media_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or(FALLBACK_MEDIA_TYPE)
        .to_string()
}

/// One spreadsheet location the search API considers relevant to a query.
///
/// Every field defaults when missing so a partial reply still renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    /// Business concept, e.g. "Gross Margin"
    pub concept_name: String,
    /// Human-readable location, e.g. "Financial Ratios sheet, cell B2, Year 1"
    pub location: String,
    /// Underlying formula text, if the API found one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Current value or formula as reported by the API; not rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_formula: Option<String>,
    /// Opaque score in [0, 1], higher is more relevant
    pub relevance: f64,
    pub explanation: String,
    pub business_context: String,
    /// Cell reference, e.g. "B2"
    pub cell_location: String,
    pub sheet_name: String,
    /// Classification label, e.g. "Financial Ratio"
    pub formula_type: String,
}

/// Body of a search API reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultSet {
    /// Count as reported by the API. Displayed verbatim; never reconciled
    /// with `results.len()`.
    pub size: i64,
    /// Results in the order the API ranked them.
    pub results: Vec<SearchResult>,
    /// Set by the API instead of results for rejected uploads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
