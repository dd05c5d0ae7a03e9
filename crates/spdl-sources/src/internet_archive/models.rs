//! archive.org API response types.

use serde::Deserialize;

use crate::matching::StringOrList;

/// `advancedsearch.php` response envelope.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub response: SearchDocs,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchDocs {
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// A search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchDoc {
    pub identifier: String,
    #[serde(default)]
    pub title: StringOrList,
    #[serde(default)]
    pub creator: StringOrList,
    #[serde(default)]
    pub format: StringOrList,
}

/// `metadata/{identifier}` response.
#[derive(Debug, Deserialize)]
pub struct ItemMetadata {
    #[serde(default)]
    pub files: Vec<ItemFile>,
}

/// A file inside an item.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemFile {
    pub name: String,
    #[serde(default)]
    pub format: Option<String>,
    /// Bytes, sent as a decimal string.
    #[serde(default)]
    pub size: Option<String>,
}

impl ItemFile {
    /// FLAC by declared format or by extension.
    pub fn is_flac(&self) -> bool {
        self.format.as_deref() == Some("Flac")
            || std::path::Path::new(&self.name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("flac"))
    }

    /// Declared size in bytes, if the item lists a readable one.
    pub fn declared_size(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.trim().parse().ok())
    }
}
