use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use super::error::CatalogError;
use super::model::{Anchor, Catalog, Recording, SourceRef};

/// Raw catalog document as it appears on disk.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default, alias = "work")]
    title: Option<String>,
    #[serde(default)]
    recordings: Vec<RecordingDocument>,
    #[serde(default)]
    segments: Option<Vec<AnchorDocument>>,
    #[serde(default)]
    spots: Option<Vec<AnchorDocument>>,
    #[serde(default)]
    anchors: Option<Vec<AnchorDocument>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordingDocument {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    yt_id: Option<String>,
    #[serde(default)]
    embed: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnchorDocument {
    id: String,
    #[serde(default)]
    label: Option<String>,
    start_sec: f64,
    #[serde(default)]
    end_sec: Option<f64>,
    #[serde(default)]
    note: Option<String>,
}

impl Catalog {
    /// Read and validate a catalog document from disk.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a catalog document.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(text)?;
        Self::from_document(doc)
    }

    fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        if doc.recordings.is_empty() {
            return Err(CatalogError::Invalid("no recordings".to_string()));
        }

        let mut seen = HashSet::new();
        let mut recordings = Vec::with_capacity(doc.recordings.len());
        for rec in doc.recordings {
            if !seen.insert(rec.id.clone()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate recording id '{}'",
                    rec.id
                )));
            }
            recordings.push(recording_from_document(rec)?);
        }

        // A unified `anchors` list wins over the per-mode collections.
        let (segments, windows) = match doc.anchors {
            Some(anchors) => {
                let anchors = anchors_from_documents("anchors", anchors)?;
                (anchors.clone(), anchors)
            }
            None => (
                anchors_from_documents("segments", doc.segments.unwrap_or_default())?,
                anchors_from_documents("spots", doc.spots.unwrap_or_default())?,
            ),
        };

        Ok(Self {
            title: doc.title.filter(|t| !t.trim().is_empty()),
            recordings,
            segments,
            windows,
        })
    }
}

fn recording_from_document(rec: RecordingDocument) -> Result<Recording, CatalogError> {
    let source = rec
        .source
        .or(rec.path)
        .or(rec.url)
        .or(rec.yt_id)
        .or_else(|| rec.embed.as_deref().and_then(video_id_from_embed))
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            CatalogError::Invalid(format!("recording '{}' has no playable source", rec.id))
        })?;

    let title = rec
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| rec.id.clone());

    Ok(Recording {
        id: rec.id,
        title,
        source: SourceRef::new(source),
    })
}

fn anchors_from_documents(
    collection: &str,
    docs: Vec<AnchorDocument>,
) -> Result<Vec<Anchor>, CatalogError> {
    let mut seen = HashSet::new();
    let mut anchors = Vec::with_capacity(docs.len());
    for a in docs {
        if !seen.insert(a.id.clone()) {
            return Err(CatalogError::Invalid(format!(
                "duplicate anchor id '{}' in {collection}",
                a.id
            )));
        }
        if !a.start_sec.is_finite() || a.start_sec < 0.0 {
            return Err(CatalogError::Invalid(format!(
                "anchor '{}' in {collection} has an invalid startSec",
                a.id
            )));
        }
        if a.end_sec.is_some_and(|e| !e.is_finite()) {
            return Err(CatalogError::Invalid(format!(
                "anchor '{}' in {collection} has an invalid endSec",
                a.id
            )));
        }
        anchors.push(Anchor {
            id: a.id,
            label: a.label,
            start_sec: a.start_sec,
            end_sec: a.end_sec,
            note: a.note.filter(|n| !n.trim().is_empty()),
        });
    }
    Ok(anchors)
}

/// Extract the video identifier from an embed URL (`.../embed/<id>?...`).
pub(super) fn video_id_from_embed(embed: &str) -> Option<String> {
    let (_, rest) = embed.split_once("/embed/")?;
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if id.is_empty() { None } else { Some(id) }
}
