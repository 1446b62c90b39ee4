use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note row. `content_md` holds markdown for normal notes and the literal
/// script body for script notes. `file_path` is populated only for PDF notes
/// and is a storage-relative name, never an absolute path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub language: String,
    pub snippet: String,
    pub analysis: String,
    pub content_md: String,
    pub kind: NoteKind,
    pub file_path: Option<String>,
    pub pdf_page: i64,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Normal,
    Pdf,
    Script,
}

impl NoteKind {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Normal => 0,
            Self::Pdf => 1,
            Self::Script => 2,
        }
    }

    pub fn from_i64(v: i64) -> Option<Self> {
        match v {
            0 => Some(Self::Normal),
            1 => Some(Self::Pdf),
            2 => Some(Self::Script),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Pdf => "pdf",
            Self::Script => "script",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub title: String,
    pub language: String,
    pub snippet: String,
    pub analysis: String,
    pub category_id: Uuid,
}

/// Markdown (or script) note creation. `kind` defaults to [`NoteKind::Normal`];
/// pass [`NoteKind::Script`] to make the body executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMarkdownNoteInput {
    pub title: String,
    pub language: String,
    pub content_md: String,
    pub category_id: Uuid,
    #[serde(default)]
    pub kind: Option<NoteKind>,
}

/// Partial update for snippet-style fields. Never touches `kind`,
/// `file_path`, or `pdf_page`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteInput {
    pub title: Option<String>,
    pub language: Option<String>,
    pub snippet: Option<String>,
    pub analysis: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Partial update targeting the markdown body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMarkdownNoteInput {
    pub title: Option<String>,
    pub language: Option<String>,
    pub content_md: Option<String>,
    pub category_id: Option<Uuid>,
}
