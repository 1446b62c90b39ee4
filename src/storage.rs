//! Content-addressed file storage for PDF and image attachments.
//!
//! Attachments live outside the database under two roots, `pdf/` and
//! `images/`, created next to the installation directory. Note rows reference
//! files by relative name only; every path handed back to a caller is joined
//! onto a root here, so callers never see or supply directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Note, NoteKind};

pub struct AttachmentStore {
    pdf_dir: PathBuf,
    image_dir: PathBuf,
}

impl AttachmentStore {
    /// Sets up both storage roots under `base`. A root that cannot be created
    /// is logged and left broken; operations against it fail later with a
    /// path error.
    pub fn new(base: &Path) -> Self {
        let pdf_dir = base.join("pdf");
        let image_dir = base.join("images");
        for dir in [&pdf_dir, &image_dir] {
            match fs::create_dir_all(dir) {
                Ok(()) => tracing::debug!(dir = %dir.display(), "storage root ready"),
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), %err, "failed to create storage root")
                }
            }
        }
        Self { pdf_dir, image_dir }
    }

    pub fn pdf_dir(&self) -> &Path {
        &self.pdf_dir
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Writes the PDF bytes under a timestamped name, then inserts the
    /// backing note row. The file write and the row insert are not one
    /// transaction; if the insert fails the staged file is removed again.
    pub fn import_pdf(
        &self,
        db: &Database,
        bytes: &[u8],
        original_name: &str,
        category_id: Uuid,
    ) -> Result<Note> {
        let stem = sanitize_file_name(original_name);
        let file_name = format!("{}_{}.pdf", unix_timestamp(), stem);
        let path = self.pdf_dir.join(&file_name);
        fs::write(&path, bytes)?;

        match db.create_pdf_note(&stem, &file_name, category_id) {
            Ok(note) => {
                tracing::info!(file = %file_name, size = bytes.len(), "PDF imported");
                Ok(note)
            }
            Err(err) => {
                if let Err(cleanup) = fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), %cleanup, "failed to remove staged PDF");
                }
                Err(err)
            }
        }
    }

    /// Absolute path of a PDF note's backing file. Never returns a path that
    /// does not exist on disk at the time of the call.
    pub fn pdf_path(&self, db: &Database, note_id: Uuid) -> Result<PathBuf> {
        let note = db.get_note(note_id)?.ok_or(Error::NotFound("note"))?;
        if note.kind != NoteKind::Pdf {
            return Err(Error::InvalidType {
                expected: "pdf",
                actual: note.kind.as_str(),
            });
        }
        let name = note.file_path.unwrap_or_default();
        if name.is_empty() {
            return Err(Error::EmptyInput("note file path"));
        }
        let path = self.pdf_dir.join(&name);
        if !path.exists() {
            return Err(Error::MissingFile(path));
        }
        Ok(path)
    }

    /// Base64 of a PDF note's file bytes.
    pub fn pdf_content(&self, db: &Database, note_id: Uuid) -> Result<String> {
        let path = self.pdf_path(db, note_id)?;
        Ok(BASE64.encode(fs::read(path)?))
    }

    /// Stores an image given either a `data:` URI or a raw base64 string and
    /// returns the relative name. The MIME type comes from the URI prefix
    /// when present; raw base64 is treated as PNG.
    pub fn save_image(&self, data: &str) -> Result<String> {
        let (mime, payload) = split_data_uri(data);
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|err| Error::MalformedInput(format!("undecodable base64 image: {err}")))?;
        if bytes.is_empty() {
            return Err(Error::EmptyInput("image payload"));
        }

        let name = format!("{}.{}", Uuid::new_v4(), extension_for_mime(mime));
        fs::write(self.image_dir.join(&name), &bytes)?;
        tracing::debug!(name = %name, size = bytes.len(), "image saved");
        Ok(name)
    }

    /// Loads a stored image as a `data:` URI, inferring the MIME type from
    /// the file extension. The name must be a bare file name.
    pub fn image_content(&self, relative_name: &str) -> Result<String> {
        if relative_name.is_empty() {
            return Err(Error::EmptyInput("image name"));
        }
        if relative_name.contains('/') || relative_name.contains('\\') || relative_name.contains("..")
        {
            return Err(Error::MalformedInput(format!(
                "image name {relative_name:?} escapes the storage root"
            )));
        }

        let path = self.image_dir.join(relative_name);
        if !path.exists() {
            return Err(Error::MissingFile(path));
        }
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let bytes = fs::read(&path)?;
        Ok(format!(
            "data:{};base64,{}",
            mime_for_extension(&ext),
            BASE64.encode(bytes)
        ))
    }
}

/// Strips the extension and replaces spaces, slashes, and backslashes with
/// underscores, so the stored name is a single safe path component.
fn sanitize_file_name(original: &str) -> String {
    let stem = match original.rfind('.') {
        Some(i) => &original[..i],
        None => original,
    };
    let cleaned: String = stem
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Splits `data:<mime>;base64,<payload>` into its parts; anything else is
/// treated as a raw PNG payload.
fn split_data_uri(data: &str) -> (&str, &str) {
    if let Some(rest) = data.strip_prefix("data:") {
        if let Some((header, payload)) = rest.split_once(',') {
            let mime = header.strip_suffix(";base64").unwrap_or(header);
            if !mime.is_empty() {
                return (mime, payload);
            }
            return ("image/png", payload);
        }
    }
    ("image/png", data)
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "png",
    }
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/png",
    }
}
