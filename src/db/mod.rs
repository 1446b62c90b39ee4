//! SQLite-backed storage for categories, color presets, and notes.
//!
//! [`Database`] is a cheap-to-clone handle over a single connection. All row
//! operations are synchronous and block the calling thread for their
//! duration; the connection mutex serializes access.

mod schema;

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;
use crate::tree;

const NOTE_COLUMNS: &str = "id, title, language, snippet, analysis, content_md, \
     kind, file_path, pdf_page, category_id, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "database opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn().execute_batch(schema::SCHEMA)?;
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ---- color presets ----

    pub fn create_color_preset(&self, input: CreateColorPresetInput) -> Result<ColorPreset> {
        let now = Utc::now();
        let preset = ColorPreset {
            id: Uuid::new_v4(),
            name: input.name,
            hex: input.hex,
            encrypted: input.encrypted,
            created_at: now,
            updated_at: now,
        };
        self.conn().execute(
            "INSERT INTO color_presets (id, name, hex, encrypted, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                preset.id.to_string(),
                preset.name,
                preset.hex,
                preset.encrypted,
                preset.created_at.to_rfc3339(),
                preset.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(preset)
    }

    pub fn list_color_presets(&self) -> Result<Vec<ColorPreset>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, hex, encrypted, created_at, updated_at
             FROM color_presets ORDER BY name ASC",
        )?;
        let presets = stmt
            .query_map([], color_preset_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(presets)
    }

    pub fn get_color_preset(&self, id: Uuid) -> Result<Option<ColorPreset>> {
        let conn = self.conn();
        let preset = conn
            .query_row(
                "SELECT id, name, hex, encrypted, created_at, updated_at
                 FROM color_presets WHERE id = ?1",
                params![id.to_string()],
                color_preset_from_row,
            )
            .optional()?;
        Ok(preset)
    }

    pub fn update_color_preset(&self, id: Uuid, input: UpdateColorPresetInput) -> Result<bool> {
        let Some(mut preset) = self.get_color_preset(id)? else {
            return Ok(false);
        };
        if let Some(name) = input.name {
            preset.name = name;
        }
        if let Some(hex) = input.hex {
            preset.hex = hex;
        }
        if let Some(encrypted) = input.encrypted {
            preset.encrypted = encrypted;
        }
        preset.updated_at = Utc::now();

        let changed = self.conn().execute(
            "UPDATE color_presets SET name = ?2, hex = ?3, encrypted = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                id.to_string(),
                preset.name,
                preset.hex,
                preset.encrypted,
                preset.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_color_preset(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .conn()
            .execute("DELETE FROM color_presets WHERE id = ?1", params![id.to_string()])?;
        Ok(changed > 0)
    }

    // ---- categories ----

    pub fn create_category(&self, input: CreateCategoryInput) -> Result<Category> {
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: input.name,
            color_preset_id: input.color_preset_id,
            parent_id: input.parent_id,
            created_at: now,
            updated_at: now,
        };
        self.conn().execute(
            "INSERT INTO categories (id, name, color_preset_id, parent_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                category.id.to_string(),
                category.name,
                category.color_preset_id.map(|id| id.to_string()),
                category.parent_id.map(|id| id.to_string()),
                category.created_at.to_rfc3339(),
                category.updated_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, color_preset_id, parent_id, created_at, updated_at
             FROM categories ORDER BY name ASC",
        )?;
        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    pub fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let conn = self.conn();
        let category = conn
            .query_row(
                "SELECT id, name, color_preset_id, parent_id, created_at, updated_at
                 FROM categories WHERE id = ?1",
                params![id.to_string()],
                category_from_row,
            )
            .optional()?;
        Ok(category)
    }

    /// Partial update. Re-parenting is refused when the new parent lies inside
    /// the subtree of the category being moved, so the update path cannot
    /// introduce a cycle.
    pub fn update_category(&self, id: Uuid, input: UpdateCategoryInput) -> Result<bool> {
        let Some(mut category) = self.get_category(id)? else {
            return Ok(false);
        };
        if let Some(name) = input.name {
            category.name = name;
        }
        if let Some(color_preset_id) = input.color_preset_id {
            category.color_preset_id = color_preset_id;
        }
        if let Some(parent_id) = input.parent_id {
            if let Some(new_parent) = parent_id {
                let subtree = self.category_subtree(id)?;
                if subtree.contains(&new_parent) {
                    return Err(Error::MalformedInput(format!(
                        "category {new_parent} is a descendant of {id}; re-parenting would create a cycle"
                    )));
                }
            }
            category.parent_id = parent_id;
        }
        category.updated_at = Utc::now();

        let changed = self.conn().execute(
            "UPDATE categories SET name = ?2, color_preset_id = ?3, parent_id = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                id.to_string(),
                category.name,
                category.color_preset_id.map(|id| id.to_string()),
                category.parent_id.map(|id| id.to_string()),
                category.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Deletes the row only. Children and notes referencing the category are
    /// left in place with dangling ids.
    pub fn delete_category(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .conn()
            .execute("DELETE FROM categories WHERE id = ?1", params![id.to_string()])?;
        Ok(changed > 0)
    }

    /// Ids of `root` and every transitive descendant.
    pub fn category_subtree(&self, root: Uuid) -> Result<HashSet<Uuid>> {
        let categories = self.list_categories()?;
        Ok(tree::resolve_subtree(&categories, root))
    }

    // ---- notes ----

    pub fn create_note(&self, input: CreateNoteInput) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: input.title,
            language: input.language,
            snippet: input.snippet,
            analysis: input.analysis,
            content_md: String::new(),
            kind: NoteKind::Normal,
            file_path: None,
            pdf_page: 1,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        };
        self.insert_note(&note)?;
        Ok(note)
    }

    pub fn create_markdown_note(&self, input: CreateMarkdownNoteInput) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: input.title,
            language: input.language,
            snippet: String::new(),
            analysis: String::new(),
            content_md: input.content_md,
            kind: input.kind.unwrap_or(NoteKind::Normal),
            file_path: None,
            pdf_page: 1,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        };
        self.insert_note(&note)?;
        Ok(note)
    }

    /// Inserts the row backing an imported PDF. `file_path` is the name of
    /// the already-written file, relative to the PDF storage root.
    pub fn create_pdf_note(&self, title: &str, file_path: &str, category_id: Uuid) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            language: String::new(),
            snippet: String::new(),
            analysis: String::new(),
            content_md: String::new(),
            kind: NoteKind::Pdf,
            file_path: Some(file_path.to_string()),
            pdf_page: 1,
            category_id,
            created_at: now,
            updated_at: now,
        };
        self.insert_note(&note)?;
        Ok(note)
    }

    fn insert_note(&self, note: &Note) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO notes ({NOTE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ),
            params![
                note.id.to_string(),
                note.title,
                note.language,
                note.snippet,
                note.analysis,
                note.content_md,
                note.kind.as_i64(),
                note.file_path,
                note.pdf_page,
                note.category_id.to_string(),
                note.created_at.to_rfc3339(),
                note.updated_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(id = %note.id, kind = note.kind.as_str(), "note created");
        Ok(())
    }

    pub fn get_note(&self, id: Uuid) -> Result<Option<Note>> {
        let conn = self.conn();
        let note = conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
                params![id.to_string()],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    /// Notes ordered most-recently-updated first. Rows with an empty markdown
    /// body are excluded unless they are PDF notes, which have no body by
    /// construction but must still surface.
    ///
    /// With a category, the listing is scoped to that category's subtree;
    /// when the category rowset cannot be loaded the scope degrades to an
    /// exact match on the given id.
    pub fn list_notes(&self, category: Option<Uuid>) -> Result<Vec<Note>> {
        let scope = match category {
            None => None,
            Some(root) => Some(match self.category_subtree(root) {
                Ok(members) => members,
                Err(err) => {
                    tracing::warn!(%err, "subtree resolution failed; scoping to the category alone");
                    HashSet::from([root])
                }
            }),
        };

        let conn = self.conn();
        match scope {
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes
                     WHERE (content_md <> '' OR kind = 1)
                     ORDER BY updated_at DESC"
                ))?;
                let notes = stmt
                    .query_map([], note_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(notes)
            }
            Some(members) => {
                let ids: Vec<String> = members.iter().map(|id| id.to_string()).collect();
                let placeholders = vec!["?"; ids.len()].join(", ");
                let mut stmt = conn.prepare(&format!(
                    "SELECT {NOTE_COLUMNS} FROM notes
                     WHERE (content_md <> '' OR kind = 1) AND category_id IN ({placeholders})
                     ORDER BY updated_at DESC"
                ))?;
                let notes = stmt
                    .query_map(params_from_iter(ids.iter()), note_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(notes)
            }
        }
    }

    pub fn update_note(&self, id: Uuid, input: UpdateNoteInput) -> Result<bool> {
        let Some(mut note) = self.get_note(id)? else {
            return Ok(false);
        };
        if let Some(title) = input.title {
            note.title = title;
        }
        if let Some(language) = input.language {
            note.language = language;
        }
        if let Some(snippet) = input.snippet {
            note.snippet = snippet;
        }
        if let Some(analysis) = input.analysis {
            note.analysis = analysis;
        }
        if let Some(category_id) = input.category_id {
            note.category_id = category_id;
        }
        self.write_note_fields(&note)
    }

    pub fn update_markdown_note(&self, id: Uuid, input: UpdateMarkdownNoteInput) -> Result<bool> {
        let Some(mut note) = self.get_note(id)? else {
            return Ok(false);
        };
        if let Some(title) = input.title {
            note.title = title;
        }
        if let Some(language) = input.language {
            note.language = language;
        }
        if let Some(content_md) = input.content_md {
            note.content_md = content_md;
        }
        if let Some(category_id) = input.category_id {
            note.category_id = category_id;
        }
        self.write_note_fields(&note)
    }

    // Kind, file_path, and pdf_page are deliberately not part of the general
    // update surface.
    fn write_note_fields(&self, note: &Note) -> Result<bool> {
        let changed = self.conn().execute(
            "UPDATE notes SET title = ?2, language = ?3, snippet = ?4, analysis = ?5,
                 content_md = ?6, category_id = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                note.id.to_string(),
                note.title,
                note.language,
                note.snippet,
                note.analysis,
                note.content_md,
                note.category_id.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Remembers the last viewed page of a PDF note.
    pub fn set_pdf_page(&self, id: Uuid, page: i64) -> Result<bool> {
        let Some(note) = self.get_note(id)? else {
            return Ok(false);
        };
        if note.kind != NoteKind::Pdf {
            return Err(Error::InvalidType {
                expected: "pdf",
                actual: note.kind.as_str(),
            });
        }
        let changed = self.conn().execute(
            "UPDATE notes SET pdf_page = ?2, updated_at = ?3 WHERE id = ?1",
            params![id.to_string(), page, Utc::now().to_rfc3339()],
        )?;
        Ok(changed > 0)
    }

    /// Deletes the row only; a PDF note's backing file is left on disk.
    pub fn delete_note(&self, id: Uuid) -> Result<bool> {
        let changed = self
            .conn()
            .execute("DELETE FROM notes WHERE id = ?1", params![id.to_string()])?;
        Ok(changed > 0)
    }

    /// Markdown body of a normal or script note. A markdown view is not
    /// meaningful for PDF notes.
    pub fn note_content(&self, id: Uuid) -> Result<String> {
        let note = self.get_note(id)?.ok_or(Error::NotFound("note"))?;
        if note.kind == NoteKind::Pdf {
            return Err(Error::InvalidType {
                expected: "normal or script",
                actual: note.kind.as_str(),
            });
        }
        Ok(note.content_md)
    }

    /// Title and body of every non-PDF note in the category's subtree,
    /// concatenated for use as AI context. Notes with a blank body are
    /// skipped.
    pub fn aggregate_category_content(&self, category: Uuid) -> Result<String> {
        let notes = self.list_notes(Some(category))?;
        let mut sections = Vec::new();
        for note in notes {
            if note.kind == NoteKind::Pdf {
                continue;
            }
            let body = note.content_md.trim();
            if body.is_empty() {
                continue;
            }
            sections.push(format!("{}\n\n{}", note.title, body));
        }
        Ok(sections.join(crate::CONTEXT_SEPARATOR))
    }
}

// ---- row mapping ----

fn read_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
    })
}

fn read_opt_uuid(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        Uuid::parse_str(&raw).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })
    })
    .transpose()
}

fn read_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })
}

fn color_preset_from_row(row: &Row<'_>) -> rusqlite::Result<ColorPreset> {
    Ok(ColorPreset {
        id: read_uuid(row, 0)?,
        name: row.get(1)?,
        hex: row.get(2)?,
        encrypted: row.get(3)?,
        created_at: read_timestamp(row, 4)?,
        updated_at: read_timestamp(row, 5)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: read_uuid(row, 0)?,
        name: row.get(1)?,
        color_preset_id: read_opt_uuid(row, 2)?,
        parent_id: read_opt_uuid(row, 3)?,
        created_at: read_timestamp(row, 4)?,
        updated_at: read_timestamp(row, 5)?,
    })
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let kind_raw: i64 = row.get(6)?;
    let kind = NoteKind::from_i64(kind_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Integer,
            format!("unknown note kind {kind_raw}").into(),
        )
    })?;
    Ok(Note {
        id: read_uuid(row, 0)?,
        title: row.get(1)?,
        language: row.get(2)?,
        snippet: row.get(3)?,
        analysis: row.get(4)?,
        content_md: row.get(5)?,
        kind,
        file_path: row.get(7)?,
        pdf_page: row.get(8)?,
        category_id: read_uuid(row, 9)?,
        created_at: read_timestamp(row, 10)?,
        updated_at: read_timestamp(row, 11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn make_category(db: &Database, name: &str, parent_id: Option<Uuid>) -> Category {
        db.create_category(CreateCategoryInput {
            name: name.to_string(),
            color_preset_id: None,
            parent_id,
        })
        .unwrap()
    }

    fn make_markdown_note(db: &Database, title: &str, body: &str, category_id: Uuid) -> Note {
        db.create_markdown_note(CreateMarkdownNoteInput {
            title: title.to_string(),
            language: "markdown".to_string(),
            content_md: body.to_string(),
            category_id,
            kind: None,
        })
        .unwrap()
    }

    #[test]
    fn listing_includes_notes_from_descendant_categories() {
        let db = test_db();
        let blender = make_category(&db, "Blender", None);
        let rigging = make_category(&db, "Rigging", Some(blender.id));
        let note = make_markdown_note(&db, "bones", "hello", rigging.id);

        let listed = db.list_notes(Some(blender.id)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, note.id);
    }

    #[test]
    fn listing_excludes_empty_bodies_except_pdfs() {
        let db = test_db();
        let cat = make_category(&db, "inbox", None);
        make_markdown_note(&db, "empty", "", cat.id);
        let kept = make_markdown_note(&db, "kept", "body", cat.id);
        let pdf = db.create_pdf_note("manual", "123_manual.pdf", cat.id).unwrap();

        let ids: Vec<Uuid> = db.list_notes(None).unwrap().iter().map(|n| n.id).collect();
        assert!(ids.contains(&kept.id));
        assert!(ids.contains(&pdf.id), "PDF notes surface despite empty body");
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn listing_scopes_to_exact_category() {
        let db = test_db();
        let a = make_category(&db, "a", None);
        let b = make_category(&db, "b", None);
        make_markdown_note(&db, "in-a", "x", a.id);
        let in_b = make_markdown_note(&db, "in-b", "y", b.id);

        let listed = db.list_notes(Some(b.id)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, in_b.id);
    }

    #[test]
    fn listing_falls_back_to_exact_match_when_categories_cannot_load() {
        let db = test_db();
        let parent = make_category(&db, "parent", None);
        let child = make_category(&db, "child", Some(parent.id));
        let in_parent = make_markdown_note(&db, "in-parent", "a", parent.id);
        make_markdown_note(&db, "in-child", "b", child.id);

        db.conn().execute("DROP TABLE categories", []).unwrap();

        // Subtree resolution now fails; the scope degrades to the given id
        // alone, so the child's note no longer surfaces.
        let listed = db.list_notes(Some(parent.id)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, in_parent.id);
    }

    #[test]
    fn listing_orders_most_recently_updated_first() {
        let db = test_db();
        let cat = make_category(&db, "inbox", None);
        let first = make_markdown_note(&db, "first", "a", cat.id);
        let second = make_markdown_note(&db, "second", "b", cat.id);

        std::thread::sleep(std::time::Duration::from_millis(5));
        db.update_markdown_note(
            first.id,
            UpdateMarkdownNoteInput {
                content_md: Some("a, revised".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        let listed = db.list_notes(None).unwrap();
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[test]
    fn update_note_applies_only_supplied_fields() {
        let db = test_db();
        let cat = make_category(&db, "inbox", None);
        let note = db
            .create_note(CreateNoteInput {
                title: "t".to_string(),
                language: "rust".to_string(),
                snippet: "fn main() {}".to_string(),
                analysis: "entry point".to_string(),
                category_id: cat.id,
            })
            .unwrap();

        let updated = db
            .update_note(
                note.id,
                UpdateNoteInput {
                    title: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated);

        let reloaded = db.get_note(note.id).unwrap().unwrap();
        assert_eq!(reloaded.title, "renamed");
        assert_eq!(reloaded.language, "rust");
        assert_eq!(reloaded.snippet, "fn main() {}");
        assert_eq!(reloaded.kind, NoteKind::Normal);
    }

    #[test]
    fn update_missing_note_reports_false() {
        let db = test_db();
        assert!(!db.update_note(Uuid::new_v4(), UpdateNoteInput::default()).unwrap());
        assert!(!db.delete_note(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn note_content_rejects_pdf_notes() {
        let db = test_db();
        let cat = make_category(&db, "inbox", None);
        let pdf = db.create_pdf_note("manual", "1_manual.pdf", cat.id).unwrap();

        let err = db.note_content(pdf.id).unwrap_err();
        assert!(matches!(err, Error::InvalidType { actual: "pdf", .. }));

        let md = make_markdown_note(&db, "note", "body", cat.id);
        assert_eq!(db.note_content(md.id).unwrap(), "body");
    }

    #[test]
    fn aggregate_joins_subtree_bodies_and_skips_pdfs() {
        let db = test_db();
        let root = make_category(&db, "root", None);
        let child = make_category(&db, "child", Some(root.id));
        make_markdown_note(&db, "alpha", "first body", root.id);
        make_markdown_note(&db, "beta", "second body", child.id);
        db.create_pdf_note("manual", "1_manual.pdf", child.id).unwrap();

        let aggregated = db.aggregate_category_content(root.id).unwrap();
        assert!(aggregated.contains("alpha\n\nfirst body"));
        assert!(aggregated.contains("beta\n\nsecond body"));
        assert!(aggregated.contains(crate::CONTEXT_SEPARATOR));
        assert!(!aggregated.contains("manual"));
    }

    #[test]
    fn reparenting_into_own_subtree_is_rejected() {
        let db = test_db();
        let root = make_category(&db, "root", None);
        let child = make_category(&db, "child", Some(root.id));

        let err = db
            .update_category(
                root.id,
                UpdateCategoryInput {
                    parent_id: Some(Some(child.id)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));

        // Moving the child to the top level is fine.
        let moved = db
            .update_category(
                child.id,
                UpdateCategoryInput {
                    parent_id: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(moved);
        assert_eq!(db.get_category(child.id).unwrap().unwrap().parent_id, None);
    }

    #[test]
    fn delete_category_leaves_children_and_notes_in_place() {
        let db = test_db();
        let root = make_category(&db, "root", None);
        let child = make_category(&db, "child", Some(root.id));
        let note = make_markdown_note(&db, "orphan", "body", root.id);

        assert!(db.delete_category(root.id).unwrap());
        assert_eq!(db.get_category(child.id).unwrap().unwrap().parent_id, Some(root.id));
        assert!(db.get_note(note.id).unwrap().is_some());
    }

    #[test]
    fn color_preset_crud_round_trip() {
        let db = test_db();
        let preset = db
            .create_color_preset(CreateColorPresetInput {
                name: "ocean".to_string(),
                hex: "#1166aa".to_string(),
                encrypted: false,
            })
            .unwrap();

        assert!(db
            .update_color_preset(
                preset.id,
                UpdateColorPresetInput {
                    hex: Some("#2277bb".to_string()),
                    ..Default::default()
                },
            )
            .unwrap());

        let listed = db.list_color_presets().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].hex, "#2277bb");
        assert_eq!(listed[0].name, "ocean");

        assert!(db.delete_color_preset(preset.id).unwrap());
        assert!(db.list_color_presets().unwrap().is_empty());
    }

    #[test]
    fn set_pdf_page_only_applies_to_pdf_notes() {
        let db = test_db();
        let cat = make_category(&db, "inbox", None);
        let pdf = db.create_pdf_note("manual", "1_manual.pdf", cat.id).unwrap();
        let md = make_markdown_note(&db, "note", "body", cat.id);

        assert!(db.set_pdf_page(pdf.id, 14).unwrap());
        assert_eq!(db.get_note(pdf.id).unwrap().unwrap().pdf_page, 14);

        let err = db.set_pdf_page(md.id, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));
    }
}
