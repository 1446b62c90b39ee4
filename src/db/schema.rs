pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS color_presets (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    hex TEXT NOT NULL,
    encrypted INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- parent_id and color_preset_id are plain columns on purpose: deleting a
-- category or preset leaves referencing rows dangling rather than cascading.
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    color_preset_id TEXT,
    parent_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- kind: 0 = normal, 1 = pdf, 2 = script.
-- file_path is a name relative to the PDF storage root, set only for kind=1.
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL DEFAULT '',
    language TEXT NOT NULL DEFAULT '',
    snippet TEXT NOT NULL DEFAULT '',
    analysis TEXT NOT NULL DEFAULT '',
    content_md TEXT NOT NULL DEFAULT '',
    kind INTEGER NOT NULL DEFAULT 0 CHECK (kind IN (0, 1, 2)),
    file_path TEXT,
    pdf_page INTEGER NOT NULL DEFAULT 1,
    category_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_categories_parent ON categories(parent_id);
CREATE INDEX IF NOT EXISTS idx_notes_category ON notes(category_id);
"#;
