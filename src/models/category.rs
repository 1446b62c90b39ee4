use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A folder in the self-referential category tree. `parent_id = None` marks
/// a root category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub color_preset_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    pub color_preset_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
}

/// Partial update. The outer `Option` means "leave unchanged"; for the two
/// nullable links, the inner `Option` distinguishes "set" from "clear".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub color_preset_id: Option<Option<Uuid>>,
    pub parent_id: Option<Option<Uuid>>,
}
