use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named color that categories can link to. `encrypted` flags presets
/// representing hidden/obfuscated colors; its meaning is left to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorPreset {
    pub id: Uuid,
    pub name: String,
    pub hex: String,
    pub encrypted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateColorPresetInput {
    pub name: String,
    pub hex: String,
    #[serde(default)]
    pub encrypted: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateColorPresetInput {
    pub name: Option<String>,
    pub hex: Option<String>,
    pub encrypted: Option<bool>,
}
