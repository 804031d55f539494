use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project metadata stored alongside the parameter table and recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Human-readable model name.
    pub name: String,
    /// Length unit the model is authored in.
    pub units: String,
    /// When the model was first created.
    pub created: DateTime<Utc>,
    /// When the model was last modified.
    pub modified: DateTime<Utc>,
}

impl ProjectMetadata {
    /// Create metadata with the given name, meter units, and current timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            units: "m".to_string(),
            created: now,
            modified: now,
        }
    }
}
