use super::vocab::NomRelType;
use serde::{Deserialize, Serialize};

/// Editor key of the homotypic grouper, stamped on everything it writes
pub const HOMOTYPIC_GROUPER: i32 = 12;

/// Directed nomenclatural relation between two names of one dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRelation {
    pub dataset_key: i32,
    pub name_id: String,
    pub related_name_id: String,
    #[serde(rename = "type")]
    pub rel_type: NomRelType,
    pub created_by: i32,
    pub modified_by: i32,
}

impl NameRelation {
    pub fn new(
        dataset_key: i32,
        name_id: impl Into<String>,
        related_name_id: impl Into<String>,
        rel_type: NomRelType,
        user: i32,
    ) -> Self {
        Self {
            dataset_key,
            name_id: name_id.into(),
            related_name_id: related_name_id.into(),
            rel_type,
            created_by: user,
            modified_by: user,
        }
    }

    /// Identity used for idempotent creation
    pub fn key(&self) -> (i32, &str, &str, NomRelType) {
        (self.dataset_key, &self.name_id, &self.related_name_id, self.rel_type)
    }
}
