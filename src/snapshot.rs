//! Serializable project snapshot.
//!
//! The host decides where snapshots live; the core only converts the editor
//! state to and from JSON and validates what comes back in.

use crate::calibration::CalibrationLine;
use crate::error::{LayoutError, LayoutResult};
use crate::types::{InstanceId, PlacedEquipment};
use crate::viewport::ViewTransform;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub version: u32,
    /// UUID v4 assigned when the project was created
    pub id: String,
    pub name: String,
    pub equipment: Vec<PlacedEquipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<InstanceId>,
    #[serde(default)]
    pub view: ViewTransform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationLine>,
}

impl ProjectSnapshot {
    /// Empty project with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: new_project_id(),
            name: name.into(),
            equipment: Vec::new(),
            selected: None,
            view: ViewTransform::default(),
            calibration: None,
        }
    }

    pub fn to_json(&self) -> LayoutResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and check the version. Item-level validation happens on restore.
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LayoutError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        if !snapshot.view.is_valid() {
            return Err(LayoutError::NonFinite { field: "view" });
        }
        Ok(snapshot)
    }
}

pub fn new_project_id() -> String {
    Uuid::new_v4().to_string()
}
