//! What a drag session carries.

use crate::catalog::catalog;
use crate::error::{LayoutError, LayoutResult};
use crate::types::{EquipmentDefinition, InstanceId};
use serde::{Deserialize, Serialize};

/// Where a drag started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragSource {
    Sidebar,
    Canvas,
}

/// The thing being dragged.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPayload {
    /// A catalog entry about to be placed
    Definition(Box<EquipmentDefinition>),
    /// An item already on the canvas
    Placed(InstanceId),
}

/// Cross-boundary transfer formats: a full definition or a catalog id.
#[derive(Deserialize)]
#[serde(untagged)]
enum TransferData {
    Definition(Box<EquipmentDefinition>),
    CatalogRef { equipment_id: String },
}

#[derive(Serialize)]
struct TransferRef<'a> {
    equipment_id: &'a str,
}

impl DragPayload {
    pub fn definition(def: EquipmentDefinition) -> Self {
        DragPayload::Definition(Box::new(def))
    }

    pub fn source(&self) -> DragSource {
        match self {
            DragPayload::Definition(_) => DragSource::Sidebar,
            DragPayload::Placed(_) => DragSource::Canvas,
        }
    }

    /// Parse drag data handed across a UI boundary (e.g. HTML5 drag transfer).
    ///
    /// Accepts a serialized definition or `{"equipment_id": "..."}` naming a
    /// catalog entry. Anything else is a `MalformedPayload`.
    pub fn from_transfer_data(data: &str) -> LayoutResult<Self> {
        let parsed: TransferData = serde_json::from_str(data)
            .map_err(|e| LayoutError::MalformedPayload(e.to_string()))?;
        match parsed {
            TransferData::Definition(def) => {
                if !def.footprint.is_valid() {
                    return Err(LayoutError::MalformedPayload(format!(
                        "invalid footprint for {}",
                        def.id
                    )));
                }
                Ok(DragPayload::Definition(def))
            }
            TransferData::CatalogRef { equipment_id } => catalog()
                .by_id(&equipment_id)
                .cloned()
                .map(DragPayload::definition)
                .ok_or_else(|| {
                    LayoutError::MalformedPayload(format!("unknown equipment {}", equipment_id))
                }),
        }
    }

    /// Serialize a definition payload for a transfer. Placed items never leave the canvas.
    pub fn to_transfer_data(&self) -> Option<String> {
        match self {
            DragPayload::Definition(def) => {
                let json = if catalog().by_id(&def.id).is_some_and(|d| d == def.as_ref()) {
                    serde_json::to_string(&TransferRef { equipment_id: &def.id })
                } else {
                    serde_json::to_string(def)
                };
                json.ok()
            }
            DragPayload::Placed(_) => None,
        }
    }
}
