//! Inventory Response Envelope
//!
//! Records are returned as JSON:API-style resource documents:
//! `{ "data": { "type": "inventarios", "id", "attributes": { "productId", "quantity" } } }`.

use serde::{Deserialize, Serialize};

use crate::domain::inventory::{InventoryRecord, ProductId, Quantity, RecordId};

/// Resource type name for inventory records.
pub const INVENTORY_TYPE: &str = "inventarios";

/// Top-level response document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDocument {
    /// Resource object.
    pub data: InventoryResource,
}

/// Inventory resource object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryResource {
    /// Always `inventarios`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Store-assigned id.
    pub id: Option<RecordId>,
    /// Record attributes.
    pub attributes: InventoryAttributes,
}

/// Inventory attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAttributes {
    /// Catalog product id.
    pub product_id: ProductId,
    /// Units in stock.
    pub quantity: Quantity,
}

impl From<&InventoryRecord> for InventoryDocument {
    fn from(record: &InventoryRecord) -> Self {
        Self {
            data: InventoryResource {
                kind: INVENTORY_TYPE.to_string(),
                id: record.id,
                attributes: InventoryAttributes {
                    product_id: record.product_id,
                    quantity: record.quantity,
                },
            },
        }
    }
}
