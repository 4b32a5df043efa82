//! Catalog API Response Types
//!
//! The product service wraps every product in a JSON:API-style
//! envelope: `{ "data": { "id", "attributes": { "name", "price" } } }`.
//! Older deployments still emit `nombre`/`precio`, accepted as aliases.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::inventory::ProductId;
use crate::domain::product::ProductSummary;

/// Top-level product lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductEnvelope {
  /// Resource object.
  pub data: ProductData,
}

/// Product resource object.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductData {
  /// Product id, as a number or a numeric string.
  pub id: WireId,
  /// Product attributes.
  pub attributes: ProductAttributes,
}

/// Product id as serialized upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
  /// `"id": 42`
  Number(ProductId),
  /// `"id": "42"`
  Text(String),
}

/// Product attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductAttributes {
  /// Display name.
  #[serde(alias = "nombre")]
  pub name: String,
  /// Unit price.
  #[serde(alias = "precio")]
  pub price: Decimal,
}

impl ProductEnvelope {
  /// Convert the wire shape into the domain summary.
  pub fn into_summary(self) -> Result<ProductSummary, String> {
    let id = match self.data.id {
      WireId::Number(id) => id,
      WireId::Text(raw) => raw
        .trim()
        .parse()
        .map_err(|_| format!("non-numeric product id {raw:?}"))?,
    };

    Ok(ProductSummary {
      id,
      name: self.data.attributes.name,
      price: self.data.attributes.price,
    })
  }
}
