//! Core inventory domain types.
//!
//! An `InventoryRecord` is the local stock row for one catalog product.
//! Quantities are unsigned, so a record can never hold negative stock;
//! the only way stock goes down is through [`InventoryRecord::apply_sale`],
//! which refuses to oversell.

use serde::{Deserialize, Serialize};

use super::error::InventoryError;

// ────────────────────────────────────────────
// Type aliases consumed by ports and adapters
// ────────────────────────────────────────────

/// External product reference (owned by the catalog service).
pub type ProductId = i64;

/// Store-assigned record identifier.
pub type RecordId = u64;

/// Units in stock.
pub type Quantity = u32;

/// Local stock-quantity row for one product.
///
/// `id` is `None` until the store assigns one on first save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Store-assigned identifier.
    pub id: Option<RecordId>,
    /// Catalog product this stock belongs to (unique per record).
    pub product_id: ProductId,
    /// Units currently in stock.
    pub quantity: Quantity,
}

impl InventoryRecord {
    /// A fresh, unsaved, zero-stock record for `product_id`.
    pub fn empty(product_id: ProductId) -> Self {
        Self {
            id: None,
            product_id,
            quantity: 0,
        }
    }

    /// Overwrite the stock level.
    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    /// Decrement stock by `sold` units.
    ///
    /// Leaves the record untouched and returns `InsufficientStock` when
    /// fewer than `sold` units are available.
    pub fn apply_sale(&mut self, sold: Quantity) -> Result<(), InventoryError> {
        match self.quantity.checked_sub(sold) {
            Some(remaining) => {
                self.quantity = remaining;
                Ok(())
            }
            None => Err(InventoryError::InsufficientStock {
                product_id: self.product_id,
                requested: sold,
                available: self.quantity,
            }),
        }
    }

    /// Whether the store has assigned an id yet.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Validate a caller-supplied quantity.
///
/// Inputs arrive as signed integers from the request boundary; anything
/// negative or beyond `Quantity::MAX` is rejected.
pub fn parse_quantity(raw: i64) -> Result<Quantity, InventoryError> {
    Quantity::try_from(raw).map_err(|_| InventoryError::InvalidQuantity(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_has_no_id_and_zero_stock() {
        let record = InventoryRecord::empty(42);
        assert_eq!(record.product_id, 42);
        assert_eq!(record.quantity, 0);
        assert!(!record.is_persisted());
    }

    #[test]
    fn test_apply_sale_decrements() {
        let mut record = InventoryRecord::empty(42);
        record.set_quantity(10);
        record.apply_sale(3).unwrap();
        assert_eq!(record.quantity, 7);
    }

    #[test]
    fn test_apply_sale_can_empty_stock() {
        let mut record = InventoryRecord::empty(1);
        record.set_quantity(5);
        record.apply_sale(5).unwrap();
        assert_eq!(record.quantity, 0);
    }

    #[test]
    fn test_oversell_rejected_and_stock_unchanged() {
        let mut record = InventoryRecord::empty(42);
        record.set_quantity(7);
        let err = record.apply_sale(100).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InsufficientStock {
                requested: 100,
                available: 7,
                ..
            }
        ));
        assert_eq!(record.quantity, 7);
    }

    #[test]
    fn test_parse_quantity_bounds() {
        assert_eq!(parse_quantity(0).unwrap(), 0);
        assert_eq!(parse_quantity(15).unwrap(), 15);
        assert!(matches!(
            parse_quantity(-1),
            Err(InventoryError::InvalidQuantity(-1))
        ));
        assert!(parse_quantity(i64::from(u32::MAX) + 1).is_err());
    }
}
