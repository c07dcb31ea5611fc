#![deny(warnings)]

//! Store report built from one game-data and one save snapshot.
//!
//! [`StoreSnapshot`] joins both documents into one [`ProductView`] per catalog
//! product; the `sections` module derives the report rows from it. Formatting
//! is left to the caller.

pub mod sections;
pub mod snapshot;

pub use sections::{
    Bills, Overview, PriceUpdate, PriceUpdates, PurchasePlan, PurchaseRow, RoundingMode,
    ShelvesToFill, UnlockableLicense,
};
pub use snapshot::{ProductView, StoreSnapshot};

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use shop_econ::EconError;
use thiserror::Error;

/// Errors produced while building a report.
#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    /// A cash amount could not be represented as a decimal.
    #[error("non-finite money amount in `{0}`")]
    NonFinite(&'static str),
    /// A product's live prices were rejected by the pricing model.
    #[error("product {product_id}: {source}")]
    Pricing {
        product_id: shop_core::ProductId,
        #[source]
        source: EconError,
    },
}

/// Convert a cash amount read from the save to a decimal.
pub fn money(field: &'static str, value: f64) -> Result<Decimal, ReportError> {
    Decimal::from_f64(value).ok_or(ReportError::NonFinite(field))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rejects_non_finite() {
        assert_eq!(money("Money", 12.5).unwrap(), Decimal::new(125, 1));
        assert_eq!(
            money("Money", f64::NAN).unwrap_err(),
            ReportError::NonFinite("Money")
        );
    }
}
