#![deny(warnings)]

//! Core data model and invariants for the store advisor.
//!
//! This crate defines the typed records read from the game's static data file
//! (`game-data.dat`) and from its save file (`SaveFile.es3`), together with the
//! validation that turns loosely-typed ES3 documents into them. Downstream
//! crates never see untyped maps.

pub mod catalog;
pub mod curve;
pub mod es3;
pub mod save;

pub use catalog::{
    BoxDef, BoxSize, BoxTable, Cashier, EnumNames, GameData, License, LicenseId, PriceCurves,
    PricingParameters, ProductDef, ProductId,
};
pub use curve::{Curve, Keyframe};
pub use save::{
    DisplayFurniture, DisplaySlot, Employees, Expense, Expenses, PaymentType, PriceBook,
    ProductPrice, Progression, RackFurniture, RackSlot, SaveData, StoredBox,
};

use std::path::PathBuf;
use thiserror::Error;

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A curve must hold at least one keyframe.
    #[error("curve has no keyframes")]
    EmptyCurve,
    /// Numeric field must be finite.
    #[error("non-finite value in field `{0}`")]
    NonFinite(&'static str),
    /// Prices must be strictly positive.
    #[error("price must be > 0, got {0}")]
    NonPositivePrice(f64),
    /// Profit rates must satisfy 0 < optimum < max.
    #[error("profit rates must satisfy 0 < optimum ({optimum}) < max ({max})")]
    InvalidProfitRates { optimum: f64, max: f64 },
    /// Boxes must hold at least one item.
    #[error("product amount per box must be > 0")]
    EmptyBox,
    /// No box definition exists for the referenced size.
    #[error("no box definition for box size {0}")]
    UnknownBoxSize(u8),
    /// Payment type ordinal outside the known set.
    #[error("unknown payment type {0}")]
    UnknownPaymentType(i64),
    /// Two products share an ID.
    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),
    /// Two licenses share an ID.
    #[error("duplicate license id {0}")]
    DuplicateLicense(LicenseId),
    /// A product failed validation.
    #[error("product {id}: {source}")]
    Product {
        id: ProductId,
        #[source]
        source: Box<ValidationError>,
    },
}

/// Errors raised while reading a game file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed ES3 document: {0}")]
    Syntax(#[from] serde_yaml::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Reject NaN and infinities for a named field.
pub(crate) fn finite(field: &'static str, v: f64) -> Result<f64, ValidationError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ValidationError::NonFinite(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_rejects_nan() {
        assert_eq!(finite("x", 1.5), Ok(1.5));
        assert_eq!(
            finite("price", f64::NAN),
            Err(ValidationError::NonFinite("price"))
        );
        assert!(finite("price", f64::INFINITY).is_err());
    }

    #[test]
    fn product_error_wraps_source() {
        let e = ValidationError::Product {
            id: ProductId(7),
            source: Box::new(ValidationError::NonPositivePrice(0.0)),
        };
        assert_eq!(e.to_string(), "product 7: price must be > 0, got 0");
    }
}
