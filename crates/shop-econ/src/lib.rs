#![deny(warnings)]

//! Pricing model for the store advisor.
//!
//! This crate provides:
//! - Cubic Hermite evaluation of Unity animation curves
//! - A bracketing search for the maximum of a rise-then-fall function
//! - Per-product purchase chance, expected profit and recommended sell prices

pub mod curve;
pub mod pricing;
pub mod search;

pub use curve::evaluate;
pub use pricing::PricingModel;
pub use search::find_local_max;

use thiserror::Error;

/// Errors produced by pricing helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Buy price must be finite and strictly positive.
    #[error("invalid base price: {0}")]
    InvalidPrice(f64),
    /// Profit rates must satisfy 0 < optimum < max.
    #[error("invalid profit rates: optimum {optimum}%, max {max}%")]
    InvalidProfitRates { optimum: f64, max: f64 },
}

/// Linear interpolation: `y0` at `x = 0`, `y1` at `x = 1`.
pub fn lerp(y0: f64, y1: f64, x: f64) -> f64 {
    y0 + (y1 - y0) * x
}

/// Position of `x` between `x0` and `x1`, 0 at `x0` and 1 at `x1`.
pub fn inverse_lerp(x0: f64, x1: f64, x: f64) -> f64 {
    (x - x0) / (x1 - x0)
}
