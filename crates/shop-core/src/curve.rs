//! Designer-authored response curves (Unity `AnimationCurve` assets).

use crate::{finite, ValidationError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A spline control point with its incoming and outgoing tangents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
    #[serde(rename = "inTangent")]
    pub in_tangent: f64,
    #[serde(rename = "outTangent")]
    pub out_tangent: f64,
}

impl Keyframe {
    pub fn new(time: f64, value: f64, in_tangent: f64, out_tangent: f64) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

#[derive(Deserialize)]
struct RawCurve {
    keys: Vec<Keyframe>,
    #[serde(rename = "preWrapMode", default)]
    pre_wrap_mode: i32,
    #[serde(rename = "postWrapMode", default)]
    post_wrap_mode: i32,
}

/// Non-empty sequence of keyframes sorted ascending by time.
///
/// Wrap modes are kept as read from the asset; evaluation always clamps to
/// the first/last value outside the keyed range.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawCurve")]
pub struct Curve {
    keys: Vec<Keyframe>,
    pre_wrap_mode: i32,
    post_wrap_mode: i32,
}

impl Curve {
    /// Validate and sort keyframes. Sorting is stable, so keys sharing a time
    /// keep their authored order.
    pub fn new(
        mut keys: Vec<Keyframe>,
        pre_wrap_mode: i32,
        post_wrap_mode: i32,
    ) -> Result<Self, ValidationError> {
        if keys.is_empty() {
            return Err(ValidationError::EmptyCurve);
        }
        for k in &keys {
            finite("keyframe.time", k.time)?;
            finite("keyframe.value", k.value)?;
        }
        // times are finite here; -0.0 and 0.0 compare equal
        keys.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
        Ok(Self {
            keys,
            pre_wrap_mode,
            post_wrap_mode,
        })
    }

    /// Single-key curve returning `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, value, 0.0, 0.0)],
            pre_wrap_mode: 0,
            post_wrap_mode: 0,
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn pre_wrap_mode(&self) -> i32 {
        self.pre_wrap_mode
    }

    pub fn post_wrap_mode(&self) -> i32 {
        self.post_wrap_mode
    }
}

impl TryFrom<RawCurve> for Curve {
    type Error = ValidationError;

    fn try_from(raw: RawCurve) -> Result<Self, Self::Error> {
        Curve::new(raw.keys, raw.pre_wrap_mode, raw.post_wrap_mode)
    }
}
