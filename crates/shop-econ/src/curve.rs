//! Curve evaluation matching Unity's `AnimationCurve.Evaluate`.

use crate::inverse_lerp;
use shop_core::{Curve, Keyframe};

/// Evaluate `curve` at `t`.
///
/// Outside the keyed range the first/last value is held. Between two keys the
/// segment is a cubic Hermite spline whose tangents are scaled to the unit
/// interval. The first key with `time >= t` closes the segment, so on tied
/// times the earlier key wins.
///
/// Example:
/// let c = Curve::new(vec![Keyframe::new(0.0, 10.0, 0.0, 0.0), Keyframe::new(1.0, 20.0, 0.0, 0.0)], 0, 0)?;
/// assert_eq!(evaluate(&c, 0.5), 15.0);
pub fn evaluate(curve: &Curve, t: f64) -> f64 {
    let keys = curve.keys();
    for (i, kf1) in keys.iter().enumerate() {
        if kf1.time >= t {
            if i == 0 {
                return kf1.value;
            }
            let kf0 = &keys[i - 1];
            return hermite(inverse_lerp(kf0.time, kf1.time, t), kf0, kf1);
        }
    }
    // curves are never empty
    keys.last().map_or(0.0, |k| k.value)
}

/// Hermite segment between two keys at normalized position `u`.
fn hermite(u: f64, kf0: &Keyframe, kf1: &Keyframe) -> f64 {
    let dt = kf1.time - kf0.time;
    let m0 = kf0.out_tangent * dt;
    let m1 = kf1.in_tangent * dt;

    let u2 = u * u;
    let u3 = u2 * u;

    let a = 2.0 * u3 - 3.0 * u2 + 1.0;
    let b = u3 - 2.0 * u2 + u;
    let c = u3 - u2;
    let d = -2.0 * u3 + 3.0 * u2;

    a * kf0.value + b * m0 + c * m1 + d * kf1.value
}
