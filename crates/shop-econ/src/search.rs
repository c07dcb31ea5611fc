//! Maximum search for functions that rise then fall on an interval.

use crate::lerp;

/// Safety bound on narrowing steps; each step keeps at most half the bracket.
const MAX_STEPS: usize = 256;

/// Approximate the maximizer of `f` on `[x_min, x_max]`.
///
/// `f` must be continuous and non-decreasing then non-increasing on the
/// interval. Each step samples five evenly spaced points and narrows to the
/// first pair where the function stops rising, keeping one extra sample of
/// margin on the left. When no descent is sampled the search moves to the
/// last quarter. Returns the midpoint once the bracket is narrower than
/// `precision`.
///
/// On functions with several peaks this may settle on a local maximum.
///
/// Example:
/// let x = find_local_max(|x| -(x - 5.0) * (x - 5.0), 0.0, 10.0, 0.001);
/// assert!((x - 5.0).abs() < 0.001);
pub fn find_local_max<F>(f: F, x_min: f64, x_max: f64, precision: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    let mut lo = x_min;
    let mut hi = x_max;
    for _ in 0..MAX_STEPS {
        if hi - lo < precision {
            break;
        }
        let xs = [lo, lerp(lo, hi, 0.25), lerp(lo, hi, 0.5), lerp(lo, hi, 0.75), hi];
        let ys = xs.map(&f);
        let descent = (0..xs.len() - 1).find(|&i| ys[i] >= ys[i + 1]);
        (lo, hi) = match descent {
            Some(0) => (xs[0], xs[1]),
            Some(i) => (xs[i - 1], xs[i + 1]),
            None => (xs[3], xs[4]),
        };
    }
    (lo + hi) / 2.0
}
