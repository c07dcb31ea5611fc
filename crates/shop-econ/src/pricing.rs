//! Purchase chance and sell-price recommendations for one product.

use crate::{evaluate, find_local_max, inverse_lerp, lerp, EconError};
use shop_core::{PriceCurves, PricingParameters};
use std::cell::Cell;
use tracing::debug;

/// Chance returned for prices below the buy price: a guaranteed sale, not a
/// probability.
pub const UNDERPRICED_CHANCE: f64 = 200.0;

/// Bracket width at which the best-price search stops.
pub const BEST_PRICE_PRECISION: f64 = 0.001;

/// Fraction of the optimum price an integer recommendation may undercut.
const ROUNDING_FLOOR: f64 = 0.95;

/// Derived pricing metrics for one product in one data snapshot.
///
/// Borrows catalog parameters and curves from the game data and owns the
/// live prices from the save. The best continuous price is computed on first
/// request and cached for the lifetime of the model.
#[derive(Clone, Debug)]
pub struct PricingModel<'a> {
    current_price: f64,
    player_price: Option<f64>,
    params: &'a PricingParameters,
    curves: &'a PriceCurves,
    best_price: Cell<Option<f64>>,
}

impl<'a> PricingModel<'a> {
    /// `current_price` is the game's live buy price; `player_price`, when
    /// present, is the sell price the player set.
    pub fn new(
        current_price: f64,
        player_price: Option<f64>,
        params: &'a PricingParameters,
        curves: &'a PriceCurves,
    ) -> Result<Self, EconError> {
        if !current_price.is_finite() || current_price <= 0.0 {
            return Err(EconError::InvalidPrice(current_price));
        }
        let (optimum, max) = (params.optimum_profit_rate, params.max_profit_rate);
        if !(0.0 < optimum && optimum < max) {
            return Err(EconError::InvalidProfitRates { optimum, max });
        }
        Ok(Self {
            current_price,
            player_price,
            params,
            curves,
            best_price: Cell::new(None),
        })
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn player_price(&self) -> Option<f64> {
        self.player_price
    }

    /// Player price when set, otherwise the buy price.
    pub fn selling_price(&self) -> f64 {
        self.player_price.unwrap_or(self.current_price)
    }

    pub fn params(&self) -> &PricingParameters {
        self.params
    }

    /// Markup of `sell_price` over the buy price, in percent.
    pub fn profit_rate_of(&self, sell_price: f64) -> f64 {
        (sell_price - self.current_price) * 100.0 / self.current_price
    }

    pub fn current_profit_rate(&self) -> f64 {
        self.profit_rate_of(self.selling_price())
    }

    fn price_at_rate(&self, rate: f64) -> f64 {
        self.current_price + self.current_price * rate / 100.0
    }

    pub fn optimum_price(&self) -> f64 {
        self.price_at_rate(self.params.optimum_profit_rate)
    }

    /// Price a tenth of the way from the optimum to the max profit rate.
    pub fn optimum_price_100_percent_sell(&self) -> f64 {
        self.price_at_rate(lerp(
            self.params.optimum_profit_rate,
            self.params.max_profit_rate,
            0.1,
        ))
    }

    pub fn max_price(&self) -> f64 {
        self.price_at_rate(self.params.max_profit_rate)
    }

    /// Purchase chance in percent for a sell price.
    ///
    /// Returns [`UNDERPRICED_CHANCE`] below the buy price and `0.0` at or above
    /// the max price. In between, the cheap curve covers markups below the
    /// optimum rate and the expensive curve the rest, each keyed on progress
    /// through its own rate range.
    pub fn purchase_chance(&self, sell_price: f64) -> f64 {
        let rate = self.profit_rate_of(sell_price);
        let optimum = self.params.optimum_profit_rate;
        let max = self.params.max_profit_rate;
        if rate < 0.0 {
            UNDERPRICED_CHANCE
        } else if rate < optimum {
            evaluate(&self.curves.cheap, inverse_lerp(0.0, optimum, rate))
        } else if rate < max {
            evaluate(&self.curves.expensive, inverse_lerp(optimum, max, rate))
        } else {
            0.0
        }
    }

    pub fn current_purchase_chance(&self) -> f64 {
        self.purchase_chance(self.selling_price())
    }

    /// Profit per sale weighted by purchase chance.
    pub fn profit_per_chance(&self, sell_price: f64) -> f64 {
        (sell_price - self.current_price) * self.purchase_chance(sell_price) / 100.0
    }

    pub fn current_profit_per_chance(&self) -> f64 {
        self.profit_per_chance(self.selling_price())
    }

    /// Sell price maximizing [`Self::profit_per_chance`] between the optimum
    /// and max prices.
    pub fn best_continuous_price(&self) -> f64 {
        if let Some(best) = self.best_price.get() {
            return best;
        }
        let best = find_local_max(
            |p| self.profit_per_chance(p),
            self.optimum_price(),
            self.max_price(),
            BEST_PRICE_PRECISION,
        );
        debug!(best, current = self.current_price, "best continuous price");
        self.best_price.set(Some(best));
        best
    }

    /// Integer sell price recommendation.
    ///
    /// Candidates are the optimum price less 5% rounded up, and the best
    /// continuous price rounded down. The latter wins whenever it is not
    /// below the former; otherwise the candidate with the higher expected
    /// profit wins, the larger one on ties.
    pub fn best_rounded_price(&self) -> f64 {
        let p_opt = (self.optimum_price() * ROUNDING_FLOOR).ceil();
        let p_best = self.best_continuous_price().floor();
        if p_opt <= p_best {
            return p_best;
        }
        let p_min = p_opt.min(p_best);
        let p_max = p_opt.max(p_best);
        if self.profit_per_chance(p_min) > self.profit_per_chance(p_max) {
            p_min
        } else {
            p_max
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shop_core::{Curve, Keyframe};

    fn flat_curves(cheap: f64, expensive: f64) -> PriceCurves {
        PriceCurves {
            cheap: Curve::constant(cheap),
            expensive: Curve::constant(expensive),
        }
    }

    fn params(base: f64, optimum: f64, max: f64) -> PricingParameters {
        PricingParameters::new(base, optimum, max).unwrap()
    }

    #[test]
    fn rejects_non_positive_price() {
        let p = params(1.0, 20.0, 50.0);
        let c = flat_curves(90.0, 40.0);
        assert_eq!(
            PricingModel::new(0.0, None, &p, &c).unwrap_err(),
            EconError::InvalidPrice(0.0)
        );
        assert!(PricingModel::new(f64::NAN, None, &p, &c).is_err());
    }

    #[test]
    fn rejects_inverted_rates() {
        let p = PricingParameters {
            base_price: 1.0,
            optimum_profit_rate: 50.0,
            max_profit_rate: 20.0,
        };
        let c = flat_curves(90.0, 40.0);
        assert_eq!(
            PricingModel::new(1.0, None, &p, &c).unwrap_err(),
            EconError::InvalidProfitRates {
                optimum: 50.0,
                max: 20.0
            }
        );
    }

    #[test]
    fn profit_rate_mapping() {
        let p = params(100.0, 20.0, 50.0);
        let c = flat_curves(90.0, 40.0);
        let m = PricingModel::new(100.0, None, &p, &c).unwrap();
        assert_eq!(m.profit_rate_of(120.0), 20.0);
        assert_eq!(m.profit_rate_of(100.0), 0.0);
        assert_eq!(m.profit_rate_of(90.0), -10.0);
    }

    #[test]
    fn chance_sentinels() {
        let p = params(100.0, 20.0, 50.0);
        let c = flat_curves(90.0, 40.0);
        let m = PricingModel::new(100.0, None, &p, &c).unwrap();
        assert_eq!(m.purchase_chance(90.0), 200.0);
        assert_eq!(m.purchase_chance(151.0), 0.0);
        assert_eq!(m.purchase_chance(150.0), 0.0);
    }

    #[test]
    fn chance_uses_normalized_progress() {
        let p = params(100.0, 20.0, 50.0);
        let ramp = |from: f64, to: f64| {
            Curve::new(
                vec![
                    Keyframe::new(0.0, from, 0.0, to - from),
                    Keyframe::new(1.0, to, to - from, 0.0),
                ],
                0,
                0,
            )
            .unwrap()
        };
        let c = PriceCurves {
            cheap: ramp(100.0, 80.0),
            expensive: ramp(80.0, 0.0),
        };
        let m = PricingModel::new(100.0, None, &p, &c).unwrap();
        // 10% markup is halfway through the cheap range
        assert!((m.purchase_chance(110.0) - 90.0).abs() < 1e-9);
        // 35% markup is halfway through the expensive range
        assert!((m.purchase_chance(135.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn player_price_overrides_selling_price() {
        let p = params(10.0, 30.0, 80.0);
        let c = flat_curves(90.0, 40.0);
        let m = PricingModel::new(10.0, Some(15.0), &p, &c).unwrap();
        assert_eq!(m.selling_price(), 15.0);
        assert_eq!(m.current_profit_rate(), 50.0);
        assert_eq!(m.current_purchase_chance(), 40.0);
        assert!((m.current_profit_per_chance() - 2.0).abs() < 1e-12);
        let m = PricingModel::new(10.0, None, &p, &c).unwrap();
        assert_eq!(m.selling_price(), 10.0);
    }

    #[test]
    fn end_to_end_flat_curves() {
        let p = params(10.0, 30.0, 80.0);
        let c = flat_curves(90.0, 40.0);
        let m = PricingModel::new(10.0, None, &p, &c).unwrap();
        assert_eq!(m.optimum_price(), 13.0);
        assert_eq!(m.max_price(), 18.0);
        assert!((m.optimum_price_100_percent_sell() - 13.5).abs() < 1e-12);
        // just below the optimum the cheap curve applies, from it the expensive one
        assert_eq!(m.purchase_chance(12.99), 90.0);
        assert_eq!(m.purchase_chance(13.0), 40.0);
        assert_eq!(m.purchase_chance(15.0), 40.0);

        let best = m.best_continuous_price();
        assert!(best > 17.999 && best < 18.0, "best {best}");
        let rounded = m.best_rounded_price();
        assert_eq!(rounded, 17.0);
        assert!(rounded >= (13.0f64 * 0.95).ceil() && rounded <= 18.0);
    }

    #[test]
    fn best_price_is_cached() {
        let p = params(10.0, 30.0, 80.0);
        let c = flat_curves(90.0, 40.0);
        let m = PricingModel::new(10.0, None, &p, &c).unwrap();
        let first = m.best_continuous_price();
        let second = m.best_continuous_price();
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(m.best_price.get(), Some(first));
    }

    #[test]
    fn rounded_candidates_coincide() {
        // optimum 10.9 -> ceil(10.355) = 11; best just under 11.5 -> floor 11
        let p = params(10.0, 9.0, 15.0);
        let c = flat_curves(90.0, 40.0);
        let m = PricingModel::new(10.0, None, &p, &c).unwrap();
        assert_eq!(m.best_rounded_price(), 11.0);
    }

    #[test]
    fn rounded_tie_prefers_larger_candidate() {
        // optimum 10.9 -> 11; best just under 11.0 -> 10. Both earn nothing.
        let p = params(10.0, 9.0, 10.0);
        let c = flat_curves(90.0, 40.0);
        let m = PricingModel::new(10.0, None, &p, &c).unwrap();
        assert_eq!(m.best_continuous_price().floor(), 10.0);
        assert_eq!(m.profit_per_chance(10.0), m.profit_per_chance(11.0));
        assert_eq!(m.best_rounded_price(), 11.0);
    }

    #[test]
    fn rounded_lower_candidate_wins_when_strictly_better() {
        // optimum 10.906 -> 11 which is past the max price 10.9725
        let p = params(9.5, 14.8, 15.5);
        let c = flat_curves(90.0, 40.0);
        let m = PricingModel::new(9.5, None, &p, &c).unwrap();
        assert_eq!(m.best_continuous_price().floor(), 10.0);
        assert_eq!(m.purchase_chance(11.0), 0.0);
        assert_eq!(m.best_rounded_price(), 10.0);
    }

    #[test]
    fn optimum_price_can_fall_just_short_of_optimum_rate() {
        let p = params(3.5, 30.0, 80.0);
        let c = flat_curves(90.0, 40.0);
        let m = PricingModel::new(3.5, None, &p, &c).unwrap();
        // 4.55 maps back to 29.999..., still on the cheap curve
        assert!(m.profit_rate_of(m.optimum_price()) < 30.0);
        assert_eq!(m.purchase_chance(m.optimum_price()), 90.0);

        let best = m.best_continuous_price();
        assert!((best - 4.55).abs() < 0.001, "best {best}");
        // ceil(4.3225) = 5 earns 0.6 per chance against 0.45 for floor(best) = 4
        assert_eq!(m.best_rounded_price(), 5.0);
    }

    proptest! {
        #[test]
        fn recommendations_stay_in_range(
            base in 0.5f64..500.0,
            optimum in 1.0f64..100.0,
            extra in 1.0f64..150.0,
            cheap in 50.0f64..100.0,
            expensive in 1.0f64..50.0,
        ) {
            let p = params(base, optimum, optimum + extra);
            let c = flat_curves(cheap, expensive);
            let m = PricingModel::new(base, None, &p, &c).unwrap();
            let best = m.best_continuous_price();
            prop_assert!(best >= m.optimum_price() && best <= m.max_price());
            let rounded = m.best_rounded_price();
            prop_assert_eq!(rounded, rounded.floor());
            prop_assert!(rounded <= m.max_price().ceil());
            prop_assert!(rounded >= (m.optimum_price() * 0.95).ceil().min(best.floor()));
        }
    }
}
