//! Report sections derived from a [`StoreSnapshot`].

use crate::{money, ProductView, ReportError, StoreSnapshot};
use rust_decimal::Decimal;
use shop_core::{Expense, License, ProductId};
use shop_econ::PricingModel;
use std::collections::BTreeSet;
use tracing::debug;

/// Smallest price difference worth a price update.
const PRICE_TOLERANCE: f64 = 0.01;

/// Flat per-product shipping estimate added to urgent purchases.
const SHIPPING_ESTIMATE: Decimal = Decimal::ONE;

#[derive(Clone, Debug, PartialEq)]
pub struct Overview {
    pub game_day: u32,
    pub money: Decimal,
    pub store_level: u32,
    pub store_open: bool,
}

/// Pending payments and the cash left once they are paid.
#[derive(Clone, Debug, PartialEq)]
pub struct Bills<'a> {
    pub expenses: Vec<&'a Expense>,
    pub total: Decimal,
    pub money_after_bills: Decimal,
}

/// How sell prices are recommended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingMode {
    /// Every cashier can be hired, so exact prices cost no checkout time.
    Exact,
    /// Integer prices until the last cashier unlocks.
    Rounded { remaining_checkouts: u32 },
}

impl RoundingMode {
    pub fn recommended_price(self, pricing: &PricingModel<'_>) -> f64 {
        match self {
            RoundingMode::Exact => pricing.best_continuous_price(),
            RoundingMode::Rounded { .. } => pricing.best_rounded_price(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PriceUpdate<'s, 'a> {
    pub product: &'s ProductView<'a>,
    pub pricing: &'s PricingModel<'a>,
    pub recommended: f64,
}

#[derive(Clone, Debug)]
pub struct PriceUpdates<'s, 'a> {
    pub mode: RoundingMode,
    pub rows: Vec<PriceUpdate<'s, 'a>>,
}

#[derive(Clone, Debug)]
pub struct ShelvesToFill<'s, 'a> {
    /// Rows only list shelves restockers cannot fill themselves.
    pub with_restockers: bool,
    pub rows: Vec<&'s ProductView<'a>>,
}

#[derive(Clone, Debug)]
pub struct PurchaseRow<'s, 'a> {
    pub product: &'s ProductView<'a>,
    pub boxes: u32,
    pub box_price: Decimal,
    /// `boxes × box_price`, without shipping.
    pub cost: Decimal,
    /// Estimated stock-emptying duration; lower is more pressing.
    pub priority: f64,
}

#[derive(Clone, Debug)]
pub struct PurchasePlan<'s, 'a> {
    pub urgent: Vec<PurchaseRow<'s, 'a>>,
    /// Includes the shipping estimate.
    pub urgent_total: Decimal,
    pub eventual: Vec<PurchaseRow<'s, 'a>>,
    pub eventual_total: Decimal,
}

#[derive(Clone, Debug)]
pub struct UnlockableLicense<'s, 'a> {
    pub license: &'a License,
    pub products: Vec<&'s ProductView<'a>>,
}

impl<'a> StoreSnapshot<'a> {
    pub fn overview(&self) -> Result<Overview, ReportError> {
        let progression = &self.save.progression;
        Ok(Overview {
            game_day: progression.current_day,
            money: money("Money", progression.money)?,
            store_level: progression.current_store_level,
            store_open: progression.is_store_open,
        })
    }

    /// Bills, rents and loan repayments.
    pub fn bills(&self) -> Result<Bills<'a>, ReportError> {
        let save = self.save;
        let expenses: Vec<&'a Expense> = save.expenses.all().collect();
        let mut total = Decimal::ZERO;
        for e in &expenses {
            total += money("Amount", e.amount)?;
        }
        Ok(Bills {
            expenses,
            total,
            money_after_bills: money("Money", save.progression.money)? - total,
        })
    }

    /// Exact once the checkout count reaches the highest cashier goal.
    pub fn rounding_mode(&self) -> RoundingMode {
        let goal = self.game.max_checkout_goal();
        let done = self.save.progression.completed_checkout_count;
        if done >= goal {
            RoundingMode::Exact
        } else {
            RoundingMode::Rounded {
                remaining_checkouts: goal - done,
            }
        }
    }

    /// Unlocked products whose selling price is off the recommendation.
    pub fn price_updates(&self) -> PriceUpdates<'_, 'a> {
        let mode = self.rounding_mode();
        let rows = self
            .unlocked()
            .into_iter()
            .filter_map(|product| {
                let pricing = product.pricing.as_ref()?;
                let recommended = mode.recommended_price(pricing);
                ((recommended - pricing.selling_price()).abs() > PRICE_TOLERANCE).then_some(
                    PriceUpdate {
                        product,
                        pricing,
                        recommended,
                    },
                )
            })
            .collect();
        PriceUpdates { mode, rows }
    }

    /// Shelves that are missing or not full while boxed stock exists.
    pub fn shelves_to_fill(&self) -> ShelvesToFill<'_, 'a> {
        let with_restockers = self.save.employees.restockers > 0;
        let rows = self
            .unlocked()
            .into_iter()
            .filter(|p| p.display_slots.is_empty() || p.displayed_items() < p.display_capacity())
            .filter(|p| p.stored_items() + p.unstored_items() > 0)
            .filter(|p| {
                if !with_restockers {
                    return true;
                }
                let room = i64::from(p.display_capacity()) - i64::from(p.displayed_items());
                i64::from(p.stored_items()) < room && p.unstored_items() > 0
            })
            .collect();
        ShelvesToFill {
            with_restockers,
            rows,
        }
    }

    /// Products with boxes on the floor and free rack spots.
    pub fn boxes_to_store(&self) -> Vec<&ProductView<'a>> {
        self.unlocked()
            .into_iter()
            .filter(|p| p.unstored_box_count() > 0 && p.free_box_spots() > 0)
            .collect()
    }

    pub fn boxes_to_merge(&self) -> Vec<&ProductView<'a>> {
        self.unlocked()
            .into_iter()
            .filter(|p| p.needs_merge())
            .collect()
    }

    /// Boxes to order, split into what the cash after bills covers now and
    /// the rest.
    ///
    /// Urgent candidates need at least half their rack space refilled. They
    /// are taken by estimated emptying duration until the first one that no
    /// longer fits the budget.
    pub fn purchase_plan(&self) -> Result<PurchasePlan<'_, 'a>, ReportError> {
        let budget = self.bills()?.money_after_bills;

        let mut candidates = Vec::new();
        for product in self.unlocked() {
            let Ok(boxes) = u32::try_from(product.boxes_to_buy()) else {
                continue;
            };
            if boxes == 0 {
                continue;
            }
            let Some(pricing) = product.pricing.as_ref() else {
                debug!(product_id = product.id().0, "no buy price, skipping purchase");
                continue;
            };
            let box_price = money("Prices", pricing.current_price())?
                * Decimal::from(product.def.amount_on_purchase);
            candidates.push(PurchaseRow {
                product,
                boxes,
                box_price,
                cost: box_price * Decimal::from(boxes),
                priority: product
                    .estimated_emptying_duration()
                    .unwrap_or(f64::INFINITY),
            });
        }

        let mut pressing: Vec<&PurchaseRow<'_, 'a>> = candidates
            .iter()
            .filter(|r| f64::from(r.boxes) >= f64::from(r.product.max_storable_boxes()) / 2.0)
            .collect();
        pressing.sort_by(|a, b| a.priority.total_cmp(&b.priority));
        let (taken, urgent_total) = take_affordable(
            pressing.iter().map(|r| r.cost + SHIPPING_ESTIMATE),
            budget,
        );
        let urgent_ids: BTreeSet<ProductId> =
            pressing[..taken].iter().map(|r| r.product.id()).collect();

        let (urgent, eventual): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|r| urgent_ids.contains(&r.product.id()));
        let eventual_total = eventual.iter().map(|r| r.cost).sum();
        debug!(
            urgent = urgent.len(),
            eventual = eventual.len(),
            %budget,
            "purchase plan"
        );
        Ok(PurchasePlan {
            urgent,
            urgent_total,
            eventual,
            eventual_total,
        })
    }

    /// Licenses not yet bought whose level requirement is met.
    pub fn unlockable_licenses(&self) -> Vec<UnlockableLicense<'_, 'a>> {
        let game = self.game;
        let progression = &self.save.progression;
        let owned: BTreeSet<u32> = progression.unlocked_licenses.iter().copied().collect();
        game.licenses
            .values()
            .filter(|l| {
                !owned.contains(&l.id.0) && l.required_player_level <= progression.current_store_level
            })
            .map(|license| UnlockableLicense {
                license,
                products: license
                    .products
                    .iter()
                    .filter_map(|&id| self.product(id))
                    .collect(),
            })
            .collect()
    }
}

/// Length and sum of the longest prefix of `costs` whose running total stays
/// within `budget`.
pub fn take_affordable<I>(costs: I, budget: Decimal) -> (usize, Decimal)
where
    I: IntoIterator<Item = Decimal>,
{
    let mut total = Decimal::ZERO;
    let mut taken = 0;
    for cost in costs {
        if total + cost > budget {
            break;
        }
        total += cost;
        taken += 1;
    }
    (taken, total)
}
