//! Join of game data and save data into per-product views.

use crate::ReportError;
use shop_core::{
    BoxDef, DisplaySlot, GameData, LicenseId, ProductDef, ProductId, ProductPrice, RackSlot,
    SaveData, StoredBox,
};
use shop_econ::PricingModel;
use std::collections::BTreeMap;
use tracing::debug;

/// Sort bucket offset placing locked products after every unlocked one.
const LOCKED_SORT_OFFSET: u64 = 1_000_000;

/// One catalog product with its live state from the save.
#[derive(Clone, Debug)]
pub struct ProductView<'a> {
    pub def: &'a ProductDef,
    pub label: &'a str,
    pub box_def: Option<&'a BoxDef>,
    /// Position of the product's license in the save's unlock order.
    pub license_unlock_index: Option<usize>,
    /// Present when the save holds a buy price for this product.
    pub pricing: Option<PricingModel<'a>>,
    pub average_cost: Option<f64>,
    pub previous_price: Option<f64>,
    pub daily_price_change: Option<f64>,
    pub display_slots: Vec<&'a DisplaySlot>,
    pub rack_slots: Vec<&'a RackSlot>,
    pub unstored_boxes: Vec<&'a StoredBox>,
}

impl<'a> ProductView<'a> {
    fn new(game: &'a GameData, def: &'a ProductDef) -> Self {
        Self {
            def,
            label: game.product_label(def),
            box_def: game.box_def(def.box_size),
            license_unlock_index: None,
            pricing: None,
            average_cost: None,
            previous_price: None,
            daily_price_change: None,
            display_slots: Vec::new(),
            rack_slots: Vec::new(),
            unstored_boxes: Vec::new(),
        }
    }

    pub fn id(&self) -> ProductId {
        self.def.id
    }

    pub fn is_unlocked(&self) -> bool {
        self.license_unlock_index.is_some()
    }

    /// Display order: unlocked products grouped by license unlock order, then
    /// by position within the license; locked products after them by license
    /// and product id.
    pub fn sort_key(&self) -> (u64, u64) {
        match self.license_unlock_index {
            Some(unlock) => (
                unlock as u64,
                self.def.index_in_license.unwrap_or(0) as u64,
            ),
            None => (
                self.def
                    .license
                    .map_or(u64::MAX, |l| LOCKED_SORT_OFFSET + u64::from(l.0)),
                u64::from(self.def.id.0),
            ),
        }
    }

    pub fn boxes_per_rack_slot(&self) -> u32 {
        self.box_def.map_or(0, |b| b.boxes_per_rack_slot)
    }

    pub fn displayed_items_per_slot(&self) -> Vec<u32> {
        self.display_slots.iter().map(|s| s.product_count).collect()
    }

    pub fn displayed_items(&self) -> u32 {
        self.display_slots.iter().map(|s| s.product_count).sum()
    }

    pub fn display_capacity(&self) -> u32 {
        self.display_slots.len() as u32 * self.def.amount_on_display
    }

    /// Item counts of racked boxes, grouped by rack slot.
    pub fn stored_items_per_slot(&self) -> Vec<Vec<u32>> {
        self.rack_slots
            .iter()
            .map(|s| s.boxes.iter().map(|b| b.product_count).collect())
            .collect()
    }

    pub fn stored_boxes(&self) -> u32 {
        self.rack_slots.iter().map(|s| s.boxes.len() as u32).sum()
    }

    pub fn stored_items(&self) -> u32 {
        self.rack_slots
            .iter()
            .flat_map(|s| &s.boxes)
            .map(|b| b.product_count)
            .sum()
    }

    pub fn max_storable_boxes(&self) -> u32 {
        self.rack_slots.len() as u32 * self.boxes_per_rack_slot()
    }

    /// Free box spots in the rack slots assigned to this product.
    pub fn free_box_spots(&self) -> i64 {
        i64::from(self.max_storable_boxes()) - i64::from(self.stored_boxes())
    }

    pub fn unstored_box_count(&self) -> u32 {
        self.unstored_boxes.len() as u32
    }

    pub fn unstored_items_per_box(&self) -> Vec<u32> {
        self.unstored_boxes.iter().map(|b| b.product_count).collect()
    }

    pub fn unstored_items(&self) -> u32 {
        self.unstored_boxes.iter().map(|b| b.product_count).sum()
    }

    /// Item counts of every box, unstored boxes first.
    pub fn items_in_all_boxes(&self) -> Vec<u32> {
        let mut all = self.unstored_items_per_box();
        all.extend(self.stored_items_per_slot().into_iter().flatten());
        all
    }

    pub fn items_in_non_full_boxes(&self) -> Vec<u32> {
        let full = self.def.amount_on_purchase;
        self.items_in_all_boxes()
            .into_iter()
            .filter(|&n| n < full)
            .collect()
    }

    pub fn total_items(&self) -> u32 {
        self.displayed_items() + self.stored_items() + self.unstored_items()
    }

    /// Items the assigned display and rack slots hold when full.
    pub fn max_items(&self) -> u32 {
        self.display_capacity() + self.max_storable_boxes() * self.def.amount_on_purchase
    }

    /// Full boxes that fit in the free display and rack space; negative when
    /// overstocked.
    pub fn boxes_to_buy(&self) -> i64 {
        let free = i64::from(self.max_items()) - i64::from(self.total_items());
        free.div_euclid(i64::from(self.def.amount_on_purchase))
    }

    /// Whether the items in partially filled boxes fit in fewer boxes.
    pub fn needs_merge(&self) -> bool {
        let partial = self.items_in_non_full_boxes();
        let items: u32 = partial.iter().sum();
        let per_box = self.def.amount_on_purchase;
        let needed = (items + per_box - 1) / per_box;
        (needed as usize) < partial.len()
    }

    /// Unitless estimate of how long current stock lasts at the selling
    /// price. Infinite when nobody buys; `None` without a buy price.
    pub fn estimated_emptying_duration(&self) -> Option<f64> {
        let pricing = self.pricing.as_ref()?;
        let chance = pricing.current_purchase_chance() / 100.0;
        if chance <= 0.0 {
            return Some(f64::INFINITY);
        }
        Some(f64::from(self.total_items()) / chance)
    }
}

/// Game data and save data joined per product.
#[derive(Debug)]
pub struct StoreSnapshot<'a> {
    pub game: &'a GameData,
    pub save: &'a SaveData,
    products: BTreeMap<ProductId, ProductView<'a>>,
}

impl<'a> StoreSnapshot<'a> {
    pub fn new(game: &'a GameData, save: &'a SaveData) -> Result<Self, ReportError> {
        let mut products: BTreeMap<ProductId, ProductView<'a>> = game
            .products
            .values()
            .map(|def| (def.id, ProductView::new(game, def)))
            .collect();

        let progression = &save.progression;
        for (unlock, &license_id) in progression.unlocked_licenses.iter().enumerate() {
            let Some(license) = game.license(LicenseId(license_id)) else {
                debug!(license_id, "save unlocks unknown license");
                continue;
            };
            for pid in &license.products {
                if let Some(view) = products.get_mut(pid) {
                    view.license_unlock_index = Some(unlock);
                }
            }
        }

        let prices = &save.prices;
        let current = price_index("Prices", &prices.prices, &products);
        let player = price_index("PricesSetByPlayer", &prices.set_by_player, &products);
        let average = price_index("AverageCosts", &prices.average_costs, &products);
        let previous = price_index("PreviousPrices", &prices.previous_prices, &products);
        let daily = price_index("DailyPriceChanges", &prices.daily_price_changes, &products);

        for (id, view) in products.iter_mut() {
            view.average_cost = average.get(id).copied();
            view.previous_price = previous.get(id).copied();
            view.daily_price_change = daily.get(id).copied();
            if let Some(&price) = current.get(id) {
                let def = view.def;
                let model = PricingModel::new(
                    price,
                    player.get(id).copied(),
                    &def.pricing,
                    &game.price_curves,
                )
                .map_err(|source| ReportError::Pricing {
                    product_id: *id,
                    source,
                })?;
                view.pricing = Some(model);
            }
        }

        for slot in progression.displays.iter().flat_map(|d| &d.slots) {
            if let Some(pid) = slot.product_id {
                match products.get_mut(&pid) {
                    Some(view) => view.display_slots.push(slot),
                    None => debug!(product_id = pid.0, "display slot holds unknown product"),
                }
            }
        }
        for slot in progression.racks.iter().flat_map(|r| &r.slots) {
            if let Some(pid) = slot.product_id {
                match products.get_mut(&pid) {
                    Some(view) => view.rack_slots.push(slot),
                    None => debug!(product_id = pid.0, "rack slot assigned to unknown product"),
                }
            }
        }
        for b in &progression.boxes {
            match products.get_mut(&b.product_id) {
                Some(view) => view.unstored_boxes.push(b),
                None => debug!(product_id = b.product_id.0, "box holds unknown product"),
            }
        }

        Ok(Self {
            game,
            save,
            products,
        })
    }

    pub fn product(&self, id: ProductId) -> Option<&ProductView<'a>> {
        self.products.get(&id)
    }

    /// Every catalog product by id.
    pub fn products(&self) -> impl Iterator<Item = &ProductView<'a>> {
        self.products.values()
    }

    /// Unlocked products in display order.
    pub fn unlocked(&self) -> Vec<&ProductView<'a>> {
        let mut list: Vec<_> = self.products.values().filter(|p| p.is_unlocked()).collect();
        list.sort_by_key(|p| p.sort_key());
        list
    }
}

fn price_index(
    field: &'static str,
    list: &[ProductPrice],
    products: &BTreeMap<ProductId, ProductView<'_>>,
) -> BTreeMap<ProductId, f64> {
    let mut index = BTreeMap::new();
    for entry in list {
        if products.contains_key(&entry.product_id) {
            index.insert(entry.product_id, entry.price);
        } else {
            debug!(field, product_id = entry.product_id.0, "price for unknown product");
        }
    }
    index
}
