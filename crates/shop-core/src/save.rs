//! Live save-state: prices, stock locations, expenses and progression.

use crate::es3::{self, Wrapped};
use crate::{LoadError, ProductId, ValidationError};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Kind of a pending payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "i64")]
pub enum PaymentType {
    Rent = 0,
    Bill = 1,
    Loan = 2,
    Staff = 3,
}

impl TryFrom<i64> for PaymentType {
    type Error = ValidationError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(PaymentType::Rent),
            1 => Ok(PaymentType::Bill),
            2 => Ok(PaymentType::Loan),
            3 => Ok(PaymentType::Staff),
            other => Err(ValidationError::UnknownPaymentType(other)),
        }
    }
}

/// A payment awaiting settlement.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Expense {
    /// Game day the expense was issued.
    #[serde(rename = "Date")]
    pub date: u32,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "PaymentType")]
    pub payment_type: PaymentType,
    #[serde(rename = "LatePaymentFee", default)]
    pub late_payment_fee: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Expenses {
    #[serde(rename = "Bills", default)]
    pub bills: Vec<Expense>,
    #[serde(rename = "Rents", default)]
    pub rents: Vec<Expense>,
    #[serde(rename = "LoanRepayments", default)]
    pub loan_repayments: Vec<Expense>,
}

impl Expenses {
    /// Bills, then rents, then loan repayments.
    pub fn all(&self) -> impl Iterator<Item = &Expense> {
        self.bills
            .iter()
            .chain(&self.rents)
            .chain(&self.loan_repayments)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ProductPrice {
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    #[serde(rename = "Price")]
    pub price: f64,
}

/// Per-product price lists kept by the game.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PriceBook {
    /// Current buy price of each product.
    #[serde(rename = "Prices", default)]
    pub prices: Vec<ProductPrice>,
    #[serde(rename = "PricesSetByPlayer", default)]
    pub set_by_player: Vec<ProductPrice>,
    #[serde(rename = "AverageCosts", default)]
    pub average_costs: Vec<ProductPrice>,
    #[serde(rename = "DailyPriceChanges", default)]
    pub daily_price_changes: Vec<ProductPrice>,
    #[serde(rename = "PreviousPrices", default)]
    pub previous_prices: Vec<ProductPrice>,
}

/// A product box, either on the floor or racked in storage.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StoredBox {
    #[serde(rename = "IsOpen", default)]
    pub is_open: bool,
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    #[serde(rename = "ProductCount")]
    pub product_count: u32,
}

/// One slot of a display furniture. The game allows a single product per
/// slot; an empty slot has no product.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawDisplaySlot")]
pub struct DisplaySlot {
    pub product_id: Option<ProductId>,
    pub product_count: u32,
}

#[derive(Deserialize)]
struct RawDisplaySlot {
    #[serde(rename = "Products", default)]
    products: BTreeMap<ProductId, u32>,
}

impl From<RawDisplaySlot> for DisplaySlot {
    fn from(raw: RawDisplaySlot) -> Self {
        match raw.products.into_iter().next() {
            Some((id, count)) => DisplaySlot {
                product_id: Some(id),
                product_count: count,
            },
            None => DisplaySlot {
                product_id: None,
                product_count: 0,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DisplayFurniture {
    #[serde(rename = "FurnitureID", default)]
    pub furniture_id: i64,
    #[serde(rename = "DisplaySlots", default)]
    pub slots: Vec<DisplaySlot>,
}

/// A storage rack slot, assigned to one product (`ProductID == -1` when free).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RackSlot {
    #[serde(rename = "ProductID", deserialize_with = "assigned_product")]
    pub product_id: Option<ProductId>,
    #[serde(rename = "RackedBoxDatas", default)]
    pub boxes: Vec<StoredBox>,
}

fn assigned_product<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ProductId>, D::Error> {
    let raw = i64::deserialize(d)?;
    Ok(u32::try_from(raw).ok().map(ProductId))
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RackFurniture {
    #[serde(rename = "FurnitureID", default)]
    pub furniture_id: i64,
    #[serde(rename = "RackSlots", default)]
    pub slots: Vec<RackSlot>,
}

/// Store progression and physical stock.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Progression {
    /// Purchased licenses in purchase order.
    #[serde(rename = "UnlockedLicenses", default)]
    pub unlocked_licenses: Vec<u32>,
    #[serde(rename = "Money", default)]
    pub money: f64,
    /// Boxes lying around outside storage racks.
    #[serde(rename = "BoxDatas", default)]
    pub boxes: Vec<StoredBox>,
    #[serde(rename = "DisplayDatas", default)]
    pub displays: Vec<DisplayFurniture>,
    #[serde(rename = "RackDatas", default)]
    pub racks: Vec<RackFurniture>,
    #[serde(rename = "CurrentDay", default)]
    pub current_day: u32,
    #[serde(rename = "CompletedCheckoutCount", default)]
    pub completed_checkout_count: u32,
    #[serde(rename = "CurrentStorePoint", default)]
    pub current_store_point: u32,
    #[serde(rename = "CurrentStoreLevel", default)]
    pub current_store_level: u32,
    #[serde(rename = "StoreUpgradeLevel", default)]
    pub store_upgrade_level: u32,
    #[serde(rename = "IsStoreOpen", default)]
    pub is_store_open: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Employees {
    /// Number of hired restockers.
    #[serde(rename = "Restockers", default, deserialize_with = "count_entries")]
    pub restockers: usize,
}

fn count_entries<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    Vec::<IgnoredAny>::deserialize(d).map(|v| v.len())
}

/// Snapshot of `SaveFile.es3`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SaveData {
    #[serde(rename = "Expenses", deserialize_with = "unwrap_value", default)]
    pub expenses: Expenses,
    #[serde(rename = "Price", deserialize_with = "unwrap_value", default)]
    pub prices: PriceBook,
    #[serde(rename = "Progression", deserialize_with = "unwrap_value")]
    pub progression: Progression,
    #[serde(rename = "Employees", deserialize_with = "unwrap_value", default)]
    pub employees: Employees,
}

fn unwrap_value<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Wrapped::<T>::deserialize(d).map(|w| w.value)
}

impl SaveData {
    /// Read a save file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let save: SaveData = es3::read_file(path)?;
        info!(
            path = %path.display(),
            day = save.progression.current_day,
            licenses = save.progression.unlocked_licenses.len(),
            "save loaded"
        );
        Ok(save)
    }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        es3::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVE: &str = r#"{
        "Expenses": {"__type": "ExpensesData", "value": {
            "Bills": [{"Date": 3, "Amount": 12.5, "PaymentType": 1, "LatePaymentFee": 0}],
            "Rents": [{"Date": 4, "Amount": 100, "PaymentType": 0, "LatePaymentFee": 5}],
            "LoanRepayments": []
        }},
        "Price": {"__type": "PriceData", "value": {
            "Prices": [{"ProductID": 1, "Price": 3.5}, {"ProductID": 2, "Price": 2.0}],
            "PricesSetByPlayer": [{"ProductID": 1, "Price": 4.0}],
            "AverageCosts": [], "DailyPriceChanges": [], "PreviousPrices": []
        }},
        "Progression": {"__type": "ProgressionData", "value": {
            "UnlockedLicenses": [0],
            "Money": 250.75,
            "BoxDatas": [{"IsOpen": false, "ProductID": 1, "ProductCount": 8}],
            "DisplayDatas": [{"FurnitureID": 10, "DisplaySlots": [
                {"Products": {1:5}}, {"Products": {}}
            ]}],
            "RackDatas": [{"FurnitureID": 20, "RackSlots": [
                {"ProductID": 1, "RackedBoxDatas": [{"IsOpen": true, "ProductID": 1, "ProductCount": 3}]},
                {"ProductID": -1, "RackedBoxDatas": []}
            ]}],
            "CurrentTime": 480.0, "CurrentDay": 7, "CompletedCheckoutCount": 120,
            "CurrentStorePoint": 40, "CurrentStoreLevel": 2, "StoreUpgradeLevel": 0,
            "IsStoreOpen": true
        }}
    }"#;

    #[test]
    fn parses_save_document() {
        let save = SaveData::parse(SAVE).unwrap();
        assert_eq!(save.prices.prices.len(), 2);
        assert_eq!(save.prices.set_by_player[0].price, 4.0);
        assert_eq!(save.progression.money, 250.75);
        assert_eq!(save.progression.current_store_level, 2);
        assert_eq!(save.employees.restockers, 0);

        let slots = &save.progression.displays[0].slots;
        assert_eq!(slots[0].product_id, Some(ProductId(1)));
        assert_eq!(slots[0].product_count, 5);
        assert_eq!(slots[1].product_id, None);

        let racks = &save.progression.racks[0].slots;
        assert_eq!(racks[0].product_id, Some(ProductId(1)));
        assert_eq!(racks[0].boxes[0].product_count, 3);
        assert_eq!(racks[1].product_id, None);
    }

    #[test]
    fn restockers_are_counted() {
        let text = SAVE.replacen(
            "\"Progression\":",
            "\"Employees\": {\"value\": {\"Restockers\": [{\"ID\": 0}, {\"ID\": 1}]}},\n        \"Progression\":",
            1,
        );
        let save = SaveData::parse(&text).unwrap();
        assert_eq!(save.employees.restockers, 2);
    }

    #[test]
    fn expenses_in_report_order() {
        let save = SaveData::parse(SAVE).unwrap();
        let kinds: Vec<PaymentType> = save.expenses.all().map(|e| e.payment_type).collect();
        assert_eq!(kinds, vec![PaymentType::Bill, PaymentType::Rent]);
    }

    #[test]
    fn unknown_payment_type_rejected() {
        let text = SAVE.replace("\"PaymentType\": 1", "\"PaymentType\": 9");
        assert!(SaveData::parse(&text).is_err());
        assert_eq!(
            PaymentType::try_from(9),
            Err(ValidationError::UnknownPaymentType(9))
        );
    }
}
