//! Static game data: products, licenses, boxes, cashiers and price curves.

use crate::es3::{self, lenient_i64, RawEnum, Wrapped};
use crate::save::PaymentType;
use crate::{finite, Curve, LoadError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Product identifier as used by the game (`ID` field, `ProductID` in saves).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u32);

/// Product license identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LicenseId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LicenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Box-size tag: the ordinal of the game's box-size enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoxSize(pub u8);

/// Catalog pricing inputs of one product.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingParameters {
    /// Catalog base price (> 0). The live buy price comes from the save.
    pub base_price: f64,
    /// Markup percentage where the "cheap" curve hands over to the "expensive" one.
    pub optimum_profit_rate: f64,
    /// Markup percentage above which nobody buys.
    pub max_profit_rate: f64,
}

impl PricingParameters {
    /// Validate `base_price > 0` and `0 < optimum < max`.
    pub fn new(
        base_price: f64,
        optimum_profit_rate: f64,
        max_profit_rate: f64,
    ) -> Result<Self, ValidationError> {
        finite("base_price", base_price)?;
        finite("optimum_profit_rate", optimum_profit_rate)?;
        finite("max_profit_rate", max_profit_rate)?;
        if base_price <= 0.0 {
            return Err(ValidationError::NonPositivePrice(base_price));
        }
        if !(0.0 < optimum_profit_rate && optimum_profit_rate < max_profit_rate) {
            return Err(ValidationError::InvalidProfitRates {
                optimum: optimum_profit_rate,
                max: max_profit_rate,
            });
        }
        Ok(Self {
            base_price,
            optimum_profit_rate,
            max_profit_rate,
        })
    }
}

/// A product definition from the game sources.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductDef {
    pub asset_id: i64,
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub display_type: u32,
    pub category: u32,
    /// Items in one purchased box (> 0).
    pub amount_on_purchase: u32,
    pub pricing: PricingParameters,
    pub min_dynamic_price: f64,
    pub max_dynamic_price: f64,
    pub box_size: BoxSize,
    /// Items one display slot holds.
    pub amount_on_display: u32,
    /// License selling this product, if any license lists it.
    pub license: Option<LicenseId>,
    /// Position within that license's product list.
    pub index_in_license: Option<usize>,
}

/// A purchasable product license.
#[derive(Clone, Debug, PartialEq)]
pub struct License {
    pub asset_id: i64,
    pub id: LicenseId,
    pub required_player_level: u32,
    pub purchasing_cost: f64,
    /// Products in authoring order.
    pub products: Vec<ProductId>,
}

/// Box metadata for one box size.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxDef {
    pub asset_id: i64,
    pub id: u32,
    pub size: BoxSize,
    /// Boxes of this size one rack slot holds.
    pub boxes_per_rack_slot: u32,
}

/// Box definitions indexed by box-size ordinal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxTable {
    by_size: Vec<Option<BoxDef>>,
}

impl BoxTable {
    pub fn insert(&mut self, def: BoxDef) {
        let idx = def.size.0 as usize;
        if self.by_size.len() <= idx {
            self.by_size.resize(idx + 1, None);
        }
        self.by_size[idx] = Some(def);
    }

    pub fn get(&self, size: BoxSize) -> Option<&BoxDef> {
        self.by_size.get(size.0 as usize).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoxDef> {
        self.by_size.iter().flatten()
    }
}

/// A hireable cashier.
#[derive(Clone, Debug, PartialEq)]
pub struct Cashier {
    pub asset_id: i64,
    pub id: u32,
    pub name: String,
    pub daily_wage: f64,
    pub hiring_cost: f64,
    /// Completed checkouts needed before this cashier can be hired.
    pub checkout_goal_to_unlock: u32,
    pub required_store_level: u32,
}

/// The two purchase-chance response curves shared by every product.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PriceCurves {
    /// Chance for markups in `[0, optimum)`, keyed on normalized progress.
    #[serde(rename = "m_PurchaseChanceCurveForCheapPrice")]
    pub cheap: Curve,
    /// Chance for markups in `[optimum, max)`.
    #[serde(rename = "m_PurchaseChanceCurveForExpensivePrice")]
    pub expensive: Curve,
}

/// Names of a game enum by ordinal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumNames {
    by_ordinal: BTreeMap<u32, String>,
}

impl EnumNames {
    pub fn name(&self, ordinal: u32) -> Option<&str> {
        self.by_ordinal.get(&ordinal).map(String::as_str)
    }
}

impl From<RawEnum> for EnumNames {
    fn from(raw: RawEnum) -> Self {
        let by_ordinal = match raw {
            RawEnum::List(names) => (0u32..).zip(names).collect(),
            RawEnum::Map(map) => map.into_iter().map(|(name, ord)| (ord, name)).collect(),
        };
        Self { by_ordinal }
    }
}

/// Validated snapshot of `game-data.dat`.
#[derive(Clone, Debug, PartialEq)]
pub struct GameData {
    pub products: BTreeMap<ProductId, ProductDef>,
    pub licenses: BTreeMap<LicenseId, License>,
    pub boxes: BoxTable,
    pub cashiers: Vec<Cashier>,
    pub price_curves: PriceCurves,
    pub box_size_names: EnumNames,
    pub display_type_names: EnumNames,
    pub category_names: EnumNames,
    pub payment_type_names: EnumNames,
    pub product_labels: BTreeMap<ProductId, String>,
    pub license_labels: BTreeMap<LicenseId, String>,
    pub payment_type_labels: BTreeMap<u32, String>,
    pub display_type_labels: BTreeMap<u32, String>,
}

impl GameData {
    /// Read and validate a game-data file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw: RawGameData = es3::read_file(path)?;
        let data = Self::from_raw(raw)?;
        info!(
            path = %path.display(),
            products = data.products.len(),
            licenses = data.licenses.len(),
            "game data loaded"
        );
        Ok(data)
    }

    /// Parse and validate game data from ES3 text.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let raw: RawGameData = es3::from_str(text)?;
        Ok(Self::from_raw(raw)?)
    }

    /// Build the typed catalog, resolving license → product asset references.
    pub fn from_raw(raw: RawGameData) -> Result<Self, ValidationError> {
        let mut boxes = BoxTable::default();
        for b in raw.boxes.value {
            boxes.insert(BoxDef {
                asset_id: b.asset_id,
                id: b.id,
                size: BoxSize(b.box_size),
                boxes_per_rack_slot: b.layout.box_count,
            });
        }

        let mut products = BTreeMap::new();
        let mut by_asset: HashMap<i64, ProductId> = HashMap::new();
        for p in raw.products.value {
            let id = p.id;
            let def = p.into_def(&boxes).map_err(|e| ValidationError::Product {
                id,
                source: Box::new(e),
            })?;
            by_asset.insert(def.asset_id, id);
            if products.insert(id, def).is_some() {
                return Err(ValidationError::DuplicateProduct(id));
            }
        }

        let mut licenses = BTreeMap::new();
        for l in raw.licenses.value {
            let mut product_ids = Vec::with_capacity(l.products.len());
            for (i, r) in l.products.iter().enumerate() {
                let Some(pid) = by_asset.get(&r.asset_id).copied() else {
                    warn!(
                        license = l.id.0,
                        asset_id = r.asset_id,
                        "license references unknown product asset"
                    );
                    continue;
                };
                if let Some(def) = products.get_mut(&pid) {
                    def.license = Some(l.id);
                    def.index_in_license = Some(i);
                }
                product_ids.push(pid);
            }
            let license = License {
                asset_id: l.asset_id,
                id: l.id,
                required_player_level: l.required_player_level,
                purchasing_cost: finite("PurchasingCost", l.purchasing_cost)?,
                products: product_ids,
            };
            if licenses.insert(l.id, license).is_some() {
                return Err(ValidationError::DuplicateLicense(l.id));
            }
        }

        let cashiers = raw
            .cashiers
            .value
            .into_iter()
            .map(|c| Cashier {
                asset_id: c.asset_id,
                id: c.id,
                name: c.name,
                daily_wage: c.daily_wage,
                hiring_cost: c.hiring_cost,
                checkout_goal_to_unlock: c.checkout_goal_to_unlock,
                required_store_level: c.required_store_level,
            })
            .collect();

        let names = |e: Option<Wrapped<RawEnum>>| {
            e.map(|w| EnumNames::from(w.value)).unwrap_or_default()
        };
        let payment_type_labels = raw
            .payment_type_localization
            .map(|w| w.value)
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.trim_matches(|c| c == ' ' || c == ':').to_string()))
            .collect();

        Ok(Self {
            products,
            licenses,
            boxes,
            cashiers,
            price_curves: raw.price_curves.value,
            box_size_names: names(raw.box_size_enum),
            display_type_names: names(raw.display_type_enum),
            category_names: names(raw.category_enum),
            payment_type_names: names(raw.payment_type_enum),
            product_labels: raw.products_localization.map(|w| w.value).unwrap_or_default(),
            license_labels: raw.licenses_localization.map(|w| w.value).unwrap_or_default(),
            payment_type_labels,
            display_type_labels: raw
                .display_type_localization
                .map(|w| w.value)
                .unwrap_or_default(),
        })
    }

    pub fn product(&self, id: ProductId) -> Option<&ProductDef> {
        self.products.get(&id)
    }

    pub fn license(&self, id: LicenseId) -> Option<&License> {
        self.licenses.get(&id)
    }

    pub fn box_def(&self, size: BoxSize) -> Option<&BoxDef> {
        self.boxes.get(size)
    }

    /// Localized product name, falling back to the asset's own name.
    pub fn product_label<'a>(&'a self, def: &'a ProductDef) -> &'a str {
        self.product_labels
            .get(&def.id)
            .map(String::as_str)
            .unwrap_or(&def.name)
    }

    pub fn payment_type_label(&self, kind: PaymentType) -> Option<&str> {
        self.payment_type_labels
            .get(&(kind as u32))
            .map(String::as_str)
    }

    pub fn display_type_label(&self, display_type: u32) -> Option<&str> {
        self.display_type_labels
            .get(&display_type)
            .map(String::as_str)
    }

    pub fn box_size_name(&self, size: BoxSize) -> Option<&str> {
        self.box_size_names.name(size.0 as u32)
    }

    /// Highest checkout goal across all cashiers; 0 without cashiers.
    pub fn max_checkout_goal(&self) -> u32 {
        self.cashiers
            .iter()
            .map(|c| c.checkout_goal_to_unlock)
            .max()
            .unwrap_or(0)
    }
}

/// `game-data.dat` as written to disk.
#[derive(Deserialize)]
pub struct RawGameData {
    products: Wrapped<Vec<RawProduct>>,
    licenses: Wrapped<Vec<RawLicense>>,
    boxes: Wrapped<Vec<RawBox>>,
    #[serde(default = "no_cashiers")]
    cashiers: Wrapped<Vec<RawCashier>>,
    #[serde(rename = "price-curves")]
    price_curves: Wrapped<PriceCurves>,
    #[serde(rename = "boxsize-enum", default)]
    box_size_enum: Option<Wrapped<RawEnum>>,
    #[serde(rename = "displaytype-enum", default)]
    display_type_enum: Option<Wrapped<RawEnum>>,
    #[serde(rename = "productcategory-enum", default)]
    category_enum: Option<Wrapped<RawEnum>>,
    #[serde(rename = "playerpaymenttype-enum", default)]
    payment_type_enum: Option<Wrapped<RawEnum>>,
    #[serde(rename = "products-localization", default)]
    products_localization: Option<Wrapped<BTreeMap<ProductId, String>>>,
    #[serde(rename = "licenses-localization", default)]
    licenses_localization: Option<Wrapped<BTreeMap<LicenseId, String>>>,
    #[serde(rename = "playerpaymenttype-localization", default)]
    payment_type_localization: Option<Wrapped<BTreeMap<u32, String>>>,
    #[serde(rename = "displaytype-localization", default)]
    display_type_localization: Option<Wrapped<BTreeMap<u32, String>>>,
}

fn no_cashiers() -> Wrapped<Vec<RawCashier>> {
    Wrapped { value: Vec::new() }
}

#[derive(Deserialize)]
struct RawProduct {
    #[serde(rename = "_ES3Ref", deserialize_with = "lenient_i64")]
    asset_id: i64,
    #[serde(rename = "ID")]
    id: ProductId,
    #[serde(rename = "ProductName", default)]
    name: String,
    #[serde(rename = "ProductBrand", default)]
    brand: String,
    #[serde(rename = "ProductDisplayType", default)]
    display_type: u32,
    #[serde(rename = "Category", default)]
    category: u32,
    #[serde(rename = "ProductAmountOnPurchase")]
    amount_on_purchase: u32,
    #[serde(rename = "BasePrice")]
    base_price: f64,
    #[serde(rename = "MinDynamicPrice", default)]
    min_dynamic_price: f64,
    #[serde(rename = "MaxDynamicPrice", default)]
    max_dynamic_price: f64,
    #[serde(rename = "OptimumProfitRate")]
    optimum_profit_rate: f64,
    #[serde(rename = "MaxProfitRate")]
    max_profit_rate: f64,
    #[serde(rename = "GridLayoutInBox")]
    box_layout: RawBoxLayout,
    #[serde(rename = "GridLayoutInStorage")]
    display_layout: RawDisplayLayout,
}

impl RawProduct {
    fn into_def(self, boxes: &BoxTable) -> Result<ProductDef, ValidationError> {
        let pricing = PricingParameters::new(
            self.base_price,
            self.optimum_profit_rate,
            self.max_profit_rate,
        )?;
        if self.amount_on_purchase == 0 {
            return Err(ValidationError::EmptyBox);
        }
        let box_size = BoxSize(self.box_layout.box_size);
        if boxes.get(box_size).is_none() {
            return Err(ValidationError::UnknownBoxSize(box_size.0));
        }
        Ok(ProductDef {
            asset_id: self.asset_id,
            id: self.id,
            name: self.name,
            brand: self.brand,
            display_type: self.display_type,
            category: self.category,
            amount_on_purchase: self.amount_on_purchase,
            pricing,
            min_dynamic_price: finite("MinDynamicPrice", self.min_dynamic_price)?,
            max_dynamic_price: finite("MaxDynamicPrice", self.max_dynamic_price)?,
            box_size,
            amount_on_display: self.display_layout.product_count,
            license: None,
            index_in_license: None,
        })
    }
}

#[derive(Deserialize)]
struct RawBoxLayout {
    #[serde(rename = "boxSize")]
    box_size: u8,
}

#[derive(Deserialize)]
struct RawDisplayLayout {
    #[serde(rename = "productCount")]
    product_count: u32,
}

#[derive(Deserialize)]
struct RawAssetRef {
    #[serde(rename = "_ES3Ref", deserialize_with = "lenient_i64")]
    asset_id: i64,
}

#[derive(Deserialize)]
struct RawLicense {
    #[serde(rename = "_ES3Ref", deserialize_with = "lenient_i64")]
    asset_id: i64,
    #[serde(rename = "ID")]
    id: LicenseId,
    #[serde(rename = "RequiredPlayerLevel", default)]
    required_player_level: u32,
    #[serde(rename = "PurchasingCost", default)]
    purchasing_cost: f64,
    #[serde(rename = "Products", default)]
    products: Vec<RawAssetRef>,
}

#[derive(Deserialize)]
struct RawBox {
    #[serde(rename = "_ES3Ref", deserialize_with = "lenient_i64")]
    asset_id: i64,
    #[serde(rename = "ID")]
    id: u32,
    #[serde(rename = "BoxSize")]
    box_size: u8,
    #[serde(rename = "GridLayout")]
    layout: RawBoxGrid,
}

#[derive(Deserialize)]
struct RawBoxGrid {
    #[serde(rename = "boxCount")]
    box_count: u32,
}

#[derive(Deserialize)]
struct RawCashier {
    #[serde(rename = "_ES3Ref", deserialize_with = "lenient_i64")]
    asset_id: i64,
    #[serde(rename = "ID")]
    id: u32,
    #[serde(rename = "CashierName", default)]
    name: String,
    #[serde(rename = "DailyWage", default)]
    daily_wage: f64,
    #[serde(rename = "HiringCost", default)]
    hiring_cost: f64,
    #[serde(rename = "CheckoutGoalToUnlock", default)]
    checkout_goal_to_unlock: u32,
    #[serde(rename = "RequiredStoreLevel", default)]
    required_store_level: u32,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Minimal game-data document: two products in one license, one orphan
    /// reference, one box size, two cashiers.
    pub(crate) const GAME_DATA: &str = r#"{
        "products": {"__type": "ProductSO[]", "value": [
            {"_ES3Ref": "1001", "ID": 1, "ProductName": "Cereal", "ProductBrand": "Crunch",
             "ProductDisplayType": 0, "Category": 2, "ProductAmountOnPurchase": 8,
             "BasePrice": 3.5, "MinDynamicPrice": 3.0, "MaxDynamicPrice": 4.0,
             "OptimumProfitRate": 30, "MaxProfitRate": 80,
             "GridLayoutInBox": {"boxSize": 1}, "GridLayoutInStorage": {"productCount": 12}},
            {"_ES3Ref": "1002", "ID": 2, "ProductName": "Milk", "ProductBrand": "Moo",
             "ProductDisplayType": 1, "Category": 0, "ProductAmountOnPurchase": 6,
             "BasePrice": 2.0, "MinDynamicPrice": 1.8, "MaxDynamicPrice": 2.2,
             "OptimumProfitRate": 20.0, "MaxProfitRate": 50.0,
             "GridLayoutInBox": {"boxSize": 1}, "GridLayoutInStorage": {"productCount": 9}}
        ]},
        "licenses": {"__type": "ProductLicenseSO[]", "value": [
            {"_ES3Ref": "2001", "ID": 0, "RequiredPlayerLevel": 0, "PurchasingCost": 0,
             "Products": [{"_ES3Ref": "1002"}, {"_ES3Ref": "9999"}, {"_ES3Ref": "1001"}]}
        ]},
        "boxes": {"__type": "BoxSO[]", "value": [
            {"_ES3Ref": "3001", "ID": 0, "BoxSize": 1, "GridLayout": {"boxCount": 4}}
        ]},
        "cashiers": {"__type": "CashierSO[]", "value": [
            {"_ES3Ref": "4001", "ID": 0, "CashierName": "Ann", "DailyWage": 20, "HiringCost": 50,
             "CheckoutGoalToUnlock": 100, "RequiredStoreLevel": 1},
            {"_ES3Ref": "4002", "ID": 1, "CashierName": "Bob", "DailyWage": 25, "HiringCost": 80,
             "CheckoutGoalToUnlock": 400, "RequiredStoreLevel": 3}
        ]},
        "price-curves": {"__type": "PriceCurvesSO", "value": {
            "m_PurchaseChanceCurveForCheapPrice": {"keys": [
                {"time": 0.0, "value": 100.0, "inTangent": 0.0, "outTangent": 0.0},
                {"time": 1.0, "value": 90.0, "inTangent": 0.0, "outTangent": 0.0}
            ], "preWrapMode": 8, "postWrapMode": 8},
            "m_PurchaseChanceCurveForExpensivePrice": {"keys": [
                {"time": 1.0, "value": 0.0, "inTangent": 0.0, "outTangent": 0.0},
                {"time": 0.0, "value": 90.0, "inTangent": 0.0, "outTangent": 0.0}
            ], "preWrapMode": 8, "postWrapMode": 8}
        }},
        "boxsize-enum": {"__type": "string[]", "value": ["Small", "Medium"]},
        "products-localization": {"__type": "Dictionary", "value": {1:"Corn Flakes",2:"Whole Milk"}},
        "playerpaymenttype-localization": {"__type": "Dictionary", "value": {0:"Rent :",1:" Bill:"}}
    }"#;

    #[test]
    fn parses_and_resolves_licenses() {
        let data = GameData::parse(GAME_DATA).unwrap();
        assert_eq!(data.products.len(), 2);
        let license = data.license(LicenseId(0)).unwrap();
        assert_eq!(license.products, vec![ProductId(2), ProductId(1)]);
        let cereal = data.product(ProductId(1)).unwrap();
        assert_eq!(cereal.license, Some(LicenseId(0)));
        // the orphan reference still occupies position 1
        assert_eq!(cereal.index_in_license, Some(2));
        assert_eq!(cereal.pricing.optimum_profit_rate, 30.0);
        assert_eq!(data.product_label(cereal), "Corn Flakes");
        assert_eq!(data.box_def(cereal.box_size).unwrap().boxes_per_rack_slot, 4);
        assert_eq!(data.box_size_name(cereal.box_size), Some("Medium"));
        assert_eq!(data.max_checkout_goal(), 400);
        assert_eq!(data.payment_type_label(PaymentType::Bill), Some("Bill"));
        assert_eq!(data.payment_type_label(PaymentType::Rent), Some("Rent"));
    }

    #[test]
    fn curves_are_sorted_after_load() {
        let data = GameData::parse(GAME_DATA).unwrap();
        let curves = &data.price_curves;
        assert_eq!(curves.expensive.keys()[0].time, 0.0);
        assert_eq!(curves.expensive.keys()[0].value, 90.0);
    }

    #[test]
    fn inverted_profit_rates_rejected() {
        let text = GAME_DATA.replace("\"MaxProfitRate\": 80", "\"MaxProfitRate\": 10");
        let err = GameData::parse(&text).unwrap_err();
        match err {
            LoadError::Invalid(ValidationError::Product { id, source }) => {
                assert_eq!(id, ProductId(1));
                assert_eq!(
                    *source,
                    ValidationError::InvalidProfitRates {
                        optimum: 30.0,
                        max: 10.0
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_box_size_rejected() {
        let text = GAME_DATA.replace("\"BoxSize\": 1", "\"BoxSize\": 0");
        assert!(matches!(
            GameData::parse(&text),
            Err(LoadError::Invalid(ValidationError::Product { .. }))
        ));
    }

    #[test]
    fn empty_curve_is_a_load_error() {
        let text = GAME_DATA.replace(
            r#""m_PurchaseChanceCurveForExpensivePrice": {"keys": ["#,
            r#""m_PurchaseChanceCurveForExpensivePrice": {"keys": [], "unused": ["#,
        );
        assert!(GameData::parse(&text).is_err());
    }

    #[test]
    fn box_table_indexes_by_ordinal() {
        let mut t = BoxTable::default();
        t.insert(BoxDef {
            asset_id: 1,
            id: 3,
            size: BoxSize(3),
            boxes_per_rack_slot: 2,
        });
        assert!(t.get(BoxSize(0)).is_none());
        assert_eq!(t.get(BoxSize(3)).unwrap().id, 3);
        assert!(t.get(BoxSize(9)).is_none());
        assert_eq!(t.iter().count(), 1);
    }

    #[test]
    fn enum_names_from_map() {
        let mut m = BTreeMap::new();
        m.insert("Large".to_string(), 5);
        let names = EnumNames::from(RawEnum::Map(m));
        assert_eq!(names.name(5), Some("Large"));
        assert_eq!(names.name(0), None);
    }

    proptest! {
        #[test]
        fn valid_pricing_parameters_accepted(base in 0.01f64..1_000.0, opt in 0.1f64..100.0, extra in 0.1f64..200.0) {
            prop_assert!(PricingParameters::new(base, opt, opt + extra).is_ok());
            prop_assert!(PricingParameters::new(-base, opt, opt + extra).is_err());
            prop_assert!(PricingParameters::new(base, opt + extra, opt).is_err());
        }
    }
}
