//! Text rendering of the store report.

use crate::table::{Align, Table};
use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use shop_core::{GameData, ProductDef};
use shop_report::{ProductView, PurchaseRow, ReportError, RoundingMode, StoreSnapshot};

const L: Align = Align::Left;
const R: Align = Align::Right;

/// Price with two decimals, or a placeholder when unknown.
pub fn as_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}$"),
        None => "-.--$".to_string(),
    }
}

pub fn as_money(value: Decimal) -> String {
    format!("{value:.2}$")
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn display_cell(p: &ProductView<'_>) -> String {
    format!(
        "{:>2} [{}]",
        p.displayed_items(),
        join(&p.displayed_items_per_slot())
    )
}

fn storage_cell(p: &ProductView<'_>) -> String {
    let slots: Vec<String> = p
        .stored_items_per_slot()
        .iter()
        .map(|slot| format!("[{}]", join(slot)))
        .collect();
    format!(
        "{:>3} {:>2} {}",
        p.stored_items(),
        p.stored_boxes(),
        slots.join(",")
    )
}

fn unstored_cell(p: &ProductView<'_>) -> String {
    format!(
        "{:>3} {:>2} [{}]",
        p.unstored_items(),
        p.unstored_box_count(),
        join(&p.unstored_items_per_box())
    )
}

fn price_and_chance(price: f64, chance: f64) -> String {
    format!("{}-{:>3}%", as_price(Some(price)), chance.round() as i64)
}

fn section(out: &mut String, title: &str, table: &Table) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&table.render());
    out.push('\n');
}

/// Every non-empty report section, in reading order.
pub fn render(snap: &StoreSnapshot<'_>, saved_at: Option<DateTime<Local>>) -> Result<String, ReportError> {
    let mut out = String::new();
    overview(&mut out, snap, saved_at)?;
    bills(&mut out, snap)?;
    price_updates(&mut out, snap);
    shelves(&mut out, snap);
    boxes(&mut out, snap);
    purchases(&mut out, snap)?;
    licenses(&mut out, snap);
    Ok(out)
}

fn overview(
    out: &mut String,
    snap: &StoreSnapshot<'_>,
    saved_at: Option<DateTime<Local>>,
) -> Result<(), ReportError> {
    let o = snap.overview()?;
    let mut t = Table::new(&[("Save time", R), ("Game day", R), ("Money", R), ("Level", R)]);
    t.row(vec![
        saved_at.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        o.game_day.to_string(),
        as_money(o.money),
        o.store_level.to_string(),
    ]);
    section(out, "General game data:", &t);
    Ok(())
}

fn bills(out: &mut String, snap: &StoreSnapshot<'_>) -> Result<(), ReportError> {
    let bills = snap.bills()?;
    let mut t = Table::new(&[("Expense Day", R), ("Type", L), ("Amount", R)]);
    for e in &bills.expenses {
        let kind = snap
            .game
            .payment_type_label(e.payment_type)
            .or_else(|| snap.game.payment_type_names.name(e.payment_type as u32))
            .map_or_else(|| format!("{:?}", e.payment_type), str::to_string);
        t.row(vec![e.date.to_string(), kind, as_price(Some(e.amount))]);
    }
    if !t.is_empty() {
        section(out, "Bills to pay:", &t);
    }
    Ok(())
}

fn price_updates(out: &mut String, snap: &StoreSnapshot<'_>) {
    let updates = snap.price_updates();
    if updates.rows.is_empty() {
        return;
    }
    let (rounded_header, best_header) = match updates.mode {
        RoundingMode::Exact => ("Round $/chance", "Best $/chance *"),
        RoundingMode::Rounded { .. } => ("Round $/chance *", "Best $/chance"),
    };
    let mut t = Table::new(&[
        ("Name", L),
        ("Brand", L),
        ("Opt/Max rate", R),
        ("Buy $", R),
        ("Opt $", R),
        ("Opt+ $", R),
        (rounded_header, R),
        (best_header, R),
        ("Max $", R),
        ("Sell $/chance", R),
        ("New $", R),
        ("Profit/sell", R),
        ("Profit*chance", R),
        ("Price change", R),
    ]);
    for row in &updates.rows {
        let (p, m) = (row.product, row.pricing);
        let params = m.params();
        let rounded = m.best_rounded_price();
        let best = m.best_continuous_price();
        let change = match p.daily_price_change {
            Some(daily) => format!("{} -> {}", as_price(p.previous_price), as_price(Some(daily))),
            None => String::new(),
        };
        t.row(vec![
            p.label.to_string(),
            p.def.brand.clone(),
            format!(
                "{}%-{:>3}%",
                params.optimum_profit_rate.round() as i64,
                params.max_profit_rate.round() as i64
            ),
            as_price(Some(m.current_price())),
            as_price(Some(m.optimum_price())),
            as_price(Some(m.optimum_price_100_percent_sell())),
            price_and_chance(rounded, m.purchase_chance(rounded)),
            price_and_chance(best, m.purchase_chance(best)),
            as_price(Some(m.max_price())),
            format!(
                "{}-{:>5.1}%",
                as_price(Some(m.selling_price())),
                m.current_purchase_chance()
            ),
            as_price(Some(row.recommended)),
            as_price(Some(m.selling_price() - m.current_price())),
            as_price(Some(m.current_profit_per_chance())),
            change,
        ]);
    }
    let note = match updates.mode {
        RoundingMode::Exact => {
            "Using exact prices: every cashier checkout goal is reached.".to_string()
        }
        RoundingMode::Rounded {
            remaining_checkouts: n,
        } => format!(
            "Using rounded prices: {n} more checkout{} before every cashier can be hired.",
            if n > 1 { "s" } else { "" }
        ),
    };
    section(out, &format!("Products to update prices:\n{note}"), &t);
}

fn stock_table(rows: &[&ProductView<'_>]) -> Table {
    let mut t = Table::new(&[
        ("Name", L),
        ("Brand", L),
        ("Storage #it #boxes #/boxes", L),
        ("Unstored", L),
    ]);
    for p in rows {
        t.row(vec![
            p.label.to_string(),
            p.def.brand.clone(),
            storage_cell(p),
            unstored_cell(p),
        ]);
    }
    t
}

fn shelves(out: &mut String, snap: &StoreSnapshot<'_>) {
    let shelves = snap.shelves_to_fill();
    if shelves.rows.is_empty() {
        return;
    }
    let mut t = Table::new(&[
        ("Name", L),
        ("Brand", L),
        ("Max/slot", L),
        ("Display #it #/slot", L),
        ("Storage #it #boxes #/boxes", L),
        ("Unstored", L),
    ]);
    for p in &shelves.rows {
        t.row(vec![
            p.label.to_string(),
            p.def.brand.clone(),
            p.def.amount_on_display.to_string(),
            display_cell(p),
            storage_cell(p),
            unstored_cell(p),
        ]);
    }
    let title = if shelves.with_restockers {
        "Store shelves that restockers can't fully restock themselves:"
    } else {
        "Store shelves to fill:"
    };
    section(out, title, &t);
}

fn boxes(out: &mut String, snap: &StoreSnapshot<'_>) {
    let to_store = snap.boxes_to_store();
    if !to_store.is_empty() {
        section(out, "Boxes to put in storage shelves:", &stock_table(&to_store));
    }
    let to_merge = snap.boxes_to_merge();
    if !to_merge.is_empty() {
        section(out, "Boxes to merge contents:", &stock_table(&to_merge));
    }
}

fn purchase_table(rows: &[PurchaseRow<'_, '_>]) -> Table {
    let mut t = Table::new(&[
        ("Name", L),
        ("Brand", L),
        ("To buy", R),
        ("Total", R),
        ("Unit $", R),
        ("#/box", R),
        ("Box $", R),
        ("Prio", R),
        ("Storage #it #boxes #/boxes", L),
        ("Unstored", L),
    ]);
    for r in rows {
        let p = r.product;
        t.row(vec![
            p.label.to_string(),
            p.def.brand.clone(),
            r.boxes.to_string(),
            as_money(r.cost),
            as_price(p.pricing.as_ref().map(|m| m.current_price())),
            p.def.amount_on_purchase.to_string(),
            as_money(r.box_price),
            format!("{:.1}", r.priority),
            storage_cell(p),
            unstored_cell(p),
        ]);
    }
    t
}

fn purchases(out: &mut String, snap: &StoreSnapshot<'_>) -> Result<(), ReportError> {
    let plan = snap.purchase_plan()?;
    if !plan.urgent.is_empty() {
        section(out, "Boxes to buy urgently:", &purchase_table(&plan.urgent));
        out.push_str(&format!(
            "Total amount with estimated shipping: {}\n\n",
            as_money(plan.urgent_total)
        ));
    }
    if !plan.eventual.is_empty() {
        section(out, "Boxes to buy eventually:", &purchase_table(&plan.eventual));
        out.push_str(&format!(
            "Total amount without shipping: {}\n\n",
            as_money(plan.eventual_total)
        ));
    }
    Ok(())
}

fn box_size_cell(game: &GameData, def: &ProductDef) -> String {
    let name = game
        .box_size_name(def.box_size)
        .map_or_else(|| def.box_size.0.to_string(), str::to_lowercase);
    let per_slot = game.box_def(def.box_size).map_or(0, |b| b.boxes_per_rack_slot);
    format!("{name} ({per_slot})")
}

fn display_type_cell(game: &GameData, def: &ProductDef) -> String {
    game.display_type_label(def.display_type)
        .or_else(|| game.display_type_names.name(def.display_type))
        .map_or_else(|| def.display_type.to_string(), str::to_string)
}

fn licenses(out: &mut String, snap: &StoreSnapshot<'_>) {
    let unlockable = snap.unlockable_licenses();
    if unlockable.is_empty() {
        return;
    }
    out.push_str("Next unlockable licenses:\n");
    for entry in &unlockable {
        let license = entry.license;
        let mut head = Table::new(&[("License: Id", R), ("Cost", R)]);
        head.row(vec![
            license.id.to_string(),
            as_price(Some(license.purchasing_cost)),
        ]);
        out.push_str(&head.render());

        let mut t = Table::new(&[
            ("Products: Name", L),
            ("Brand", L),
            ("Price (min-max)", R),
            ("#/box", R),
            ("Box price (min-max)", R),
            ("Box size (#/stor.)", L),
            ("Display", L),
            ("#/display", L),
        ]);
        for p in &entry.products {
            let def = p.def;
            let per_box = f64::from(def.amount_on_purchase);
            t.row(vec![
                p.label.to_string(),
                def.brand.clone(),
                format!(
                    "{:>7}-{:>7}",
                    as_price(Some(def.min_dynamic_price)),
                    as_price(Some(def.max_dynamic_price))
                ),
                def.amount_on_purchase.to_string(),
                format!(
                    "{:>7}-{:>7}",
                    as_price(Some(def.min_dynamic_price * per_box)),
                    as_price(Some(def.max_dynamic_price * per_box))
                ),
                box_size_cell(snap.game, def),
                display_type_cell(snap.game, def),
                def.amount_on_display.to_string(),
            ]);
        }
        out.push_str(&t.render());
        out.push('\n');
    }
}
