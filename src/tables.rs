use std::fmt::Display;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    quantity::{Zero, percent::Percent, power::Watts},
    summary::{StorageDirection, Summary},
};

pub fn build_summary_table(summary: &Summary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling()
        .set_header(vec![
            Cell::new("Category"),
            Cell::new("Flow"),
            Cell::new("Power").set_alignment(CellAlignment::Right),
            Cell::new("Maximum").set_alignment(CellAlignment::Right),
            Cell::new("Ratio").set_alignment(CellAlignment::Right),
            Cell::new("SoC").set_alignment(CellAlignment::Right),
        ]);

    let storage = &summary.storage;
    let direction = storage.direction();
    table.add_row(vec![
        Cell::new("Storage"),
        Cell::new(direction).fg(match direction {
            StorageDirection::Charging => Color::Green,
            StorageDirection::Discharging => Color::DarkYellow,
            StorageDirection::Idle => Color::Reset,
        }),
        optional_cell(storage.active_power()),
        optional_cell(match direction {
            StorageDirection::Charging => storage.max_charge_active_power,
            StorageDirection::Discharging | StorageDirection::Idle => {
                storage.max_discharge_active_power
            }
        }),
        optional_cell(None::<Percent>),
        optional_cell(storage.soc),
    ]);

    let grid = &summary.grid;
    let is_buying = grid.buy_active_power.is_some_and(|power| power > Watts::ZERO);
    table.add_row(vec![
        Cell::new("Grid"),
        if is_buying {
            Cell::new("buy").fg(Color::Red)
        } else if grid.sell_active_power.is_some() {
            Cell::new("sell").fg(Color::Green)
        } else {
            Cell::new("-").add_attribute(Attribute::Dim)
        },
        optional_cell(grid.active_power()),
        Cell::new(if is_buying { grid.max_buy_active_power } else { grid.max_sell_active_power })
            .set_alignment(CellAlignment::Right),
        optional_cell(grid.power_ratio.map(|ratio| Percent(100.0 * ratio))),
        optional_cell(None::<Percent>),
    ]);

    let production = &summary.production;
    table.add_row(vec![
        Cell::new("Production"),
        Cell::new("AC+DC"),
        optional_cell(production.active_power),
        Cell::new(production.max_active_power).set_alignment(CellAlignment::Right),
        optional_cell(production.power_ratio.map(Percent)),
        optional_cell(None::<Percent>),
    ]);

    let consumption = &summary.consumption;
    table.add_row(vec![
        Cell::new("Consumption"),
        Cell::new("-").add_attribute(Attribute::Dim),
        optional_cell(consumption.active_power),
        optional_cell(None::<Watts>),
        optional_cell(consumption.power_ratio.map(Percent)),
        optional_cell(None::<Percent>),
    ]);

    table
}

fn optional_cell(value: Option<impl Display>) -> Cell {
    match value {
        Some(value) => Cell::new(value).set_alignment(CellAlignment::Right),
        None => Cell::new("n/a").set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
    }
}
