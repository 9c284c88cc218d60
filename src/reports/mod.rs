use crate::cmd::simulate::SessionReport;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tapzone::AcquisitionEngine;

fn right_align(table: &mut Table, from: usize, to: usize) {
    for i in from..=to {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_session_table(reports: &[SessionReport]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Session").add_attribute(Attribute::Bold),
        Cell::new("Trials"),
        Cell::new("Success").fg(Color::Green),
        Cell::new("Gave Up").fg(Color::Red),
        Cell::new("Fails/Trial"),
        Cell::new("Time (ms)"),
        Cell::new("Assists").fg(Color::Cyan),
        Cell::new("Radius"),
    ]);
    right_align(&mut table, 1, 7);

    for r in reports {
        table.add_row(vec![
            Cell::new(r.session).add_attribute(Attribute::Bold),
            Cell::new(r.completed + r.abandoned),
            Cell::new(format!("{:.1}%", r.success_rate() * 100.0)).fg(Color::Green),
            Cell::new(r.abandoned).fg(Color::Red),
            Cell::new(format!("{:.2}", r.mean_failures())),
            Cell::new(format!("{:.0}", r.mean_time_ms())),
            Cell::new(r.assists).fg(Color::Cyan),
            Cell::new(format!("{:.1}", r.mean_radius)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_target_table(engine: &AcquisitionEngine) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Idx").add_attribute(Attribute::Bold),
        Cell::new("Label"),
        Cell::new("X"),
        Cell::new("Y"),
        Cell::new("Value"),
        Cell::new("Region"),
        Cell::new("Radius").fg(Color::Cyan),
    ]);
    right_align(&mut table, 2, 6);

    let regions = engine.regions();
    for t in engine.targets().iter() {
        table.add_row(vec![
            Cell::new(t.index).add_attribute(Attribute::Bold),
            Cell::new(&t.label),
            Cell::new(format!("{:.1}", t.position.x)),
            Cell::new(format!("{:.1}", t.position.y)),
            Cell::new(format!("{:.2}", t.value)),
            Cell::new(regions.region_of(t.index)),
            Cell::new(format!("{:.1}", t.hit_radius())).fg(Color::Cyan),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_region_table(engine: &AcquisitionEngine) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let regions = engine.regions();
    table.add_row(vec![
        Cell::new("Region").add_attribute(Attribute::Bold),
        Cell::new(format!("Density\n(w={:.1})", regions.band_width())),
        Cell::new("Success Rate").fg(Color::Green),
    ]);
    right_align(&mut table, 1, 2);

    for (i, density) in regions.densities().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.3}", density)),
            Cell::new(format!("{:.3}", engine.region_success_rate(i))).fg(Color::Green),
        ]);
    }
    println!("\n{}", table);
}
