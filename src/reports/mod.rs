use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use segevo::evolution::{EvolutionSummary, FrontMember};
use segevo::individual::Objectives;

/// Maps above this width are skipped; they would wrap in a terminal.
const MAX_MAP_WIDTH: usize = 80;
const SEGMENT_GLYPHS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn right_align(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn fmt_crowding(d: f64) -> String {
    if d.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.3}", d)
    }
}

pub fn print_front(front: &[FrontMember]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Segs"),
        Cell::new("Edge").fg(Color::Cyan),
        Cell::new("Conn").fg(Color::Cyan),
        Cell::new("Dev").fg(Color::Cyan),
        Cell::new("Crowd"),
    ]);
    right_align(&mut table, 1..=5);

    let mut sorted: Vec<&FrontMember> = front.iter().collect();
    sorted.sort_by(|a, b| a.objectives.edge_value.total_cmp(&b.objectives.edge_value));

    for m in sorted {
        let crowd = Cell::new(fmt_crowding(m.crowding_distance));
        table.add_row(vec![
            Cell::new(m.index).add_attribute(Attribute::Bold),
            Cell::new(m.segments),
            Cell::new(format!("{:.2}", m.objectives.edge_value)),
            Cell::new(format!("{:.2}", m.objectives.connectivity)),
            Cell::new(format!("{:.2}", m.objectives.overall_deviation)),
            if m.crowding_distance.is_infinite() {
                crowd.fg(Color::Green)
            } else {
                crowd
            },
        ]);
    }
    println!("\nFirst front ({} individuals)", front.len());
    println!("{}", table);
}

pub fn print_history(history: &[EvolutionSummary]) {
    if history.is_empty() {
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Gen").add_attribute(Attribute::Bold),
        Cell::new("Avg"),
        Cell::new("Best").fg(Color::Green),
        Cell::new("Front"),
        Cell::new("ms"),
    ]);
    right_align(&mut table, 1..=4);

    // Keep the table short on long runs.
    let stride = (history.len() / 10).max(1);
    let last = history.len() - 1;
    for (i, s) in history.iter().enumerate() {
        if i % stride != 0 && i != last {
            continue;
        }
        table.add_row(vec![
            Cell::new(s.generation).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.2}", s.average_fitness)),
            Cell::new(format!("{:.2}", s.best_fitness)).fg(Color::Green),
            Cell::new(s.first_front_size),
            Cell::new(format!("{:.0}", s.elapsed_ms)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_seed_report(rows: &[(usize, Objectives, f64)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Segs"),
        Cell::new("Edge"),
        Cell::new("Conn"),
        Cell::new("Dev"),
        Cell::new("Weighted").fg(Color::Cyan),
    ]);
    right_align(&mut table, 1..=5);

    let best = rows
        .iter()
        .map(|r| r.2)
        .fold(f64::INFINITY, f64::min);

    for (i, (segments, o, scalar)) in rows.iter().enumerate() {
        let idx = Cell::new(i).add_attribute(Attribute::Bold);
        table.add_row(vec![
            if *scalar == best { idx.fg(Color::Green) } else { idx },
            Cell::new(segments),
            Cell::new(format!("{:.2}", o.edge_value)),
            Cell::new(format!("{:.2}", o.connectivity)),
            Cell::new(format!("{:.2}", o.overall_deviation)),
            Cell::new(format!("{:.2}", scalar)).fg(Color::Cyan),
        ]);
    }
    println!("{}", table);
}

/// One glyph per pixel, cycling through the alphabet for segment ids.
pub fn print_segment_map(width: usize, segment_ids: &[usize]) {
    if width == 0 || width > MAX_MAP_WIDTH {
        return;
    }
    println!("\nSegment map:");
    for row in segment_ids.chunks(width) {
        let line: String = row
            .iter()
            .map(|&id| SEGMENT_GLYPHS[id % SEGMENT_GLYPHS.len()] as char)
            .collect();
        println!("  {}", line);
    }
}
