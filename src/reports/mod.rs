use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use kanaviz::error::{KanaVizError, KvResult};
use kanaviz::record::AccuracyUnit;
use kanaviz::render::{format_accuracy, ChartView, RenderContext, Renderer};
use kanaviz::transform::{CategoryScore, CategorySeries, GroupedSeries};
use std::io::Write;
use tracing::debug;

const BAR_WIDTH: usize = 20;

#[derive(Debug)]
pub struct TableChart {
    pub id: usize,
}

/// Draws charts as ASCII tables with a text bar per row.
pub struct TableRenderer<W: Write> {
    out: W,
    drawn: usize,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, drawn: 0 }
    }
}

impl<W: Write> Renderer for TableRenderer<W> {
    type Chart = TableChart;

    fn draw(&mut self, view: &ChartView, ctx: &RenderContext) -> KvResult<TableChart> {
        let text = match view {
            ChartView::Ranked(series) => ranked_table(series, ctx),
            ChartView::Grouped(series) => grouped_table(series, ctx),
        };
        writeln!(self.out, "\n{}", text).map_err(|e| KanaVizError::Render(e.to_string()))?;
        self.drawn += 1;
        Ok(TableChart { id: self.drawn })
    }

    fn release(&mut self, chart: TableChart) {
        debug!("Released table #{}", chart.id);
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

fn accuracy_color(value: f64, unit: AccuracyUnit) -> Color {
    let ratio = value / unit.max();
    if ratio >= 0.8 {
        Color::Green
    } else if ratio >= 0.5 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn ranked_table(series: &CategorySeries, ctx: &RenderContext) -> String {
    if series.is_empty() {
        return format!("Category: {} (no records)", series.category);
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Kana").add_attribute(Attribute::Bold),
        Cell::new("Accuracy").fg(Color::Cyan),
        Cell::new("Seen"),
        Cell::new("Correct"),
        Cell::new(""),
    ]);

    for i in 1..=3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for p in &series.points {
        table.add_row(vec![
            Cell::new(&p.kana).add_attribute(Attribute::Bold),
            Cell::new(format_accuracy(p.accuracy, ctx.unit)).fg(accuracy_color(p.accuracy, ctx.unit)),
            Cell::new(p.times_seen),
            Cell::new(p.times_correct),
            Cell::new(bar(p.accuracy, ctx.axis_max)),
        ]);
    }

    format!("Category: {}\n{}", series.category, table)
}

fn grouped_table(series: &GroupedSeries, ctx: &RenderContext) -> String {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Kana").add_attribute(Attribute::Bold)];
    header.extend(series.categories().map(|c| {
        let cell = Cell::new(c);
        if ctx.active_category.as_deref() == Some(c) {
            cell.fg(Color::Cyan).add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }));
    table.set_header(header);

    for i in 1..=series.groups.len() {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    // Rows follow the union domain; a category without the item shows "-".
    let matrix = series.matrix();
    for (j, kana) in series.item_domain.iter().enumerate() {
        let mut row = vec![Cell::new(kana).add_attribute(Attribute::Bold)];
        for cells in &matrix {
            row.push(match cells.get(j).copied().flatten() {
                Some(v) => Cell::new(format_accuracy(v, ctx.unit)).fg(accuracy_color(v, ctx.unit)),
                None => Cell::new("-"),
            });
        }
        table.add_row(row);
    }

    format!(
        "Mean accuracy by kana type (max {})\n{}",
        format_accuracy(series.max_mean(), ctx.unit),
        table
    )
}

pub fn print_summary(rows: &[(String, CategoryScore)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Kana Type").add_attribute(Attribute::Bold),
        Cell::new("Seen"),
        Cell::new("Correct"),
        Cell::new("Accuracy").fg(Color::Cyan),
    ]);

    for i in 1..=3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (name, s) in rows {
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(s.seen),
            Cell::new(s.correct),
            Cell::new(format!("{:.1}%", s.percentage))
                .fg(accuracy_color(s.percentage, AccuracyUnit::Percent)),
        ]);
    }
    println!("\n{}", table);
}
