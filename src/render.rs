use crate::error::{KanaVizError, KvResult};
use crate::record::AccuracyUnit;
use crate::transform::{CategorySeries, GroupedSeries};
use serde::{Deserialize, Serialize};
use std::io::Write;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

/// Which projection the session hands to the renderer.
#[derive(
    Debug, Clone, Copy, Default, EnumIter, EnumString, Display, PartialEq, Eq, Deserialize, Serialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Ranked,
    Grouped,
}

/// Finished, renderer-agnostic chart input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChartView {
    Ranked(CategorySeries),
    Grouped(GroupedSeries),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub unit: AccuracyUnit,
    /// Upper end of the value axis: 1 for ratios, 100 for percentages.
    pub axis_max: f64,
    pub active_category: Option<String>,
}

impl RenderContext {
    pub fn new(unit: AccuracyUnit) -> Self {
        Self {
            unit,
            axis_max: unit.max(),
            active_category: None,
        }
    }

    pub fn with_active(mut self, category: Option<&str>) -> Self {
        self.active_category = category.map(str::to_string);
        self
    }
}

/// Drawing collaborator. A chart returned by `draw` is handed back to
/// `release` before the next `draw`.
pub trait Renderer {
    type Chart;

    fn draw(&mut self, view: &ChartView, ctx: &RenderContext) -> KvResult<Self::Chart>;

    fn release(&mut self, chart: Self::Chart);
}

/// `X.XX%` for percentages, `X.XX` for ratios.
pub fn format_accuracy(value: f64, unit: AccuracyUnit) -> String {
    match unit {
        AccuracyUnit::Percent => format!("{:.2}%", value),
        AccuracyUnit::Ratio => format!("{:.2}", value),
    }
}

/// Handle for a chart emitted as one JSON document.
#[derive(Debug, PartialEq, Eq)]
pub struct JsonChart {
    pub id: usize,
}

/// Writes each chart as a single JSON line.
pub struct JsonRenderer<W: Write> {
    out: W,
    drawn: usize,
    live: usize,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            drawn: 0,
            live: 0,
        }
    }

    pub fn live_charts(&self) -> usize {
        self.live
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEnvelope<'a> {
    id: usize,
    context: &'a RenderContext,
    chart: &'a ChartView,
}

impl<W: Write> Renderer for JsonRenderer<W> {
    type Chart = JsonChart;

    fn draw(&mut self, view: &ChartView, ctx: &RenderContext) -> KvResult<JsonChart> {
        self.drawn += 1;
        let envelope = JsonEnvelope {
            id: self.drawn,
            context: ctx,
            chart: view,
        };
        serde_json::to_writer(&mut self.out, &envelope)?;
        writeln!(self.out).map_err(|e| KanaVizError::Render(e.to_string()))?;
        self.live += 1;
        Ok(JsonChart { id: self.drawn })
    }

    fn release(&mut self, chart: JsonChart) {
        debug!("Released chart #{}", chart.id);
        self.live = self.live.saturating_sub(1);
    }
}
