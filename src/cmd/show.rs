use crate::reports::TableRenderer;
use clap::Args;
use kanaviz::config::{OutputFormat, VizConfig};
use kanaviz::error::KvResult;
use kanaviz::loader::LoadedData;
use kanaviz::render::{ChartView, JsonRenderer, RenderContext, Renderer, ViewMode};
use kanaviz::selection::SelectionState;
use kanaviz::transform;
use std::io;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub config: VizConfig,

    /// Kana type to rank. Defaults to the first one in the data.
    #[arg(short = 't', long)]
    pub category: Option<String>,
}

pub fn run(args: &ShowArgs, config: &VizConfig, loaded: LoadedData) -> KvResult<()> {
    match config.format {
        OutputFormat::Table => draw_once(TableRenderer::new(io::stdout()), args, config, loaded),
        OutputFormat::Json => draw_once(JsonRenderer::new(io::stdout()), args, config, loaded),
    }
}

fn draw_once<R: Renderer>(
    mut renderer: R,
    args: &ShowArgs,
    config: &VizConfig,
    loaded: LoadedData,
) -> KvResult<()> {
    let records = loaded.records;
    let Some(mut selection) = SelectionState::new(records.categories()) else {
        warn!("⚠️  No valid records in '{}'. Nothing to draw.", config.data);
        return Ok(());
    };
    if let Some(category) = &args.category {
        selection.select(category)?;
    }

    let view = match config.mode {
        ViewMode::Ranked => ChartView::Ranked(transform::project(&records, selection.active())),
        ViewMode::Grouped => ChartView::Grouped(transform::project_grouped(&records)),
    };
    let ctx = RenderContext::new(records.unit()).with_active(Some(selection.active()));

    let chart = renderer.draw(&view, &ctx)?;
    renderer.release(chart);
    Ok(())
}
