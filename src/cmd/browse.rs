use crate::reports::TableRenderer;
use clap::Args;
use kanaviz::config::{OutputFormat, VizConfig};
use kanaviz::error::{KanaVizError, KvResult};
use kanaviz::loader::LoadedData;
use kanaviz::render::{JsonRenderer, Renderer};
use kanaviz::selection::SelectionEvent;
use kanaviz::session::{Dispatch, Session};
use std::io;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub config: VizConfig,
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Event(SelectionEvent),
    Quit,
}

/// Empty line or `n` cycles, `q` quits, anything else jumps to that kana type.
fn parse_input(line: &str) -> Input {
    match line.trim() {
        "" | "n" => Input::Event(SelectionEvent::Rotate),
        "q" => Input::Quit,
        other => Input::Event(SelectionEvent::Select(other.to_string())),
    }
}

pub async fn run(config: &VizConfig, loaded: LoadedData) -> KvResult<()> {
    match config.format {
        OutputFormat::Table => browse(TableRenderer::new(io::stdout()), config, loaded).await,
        OutputFormat::Json => browse(JsonRenderer::new(io::stdout()), config, loaded).await,
    }
}

async fn browse<R: Renderer>(renderer: R, config: &VizConfig, loaded: LoadedData) -> KvResult<()> {
    let mut session = Session::new(renderer, config.mode);
    if session.attach(loaded.records)? == Dispatch::Ignored {
        warn!("⚠️  No valid records in '{}'. Nothing to browse.", config.data);
        return Ok(());
    }

    info!("⌨️  Enter: next kana type | <name>: jump | q: quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let event = match parse_input(&line) {
            Input::Quit => break,
            Input::Event(event) => event,
        };
        match session.handle(&event) {
            Ok(_) => {}
            Err(KanaVizError::UnknownCategory(name)) => {
                let known: Vec<&str> = session
                    .selection()
                    .map(|s| s.rotation().collect())
                    .unwrap_or_default();
                warn!("⚠️  Unknown kana type '{}'. Known: {}", name, known.join(", "));
            }
            Err(e) => return Err(e),
        }
    }

    session.close();
    Ok(())
}
