use crate::error::KvResult;
use crate::record::RecordSet;
use crate::render::{ChartView, RenderContext, Renderer, ViewMode};
use crate::selection::{SelectionEvent, SelectionState};
use crate::transform;
use tracing::{debug, info};

/// Outcome of feeding the session an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing to draw yet, state untouched.
    Ignored,
    Rendered,
}

/// Owns the loaded data, the selection ring and the live chart.
pub struct Session<R: Renderer> {
    renderer: R,
    mode: ViewMode,
    records: Option<RecordSet>,
    selection: Option<SelectionState>,
    chart: Option<R::Chart>,
}

impl<R: Renderer> Session<R> {
    pub fn new(renderer: R, mode: ViewMode) -> Self {
        Self {
            renderer,
            mode,
            records: None,
            selection: None,
            chart: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn records(&self) -> Option<&RecordSet> {
        self.records.as_ref()
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        self.selection.as_ref()
    }

    pub fn active_category(&self) -> Option<&str> {
        self.selection.as_ref().map(SelectionState::active)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn is_loaded(&self) -> bool {
        self.records.is_some()
    }

    /// Installs the record set and draws the initial view.
    pub fn attach(&mut self, records: RecordSet) -> KvResult<Dispatch> {
        let selection = SelectionState::new(records.categories());
        info!(
            "Session ready: {} records, {} categories, mode={}",
            records.len(),
            selection.as_ref().map_or(0, SelectionState::len),
            self.mode
        );
        self.records = Some(records);
        let dispatch = self.render(selection.as_ref());
        self.selection = selection;
        dispatch
    }

    /// Applies one user event and redraws. Events before `attach` are dropped.
    ///
    /// The new selection is committed only once it has been drawn. If the
    /// draw fails the selection stays where it was and no chart is live: the
    /// previous one was already released.
    pub fn handle(&mut self, event: &SelectionEvent) -> KvResult<Dispatch> {
        if self.records.is_none() {
            debug!("Ignoring {:?}: no data loaded", event);
            return Ok(Dispatch::Ignored);
        }
        let Some(current) = self.selection.as_ref() else {
            debug!("Ignoring {:?}: no categories", event);
            return Ok(Dispatch::Ignored);
        };

        let next = current.apply(event)?;
        let dispatch = self.render(Some(&next))?;
        self.selection = Some(next);
        Ok(dispatch)
    }

    /// The projection the next draw would receive.
    pub fn view(&self) -> Option<ChartView> {
        self.view_for(self.active_category())
    }

    fn view_for(&self, active: Option<&str>) -> Option<ChartView> {
        let records = self.records.as_ref()?;
        match self.mode {
            ViewMode::Ranked => Some(ChartView::Ranked(transform::project(records, active?))),
            ViewMode::Grouped => Some(ChartView::Grouped(transform::project_grouped(records))),
        }
    }

    fn render(&mut self, selection: Option<&SelectionState>) -> KvResult<Dispatch> {
        let active = selection.map(SelectionState::active);
        let (Some(view), Some(records)) = (self.view_for(active), self.records.as_ref()) else {
            return Ok(Dispatch::Ignored);
        };
        let ctx = RenderContext::new(records.unit()).with_active(active);

        if let Some(previous) = self.chart.take() {
            self.renderer.release(previous);
        }
        self.chart = Some(self.renderer.draw(&view, &ctx)?);
        Ok(Dispatch::Rendered)
    }

    /// Releases the live chart, if any.
    pub fn close(&mut self) {
        if let Some(chart) = self.chart.take() {
            self.renderer.release(chart);
        }
    }
}

impl<R: Renderer> Drop for Session<R> {
    fn drop(&mut self) {
        self.close();
    }
}
