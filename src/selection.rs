use crate::error::{KanaVizError, KvResult};
use std::collections::VecDeque;
use tracing::debug;

/// User input understood by the selection ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Select(String),
    Rotate,
}

/// Active category plus the ring it cycles through. The active category is
/// always the head of `rotation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    rotation: VecDeque<String>,
}

impl SelectionState {
    /// `None` when there is no category to select.
    pub fn new<I, S>(categories: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rotation: VecDeque<String> = VecDeque::new();
        for c in categories {
            let c = c.into();
            if !rotation.contains(&c) {
                rotation.push_back(c);
            }
        }
        if rotation.is_empty() {
            None
        } else {
            Some(Self { rotation })
        }
    }

    pub fn active(&self) -> &str {
        // non-empty by construction
        self.rotation.front().map(String::as_str).unwrap_or_default()
    }

    pub fn rotation(&self) -> impl Iterator<Item = &str> {
        self.rotation.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rotation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotation.is_empty()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.rotation.iter().any(|c| c == category)
    }

    /// Pure transition. `self` is untouched on error.
    pub fn apply(&self, event: &SelectionEvent) -> KvResult<Self> {
        let mut next = self.clone();
        match event {
            SelectionEvent::Select(category) => next.select(category)?,
            SelectionEvent::Rotate => next.rotate(),
        }
        Ok(next)
    }

    /// Brings `category` to the head of the ring, keeping the cyclic order.
    pub fn select(&mut self, category: &str) -> KvResult<()> {
        let pos = self
            .rotation
            .iter()
            .position(|c| c == category)
            .ok_or_else(|| KanaVizError::UnknownCategory(category.to_string()))?;
        self.rotation.rotate_left(pos);
        debug!("Selected category '{}'", self.active());
        Ok(())
    }

    /// Head goes to the tail; the new head becomes active.
    pub fn rotate(&mut self) {
        if let Some(head) = self.rotation.pop_front() {
            self.rotation.push_back(head);
        }
        debug!("Rotated to category '{}'", self.active());
    }
}
