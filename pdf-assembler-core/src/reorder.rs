//! Live page reordering while a thumbnail is dragged
//!
//! The engine is a two-state machine, idle or dragging one page. Each
//! pointer move compares the dragged page's midpoint with the midpoints of
//! the other pages as laid out before the move. Once the dragged page has
//! passed a neighbour's midpoint it is spliced into that neighbour's slot.
//! The dragged thumbnail itself follows the pointer exactly; only its slot
//! in the collection changes in steps.

use crate::error::{AssemblerError, Result};
use crate::geometry::{Layout, Position};
use crate::model::PageCollection;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Index the dragged page currently occupies
    Dragging(usize),
}

/// Drag state plus the page most recently dropped
#[derive(Debug, Clone, Default)]
pub struct ReorderEngine {
    state: DragState,
    last_dropped: Option<usize>,
}

impl ReorderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Index of the page being dragged
    pub fn dragging(&self) -> Option<usize> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging(index) => Some(index),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging().is_some()
    }

    /// Index of the page released last, kept for visual emphasis only
    pub fn last_dropped(&self) -> Option<usize> {
        self.last_dropped
    }

    /// Begin dragging the page at `index`
    ///
    /// Returns the pages with the dragged one pinned to its layout position
    /// so it does not jump when the pointer starts moving.
    pub fn start(
        &mut self,
        pages: &PageCollection,
        layout: &Layout,
        index: usize,
    ) -> Result<PageCollection> {
        if self.is_dragging() {
            return Err(AssemblerError::DragInProgress);
        }
        if index >= pages.len() || index >= layout.len() {
            return Err(AssemblerError::PageIndexOutOfBounds(index, pages.len()));
        }

        let pinned = layout.positions[index];
        self.state = DragState::Dragging(index);
        trace!(index, x = pinned.x, "drag started");

        Ok(pages.with_page(index, |page| page.position = pinned))
    }

    /// Follow the pointer to horizontal offset `x`
    ///
    /// `layout` must describe `pages` as they stand before this move. Returns
    /// the updated pages and the index the dragged page now occupies.
    pub fn move_to(
        &mut self,
        pages: &PageCollection,
        layout: &Layout,
        x: f64,
    ) -> Result<(PageCollection, usize)> {
        let current = self.dragging().ok_or(AssemblerError::NoActiveDrag)?;
        if current >= pages.len() || current >= layout.len() {
            return Err(AssemblerError::PageIndexOutOfBounds(current, pages.len()));
        }

        let position = Position::new(x, layout.positions[current].y);
        let midpoint = x + layout.dimensions[current].width / 2.0;
        let moved = pages.with_page(current, |page| page.position = position);

        match reorder_target(&layout.midpoints(), current, midpoint) {
            Some(target) => {
                trace!(from = current, to = target, midpoint, "page passed a neighbour");
                self.state = DragState::Dragging(target);
                Ok((moved.moved(current, target), target))
            }
            None => Ok((moved, current)),
        }
    }

    /// Release the dragged page; returns the index it was dropped at
    pub fn end(&mut self) -> Result<usize> {
        let index = self.dragging().ok_or(AssemblerError::NoActiveDrag)?;
        self.state = DragState::Idle;
        self.last_dropped = Some(index);
        trace!(index, "drag released");
        Ok(index)
    }

    /// Keep indices pointing at the same pages after the page at `index` is purged
    pub fn page_removed(&mut self, index: usize) {
        if let DragState::Dragging(dragging) = self.state {
            self.state = match dragging.cmp(&index) {
                std::cmp::Ordering::Less => DragState::Dragging(dragging),
                std::cmp::Ordering::Equal => DragState::Idle,
                std::cmp::Ordering::Greater => DragState::Dragging(dragging - 1),
            };
        }

        self.last_dropped = match self.last_dropped {
            Some(last) if last == index => None,
            Some(last) if last > index => Some(last - 1),
            other => other,
        };
    }
}

/// Slot the dragged page should move to, if it passed a neighbour
///
/// Pages to the left are scanned left to right for the first midpoint lying
/// right of the dragged midpoint; failing that, pages to the right are
/// scanned right to left for the first midpoint lying left of it.
pub fn reorder_target(midpoints: &[f64], current: usize, dragged_midpoint: f64) -> Option<usize> {
    let current = current.min(midpoints.len());

    if let Some(target) = (0..current).find(|&i| midpoints[i] > dragged_midpoint) {
        return Some(target);
    }

    ((current + 1)..midpoints.len())
        .rev()
        .find(|&i| midpoints[i] < dragged_midpoint)
}

#[cfg(test)]
#[path = "reorder_tests.rs"]
mod reorder_tests;
