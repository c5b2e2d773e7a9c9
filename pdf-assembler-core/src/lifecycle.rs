//! Enter and exit staging for pages
//!
//! New pages are mounted hidden and revealed a moment later; removed pages
//! are hidden first and purged once the exit animation has had time to run.
//! Both second steps are [`Transition`]s queued on a [`Timeline`] and applied
//! when the host ticks the assembler, so time only moves when a [`Clock`]
//! says so.

use crate::model::{Origin, PageCollection};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's epoch
    fn now(&self) -> Duration;
}

/// Wall clock measured from its creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Clock that only moves when told to; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, to: Duration) {
        self.nanos.store(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Deferred second step of a page's lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Clear the disappeared flag on freshly uploaded pages
    Reveal(Vec<Origin>),
    /// Drop a page whose exit animation has finished
    Purge(Origin),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    pub due: Duration,
    pub transition: Transition,
}

/// Pending transitions ordered by due time; ties keep scheduling order
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<Scheduled>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, transition: Transition) {
        let at = self.entries.partition_point(|entry| entry.due <= due);
        self.entries.insert(at, Scheduled { due, transition });
    }

    /// Remove and return every transition due at `now`
    pub fn take_due(&mut self, now: Duration) -> Vec<Transition> {
        let split = self.entries.partition_point(|entry| entry.due <= now);
        self.entries
            .drain(..split)
            .map(|entry| entry.transition)
            .collect()
    }

    /// Remove and return everything, due or not
    pub fn take_all(&mut self) -> Vec<Transition> {
        self.entries
            .drain(..)
            .map(|entry| entry.transition)
            .collect()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|entry| entry.due)
    }

    pub fn is_purge_pending(&self, origin: Origin) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.transition == Transition::Purge(origin))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pages with the disappeared flag cleared on every listed origin still present
pub fn reveal(pages: &PageCollection, origins: &[Origin]) -> PageCollection {
    pages.with_each(|_, page| {
        if origins.contains(&page.origin) {
            page.disappeared = false;
        }
    })
}

/// Pages with the page at `index` hidden; order and other pages untouched
pub fn mark_disappeared(pages: &PageCollection, index: usize) -> PageCollection {
    pages.with_page(index, |page| page.disappeared = true)
}

/// Pages without the page created from `origin`, and the index it had
///
/// `None` when that page is already gone, so a late purge never removes
/// whatever page has since moved into the old slot.
pub fn purge(pages: &PageCollection, origin: Origin) -> Option<(PageCollection, usize)> {
    let index = pages.position_of(origin)?;
    Some((pages.without(index), index))
}
