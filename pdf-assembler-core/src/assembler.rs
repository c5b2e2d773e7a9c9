//! The widget's single owned state and its event handlers
//!
//! An [`Assembler`] holds the files, the ordered pages, the drag state and
//! the pending lifecycle transitions. Hosts forward UI events to it (drop,
//! pointer down/move/up, remove click, timer tick, finalize click) and read
//! back an [`AssemblerView`] to render. Every handler runs to completion and
//! replaces the page collection with a fully formed next value.

use crate::config::AssemblerConfig;
use crate::error::{AssemblerError, FinalizeError, Result};
use crate::finalize::{BuildOutcome, FinalizeButton, FinalizeOutcome, FinalizeRequest, PdfBuilder};
use crate::geometry::Layout;
use crate::lifecycle::{self, Clock, SystemClock, Timeline, Transition};
use crate::model::{BuildData, Origin, PageCollection, PageRef, SourceFile};
use crate::modifications::{with_rotation, RotationAngle};
use crate::notify::{Notification, Notifier};
use crate::reorder::ReorderEngine;
use crate::upload::{FileSource, IngestBatch, IngestJob, PreviewLoader, SkippedFile};
use crate::view::{build_view, AssemblerView};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of committing an ingestion batch
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub added_files: usize,
    /// Origins of the new pages, in the order they were appended
    pub added_pages: Vec<Origin>,
    pub skipped: Vec<SkippedFile>,
}

pub struct Assembler {
    config: AssemblerConfig,
    data: BuildData,
    reorder: ReorderEngine,
    timeline: Timeline,
    clock: Arc<dyn Clock>,
    busy: bool,
    finalizing: bool,
    revision: u64,
}

impl Assembler {
    /// Create an assembler driven by the system clock
    pub fn new(config: AssemblerConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create an assembler whose lifecycle timers read `clock`
    ///
    /// Fails if `config` holds a negative or non-finite measurement.
    pub fn with_clock(config: AssemblerConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            data: BuildData::new(),
            reorder: ReorderEngine::new(),
            timeline: Timeline::new(),
            clock,
            busy: false,
            finalizing: false,
            revision: 0,
        })
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    pub fn data(&self) -> &BuildData {
        &self.data
    }

    pub fn pages(&self) -> &PageCollection {
        &self.data.pages
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.data.files
    }

    /// Whether previews are loading; drops and drags are refused meanwhile
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn dragging(&self) -> Option<usize> {
        self.reorder.dragging()
    }

    pub fn last_dropped(&self) -> Option<usize> {
        self.reorder.last_dropped()
    }

    /// Bumped on every committed change to the page collection
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Clock time at which the next pending transition becomes due
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeline.next_deadline()
    }

    /// How long until the next pending transition, zero if one is overdue
    pub fn time_until_next_transition(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    pub fn has_pending_transitions(&self) -> bool {
        !self.timeline.is_empty()
    }

    /// Layout of the pages in their current order
    pub fn layout(&self) -> Layout {
        Layout::compute(
            &self.data,
            self.config.inner_area_height(),
            self.config.preview_spacing,
        )
    }

    pub fn view(&self) -> AssemblerView {
        build_view(
            &self.config,
            &self.data,
            &self.layout(),
            &self.reorder,
            self.busy,
            self.finalize_button(),
        )
    }

    fn commit(&mut self, pages: PageCollection) {
        self.data.pages = pages;
        self.revision += 1;
    }

    /// Commit `pages` with every page except the dragged one at its layout position
    fn commit_with_layout(&mut self, pages: PageCollection) {
        let data = BuildData {
            files: std::mem::take(&mut self.data.files),
            pages,
        };
        let layout = Layout::compute(
            &data,
            self.config.inner_area_height(),
            self.config.preview_spacing,
        );
        let dragging = self.reorder.dragging();
        let pages = data.pages.with_each(|index, page| {
            if Some(index) != dragging {
                page.position = layout.positions[index];
            }
        });

        self.data.files = data.files;
        self.commit(pages);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.data.pages.len() {
            return Err(AssemblerError::PageIndexOutOfBounds(
                index,
                self.data.pages.len(),
            ));
        }
        Ok(())
    }

    // Upload

    /// Accept dropped files and mark the pipeline busy until the batch is committed
    pub fn begin_ingest<I, F>(&mut self, files: I) -> Result<IngestJob>
    where
        I: IntoIterator<Item = F>,
        F: FileSource + 'static,
    {
        if self.busy {
            return Err(AssemblerError::Busy);
        }
        if self.reorder.is_dragging() {
            return Err(AssemblerError::DragInProgress);
        }

        let files: Vec<Box<dyn FileSource>> = files
            .into_iter()
            .map(|file| Box::new(file) as Box<dyn FileSource>)
            .collect();

        debug!(files = files.len(), "ingestion started");
        self.busy = true;
        Ok(IngestJob::new(files, self.config.preview_resolution))
    }

    /// Merge a finished batch: new pages are appended hidden and revealed after the grace delay
    pub fn commit_ingest(&mut self, batch: IngestBatch) -> IngestSummary {
        let IngestBatch { files, skipped } = batch;
        let base = self.data.files.len();

        let added_pages: Vec<Origin> = files
            .iter()
            .enumerate()
            .flat_map(|(k, file)| (0..file.previews.len()).map(move |page| Origin::new(base + k, page)))
            .collect();
        let added_files = files.len();

        self.data.files.extend(files);
        let pages = self
            .data
            .pages
            .with_appended(added_pages.iter().copied().map(PageRef::hidden));
        self.commit_with_layout(pages);
        self.busy = false;

        if !added_pages.is_empty() {
            let due = self.clock.now() + self.config.reveal_delay();
            self.timeline
                .schedule(due, Transition::Reveal(added_pages.clone()));
        }

        info!(
            files = added_files,
            pages = added_pages.len(),
            skipped = skipped.len(),
            "ingestion committed"
        );

        IngestSummary {
            added_files,
            added_pages,
            skipped,
        }
    }

    /// Preview `files` with `loader` and commit the result
    pub async fn ingest<I, F>(
        &mut self,
        files: I,
        loader: &dyn PreviewLoader,
        notifier: &dyn Notifier,
    ) -> Result<IngestSummary>
    where
        I: IntoIterator<Item = F>,
        F: FileSource + 'static,
    {
        let job = self.begin_ingest(files)?;
        let batch = job.run(loader, notifier).await;
        Ok(self.commit_ingest(batch))
    }

    // Reorder

    /// Pointer pressed on the page at `index`
    pub fn drag_start(&mut self, index: usize) -> Result<()> {
        if self.busy {
            return Err(AssemblerError::Busy);
        }
        self.check_index(index)?;
        if self.timeline.is_purge_pending(self.data.pages.as_slice()[index].origin) {
            return Err(AssemblerError::PageDisappearing(index));
        }

        let pages = self
            .reorder
            .start(&self.data.pages, &self.layout(), index)?;
        self.commit(pages);
        Ok(())
    }

    /// Pointer moved to horizontal offset `x`; returns the dragged page's index
    pub fn drag_move(&mut self, x: f64) -> Result<usize> {
        let layout = self.layout();
        let (pages, index) = self.reorder.move_to(&self.data.pages, &layout, x)?;
        self.commit_with_layout(pages);
        Ok(index)
    }

    /// Pointer released; returns the index the page was dropped at
    pub fn drag_end(&mut self) -> Result<usize> {
        let index = self.reorder.end()?;
        let pages = self.data.pages.clone();
        self.commit_with_layout(pages);
        debug!(index, "page dropped");
        Ok(index)
    }

    // Lifecycle

    /// Hide the page at `index` and purge it once the exit animation is over
    pub fn remove(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.reorder.dragging() == Some(index) {
            return Err(AssemblerError::DragInProgress);
        }

        let origin = self.data.pages.as_slice()[index].origin;
        if self.timeline.is_purge_pending(origin) {
            return Ok(());
        }

        let pages = lifecycle::mark_disappeared(&self.data.pages, index);
        self.commit(pages);

        let due = self.clock.now() + self.config.removal_delay();
        self.timeline.schedule(due, Transition::Purge(origin));
        debug!(index, %origin, "page removal scheduled");
        Ok(())
    }

    /// Apply every transition that is due; returns how many were applied
    pub fn tick(&mut self) -> usize {
        let due = self.timeline.take_due(self.clock.now());
        let count = due.len();
        for transition in due {
            self.apply(transition);
        }
        count
    }

    /// Apply every pending transition now, whatever its deadline
    pub fn flush(&mut self) -> usize {
        let pending = self.timeline.take_all();
        let count = pending.len();
        for transition in pending {
            self.apply(transition);
        }
        count
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Reveal(origins) => {
                // A page removed before it was revealed stays hidden
                let origins: Vec<Origin> = origins
                    .into_iter()
                    .filter(|origin| !self.timeline.is_purge_pending(*origin))
                    .collect();
                let pages = lifecycle::reveal(&self.data.pages, &origins);
                self.commit(pages);
            }
            Transition::Purge(origin) => match lifecycle::purge(&self.data.pages, origin) {
                Some((pages, index)) => {
                    self.reorder.page_removed(index);
                    self.commit_with_layout(pages);
                    debug!(index, %origin, "page purged");
                }
                None => warn!(%origin, "purge skipped, page already gone"),
            },
        }
    }

    // Modifications

    /// Turn the page at `index` by `angle` on top of any earlier rotation
    pub fn rotate(&mut self, index: usize, angle: RotationAngle) -> Result<()> {
        self.check_index(index)?;
        let pages = self.data.pages.with_page(index, |page| {
            page.modifications = with_rotation(&page.modifications, angle);
        });
        self.commit(pages);
        Ok(())
    }

    // Finalize

    /// Whether `origin` is on its way out and must not be built
    fn is_leaving(&self, origin: Origin) -> bool {
        self.timeline.is_purge_pending(origin)
    }

    /// Whether there is anything to build right now
    ///
    /// Pages still waiting for their reveal count; only pending removals don't.
    fn has_buildable_pages(&self) -> bool {
        self.data.pages.iter().any(|page| !self.is_leaving(page.origin))
    }

    pub fn finalize_button(&self) -> FinalizeButton {
        FinalizeButton {
            loading: self.finalizing,
            disabled: self.finalizing
                || self.busy
                || self.reorder.is_dragging()
                || !self.has_buildable_pages(),
        }
    }

    /// Snapshot the page list for the build service and mark the build in flight
    pub fn begin_finalize(&mut self, name: impl Into<String>) -> Result<FinalizeRequest> {
        if self.finalizing {
            return Err(AssemblerError::FinalizeInProgress);
        }
        if self.busy {
            return Err(AssemblerError::Busy);
        }
        if self.reorder.is_dragging() {
            return Err(AssemblerError::DragInProgress);
        }
        if !self.has_buildable_pages() {
            return Err(AssemblerError::NoPages);
        }

        self.finalizing = true;
        Ok(FinalizeRequest::from_build_data(name, &self.data, |origin| {
            self.is_leaving(origin)
        }))
    }

    /// Give up on an in-flight build whose result will never be completed
    ///
    /// Hosts call this after dropping a pending [`Assembler::finalize`] future
    /// or abandoning a [`FinalizeRequest`]. Returns whether a build was in flight.
    pub fn cancel_finalize(&mut self) -> bool {
        let cancelled = std::mem::take(&mut self.finalizing);
        if cancelled {
            debug!("build cancelled");
        }
        cancelled
    }

    /// Clear the in-flight build and translate its result for the host
    pub fn complete_finalize(
        &mut self,
        name: impl Into<String>,
        result: std::result::Result<BuildOutcome, FinalizeError>,
        notifier: &dyn Notifier,
    ) -> FinalizeOutcome {
        self.finalizing = false;

        match result {
            Ok(BuildOutcome::Document(bytes)) => {
                let name = name.into();
                info!(name = %name, size = bytes.len(), "PDF built");
                FinalizeOutcome::Download { name, bytes }
            }
            Ok(BuildOutcome::ResetLoading) => FinalizeOutcome::Reset,
            Err(error) => {
                let error = AssemblerError::from(error);
                warn!(%error, "build failed");
                notifier.notify(Notification::error(error.to_string()));
                FinalizeOutcome::Failed(error.to_string())
            }
        }
    }

    /// Build the assembled document with `builder`
    pub async fn finalize(
        &mut self,
        name: impl Into<String>,
        builder: &dyn PdfBuilder,
        notifier: &dyn Notifier,
    ) -> Result<FinalizeOutcome> {
        let request = self.begin_finalize(name)?;
        let result = builder.build_pdf(&request).await;
        Ok(self.complete_finalize(request.name, result, notifier))
    }
}

#[cfg(test)]
#[path = "assembler_tests.rs"]
mod assembler_tests;
