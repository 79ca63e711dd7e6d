// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`PageFlow`]: the pager controller.
//!
//! `PageFlow` binds a [`ViewWindow`], a [`GestureTracker`] and a settle
//! animation together and owns the public surface of the pager. Everything is
//! driven by the host on one thread:
//!
//! - pointer input through [`PageFlow::handle_pointer`],
//! - frame ticks through [`PageFlow::tick`] while [`PageFlow::needs_tick`],
//! - layout through [`PageFlow::layout`].
//!
//! Page switches are reported to a [`SwitchListener`] and an optional
//! [`IndicatorAdapter`]. A listener that wants another page change asks for it
//! through the [`Requests`] handle it is given; the request runs on the next
//! tick rather than re-entering the pager mid-notification.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

use crate::config::PagerConfig;
use crate::container::{Container, Placement};
use crate::error::{Axis, ConfigurationError};
use crate::gesture::{GestureTracker, PageGeometry, Release, ScrollState};
use crate::indicator::IndicatorAdapter;
use crate::scroller::Scroller;
use crate::source::{PageSource, SourceChange};
use crate::window::ViewWindow;

/// A single pointer sample from the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer was pressed.
    Down {
        /// Pointer position.
        position: Point,
        /// Host timestamp in milliseconds.
        time_ms: u64,
    },
    /// The pressed pointer moved.
    Move {
        /// Pointer position.
        position: Point,
        /// Host timestamp in milliseconds.
        time_ms: u64,
    },
    /// The pointer was released.
    Up {
        /// Pointer position.
        position: Point,
        /// Host timestamp in milliseconds.
        time_ms: u64,
    },
    /// The host took the pointer away (e.g. a parent intercepted it).
    Cancel,
}

/// A page change requested from inside a notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageRequest {
    /// Select a collection index.
    Select(usize),
    /// Go to the next page.
    Next,
    /// Go to the previous page.
    Previous,
}

/// Deferred page requests, handed to [`SwitchListener`]s.
///
/// Only the most recent request is kept. It runs on the next
/// [`PageFlow::tick`].
#[derive(Clone, Debug, Default)]
pub struct Requests {
    pending: Option<PageRequest>,
}

impl Requests {
    /// Requests selection of `index`.
    pub fn select(&mut self, index: usize) {
        self.pending = Some(PageRequest::Select(index));
    }

    /// Requests the next page.
    pub fn next(&mut self) {
        self.pending = Some(PageRequest::Next);
    }

    /// Requests the previous page.
    pub fn previous(&mut self) {
        self.pending = Some(PageRequest::Previous);
    }

    /// The queued request, if any.
    #[must_use]
    pub fn pending(&self) -> Option<PageRequest> {
        self.pending
    }

    fn take(&mut self) -> Option<PageRequest> {
        self.pending.take()
    }
}

/// Receives completed page switches.
///
/// Called exactly once per completed change, never while dragging.
pub trait SwitchListener<P> {
    /// The page at collection `index` became current.
    fn on_switched(&mut self, page: &P, index: usize, requests: &mut Requests);
}

impl<P, F> SwitchListener<P> for F
where
    F: FnMut(&P, usize, &mut Requests),
{
    fn on_switched(&mut self, page: &P, index: usize, requests: &mut Requests) {
        self(page, index, requests);
    }
}

/// Horizontal pager over a [`PageSource`].
pub struct PageFlow<S: PageSource> {
    config: PagerConfig,
    window: ViewWindow<S>,
    gesture: GestureTracker,
    scroller: Option<Scroller>,
    state: ScrollState,
    scroll_offset: f64,
    page_width: f64,
    page_height: f64,
    listener: Option<Box<dyn SwitchListener<S::Page>>>,
    indicator: Option<Box<dyn IndicatorAdapter<S::Page>>>,
    requests: Requests,
}

impl<S: PageSource> fmt::Debug for PageFlow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageFlow")
            .field("window", &self.window)
            .field("state", &self.state)
            .field("scroll_offset", &self.scroll_offset)
            .field("page_width", &self.page_width)
            .field("settle_target", &self.scroller.as_ref().map(Scroller::target))
            .field("has_listener", &self.listener.is_some())
            .field("has_indicator", &self.indicator.is_some())
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}

impl<S: PageSource> PageFlow<S> {
    /// Creates a pager with `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if `config` does not validate.
    pub fn new(config: PagerConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Creates a pager with default settings and the given side buffer.
    #[must_use]
    pub fn with_side_buffer(side_buffer: usize) -> Self {
        Self::from_valid(PagerConfig::new().with_side_buffer(side_buffer))
    }

    fn from_valid(config: PagerConfig) -> Self {
        Self {
            window: ViewWindow::new(config.side_buffer),
            gesture: GestureTracker::new(&config),
            config,
            scroller: None,
            state: ScrollState::Rest,
            scroll_offset: 0.0,
            page_width: 0.0,
            page_height: 0.0,
            listener: None,
            indicator: None,
            requests: Requests::default(),
        }
    }

    /// Attaches `source`, returning the previous one.
    ///
    /// The pager rests on index 0 afterwards, and the initial page is
    /// reported as a switch if the collection is not empty.
    pub fn set_source(&mut self, source: S) -> Option<S> {
        self.interrupt();
        let previous = self.window.attach(source);
        self.state = ScrollState::Rest;
        self.realign();
        let count = self.window.item_count();
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.on_source_attached(count);
        }
        self.notify_switched();
        previous
    }

    /// Detaches and returns the source, releasing every page.
    pub fn take_source(&mut self) -> Option<S> {
        self.interrupt();
        let source = self.window.detach();
        self.state = ScrollState::Rest;
        self.realign();
        if source.is_some() {
            if let Some(indicator) = self.indicator.as_mut() {
                indicator.on_source_attached(0);
            }
        }
        source
    }

    /// Sets the listener for completed page switches.
    pub fn set_switch_listener(&mut self, listener: impl SwitchListener<S::Page> + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Removes the switch listener.
    pub fn clear_switch_listener(&mut self) {
        self.listener = None;
    }

    /// Binds a page indicator, replacing any previous one.
    pub fn bind_indicator(&mut self, mut indicator: impl IndicatorAdapter<S::Page> + 'static) {
        indicator.on_bind(self.window.item_count(), self.current_index());
        self.indicator = Some(Box::new(indicator));
    }

    /// Unbinds the page indicator.
    pub fn unbind_indicator(&mut self) {
        self.indicator = None;
    }

    /// Moves to collection `index`.
    ///
    /// Out-of-range indices and the current index are ignored. The immediate
    /// neighbours are reached with a settle animation that slides the window
    /// by one on completion; anything further jumps straight there and
    /// reports the switch immediately.
    ///
    /// A settle still in flight is completed first, so `index` is resolved
    /// against the page it was heading for.
    pub fn select(&mut self, index: usize) {
        self.drain_changes();
        self.complete_settle();
        let Some(current) = self.current_index() else {
            return;
        };
        if index == current || index >= self.window.item_count() {
            return;
        }
        self.interrupt();

        let slot = self.window.buffer_cursor();
        let len = self.window.len();
        if index == current + 1 && slot + 1 < len {
            self.start_settle(slot + 1);
        } else if index + 1 == current && slot > 0 {
            self.start_settle(slot - 1);
        } else {
            self.window.jump_to(index);
            self.state = ScrollState::Rest;
            self.realign();
            self.notify_switched();
        }
    }

    /// Moves to the page after the current one, if there is one.
    ///
    /// Like [`PageFlow::select`], an in-flight settle counts as done, so each
    /// call moves one page further.
    pub fn next(&mut self) {
        self.drain_changes();
        self.complete_settle();
        if let Some(current) = self.current_index() {
            if self.can_go_next() {
                self.select(current + 1);
            }
        }
    }

    /// Moves to the page before the current one, if there is one.
    pub fn previous(&mut self) {
        self.drain_changes();
        self.complete_settle();
        if let Some(current) = self.current_index() {
            if self.can_go_previous() {
                self.select(current - 1);
            }
        }
    }

    /// Returns `true` if a page follows the current one.
    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.window.can_advance()
    }

    /// Returns `true` if a page precedes the current one.
    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.window.can_retreat()
    }

    /// The current page.
    #[must_use]
    pub fn current_page(&self) -> Option<&S::Page> {
        self.window.current_slot().map(|slot| slot.page())
    }

    /// Collection index of the current page.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.window.current_slot().map(|slot| slot.index())
    }

    /// Feeds one pointer sample; returns `true` if the pager consumed it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.drain_changes();
        if self.window.is_empty() {
            return false;
        }
        match event {
            PointerEvent::Down { position, time_ms } => {
                if self.scroller.take().is_some() {
                    tracing::trace!("press interrupted a settle");
                }
                self.state = ScrollState::Rest;
                self.gesture.on_down(position, time_ms);
                true
            }
            PointerEvent::Move { position, time_ms } => {
                let geometry = self.geometry();
                match self.gesture.on_move(position, time_ms, &geometry) {
                    Some(delta) => {
                        self.state = ScrollState::Dragging;
                        self.set_offset(self.scroll_offset + delta);
                        true
                    }
                    None => false,
                }
            }
            PointerEvent::Up { position, time_ms } => {
                let geometry = self.geometry();
                match self.gesture.on_up(position, time_ms, &geometry) {
                    Release::Settle(target) => self.start_settle(target),
                    Release::Tap => self.snap_if_misaligned(),
                }
                true
            }
            PointerEvent::Cancel => {
                let geometry = self.geometry();
                match self.gesture.on_cancel(&geometry) {
                    Some(target) => self.start_settle(target),
                    None => self.snap_if_misaligned(),
                }
                true
            }
        }
    }

    /// Reports a change in the source's data.
    ///
    /// Equivalent to the source signalling its registered
    /// [`ChangeListener`](crate::ChangeListener), but handled immediately.
    pub fn notify_source_changed(&mut self, change: SourceChange) {
        self.window.change_listener().take();
        self.on_source_changed(change);
    }

    /// Advances animations and deferred work to `now_ms`.
    ///
    /// Returns `true` while another tick is needed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.drain_changes();
        if let Some(request) = self.requests.take() {
            match request {
                PageRequest::Select(index) => self.select(index),
                PageRequest::Next => self.next(),
                PageRequest::Previous => self.previous(),
            }
        }
        if let Some(scroller) = self.scroller.as_mut() {
            let (offset, finished) = scroller.sample(now_ms);
            let target = scroller.target();
            if finished {
                self.scroller = None;
            }
            self.set_offset(offset);
            if finished {
                self.finish_settle(target);
            }
        }
        self.needs_tick()
    }

    /// Returns `true` if [`PageFlow::tick`] has work to do.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        self.scroller.is_some()
            || self.requests.pending().is_some()
            || self.window.change_listener().is_pending()
    }

    /// Measures against `container` and places the realized pages in it.
    ///
    /// A change in width (e.g. after a rotation) cancels any settle and
    /// re-snaps the offset to the current page.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InexactSize`] if the container does not
    /// offer an exact size on both axes.
    pub fn layout<C: Container<S::Page>>(&mut self, container: &mut C) -> Result<(), ConfigurationError> {
        let (horizontal, vertical) = container.measure();
        let width = horizontal.exact().ok_or(ConfigurationError::InexactSize {
            axis: Axis::Horizontal,
        })?;
        let height = vertical.exact().ok_or(ConfigurationError::InexactSize {
            axis: Axis::Vertical,
        })?;
        self.page_height = height;

        if width != self.page_width {
            tracing::debug!(from = self.page_width, to = width, "page width changed");
            self.page_width = width;
            if self.scroller.take().is_some() || self.gesture.is_pressed() {
                self.gesture.reset();
                self.state = ScrollState::Rest;
            }
            self.realign();
        }

        let placements: SmallVec<[Placement<'_, S::Page>; 8]> = self
            .window
            .slots()
            .enumerate()
            .map(|(position, slot)| Placement {
                page: slot.page(),
                index: slot.index(),
                x: position as f64 * width,
                width,
                height,
            })
            .collect();
        container.layout_children_at(&placements, self.scroll_offset);
        if self.needs_tick() {
            container.invalidate();
        }
        Ok(())
    }

    /// Scroll offset in pixels from the first realized slot.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Current scroll state.
    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        self.state
    }

    /// Page width from the last layout.
    #[must_use]
    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    /// Page height from the last layout.
    #[must_use]
    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Buffer slot an in-flight settle is heading for.
    #[must_use]
    pub fn pending_target(&self) -> Option<usize> {
        self.scroller.as_ref().map(Scroller::target)
    }

    /// The configuration this pager was built with.
    #[must_use]
    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// The underlying window.
    #[must_use]
    pub fn window(&self) -> &ViewWindow<S> {
        &self.window
    }

    /// The attached source.
    #[must_use]
    pub fn source(&self) -> Option<&S> {
        self.window.source()
    }

    /// Mutable access to the attached source.
    ///
    /// Report mutations through the source's registered listener or
    /// [`PageFlow::notify_source_changed`].
    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.window.source_mut()
    }

    /// Number of items in the attached source.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.window.item_count()
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry {
            offset: self.scroll_offset,
            page_width: self.page_width,
            current: self.window.buffer_cursor(),
            len: self.window.len(),
        }
    }

    /// Drops any press and settle in progress without completing them.
    fn interrupt(&mut self) {
        self.gesture.reset();
        self.scroller = None;
    }

    fn start_settle(&mut self, target: usize) {
        let geometry = self.geometry();
        let target = target.min(geometry.len.saturating_sub(1));
        let scroller = Scroller::new(self.scroll_offset, geometry.slot_origin(target), target, &self.config);
        tracing::trace!(
            slot = target,
            from = self.scroll_offset,
            duration_ms = scroller.duration_ms(),
            "settling"
        );
        self.scroller = Some(scroller);
        self.state = ScrollState::Settling;
    }

    /// Jumps an in-flight settle to its end.
    fn complete_settle(&mut self) {
        if let Some(scroller) = self.scroller.take() {
            tracing::trace!(slot = scroller.target(), "completing settle early");
            self.gesture.reset();
            self.finish_settle(scroller.target());
        }
    }

    fn snap_if_misaligned(&mut self) {
        let geometry = self.geometry();
        if geometry.is_aligned() {
            self.state = ScrollState::Rest;
        } else {
            self.start_settle(geometry.nearest_slot());
        }
    }

    fn finish_settle(&mut self, target: usize) {
        self.state = ScrollState::Rest;
        let before = self.current_index();
        let slot = self.window.buffer_cursor();
        if target > slot {
            for _ in slot..target {
                if self.window.advance().is_none() {
                    break;
                }
            }
        } else {
            for _ in target..slot {
                if self.window.retreat().is_none() {
                    break;
                }
            }
        }
        self.realign();
        if self.current_index() != before {
            self.notify_switched();
        }
    }

    fn drain_changes(&mut self) {
        if let Some(change) = self.window.change_listener().take() {
            self.on_source_changed(change);
        }
    }

    fn on_source_changed(&mut self, change: SourceChange) {
        tracing::debug!(?change, state = ?self.state, "page source changed");
        self.interrupt();
        self.state = ScrollState::Rest;
        let before = self.current_index();
        // Keys may be unchanged while the content behind them is not.
        self.window.rebuild_around_current();
        self.realign();
        let count = self.window.item_count();
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.on_source_attached(count);
        }
        if self.current_index() != before {
            self.notify_switched();
        }
    }

    /// Puts the offset exactly on the current slot.
    fn realign(&mut self) {
        self.scroll_offset = self.geometry().slot_origin(self.window.buffer_cursor());
        // The window may have shifted under an unchanged offset.
        self.report_progress();
    }

    fn set_offset(&mut self, offset: f64) {
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            self.report_progress();
        }
    }

    fn report_progress(&mut self) {
        if let Some(indicator) = self.indicator.as_mut() {
            let first = self.window.index_range().map_or(0, |range| range.start);
            indicator.on_scroll_progress(self.scroll_offset + first as f64 * self.page_width);
        }
    }

    fn notify_switched(&mut self) {
        let Some(slot) = self.window.current_slot() else {
            return;
        };
        let index = slot.index();
        tracing::debug!(index, "switched page");
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.on_switched(slot.page(), index);
        }
        if let Some(listener) = self.listener.as_mut() {
            listener.on_switched(slot.page(), index, &mut self.requests);
        }
    }
}
