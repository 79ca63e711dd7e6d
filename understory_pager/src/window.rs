// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sliding window of materialized pages.
//!
//! [`ViewWindow`] keeps at most `2 * side_buffer + 1` pages realized around
//! the current collection index. The realized pages always cover a contiguous
//! index range, so the position of the current page inside the window (the
//! *buffer cursor*) is simply `collection_cursor - first_index`.
//!
//! Moving by one page ([`ViewWindow::advance`], [`ViewWindow::retreat`]) is
//! O(1): at most one page leaves the window and at most one enters, and the
//! page that left is offered to the source as a reuse hint for the page that
//! enters. [`ViewWindow::jump_to`] and [`ViewWindow::rebuild_around_current`]
//! replace the window wholesale in O(window) time.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_pager::{PageSource, Slot, ViewWindow};
//!
//! struct Numbers(usize);
//!
//! impl PageSource for Numbers {
//!     type Page = usize;
//!     type Key = usize;
//!     fn item_count(&self) -> usize { self.0 }
//!     fn item_key(&self, index: usize) -> Option<usize> { (index < self.0).then_some(index) }
//!     fn materialize(&mut self, index: usize, _reuse: Option<usize>) -> Option<usize> {
//!         Some(index * 100)
//!     }
//! }
//!
//! let mut window = ViewWindow::new(2);
//! window.attach(Numbers(10));
//! assert_eq!(window.slots().map(Slot::index).collect::<Vec<_>>(), [0, 1, 2]);
//!
//! window.advance();
//! window.advance();
//! window.advance();
//! assert_eq!(window.slots().map(Slot::index).collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
//! assert_eq!(window.collection_cursor(), 3);
//! assert_eq!(window.buffer_cursor(), 2);
//! assert_eq!(window.current_slot().map(|s| *s.page()), Some(300));
//! ```

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use crate::source::{ChangeListener, PageSource};

/// One realized page bound to a collection index.
#[derive(Clone, Debug)]
pub struct Slot<P, K> {
    index: usize,
    page: P,
    key: Option<K>,
    attached: bool,
}

impl<P, K> Slot<P, K> {
    /// Collection index this slot shows.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The leased page.
    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    /// Mutable access to the leased page, e.g. to resize it during layout.
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// Identity of the item the page was realized for.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Whether the slot currently takes part in layout.
    ///
    /// Every slot reachable through a [`ViewWindow`] is attached; the flag is
    /// cleared the moment a slot leaves the window, before its page goes back
    /// to the source.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn detach(mut self) -> P {
        self.attached = false;
        self.page
    }
}

/// Shorthand for the slot type of a given source.
pub type SourceSlot<S> = Slot<<S as PageSource>::Page, <S as PageSource>::Key>;

/// Sliding buffer of realized pages over a [`PageSource`].
pub struct ViewWindow<S: PageSource> {
    source: Option<S>,
    slots: VecDeque<SourceSlot<S>>,
    side_buffer: usize,
    buffer_cursor: usize,
    collection_cursor: usize,
    built_count: usize,
    listener: ChangeListener,
}

impl<S: PageSource> fmt::Debug for ViewWindow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewWindow")
            .field("attached", &self.source.is_some())
            .field("indices", &self.index_range())
            .field("side_buffer", &self.side_buffer)
            .field("buffer_cursor", &self.buffer_cursor)
            .field("collection_cursor", &self.collection_cursor)
            .field("built_count", &self.built_count)
            .finish_non_exhaustive()
    }
}

impl<S: PageSource> ViewWindow<S> {
    /// Creates an empty window keeping `side_buffer` pages on each side.
    #[must_use]
    pub fn new(side_buffer: usize) -> Self {
        Self {
            source: None,
            slots: VecDeque::with_capacity(side_buffer.saturating_mul(2).saturating_add(1)),
            side_buffer,
            buffer_cursor: 0,
            collection_cursor: 0,
            built_count: 0,
            listener: ChangeListener::new(),
        }
    }

    /// Attaches `source` and builds the initial window at index 0.
    ///
    /// The initial window holds up to `side_buffer + 1` pages, since nothing
    /// precedes index 0. Any previously attached source gets its pages back,
    /// is unregistered and returned.
    pub fn attach(&mut self, mut source: S) -> Option<S> {
        let previous = self.detach();

        source.register_change_listener(self.listener.clone());
        let count = source.item_count();
        self.source = Some(source);
        self.built_count = count;
        if count > 0 {
            let end = count.min(self.side_buffer.saturating_add(1));
            self.fill(0..end, 0, Vec::new());
        }
        tracing::debug!(item_count = count, len = self.slots.len(), "attached page source");
        previous
    }

    /// Releases every page, unregisters and returns the current source.
    pub fn detach(&mut self) -> Option<S> {
        let mut source = self.source.take()?;
        for page in self.take_pages() {
            source.release(page);
        }
        source.unregister_change_listener(&self.listener);
        // Anything the old source queued is meaningless now.
        self.listener.take();
        self.buffer_cursor = 0;
        self.collection_cursor = 0;
        self.built_count = 0;
        Some(source)
    }

    /// Replaces the window with one centered on `index`.
    ///
    /// Does nothing if no source is attached or `index` is out of range.
    /// Pages from the old window are offered, in order, as reuse hints for the
    /// new one; pages left over are released.
    pub fn jump_to(&mut self, index: usize) {
        let Some(count) = self.source.as_ref().map(PageSource::item_count) else {
            return;
        };
        if index >= count {
            return;
        }
        let recycled = self.take_pages();
        self.built_count = count;
        self.collection_cursor = index;
        self.fill(self.centered_range(index, count), index, recycled);
        tracing::debug!(
            target_index = index,
            indices = ?self.index_range(),
            buffer_cursor = self.buffer_cursor,
            "jumped"
        );
    }

    /// Slides the window one index forward.
    ///
    /// Returns the new current slot, or `None` (changing nothing) if already
    /// at the last item. A source that shrank without notifying, or failed to
    /// materialize, makes the window rebuild around the current item and also
    /// yields `None`.
    pub fn advance(&mut self) -> Option<&SourceSlot<S>> {
        if self.source_shrank() || !self.can_advance() {
            return None;
        }
        let count = self.live_count();
        let side = self.side_buffer;
        self.collection_cursor += 1;
        let cursor = self.collection_cursor;

        let mut evicted = None;
        if self.slots.front().is_some_and(|head| cursor.saturating_sub(head.index) > side) {
            evicted = self.slots.pop_front().map(Slot::detach);
        }

        let next = self.slots.back().map_or(cursor, |tail| tail.index + 1);
        if next <= cursor + side && next < count {
            if !self.push_back(next, evicted) {
                return self.recover("materialize failed while advancing");
            }
        } else if let Some(page) = evicted {
            self.release(page);
        }
        self.settle_cursor("advanced")
    }

    /// Slides the window one index backward.
    ///
    /// Returns the new current slot, or `None` (changing nothing) if already
    /// at the first item.
    pub fn retreat(&mut self) -> Option<&SourceSlot<S>> {
        if self.source_shrank() || !self.can_retreat() {
            return None;
        }
        let side = self.side_buffer;
        self.collection_cursor -= 1;
        let cursor = self.collection_cursor;

        let mut evicted = None;
        if self.slots.back().is_some_and(|tail| tail.index.saturating_sub(cursor) > side) {
            evicted = self.slots.pop_back().map(Slot::detach);
        }

        let prev = match self.slots.front() {
            Some(head) => head.index.checked_sub(1),
            None => Some(cursor),
        };
        match prev {
            Some(prev) if prev + side >= cursor => {
                if !self.push_front(prev, evicted) {
                    return self.recover("materialize failed while retreating");
                }
            }
            _ => {
                if let Some(page) = evicted {
                    self.release(page);
                }
            }
        }
        self.settle_cursor("retreated")
    }

    /// Discards the window and rebuilds it around the current item.
    ///
    /// The current item is found again by key, since a reorder may have moved
    /// it; if it is gone the previous index is clamped into range instead.
    pub fn rebuild_around_current(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let count = source.item_count();
        let located = self
            .slots
            .get(self.buffer_cursor)
            .and_then(|slot| slot.key.as_ref())
            .and_then(|key| source.position_of(key))
            .filter(|&index| index < count);
        let target = located.unwrap_or_else(|| self.collection_cursor.min(count.saturating_sub(1)));

        for page in self.take_pages() {
            self.release(page);
        }
        self.built_count = count;
        self.collection_cursor = target;
        if count > 0 {
            self.fill(self.centered_range(target, count), target, Vec::new());
        } else {
            self.buffer_cursor = 0;
        }
        tracing::debug!(
            item_count = count,
            relocated = located.is_some(),
            collection_cursor = self.collection_cursor,
            indices = ?self.index_range(),
            "rebuilt window"
        );
    }

    /// Returns `true` if the source no longer matches what the window shows.
    ///
    /// The window is stale when the item count differs from the one it was
    /// built against, or when any realized slot now maps to a different item.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        let Some(source) = self.source.as_ref() else {
            return false;
        };
        source.item_count() != self.built_count
            || self
                .slots
                .iter()
                .any(|slot| source.item_key(slot.index) != slot.key)
    }

    /// The current slot, if any item is realized.
    #[must_use]
    pub fn current_slot(&self) -> Option<&SourceSlot<S>> {
        self.slots.get(self.buffer_cursor)
    }

    /// Collection index of the current slot.
    #[must_use]
    pub fn collection_cursor(&self) -> usize {
        self.collection_cursor
    }

    /// Position of the current slot inside the window.
    #[must_use]
    pub fn buffer_cursor(&self) -> usize {
        self.buffer_cursor
    }

    /// Returns `true` if there is an item after the current one.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        !self.slots.is_empty() && self.collection_cursor + 1 < self.live_count()
    }

    /// Returns `true` if there is an item before the current one.
    #[must_use]
    pub fn can_retreat(&self) -> bool {
        !self.slots.is_empty() && self.collection_cursor > 0
    }

    /// The realized slots in ascending index order.
    pub fn slots(&self) -> impl ExactSizeIterator<Item = &SourceSlot<S>> + '_ {
        self.slots.iter()
    }

    /// Slot at `position` inside the window.
    #[must_use]
    pub fn slot(&self, position: usize) -> Option<&SourceSlot<S>> {
        self.slots.get(position)
    }

    /// Mutable slot at `position` inside the window.
    pub fn slot_mut(&mut self, position: usize) -> Option<&mut SourceSlot<S>> {
        self.slots.get_mut(position)
    }

    /// Range of realized collection indices, if any.
    #[must_use]
    pub fn index_range(&self) -> Option<Range<usize>> {
        let head = self.slots.front()?;
        Some(head.index..head.index + self.slots.len())
    }

    /// Number of realized slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is realized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Configured side buffer.
    #[must_use]
    pub fn side_buffer(&self) -> usize {
        self.side_buffer
    }

    /// Item count as currently reported by the source.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.live_count()
    }

    /// The attached source.
    #[must_use]
    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Mutable access to the attached source.
    ///
    /// After mutating the collection, notify the listener the source
    /// registered (or the owning [`PageFlow`](crate::PageFlow)) so the window
    /// can be rebuilt.
    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    pub(crate) fn change_listener(&self) -> &ChangeListener {
        &self.listener
    }

    fn live_count(&self) -> usize {
        self.source.as_ref().map_or(0, PageSource::item_count)
    }

    fn centered_range(&self, index: usize, count: usize) -> Range<usize> {
        let start = index.saturating_sub(self.side_buffer);
        let end = count.min(index.saturating_add(self.side_buffer).saturating_add(1));
        start..end
    }

    /// Detects a collection that shrank under the window without notice and
    /// rebuilds; returns `true` if it did.
    fn source_shrank(&mut self) -> bool {
        let count = self.live_count();
        if self.slots.back().is_some_and(|tail| tail.index >= count) {
            tracing::warn!(
                item_count = count,
                indices = ?self.index_range(),
                "page source shrank under the window without notification"
            );
            self.rebuild_around_current();
            return true;
        }
        false
    }

    fn recover(&mut self, reason: &'static str) -> Option<&SourceSlot<S>> {
        tracing::warn!(
            collection_cursor = self.collection_cursor,
            indices = ?self.index_range(),
            "{reason}; rebuilding"
        );
        self.rebuild_around_current();
        None
    }

    /// Recomputes the buffer cursor after a one-step slide.
    fn settle_cursor(&mut self, what: &'static str) -> Option<&SourceSlot<S>> {
        let cursor = self.collection_cursor;
        match self.index_range() {
            Some(range) if range.contains(&cursor) => {
                self.buffer_cursor = cursor - range.start;
                tracing::debug!(
                    collection_cursor = cursor,
                    buffer_cursor = self.buffer_cursor,
                    indices = ?range,
                    "{what}"
                );
                self.current_slot()
            }
            _ => self.recover("current index fell outside the window"),
        }
    }

    /// Fills an empty window with `range`, consuming `recycled` as reuse hints.
    ///
    /// Stops at the first index the source fails to realize; the cursor is
    /// clamped to the last realized slot in that case.
    fn fill(&mut self, range: Range<usize>, current: usize, recycled: Vec<S::Page>) {
        debug_assert!(self.slots.is_empty(), "fill expects an empty window");
        let mut recycled = recycled.into_iter();
        for index in range {
            let hint = recycled.next();
            if !self.push_back(index, hint) {
                tracing::warn!(index, "page source failed to materialize; truncating window");
                break;
            }
        }
        for page in recycled {
            self.release(page);
        }
        match self.index_range() {
            Some(range) => {
                self.collection_cursor = current.clamp(range.start, range.end - 1);
                self.buffer_cursor = self.collection_cursor - range.start;
            }
            None => self.buffer_cursor = 0,
        }
    }

    fn take_pages(&mut self) -> Vec<S::Page> {
        self.slots.drain(..).map(Slot::detach).collect()
    }

    fn release(&mut self, page: S::Page) {
        if let Some(source) = self.source.as_mut() {
            source.release(page);
        }
    }

    fn realize(&mut self, index: usize, reuse: Option<S::Page>) -> Option<SourceSlot<S>> {
        let source = self.source.as_mut()?;
        let key = source.item_key(index);
        let page = source.materialize(index, reuse)?;
        Some(Slot {
            index,
            page,
            key,
            attached: true,
        })
    }

    fn push_back(&mut self, index: usize, reuse: Option<S::Page>) -> bool {
        match self.realize(index, reuse) {
            Some(slot) => {
                self.slots.push_back(slot);
                true
            }
            None => false,
        }
    }

    fn push_front(&mut self, index: usize, reuse: Option<S::Page>) -> bool {
        match self.realize(index, reuse) {
            Some(slot) => {
                self.slots.push_front(slot);
                true
            }
            None => false,
        }
    }
}

impl<S: PageSource> Drop for ViewWindow<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
