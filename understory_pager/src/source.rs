// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The data side of the pager: [`PageSource`] and change notification.
//!
//! A source owns the collection and the page instances built for it. The
//! window only leases pages: every page handed out by
//! [`PageSource::materialize`] comes back exactly once, either as the
//! `reuse` hint of a later `materialize` call or through
//! [`PageSource::release`].
//!
//! ## Change notification
//!
//! When a [`ViewWindow`](crate::ViewWindow) attaches to a source it registers
//! a [`ChangeListener`]. The source keeps the handle and calls
//! [`ChangeListener::notify`] whenever its data changes. Notifications are
//! queued, not dispatched: the pager drains them the next time the host
//! drives it, so a source never re-enters the pager.
//!
//! ```rust
//! use understory_pager::{ChangeListener, SourceChange};
//!
//! let listener = ChangeListener::new();
//! let held_by_source = listener.clone();
//!
//! held_by_source.notify(SourceChange::Invalidated);
//! held_by_source.notify(SourceChange::Changed);
//! assert!(listener.is_pending());
//! assert!(held_by_source.same_as(&listener));
//! ```

use alloc::rc::Rc;
use core::cell::Cell;

/// What kind of change a [`PageSource`] reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceChange {
    /// The data is no longer valid.
    ///
    /// Reserved; currently handled exactly like [`SourceChange::Changed`].
    Invalidated,
    /// Items were added, removed, reordered or replaced.
    Changed,
}

/// A queued-change handle shared between a pager and its source.
///
/// Clones refer to the same mailbox. Multiple notifications before the pager
/// drains the mailbox coalesce into one.
#[derive(Clone, Debug, Default)]
pub struct ChangeListener {
    pending: Rc<Cell<Option<SourceChange>>>,
}

impl ChangeListener {
    /// Creates an empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a change to whoever registered this listener.
    pub fn notify(&self, change: SourceChange) {
        let merged = match self.pending.get() {
            Some(prev) => prev.max(change),
            None => change,
        };
        self.pending.set(Some(merged));
    }

    /// Returns `true` while a notification is waiting to be drained.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Returns `true` if `other` is a clone of this listener.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.pending, &other.pending)
    }

    pub(crate) fn take(&self) -> Option<SourceChange> {
        self.pending.take()
    }
}

/// Supplies items and page instances to the pager.
///
/// `Page` is whatever handle the host uses for a realized page (a widget id,
/// an `Rc` to a view, ...). `Key` identifies the *item* a page shows and is
/// used to find the current item again after the collection changes, since
/// its index may have shifted.
pub trait PageSource {
    /// Handle to a realized page.
    type Page;
    /// Identity of an item, stable across reorders.
    type Key: PartialEq;

    /// Number of items in the collection.
    fn item_count(&self) -> usize;

    /// Identity of the item at `index`, or `None` if out of range.
    fn item_key(&self, index: usize) -> Option<Self::Key>;

    /// Realizes the page for `index`.
    ///
    /// `reuse` is a page that just left the window; implementations may
    /// refurbish it instead of allocating. Returning `None` is a contract
    /// violation that the pager recovers from by rebuilding its window.
    fn materialize(&mut self, index: usize, reuse: Option<Self::Page>) -> Option<Self::Page>;

    /// Takes back a page the pager no longer needs.
    fn release(&mut self, page: Self::Page) {
        let _ = page;
    }

    /// Finds the current index of the item identified by `key`.
    ///
    /// The default scans every index; sources with an index structure should
    /// override it.
    fn position_of(&self, key: &Self::Key) -> Option<usize> {
        (0..self.item_count()).find(|&i| self.item_key(i).as_ref() == Some(key))
    }

    /// Stores `listener` so future changes can be reported through it.
    fn register_change_listener(&mut self, listener: ChangeListener) {
        let _ = listener;
    }

    /// Forgets a listener previously passed to
    /// [`PageSource::register_change_listener`].
    fn unregister_change_listener(&mut self, listener: &ChangeListener) {
        let _ = listener;
    }
}
