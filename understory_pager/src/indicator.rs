// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page indicators: the notification contract and a headless dot model.
//!
//! An [`IndicatorAdapter`] hears about everything a page indicator needs:
//! the item count, scroll progress while dragging or settling, and completed
//! page switches. [`DotIndicator`] is a ready-made model for the classic row
//! of dots; hosts draw it however they like.
//!
//! ```rust
//! use understory_pager::{Dot, DotIndicator, IndicatorAdapter};
//!
//! let mut dots = DotIndicator::new();
//! IndicatorAdapter::<()>::on_source_attached(&mut dots, 3);
//! IndicatorAdapter::<()>::on_switched(&mut dots, &(), 1);
//!
//! let row: Vec<Dot> = dots.dots().collect();
//! assert_eq!(row, [Dot::Inactive, Dot::Active, Dot::Inactive]);
//! ```

use alloc::rc::Rc;
use core::cell::RefCell;

/// Receives pager notifications for a page indicator.
pub trait IndicatorAdapter<P> {
    /// Called once when bound to a pager.
    fn on_bind(&mut self, item_count: usize, current: Option<usize>);

    /// Called when a source is attached or its item count may have changed.
    fn on_source_attached(&mut self, item_count: usize);

    /// Called on every offset change while dragging or settling.
    ///
    /// `offset` is the perceived offset across the whole collection, i.e.
    /// `index * page_width` when resting on `index`.
    fn on_scroll_progress(&mut self, offset: f64) {
        let _ = offset;
    }

    /// Mirrors [`SwitchListener::on_switched`](crate::SwitchListener::on_switched).
    fn on_switched(&mut self, page: &P, index: usize);
}

impl<P, T: IndicatorAdapter<P>> IndicatorAdapter<P> for Rc<RefCell<T>> {
    fn on_bind(&mut self, item_count: usize, current: Option<usize>) {
        self.borrow_mut().on_bind(item_count, current);
    }

    fn on_source_attached(&mut self, item_count: usize) {
        self.borrow_mut().on_source_attached(item_count);
    }

    fn on_scroll_progress(&mut self, offset: f64) {
        self.borrow_mut().on_scroll_progress(offset);
    }

    fn on_switched(&mut self, page: &P, index: usize) {
        self.borrow_mut().on_switched(page, index);
    }
}

/// State of one dot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dot {
    /// The dot for the current page.
    Active,
    /// Any other dot.
    Inactive,
}

/// Headless model of a row of page dots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DotIndicator {
    page_count: usize,
    current: usize,
    scroll_progress: f64,
}

impl DotIndicator {
    /// Creates an indicator with no pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dots.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Index of the active dot.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Last perceived scroll offset reported by the pager.
    #[must_use]
    pub fn scroll_progress(&self) -> f64 {
        self.scroll_progress
    }

    /// Dot states in page order.
    pub fn dots(&self) -> impl ExactSizeIterator<Item = Dot> + '_ {
        (0..self.page_count).map(|i| {
            if i == self.current {
                Dot::Active
            } else {
                Dot::Inactive
            }
        })
    }
}

impl<P> IndicatorAdapter<P> for DotIndicator {
    fn on_bind(&mut self, item_count: usize, current: Option<usize>) {
        self.page_count = item_count;
        self.current = current.unwrap_or(0);
    }

    fn on_source_attached(&mut self, item_count: usize) {
        self.page_count = item_count;
        if self.current >= item_count {
            self.current = item_count.saturating_sub(1);
        }
    }

    fn on_scroll_progress(&mut self, offset: f64) {
        self.scroll_progress = offset;
    }

    fn on_switched(&mut self, _page: &P, index: usize) {
        self.current = index;
    }
}
