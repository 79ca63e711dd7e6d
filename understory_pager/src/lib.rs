// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pager --heading-base-level=0

//! Understory Pager: a headless horizontal pager core.
//!
//! This crate implements the stateful part of a swipeable carousel that shows
//! one page at a time out of a possibly large, possibly changing collection:
//!
//! - [`ViewWindow`]: a sliding window of realized pages around the current
//!   one. It never realizes more than `2 * side_buffer + 1` pages, slides one
//!   index at a time in O(1), and hands pages that leave the window back to
//!   the source as reuse hints.
//! - [`GestureTracker`]: turns pointer samples into drag deltas (with a slop
//!   and a hard clamp at the realized edges) and release targets (fling to the
//!   neighbour, or snap to the nearest page).
//! - [`PageFlow`]: the controller. It feeds gestures into a settle animation,
//!   slides the window when a settle completes, handles programmatic
//!   selection and data changes, and notifies a [`SwitchListener`] and an
//!   optional [`IndicatorAdapter`] such as [`DotIndicator`].
//!
//! Like the rest of Understory, the crate does **not** know about widgets or
//! rendering. Hosts are responsible for:
//!
//! - Implementing [`PageSource`] to realize, reuse and release pages.
//! - Implementing [`Container`] to position the realized pages.
//! - Feeding pointer events into [`PageFlow::handle_pointer`] and calling
//!   [`PageFlow::tick`] once per frame while [`PageFlow::needs_tick`].
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use understory_pager::{PageFlow, PageSource, Requests};
//!
//! struct Words(Vec<&'static str>);
//!
//! impl PageSource for Words {
//!     type Page = String;
//!     type Key = &'static str;
//!
//!     fn item_count(&self) -> usize {
//!         self.0.len()
//!     }
//!
//!     fn item_key(&self, index: usize) -> Option<&'static str> {
//!         self.0.get(index).copied()
//!     }
//!
//!     fn materialize(&mut self, index: usize, reuse: Option<String>) -> Option<String> {
//!         let mut page = reuse.unwrap_or_default();
//!         page.clear();
//!         page.push_str(self.0.get(index)?);
//!         Some(page)
//!     }
//! }
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&seen);
//!
//! let mut flow = PageFlow::with_side_buffer(1);
//! flow.set_switch_listener(move |_: &String, index: usize, _: &mut Requests| {
//!     log.borrow_mut().push(index);
//! });
//! flow.set_source(Words(vec!["alpha", "beta", "gamma", "delta"]));
//!
//! // Jump two pages ahead; the switch is reported immediately.
//! flow.select(2);
//! assert_eq!(flow.current_page().map(String::as_str), Some("gamma"));
//! assert_eq!(*seen.borrow(), [0, 2]);
//!
//! // Neighbours are reached through a settle animation driven by ticks.
//! flow.next();
//! let mut now = 0;
//! while flow.tick(now) {
//!     now += 16;
//! }
//! assert_eq!(flow.current_index(), Some(3));
//! assert!(!flow.can_go_next());
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo and `tracing`.
//! - `libm`: Kurbo's `no_std` float support.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod container;
mod error;
mod flow;
mod gesture;
mod indicator;
mod scroller;
mod source;
mod window;

pub use config::{PagerAttributes, PagerConfig};
pub use container::{Container, Placement, SizeConstraint};
pub use error::{Axis, ConfigurationError};
pub use flow::{PageFlow, PageRequest, PointerEvent, Requests, SwitchListener};
pub use gesture::{GestureTracker, PageGeometry, Release, ScrollState, resolve_target};
pub use indicator::{Dot, DotIndicator, IndicatorAdapter};
pub use source::{ChangeListener, PageSource, SourceChange};
pub use window::{Slot, SourceSlot, ViewWindow};
