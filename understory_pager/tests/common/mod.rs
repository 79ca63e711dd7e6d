// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures: a bookkeeping page source and a recording container.

#![allow(dead_code, reason = "Each test binary uses a different subset of the helpers.")]

use std::cell::RefCell;
use std::rc::Rc;

use understory_pager::{
    ChangeListener, Container, PageFlow, PageSource, Placement, Requests, SizeConstraint,
    SourceChange,
};

/// A realized page. `serial` identifies the page instance, not the item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestPage {
    pub index: usize,
    pub key: u32,
    pub serial: u32,
    /// Content revision the page was built from.
    pub revision: u32,
}

/// Call counts recorded by [`TestSource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Pages built from scratch.
    pub created: usize,
    /// Pages refurbished from a reuse hint.
    pub reused: usize,
    /// Pages handed back through `release`.
    pub released: usize,
}

impl Stats {
    pub fn materialized(&self) -> usize {
        self.created + self.reused
    }
}

/// Items are `u32` keys; each key is unique within the collection.
#[derive(Debug)]
pub struct TestSource {
    items: Vec<u32>,
    next_serial: u32,
    revision: u32,
    outstanding: Vec<u32>,
    listener: Option<ChangeListener>,
    fail_at: Option<usize>,
    pub stats: Stats,
}

impl TestSource {
    /// Items keyed `0..count`.
    pub fn new(count: usize) -> Self {
        Self::with_keys((0_u32..).take(count).collect())
    }

    pub fn with_keys(items: Vec<u32>) -> Self {
        Self {
            items,
            next_serial: 0,
            revision: 0,
            outstanding: Vec::new(),
            listener: None,
            fail_at: None,
            stats: Stats::default(),
        }
    }

    /// Makes `materialize` fail for `index`.
    pub fn fail_at(&mut self, index: Option<usize>) {
        self.fail_at = index;
    }

    pub fn keys(&self) -> &[u32] {
        &self.items
    }

    /// Page serials currently leased to the pager.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    pub fn insert(&mut self, index: usize, key: u32) {
        self.items.insert(index, key);
        self.changed();
    }

    pub fn remove(&mut self, index: usize) -> u32 {
        let key = self.items.remove(index);
        self.changed();
        key
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.changed();
    }

    pub fn replace_all(&mut self, items: Vec<u32>) {
        self.items = items;
        self.changed();
    }

    /// Edits every item's content in place; keys and count stay the same.
    pub fn edit_in_place(&mut self) {
        self.revision += 1;
        self.changed();
    }

    /// Truncates without telling anyone.
    pub fn truncate_silently(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn changed(&self) {
        if let Some(listener) = &self.listener {
            listener.notify(SourceChange::Changed);
        }
    }

    fn retire(&mut self, serial: u32) {
        let position = self
            .outstanding
            .iter()
            .position(|&s| s == serial)
            .expect("page handed back twice");
        self.outstanding.swap_remove(position);
    }
}

impl PageSource for TestSource {
    type Page = TestPage;
    type Key = u32;

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn item_key(&self, index: usize) -> Option<u32> {
        self.items.get(index).copied()
    }

    fn materialize(&mut self, index: usize, reuse: Option<TestPage>) -> Option<TestPage> {
        if self.fail_at == Some(index) {
            if let Some(page) = reuse {
                self.retire(page.serial);
            }
            return None;
        }
        let key = self.item_key(index)?;
        let revision = self.revision;
        match reuse {
            Some(page) => {
                self.stats.reused += 1;
                Some(TestPage {
                    index,
                    key,
                    serial: page.serial,
                    revision,
                })
            }
            None => {
                self.stats.created += 1;
                let serial = self.next_serial;
                self.next_serial += 1;
                self.outstanding.push(serial);
                Some(TestPage {
                    index,
                    key,
                    serial,
                    revision,
                })
            }
        }
    }

    fn release(&mut self, page: TestPage) {
        self.stats.released += 1;
        self.retire(page.serial);
    }

    fn register_change_listener(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    fn unregister_change_listener(&mut self, listener: &ChangeListener) {
        if self.listener.as_ref().is_some_and(|l| l.same_as(listener)) {
            self.listener = None;
        }
    }
}

/// Records what the pager lays out.
#[derive(Debug)]
pub struct TestContainer {
    pub horizontal: SizeConstraint,
    pub vertical: SizeConstraint,
    /// `(index, x)` per placed page, from the last layout.
    pub placed: Vec<(usize, f64)>,
    pub scroll_offset: f64,
    pub invalidations: usize,
}

impl TestContainer {
    pub fn exact(width: f64, height: f64) -> Self {
        Self {
            horizontal: SizeConstraint::Exactly(width),
            vertical: SizeConstraint::Exactly(height),
            placed: Vec::new(),
            scroll_offset: 0.0,
            invalidations: 0,
        }
    }
}

impl Container<TestPage> for TestContainer {
    fn measure(&self) -> (SizeConstraint, SizeConstraint) {
        (self.horizontal, self.vertical)
    }

    fn layout_children_at(&mut self, placements: &[Placement<'_, TestPage>], scroll_offset: f64) {
        self.placed = placements
            .iter()
            .map(|p| {
                assert_eq!(p.page.index, p.index, "placement shows the wrong page");
                (p.index, p.x)
            })
            .collect();
        self.scroll_offset = scroll_offset;
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}

/// Collection indices of the realized window.
pub fn window_indices(flow: &PageFlow<TestSource>) -> Vec<usize> {
    flow.window().slots().map(|slot| slot.index()).collect()
}

/// Installs a listener that logs every switched index.
pub fn record_switches(flow: &mut PageFlow<TestSource>) -> Rc<RefCell<Vec<usize>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    flow.set_switch_listener(move |page: &TestPage, index: usize, _: &mut Requests| {
        assert_eq!(page.index, index, "listener got the wrong page");
        sink.borrow_mut().push(index);
    });
    log
}

/// Ticks at 16ms intervals until the pager goes idle; returns the last timestamp.
pub fn run_until_idle(flow: &mut PageFlow<TestSource>, start_ms: u64) -> u64 {
    let mut now = start_ms;
    for _ in 0..1_000 {
        if !flow.tick(now) {
            return now;
        }
        now += 16;
    }
    panic!("pager never went idle");
}
