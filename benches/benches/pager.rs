// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_pager::{
    Container, PageFlow, PageSource, PagerConfig, Placement, PointerEvent, SizeConstraint,
    ViewWindow,
};

/// Deterministic index stream for jump targets (xorshift64).
struct Targets {
    state: u64,
    len: usize,
}

impl Targets {
    fn new(seed: u64, len: usize) -> Self {
        Self {
            state: seed.max(1),
            len: len.max(1),
        }
    }
}

impl Iterator for Targets {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        Some((self.state % self.len as u64) as usize)
    }
}

/// Pages are small buffers so reuse hints matter.
struct Buffers {
    len: usize,
}

impl PageSource for Buffers {
    type Page = Vec<u64>;
    type Key = usize;

    fn item_count(&self) -> usize {
        self.len
    }

    fn item_key(&self, index: usize) -> Option<usize> {
        (index < self.len).then_some(index)
    }

    fn materialize(&mut self, index: usize, reuse: Option<Vec<u64>>) -> Option<Vec<u64>> {
        let mut page = reuse.unwrap_or_else(|| Vec::with_capacity(64));
        page.clear();
        page.extend((0..64).map(|i| ((index as u64) << 8) | i));
        Some(page)
    }
}

/// Fixed-size host that ignores placements.
struct Viewport;

impl Container<Vec<u64>> for Viewport {
    fn measure(&self) -> (SizeConstraint, SizeConstraint) {
        (SizeConstraint::Exactly(400.0), SizeConstraint::Exactly(800.0))
    }

    fn layout_children_at(&mut self, placements: &[Placement<'_, Vec<u64>>], scroll_offset: f64) {
        black_box((placements.len(), scroll_offset));
    }
}

fn attached_window(len: usize, side_buffer: usize) -> ViewWindow<Buffers> {
    let mut window = ViewWindow::new(side_buffer);
    window.attach(Buffers { len });
    window
}

fn bench_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_pager_window");
    group.sample_size(50);

    for &(len, side) in &[(1_000_usize, 1_usize), (1_000, 3), (1_000, 8)] {
        group.bench_function(format!("walk_forward_and_back(n={len},side={side})"), |b| {
            b.iter_batched(
                || attached_window(len, side),
                |mut window| {
                    while window.advance().is_some() {}
                    while window.retreat().is_some() {}
                    black_box(window.collection_cursor());
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("random_jumps(n={len},side={side})"), |b| {
            b.iter_batched(
                || (attached_window(len, side), Targets::new(0x9A6E_0000_0000_0001, len)),
                |(mut window, targets)| {
                    for index in targets.take(256) {
                        window.jump_to(index);
                    }
                    black_box(window.collection_cursor());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_pager_flow");
    group.sample_size(50);

    group.bench_function("fling_and_settle_x100", |b| {
        b.iter_batched(
            || {
                let mut flow = PageFlow::new(PagerConfig::new()).expect("default config is valid");
                flow.set_source(Buffers { len: 1_000 });
                flow.layout(&mut Viewport).expect("viewport has an exact size");
                flow
            },
            |mut flow| {
                let mut now = 0_u64;
                for _ in 0..100 {
                    let x = |x: f64| Point::new(x, 0.0);
                    flow.handle_pointer(PointerEvent::Down { position: x(300.0), time_ms: now });
                    flow.handle_pointer(PointerEvent::Move { position: x(250.0), time_ms: now + 8 });
                    flow.handle_pointer(PointerEvent::Up { position: x(200.0), time_ms: now + 16 });
                    while flow.tick(now) {
                        now += 16;
                        flow.layout(&mut Viewport).expect("viewport has an exact size");
                    }
                }
                black_box(flow.current_index());
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_window, bench_flow);
criterion_main!(benches);
