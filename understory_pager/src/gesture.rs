// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe interpretation: slop, clamped drag deltas, fling and snap targets.
//!
//! [`GestureTracker`] does not move anything itself. It turns pointer samples
//! into intents that [`PageFlow`](crate::PageFlow) applies:
//!
//! 1) [`GestureTracker::on_down`] records where the press started.
//! 2) [`GestureTracker::on_move`] returns a scroll delta once the pointer has
//!    travelled further than the drag slop, clamped so the offset never leaves
//!    the realized slots.
//! 3) [`GestureTracker::on_up`] resolves the slot to settle on, preferring a
//!    fling to the adjacent slot over snapping to the nearest one.
//!
//! Scroll deltas and velocities are in scroll space: positive values move
//! toward higher collection indices, i.e. the opposite of the pointer.
//!
//! ```
//! use kurbo::Point;
//! use understory_pager::{GestureTracker, PageGeometry, PagerConfig, Release};
//!
//! let mut gesture = GestureTracker::new(&PagerConfig::new().with_drag_slop(10.0));
//! let geometry = PageGeometry { offset: 0.0, page_width: 100.0, current: 0, len: 3 };
//!
//! gesture.on_down(Point::new(300.0, 0.0), 0);
//! // Within the slop: not a drag yet.
//! assert_eq!(gesture.on_move(Point::new(295.0, 0.0), 16, &geometry), None);
//! // Past the slop: the full travel since the press is applied.
//! assert_eq!(gesture.on_move(Point::new(280.0, 0.0), 32, &geometry), Some(20.0));
//!
//! let settled = PageGeometry { offset: 20.0, ..geometry };
//! assert_eq!(gesture.on_up(Point::new(280.0, 0.0), 400, &settled), Release::Settle(0));
//! ```

use kurbo::Point;
use smallvec::SmallVec;

use crate::config::PagerConfig;

/// Scroll state shared by the tracker and the flow.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScrollState {
    /// No gesture, no animation.
    #[default]
    Rest,
    /// The offset follows the pointer.
    Dragging,
    /// The offset animates toward a target slot.
    Settling,
}

/// Where the realized slots are relative to the scroll offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PageGeometry {
    /// Current scroll offset, in pixels from the first realized slot.
    pub offset: f64,
    /// Width of one page.
    pub page_width: f64,
    /// Buffer position of the current slot.
    pub current: usize,
    /// Number of realized slots.
    pub len: usize,
}

impl PageGeometry {
    /// Largest offset that keeps the last realized slot fully in view.
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        self.slot_origin(self.len.saturating_sub(1))
    }

    /// Offset at which `slot` is exactly in view.
    #[must_use]
    pub fn slot_origin(&self, slot: usize) -> f64 {
        slot as f64 * self.page_width
    }

    /// The slot whose origin is closest to the offset.
    #[must_use]
    pub fn nearest_slot(&self) -> usize {
        if self.len == 0 {
            return 0;
        }
        if self.page_width <= 0.0 {
            return self.current.min(self.len - 1);
        }
        let half = self.page_width * 0.5;
        let slot = ((self.offset.max(0.0) + half) / self.page_width).min(self.len as f64);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Non-negative and bounded by `len`; truncation is the intended floor"
        )]
        let slot = slot as usize;
        slot.min(self.len - 1)
    }

    /// Returns `true` if the offset sits exactly on the current slot.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        (self.offset - self.slot_origin(self.current)).abs() < 0.5
    }
}

/// Outcome of releasing the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Release {
    /// The press never became a drag.
    Tap,
    /// Settle on this buffer slot.
    Settle(usize),
}

/// Samples older than this, relative to the newest, do not count toward velocity.
const VELOCITY_HORIZON_MS: u64 = 100;
const MAX_SAMPLES: usize = 16;

#[derive(Copy, Clone, Debug)]
struct Sample {
    x: f64,
    time_ms: u64,
}

/// Estimates pointer velocity from the most recent samples.
#[derive(Clone, Debug, Default)]
struct VelocityTracker {
    samples: SmallVec<[Sample; MAX_SAMPLES]>,
}

impl VelocityTracker {
    fn clear(&mut self) {
        self.samples.clear();
    }

    fn add(&mut self, x: f64, time_ms: u64) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.remove(0);
        }
        self.samples.push(Sample { x, time_ms });
        let horizon = time_ms.saturating_sub(VELOCITY_HORIZON_MS);
        self.samples.retain(|s| s.time_ms >= horizon);
    }

    /// Pointer velocity in pixels per second.
    fn velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };
        let dt = last.time_ms.saturating_sub(first.time_ms);
        if dt == 0 {
            return 0.0;
        }
        (last.x - first.x) * 1000.0 / dt as f64
    }
}

/// Interprets a single-pointer horizontal swipe.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    drag_slop: f64,
    fling_velocity_threshold: f64,
    max_fling_velocity: f64,
    start_x: Option<f64>,
    last_x: f64,
    dragging: bool,
    velocity: VelocityTracker,
}

impl GestureTracker {
    /// Creates a tracker using the slop and fling settings of `config`.
    #[must_use]
    pub fn new(config: &PagerConfig) -> Self {
        Self {
            drag_slop: config.drag_slop,
            fling_velocity_threshold: config.fling_velocity_threshold,
            max_fling_velocity: config.max_fling_velocity,
            start_x: None,
            last_x: 0.0,
            dragging: false,
            velocity: VelocityTracker::default(),
        }
    }

    /// Returns `true` between a press and its release or cancellation.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.start_x.is_some()
    }

    /// Returns `true` once the press has travelled past the slop.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Starts tracking a press at `position`.
    pub fn on_down(&mut self, position: Point, time_ms: u64) {
        self.start_x = Some(position.x);
        self.last_x = position.x;
        self.dragging = false;
        self.velocity.clear();
        self.velocity.add(position.x, time_ms);
    }

    /// Feeds a move sample and returns the clamped scroll delta to apply.
    ///
    /// Returns `None` until the press becomes a drag. The reference position
    /// only advances while dragging, so the first delta includes everything
    /// travelled inside the slop.
    pub fn on_move(&mut self, position: Point, time_ms: u64, geometry: &PageGeometry) -> Option<f64> {
        let start_x = self.start_x?;
        self.velocity.add(position.x, time_ms);

        if !self.dragging && (position.x - start_x).abs() > self.drag_slop {
            self.dragging = true;
            tracing::trace!(travel = position.x - start_x, "press became a drag");
        }
        if !self.dragging {
            return None;
        }

        let delta = self.last_x - position.x;
        self.last_x = position.x;
        let clamped = if delta < 0.0 {
            delta.max(-geometry.offset.max(0.0))
        } else {
            delta.min((geometry.max_offset() - geometry.offset).max(0.0))
        };
        Some(clamped)
    }

    /// Ends the press and resolves where to settle.
    pub fn on_up(&mut self, position: Point, time_ms: u64, geometry: &PageGeometry) -> Release {
        if self.start_x.is_none() {
            return Release::Tap;
        }
        self.velocity.add(position.x, time_ms);
        let was_dragging = self.dragging;
        // Scroll space runs against the pointer.
        let velocity = -self
            .velocity
            .velocity()
            .clamp(-self.max_fling_velocity, self.max_fling_velocity);
        self.reset();

        if !was_dragging {
            return Release::Tap;
        }
        let target = resolve_target(geometry, velocity, self.fling_velocity_threshold);
        tracing::trace!(velocity, slot = target, "resolved release");
        Release::Settle(target)
    }

    /// Aborts the press; a drag snaps back to the nearest slot.
    pub fn on_cancel(&mut self, geometry: &PageGeometry) -> Option<usize> {
        let was_dragging = self.dragging;
        self.reset();
        was_dragging.then(|| geometry.nearest_slot())
    }

    /// Forgets any press in progress.
    pub fn reset(&mut self) {
        self.start_x = None;
        self.dragging = false;
        self.velocity.clear();
    }
}

/// Picks the settle slot for a release with the given scroll-space velocity.
///
/// A fling moves to the slot adjacent to the current one when such a slot
/// exists; anything else snaps to the nearest slot.
#[must_use]
pub fn resolve_target(geometry: &PageGeometry, velocity: f64, fling_threshold: f64) -> usize {
    let current = geometry.current;
    if velocity >= fling_threshold && current + 1 < geometry.len {
        current + 1
    } else if velocity <= -fling_threshold && current > 0 {
        current - 1
    } else {
        geometry.nearest_slot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(offset: f64, current: usize, len: usize) -> PageGeometry {
        PageGeometry {
            offset,
            page_width: 100.0,
            current,
            len,
        }
    }

    fn tracker() -> GestureTracker {
        GestureTracker::new(&PagerConfig::new().with_drag_slop(10.0))
    }

    #[test]
    fn nearest_slot_rounds_and_clamps() {
        assert_eq!(geometry(0.0, 0, 3).nearest_slot(), 0);
        assert_eq!(geometry(49.0, 0, 3).nearest_slot(), 0);
        assert_eq!(geometry(50.0, 0, 3).nearest_slot(), 1);
        assert_eq!(geometry(151.0, 0, 3).nearest_slot(), 2);
        assert_eq!(geometry(10_000.0, 0, 3).nearest_slot(), 2);
        assert_eq!(geometry(-40.0, 1, 3).nearest_slot(), 0);
        assert_eq!(geometry(0.0, 0, 0).nearest_slot(), 0);
    }

    #[test]
    fn small_travel_is_a_tap() {
        let mut g = tracker();
        let geo = geometry(0.0, 0, 3);
        g.on_down(Point::new(100.0, 0.0), 0);
        assert_eq!(g.on_move(Point::new(95.0, 0.0), 10, &geo), None);
        assert!(!g.is_dragging());
        assert_eq!(g.on_up(Point::new(95.0, 0.0), 20, &geo), Release::Tap);
        assert!(!g.is_pressed());
    }

    #[test]
    fn drag_is_clamped_to_realized_slots() {
        let mut g = tracker();
        g.on_down(Point::new(100.0, 0.0), 0);
        // Dragging right at the first slot cannot scroll before it.
        assert_eq!(g.on_move(Point::new(150.0, 0.0), 16, &geometry(0.0, 0, 3)), Some(-0.0));

        let mut g = tracker();
        g.on_down(Point::new(300.0, 0.0), 0);
        // Dragging left near the last slot stops at its origin.
        let delta = g.on_move(Point::new(100.0, 0.0), 16, &geometry(150.0, 1, 3));
        assert_eq!(delta, Some(50.0));
    }

    #[test]
    fn fast_release_flings_to_neighbour() {
        let mut g = tracker();
        let geo = geometry(100.0, 1, 3);
        g.on_down(Point::new(300.0, 0.0), 0);
        g.on_move(Point::new(280.0, 0.0), 10, &geo);
        // 40px in 20ms = 2000 px/s toward higher indices.
        let release = g.on_up(Point::new(260.0, 0.0), 20, &geometry(140.0, 1, 3));
        assert_eq!(release, Release::Settle(2));
    }

    #[test]
    fn fling_without_neighbour_snaps_to_nearest() {
        let mut g = tracker();
        g.on_down(Point::new(100.0, 0.0), 0);
        g.on_move(Point::new(130.0, 0.0), 10, &geometry(0.0, 0, 3));
        let release = g.on_up(Point::new(160.0, 0.0), 20, &geometry(0.0, 0, 3));
        assert_eq!(release, Release::Settle(0));
    }

    #[test]
    fn slow_release_snaps_to_nearest() {
        let mut g = tracker();
        g.on_down(Point::new(300.0, 0.0), 0);
        g.on_move(Point::new(240.0, 0.0), 500, &geometry(0.0, 0, 3));
        let release = g.on_up(Point::new(240.0, 0.0), 1000, &geometry(60.0, 0, 3));
        assert_eq!(release, Release::Settle(1));
    }

    #[test]
    fn cancel_snaps_back_only_when_dragging() {
        let mut g = tracker();
        g.on_down(Point::new(100.0, 0.0), 0);
        assert_eq!(g.on_cancel(&geometry(0.0, 0, 3)), None);

        g.on_down(Point::new(100.0, 0.0), 0);
        g.on_move(Point::new(20.0, 0.0), 5, &geometry(0.0, 0, 3));
        assert_eq!(g.on_cancel(&geometry(80.0, 0, 3)), Some(1));
        assert!(!g.is_pressed());
    }

    #[test]
    fn stale_samples_do_not_count_toward_velocity() {
        let mut v = VelocityTracker::default();
        v.add(0.0, 0);
        v.add(500.0, 50);
        v.add(500.0, 400);
        v.add(510.0, 420);
        assert_eq!(v.velocity(), 500.0);
    }

    #[test]
    fn resolve_target_prefers_fling() {
        let geo = geometry(130.0, 1, 3);
        assert_eq!(resolve_target(&geo, 1500.0, 1000.0), 2);
        assert_eq!(resolve_target(&geo, -1500.0, 1000.0), 0);
        assert_eq!(resolve_target(&geo, 999.0, 1000.0), 1);
    }
}
