// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host layout surface.
//!
//! The pager core never touches rendering. Instead the host implements
//! [`Container`] for whatever node or widget hosts the pages, and calls
//! [`PageFlow::layout`](crate::PageFlow::layout) when it lays out.

/// Size offered by the host along one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SizeConstraint {
    /// The container is exactly this size.
    Exactly(f64),
    /// The container may be at most this size.
    AtMost(f64),
    /// No constraint.
    Unspecified,
}

impl SizeConstraint {
    /// The size if it is exact.
    #[must_use]
    pub fn exact(self) -> Option<f64> {
        match self {
            Self::Exactly(size) => Some(size),
            _ => None,
        }
    }
}

/// Where one realized page goes.
///
/// `x` is in content space: slot `i` sits at `i * width`. Hosts translate by
/// the scroll offset passed next to the placements.
#[derive(Debug)]
pub struct Placement<'a, P> {
    /// The page to place.
    pub page: &'a P,
    /// Its collection index.
    pub index: usize,
    /// Left edge in content space.
    pub x: f64,
    /// Page width (the container width).
    pub width: f64,
    /// Page height (the container height).
    pub height: f64,
}

/// A host node that displays the pager's pages.
pub trait Container<P> {
    /// Reports the horizontal and vertical constraints for the pager.
    fn measure(&self) -> (SizeConstraint, SizeConstraint);

    /// Positions the realized pages, in window order.
    fn layout_children_at(&mut self, placements: &[Placement<'_, P>], scroll_offset: f64);

    /// Requests another frame; called while the pager still animates.
    fn invalidate(&mut self) {}
}
