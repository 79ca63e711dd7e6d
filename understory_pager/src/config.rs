// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time pager configuration.
//!
//! A [`PagerConfig`] is fixed once a [`PageFlow`](crate::PageFlow) is built.
//! There are two starting points that differ only in their buffer radius:
//!
//! - [`PagerConfig::new`] keeps [`PagerConfig::DEFAULT_SIDE_BUFFER`] pages on
//!   each side of the current one.
//! - [`PagerConfig::from_attributes`] is meant for hosts that read settings
//!   from markup or style sheets; unset attributes fall back to
//!   [`PagerConfig::ATTRIBUTE_SIDE_BUFFER`] and the other defaults.
//!
//! ```rust
//! use understory_pager::{PagerAttributes, PagerConfig};
//!
//! let config = PagerConfig::new().with_side_buffer(1).with_drag_slop(12.0);
//! assert_eq!(config.side_buffer, 1);
//! assert_eq!(config.max_window_len(), 3);
//!
//! let from_markup = PagerConfig::from_attributes(&PagerAttributes::default()).unwrap();
//! assert_eq!(from_markup.side_buffer, PagerConfig::ATTRIBUTE_SIDE_BUFFER);
//! ```

use crate::error::ConfigurationError;

/// Tunables for the pager core.
#[derive(Clone, Debug, PartialEq)]
pub struct PagerConfig {
    /// Number of pages kept materialized on each side of the current page.
    pub side_buffer: usize,
    /// Minimum release speed, in pixels per second, that counts as a fling.
    pub fling_velocity_threshold: f64,
    /// Release speeds are clamped to this many pixels per second.
    pub max_fling_velocity: f64,
    /// Pointer travel, in pixels, before a press turns into a drag.
    pub drag_slop: f64,
    /// Settle animation length per pixel of travel, in milliseconds.
    pub settle_ms_per_pixel: f64,
    /// Upper bound on any settle animation, in milliseconds.
    pub max_settle_duration_ms: u64,
}

impl PagerConfig {
    /// Side buffer used by [`PagerConfig::new`].
    pub const DEFAULT_SIDE_BUFFER: usize = 3;
    /// Side buffer used by [`PagerConfig::from_attributes`] when unset.
    pub const ATTRIBUTE_SIDE_BUFFER: usize = 2;
    /// Default fling threshold in pixels per second.
    pub const DEFAULT_FLING_VELOCITY_THRESHOLD: f64 = 1000.0;
    /// Default clamp on release velocity in pixels per second.
    pub const DEFAULT_MAX_FLING_VELOCITY: f64 = 8000.0;
    /// Default drag slop in pixels.
    pub const DEFAULT_DRAG_SLOP: f64 = 8.0;

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            side_buffer: Self::DEFAULT_SIDE_BUFFER,
            fling_velocity_threshold: Self::DEFAULT_FLING_VELOCITY_THRESHOLD,
            max_fling_velocity: Self::DEFAULT_MAX_FLING_VELOCITY,
            drag_slop: Self::DEFAULT_DRAG_SLOP,
            settle_ms_per_pixel: 2.0,
            max_settle_duration_ms: 600,
        }
    }

    /// Builds a configuration from host-supplied attributes.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found by [`PagerConfig::validate`].
    pub fn from_attributes(attrs: &PagerAttributes) -> Result<Self, ConfigurationError> {
        let defaults = Self::new();
        let config = Self {
            side_buffer: attrs.side_buffer.unwrap_or(Self::ATTRIBUTE_SIDE_BUFFER),
            fling_velocity_threshold: attrs
                .fling_velocity_threshold
                .unwrap_or(defaults.fling_velocity_threshold),
            drag_slop: attrs.drag_slop.unwrap_or(defaults.drag_slop),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the number of pages kept on each side of the current page.
    #[must_use]
    pub fn with_side_buffer(mut self, side_buffer: usize) -> Self {
        self.side_buffer = side_buffer;
        self
    }

    /// Sets the fling threshold in pixels per second.
    #[must_use]
    pub fn with_fling_velocity_threshold(mut self, threshold: f64) -> Self {
        self.fling_velocity_threshold = threshold;
        self
    }

    /// Sets the release velocity clamp in pixels per second.
    #[must_use]
    pub fn with_max_fling_velocity(mut self, max: f64) -> Self {
        self.max_fling_velocity = max;
        self
    }

    /// Sets the drag slop in pixels.
    #[must_use]
    pub fn with_drag_slop(mut self, slop: f64) -> Self {
        self.drag_slop = slop;
        self
    }

    /// Sets the settle speed and its upper bound.
    #[must_use]
    pub fn with_settle_timing(mut self, ms_per_pixel: f64, max_duration_ms: u64) -> Self {
        self.settle_ms_per_pixel = ms_per_pixel;
        self.max_settle_duration_ms = max_duration_ms;
        self
    }

    /// Largest number of slots a window built from this configuration holds.
    #[must_use]
    pub fn max_window_len(&self) -> usize {
        self.side_buffer.saturating_mul(2).saturating_add(1)
    }

    /// Checks every numeric field.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field as a [`ConfigurationError`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let threshold = self.fling_velocity_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigurationError::FlingThreshold(threshold));
        }
        if !self.max_fling_velocity.is_finite() || self.max_fling_velocity < threshold {
            return Err(ConfigurationError::MaxFlingVelocity(self.max_fling_velocity));
        }
        if !self.drag_slop.is_finite() || self.drag_slop < 0.0 {
            return Err(ConfigurationError::DragSlop(self.drag_slop));
        }
        if !self.settle_ms_per_pixel.is_finite() || self.settle_ms_per_pixel < 0.0 {
            return Err(ConfigurationError::SettleSpeed(self.settle_ms_per_pixel));
        }
        Ok(())
    }
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional overrides read from host markup.
///
/// Every field left as `None` takes the attribute-form default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PagerAttributes {
    /// `side-buffer` attribute.
    pub side_buffer: Option<usize>,
    /// `fling-velocity` attribute.
    pub fling_velocity_threshold: Option<f64>,
    /// `drag-slop` attribute.
    pub drag_slop: Option<f64>,
}
