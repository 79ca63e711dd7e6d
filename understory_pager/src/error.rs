// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported while configuring or laying out a pager.

use core::fmt;

/// Which layout axis a [`ConfigurationError::InexactSize`] refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// The paging axis.
    Horizontal,
    /// The cross axis.
    Vertical,
}

/// Fatal configuration problems.
///
/// These are only reported while constructing a [`PageFlow`](crate::PageFlow)
/// or while the host lays it out. Everything that can go wrong at runtime
/// (out-of-range selections, a misbehaving [`PageSource`](crate::PageSource))
/// is recovered locally instead.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    /// The fling threshold must be a finite value greater than zero.
    FlingThreshold(f64),
    /// The maximum fling velocity must be finite and at least the fling threshold.
    MaxFlingVelocity(f64),
    /// The drag slop must be a finite, non-negative distance.
    DragSlop(f64),
    /// The settle speed must be a finite, non-negative duration per pixel.
    SettleSpeed(f64),
    /// The host container did not offer an exact size along `axis`.
    ///
    /// Every page is laid out at exactly the container's size, so the pager
    /// cannot be measured against "at most" or unspecified constraints.
    InexactSize {
        /// The offending axis.
        axis: Axis,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlingThreshold(v) => {
                write!(f, "fling velocity threshold must be finite and > 0, got {v}")
            }
            Self::MaxFlingVelocity(v) => write!(
                f,
                "maximum fling velocity must be finite and >= the fling threshold, got {v}"
            ),
            Self::DragSlop(v) => write!(f, "drag slop must be finite and >= 0, got {v}"),
            Self::SettleSpeed(v) => {
                write!(f, "settle duration per pixel must be finite and >= 0, got {v}")
            }
            Self::InexactSize { axis } => write!(
                f,
                "pager can only be measured with an exact {} size",
                match axis {
                    Axis::Horizontal => "horizontal",
                    Axis::Vertical => "vertical",
                }
            ),
        }
    }
}

impl core::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            ConfigurationError::DragSlop(-2.0).to_string(),
            "drag slop must be finite and >= 0, got -2"
        );
        assert_eq!(
            ConfigurationError::InexactSize {
                axis: Axis::Vertical
            }
            .to_string(),
            "pager can only be measured with an exact vertical size"
        );
    }
}
