//! L4 Atomic Layer: Pure easing functions for scroll animations
//!
//! Maps normalized progress in [0, 1] to eased progress. Inputs outside the
//! range are extrapolated, never clamped, so overshooting curves stay legal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An easing curve: normalized progress in, eased progress out
pub type EasingFn = fn(f64) -> f64;

/// f(k) = k
#[inline]
pub fn linear(k: f64) -> f64 {
    k
}

/// f(k) = k³
#[inline]
pub fn cubic_in(k: f64) -> f64 {
    k * k * k
}

/// f(k) = 1 + (k-1)³
#[inline]
pub fn cubic_out(k: f64) -> f64 {
    let k = k - 1.0;
    k * k * k + 1.0
}

/// Accelerates through the first half, decelerates symmetrically through the
/// second. Both branches meet at exactly 0.5 when k = 0.5.
#[inline]
pub fn cubic_in_out(k: f64) -> f64 {
    let k = k * 2.0;
    if k < 1.0 {
        0.5 * k * k * k
    } else {
        let k = k - 2.0;
        0.5 * (k * k * k + 2.0)
    }
}

/// Named easing curves, usable from configuration and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    Linear,
    CubicIn,
    CubicOut,
    #[default]
    CubicInOut,
}

impl EasingType {
    pub const ALL: [EasingType; 4] = [
        EasingType::Linear,
        EasingType::CubicIn,
        EasingType::CubicOut,
        EasingType::CubicInOut,
    ];

    /// Resolve to the underlying curve
    pub fn function(self) -> EasingFn {
        match self {
            EasingType::Linear => linear,
            EasingType::CubicIn => cubic_in,
            EasingType::CubicOut => cubic_out,
            EasingType::CubicInOut => cubic_in_out,
        }
    }

    /// Apply the easing function to a progress value
    #[inline]
    pub fn apply(self, k: f64) -> f64 {
        (self.function())(k)
    }

    pub fn name(self) -> &'static str {
        match self {
            EasingType::Linear => "linear",
            EasingType::CubicIn => "cubic-in",
            EasingType::CubicOut => "cubic-out",
            EasingType::CubicInOut => "cubic-in-out",
        }
    }
}

impl fmt::Display for EasingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EasingType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        EasingType::ALL
            .into_iter()
            .find(|easing| easing.name() == normalized)
            .ok_or_else(|| crate::Error::Config(format!("unknown easing: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_boundaries() {
        for easing in EasingType::ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{:?} at k=0", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?} at k=1", easing);
        }
    }

    #[test]
    fn test_cubic_in_out_midpoint_is_continuous() {
        assert_eq!(cubic_in_out(0.5), 0.5);
        let below = cubic_in_out(0.5 - 1e-9);
        assert!((below - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in EasingType::ALL {
            let mut prev = 0.0;
            for i in 0..=20 {
                let k = i as f64 / 20.0;
                let v = easing.apply(k);
                assert!(v >= prev, "{:?} not monotonic at k={}", easing, k);
                prev = v;
            }
        }
    }

    #[test]
    fn test_out_of_range_extrapolates() {
        assert_eq!(linear(1.5), 1.5);
        assert_eq!(cubic_in(-1.0), -1.0);
        assert_eq!(cubic_out(2.0), 2.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("cubic-in-out".parse::<EasingType>().unwrap(), EasingType::CubicInOut);
        assert_eq!("Cubic_Out".parse::<EasingType>().unwrap(), EasingType::CubicOut);
        assert_eq!("linear".parse::<EasingType>().unwrap(), EasingType::Linear);
        assert!("bounce".parse::<EasingType>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for easing in EasingType::ALL {
            assert_eq!(easing.to_string().parse::<EasingType>().unwrap(), easing);
        }
    }
}
