//! Composition and lock-state types.
//! All fraction math uses f64; a composition is a point on the 2-simplex.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TextureError;
use crate::regions::Color;

/// Tolerance used for the sum-to-one invariant.
pub const TOLERANCE: f64 = 1e-6;

/// At most this many axes may be locked at once.
pub const MAX_LOCKS: usize = 2;

// ── Axis ──────────────────────────────────────────────────────────────────────

/// One of the three particle-size fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Clay,
    Silt,
    Sand,
}

/// Static per-axis display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisInfo {
    pub label: &'static str,
    pub color: Color,
}

/// Indexed by [`Axis::index`].
pub static AXES: [AxisInfo; 3] = [
    AxisInfo { label: "Clay", color: Color::new(0xb3, 0x4a, 0x2f) },
    AxisInfo { label: "Silt", color: Color::new(0x4f, 0x7a, 0x9c) },
    AxisInfo { label: "Sand", color: Color::new(0xc9, 0x9a, 0x2e) },
];

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Clay, Axis::Silt, Axis::Sand];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::Clay => 0,
            Axis::Silt => 1,
            Axis::Sand => 2,
        }
    }

    pub fn info(self) -> &'static AxisInfo {
        &AXES[self.index()]
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// The two axes that are not `self`, in canonical order.
    pub const fn others(self) -> [Axis; 2] {
        match self {
            Axis::Clay => [Axis::Silt, Axis::Sand],
            Axis::Silt => [Axis::Clay, Axis::Sand],
            Axis::Sand => [Axis::Clay, Axis::Silt],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Axis {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clay" => Ok(Axis::Clay),
            "silt" => Ok(Axis::Silt),
            "sand" => Ok(Axis::Sand),
            _ => Err(TextureError::UnknownAxis(s.to_string())),
        }
    }
}

// ── Composition ───────────────────────────────────────────────────────────────

/// Clay, silt and sand fractions.
///
/// A committed composition has every component in [0, 1] and sums to 1
/// within [`TOLERANCE`]. Intermediate values (grid endpoints, raw pointer
/// readings) are allowed to leave the simplex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub clay: f64,
    pub silt: f64,
    pub sand: f64,
}

impl Composition {
    pub const fn new(clay: f64, silt: f64, sand: f64) -> Self {
        Self { clay, silt, sand }
    }

    /// Build a composition that must already lie on the simplex.
    pub fn try_new(clay: f64, silt: f64, sand: f64) -> Result<Self, TextureError> {
        let c = Self::new(clay, silt, sand);
        c.validate()?;
        Ok(c)
    }

    /// Build from percentages (0–100).
    pub fn from_percent(clay: f64, silt: f64, sand: f64) -> Self {
        Self::new(clay / 100.0, silt / 100.0, sand / 100.0)
    }

    #[inline]
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Clay => self.clay,
            Axis::Silt => self.silt,
            Axis::Sand => self.sand,
        }
    }

    #[inline]
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Clay => self.clay = value,
            Axis::Silt => self.silt = value,
            Axis::Sand => self.sand = value,
        }
    }

    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        self.set(axis, value);
        self
    }

    pub fn sum(&self) -> f64 {
        self.clay + self.silt + self.sand
    }

    pub fn is_finite(&self) -> bool {
        self.clay.is_finite() && self.silt.is_finite() && self.sand.is_finite()
    }

    pub fn has_negative(&self) -> bool {
        self.clay < 0.0 || self.silt < 0.0 || self.sand < 0.0
    }

    /// Clamp every component into [0, 1].
    pub fn clamped(self) -> Self {
        Self::new(
            self.clay.clamp(0.0, 1.0),
            self.silt.clamp(0.0, 1.0),
            self.sand.clamp(0.0, 1.0),
        )
    }

    /// Rescale so the components sum to 1. Returns None for a zero or
    /// non-finite total.
    pub fn normalized(self) -> Option<Self> {
        let total = self.sum();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        Some(Self::new(self.clay / total, self.silt / total, self.sand / total))
    }

    pub fn validate(&self) -> Result<(), TextureError> {
        if !self.is_finite() {
            return Err(TextureError::InvalidComposition(format!("non-finite component in {self}")));
        }
        if self.has_negative() {
            return Err(TextureError::InvalidComposition(format!("negative component in {self}")));
        }
        if (self.sum() - 1.0).abs() > TOLERANCE {
            return Err(TextureError::InvalidComposition(format!(
                "{self} sums to {:.6}, expected 1",
                self.sum()
            )));
        }
        Ok(())
    }

    /// Rounded integer percentage for one axis.
    pub fn percent(&self, axis: Axis) -> i64 {
        (self.get(axis) * 100.0).round() as i64
    }

    /// Display strings for the numeric inputs, in [`Axis::ALL`] order.
    pub fn display_strings(&self) -> [String; 3] {
        Axis::ALL.map(|a| self.percent(a).to_string())
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new(0.20, 0.40, 0.40)
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(clay {:.3}, silt {:.3}, sand {:.3})", self.clay, self.silt, self.sand)
    }
}

// ── Locks ─────────────────────────────────────────────────────────────────────

/// Which axes are pinned against user edits. Never more than [`MAX_LOCKS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "[bool; 3]", into = "[bool; 3]")]
pub struct LockState {
    locked: [bool; 3],
}

impl LockState {
    pub fn is_locked(&self, axis: Axis) -> bool {
        self.locked[axis.index()]
    }

    pub fn count(&self) -> usize {
        self.locked.iter().filter(|&&l| l).count()
    }

    /// Flip `axis`. Returns false, leaving the state untouched, when the
    /// flip would lock a third axis.
    pub fn toggle(&mut self, axis: Axis) -> bool {
        let i = axis.index();
        if !self.locked[i] && self.count() >= MAX_LOCKS {
            return false;
        }
        self.locked[i] = !self.locked[i];
        true
    }

    pub fn locked_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(|&a| self.is_locked(a))
    }

    pub fn free_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(|&a| !self.is_locked(a))
    }

    /// The single unlocked axis when two are locked.
    pub fn determined_axis(&self) -> Option<Axis> {
        if self.count() == MAX_LOCKS {
            self.free_axes().next()
        } else {
            None
        }
    }

    pub fn as_array(&self) -> [bool; 3] {
        self.locked
    }
}

impl TryFrom<[bool; 3]> for LockState {
    type Error = TextureError;

    fn try_from(locked: [bool; 3]) -> Result<Self, Self::Error> {
        let state = Self { locked };
        if state.count() > MAX_LOCKS {
            return Err(TextureError::InvalidConfig(format!(
                "at most {MAX_LOCKS} axes may be locked"
            )));
        }
        Ok(state)
    }
}

impl From<LockState> for [bool; 3] {
    fn from(state: LockState) -> Self {
        state.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_parses_case_insensitively() {
        assert_eq!("Clay".parse::<Axis>().unwrap(), Axis::Clay);
        assert_eq!(" SAND ".parse::<Axis>().unwrap(), Axis::Sand);
        assert!(matches!("loam".parse::<Axis>(), Err(TextureError::UnknownAxis(_))));
    }

    #[test]
    fn others_never_contains_self() {
        for a in Axis::ALL {
            assert!(!a.others().contains(&a), "{a} listed among its own others");
        }
    }

    #[test]
    fn try_new_rejects_off_simplex_values() {
        assert!(Composition::try_new(0.3, 0.4, 0.3).is_ok());
        assert!(Composition::try_new(0.3, 0.4, 0.4).is_err());
        assert!(Composition::try_new(-0.1, 0.6, 0.5).is_err());
        assert!(Composition::try_new(f64::NAN, 0.5, 0.5).is_err());
    }

    #[test]
    fn display_strings_round_to_whole_percent() {
        let c = Composition::new(0.334, 0.333, 0.333);
        assert_eq!(c.display_strings(), ["33", "33", "33"]);
        let c = Composition::new(0.125, 0.5, 0.375);
        assert_eq!(c.display_strings(), ["13", "50", "38"]);
    }

    #[test]
    fn third_lock_is_refused() {
        let mut locks = LockState::default();
        assert!(locks.toggle(Axis::Clay));
        assert!(locks.toggle(Axis::Silt));
        assert!(!locks.toggle(Axis::Sand), "third lock must be refused");
        assert_eq!(locks.count(), 2);
        assert_eq!(locks.determined_axis(), Some(Axis::Sand));

        // Unlocking is always allowed.
        assert!(locks.toggle(Axis::Clay));
        assert_eq!(locks.count(), 1);
        assert_eq!(locks.determined_axis(), None);
    }

    #[test]
    fn lock_state_rejects_three_locks_from_json() {
        let ok: LockState = serde_json::from_str("[true, false, true]").unwrap();
        assert_eq!(ok.count(), 2);
        assert!(serde_json::from_str::<LockState>("[true, true, true]").is_err());
    }
}
