//! Constraint solving on the 2-simplex with up to two pinned axes.
//!
//! Each function takes the current composition and a lock state and returns
//! the next composition, or `None` when the edit must be ignored. None of
//! them touch controller state.

use crate::composition::{Axis, Composition, LockState, MAX_LOCKS};

/// Below this a pair of free fractions is treated as empty.
const EPS: f64 = 1e-12;

/// Recompute the determined axis when two axes are locked.
///
/// With fewer than two locks the composition is returned unchanged.
pub fn solve(composition: Composition, locks: LockState) -> Composition {
    match locks.determined_axis() {
        Some(free) => {
            let locked_sum: f64 = locks.locked_axes().map(|a| composition.get(a)).sum();
            composition.with(free, (1.0 - locked_sum).max(0.0))
        }
        None => composition,
    }
}

/// Reconcile a raw pointer reading with the lock state.
///
/// - no locks: `raw` passes through;
/// - one lock: the locked axis keeps its `current` value and the two free
///   axes share `1 − locked` in the proportion of their raw readings (each
///   floored at 0). Both readings at or below 0 leave nothing to share;
/// - two locks: fully determined, the pointer cannot move anything.
pub fn apply_locks(raw: Composition, current: Composition, locks: LockState) -> Option<Composition> {
    match locks.count() {
        0 => Some(raw),
        1 => {
            let locked = locks.locked_axes().next()?;
            let [a, b] = locked.others();
            let (wa, wb) = (raw.get(a).max(0.0), raw.get(b).max(0.0));
            let total = wa + wb;
            if total <= 0.0 {
                return None;
            }
            let rest = 1.0 - current.get(locked);
            Some(
                current
                    .with(a, rest * wa / total)
                    .with(b, rest * wb / total),
            )
        }
        _ => None,
    }
}

/// Set `axis` to `value` (a fraction) and rebalance the other two.
///
/// Refused when `axis` itself is locked or when both other axes are locked.
/// With one other axis locked, `value` is capped at `1 − locked` so the
/// remaining free axis never has to go negative.
pub fn redistribute(
    current: Composition,
    axis: Axis,
    value: f64,
    locks: LockState,
) -> Option<Composition> {
    if locks.is_locked(axis) {
        return None;
    }
    let value = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
    let [a, b] = axis.others();

    match (locks.is_locked(a), locks.is_locked(b)) {
        (false, false) => {
            let rest = 1.0 - value;
            let (ca, cb) = (current.get(a).max(0.0), current.get(b).max(0.0));
            let total = ca + cb;
            let (na, nb) = if total <= EPS {
                (rest / 2.0, rest / 2.0)
            } else {
                (rest * ca / total, rest * cb / total)
            };
            Some(current.with(axis, value).with(a, na).with(b, nb))
        }
        (true, false) | (false, true) => {
            let (pinned, free) = if locks.is_locked(a) { (a, b) } else { (b, a) };
            let room = (1.0 - current.get(pinned)).max(0.0);
            let value = value.min(room);
            Some(current.with(axis, value).with(free, (1.0 - value - current.get(pinned)).max(0.0)))
        }
        (true, true) => {
            debug_assert_eq!(locks.count(), MAX_LOCKS);
            None
        }
    }
}
