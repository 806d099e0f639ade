//! Lock-free round-robin cursor.

use std::sync::atomic::{AtomicI64, Ordering};

/// Position before the first advance. The first `advance` lands on 0.
const UNSET: i64 = -1;

/// Round-robin position into the rotation pool.
///
/// `advance` is a compare-and-swap loop, so concurrent requests each observe
/// a distinct step and no index is skipped or handed out twice.
#[derive(Debug)]
pub struct RotationCursor {
    position: AtomicI64,
}

impl Default for RotationCursor {
    fn default() -> Self {
        Self { position: AtomicI64::new(UNSET) }
    }
}

impl RotationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step to the next index and return it.
    ///
    /// Returns `None` for an empty pool; callers must then leave the source
    /// untouched.
    pub fn advance(&self, pool_size: usize) -> Option<usize> {
        if pool_size == 0 {
            return None;
        }
        let size = i64::try_from(pool_size).unwrap_or(i64::MAX);
        let previous = self
            .position
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| Some(next_position(current, size)))
            .unwrap_or_else(|current| current);
        usize::try_from(next_position(previous, size)).ok()
    }

    /// Set the position from its persisted form.
    ///
    /// Non-negative integers are stored as-is. Negative integers are treated
    /// as unset, like empty or non-numeric input, so the next advance starts
    /// at index 0.
    pub fn restore(&self, persisted: &str) {
        let position = match persisted.trim().parse::<i64>() {
            Ok(n) if n >= 0 => n,
            _ => UNSET,
        };
        self.position.store(position, Ordering::Release);
    }

    pub fn reset(&self) {
        self.position.store(UNSET, Ordering::Release);
    }

    /// Last index handed out, if any.
    pub fn position(&self) -> Option<usize> {
        usize::try_from(self.position.load(Ordering::Acquire)).ok()
    }

    /// The position as a decimal integer, ready to persist.
    pub fn snapshot(&self) -> String {
        self.position.load(Ordering::Acquire).to_string()
    }
}

/// `(current + 1) mod size`, for any stored value including the sentinel.
fn next_position(current: i64, size: i64) -> i64 {
    (current.rem_euclid(size) + 1) % size
}
