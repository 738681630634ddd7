//! Piecewise coordinate remapping produced when a screen reflows (e.g. a
//! resize that rewraps long lines): each range records a row/column delta
//! that applies from its anchor position onward, until the next range.

/// A coordinate anywhere on screen or in scrollback. Ordered first by row,
/// then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct AbsolutePosition {
    pub row: u64,
    pub col: u32,
}

impl AbsolutePosition {
    pub fn new(row: u64, col: u32) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReflowRange {
    position: AbsolutePosition,
    dr: i64,
    dc: i32,
}

/// An ordered list of `(anchor position, row delta, column delta)` ranges.
/// Positions must be added in strictly increasing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReflowMap {
    ranges: Vec<ReflowRange>,
}

impl ReflowMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Appends one range anchored at `position`. Panics if `position` does
    /// not strictly exceed the last range's position.
    pub fn add_offset(&mut self, position: AbsolutePosition, dr: i64, dc: i32) {
        if let Some(last) = self.ranges.last() {
            assert!(last.position < position, "add_offset positions must strictly increase");
        }
        self.ranges.push(ReflowRange { position, dr, dc });
    }

    /// Combines `other` into `self` in place. If `other`'s first position
    /// strictly follows `self`'s last, `other`'s deltas are shifted by
    /// `self`'s trailing row delta and appended. Otherwise the two overlap:
    /// `self`'s deltas are shifted by `other`'s trailing row delta and
    /// `other` is prepended.
    pub fn merge(&mut self, other: ReflowMap) {
        if other.ranges.is_empty() {
            return;
        }
        if self.ranges.is_empty() {
            *self = other;
            return;
        }

        let this_last_position = self.ranges.last().unwrap().position;
        let other_first_position = other.ranges.first().unwrap().position;

        if this_last_position > other_first_position {
            let other_last_dr = other.ranges.last().unwrap().dr;
            for range in &mut self.ranges {
                range.dr += other_last_dr;
            }
            let mut merged = other.ranges;
            merged.append(&mut self.ranges);
            self.ranges = merged;
        } else {
            let this_last_dr = self.ranges.last().unwrap().dr;
            for range in other.ranges {
                self.ranges.push(ReflowRange {
                    position: range.position,
                    dr: range.dr + this_last_dr,
                    dc: range.dc,
                });
            }
        }
    }

    /// Maps `position` through the greatest range whose anchor is `<=
    /// position`, or returns it unchanged if no such range exists.
    pub fn map_position(&self, position: AbsolutePosition) -> AbsolutePosition {
        let idx = self.ranges.partition_point(|r| r.position <= position);
        let Some(range) = idx.checked_sub(1).and_then(|i| self.ranges.get(i)) else {
            return position;
        };

        AbsolutePosition {
            row: (position.row as i64 + range.dr) as u64,
            col: (position.col as i32 + range.dc) as u32,
        }
    }
}
