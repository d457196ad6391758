use std::sync::atomic::{AtomicUsize, Ordering};

/// Column widths of one decorator side, shared by all bars of a display.
///
/// Column `i` belongs to the `i`-th decorator of each bar. While rendering,
/// every decorator reads the width its column should converge on, and
/// publishes the width it actually needs. Between frames the display calls
/// [`converge`](Self::converge) so that all bars line up on the widest
/// column.
///
/// A bar whose decorator count differs from the column count renders
/// nothing for that frame, since its decorators were registered or removed
/// after the columns were laid out.
#[derive(Debug, Default)]
pub struct WidthSync {
    columns: Vec<WidthSlot>,
}

impl WidthSync {
    /// Create `columns` columns with no constraint
    pub fn new(columns: usize) -> Self {
        Self {
            columns: (0..columns).map(|_| WidthSlot::default()).collect(),
        }
    }

    /// Number of columns
    #[inline(always)]
    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    #[inline(always)]
    pub fn column(&self, index: usize) -> Option<&WidthSlot> {
        self.columns.get(index)
    }

    /// Make the widest width published in each column the constraint for
    /// the next frame, and reset the published widths.
    ///
    /// Columns that nothing published to keep their constraint.
    pub fn converge(&self) {
        for column in &self.columns {
            let width = column.published.swap(0, Ordering::AcqRel);
            if width > 0 {
                column.constraint.store(width, Ordering::Release);
            }
        }
    }
}

/// One column of a [`WidthSync`]
#[derive(Debug, Default)]
pub struct WidthSlot {
    constraint: AtomicUsize,
    published: AtomicUsize,
}

impl WidthSlot {
    /// The width this column should converge on, 0 if unconstrained
    #[inline(always)]
    pub fn constraint(&self) -> usize {
        self.constraint.load(Ordering::Acquire)
    }

    /// Publish the width this bar used for the column
    #[inline(always)]
    pub fn publish(&self, width: usize) {
        self.published.fetch_max(width, Ordering::AcqRel);
    }

    /// Widest width published since the last convergence
    #[inline(always)]
    pub fn published(&self) -> usize {
        self.published.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converge() {
        let sync = WidthSync::new(2);
        assert_eq!(sync.columns(), 2);
        let (a, b) = (sync.column(0).unwrap(), sync.column(1).unwrap());
        a.publish(3);
        a.publish(7);
        a.publish(5);
        assert_eq!(a.published(), 7);
        assert_eq!(a.constraint(), 0);
        sync.converge();
        assert_eq!(a.constraint(), 7);
        assert_eq!(a.published(), 0);
        assert_eq!(b.constraint(), 0);
        // nothing published: keep the constraint
        sync.converge();
        assert_eq!(a.constraint(), 7);
        assert!(sync.column(2).is_none());
    }
}
