//! Keeps axes of separate views showing the same range.
//!
//! Views own their axes, so linked views cannot share one. An [`AxisLink`]
//! instead remembers what both axes showed after the last sync and copies
//! the range of whichever one moved onto the other. Call [`AxisLink::sync`]
//! once per frame after the views have handled their input.

use crate::axis::AxisModel;

type Ranges = ((f64, f64), (f64, f64));

/// Two-way visible range link between two axes of the same kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisLink {
    last: Option<Ranges>,
}

impl AxisLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the raw visible range from the axis that moved since the last
    /// call onto the other. On the first call, or when both moved, `a` leads.
    ///
    /// Returns whether either axis changed, i.e. whether the follower needs
    /// a repaint. Axes of different kinds are never linked.
    pub fn sync<A: AxisModel, B: AxisModel>(&mut self, a: &mut A, b: &mut B) -> bool {
        if a.kind() != b.kind() {
            log::warn!("cannot link a {:?} axis with a {:?} axis", a.kind(), b.kind());
            return false;
        }

        let before = (range(a), range(b));
        let b_leads = self
            .last
            .is_some_and(|(last_a, last_b)| before.0 == last_a && before.1 != last_b);
        if b_leads {
            a.core_mut().set_visible_range(before.1 .0, before.1 .1);
        } else {
            b.core_mut().set_visible_range(before.0 .0, before.0 .1);
        }

        let after = (range(a), range(b));
        self.last = Some(after);
        if after != before {
            log::trace!("linked axes synced to {:?}", after);
        }
        after != before
    }

    /// Forgets the last synced state so the next sync lets `a` lead.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

fn range<A: AxisModel>(axis: &A) -> (f64, f64) {
    (axis.core().visible_start(), axis.core().visible_stop())
}
