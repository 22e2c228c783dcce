//! Window selection.
//!
//! A snapshot of compositor windows is narrowed down to the ones that
//! participate in tiling by running it through an ordered chain of
//! predicates. A window survives only if **every** predicate accepts it;
//! the relative order of survivors is the snapshot order, untouched.

use crate::types::{Rect, WindowInfo, WindowState};

/// A window inclusion predicate.
pub type Predicate = dyn Fn(&WindowInfo) -> bool;

/// Keep the windows for which all `predicates` hold, in snapshot order.
pub fn filter_windows<'w>(
    windows: &'w [WindowInfo],
    predicates: &[&Predicate],
) -> Vec<&'w WindowInfo> {
    windows
        .iter()
        .filter(|w| predicates.iter().all(|p| p(w)))
        .collect()
}

/// Accept any window that is not minimized.
pub fn is_non_minimized(w: &WindowInfo) -> bool {
    w.state != WindowState::Minimized
}

/// Accept a window whose top-left corner lies within `area`.
///
/// The corner is a proxy for "on this screen": both bounds are inclusive on
/// both axes, and the window's far corner may extend past the area; that
/// is ignored.
pub fn is_within_work_area(w: &WindowInfo, area: &Rect) -> bool {
    w.rect.left >= area.left
        && w.rect.left <= area.left + area.width
        && w.rect.top >= area.top
        && w.rect.top <= area.top + area.height
}

//  Tests
