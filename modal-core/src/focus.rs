//! Keyboard focus trap for an open dialog.

/// Which way Tab is moving focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

impl TabDirection {
    pub const fn from_shift(shift: bool) -> Self {
        if shift {
            Self::Backward
        } else {
            Self::Forward
        }
    }
}

/// What the dialog should do with a Tab keypress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrapAction<N> {
    /// Let the browser move focus to the next element.
    PassThrough,
    /// Suppress navigation without moving focus anywhere.
    Hold,
    /// Move focus to the node and suppress navigation.
    FocusAndHold(N),
}

/// Decide how a Tab keypress is handled inside the dialog.
///
/// `focusables` is the dialog's focusable set in document order, `active`
/// the currently focused node and `active_inside` whether that node lives
/// inside the dialog.
pub fn trap_tab<N: Clone + PartialEq>(
    focusables: &[N],
    active: Option<&N>,
    active_inside: bool,
    direction: TabDirection,
) -> TrapAction<N> {
    let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
        return TrapAction::Hold;
    };

    let Some(active) = active.filter(|_| active_inside) else {
        return TrapAction::FocusAndHold(first.clone());
    };

    match direction {
        TabDirection::Forward if active == last => TrapAction::FocusAndHold(first.clone()),
        TabDirection::Backward if active == first => TrapAction::FocusAndHold(last.clone()),
        _ => TrapAction::PassThrough,
    }
}
