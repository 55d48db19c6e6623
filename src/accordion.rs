//! Expand/collapse lifecycle of an accordion group.
//!
//! A click on the header is the only input. The render backend reports when
//! its transition has finished through [`AccordionState::settle`].

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccordionState {
    #[default]
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

impl AccordionState {
    /// Header click. A click during a transition reverses it.
    #[must_use]
    pub fn click(self) -> Self {
        match self {
            Self::Collapsed | Self::Collapsing => Self::Expanding,
            Self::Expanded | Self::Expanding => Self::Collapsing,
        }
    }

    /// Transition finished.
    #[must_use]
    pub fn settle(self) -> Self {
        match self {
            Self::Expanding => Self::Expanded,
            Self::Collapsing => Self::Collapsed,
            steady => steady,
        }
    }

    /// Whether the body should be laid out at all.
    pub fn body_visible(self) -> bool {
        !matches!(self, Self::Collapsed)
    }

    /// Direction the body is heading: open or closed.
    pub fn target_open(self) -> bool {
        matches!(self, Self::Expanding | Self::Expanded)
    }

    pub fn is_animating(self) -> bool {
        matches!(self, Self::Expanding | Self::Collapsing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_follows_the_ring() {
        let mut state = AccordionState::default();
        let mut seen = vec![state];
        for step in 0..4 {
            state = if step % 2 == 0 { state.click() } else { state.settle() };
            seen.push(state);
        }
        assert_eq!(
            seen,
            [
                AccordionState::Collapsed,
                AccordionState::Expanding,
                AccordionState::Expanded,
                AccordionState::Collapsing,
                AccordionState::Collapsed,
            ]
        );
    }

    #[test]
    fn settle_is_a_no_op_at_rest() {
        assert_eq!(AccordionState::Collapsed.settle(), AccordionState::Collapsed);
        assert_eq!(AccordionState::Expanded.settle(), AccordionState::Expanded);
    }

    #[test]
    fn click_mid_transition_reverses() {
        assert_eq!(AccordionState::Expanding.click(), AccordionState::Collapsing);
        assert_eq!(AccordionState::Collapsing.click(), AccordionState::Expanding);
        assert!(AccordionState::Collapsing.body_visible());
        assert!(!AccordionState::Collapsing.target_open());
    }
}
