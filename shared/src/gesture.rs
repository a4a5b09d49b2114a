//! Drag-to-create gesture state machine
//!
//! Angles passed in are raw pointer angles from [`pointer_angle`]. Every
//! drag ends on pointer-up wherever it happens; there is no cancel.
//!
//! [`pointer_angle`]: crate::time_math::pointer_angle

use crate::time_math::{angle_to_day_minutes, round_to_nearest_interval, MINUTES_PER_DAY};

/// Gesture phase
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging { start_angle: f64, current_angle: f64 },
}

/// Tentative interval proposed by a drag, in minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedInterval {
    pub start_time: u32,
    pub end_time: u32,
}

/// Turns pointer angles into a proposed interval
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Start a drag. Returns false if one is already active.
    pub fn pointer_down(&mut self, angle: f64) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = GestureState::Dragging {
            start_angle: angle,
            current_angle: angle,
        };
        true
    }

    /// Update the drag and return the live preview
    pub fn pointer_move(&mut self, angle: f64, granularity: u32) -> Option<ProposedInterval> {
        match &mut self.state {
            GestureState::Dragging {
                start_angle,
                current_angle,
            } => {
                *current_angle = angle;
                Some(proposed_interval(*start_angle, angle, granularity))
            }
            GestureState::Idle => None,
        }
    }

    /// Finish the drag and return the final interval
    pub fn pointer_up(&mut self, angle: f64, granularity: u32) -> Option<ProposedInterval> {
        match self.state {
            GestureState::Dragging { start_angle, .. } => {
                self.state = GestureState::Idle;
                Some(proposed_interval(start_angle, angle, granularity))
            }
            GestureState::Idle => None,
        }
    }

    /// Interval for the current drag position, if dragging
    pub fn preview(&self, granularity: u32) -> Option<ProposedInterval> {
        match self.state {
            GestureState::Dragging {
                start_angle,
                current_angle,
            } => Some(proposed_interval(start_angle, current_angle, granularity)),
            GestureState::Idle => None,
        }
    }

    /// Drop any active drag
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

/// Snap both ends to the granularity; an empty result grows by one unit
pub fn proposed_interval(start_angle: f64, end_angle: f64, granularity: u32) -> ProposedInterval {
    let granularity = granularity.max(1);
    let snap = |angle: f64| round_to_nearest_interval(angle_to_day_minutes(angle), granularity) % MINUTES_PER_DAY;

    let start_time = snap(start_angle);
    let mut end_time = snap(end_angle);
    if end_time == start_time {
        end_time = (start_time + granularity) % MINUTES_PER_DAY;
    }

    ProposedInterval {
        start_time,
        end_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_math::{chart_angle_to_pointer_angle, day_minutes_to_angle};

    fn at(minutes: u32) -> f64 {
        chart_angle_to_pointer_angle(day_minutes_to_angle(minutes))
    }

    #[test]
    fn test_click_without_motion_is_one_unit() {
        let mut gesture = GestureController::new();
        assert!(gesture.pointer_down(at(600)));
        let interval = gesture.pointer_up(at(600), 15).unwrap();

        assert_eq!(interval, ProposedInterval { start_time: 600, end_time: 615 });
        assert_eq!(gesture.state(), GestureState::Idle);
    }

    #[test]
    fn test_drag_snaps_to_granularity() {
        let mut gesture = GestureController::new();
        gesture.pointer_down(at(543));
        let preview = gesture.pointer_move(at(628), 15).unwrap();
        assert_eq!(preview, ProposedInterval { start_time: 540, end_time: 630 });
        assert_eq!(gesture.preview(15), Some(preview));

        let interval = gesture.pointer_up(at(661), 30).unwrap();
        assert_eq!(interval, ProposedInterval { start_time: 540, end_time: 660 });
    }

    #[test]
    fn test_end_near_midnight_wraps() {
        let interval = proposed_interval(at(1430), at(1436), 15);
        assert_eq!(interval, ProposedInterval { start_time: 1425, end_time: 0 });

        let interval = proposed_interval(at(1436), at(1436), 15);
        assert_eq!(interval, ProposedInterval { start_time: 0, end_time: 15 });
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let mut gesture = GestureController::new();
        gesture.pointer_down(at(60));
        assert!(!gesture.pointer_down(at(900)));
        let interval = gesture.pointer_up(at(120), 15).unwrap();
        assert_eq!(interval.start_time, 60);
    }

    #[test]
    fn test_idle_move_and_up_are_ignored() {
        let mut gesture = GestureController::new();
        assert_eq!(gesture.pointer_move(at(60), 15), None);
        assert_eq!(gesture.pointer_up(at(60), 15), None);
        assert_eq!(gesture.preview(15), None);
    }
}
