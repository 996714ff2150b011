//! Robot capability set
//!
//! The [`Robot`] trait is what an action tree drives. The two
//! implementations here are bookkeeping robots: they record what they were
//! told to do and keep no physical state.

use serde::Serialize;
use std::fmt;

/// Anything that can be driven by an [`Action`](crate::Action) tree
pub trait Robot {
    fn move_forward(&mut self);
    fn turn_left(&mut self);
    fn turn_right(&mut self);
}

impl<R: Robot + ?Sized> Robot for &mut R {
    fn move_forward(&mut self) {
        (**self).move_forward()
    }

    fn turn_left(&mut self) {
        (**self).turn_left()
    }

    fn turn_right(&mut self) {
        (**self).turn_right()
    }
}

/// A single capability invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotCall {
    MoveForward,
    TurnLeft,
    TurnRight,
}

impl fmt::Display for RobotCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RobotCall::MoveForward => "move_forward",
            RobotCall::TurnLeft => "turn_left",
            RobotCall::TurnRight => "turn_right",
        };
        f.write_str(name)
    }
}

/// Records every call in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRecorder {
    calls: Vec<RobotCall>,
}

impl CallRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[RobotCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<RobotCall> {
        self.calls
    }
}

impl Robot for CallRecorder {
    fn move_forward(&mut self) {
        self.calls.push(RobotCall::MoveForward);
    }

    fn turn_left(&mut self) {
        self.calls.push(RobotCall::TurnLeft);
    }

    fn turn_right(&mut self) {
        self.calls.push(RobotCall::TurnRight);
    }
}

/// Counts calls per capability
///
/// Use this instead of [`CallRecorder`] when repeat counts make the full
/// trace too large to keep in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CallCounter {
    pub forward: u64,
    pub left: u64,
    pub right: u64,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.forward + self.left + self.right
    }
}

impl Robot for CallCounter {
    fn move_forward(&mut self) {
        self.forward += 1;
    }

    fn turn_left(&mut self) {
        self.left += 1;
    }

    fn turn_right(&mut self) {
        self.right += 1;
    }
}
