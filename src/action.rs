//! Action Tree
//!
//! The parsed form of a command sequence. A tree is built bottom-up by the
//! parser and never changes afterwards; it can be applied to any [`Robot`]
//! any number of times.
//!
//! Applying, rendering and dropping walk the tree with an explicit stack, so
//! they handle any nesting depth the parser accepts.

use serde::Serialize;
use std::fmt;
use std::mem;

use crate::robot::Robot;

/// A node of the action tree
///
/// The derived `Clone`, `Debug`, `PartialEq` and `Serialize` impls recurse
/// once per nesting level; see [`ParseOptions`](crate::ParseOptions) to bound
/// the depth of parsed trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    MoveForward,
    TurnLeft,
    TurnRight,
    /// Children run in order; an empty sequence does nothing
    Sequence { actions: Vec<Action> },
    /// Runs `action` exactly `count` times
    Repeat { count: u32, action: Box<Action> },
}

/// Pending work of [`Action::apply`]
enum Step<'a> {
    Run(&'a Action),
    /// A repeat body with `remaining` runs still to go, `remaining > 0`
    Again { action: &'a Action, remaining: u32 },
}

/// Pending output of the `Display` impl
enum Line<'a> {
    Node { action: &'a Action, indent: usize },
    EndRepeat { indent: usize },
}

impl Action {
    pub fn sequence(actions: Vec<Action>) -> Self {
        Action::Sequence { actions }
    }

    pub fn repeat(count: u32, action: Action) -> Self {
        Action::Repeat {
            count,
            action: Box::new(action),
        }
    }

    /// Drive `robot` through this action
    pub fn apply<R: Robot + ?Sized>(&self, robot: &mut R) {
        let mut steps = vec![Step::Run(self)];

        while let Some(step) = steps.pop() {
            let action = match step {
                Step::Run(action) => action,
                Step::Again { action, remaining } => {
                    if remaining > 1 {
                        steps.push(Step::Again {
                            action,
                            remaining: remaining - 1,
                        });
                    }
                    action
                }
            };

            match action {
                Action::MoveForward => robot.move_forward(),
                Action::TurnLeft => robot.turn_left(),
                Action::TurnRight => robot.turn_right(),
                Action::Sequence { actions } => {
                    steps.extend(actions.iter().rev().map(Step::Run));
                }
                Action::Repeat { count, action } => {
                    if *count > 0 {
                        steps.push(Step::Again {
                            action,
                            remaining: *count,
                        });
                    }
                }
            }
        }
    }

    /// Move the direct children of this node into `into`
    fn take_children(&mut self, into: &mut Vec<Action>) {
        match self {
            Action::Sequence { actions } => into.append(actions),
            Action::Repeat { action, .. } => into.push(mem::take(&mut **action)),
            Action::MoveForward | Action::TurnLeft | Action::TurnRight => {}
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Action::sequence(Vec::new())
    }
}

impl Drop for Action {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);

        // Each node is emptied before it goes out of scope
        while let Some(mut action) = pending.pop() {
            action.take_children(&mut pending);
        }
    }
}

/// Renders the tree as command text, one command per line, with repeat
/// bodies indented by two spaces
///
/// Nested sequences are written inline into their parent, and the parser
/// always wraps a repeat body in a sequence. Re-parsing the text therefore
/// gives the same calls, and the same tree for any tree the parser built;
/// `Action::repeat(2, Action::MoveForward)` comes back as
/// `Action::repeat(2, Action::sequence(vec![Action::MoveForward]))` inside the
/// root sequence.
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![Line::Node {
            action: self,
            indent: 0,
        }];

        while let Some(line) = lines.pop() {
            let (action, indent) = match line {
                Line::Node { action, indent } => (action, indent),
                Line::EndRepeat { indent } => {
                    writeln!(f, "{:pad$}END REPEAT", "", pad = indent * 2)?;
                    continue;
                }
            };
            let pad = indent * 2;

            match action {
                Action::MoveForward => writeln!(f, "{:pad$}FORWARD", "")?,
                Action::TurnLeft => writeln!(f, "{:pad$}LEFT", "")?,
                Action::TurnRight => writeln!(f, "{:pad$}RIGHT", "")?,
                Action::Sequence { actions } => lines.extend(
                    actions
                        .iter()
                        .rev()
                        .map(|action| Line::Node { action, indent }),
                ),
                Action::Repeat { count, action } => {
                    writeln!(f, "{:pad$}REPEAT {count}", "")?;
                    lines.push(Line::EndRepeat { indent });
                    lines.push(Line::Node {
                        action,
                        indent: indent + 1,
                    });
                }
            }
        }

        Ok(())
    }
}
