use std::collections::VecDeque;
use std::time::Duration;

use twistymath::prelude::*;

use crate::{
    Move, MoveError, MoveRequest, PieceId, Puzzle, QueuedMove, Slice, Tween, normalize_turns,
};

/// Slice attached to a temporary pivot, rotating as a group.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMove {
    /// Axis index.
    pub axis: usize,
    /// Slice that was selected.
    pub slice: Slice,
    /// Pieces in the slice, sorted.
    pub pieces: Vec<PieceId>,
    /// Current angle of the pivot, in radians.
    pub angle: Float,
    /// Number of turns committed once the move finishes.
    pub turns: i32,
    /// Whether to append the move to the history.
    pub log: bool,
}
impl ActiveMove {
    fn as_move(&self) -> Move {
        Move {
            axis: self.axis,
            slice: self.slice,
            turns: self.turns,
        }
    }
}

/// State of the move state machine.
#[derive(Debug, Clone, Default)]
pub enum MachineState {
    /// No move in progress.
    #[default]
    Idle,
    /// A slice is attached to the pivot and follows an angle controlled from
    /// outside, usually by a drag.
    Armed(ActiveMove),
    /// The pivot is easing toward its target angle.
    Animating(ActiveMove, Tween),
    /// The pivot has reached its target. The move is committed on the next
    /// step.
    Snapping(ActiveMove),
}

/// Long-running activity that blocks new drags.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Activity {
    /// Normal operation.
    #[default]
    None,
    /// Playing back a scramble.
    Scrambling,
    /// Playing back the history in reverse.
    Solving,
}

/// Serializes all rotations so that exactly one slice moves at a time.
#[derive(Debug, Default, Clone)]
pub struct MoveStateMachine {
    state: MachineState,
    queue: VecDeque<QueuedMove>,
    /// Notation of every logged move since the last scramble or solve.
    history: Vec<String>,
    /// Notation of the last scramble.
    scramble: Vec<String>,
    activity: Activity,
}

impl MoveStateMachine {
    /// Constructs an idle state machine with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> &MachineState {
        &self.state
    }
    /// Returns the current activity.
    pub fn activity(&self) -> Activity {
        self.activity
    }
    /// Returns the logged move history, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
    /// Returns the notation of the last scramble.
    pub fn scramble(&self) -> &[String] {
        &self.scramble
    }
    /// Returns the number of moves waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether no move is in progress or queued.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, MachineState::Idle) && self.queue.is_empty()
    }
    /// Returns whether a new drag would be refused.
    pub fn is_busy(&self) -> bool {
        !self.is_idle() || self.activity != Activity::None
    }

    /// Queues a move after checking that its axis exists and its slice is
    /// nonempty right now.
    pub fn push_move(
        &mut self,
        puzzle: &Puzzle,
        mv: Move,
        duration: Duration,
        log: bool,
    ) -> Result<(), MoveError> {
        if self.is_idle() {
            puzzle.validate(mv)?;
        } else if puzzle.axis_vector(mv.axis).is_none() {
            return Err(MoveError::NoSuchAxis(mv.axis));
        }
        self.push(QueuedMove {
            request: MoveRequest::Move(mv),
            duration,
            log,
        });
        Ok(())
    }

    /// Queues a request without checking it. Invalid requests are skipped
    /// when they reach the front of the queue.
    pub fn push(&mut self, queued: QueuedMove) {
        self.queue.push_back(queued);
    }

    /// Attaches a slice to the pivot so that its angle can be controlled with
    /// [`Self::set_angle()`].
    pub fn arm(
        &mut self,
        puzzle: &Puzzle,
        axis: usize,
        slice: Slice,
        log: bool,
    ) -> Result<(), MoveError> {
        if self.is_busy() {
            return Err(MoveError::Busy);
        }
        let pieces = puzzle.validate(Move {
            axis,
            slice,
            turns: 0,
        })?;
        self.state = MachineState::Armed(ActiveMove {
            axis,
            slice,
            pieces,
            angle: 0.0,
            turns: 0,
            log,
        });
        Ok(())
    }

    /// Sets the angle of an armed pivot. Does nothing in any other state.
    pub fn set_angle(&mut self, angle: Float) {
        if let MachineState::Armed(active) = &mut self.state {
            active.angle = angle;
        }
    }

    /// Releases an armed pivot, easing it to `turns` whole turns.
    pub fn release(&mut self, puzzle: &Puzzle, turns: i32, duration: Duration) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            MachineState::Armed(mut active) => {
                let target = turns as Float * puzzle.unit_angle();
                let tween = Tween::new(active.angle, target, duration);
                active.turns = turns;
                MachineState::Animating(active, tween)
            }
            other => other,
        };
    }

    /// Clears the history and plays back a scramble.
    pub fn start_scramble(
        &mut self,
        puzzle: &Puzzle,
        moves: impl IntoIterator<Item = Move>,
        duration: Duration,
    ) {
        self.history.clear();
        self.scramble.clear();
        for mv in moves {
            if let Some(token) = puzzle.notation(mv) {
                self.scramble.push(token);
            }
            self.push(QueuedMove {
                request: MoveRequest::Move(mv),
                duration,
                log: false,
            });
        }
        self.activity = Activity::Scrambling;
    }

    /// Plays back inverted notation tokens. Once they finish, the history
    /// and scramble are cleared.
    pub fn start_reverse_solve(&mut self, tokens: Vec<String>, durations: Vec<Duration>) {
        for (token, duration) in tokens.into_iter().zip(durations) {
            self.push(QueuedMove {
                request: MoveRequest::Notation {
                    token,
                    invert: true,
                },
                duration,
                log: false,
            });
        }
        self.activity = Activity::Solving;
    }

    /// Steps the state machine forward by `delta`.
    pub fn advance(&mut self, puzzle: &mut Puzzle, delta: Duration) {
        match std::mem::take(&mut self.state) {
            MachineState::Idle => self.start_next(puzzle),
            MachineState::Armed(active) => self.state = MachineState::Armed(active),
            MachineState::Animating(mut active, mut tween) => {
                let done = tween.proceed(delta);
                active.angle = tween.value();
                self.state = match done {
                    true => MachineState::Snapping(active),
                    false => MachineState::Animating(active, tween),
                };
            }
            MachineState::Snapping(active) => {
                self.finish(puzzle, active);
                self.start_next(puzzle);
            }
        }

        if self.is_idle() {
            match self.activity {
                Activity::None => (),
                Activity::Scrambling => log::debug!("scramble finished"),
                Activity::Solving => {
                    log::debug!("reverse solve finished");
                    self.history.clear();
                    self.scramble.clear();
                }
            }
            self.activity = Activity::None;
        }
    }

    /// Steps the state machine until it is idle, completing every queued
    /// move. Returns early if a drag is holding the pivot.
    pub fn run_until_idle(&mut self, puzzle: &mut Puzzle) {
        while !self.is_idle() {
            if matches!(self.state, MachineState::Armed(_)) {
                return;
            }
            self.advance(puzzle, Duration::MAX);
        }
        self.advance(puzzle, Duration::ZERO);
    }

    /// Returns the rotation of a piece that is not yet part of its committed
    /// state, if it is attached to the pivot.
    pub fn pivot_rotation(&self, puzzle: &Puzzle, id: PieceId) -> Option<Quat> {
        let active = match &self.state {
            MachineState::Idle => return None,
            MachineState::Armed(a) | MachineState::Animating(a, _) | MachineState::Snapping(a) => a,
        };
        active
            .pieces
            .binary_search(&id)
            .is_ok()
            .then(|| puzzle.rotation(active.axis, active.angle))
    }

    fn finish(&mut self, puzzle: &mut Puzzle, active: ActiveMove) {
        let mv = active.as_move();
        if normalize_turns(mv.turns, puzzle.cycle_length()) == 0 {
            return;
        }
        puzzle.commit(mv, &active.pieces);
        if active.log {
            if let Some(token) = puzzle.notation(mv) {
                self.history.push(token);
            }
        }
    }

    fn start_next(&mut self, puzzle: &Puzzle) {
        while let Some(queued) = self.queue.pop_front() {
            let mv = match queued.request {
                MoveRequest::Move(mv) => mv,
                MoveRequest::Notation { token, invert } => {
                    match puzzle.family().parse_notation(&token) {
                        Ok(mv) if invert => mv.inverse(),
                        Ok(mv) => mv,
                        Err(e) => {
                            log::warn!("skipping queued move: {e}");
                            continue;
                        }
                    }
                }
            };
            let mv = puzzle.normalize(mv);
            if mv.turns == 0 {
                continue;
            }
            let pieces = match puzzle.validate(mv) {
                Ok(pieces) => pieces,
                Err(e) => {
                    log::warn!("skipping queued move: {e}");
                    continue;
                }
            };
            let active = ActiveMove {
                axis: mv.axis,
                slice: mv.slice,
                pieces,
                angle: 0.0,
                turns: mv.turns,
                log: queued.log,
            };
            let target = mv.turns as Float * puzzle.unit_angle();
            let tween = Tween::new(0.0, target, queued.duration);
            self.state = MachineState::Animating(active, tween);
            return;
        }
    }
}
