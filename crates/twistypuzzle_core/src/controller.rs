use std::time::Duration;

use float_ord::FloatOrd;
use twistymath::prelude::*;

use crate::{
    DragMode, DragSession, InteractionParams, MachineState, Move, MoveError, MoveStateMachine,
    Pick, PieceId, Puzzle, RotationMode, ScrambleParams, Slice, View, free_rotation,
    locked_rotation_direction, release_turns, reverse_solve_durations, reverse_solve_tokens,
};

/// Puzzle together with its move state machine, view, and pointer
/// interaction.
#[derive(Debug)]
pub struct PuzzleController {
    puzzle: Puzzle,
    machine: MoveStateMachine,
    view: View,
    params: InteractionParams,
    drag: Option<DragSession>,
}

impl PuzzleController {
    /// Constructs a controller for a puzzle in its current state.
    pub fn new(puzzle: Puzzle, params: InteractionParams) -> Self {
        Self {
            puzzle,
            machine: MoveStateMachine::new(),
            view: View::default(),
            params,
            drag: None,
        }
    }

    /// Returns the puzzle, without any move in progress applied.
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }
    /// Returns the move state machine.
    pub fn machine(&self) -> &MoveStateMachine {
        &self.machine
    }
    /// Returns the view.
    pub fn view(&self) -> &View {
        &self.view
    }
    /// Returns the view mutably, for changing the camera.
    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }
    /// Returns the interaction parameters.
    pub fn params(&self) -> &InteractionParams {
        &self.params
    }
    /// Returns the current drag session, if any.
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }
    /// Returns the logged move history, oldest first.
    pub fn history(&self) -> &[String] {
        self.machine.history()
    }
    /// Returns whether the puzzle is solved.
    pub fn is_solved(&self) -> bool {
        self.puzzle.is_solved()
    }

    /// Returns the orientation and offset of a piece as displayed, including
    /// any move in progress.
    pub fn piece_transform(&self, id: PieceId) -> Option<(Quat, Vec3)> {
        let piece = self.puzzle.piece(id)?;
        Some(match self.machine.pivot_rotation(&self.puzzle, id) {
            Some(rot) => (rot * piece.orientation, rot.rotate_vector(piece.offset)),
            None => (piece.orientation, piece.offset),
        })
    }

    /// Queues a move that is logged once it completes.
    pub fn push_move(&mut self, mv: Move) -> Result<(), MoveError> {
        let result =
            self.machine
                .push_move(&self.puzzle, mv, self.params.twist_duration(), true);
        if let Err(e) = &result {
            log::debug!("rejected move {mv:?}: {e}");
        }
        result
    }

    /// Parses and queues a move.
    pub fn push_notation(&mut self, token: &str) -> Result<Move, MoveError> {
        let mv = self.puzzle.family().parse_notation(token)?;
        self.push_move(mv)?;
        Ok(mv)
    }

    /// Clears the history and plays back a new scramble.
    pub fn scramble(&mut self, params: ScrambleParams) -> Result<(), MoveError> {
        if self.machine.is_busy() || self.drag.is_some() {
            return Err(MoveError::Busy);
        }
        let moves = params.generate(&**self.puzzle.family());
        log::debug!("scrambling with {} moves", moves.len());
        self.machine
            .start_scramble(&self.puzzle, moves, self.params.scramble_duration());
        Ok(())
    }

    /// Undoes the history and then the scramble.
    pub fn reverse_solve(&mut self) -> Result<(), MoveError> {
        if self.machine.is_busy() || self.drag.is_some() {
            return Err(MoveError::Busy);
        }
        let tokens = reverse_solve_tokens(self.machine.history(), self.machine.scramble());
        let durations = reverse_solve_durations(
            tokens.len(),
            self.params.reverse_duration(),
            self.params.reverse_budget(),
        );
        self.machine.start_reverse_solve(tokens, durations);
        Ok(())
    }

    /// Steps animation forward by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.machine.advance(&mut self.puzzle, delta);
    }
    /// Completes every queued move immediately.
    pub fn run_until_idle(&mut self) {
        self.machine.run_until_idle(&mut self.puzzle);
    }

    /// Handles a pointer press at a pixel position. `pick` is the piece under
    /// the pointer, if any. Returns whether a drag session started.
    pub fn pointer_down(&mut self, pos: Vec2, pick: Option<Pick>) -> bool {
        if self.machine.is_busy() {
            log::debug!("ignoring press while busy");
            return false;
        }
        self.drag = Some(DragSession::new(pos, pick));
        true
    }

    /// Handles pointer movement to a pixel position.
    pub fn pointer_move(&mut self, pos: Vec2) {
        let Some(session) = &mut self.drag else {
            return;
        };
        let prev = session.last;
        session.last = pos;
        let mut step = pos - prev;
        if session.mode == DragMode::Pending {
            if !session.exceeds_threshold(self.params.drag_threshold) {
                return;
            }
            let session = session.clone();
            step = session.delta();
            let mode = self.begin_drag(&session);
            log::trace!("drag resolved to {mode:?}");
            if let Some(s) = &mut self.drag {
                s.mode = mode;
            }
        }

        let Some(session) = &self.drag else {
            return;
        };
        let sensitivity = self.params.drag_sensitivity;
        match session.mode {
            DragMode::Twist(res) => {
                let angle = res.screen_axis.component(session.delta()) * sensitivity * res.angle_sign;
                self.machine.set_angle(angle);
            }
            DragMode::Locked {
                screen_axis,
                angle_sign,
            } => {
                let angle = screen_axis.component(session.delta()) * sensitivity * angle_sign;
                self.machine.set_angle(angle);
            }
            DragMode::Free => {
                if let Some((axis, angle)) = free_rotation(step, sensitivity) {
                    let axis = self.view.camera_to_puzzle(axis);
                    self.view.rotation = (self.view.rotation * axis_angle(axis, angle)).normalize();
                }
            }
            DragMode::Pending | DragMode::Ignored => (),
        }
    }

    /// Handles a pointer release. An armed slice eases to the nearest whole
    /// turn, with hysteresis.
    pub fn pointer_up(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        if !matches!(session.mode, DragMode::Twist(_) | DragMode::Locked { .. }) {
            return;
        }
        let (axis, slice, angle) = match self.machine.state() {
            MachineState::Armed(active) => (active.axis, active.slice, active.angle),
            _ => return,
        };
        let half_turns_only =
            slice != Slice::WholePuzzle && self.puzzle.family().requires_half_turns(axis);
        let turns = release_turns(
            angle,
            self.puzzle.unit_angle(),
            self.params.release_hysteresis,
            half_turns_only,
        );
        self.machine
            .release(&self.puzzle, turns, self.params.snap_duration());
    }

    fn begin_drag(&mut self, session: &DragSession) -> DragMode {
        let delta = session.delta();
        if let Some(pick) = &session.pick {
            let resolution =
                self.puzzle
                    .family()
                    .resolve_drag(self.puzzle.pieces(), pick, delta, &self.view);
            if let Some(res) = resolution {
                return match self.machine.arm(&self.puzzle, res.axis, res.slice, true) {
                    Ok(()) => DragMode::Twist(res),
                    Err(e) => {
                        log::debug!("drag refused: {e}");
                        DragMode::Ignored
                    }
                };
            }
        }

        if self.params.rotation_mode == RotationMode::Locked {
            if let Some(axes) = self.puzzle.family().locked_rotation_axes() {
                let viewport_width = self.view.camera.viewport[0];
                let (camera_dir, screen_axis, scale) =
                    locked_rotation_direction(axes, session.start, delta, viewport_width);
                let dir = self.view.camera_to_puzzle(camera_dir);
                let Some((axis, dot)) = (0..self.puzzle.axis_count())
                    .filter_map(|i| Some((i, self.puzzle.axis_vector(i)?.dot(dir))))
                    .max_by_key(|&(_, dot)| FloatOrd(dot.abs()))
                else {
                    return DragMode::Ignored;
                };
                return match self.machine.arm(&self.puzzle, axis, Slice::WholePuzzle, true) {
                    Ok(()) => DragMode::Locked {
                        screen_axis,
                        angle_sign: scale * sign_of(dot),
                    },
                    Err(e) => {
                        log::debug!("rotation refused: {e}");
                        DragMode::Ignored
                    }
                };
            }
        }

        DragMode::Free
    }
}
