use std::time::Duration;

use pretty_assertions::assert_eq;
use twistymath::assert_approx_eq;
use twistymath::prelude::*;

use super::build;
use crate::*;

fn controller(id: &str) -> PuzzleController {
    PuzzleController::new(build(id), InteractionParams::default())
}

fn find_piece(puzzle: &Puzzle, position: Vec3) -> PieceId {
    puzzle
        .piece_ids()
        .find(|&id| {
            puzzle
                .piece(id)
                .is_some_and(|p| (p.position() - position).magnitude() < 0.01)
        })
        .expect("no piece at position")
}

#[test]
fn test_scramble_then_reverse_solve() {
    for id in ["pyraminx", "skewb", "megaminx", "cube:3", "cube:2x3x4"] {
        let mut c = controller(id);
        let params = ScrambleParams::from_seed(ScrambleType::Full, 42);
        c.scramble(params).expect("idle");
        assert_eq!(c.machine().activity(), Activity::Scrambling);
        c.run_until_idle();
        assert_eq!(c.machine().activity(), Activity::None);
        assert!(c.history().is_empty());
        let expected = params.generate(&**c.puzzle().family()).len();
        assert_eq!(c.machine().scramble().len(), expected, "{id}");

        c.reverse_solve().expect("idle");
        c.run_until_idle();
        assert!(c.is_solved(), "{id} is not solved after reverse solve");
        assert!(c.history().is_empty());
        assert!(c.machine().scramble().is_empty());
    }
}

#[test]
fn test_reverse_solve_undoes_rotations() {
    let mut c = controller("cube:2x3x4");
    for token in ["y", "R2", "U2", "z'"] {
        c.push_notation(token).expect("valid move");
        c.run_until_idle();
    }
    assert_eq!(c.history(), ["y", "R2", "U2", "z'"]);
    assert!(!c.is_solved());

    c.reverse_solve().expect("idle");
    c.run_until_idle();
    assert!(c.is_solved());
    assert!(c.history().is_empty());
    let family = c.puzzle().family().downcast_ref::<Cube>().expect("cuboid");
    assert_eq!(family.dims(), [2, 3, 4]);
}

#[test]
fn test_busy_rejection() {
    let mut c = controller("cube:3");
    c.push_notation("R").expect("valid move");
    assert!(c.machine().is_busy());
    assert_eq!(
        c.scramble(ScrambleParams::from_seed(ScrambleType::Full, 1)),
        Err(MoveError::Busy),
    );
    assert_eq!(c.reverse_solve(), Err(MoveError::Busy));
    assert!(!c.pointer_down(Vec2::new(400.0, 300.0), None));
    assert!(c.drag().is_none());

    // Queued moves are still accepted.
    c.push_notation("U").expect("valid move");
    c.run_until_idle();
    assert_eq!(c.history(), ["R", "U"]);
}

#[test]
fn test_rejected_moves_leave_no_trace() {
    let mut c = controller("pyraminx");
    let mv = Move {
        axis: 7,
        slice: Slice::Threshold(-0.4),
        turns: 1,
    };
    assert_eq!(c.push_move(mv), Err(MoveError::NoSuchAxis(7)));
    assert!(matches!(c.push_notation("X"), Err(MoveError::Notation(_))));
    assert_eq!(c.machine().queue_len(), 0);
    assert!(c.machine().is_idle());
    c.run_until_idle();
    assert!(c.history().is_empty());
    assert!(c.is_solved());
}

#[test]
fn test_snapping_is_observable() {
    let mut c = controller("cube:3");
    let s = c.puzzle().family().downcast_ref::<Cube>().expect("cube").params().spacing;
    let corner = find_piece(c.puzzle(), Vec3::new(s, s, s));

    c.push_notation("R").expect("valid move");
    c.advance(Duration::ZERO);
    assert!(matches!(c.machine().state(), MachineState::Animating(..)));

    c.advance(Duration::from_millis(70));
    let (q, _) = c.piece_transform(corner).expect("piece exists");
    let angle = quat_angle_between(q, Quat::one());
    assert!(angle > 0.1 && angle < std::f64::consts::FRAC_PI_2 - 0.1);

    c.advance(Duration::from_millis(70));
    assert!(matches!(c.machine().state(), MachineState::Snapping(_)));
    // The committed state is unchanged until the next step.
    let piece = c.puzzle().piece(corner).expect("piece exists");
    assert_eq!(piece.orientation, Quat::one());
    let (q, _) = c.piece_transform(corner).expect("piece exists");
    assert!(same_rotation(q, axis_angle(Vec3::unit_x(), -std::f64::consts::FRAC_PI_2)));

    c.advance(Duration::ZERO);
    assert!(c.machine().is_idle());
    assert_eq!(c.history(), ["R"]);
    let piece = c.puzzle().piece(corner).expect("piece exists");
    assert!(same_rotation(piece.orientation, q));
}

#[test]
fn test_drag_turns_layer() {
    let mut c = controller("cube:3");
    let s = c.puzzle().family().downcast_ref::<Cube>().expect("cube").params().spacing;
    // Top edge on the front face, which faces the default camera.
    let piece = find_piece(c.puzzle(), Vec3::new(0.0, s, s));
    let pick = Pick {
        piece,
        face_normal: Vec3::unit_z(),
        point: Some(Vec3::new(0.0, s, s + 0.5)),
    };

    assert!(c.pointer_down(Vec2::new(400.0, 250.0), Some(pick)));
    // Below the threshold, nothing is armed yet.
    c.pointer_move(Vec2::new(405.0, 250.0));
    assert!(matches!(c.machine().state(), MachineState::Idle));

    c.pointer_move(Vec2::new(430.0, 250.0));
    let MachineState::Armed(active) = c.machine().state() else {
        panic!("drag did not arm a slice");
    };
    assert_eq!(active.axis, 1);
    assert_eq!(active.pieces.len(), 9);
    assert_approx_eq!(active.angle, 0.3);

    c.pointer_move(Vec2::new(500.0, 250.0));
    c.pointer_up();
    assert!(matches!(c.machine().state(), MachineState::Animating(..)));
    c.run_until_idle();
    // Dragging right turns the top layer counterclockwise seen from above.
    assert_eq!(c.history(), ["U'"]);
}

#[test]
fn test_small_drag_snaps_back() {
    let mut c = controller("cube:3");
    let s = c.puzzle().family().downcast_ref::<Cube>().expect("cube").params().spacing;
    let piece = find_piece(c.puzzle(), Vec3::new(0.0, s, s));
    let pick = Pick {
        piece,
        face_normal: Vec3::unit_z(),
        point: None,
    };
    c.pointer_down(Vec2::new(400.0, 250.0), Some(pick));
    c.pointer_move(Vec2::new(420.0, 250.0));
    c.pointer_up();
    c.run_until_idle();
    assert!(c.history().is_empty());
    assert!(c.is_solved());
    assert!(c.puzzle().pieces().iter().all(|p| p.orientation == Quat::one()));
}

#[test]
fn test_locked_background_drag() {
    let mut c = controller("cube:3");
    assert!(c.pointer_down(Vec2::new(100.0, 100.0), None));
    c.pointer_move(Vec2::new(200.0, 100.0));
    assert!(matches!(
        c.drag().map(|d| d.mode),
        Some(DragMode::Locked { .. })
    ));
    c.pointer_up();
    c.run_until_idle();
    assert_eq!(c.history(), ["y'"]);
    assert!(c.is_solved());
}

#[test]
fn test_free_background_drag() {
    // The Skewb has no locked rotation axes.
    let mut c = controller("skewb");
    let before = c.view().rotation;
    assert!(c.pointer_down(Vec2::new(100.0, 100.0), None));
    c.pointer_move(Vec2::new(150.0, 100.0));
    assert!(matches!(c.drag().map(|d| d.mode), Some(DragMode::Free)));
    c.pointer_up();
    assert!(!same_rotation(c.view().rotation, before));
    assert!(c.machine().is_idle());
    assert!(c.history().is_empty());
}
