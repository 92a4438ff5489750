use itertools::Itertools;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use twistymath::prelude::*;

use super::{ALL_IDS, build};
use crate::*;

/// Checks that every pair of legal slices on each axis is either disjoint or
/// nested, and that the layers cover every piece exactly once.
fn assert_laminar(puzzle: &Puzzle) {
    let all = puzzle.piece_ids().collect_vec();
    for axis in 0..puzzle.axis_count() {
        let selections = puzzle
            .family()
            .legal_slices(axis)
            .into_iter()
            .map(|slice| puzzle.select_slice(axis, slice))
            .collect_vec();
        for (a, b) in selections.iter().tuple_combinations() {
            let shared = a.iter().filter(|id| b.contains(id)).count();
            assert!(
                shared == 0 || shared == a.len() || shared == b.len(),
                "{}: overlapping slices on axis {axis}",
                puzzle.family().name(),
            );
        }

        let layers = puzzle.layer_partition(axis);
        let covered = layers.iter().flatten().copied().sorted().collect_vec();
        assert_eq!(covered, all);
    }
}

#[test]
fn test_slices_are_laminar() {
    for &id in ALL_IDS {
        assert_laminar(&build(id));
    }
}

#[test]
fn test_cube_layers_partition_pieces() {
    let puzzle = build("cube:4");
    for axis in 0..3 {
        let sizes = puzzle
            .family()
            .legal_slices(axis)
            .into_iter()
            .map(|slice| puzzle.select_slice(axis, slice).len())
            .collect_vec();
        assert_eq!(sizes, [16, 12, 12, 16]);
    }
}

#[test]
fn test_layer_sizes() {
    let puzzle = build("pyraminx");
    let sizes = puzzle
        .family()
        .legal_slices(0)
        .into_iter()
        .map(|slice| puzzle.select_slice(0, slice).len())
        .collect_vec();
    assert_eq!(sizes, [1, 5]);

    let puzzle = build("skewb");
    let sizes = puzzle
        .family()
        .legal_slices(0)
        .into_iter()
        .map(|slice| puzzle.select_slice(0, slice).len())
        .collect_vec();
    assert_eq!(sizes, [7, 7]);

    let puzzle = build("megaminx");
    let face = puzzle.select_slice(4, Slice::Threshold(*FACE_SLICE));
    let wide = puzzle.select_slice(4, Slice::Threshold(*WIDE_SLICE));
    assert_eq!(face.len(), 11);
    assert_eq!(wide.len(), 62 - 11);
}

#[test]
fn test_turn_normalization() {
    let pyraminx = build("pyraminx");
    let tip = pyraminx.family().parse_notation("u").expect("valid");
    assert_eq!(pyraminx.normalize(Move { turns: 4, ..tip }).turns, 1);

    let cube = build("cube:3");
    let r = cube.family().parse_notation("R").expect("valid");
    assert_eq!(cube.normalize(Move { turns: 3, ..r }).turns, -1);

    let megaminx = build("megaminx");
    let u = megaminx.family().parse_notation("U").expect("valid");
    assert_eq!(megaminx.normalize(Move { turns: 8, ..u }).turns, -2);
}

#[test]
fn test_unknown_axis() {
    let mut puzzle = build("skewb");
    let mv = Move {
        axis: 99,
        slice: Slice::Threshold(0.5),
        turns: 1,
    };
    assert!(puzzle.select_slice(99, mv.slice).is_empty());
    assert!(puzzle.family().legal_slices(99).is_empty());
    assert_eq!(puzzle.apply_move(mv), Err(MoveError::NoSuchAxis(99)));
    assert!(puzzle.pieces().iter().all(|p| p.orientation == Quat::one()));
}

#[test]
fn test_rectangular_faces_reject_quarter_turns() {
    let mut puzzle = build("cube:2x3x4");
    assert_eq!(puzzle.apply_notation("R"), Err(MoveError::HalfTurnsOnly(0)));
    assert!(puzzle.apply_notation("R2").is_ok());
    // Whole-puzzle rotations are always allowed.
    assert!(puzzle.apply_notation("x").is_ok());
    assert!(puzzle.apply_notation("x'").is_ok());
    assert!(puzzle.apply_notation("R2").is_ok());
    assert!(puzzle.is_solved());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn proptest_scrambled_pieces_stay_snapped_and_laminar(
        id_index in 0..ALL_IDS.len(),
        seed in any::<u64>(),
    ) {
        let mut puzzle = build(ALL_IDS[id_index]);
        let params = ScrambleParams::from_seed(ScrambleType::Partial(30), seed);
        for mv in params.generate(&**puzzle.family()) {
            prop_assert!(puzzle.apply_move(mv).is_ok());
        }
        for piece in puzzle.pieces() {
            prop_assert!(puzzle.registry().angular_error(piece.orientation) < 1e-3);
            let snapped = puzzle.registry().snap(piece.orientation);
            prop_assert_eq!(puzzle.registry().snap(snapped), snapped);
        }
        assert_laminar(&puzzle);
    }
}
