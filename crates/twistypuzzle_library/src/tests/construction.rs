use std::collections::BTreeMap;

use itertools::Itertools;
use pretty_assertions::assert_eq;
use twistymath::prelude::*;

use super::{ALL_IDS, build};
use crate::*;

fn kind_counts(puzzle: &Puzzle) -> BTreeMap<PieceKind, usize> {
    let mut counts = BTreeMap::new();
    for piece in puzzle.pieces() {
        *counts.entry(piece.kind).or_default() += 1;
    }
    counts
}

#[test]
fn test_piece_counts() {
    use PieceKind::*;

    let expected: [(&str, &[(PieceKind, usize)]); 5] = [
        ("pyraminx", &[(Tip, 4), (Center, 4), (Edge, 6)]),
        ("skewb", &[(Center, 6), (Corner, 8)]),
        ("megaminx", &[(Center, 12), (Edge, 30), (Corner, 20)]),
        ("cube:3", &[(Center, 6), (Edge, 12), (Corner, 8)]),
        ("cube:4", &[(Center, 24), (Edge, 24), (Corner, 8)]),
    ];
    for (id, kinds) in expected {
        let puzzle = build(id);
        assert_eq!(kind_counts(&puzzle), kinds.iter().copied().collect(), "{id}");
        assert!(puzzle.logger().lines().is_empty(), "{id} build log is not empty");
    }
}

#[test]
fn test_orientation_group_orders() {
    for (id, order, cycle) in [
        ("pyraminx", 12, 3),
        ("skewb", 24, 3),
        ("megaminx", 60, 5),
        ("cube:3", 24, 4),
    ] {
        let puzzle = build(id);
        assert_eq!(puzzle.registry().valid_orientations().len(), order, "{id}");
        assert_eq!(puzzle.cycle_length(), cycle, "{id}");
    }
}

#[test]
fn test_every_piece_has_stickers() {
    for &id in ALL_IDS {
        let puzzle = build(id);
        for (i, piece) in puzzle.pieces().iter().enumerate() {
            assert!(!piece.stickers.is_empty(), "piece {i} of {id} has no stickers");
            for sticker in &piece.stickers {
                assert!(sticker.outline.len() >= 3);
                assert!(piece.faces.contains(&sticker.face));
            }
        }
        assert!(puzzle.is_solved(), "{id} starts unsolved");
    }
}

#[test]
fn test_cube_stickers() {
    let puzzle = build("cube:3");
    let stickers = puzzle.pieces().iter().map(|p| p.stickers.len()).sum::<usize>();
    assert_eq!(stickers, 54);

    let puzzle = build("cube:2x3x4");
    assert_eq!(puzzle.pieces().len(), 24);
    let stickers = puzzle.pieces().iter().map(|p| p.stickers.len()).sum::<usize>();
    assert_eq!(stickers, 2 * (2 * 3 + 3 * 4 + 2 * 4));
}

#[test]
fn test_unfilleted_cubie_is_box() {
    let params = LibraryParams {
        cube: CubeParams {
            fillet_radius: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let puzzle = params.build_puzzle(PuzzleId::Cube([2, 2, 2]));
    for piece in puzzle.pieces() {
        assert_eq!(piece.mesh.vertices().len(), 8);
        assert_eq!(piece.mesh.faces().len(), 6);
        twistymath::assert_approx_eq!(piece.mesh.volume(), 1.0, 1e-6);
    }
}

#[test]
fn test_centroids_follow_symmetry() {
    // Every piece's centroid points along its own sticker faces, so a
    // rotation in the symmetry group maps it onto another piece's centroid.
    for &id in ALL_IDS.iter().filter(|&&id| id != "cube:2x3x4") {
        let puzzle = build(id);
        let centroids = puzzle.pieces().iter().map(|p| p.initial_centroid).collect::<Vec<_>>();
        for &q in puzzle.registry().valid_orientations() {
            for &c in &centroids {
                let rotated = q.rotate_vector(c);
                assert!(
                    centroids.iter().any(|&other| (other - rotated).magnitude() < 1e-3),
                    "{id}: centroid {c:?} has no image under {q:?}",
                );
            }
        }
    }
}

#[test]
fn test_puzzle_ids() {
    assert_eq!("pyraminx".parse::<PuzzleId>(), Ok(PuzzleId::Pyraminx));
    assert_eq!("cube:3".parse::<PuzzleId>(), Ok(PuzzleId::Cube([3, 3, 3])));
    assert_eq!("cube:2x3x4".parse::<PuzzleId>(), Ok(PuzzleId::Cube([2, 3, 4])));
    assert_eq!(PuzzleId::Cube([5, 5, 5]).to_string(), "cube:5");
    assert_eq!(PuzzleId::Cube([1, 2, 3]).to_string(), "cube:1x2x3");
    assert!(matches!("cube:0".parse::<PuzzleId>(), Err(CatalogError::BadSize(_))));
    assert!(matches!("cube:2x3".parse::<PuzzleId>(), Err(CatalogError::UnknownPuzzle(_))));
    assert!(matches!("dino".parse::<PuzzleId>(), Err(CatalogError::UnknownPuzzle(_))));
    assert_eq!("mirror:3".parse::<PuzzleId>(), Ok(PuzzleId::Mirror([3, 3, 3])));
    assert_eq!(PuzzleId::Mirror([2, 3, 4]).to_string(), "mirror:2x3x4");
    assert_eq!("void".parse::<PuzzleId>(), Ok(PuzzleId::Void));
    assert!(matches!("void:4".parse::<PuzzleId>(), Err(CatalogError::UnknownPuzzle(_))));
    assert!(matches!("mirror:18".parse::<PuzzleId>(), Err(CatalogError::BadSize(_))));
    for &id in BUILTIN_PUZZLE_IDS {
        assert_eq!(id.parse::<PuzzleId>().map(|p| p.to_string()).as_deref(), Ok(id));
    }
}

#[test]
fn test_void_cube() {
    use PieceKind::*;

    let mut puzzle = build("void");
    assert_eq!(puzzle.family().name(), "Void Cube");
    assert_eq!(kind_counts(&puzzle), [(Edge, 12), (Corner, 8)].into_iter().collect());
    let stickers = puzzle.pieces().iter().map(|p| p.stickers.len()).sum::<usize>();
    assert_eq!(stickers, 48);

    // The middle layers still turn, carrying only edges.
    let middle = puzzle.select_slice(0, Slice::Threshold(0.0));
    assert_eq!(middle.len(), 4);
    puzzle.apply_notation("M2").expect("valid move");
    assert!(!puzzle.is_solved());
    puzzle.apply_notation("M2").expect("valid move");
    assert!(puzzle.is_solved());
}

#[test]
fn test_mirror_cube_pieces() {
    let puzzle = build("mirror:3");
    assert_eq!(puzzle.family().name(), "3x3x3 Mirror");
    assert_eq!(puzzle.pieces().len(), 26);
    assert!(puzzle.logger().lines().is_empty());
    let mut colors = puzzle.pieces().iter().flat_map(|p| &p.stickers).map(|s| s.color);
    assert!(colors.all_equal());

    let cube = puzzle.family().downcast_ref::<Cube>().expect("cuboid");
    assert_eq!(cube.variant(), CubeVariant::Mirror);
    let s = cube.params().spacing;
    // The top layer is thin and the bottom layer is thick.
    let (lo, hi) = cube.layer_bounds(1, 2);
    twistymath::assert_approx_eq!(lo, 0.5 * s);
    twistymath::assert_approx_eq!(hi, 0.8 * s);
    let (lo, _) = cube.layer_bounds(1, 0);
    twistymath::assert_approx_eq!(lo, -2.2 * s);

    // Pieces turn around the grid, not around their own bulk.
    for piece in puzzle.pieces() {
        let grid = piece.initial_centroid / s;
        assert!((grid - Vec3::new(grid.x.round(), grid.y.round(), grid.z.round())).magnitude() < 1e-9);
    }
    assert!(
        puzzle
            .pieces()
            .iter()
            .any(|p| (p.mesh.centroid().center() - p.initial_centroid).magnitude() > 0.1)
    );
}

#[test]
fn test_mirror_cube_solved_by_shape() {
    let mut puzzle = build("mirror:3");
    assert!(puzzle.is_solved());

    puzzle.apply_notation("R").expect("valid move");
    assert!(!puzzle.is_solved());
    // Every sticker is the same color, so colors alone can't tell.
    assert!(stickers_uniform(puzzle.pieces(), &puzzle.family().face_normals()));
    puzzle.apply_notation("R'").expect("valid move");
    assert!(puzzle.is_solved());

    puzzle.apply_notation("U2").expect("valid move");
    assert!(!puzzle.is_solved());
    puzzle.apply_notation("U2").expect("valid move");
    assert!(puzzle.is_solved());

    // Rotating the whole puzzle keeps it solved.
    for token in ["x", "y'", "z2"] {
        puzzle.apply_notation(token).expect("valid move");
        assert!(puzzle.is_solved(), "unsolved after {token}");
    }
}
