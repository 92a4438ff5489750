use std::fmt;

use twistymath::prelude::*;

/// Role of a constraint in a piece's definition.
///
/// Every kind represents the same half-space `normal · x ≤ bound`; the kind is
/// used to pick out sticker faces and base constraints.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Outer surface of the puzzle, which may carry a sticker.
    Surface,
    /// Cut plane with the piece on the near side.
    Cut,
    /// Inverted cut plane, with the piece on the far side.
    CutInner,
    /// Inverted cut plane belonging to a neighboring axis.
    CutBound,
    /// Interpolated plane approximating a rounded edge.
    Fillet,
    /// Inner bound that keeps the piece away from the puzzle's core.
    Core,
}

/// Half-space `normal · x ≤ bound`, with a normalized normal vector.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Constraint {
    /// Normalized normal vector.
    pub normal: Vec3,
    /// Boundary distance along `normal`.
    pub bound: Float,
    /// Role of the constraint.
    pub kind: ConstraintKind,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind, self.plane())
    }
}

impl Constraint {
    /// Constructs the constraint `normal · x ≤ bound`. `normal` need not be
    /// normalized. Returns `None` if `normal` is approximately zero.
    pub fn new(normal: Vec3, bound: Float, kind: ConstraintKind) -> Option<Self> {
        let plane = Plane::from_inequality(normal, bound)?;
        Some(Self {
            normal: plane.normal(),
            bound: plane.distance(),
            kind,
        })
    }

    /// Returns the boundary plane of the constraint.
    pub fn plane(&self) -> Plane {
        Plane::from_unit_normal(self.normal, self.bound)
    }

    /// Returns whether `p` satisfies the constraint, allowing `tolerance`.
    pub fn contains(&self, p: Vec3, tolerance: Float) -> bool {
        self.normal.dot(p) <= self.bound + tolerance
    }

    /// Returns the signed distance of `p` outside the constraint's boundary.
    pub fn excess(&self, p: Vec3) -> Float {
        self.normal.dot(p) - self.bound
    }

    /// Returns whether this constraint contributes to a piece's base shape
    /// (everything except fillets).
    pub fn is_base(&self) -> bool {
        self.kind != ConstraintKind::Fillet
    }
}

/// Returns the interpolated planes that approximate a rounded edge of `radius`
/// between the boundaries of `a` and `b`.
///
/// No fillet is produced if `radius` is negligible or the two normals are
/// nearly antiparallel, since those planes never meet at a physical edge.
pub fn fillet_constraints(
    a: &Constraint,
    b: &Constraint,
    radius: Float,
    steps: usize,
) -> Vec<Constraint> {
    if radius <= 0.001 || a.normal.dot(b.normal) < -0.9 {
        return vec![];
    }
    (1..=steps)
        .filter_map(|i| {
            let t = i as Float / (steps + 1) as Float;
            let raw = a.normal * (1.0 - t) + b.normal * t;
            let len = raw.magnitude();
            if len < 0.001 {
                return None;
            }
            let bound = ((1.0 - t) * a.bound + t * b.bound - radius) / len + radius;
            Some(Constraint {
                normal: raw / len,
                bound,
                kind: ConstraintKind::Fillet,
            })
        })
        .collect()
}

/// Set of constraints defining a single piece.
#[derive(Debug, Default, Clone)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Constructs an empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the constraint `normal · x ≤ bound` and returns its index, or
    /// `None` if `normal` is zero.
    pub fn add(&mut self, normal: Vec3, bound: Float, kind: ConstraintKind) -> Option<usize> {
        let c = Constraint::new(normal, bound, kind)?;
        self.constraints.push(c);
        Some(self.constraints.len() - 1)
    }

    /// Adds a rounded edge between two existing constraints. Indices that are
    /// out of range are ignored.
    pub fn add_fillet(&mut self, a: usize, b: usize, radius: Float, steps: usize) {
        let (Some(ca), Some(cb)) = (self.constraints.get(a), self.constraints.get(b)) else {
            twistymath::debug_panic!("fillet between nonexistent constraints {a} and {b}");
            return;
        };
        let new = fillet_constraints(ca, cb, radius, steps);
        self.constraints.extend(new);
    }

    /// Adds rounded edges between every pair of constraints in `pairs`.
    pub fn add_fillets(
        &mut self,
        pairs: impl IntoIterator<Item = (usize, usize)>,
        radius: Float,
        steps: usize,
    ) {
        for (a, b) in pairs {
            self.add_fillet(a, b, radius, steps);
        }
    }

    /// Returns all constraints, including fillets.
    pub fn all(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns the constraints without fillets.
    pub fn base(&self) -> Vec<Constraint> {
        self.constraints.iter().copied().filter(|c| c.is_base()).collect()
    }

    /// Returns the constraint at `index`.
    pub fn get(&self, index: usize) -> Option<&Constraint> {
        self.constraints.get(index)
    }

    /// Returns the number of constraints, including fillets.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }
    /// Returns whether there are no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}
