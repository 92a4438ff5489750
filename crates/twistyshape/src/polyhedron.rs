use float_ord::FloatOrd;
use itertools::Itertools;
use smallvec::SmallVec;
use twistymath::prelude::*;

use crate::{Constraint, ConstraintKind, FACE_TOLERANCE, ShapeError, intersect};

/// Flat face of a [`Polyhedron`].
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Outward unit normal.
    pub normal: Vec3,
    /// Distance from the origin along `normal`.
    pub distance: Float,
    /// Kind of the constraint that produced this face.
    pub kind: ConstraintKind,
    /// Vertex indices, counterclockwise around `normal`.
    pub vertices: SmallVec<[usize; 8]>,
}

/// Convex polyhedron produced by intersecting half-spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyhedron {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Polyhedron {
    /// Intersects a set of constraints and returns the resulting polyhedron.
    ///
    /// Faces are the maximal sets of vertices lying on a constraint plane.
    /// Constraints that touch fewer than 3 vertices are redundant and produce
    /// no face.
    pub fn from_constraints(constraints: &[Constraint]) -> Result<Self, ShapeError> {
        let vertices = intersect(constraints)?;

        let mut faces: Vec<Face> = vec![];
        for c in constraints {
            let on_plane = vertices
                .iter()
                .enumerate()
                .filter(|(_, p)| c.excess(**p).abs() <= FACE_TOLERANCE)
                .map(|(i, _)| i)
                .collect_vec();
            if on_plane.len() < 3 {
                continue;
            }
            let ordered = order_around_normal(&vertices, on_plane, c.normal);
            let is_duplicate = faces.iter().any(|f| {
                f.vertices.len() == ordered.len() && ordered.iter().all(|i| f.vertices.contains(i))
            });
            if !is_duplicate {
                faces.push(Face {
                    normal: c.normal,
                    distance: c.bound,
                    kind: c.kind,
                    vertices: ordered,
                });
            }
        }

        Ok(Self { vertices, faces })
    }

    /// Returns the vertices of the polyhedron.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }
    /// Returns the faces of the polyhedron.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
    /// Returns the vertex positions of a face, in order.
    pub fn face_points(&self, face: &Face) -> Vec<Vec3> {
        face.vertices.iter().map(|&i| self.vertices[i]).collect()
    }

    /// Returns the average of all vertices, which is always inside the
    /// polyhedron.
    pub fn vertex_average(&self) -> Vec3 {
        let sum = self.vertices.iter().fold(Vec3::zero(), |a, &b| a + b);
        sum / self.vertices.len().max(1) as Float
    }

    /// Returns the volume-weighted centroid.
    pub fn centroid(&self) -> Centroid {
        let apex = self.vertex_average();
        self.faces
            .iter()
            .flat_map(|face| {
                let points = self.face_points(face);
                (1..points.len().saturating_sub(1))
                    .map(move |i| Centroid::tetrahedron([apex, points[0], points[i], points[i + 1]]))
            })
            .sum()
    }

    /// Returns the volume.
    pub fn volume(&self) -> Float {
        self.centroid().weight()
    }

    /// Returns the polyhedron translated by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&v| v + offset).collect(),
            faces: self
                .faces
                .iter()
                .map(|f| Face {
                    distance: f.distance + f.normal.dot(offset),
                    ..f.clone()
                })
                .collect(),
        }
    }

    /// Returns the vertices lying within `tolerance` of the plane
    /// `normal · x = distance`, ordered counterclockwise around `normal`.
    pub fn points_on_plane(&self, normal: Vec3, distance: Float, tolerance: Float) -> Vec<Vec3> {
        let normal = normal.normalize();
        let indices = self
            .vertices
            .iter()
            .enumerate()
            .filter(|(_, p)| (normal.dot(**p) - distance).abs() <= tolerance)
            .map(|(i, _)| i)
            .collect_vec();
        order_around_normal(&self.vertices, indices, normal)
            .into_iter()
            .map(|i| self.vertices[i])
            .collect()
    }

    /// Returns whether `p` is inside the polyhedron or on its boundary.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.faces
            .iter()
            .all(|f| f.normal.dot(p) <= f.distance + FACE_TOLERANCE)
    }
}

/// Sorts vertex indices counterclockwise around `normal`, as seen from the
/// side `normal` points toward.
fn order_around_normal(
    vertices: &[Vec3],
    indices: Vec<usize>,
    normal: Vec3,
) -> SmallVec<[usize; 8]> {
    if indices.is_empty() {
        return SmallVec::new();
    }
    let basis = tangent_basis(normal);
    let center = indices.iter().fold(Vec3::zero(), |a, &i| a + vertices[i]) / indices.len() as Float;
    indices
        .into_iter()
        .sorted_by_key(|&i| {
            let p = project_2d(vertices[i] - center, basis);
            FloatOrd(p.y.atan2(p.x))
        })
        .collect()
}
