//! Common lattice definitions shared across the decoder workspace.
//!
//! This crate provides the doubled-grid coordinate type, the periodic lattice
//! shape, and the adjacency oracle consumed by the decoder, the file loaders,
//! and the host tools. Everything here is pure coordinate arithmetic and holds
//! no decoding state.

#![no_std]

extern crate alloc;

/// Coordinates, lattice shapes, and enumeration orders on a periodic grid.
///
/// Sites live on a doubled grid: a coordinate whose components are all even
/// names a vertex (stabilizer), and a coordinate with exactly one odd
/// component names an edge (qubit) lying along that axis. Every component is
/// taken modulo twice the lattice extent on its axis.
pub mod geometry {
    use alloc::vec;
    use alloc::vec::Vec;

    /// Maximum number of edges incident to a vertex (3D lattice).
    pub const MAX_DEGREE: usize = 6;

    /// A site on the doubled grid.
    ///
    /// Two-dimensional lattices keep `z` at zero. The derived ordering is
    /// lexicographic over `(x, y, z)` and is the total order used for every
    /// deterministic tie-break in the decoder.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct Coord {
        pub x: usize,
        pub y: usize,
        pub z: usize,
    }

    impl Coord {
        /// Constructs a planar coordinate.
        pub const fn new2(x: usize, y: usize) -> Self {
            Self { x, y, z: 0 }
        }

        /// Constructs a three-dimensional coordinate.
        pub const fn new3(x: usize, y: usize, z: usize) -> Self {
            Self { x, y, z }
        }

        /// Returns the component along `axis` (0 = x, 1 = y, 2 = z).
        #[inline(always)]
        pub fn axis(&self, axis: usize) -> usize {
            match axis {
                0 => self.x,
                1 => self.y,
                _ => self.z,
            }
        }

        /// Returns a copy with the component along `axis` replaced.
        #[inline(always)]
        pub fn with_axis(mut self, axis: usize, value: usize) -> Self {
            match axis {
                0 => self.x = value,
                1 => self.y = value,
                _ => self.z = value,
            }
            self
        }

        /// Returns the axis an edge runs along, or `None` for non-edge sites.
        pub fn edge_axis(&self) -> Option<usize> {
            let odd = [self.x % 2, self.y % 2, self.z % 2];
            match odd {
                [1, 0, 0] => Some(0),
                [0, 1, 0] => Some(1),
                [0, 0, 1] => Some(2),
                _ => None,
            }
        }
    }

    impl core::fmt::Display for Coord {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "({}, {}, {})", self.x, self.y, self.z)
        }
    }

    /// The edges incident to one vertex, in a fixed order.
    ///
    /// Backed by an inline array so adjacency queries never allocate. The
    /// order is: the edge below the vertex on each axis, then the edge above
    /// it on each axis.
    #[derive(Debug, Clone, Copy)]
    pub struct IncidentEdges {
        coords: [Coord; MAX_DEGREE],
        len: usize,
    }

    impl IncidentEdges {
        pub fn as_slice(&self) -> &[Coord] {
            &self.coords[..self.len]
        }

        pub fn len(&self) -> usize {
            self.len
        }

        pub fn is_empty(&self) -> bool {
            self.len == 0
        }
    }

    impl<'a> IntoIterator for &'a IncidentEdges {
        type Item = &'a Coord;
        type IntoIter = core::slice::Iter<'a, Coord>;

        fn into_iter(self) -> Self::IntoIter {
            self.as_slice().iter()
        }
    }

    /// Shape of a periodic lattice with 2 or 3 axes.
    ///
    /// Extents are counted in vertices per axis. The doubled grid therefore
    /// spans `2 * extent` sites on each axis. Planar lattices store an extent
    /// of 1 on the unused third axis so that index arithmetic is uniform.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LatticeSize {
        extents: [usize; 3],
        dim: usize,
    }

    impl LatticeSize {
        /// Planar (toric) lattice with `lx * ly` vertices.
        pub const fn planar(lx: usize, ly: usize) -> Self {
            Self {
                extents: [lx, ly, 1],
                dim: 2,
            }
        }

        /// Three-dimensional periodic lattice with `lx * ly * lz` vertices.
        pub const fn cubic(lx: usize, ly: usize, lz: usize) -> Self {
            Self {
                extents: [lx, ly, lz],
                dim: 3,
            }
        }

        /// Builds a lattice from a list of extents.
        ///
        /// Returns `None` unless exactly two or three extents are given. The
        /// extents themselves are not checked here; see [`Self::is_valid`].
        pub fn from_extents(extents: &[usize]) -> Option<Self> {
            match *extents {
                [lx, ly] => Some(Self::planar(lx, ly)),
                [lx, ly, lz] => Some(Self::cubic(lx, ly, lz)),
                _ => None,
            }
        }

        /// True when every active axis has at least two vertices.
        ///
        /// With a single vertex on an axis both incident edges along that
        /// axis wrap onto the same site and the vertex would be its own
        /// neighbour.
        pub fn is_valid(&self) -> bool {
            (self.dim == 2 || self.dim == 3) && self.extents[..self.dim].iter().all(|&l| l >= 2)
        }

        pub fn dim(&self) -> usize {
            self.dim
        }

        /// Vertex extent along `axis`.
        pub fn extent(&self, axis: usize) -> usize {
            self.extents[axis]
        }

        pub fn extents(&self) -> &[usize] {
            &self.extents[..self.dim]
        }

        /// Number of vertex stabilizers, which is the expected syndrome length.
        pub fn num_vertices(&self) -> usize {
            self.extents.iter().product()
        }

        /// Number of edge qubits: one per vertex per axis.
        pub fn num_edges(&self) -> usize {
            self.dim * self.num_vertices()
        }

        /// Steps `coord` by `delta` along `axis`, wrapping around the torus.
        #[inline(always)]
        pub fn step(&self, coord: Coord, axis: usize, delta: isize) -> Coord {
            let period = 2 * self.extents[axis] as isize;
            let moved = (coord.axis(axis) as isize + delta).rem_euclid(period);
            coord.with_axis(axis, moved as usize)
        }

        /// Position of a vertex in the syndrome enumeration.
        ///
        /// The order is lexicographic over `(x, y, z)` with the first axis
        /// outermost, so a planar syndrome fills the `y` axis first.
        pub fn vertex_index(&self, vertex: Coord) -> usize {
            let [_, ly, lz] = self.extents;
            ((vertex.x / 2) * ly + vertex.y / 2) * lz + vertex.z / 2
        }

        /// Inverse of [`Self::vertex_index`].
        pub fn vertex_at(&self, index: usize) -> Coord {
            let [_, ly, lz] = self.extents;
            let z = index % lz;
            let y = (index / lz) % ly;
            let x = index / (lz * ly);
            Coord::new3(2 * x, 2 * y, 2 * z)
        }

        /// Position of an edge in the qubit enumeration.
        ///
        /// Qubits are grouped by axis: all edges along x first, then y, then z.
        /// Within one axis they follow the order of the vertex sitting just
        /// below the edge.
        ///
        /// # Arguments
        ///
        /// * `edge` - Doubled-grid coordinate with exactly one odd component
        ///
        /// # Returns
        ///
        /// The qubit index, or `None` if `edge` is not an edge site.
        pub fn edge_index(&self, edge: Coord) -> Option<usize> {
            let axis = edge.edge_axis()?;
            if axis >= self.dim {
                return None;
            }
            let base = edge.with_axis(axis, edge.axis(axis) - 1);
            Some(axis * self.num_vertices() + self.vertex_index(base))
        }

        /// Inverse of [`Self::edge_index`].
        pub fn edge_at(&self, index: usize) -> Coord {
            let v = self.num_vertices();
            let axis = index / v;
            let base = self.vertex_at(index % v);
            base.with_axis(axis, base.axis(axis) + 1)
        }

        /// Returns the edges around `vertex`: 4 on a planar lattice, 6 in 3D.
        pub fn incident_edges(&self, vertex: Coord) -> IncidentEdges {
            let mut coords = [Coord::default(); MAX_DEGREE];
            for axis in 0..self.dim {
                coords[axis] = self.step(vertex, axis, -1);
                coords[self.dim + axis] = self.step(vertex, axis, 1);
            }
            IncidentEdges {
                coords,
                len: 2 * self.dim,
            }
        }

        /// Returns the two vertices joined by `edge`, lower one first.
        ///
        /// The "lower" vertex is the one reached by stepping down the edge's
        /// axis; on the last row this is the wrapped neighbour.
        pub fn edge_endpoints(&self, edge: Coord) -> Option<[Coord; 2]> {
            let axis = edge.edge_axis()?;
            Some([self.step(edge, axis, -1), self.step(edge, axis, 1)])
        }

        /// Given an edge and one of its endpoints, returns the other endpoint.
        ///
        /// The far vertex is the reflection of `vertex` through `edge` along
        /// the edge's axis, wrapped onto the torus.
        pub fn other_endpoint(&self, edge: Coord, vertex: Coord) -> Coord {
            let axis = (0..self.dim)
                .find(|&a| edge.axis(a) != vertex.axis(a))
                .unwrap_or(0);
            let delta = edge.axis(axis) as isize - vertex.axis(axis) as isize;
            let delta = if delta.abs() > 1 { -delta.signum() } else { delta };
            self.step(edge, axis, delta)
        }

        /// Computes the vertex syndrome of a set of flipped edges.
        ///
        /// `flips` is indexed in qubit order and must hold
        /// [`Self::num_edges`] entries. Each flipped edge toggles both of its
        /// endpoints.
        pub fn syndrome_of(&self, flips: &[bool]) -> Vec<u8> {
            let mut syndrome = vec![0u8; self.num_vertices()];
            for (q, _) in flips.iter().enumerate().filter(|(_, f)| **f) {
                if let Some(ends) = self.edge_endpoints(self.edge_at(q)) {
                    for v in ends {
                        syndrome[self.vertex_index(v)] ^= 1;
                    }
                }
            }
            syndrome
        }

        /// Iterates over all vertex coordinates in syndrome order.
        pub fn vertices(&self) -> impl Iterator<Item = Coord> + '_ {
            (0..self.num_vertices()).map(move |i| self.vertex_at(i))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use alloc::vec;

        #[test]
        fn vertex_and_edge_indices_roundtrip() {
            for size in [LatticeSize::planar(3, 4), LatticeSize::cubic(2, 3, 4)] {
                for i in 0..size.num_vertices() {
                    assert_eq!(size.vertex_index(size.vertex_at(i)), i);
                }
                for q in 0..size.num_edges() {
                    assert_eq!(size.edge_index(size.edge_at(q)), Some(q));
                }
            }
        }

        #[test]
        fn planar_syndrome_order_fills_y_first() {
            let size = LatticeSize::planar(4, 4);
            assert_eq!(size.vertex_at(1), Coord::new2(0, 2));
            assert_eq!(size.vertex_at(4), Coord::new2(2, 0));
        }

        #[test]
        fn incident_edges_wrap() {
            let size = LatticeSize::planar(4, 4);
            let edges = size.incident_edges(Coord::new2(0, 0));
            assert_eq!(
                edges.as_slice(),
                &[
                    Coord::new2(7, 0),
                    Coord::new2(0, 7),
                    Coord::new2(1, 0),
                    Coord::new2(0, 1)
                ]
            );
            assert_eq!(size.incident_edges(Coord::new3(0, 0, 0)).len(), 4);
            assert_eq!(LatticeSize::cubic(2, 2, 2).incident_edges(Coord::new3(2, 2, 2)).len(), 6);
        }

        #[test]
        fn other_endpoint_crosses_the_seam() {
            let size = LatticeSize::planar(4, 4);
            assert_eq!(
                size.other_endpoint(Coord::new2(7, 0), Coord::new2(0, 0)),
                Coord::new2(6, 0)
            );
            assert_eq!(
                size.other_endpoint(Coord::new2(7, 0), Coord::new2(6, 0)),
                Coord::new2(0, 0)
            );
            assert_eq!(
                size.other_endpoint(Coord::new2(2, 3), Coord::new2(2, 2)),
                Coord::new2(2, 4)
            );
        }

        #[test]
        fn single_flip_lights_both_endpoints() {
            let size = LatticeSize::planar(3, 3);
            let mut flips = vec![false; size.num_edges()];
            let q = size.edge_index(Coord::new2(5, 2)).unwrap();
            flips[q] = true;
            let syndrome = size.syndrome_of(&flips);
            assert_eq!(syndrome.iter().filter(|&&s| s == 1).count(), 2);
            assert_eq!(syndrome[size.vertex_index(Coord::new2(4, 2))], 1);
            assert_eq!(syndrome[size.vertex_index(Coord::new2(0, 2))], 1);
        }

        #[test]
        fn rejects_degenerate_extents() {
            assert!(!LatticeSize::planar(1, 4).is_valid());
            assert!(LatticeSize::planar(2, 2).is_valid());
            assert!(LatticeSize::from_extents(&[3]).is_none());
        }
    }
}

pub use geometry::{Coord, IncidentEdges, LatticeSize};
