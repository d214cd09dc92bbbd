use core::ops::Range;
use serde::{Deserialize, Serialize};
use crate::error::Error;




/**
 * A uniformly spaced 1D block of cells, with `num_guard` ghost cells on each
 * side of `num_zones` interior cells. Interior-relative indexes run from
 * `-num_guard` to `num_zones + num_guard`; buffer slots run from zero to
 * `width()`.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub left_edge: f64,
    pub spacing: f64,
    pub num_zones: usize,
    pub num_guard: usize,
}




// ============================================================================
impl Mesh {

    pub fn new(left_edge: f64, spacing: f64, num_zones: usize, num_guard: usize) -> Result<Self, Error> {
        let mesh = Self { left_edge, spacing, num_zones, num_guard };
        mesh.validate()?;
        Ok(mesh)
    }

    /**
     * Check that the spacing is positive and finite, and that there is at
     * least one interior and one guard zone.
     */
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.spacing > 0.0 && self.spacing.is_finite()) {
            return Err(Error::invalid("spacing", self.spacing));
        }
        if !self.left_edge.is_finite() {
            return Err(Error::invalid("left_edge", self.left_edge));
        }
        if self.num_zones == 0 {
            return Err(Error::invalid("num_zones", self.num_zones));
        }
        if self.num_guard == 0 {
            return Err(Error::invalid("num_guard", self.num_guard));
        }
        Ok(())
    }

    /**
     * Return the length of a buffer holding the interior and guard zones.
     */
    pub fn width(&self) -> usize {
        self.num_zones + 2 * self.num_guard
    }

    pub fn right_edge(&self) -> f64 {
        self.left_edge + self.num_zones as f64 * self.spacing
    }

    /**
     * Return the range of buffer slots occupied by interior cells.
     */
    pub fn interior(&self) -> Range<usize> {
        self.num_guard..self.num_guard + self.num_zones
    }

    /**
     * Return the center of the cell at an interior-relative index. Negative
     * indexes and indexes at or beyond `num_zones` address guard zones.
     */
    pub fn cell_center(&self, i: i64) -> f64 {
        self.left_edge + (i as f64 + 0.5) * self.spacing
    }

    /**
     * Return the cell centers of every buffer slot, guard zones included.
     */
    pub fn coordinates(&self) -> impl Iterator<Item = f64> + '_ {
        let g = self.num_guard as i64;
        (0..self.width() as i64).map(move |s| self.cell_center(s - g))
    }

    pub fn contains(&self, x: f64) -> bool {
        self.left_edge <= x && x < self.right_edge()
    }

    /**
     * Return the offset, in interior cells of this mesh, of a ratio-2 child
     * block of `child_zones` fine cells whose center lies as close as
     * possible to `center`. The child is aligned to the faces of this mesh.
     * The offset may be negative or overrun the interior; callers validate
     * it against the footprint rules.
     */
    pub fn child_offset(&self, center: f64, child_zones: usize) -> i64 {
        let c = (center - self.left_edge) / self.spacing;
        (c - child_zones as f64 / 4.0).round() as i64
    }

    /**
     * Return the mesh of a ratio-2 child starting at interior cell `offset`
     * of this mesh.
     */
    pub fn refine(&self, offset: usize, child_zones: usize, num_guard: usize) -> Result<Self, Error> {
        Self::new(
            self.left_edge + offset as f64 * self.spacing,
            self.spacing / 2.0,
            child_zones,
            num_guard)
    }
}
