use core::str::FromStr;
use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::fields::Fields;
use crate::mesh::Mesh;
use crate::problem::FieldProblem;




/**
 * Index of a patch in the arena owned by a hierarchy. A parent always has a
 * smaller id than its children.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatchId(pub usize);




/**
 * Rule for filling the guard zones of a patch which has no parent.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicalBoundary {
    /// The two ends of the domain are identified.
    Periodic,
    /// Zero-gradient extrapolation of the outermost interior cell.
    Outflow,
}

impl FromStr for PhysicalBoundary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Periodic" => Ok(PhysicalBoundary::Periodic),
            "Outflow" => Ok(PhysicalBoundary::Outflow),
            _ => Err(Error::UnknownBoundaryKind(s.to_string())),
        }
    }
}

impl fmt::Display for PhysicalBoundary {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalBoundary::Periodic => write!(fmt, "Periodic"),
            PhysicalBoundary::Outflow => write!(fmt, "Outflow"),
        }
    }
}




/**
 * How a patch fills its guard zones: from a physical rule, or by prolongation
 * from a parent patch one level coarser. A refined patch's interior starts at
 * interior cell `offset` of its parent.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    Physical(PhysicalBoundary),
    Refined { parent: PatchId, offset: usize },
}




/**
 * A single 1D grid block. The patch owns its field data (interior cells plus
 * `num_guard` guard zones on each side) and knows how to refill its guard
 * zones. A refined patch refers to its parent by id only; the parent's data is
 * read during prolongation and written only through `restrict_into`.
 */
#[derive(Clone, Debug)]
pub struct Patch {
    problem: Arc<FieldProblem>,
    mesh: Mesh,
    boundary: Boundary,
    data: Fields,
}




// ============================================================================
impl Patch {

    /**
     * Create a patch with no parent, whose guard zones are filled by a
     * physical boundary rule. The data is zero-initialized.
     */
    pub fn new(problem: Arc<FieldProblem>, mesh: Mesh, boundary: PhysicalBoundary) -> Result<Self, Error> {
        mesh.validate()?;

        if boundary == PhysicalBoundary::Periodic && mesh.num_guard > mesh.num_zones {
            return Err(Error::invalid("num_guard", mesh.num_guard));
        }
        let data = Fields::zeros(problem.num_fields(), mesh.width());

        Ok(Self {
            problem,
            mesh,
            boundary: Boundary::Physical(boundary),
            data,
        })
    }

    /**
     * Create a ratio-2 child of `parent` (whose id is `parent_id`) with
     * `num_zones` interior cells starting at interior cell `offset` of the
     * parent. The geometry is validated here so that prolongation and
     * restriction never index outside the parent.
     */
    pub fn refined(
        problem: Arc<FieldProblem>,
        parent_id: PatchId,
        parent: &Patch,
        offset: i64,
        num_zones: usize,
        num_guard: usize,
    ) -> Result<Self, Error> {
        if num_guard % 2 != 0 {
            return Err(Error::OddGuardCount(num_guard));
        }
        if num_zones % 2 != 0 {
            return Err(Error::OddChildZones(num_zones));
        }
        if problem.num_fields() != parent.num_fields() {
            return Err(Error::ShapeMismatch {
                expected: parent.data.shape(),
                found: (problem.num_fields(), parent.mesh.width()),
            });
        }

        let np = parent.mesh.num_zones as i64;
        let gp = parent.mesh.num_guard as i64;
        let n2 = (num_zones / 2) as i64;
        let g2 = (num_guard / 2) as i64;

        if offset < 0 || offset.checked_add(n2).map_or(true, |end| end > np) {
            return Err(Error::FootprintOutsideParent {
                offset,
                num_zones,
                parent_zones: parent.mesh.num_zones,
            });
        }

        let first = offset - g2 - 1;
        let last = offset + n2 + g2;

        if first < -gp || last >= np + gp {
            return Err(Error::StencilOutsideParent {
                first: first + gp,
                last: last + gp,
                parent_width: parent.mesh.width(),
            });
        }

        let mesh = parent.mesh.refine(offset as usize, num_zones, num_guard)?;

        if mesh.spacing * 2.0 != parent.mesh.spacing {
            return Err(Error::SpacingMismatch {
                spacing: mesh.spacing,
                parent_spacing: parent.mesh.spacing,
            });
        }
        let data = Fields::zeros(problem.num_fields(), mesh.width());

        Ok(Self {
            problem,
            mesh,
            boundary: Boundary::Refined { parent: parent_id, offset: offset as usize },
            data,
        })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn problem(&self) -> &Arc<FieldProblem> {
        &self.problem
    }

    /**
     * Return the id of the parent patch, if this is a refined patch.
     */
    pub fn parent(&self) -> Option<PatchId> {
        match self.boundary {
            Boundary::Refined { parent, .. } => Some(parent),
            Boundary::Physical(_) => None,
        }
    }

    pub fn num_fields(&self) -> usize {
        self.data.num_fields()
    }

    /**
     * Return the full data buffer, guard zones included.
     */
    pub fn data(&self) -> &Fields {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Fields {
        &mut self.data
    }

    /**
     * Return the interior values of field `q`.
     */
    pub fn interior(&self, q: usize) -> &[f64] {
        &self.data.field(q)[self.mesh.interior()]
    }

    /**
     * Return the cell centers of every buffer slot, guard zones included.
     */
    pub fn coordinates(&self) -> impl Iterator<Item = f64> + '_ {
        self.mesh.coordinates()
    }

    /**
     * Overwrite every slot, guard zones included, with values from a closure
     * of the cell center. The closure writes one value per field.
     */
    pub fn fill_with<F>(&mut self, f: F)
    where
        F: Fn(f64, &mut [f64])
    {
        let mut slot = vec![0.0; self.num_fields()];
        let x: Vec<f64> = self.mesh.coordinates().collect();

        for (i, x) in x.into_iter().enumerate() {
            f(x, &mut slot);
            self.data.write_slot(i, &slot);
        }
    }

    /**
     * Refill the guard zones, either from the physical rule or by
     * prolongation from `parent`. A refined patch must be given its parent.
     */
    pub fn fill_guard_zones(&mut self, parent: Option<&Patch>) -> Result<(), Error> {
        let boundary = self.boundary;

        match boundary {
            Boundary::Physical(PhysicalBoundary::Periodic) => self.fill_periodic(),
            Boundary::Physical(PhysicalBoundary::Outflow) => self.fill_outflow(),
            Boundary::Refined { offset, .. } => {
                self.prolong(parent.ok_or(Error::MissingParent)?, offset)
            }
        }
        Ok(())
    }

    /**
     * Advance the patch by one explicit Euler step of size `dt`, then refill
     * the guard zones so the next step's stencil sees current data.
     */
    pub fn advance(&mut self, dt: f64, parent: Option<&Patch>) -> Result<(), Error> {
        let du = self.problem.derivative(&self.data, self.mesh.spacing)?;
        self.data.add_scaled(&du, dt)?;
        self.fill_guard_zones(parent)
    }

    /**
     * Average each pair of interior cells into the parent cell they cover.
     * This is the only path by which a child writes into its parent. Does
     * nothing for a patch without a parent.
     */
    pub fn restrict_into(&self, parent: &mut Patch) -> Result<(), Error> {
        let offset = match self.boundary {
            Boundary::Refined { offset, .. } => offset,
            Boundary::Physical(_) => return Ok(()),
        };

        if parent.num_fields() != self.num_fields() {
            return Err(Error::ShapeMismatch {
                expected: self.data.shape(),
                found: parent.data.shape(),
            });
        }

        let gp = parent.mesh.num_guard;
        let interior = self.mesh.interior();

        for q in 0..self.num_fields() {
            let u = &self.data.field(q)[interior.clone()];
            let up = parent.data.field_mut(q);

            for (j, pair) in u.chunks_exact(2).enumerate() {
                up[gp + offset + j] = 0.5 * (pair[0] + pair[1]);
            }
        }
        Ok(())
    }

    fn fill_periodic(&mut self) {
        let g = self.mesh.num_guard;
        let n = self.mesh.num_zones;

        for q in 0..self.num_fields() {
            let u = self.data.field_mut(q);

            for k in 0..g {
                u[k] = u[n + k];
                u[n + g + k] = u[g + k];
            }
        }
    }

    fn fill_outflow(&mut self) {
        let g = self.mesh.num_guard;
        let n = self.mesh.num_zones;

        for q in 0..self.num_fields() {
            let u = self.data.field_mut(q);
            let (ul, ur) = (u[g], u[n + g - 1]);

            for k in 0..g {
                u[k] = ul;
                u[n + g + k] = ur;
            }
        }
    }

    /**
     * Fill guard zones pairwise by linear interpolation from the parent. The
     * pair covering coarse cell `c` gets `(u[c-1] + 3 u[c]) / 4` on its left
     * half and `(3 u[c] + u[c+1]) / 4` on its right half.
     */
    fn prolong(&mut self, parent: &Patch, offset: usize) {
        let g = self.mesh.num_guard;
        let n = self.mesh.num_zones;
        let gp = parent.mesh.num_guard as i64;

        let halves = |l: f64, c: f64, r: f64| (0.25 * l + 0.75 * c, 0.75 * c + 0.25 * r);

        for q in 0..self.num_fields() {
            let up = parent.data.field(q);
            let u = self.data.field_mut(q);
            let coarse = |c: i64| up[(c + gp) as usize];

            for k in 0..g / 2 {
                let c = offset as i64 - 1 - k as i64;
                let (a, b) = halves(coarse(c - 1), coarse(c), coarse(c + 1));
                u[g - 2 - 2 * k] = a;
                u[g - 1 - 2 * k] = b;

                let c = (offset + n / 2 + k) as i64;
                let (a, b) = halves(coarse(c - 1), coarse(c), coarse(c + 1));
                u[g + n + 2 * k] = a;
                u[g + n + 2 * k + 1] = b;
            }
        }
    }
}
