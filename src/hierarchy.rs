use std::sync::Arc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::mesh::Mesh;
use crate::output::Snapshot;
use crate::patch::{Patch, PatchId, PhysicalBoundary};
use crate::problem::FieldProblem;




/**
 * Parameters of a static patch hierarchy and its time step. The default is a
 * unit domain of 100 base zones, with two further levels of 100-zone patches
 * nested around `x = 0.5`.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    pub domain_start: f64,
    pub base_spacing: f64,
    pub base_zones: usize,
    pub num_levels: usize,
    pub refinement_centers: Vec<f64>,
    pub child_zones: usize,
    pub num_guard: usize,
    pub refinement_ratio: usize,
    pub boundary: PhysicalBoundary,
    pub cfl: f64,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            domain_start: 0.0,
            base_spacing: 0.01,
            base_zones: 100,
            num_levels: 3,
            refinement_centers: vec![0.5],
            child_zones: 100,
            num_guard: 2,
            refinement_ratio: 2,
            boundary: PhysicalBoundary::Periodic,
            cfl: 0.5,
        }
    }
}

impl HierarchyConfig {

    /**
     * Check the parameters which can be judged without building any patches.
     * Geometric consistency of each child is checked as it is built.
     */
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_levels == 0 {
            return Err(Error::invalid("num_levels", self.num_levels));
        }
        if self.refinement_ratio != 2 {
            return Err(Error::UnsupportedRefinementRatio(self.refinement_ratio));
        }
        if self.num_levels > 1 && self.refinement_centers.is_empty() {
            return Err(Error::NoRefinementCenters);
        }
        if let Some(x) = self.refinement_centers.iter().find(|x| !x.is_finite()) {
            return Err(Error::invalid("refinement_centers", x));
        }
        if !(self.cfl > 0.0 && self.cfl.is_finite()) {
            return Err(Error::invalid("cfl", self.cfl));
        }
        Ok(())
    }
}




/**
 * The patches at one refinement depth. Level 0 is the base level.
 */
#[derive(Clone, Debug)]
pub struct Level {
    depth: usize,
    patches: Vec<PatchId>,
}

impl Level {
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn patches(&self) -> &[PatchId] {
        &self.patches
    }
}




/**
 * Where a hierarchy is in its run.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Constructed,
    Seeded,
    Evolving,
    Finished,
}




/**
 * Owns every patch of a static, nested hierarchy and drives its time
 * evolution. Patches live in an arena ordered coarse to fine, so a parent
 * always precedes its children. All levels advance with one global time step
 * (no subcycling), after which fine data is restricted onto coarse levels,
 * finest level first.
 */
#[derive(Clone, Debug)]
pub struct Hierarchy {
    config: HierarchyConfig,
    problem: Arc<FieldProblem>,
    patches: Vec<Patch>,
    levels: Vec<Level>,
    state: RunState,
    time: f64,
    iteration: u64,
}




// ============================================================================
impl Hierarchy {

    /**
     * Build the hierarchy coarse to fine. Level 0 is a single patch spanning
     * the domain. Each finer level has one patch per refinement center: on
     * level 1 they are children of the base patch, and on deeper levels
     * patch `k` is the child of patch `k` on the level above.
     */
    pub fn new(problem: Arc<FieldProblem>, config: HierarchyConfig) -> Result<Self, Error> {
        config.validate()?;

        let base_mesh = Mesh::new(
            config.domain_start,
            config.base_spacing,
            config.base_zones,
            config.num_guard)?;

        let mut patches = vec![Patch::new(problem.clone(), base_mesh, config.boundary)?];
        let mut levels = vec![Level { depth: 0, patches: vec![PatchId(0)] }];

        info!(
            "level 0: 1 patch, {} zones, spacing {:.3e}, {} boundary",
            config.base_zones, config.base_spacing, config.boundary);

        for depth in 1..config.num_levels {
            let mut level = Level { depth, patches: Vec::new() };

            for (k, &center) in config.refinement_centers.iter().enumerate() {
                let parent_id = if depth == 1 {
                    PatchId(0)
                } else {
                    levels[depth - 1].patches[k]
                };
                let parent = &patches[parent_id.0];
                let offset = parent.mesh().child_offset(center, config.child_zones);

                if !parent.mesh().contains(center) {
                    return Err(Error::FootprintOutsideParent {
                        offset,
                        num_zones: config.child_zones,
                        parent_zones: parent.mesh().num_zones,
                    });
                }
                let child = Patch::refined(
                    problem.clone(),
                    parent_id,
                    parent,
                    offset,
                    config.child_zones,
                    config.num_guard)?;

                debug!(
                    "level {}: patch {} on [{:.4}, {:.4}) at offset {} in parent {}",
                    depth,
                    patches.len(),
                    child.mesh().left_edge,
                    child.mesh().right_edge(),
                    offset,
                    parent_id.0);

                level.patches.push(PatchId(patches.len()));
                patches.push(child);
            }
            info!(
                "level {}: {} patch(es), {} zones, spacing {:.3e}",
                depth,
                level.patches.len(),
                config.child_zones,
                config.base_spacing / (1u64 << depth) as f64);

            levels.push(level);
        }

        Ok(Self {
            config,
            problem,
            patches,
            levels,
            state: RunState::Constructed,
            time: 0.0,
            iteration: 0,
        })
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    pub fn problem(&self) -> &Arc<FieldProblem> {
        &self.problem
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /**
     * Return the level at the given depth. Panics if `depth` is not less than
     * `num_levels()`.
     */
    pub fn level(&self, depth: usize) -> &Level {
        &self.levels[depth]
    }

    /**
     * Return a patch by id. Panics if the id was not issued by this
     * hierarchy.
     */
    pub fn patch(&self, id: PatchId) -> &Patch {
        &self.patches[id.0]
    }

    /**
     * Iterate over every patch with its id, coarse to fine.
     */
    pub fn patches(&self) -> impl Iterator<Item = (PatchId, &Patch)> {
        self.patches.iter().enumerate().map(|(i, p)| (PatchId(i), p))
    }

    /**
     * Return the global time step: the CFL number times the smallest spacing
     * on the finest level.
     */
    pub fn time_step(&self) -> f64 {
        let finest = self.levels.last().map_or(&[][..], |l| l.patches());
        let dx = finest
            .iter()
            .map(|id| self.patches[id.0].mesh().spacing)
            .fold(f64::INFINITY, f64::min);
        self.config.cfl * dx
    }

    /**
     * Write initial data on every patch of every level from a function of the
     * cell center, then fill guard zones from the boundary rules. Resets the
     * time and iteration counters.
     */
    pub fn seed<F>(&mut self, initializer: F) -> Result<(), Error>
    where
        F: Fn(f64, &mut [f64])
    {
        for patch in &mut self.patches {
            patch.fill_with(&initializer);
        }
        self.fill_guard_zones()?;
        self.time = 0.0;
        self.iteration = 0;
        self.state = RunState::Seeded;
        Ok(())
    }

    /**
     * Advance until the simulation time reaches `t_end`, with the step from
     * `time_step`. The last step is shortened to land on `t_end`. May be
     * called again to continue the run.
     */
    pub fn evolve(&mut self, t_end: f64) -> Result<(), Error> {
        if self.state == RunState::Constructed {
            return Err(Error::NotSeeded);
        }
        let dt = self.time_step();
        self.state = RunState::Evolving;

        info!("evolve t={:.4} -> {:.4} with dt={:.3e}", self.time, t_end, dt);

        while t_end - self.time > 1e-9 * dt {
            self.step(dt.min(t_end - self.time))?;
            debug!("[{}] t={:.4}", self.iteration, self.time);
        }
        self.state = RunState::Finished;

        info!("finished at t={:.4} after {} iterations", self.time, self.iteration);
        Ok(())
    }

    /**
     * Take one step of size `dt`: advance every patch coarse to fine, then
     * restrict fine data onto coarse levels.
     */
    pub fn step(&mut self, dt: f64) -> Result<(), Error> {
        if self.state == RunState::Constructed {
            return Err(Error::NotSeeded);
        }
        for id in 0..self.patches.len() {
            let (patch, parent) = self.split(PatchId(id));
            patch.advance(dt, parent)?;
        }
        self.restrict()?;
        self.time += dt;
        self.iteration += 1;
        Ok(())
    }

    /**
     * Restrict every level onto its parents, the finest level first, so that
     * each coarse patch has received its children's data before it is itself
     * restricted. Guard zones are refilled afterwards.
     */
    pub fn restrict(&mut self) -> Result<(), Error> {
        for depth in (1..self.levels.len()).rev() {
            self.restrict_level(depth)?;
        }
        self.fill_guard_zones()
    }

    /**
     * Restrict every patch on the level at `depth` onto its parent.
     */
    pub fn restrict_level(&mut self, depth: usize) -> Result<(), Error> {
        for i in 0..self.levels[depth].patches.len() {
            let id = self.levels[depth].patches[i];
            self.restrict_patch(id)?;
        }
        Ok(())
    }

    /**
     * Restrict one patch onto its parent. Nothing happens if the patch has no
     * parent. Panics if the id was not issued by this hierarchy.
     */
    pub fn restrict_patch(&mut self, id: PatchId) -> Result<(), Error> {
        if let Some(parent) = self.patches[id.0].parent() {
            let (head, tail) = self.patches.split_at_mut(id.0);
            tail[0].restrict_into(&mut head[parent.0])?;
        }
        Ok(())
    }

    /**
     * Return a serializable copy of the interior data on every patch.
     */
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self)
    }

    fn fill_guard_zones(&mut self) -> Result<(), Error> {
        for id in 0..self.patches.len() {
            let (patch, parent) = self.split(PatchId(id));
            patch.fill_guard_zones(parent)?;
        }
        Ok(())
    }

    /**
     * Borrow a patch mutably together with its parent, if it has one. The
     * parent precedes the patch in the arena.
     */
    fn split(&mut self, id: PatchId) -> (&mut Patch, Option<&Patch>) {
        let parent = self.patches[id.0].parent();
        let (head, tail) = self.patches.split_at_mut(id.0);
        let head: &[Patch] = head;
        (&mut tail[0], parent.map(move |p| &head[p.0]))
    }
}
