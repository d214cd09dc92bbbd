//! Stock right-hand sides for the hierarchy, all first-order in space, and a
//! few initial profiles to seed them with. Every right-hand side writes
//! derivatives only at slots with a neighbor on both sides, leaving the two
//! outermost slots at zero.

use core::str::FromStr;
use std::f64::consts::PI;
use crate::error::Error;
use crate::fields::Fields;
use crate::problem::FieldProblem;




/**
 * Identifies one of the stock right-hand sides by name.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Model {
    Advection,
    Burgers,
    Wave,
}




// ============================================================================
impl Model {

    /**
     * Build the field problem for this model. The `speed` is the advection
     * velocity or the wave speed; Burgers' equation ignores it.
     */
    pub fn problem(&self, speed: f64) -> Result<FieldProblem, Error> {
        match self {
            Model::Advection => advection(speed),
            Model::Burgers => burgers(),
            Model::Wave => wave(speed),
        }
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advection" => Ok(Model::Advection),
            "burgers" => Ok(Model::Burgers),
            "wave" => Ok(Model::Wave),
            _ => Err(Error::UnknownModel(s.to_string())),
        }
    }
}




/**
 * Return the upwinded rate of change of `u` at slot `i`, for a quantity
 * moving with the given velocity.
 */
fn upwind_rate(u: &[f64], velocity: f64, dx: f64, i: usize) -> f64 {
    if velocity >= 0.0 {
        -velocity * (u[i] - u[i - 1]) / dx
    } else {
        -velocity * (u[i + 1] - u[i]) / dx
    }
}




/**
 * Linear advection `u_t + a u_x = 0` with first-order upwinding.
 */
pub fn advection(speed: f64) -> Result<FieldProblem, Error> {
    FieldProblem::new(vec!["u"], move |state: &Fields, dx| {
        let mut result = Fields::zeros(state.num_fields(), state.width());
        let u = state.field(0);
        let du = result.field_mut(0);

        for i in 1..u.len().saturating_sub(1) {
            du[i] = upwind_rate(u, speed, dx, i);
        }
        result
    })
}




/**
 * Inviscid Burgers' equation `u_t + (u^2 / 2)_x = 0`, with a local
 * Lax-Friedrichs (Rusanov) flux at cell interfaces.
 */
pub fn burgers() -> Result<FieldProblem, Error> {
    FieldProblem::new(vec!["u"], |state: &Fields, dx| {
        let mut result = Fields::zeros(state.num_fields(), state.width());
        let u = state.field(0);

        // f[i] is the flux through the face between slots i and i + 1
        let f: Vec<f64> = u.windows(2).map(|w| {
            let (ul, ur) = (w[0], w[1]);
            let a = ul.abs().max(ur.abs());
            0.25 * (ul * ul + ur * ur) - 0.5 * a * (ur - ul)
        }).collect();

        let du = result.field_mut(0);

        for i in 1..u.len().saturating_sub(1) {
            du[i] = -(f[i] - f[i - 1]) / dx;
        }
        result
    })
}




/**
 * The 1D wave equation in first-order form, with fields `pi = phi_t` and `psi
 * = phi_x`: `pi_t = c psi_x`, `psi_t = c pi_x`. The characteristic variables
 * `pi + psi` and `pi - psi` move left and right with speed `c`, and each is
 * upwinded separately.
 */
pub fn wave(speed: f64) -> Result<FieldProblem, Error> {
    FieldProblem::new(vec!["pi", "psi"], move |state: &Fields, dx| {
        let mut result = Fields::zeros(state.num_fields(), state.width());
        let (pi, psi) = (state.field(0), state.field(1));
        let r: Vec<f64> = pi.iter().zip(psi).map(|(p, s)| p + s).collect();
        let l: Vec<f64> = pi.iter().zip(psi).map(|(p, s)| p - s).collect();

        for i in 1..r.len().saturating_sub(1) {
            let dr = upwind_rate(&r, -speed, dx, i);
            let dl = upwind_rate(&l, speed, dx, i);
            result.set(0, i, 0.5 * (dr + dl));
            result.set(1, i, 0.5 * (dr - dl));
        }
        result
    })
}




/**
 * Return an initializer writing a unit-amplitude Gaussian profile, centered
 * at `center` with standard deviation `width`, into every field.
 */
pub fn gaussian(center: f64, width: f64) -> impl Fn(f64, &mut [f64]) {
    move |x: f64, slot: &mut [f64]| {
        let y = f64::exp(-0.5 * ((x - center) / width).powi(2));

        for s in slot.iter_mut() {
            *s = y
        }
    }
}

/**
 * Return an initializer writing `sin(2 pi k x)` into every field.
 */
pub fn sine(wavenumber: f64) -> impl Fn(f64, &mut [f64]) {
    move |x: f64, slot: &mut [f64]| {
        let y = f64::sin(2.0 * PI * wavenumber * x);

        for s in slot.iter_mut() {
            *s = y
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{advection, burgers, wave, gaussian, Model};
    use crate::fields::Fields;

    fn linear_state(num_fields: usize, width: usize) -> Fields {
        Fields::from_fields((0..num_fields).map(|_| (0..width).map(|i| i as f64).collect()).collect()).unwrap()
    }

    #[test]
    fn advection_of_a_ramp_is_uniform() {
        let problem = advection(2.0).unwrap();
        let du = problem.derivative(&linear_state(1, 6), 0.5).unwrap();
        assert_eq!(du.field(0), &[0.0, -4.0, -4.0, -4.0, -4.0, 0.0]);

        let problem = advection(-2.0).unwrap();
        let du = problem.derivative(&linear_state(1, 6), 0.5).unwrap();
        assert_eq!(du.field(0), &[0.0, 4.0, 4.0, 4.0, 4.0, 0.0]);
    }

    #[test]
    fn constant_states_are_stationary() {
        let state = Fields::from_fields(vec![vec![3.0; 8]]).unwrap();
        assert_eq!(burgers().unwrap().derivative(&state, 0.1).unwrap().max_abs(), 0.0);
        assert_eq!(advection(1.0).unwrap().derivative(&state, 0.1).unwrap().max_abs(), 0.0);

        let state = Fields::from_fields(vec![vec![1.0; 8], vec![-2.0; 8]]).unwrap();
        assert_eq!(wave(1.0).unwrap().derivative(&state, 0.1).unwrap().max_abs(), 0.0);
    }

    #[test]
    fn burgers_uses_the_rusanov_flux_at_a_jump() {
        // face fluxes 2, 3, 0, 0, 0
        let state = Fields::from_fields(vec![vec![2.0, 2.0, 0.0, 0.0, 0.0, 0.0]]).unwrap();
        let du = burgers().unwrap().derivative(&state, 1.0).unwrap();
        assert_eq!(du.field(0), &[0.0, -1.0, 3.0, 0.0, 0.0, 0.0]);

        // face fluxes 0.5, -0.5, 0.5
        let state = Fields::from_fields(vec![vec![-1.0, -1.0, 1.0, 1.0]]).unwrap();
        let du = burgers().unwrap().derivative(&state, 0.5).unwrap();
        assert_eq!(du.field(0), &[0.0, 2.0, -2.0, 0.0]);
    }

    #[test]
    fn wave_couples_the_two_fields() {
        // psi = x (in slot units) with pi = 0 gives pi_t = c psi_x everywhere
        let state = Fields::from_fields(vec![vec![0.0; 6], (0..6).map(|i| i as f64).collect()]).unwrap();
        let du = wave(1.0).unwrap().derivative(&state, 1.0).unwrap();
        assert_eq!(du.field(0)[1..5], [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(du.field(1)[1..5], [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn models_are_selected_by_name() {
        assert_eq!("wave".parse::<Model>().unwrap(), Model::Wave);
        assert_eq!(Model::Burgers.problem(0.0).unwrap().num_fields(), 1);
        assert_eq!(Model::Wave.problem(1.0).unwrap().field_names(), &["pi".to_string(), "psi".to_string()]);
        assert!("euler".parse::<Model>().is_err());
    }

    #[test]
    fn gaussian_peaks_at_its_center() {
        let init = gaussian(0.5, 0.03);
        let mut slot = [0.0; 2];
        init(0.5, &mut slot);
        assert_eq!(slot, [1.0, 1.0]);
        init(0.53, &mut slot);
        assert!((slot[0] - f64::exp(-0.5)).abs() < 1e-12);
    }
}
