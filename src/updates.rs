//! Standardized per-pass update routines
//!
//! This module provides the batch operations a host runs once per evaluation
//! pass: material properties at every point, named output fields, and the
//! damage update at the end of an accepted step.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::Result;
use crate::mechanics::{
    ConstitutiveLaw, DamageLaw, MaterialInput, StrainRate, StressTensor, VelocityGradient,
};
use crate::point::{EvaluationPoint, PointId};
use crate::state::DamageState;

/// Kinematic input at one evaluation point
#[derive(Debug, Clone, Copy)]
pub struct PointSample {
    pub id: PointId,
    pub point: EvaluationPoint,
    pub gradient: VelocityGradient,
    /// Pressure (Pa)
    pub pressure: f64,
}

/// Material properties at one evaluation point
#[derive(Debug, Clone, Copy)]
pub struct PointProperties {
    pub id: PointId,
    pub strain_rate: StrainRate,
    /// Second invariant of the strain rate (s⁻²)
    pub strain_rate_ii: f64,
    pub viscosity: f64,
    pub density: f64,
    /// Viscous stress plus pressure (Pa)
    pub stress: StressTensor,
    /// Viscous stress 2μ ε̇ alone (Pa)
    pub viscous_stress: StressTensor,
    /// Von Mises stress of the viscous part (Pa)
    pub von_mises: f64,
}

/// Evaluate a law at every sample (parallelized)
///
/// Points are independent; the law is only borrowed, so controllable
/// parameters cannot change during the pass.
pub fn compute_point_properties(
    law: &ConstitutiveLaw,
    samples: &[PointSample],
) -> Vec<PointProperties> {
    samples
        .par_iter()
        .map(|sample| {
            let strain_rate = sample.gradient.strain_rate();
            let output = law.evaluate(&MaterialInput {
                point: &sample.point,
                strain_rate: &strain_rate,
                pressure: sample.pressure,
            });

            let dimension = sample.gradient.dimension();
            let viscous_stress =
                StressTensor::assemble_deviatoric(output.viscosity, &strain_rate, dimension);
            let stress =
                StressTensor::assemble(output.viscosity, &strain_rate, sample.pressure, dimension);

            PointProperties {
                id: sample.id,
                strain_rate,
                strain_rate_ii: strain_rate.second_invariant(),
                viscosity: output.viscosity,
                density: output.density,
                stress,
                viscous_stress,
                von_mises: viscous_stress.von_mises(),
            }
        })
        .collect()
}

/// Viscosity and density as fields named after the law's declared outputs
pub fn output_fields(
    law: &ConstitutiveLaw,
    props: &[PointProperties],
) -> Vec<(&'static str, Vec<f64>)> {
    let names = law.outputs();
    vec![
        (names[0], props.iter().map(|p| p.viscosity).collect()),
        (names[1], props.iter().map(|p| p.density).collect()),
    ]
}

/// Advance damage at every evaluated point by one step
///
/// Driven by the viscous stress, so pressure alone never accumulates damage.
/// Points not yet tracked start from zero damage. The step stays trial until
/// [`DamageState::commit_step`].
pub fn update_damage(
    state: &mut DamageState,
    law: &DamageLaw,
    props: &[PointProperties],
    dt: f64,
) -> Result<()> {
    for p in props {
        if state.get(p.id).is_none() {
            state.insert(p.id, 0.0);
        }
    }

    let stresses: HashMap<PointId, StressTensor> =
        props.iter().map(|p| (p.id, p.viscous_stress)).collect();
    state.advance_all(law, dt, |id| stresses.get(&id).copied())?;

    log::debug!(
        "damage advanced at {} points (dt = {:.3e} s, max d = {:.4})",
        props.len(),
        dt,
        state.max_damage()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::{GlenIce, LinearSlipSediment};
    use crate::point::Dimension;
    use approx::assert_relative_eq;
    use nalgebra::Matrix3;

    fn shear_sample(id: u64, rate: f64) -> PointSample {
        let grad = Matrix3::new(0.0, 2.0 * rate, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        PointSample {
            id: PointId(id),
            point: EvaluationPoint::new(id as f64, 0.0, -100.0, 0.0),
            gradient: VelocityGradient::from_matrix(Dimension::Three, &grad),
            pressure: 1e6,
        }
    }

    #[test]
    fn test_properties_simple_shear() {
        let law: ConstitutiveLaw = LinearSlipSediment::new(2.0, 1e-9).unwrap().into();
        let props = compute_point_properties(&law, &[shear_sample(0, 1e-8)]);
        let p = &props[0];

        assert_relative_eq!(p.strain_rate.xy, 1e-8, max_relative = 1e-12);
        assert_relative_eq!(p.strain_rate_ii, 1e-16, max_relative = 1e-12);
        assert_relative_eq!(p.viscosity, 2e9, max_relative = 1e-12);
        assert_relative_eq!(p.stress.xy, 40.0, max_relative = 1e-12);
        assert_relative_eq!(p.stress.xx, 1e6, max_relative = 1e-12);
        assert_relative_eq!(p.von_mises, 3f64.sqrt() * 40.0, max_relative = 1e-9);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let law: ConstitutiveLaw = GlenIce::default().into();
        let samples: Vec<PointSample> = (0..500)
            .map(|i| shear_sample(i, 1e-12 * (i as f64 + 1.0)))
            .collect();

        let props = compute_point_properties(&law, &samples);
        assert_eq!(props.len(), samples.len());
        for (sample, p) in samples.iter().zip(&props) {
            assert_eq!(sample.id, p.id);
            let ii = sample.gradient.strain_rate().second_invariant();
            match &law {
                ConstitutiveLaw::GlenIce(ice) => assert_eq!(p.viscosity, ice.viscosity(ii)),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn test_output_fields_named() {
        let law: ConstitutiveLaw = GlenIce::default().into();
        let props = compute_point_properties(&law, &[shear_sample(0, 1e-9), shear_sample(1, 1e-8)]);
        let fields = output_fields(&law, &props);
        assert_eq!(fields[0].0, "mu_ice");
        assert_eq!(fields[1].0, "rho_ice");
        assert_eq!(fields[1].1, vec![917.0, 917.0]);
    }

    #[test]
    fn test_pressure_does_not_drive_von_mises_or_damage() {
        let law: ConstitutiveLaw = LinearSlipSediment::new(1.0, 1.0).unwrap().into();
        let damage = DamageLaw {
            rate: 1e-7,
            ..DamageLaw::default()
        };

        for dimension in [Dimension::One, Dimension::Two, Dimension::Three] {
            let grad = Matrix3::new(2e-9, 1e-9, 0.0, 0.0, -1e-9, 3e-10, 0.0, 0.0, -1e-9);
            let sample = |id: u64, pressure: f64| PointSample {
                id: PointId(id),
                point: EvaluationPoint::new(0.0, 0.0, -100.0, 0.0),
                gradient: VelocityGradient::from_matrix(dimension, &grad),
                pressure,
            };
            let rest = PointSample {
                gradient: VelocityGradient::zeros(dimension),
                ..sample(2, 1e6)
            };

            let props = compute_point_properties(&law, &[sample(0, 0.0), sample(1, 1e6), rest]);
            assert_relative_eq!(props[0].von_mises, props[1].von_mises, max_relative = 1e-12);
            assert_eq!(props[2].von_mises, 0.0);

            let mut state = DamageState::new();
            update_damage(&mut state, &damage, &props, 86_400.0).unwrap();
            assert_relative_eq!(
                state.current(PointId(0)).unwrap(),
                state.current(PointId(1)).unwrap(),
                max_relative = 1e-12
            );
            assert_eq!(state.current(PointId(2)), Some(0.0));
        }
    }

    #[test]
    fn test_update_damage_registers_points() {
        let law: ConstitutiveLaw = LinearSlipSediment::new(1.0, 1.0).unwrap().into();
        let mut sample = shear_sample(3, 0.0);
        sample.gradient = VelocityGradient::zeros(Dimension::Two);
        sample.pressure = 0.0;
        let props = compute_point_properties(&law, &[sample]);

        let mut state = DamageState::new();
        update_damage(&mut state, &DamageLaw::default(), &props, 1.0).unwrap();
        assert_eq!(state.current(PointId(3)), Some(0.0));
    }
}
