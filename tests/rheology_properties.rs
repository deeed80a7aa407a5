use approx::assert_relative_eq;
use glacial_rheology::{
    compute_point_properties, update_damage, BoundaryStress, ConstitutiveLaw, DamageLaw,
    DamageState, Dimension, DruckerPragerSediment, EvaluationPoint, FloodEvent,
    FloodPerturbedSlip, GlenIce, HydrostaticPressure, LinearSlipSediment, MaterialInput,
    PointId, PointSample, SlipVariation, StressTensor, VelocityGradient, ViscosityBounds,
};
use nalgebra::{Matrix3, Vector3};

/// Deterministic spread of velocity gradients from near-rest to fast flow
fn gradients() -> Vec<Matrix3<f64>> {
    let mut out = Vec::new();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for scale_exp in -14..=-4 {
        let scale = 10f64.powi(scale_exp);
        let mut m = Matrix3::zeros();
        for i in 0..3 {
            for j in 0..3 {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let unit = (seed >> 11) as f64 / (1u64 << 53) as f64;
                m[(i, j)] = (2.0 * unit - 1.0) * scale;
            }
        }
        out.push(m);
    }
    out.push(Matrix3::zeros());
    out
}

#[test]
fn test_glen_floor_below_threshold() {
    let ice = GlenIce::default();
    let at_floor = ice.viscosity(ice.ii_eps_min);

    for factor in [0.0, 1e-12, 1e-3, 0.5, 0.999_999] {
        assert_eq!(ice.viscosity(ice.ii_eps_min * factor), at_floor);
    }
    assert!(ice.viscosity(ice.ii_eps_min * 10.0) < at_floor);
}

#[test]
fn test_glen_rest_scenario() {
    // A = 75 MPa⁻³ a⁻¹, n = 3, at rest
    let ice = GlenIce::new(2.378234398782344e-24, 3.0)
        .unwrap()
        .with_invariant_floor(1.8962455606291224e-13)
        .with_viscosity_floor(3.1536e9);

    let expected = (0.5
        * 2.378234398782344e-24f64.powf(-1.0 / 3.0)
        * 1.8962455606291224e-13f64.powf(-1.0 / 3.0))
    .max(3.1536e9);
    assert_relative_eq!(ice.viscosity(0.0), expected, max_relative = 1e-12);
    assert_eq!(ice.viscosity(0.0), ice.viscosity(1.8962455606291224e-13));
}

#[test]
fn test_viscosity_within_bounds() {
    let laws: Vec<ConstitutiveLaw> = vec![
        GlenIce::default().into(),
        GlenIce::default().with_rampedup_viscosity(1e11).into(),
        DruckerPragerSediment::new(0.6)
            .unwrap()
            .with_bounds(ViscosityBounds::new(1e6, 1e14))
            .into(),
        LinearSlipSediment::new(1.0, 1e-9).unwrap().into(),
        FloodPerturbedSlip::new(SlipVariation::Flood(FloodEvent {
            amplitude: 1e-9,
            ..FloodEvent::default()
        }))
        .unwrap()
        .into(),
    ];

    for law in &laws {
        let bounds = match law {
            ConstitutiveLaw::GlenIce(l) => l.bounds,
            ConstitutiveLaw::DruckerPragerSediment(l) => l.bounds,
            ConstitutiveLaw::LinearSlipSediment(l) => l.bounds,
            ConstitutiveLaw::FloodPerturbedSlip(l) => l.bounds,
            ConstitutiveLaw::Constant(_) => unreachable!(),
        };
        for grad in gradients() {
            let strain_rate = VelocityGradient::from_matrix(Dimension::Three, &grad).strain_rate();
            for pressure in [-1e6, 0.0, 1e3, 1e7] {
                for (x, t) in [(0.0, 0.0), (10_500.0, 87_000.0), (20_000.0, 1e6)] {
                    let point = EvaluationPoint::new(x, 0.0, 0.0, t);
                    let mu = law.viscosity(&MaterialInput {
                        point: &point,
                        strain_rate: &strain_rate,
                        pressure,
                    });
                    assert!(
                        bounds.contains(mu),
                        "{}: viscosity {} outside [{}, {}]",
                        law.name(),
                        mu,
                        bounds.min,
                        bounds.max
                    );
                }
            }
        }
    }
}

#[test]
fn test_strain_rate_symmetry_and_invariant() {
    for grad in gradients() {
        let vg = VelocityGradient::from_matrix(Dimension::Three, &grad);
        let eps = vg.strain_rate();
        let m = eps.to_matrix();
        assert_eq!(m, m.transpose());
        assert_eq!(eps.get(0, 1), eps.get(1, 0));

        let sym = 0.5 * (grad + grad.transpose());
        let ii = 0.5 * sym.component_mul(&sym).sum();
        assert_relative_eq!(eps.second_invariant(), ii, max_relative = 1e-10, epsilon = 1e-300);
    }
}

#[test]
fn test_missing_velocity_component_rejected() {
    let grad_u = Vector3::new(1e-9, 0.0, 0.0);
    assert!(VelocityGradient::new(Dimension::One, grad_u, None, None).is_ok());
    assert!(VelocityGradient::new(Dimension::Two, grad_u, None, None).is_err());
    assert!(VelocityGradient::new(Dimension::Three, grad_u, Some(grad_u), None).is_err());
}

#[test]
fn test_stress_symmetric_for_all_inputs() {
    for grad in gradients() {
        for dim in [Dimension::One, Dimension::Two, Dimension::Three] {
            let eps = VelocityGradient::from_matrix(dim, &grad).strain_rate();
            let stress = StressTensor::assemble(1e12, &eps, -2e5, dim);
            let m = stress.to_matrix();
            assert_eq!(m, m.transpose());
            for i in 0..3 {
                for j in 0..3 {
                    assert_eq!(stress.get(i, j), stress.get(j, i));
                }
            }
        }
    }
}

#[test]
fn test_hydrostatic_cutoff() {
    let bc = HydrostaticPressure::default();
    assert_relative_eq!(bc.pressure(-10.0), 100_846.8, max_relative = 1e-12);

    for z in [0.0, 1e-12, 3.0, 1e4] {
        assert_eq!(bc.pressure(z), 0.0);
    }
    let mut last = f64::INFINITY;
    for z in [-100.0, -10.0, -1.0, -1e-3, -1e-9] {
        let p = bc.pressure(z);
        assert!(p > 0.0 && p < last);
        last = p;
    }
    assert!(last < 1e-4);

    let boundary = BoundaryStress::Hydrostatic(bc);
    let point = EvaluationPoint::new(0.0, 0.0, -10.0, 0.0);
    let normal = Vector3::new(0.6, 0.0, -0.8);
    let t = boundary.traction(&point, &normal);
    assert_relative_eq!(t.norm(), 100_846.8, max_relative = 1e-12);
    assert_relative_eq!(t.normalize(), normal, epsilon = 1e-12);
}

#[test]
fn test_damage_noop_and_fixed_point() {
    let law = DamageLaw {
        alpha: 2.0,
        rate: 3.0,
        ..DamageLaw::default()
    };
    for grad in gradients() {
        let eps = VelocityGradient::from_matrix(Dimension::Three, &grad).strain_rate();
        let stress = StressTensor::assemble(1e13, &eps, 0.0, Dimension::Three);
        for d in [0.0, 0.2, 0.9] {
            assert_eq!(law.step(d, &stress, 0.0).unwrap(), d);
        }
        let xi = law.stress_measure(&stress);
        assert_eq!(law.step(xi, &stress, 5.0).unwrap(), xi);
    }
}

#[test]
fn test_pressure_independent_von_mises_and_damage() {
    let law: ConstitutiveLaw = GlenIce::default().into();
    let damage = DamageLaw {
        rate: 1e-7,
        ..DamageLaw::default()
    };

    for dimension in [Dimension::One, Dimension::Two, Dimension::Three] {
        let samples_at = |pressure: f64| -> Vec<PointSample> {
            gradients()
                .iter()
                .enumerate()
                .map(|(k, grad)| PointSample {
                    id: PointId(k as u64),
                    point: EvaluationPoint::new(0.0, 0.0, -200.0, 0.0),
                    gradient: VelocityGradient::from_matrix(dimension, grad),
                    pressure,
                })
                .collect()
        };

        let unloaded = compute_point_properties(&law, &samples_at(0.0));
        let loaded = compute_point_properties(&law, &samples_at(2e6));

        let mut d_unloaded = DamageState::new();
        let mut d_loaded = DamageState::new();
        update_damage(&mut d_unloaded, &damage, &unloaded, 86_400.0).unwrap();
        update_damage(&mut d_loaded, &damage, &loaded, 86_400.0).unwrap();

        for (a, b) in unloaded.iter().zip(&loaded) {
            assert_relative_eq!(a.von_mises, b.von_mises, max_relative = 1e-12);
            assert_relative_eq!(
                d_unloaded.current(a.id).unwrap(),
                d_loaded.current(b.id).unwrap(),
                max_relative = 1e-12
            );
        }

        // The zero gradient is last: at rest nothing accumulates under load
        let rest = loaded.last().unwrap();
        assert_eq!(rest.von_mises, 0.0);
        assert_eq!(d_loaded.current(rest.id), Some(0.0));
    }
}

#[test]
fn test_linear_slip_unit_scenario() {
    let law = LinearSlipSediment::new(1.0, 1.0).unwrap();
    assert_eq!(law.viscosity(), 1.0);
}
