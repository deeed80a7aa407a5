//! Configuration management for rheology setups
//!
//! Reads TOML configuration files describing materials, boundary stress
//! terms and the damage law, and builds validated SI evaluators from them.
//!
//! All values in one file are interpreted in the declared unit system
//! (`units = "si"` or `"mpa_year"`). Omitted parameters take SI defaults and
//! are never converted.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::bc::{AppliedStress, BoundaryStress, HydrostaticPressure};
use crate::error::{Result, RheologyError};
use crate::mechanics::{
    ConstantMaterial, ConstitutiveLaw, DamageLaw, DamageRateKind, DruckerPragerSediment,
    FloodEvent, FloodPerturbedSlip, GlenIce, LateralProfile, LawKind, LinearRamp,
    LinearSlipSediment, SlipVariation, VelocityGradient, ViscosityBounds,
};
use crate::physics::MultiOrmsbyWavelet;
use crate::point::{Axis, Dimension};
use crate::utils::UnitSystem;

/// Main rheology configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RheologyConfig {
    #[serde(default)]
    pub units: UnitSystem,
    #[serde(default)]
    pub dimension: Dimension,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialConfig>,
    #[serde(default)]
    pub boundaries: BTreeMap<String, BoundaryConfig>,
    pub damage: Option<DamageConfig>,
}

/// One `[materials.<name>]` table
///
/// `law` selects the constitutive law; only the parameters that law declares
/// may be given.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialConfig {
    pub law: String,

    // Glen's law
    pub fluidity: Option<f64>,
    pub exponent: Option<f64>,
    pub viscosity_floor: Option<f64>,
    pub rampedup_viscosity: Option<f64>,

    // Shared
    pub ii_eps_min: Option<f64>,
    pub density: Option<f64>,

    // Stress-ratio sediment
    pub friction_coefficient: Option<f64>,
    pub max_viscosity: Option<f64>,

    // Linear-slip sediment
    pub layer_thickness: Option<f64>,
    pub slipperiness_coefficient: Option<f64>,
    pub variation: Option<String>,
    pub flood: Option<FloodConfig>,
    pub ramp: Option<RampConfig>,
    pub lateral: Option<LateralConfig>,

    // Uniform material
    pub viscosity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FloodConfig {
    pub start_position: Option<f64>,
    pub amplitude: Option<f64>,
    pub peak_time: Option<f64>,
    pub spread_time: Option<f64>,
    pub speed: Option<f64>,
    pub axis: Option<Axis>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RampConfig {
    pub back: Option<f64>,
    pub front: Option<f64>,
    pub length: Option<f64>,
    pub axis: Option<Axis>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LateralConfig {
    /// "uniform", "band" or "gaussian"
    pub profile: String,
    pub center: Option<f64>,
    pub half_width: Option<f64>,
    pub width: Option<f64>,
    /// Cross-channel axis, `y` when omitted
    pub axis: Option<Axis>,
}

/// One `[boundaries.<name>]` table
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BoundaryConfig {
    /// "hydrostatic" or "applied_stress"
    pub kind: String,
    pub water_density: Option<f64>,
    pub gravity: Option<f64>,
    pub water_level: Option<f64>,
    pub value: Option<f64>,
    pub wavelet: Option<MultiOrmsbyWavelet>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DamageConfig {
    pub alpha: Option<f64>,
    pub rate: Option<f64>,
    pub exponent: Option<f64>,
    pub threshold: Option<f64>,
    #[serde(default)]
    pub kind: DamageRateKind,
}

impl MaterialConfig {
    /// Declared names of the parameters present in this table, nested
    /// tables included under their prefixed names
    fn supplied(&self) -> Vec<&'static str> {
        let flood = self.flood.as_ref();
        let ramp = self.ramp.as_ref();
        let lateral = self.lateral.as_ref();
        let fields: [(&'static str, bool); 27] = [
            ("fluidity", self.fluidity.is_some()),
            ("exponent", self.exponent.is_some()),
            ("viscosity_floor", self.viscosity_floor.is_some()),
            ("rampedup_viscosity", self.rampedup_viscosity.is_some()),
            ("ii_eps_min", self.ii_eps_min.is_some()),
            ("density", self.density.is_some()),
            ("friction_coefficient", self.friction_coefficient.is_some()),
            ("max_viscosity", self.max_viscosity.is_some()),
            ("layer_thickness", self.layer_thickness.is_some()),
            ("slipperiness_coefficient", self.slipperiness_coefficient.is_some()),
            ("variation", self.variation.is_some()),
            ("viscosity", self.viscosity.is_some()),
            ("flood_start_position", flood.map_or(false, |f| f.start_position.is_some())),
            ("flood_amplitude", flood.map_or(false, |f| f.amplitude.is_some())),
            ("flood_peak_time", flood.map_or(false, |f| f.peak_time.is_some())),
            ("flood_spread_time", flood.map_or(false, |f| f.spread_time.is_some())),
            ("flood_speed", flood.map_or(false, |f| f.speed.is_some())),
            ("flood_axis", flood.map_or(false, |f| f.axis.is_some())),
            ("ramp_back", ramp.map_or(false, |r| r.back.is_some())),
            ("ramp_front", ramp.map_or(false, |r| r.front.is_some())),
            ("ramp_length", ramp.map_or(false, |r| r.length.is_some())),
            ("ramp_axis", ramp.map_or(false, |r| r.axis.is_some())),
            ("lateral_profile", lateral.is_some()),
            ("lateral_center", lateral.map_or(false, |l| l.center.is_some())),
            ("lateral_half_width", lateral.map_or(false, |l| l.half_width.is_some())),
            ("lateral_width", lateral.map_or(false, |l| l.width.is_some())),
            ("lateral_axis", lateral.map_or(false, |l| l.axis.is_some())),
        ];
        fields
            .iter()
            .filter(|(_, present)| *present)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Names of the nested perturbation tables present
    fn supplied_tables(&self) -> Vec<&'static str> {
        [
            ("flood", self.flood.is_some()),
            ("ramp", self.ramp.is_some()),
            ("lateral", self.lateral.is_some()),
        ]
        .iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| *name)
        .collect()
    }

    /// Build the SI evaluator this table describes
    pub fn build(&self, units: UnitSystem) -> Result<ConstitutiveLaw> {
        let kind = LawKind::from_str(&self.law)?;
        let law: ConstitutiveLaw = match kind {
            LawKind::Glen => self.build_glen(units).into(),
            LawKind::DruckerPrager => self.build_drucker_prager(units).into(),
            LawKind::LinearSlip => self.build_linear_slip(units).into(),
            LawKind::FloodPerturbedSlip => self.build_flood(units)?.into(),
            LawKind::Constant => self.build_constant(units).into(),
        };

        let foreign = self
            .supplied()
            .into_iter()
            .find(|name| law.parameter(name).is_none())
            .or_else(|| {
                (kind != LawKind::FloodPerturbedSlip)
                    .then(|| self.supplied_tables().first().copied())
                    .flatten()
            });
        if let Some(name) = foreign {
            return Err(RheologyError::UnknownParameter {
                law: kind.as_str(),
                name: name.to_string(),
            });
        }

        law.validate()?;
        if let ConstitutiveLaw::GlenIce(ice) = &law {
            let max = ice.maximum_viscosity();
            log::info!("glen: maximum viscosity {:.3e} Pa·s at the invariant floor", max);
            if ice.bounds.min >= max {
                log::warn!(
                    "glen: viscosity floor {:.3e} is at or above the power-law maximum {:.3e}; \
                     the ice will behave as a constant-viscosity fluid",
                    ice.bounds.min,
                    max
                );
            }
        }
        Ok(law)
    }

    fn build_glen(&self, units: UnitSystem) -> GlenIce {
        let exponent = self.exponent.unwrap_or(GlenIce::DEFAULT_EXPONENT);
        let mut ice = GlenIce {
            exponent,
            ..GlenIce::default()
        };
        if let Some(a) = self.fluidity {
            ice.fluidity = units.fluidity(a, exponent);
        }
        if let Some(ii) = self.ii_eps_min {
            ice.ii_eps_min = units.invariant(ii);
        }
        if let Some(rho) = self.density {
            ice.density = rho;
        }
        if let Some(floor) = self.viscosity_floor {
            ice.bounds.min = units.viscosity(floor);
        }
        if let Some(ceiling) = self.rampedup_viscosity {
            ice.bounds.max = units.viscosity(ceiling);
        }
        ice
    }

    fn build_drucker_prager(&self, units: UnitSystem) -> DruckerPragerSediment {
        let mut dp = DruckerPragerSediment::default();
        if let Some(f) = self.friction_coefficient {
            dp.friction_coefficient = f;
        }
        if let Some(ii) = self.ii_eps_min {
            dp.ii_eps_min = units.invariant(ii);
        }
        if let Some(rho) = self.density {
            dp.density = rho;
        }
        if let Some(max) = self.max_viscosity {
            dp.bounds = ViscosityBounds::new(0.0, units.viscosity(max));
        }
        dp
    }

    fn build_linear_slip(&self, units: UnitSystem) -> LinearSlipSediment {
        let mut slip = LinearSlipSediment::default();
        if let Some(h) = self.layer_thickness {
            slip.layer_thickness = h;
        }
        if let Some(c) = self.slipperiness_coefficient {
            slip.slipperiness = units.slipperiness(c);
        }
        if let Some(rho) = self.density {
            slip.density = rho;
        }
        slip
    }

    fn build_flood(&self, units: UnitSystem) -> Result<FloodPerturbedSlip> {
        let variation_name = self.variation.as_deref().unwrap_or("constant");
        let flood = |amplitude_in_viscosity: bool| {
            let cfg = self.flood.clone().unwrap_or_default();
            let amplitude = cfg.amplitude.map(|a| {
                if amplitude_in_viscosity {
                    units.viscosity(a)
                } else {
                    units.slipperiness(a)
                }
            });
            FloodEvent {
                start_position: cfg.start_position.unwrap_or(FloodEvent::DEFAULT_START_POSITION),
                amplitude: amplitude.unwrap_or(FloodEvent::DEFAULT_AMPLITUDE),
                peak_time: cfg
                    .peak_time
                    .map_or(FloodEvent::DEFAULT_PEAK_TIME, |t| units.time(t)),
                spread_time: cfg
                    .spread_time
                    .map_or(FloodEvent::DEFAULT_SPREAD_TIME, |t| units.time(t)),
                speed: cfg.speed.map_or(FloodEvent::DEFAULT_SPEED, |c| units.speed(c)),
                axis: cfg.axis.unwrap_or_default(),
            }
        };
        let ramp = || {
            let cfg = self.ramp.clone().unwrap_or_default();
            LinearRamp {
                back: cfg.back.map_or(LinearRamp::DEFAULT_BACK, |v| units.viscosity(v)),
                front: cfg.front.map_or(LinearRamp::DEFAULT_FRONT, |v| units.viscosity(v)),
                length: cfg.length.unwrap_or(LinearRamp::DEFAULT_LENGTH),
                axis: cfg.axis.unwrap_or_default(),
            }
        };

        let unused = |table: &str, present: bool| -> Result<()> {
            if present {
                Err(RheologyError::invalid(
                    table,
                    format!("not used by variation '{}'", variation_name),
                ))
            } else {
                Ok(())
            }
        };

        let variation = match variation_name {
            "constant" => {
                unused("flood", self.flood.is_some())?;
                unused("ramp", self.ramp.is_some())?;
                unused("lateral", self.lateral.is_some())?;
                SlipVariation::Constant
            }
            "linear_ramp" => {
                unused("flood", self.flood.is_some())?;
                unused("lateral", self.lateral.is_some())?;
                SlipVariation::LinearRamp(ramp())
            }
            "subglacial_flood" => {
                unused("ramp", self.ramp.is_some())?;
                unused("lateral", self.lateral.is_some())?;
                SlipVariation::Flood(flood(false))
            }
            "channel_flood" => {
                let (lateral, lateral_axis) = match &self.lateral {
                    Some(cfg) => (cfg.profile()?, cfg.axis.unwrap_or(Axis::Y)),
                    None => (LateralProfile::Uniform, Axis::Y),
                };
                SlipVariation::ChannelFlood {
                    flood: flood(true),
                    baseline: ramp(),
                    lateral,
                    lateral_axis,
                }
            }
            other => {
                return Err(RheologyError::unknown_variant(
                    "slip variation",
                    other,
                    SlipVariation::valid_types(),
                ))
            }
        };

        let base = self.build_linear_slip(units);
        Ok(FloodPerturbedSlip {
            layer_thickness: base.layer_thickness,
            slipperiness: base.slipperiness,
            density: self.density.unwrap_or(FloodPerturbedSlip::DEFAULT_DENSITY),
            variation,
            ..FloodPerturbedSlip::default()
        })
    }

    fn build_constant(&self, units: UnitSystem) -> ConstantMaterial {
        let mut material = ConstantMaterial::default();
        if let Some(mu) = self.viscosity {
            material.viscosity = units.viscosity(mu);
        }
        if let Some(rho) = self.density {
            material.density = rho;
        }
        material
    }
}

impl LateralConfig {
    fn profile(&self) -> Result<LateralProfile> {
        let require = |value: Option<f64>, name: &str| {
            value.ok_or_else(|| {
                RheologyError::invalid(
                    name,
                    format!("required by lateral profile '{}'", self.profile),
                )
            })
        };
        match self.profile.as_str() {
            "uniform" => Ok(LateralProfile::Uniform),
            "band" => Ok(LateralProfile::Band {
                center: self.center.unwrap_or(0.0),
                half_width: require(self.half_width, "half_width")?,
            }),
            "gaussian" => Ok(LateralProfile::Gaussian {
                center: self.center.unwrap_or(0.0),
                width: require(self.width, "width")?,
            }),
            other => Err(RheologyError::unknown_variant(
                "lateral profile",
                other,
                &["uniform", "band", "gaussian"],
            )),
        }
    }
}

impl BoundaryConfig {
    pub fn build(&self, units: UnitSystem) -> Result<BoundaryStress> {
        let bc = match self.kind.as_str() {
            "hydrostatic" => {
                if self.value.is_some() || self.wavelet.is_some() {
                    return Err(RheologyError::invalid(
                        "value",
                        "hydrostatic boundaries take no applied value",
                    ));
                }
                let defaults = HydrostaticPressure::default();
                BoundaryStress::Hydrostatic(HydrostaticPressure {
                    water_density: self.water_density.unwrap_or(defaults.water_density),
                    gravity: self.gravity.unwrap_or(defaults.gravity),
                    water_level: self.water_level.unwrap_or(defaults.water_level),
                })
            }
            "applied_stress" => {
                if self.water_density.is_some() || self.gravity.is_some() || self.water_level.is_some()
                {
                    return Err(RheologyError::invalid(
                        "water_level",
                        "applied-stress boundaries take no water column",
                    ));
                }
                match (&self.wavelet, self.value) {
                    (Some(_), Some(_)) => {
                        return Err(RheologyError::invalid(
                            "value",
                            "give either 'value' or a [wavelet] table, not both",
                        ))
                    }
                    (Some(w), None) => BoundaryStress::Applied(AppliedStress::wavelet(
                        MultiOrmsbyWavelet {
                            f1: units.frequency(w.f1),
                            f2: units.frequency(w.f2),
                            f3: units.frequency(w.f3),
                            f4: units.frequency(w.f4),
                            peak_time: units.time(w.peak_time),
                            repetitions: w.repetitions,
                            scale_factor: units.stress(w.scale_factor),
                        },
                    )),
                    (None, value) => BoundaryStress::Applied(AppliedStress::constant(
                        units.stress(value.unwrap_or(0.0)),
                    )),
                }
            }
            other => BoundaryStress::from_str(other, 0.0)?,
        };
        bc.validate()?;
        Ok(bc)
    }
}

impl DamageConfig {
    pub fn build(&self, units: UnitSystem) -> Result<DamageLaw> {
        let stress_scale = match units {
            UnitSystem::Si => 1.0,
            UnitSystem::MpaYear => crate::utils::units::PA_TO_MPA,
        };
        let law = DamageLaw {
            alpha: self.alpha.unwrap_or(DamageLaw::DEFAULT_ALPHA),
            rate: self.rate.map_or(DamageLaw::DEFAULT_RATE, |b| units.rate(b)),
            exponent: self.exponent.unwrap_or(DamageLaw::DEFAULT_EXPONENT),
            threshold: self.threshold.unwrap_or(DamageLaw::DEFAULT_THRESHOLD),
            stress_scale,
            kind: self.kind,
        };
        law.validate()?;
        Ok(law)
    }
}

impl RheologyConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Build every material, keyed by table name
    pub fn build_materials(&self) -> Result<BTreeMap<String, ConstitutiveLaw>> {
        self.materials
            .iter()
            .map(|(name, cfg)| {
                let law = cfg.build(self.units).map_err(|e| {
                    log::error!("material '{}': {}", name, e);
                    e
                })?;
                Ok((name.clone(), law))
            })
            .collect()
    }

    pub fn build_boundaries(&self) -> Result<BTreeMap<String, BoundaryStress>> {
        self.boundaries
            .iter()
            .map(|(name, cfg)| {
                let bc = cfg.build(self.units).map_err(|e| {
                    log::error!("boundary '{}': {}", name, e);
                    e
                })?;
                Ok((name.clone(), bc))
            })
            .collect()
    }

    pub fn build_damage(&self) -> Result<Option<DamageLaw>> {
        self.damage
            .as_ref()
            .map(|cfg| cfg.build(self.units))
            .transpose()
    }

    /// Velocity gradient for the configured problem dimension (s⁻¹)
    ///
    /// # Errors
    /// `MissingComponent` if the dimension needs `grad_v` or `grad_w` and it
    /// was not supplied.
    pub fn velocity_gradient(
        &self,
        grad_u: Vector3<f64>,
        grad_v: Option<Vector3<f64>>,
        grad_w: Option<Vector3<f64>>,
    ) -> Result<VelocityGradient> {
        VelocityGradient::new(self.dimension, grad_u, grad_v, grad_w)
    }

    /// Report the configuration at info level
    pub fn log_summary(&self) {
        log::info!(
            "Rheology configuration: {}D, units = {:?}",
            self.dimension.as_usize(),
            self.units
        );
        for (name, cfg) in &self.materials {
            match &cfg.variation {
                Some(variation) => log::info!("  material '{}': {} ({})", name, cfg.law, variation),
                None => log::info!("  material '{}': {}", name, cfg.law),
            }
        }
        for (name, cfg) in &self.boundaries {
            log::info!("  boundary '{}': {}", name, cfg.kind);
        }
        match &self.damage {
            Some(damage) => log::info!("  damage: {:?} rate law", damage.kind),
            None => log::info!("  damage: disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_config_defaults() {
        let config = RheologyConfig::from_toml_str("").unwrap();
        assert_eq!(config.units, UnitSystem::Si);
        assert_eq!(config.dimension, Dimension::Three);
        assert!(config.build_materials().unwrap().is_empty());
        assert!(config.build_damage().unwrap().is_none());
    }

    #[test]
    fn test_glen_defaults_untouched_by_units() {
        let config = RheologyConfig::from_toml_str(
            r#"
            units = "mpa_year"
            [materials.ice]
            law = "glen"
            "#,
        )
        .unwrap();
        let materials = config.build_materials().unwrap();
        assert_eq!(materials["ice"], ConstitutiveLaw::GlenIce(GlenIce::default()));
    }

    #[test]
    fn test_glen_legacy_units() {
        let config = RheologyConfig::from_toml_str(
            r#"
            units = "mpa_year"
            [materials.ice]
            law = "glen"
            fluidity = 75.0
            viscosity_floor = 1e-4
            "#,
        )
        .unwrap();
        match &config.build_materials().unwrap()["ice"] {
            ConstitutiveLaw::GlenIce(ice) => {
                assert_relative_eq!(ice.fluidity, GlenIce::DEFAULT_FLUIDITY, max_relative = 1e-12);
                assert_relative_eq!(ice.bounds.min, 3.1536e9, max_relative = 1e-12);
            }
            other => panic!("unexpected law {:?}", other),
        }
    }

    #[test]
    fn test_unknown_law_rejected() {
        let config = RheologyConfig::from_toml_str(
            r#"
            [materials.rock]
            law = "maxwell"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build_materials(),
            Err(RheologyError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_foreign_parameter_rejected() {
        let config = RheologyConfig::from_toml_str(
            r#"
            [materials.bed]
            law = "linear_slip"
            friction_coefficient = 0.5
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build_materials(),
            Err(RheologyError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn test_nested_keys_checked_against_declarations() {
        let config = RheologyConfig::from_toml_str(
            r#"
            [materials.ice]
            law = "glen"
            [materials.ice.ramp]
            back = 1e11
            "#,
        )
        .unwrap();
        match config.build_materials() {
            Err(RheologyError::UnknownParameter { law, name }) => {
                assert_eq!(law, "glen");
                assert_eq!(name, "ramp_back");
            }
            other => panic!("expected unknown parameter, got {:?}", other),
        }

        let channel = MaterialConfig {
            law: "flood_perturbed_slip".into(),
            variation: Some("channel_flood".into()),
            ramp: Some(RampConfig {
                back: Some(1e11),
                axis: Some(Axis::X),
                ..RampConfig::default()
            }),
            ..MaterialConfig::default()
        };
        let law = channel.build(UnitSystem::Si).unwrap();
        for name in channel.supplied() {
            assert!(law.parameter(name).is_some(), "{} undeclared", name);
        }
    }

    #[test]
    fn test_misspelled_key_is_parse_error() {
        let result = RheologyConfig::from_toml_str(
            r#"
            [materials.bed]
            law = "linear_slip"
            slipperines = 1.0
            "#,
        );
        assert!(matches!(result, Err(RheologyError::Parse(_))));
    }

    #[test]
    fn test_velocity_gradient_follows_dimension() {
        let grad = Vector3::new(1e-9, 0.0, 2e-9);

        let config = RheologyConfig::from_toml_str("dimension = 2").unwrap();
        assert!(matches!(
            config.velocity_gradient(grad, None, None),
            Err(RheologyError::MissingComponent { component: "velocity_y", dimension: 2 })
        ));
        let g = config.velocity_gradient(grad, Some(grad), None).unwrap();
        assert_eq!(g.dimension(), Dimension::Two);
        assert_eq!(g.component(2, 0), 0.0);

        let config = RheologyConfig::from_toml_str("dimension = 3").unwrap();
        assert!(matches!(
            config.velocity_gradient(grad, Some(grad), None),
            Err(RheologyError::MissingComponent { component: "velocity_z", dimension: 3 })
        ));

        let config = RheologyConfig::from_toml_str("dimension = 1").unwrap();
        let g = config.velocity_gradient(grad, None, None).unwrap();
        assert_eq!(g.component(0, 2), 2e-9);
    }

    #[test]
    fn test_bad_dimension_rejected() {
        assert!(RheologyConfig::from_toml_str("dimension = 4").is_err());
        assert!(matches!(
            RheologyConfig::from_toml_str("units = \"cgs\""),
            Err(RheologyError::Parse(_))
        ));
        let config = RheologyConfig::from_toml_str("dimension = 2").unwrap();
        assert_eq!(config.dimension, Dimension::Two);
    }

    #[test]
    fn test_channel_flood_with_band() {
        let config = RheologyConfig::from_toml_str(
            r#"
            [materials.channel]
            law = "flood_perturbed_slip"
            variation = "channel_flood"

            [materials.channel.flood]
            start_position = 0.0
            amplitude = 5e8

            [materials.channel.ramp]
            back = 1e9
            front = 1e9

            [materials.channel.lateral]
            profile = "band"
            half_width = 1000.0
            "#,
        )
        .unwrap();
        match &config.build_materials().unwrap()["channel"] {
            ConstitutiveLaw::FloodPerturbedSlip(law) => match law.variation {
                SlipVariation::ChannelFlood {
                    flood,
                    lateral,
                    lateral_axis,
                    ..
                } => {
                    assert_eq!(flood.amplitude, 5e8);
                    assert_eq!(lateral_axis, Axis::Y);
                    assert_eq!(
                        lateral,
                        LateralProfile::Band {
                            center: 0.0,
                            half_width: 1000.0
                        }
                    );
                }
                other => panic!("unexpected variation {:?}", other),
            },
            other => panic!("unexpected law {:?}", other),
        }
    }

    #[test]
    fn test_table_unused_by_variation() {
        let config = RheologyConfig::from_toml_str(
            r#"
            [materials.bed]
            law = "flood_perturbed_slip"
            variation = "subglacial_flood"
            [materials.bed.lateral]
            profile = "uniform"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build_materials(),
            Err(RheologyError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_boundaries() {
        let config = RheologyConfig::from_toml_str(
            r#"
            [boundaries.front]
            kind = "hydrostatic"
            water_level = 0.0

            [boundaries.surface]
            kind = "applied_stress"
            value = -1e5

            [boundaries.pulse]
            kind = "applied_stress"
            [boundaries.pulse.wavelet]
            f1 = 0.01
            f2 = 0.02
            f3 = 0.1
            f4 = 0.2
            peak_time = 60.0
            repetitions = 2
            "#,
        )
        .unwrap();
        let bcs = config.build_boundaries().unwrap();
        assert_eq!(bcs.len(), 3);
        assert_eq!(bcs["front"].name(), "hydrostatic");
        assert_eq!(bcs["surface"], BoundaryStress::Applied(AppliedStress::constant(-1e5)));
        match bcs["pulse"] {
            BoundaryStress::Applied(AppliedStress {
                source: crate::bc::StressSource::Wavelet(w),
            }) => assert_eq!(w.scale_factor, 1.0),
            other => panic!("unexpected boundary {:?}", other),
        }
    }

    #[test]
    fn test_unknown_boundary_kind() {
        let config = RheologyConfig::from_toml_str(
            r#"
            [boundaries.side]
            kind = "free_slip"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build_boundaries(),
            Err(RheologyError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_damage_section() {
        let config = RheologyConfig::from_toml_str(
            r#"
            [damage]
            alpha = 0.5
            kind = "power_law"
            "#,
        )
        .unwrap();
        let law = config.build_damage().unwrap().unwrap();
        assert_eq!(law.alpha, 0.5);
        assert_eq!(law.kind, DamageRateKind::PowerLaw);
        assert_eq!(law.threshold, DamageLaw::DEFAULT_THRESHOLD);
    }
}
