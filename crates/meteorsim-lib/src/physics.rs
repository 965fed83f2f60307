//! Impact physics for projectile mass, kinetic energy, crater dimensions,
//! and damage radii.
//!
//! The crater and damage-radius formulas are empirical scaling heuristics
//! tuned for visualization output, not rigorous crater-scaling laws
//! (Melosh/Holsapple class models). Summary text produced from these
//! numbers must state that limitation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Physical constants and scaling coefficients for impact calculations.
pub mod constants {
    /// Joules in one megaton of TNT.
    pub const JOULES_PER_MEGATON: f64 = 4.184e15;

    /// Canonical bulk density for a rocky projectile (kg/m³).
    pub const DEFAULT_DENSITY_KG_M3: f64 = 2600.0;

    /// Default impact angle (degrees from horizontal).
    pub const DEFAULT_IMPACT_ANGLE_DEG: f64 = 45.0;

    /// Crater diameter scaling: `1.8 · d^0.78 · v^0.44 / 1000` (km).
    pub const CRATER_COEFFICIENT: f64 = 1.8;
    pub const CRATER_DIAMETER_EXPONENT: f64 = 0.78;
    pub const CRATER_VELOCITY_EXPONENT: f64 = 0.44;

    /// Crater depth as a fraction of crater diameter.
    pub const CRATER_DEPTH_RATIO: f64 = 5.0;

    /// Damage radius coefficients, all applied to energy in megatons.
    pub const FIREBALL_COEFFICIENT: f64 = 0.28;
    pub const THERMAL_COEFFICIENT: f64 = 1.9;
    pub const SHOCKWAVE_COEFFICIENT: f64 = 4.6;
    pub const AIRBLAST_COEFFICIENT: f64 = 8.2;

    /// Exponent for fireball, shockwave, and airblast radii.
    pub const BLAST_EXPONENT: f64 = 0.33;

    /// Exponent for the thermal radius.
    pub const THERMAL_EXPONENT: f64 = 0.41;
}

/// Validated, immutable projectile parameters.
///
/// Construction fails for out-of-domain values; defaulting of absent fields
/// is the job of normalization (`crate::normalize`), never of this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactParameters {
    /// Projectile diameter in meters (> 0).
    pub diameter_m: f64,
    /// Impact velocity in km/s (>= 0).
    pub velocity_km_s: f64,
    /// Bulk density in kg/m³ (> 0).
    pub density_kg_m3: f64,
    /// Impact angle in degrees from horizontal.
    pub angle_deg: f64,
}

impl ImpactParameters {
    /// Create parameters with explicit density and angle.
    pub fn new(
        diameter_m: f64,
        velocity_km_s: f64,
        density_kg_m3: f64,
        angle_deg: f64,
    ) -> Result<Self> {
        let params = Self {
            diameter_m,
            velocity_km_s,
            density_kg_m3,
            angle_deg,
        };
        params.validate()?;
        Ok(params)
    }

    /// Create parameters with the canonical density and default angle.
    pub fn from_size_and_velocity(diameter_m: f64, velocity_km_s: f64) -> Result<Self> {
        Self::new(
            diameter_m,
            velocity_km_s,
            constants::DEFAULT_DENSITY_KG_M3,
            constants::DEFAULT_IMPACT_ANGLE_DEG,
        )
    }

    /// Validate the parameter domain.
    pub fn validate(&self) -> Result<()> {
        if !self.diameter_m.is_finite() || self.diameter_m <= 0.0 {
            return Err(Error::invalid_parameter(format!(
                "diameter_m must be finite and positive, got {}",
                self.diameter_m
            )));
        }
        if !self.velocity_km_s.is_finite() || self.velocity_km_s < 0.0 {
            return Err(Error::invalid_parameter(format!(
                "velocity_km_s must be finite and non-negative, got {}",
                self.velocity_km_s
            )));
        }
        if !self.density_kg_m3.is_finite() || self.density_kg_m3 <= 0.0 {
            return Err(Error::invalid_parameter(format!(
                "density_kg_m3 must be finite and positive, got {}",
                self.density_kg_m3
            )));
        }
        if !self.angle_deg.is_finite() {
            return Err(Error::invalid_parameter(format!(
                "angle_deg must be finite, got {}",
                self.angle_deg
            )));
        }
        Ok(())
    }
}

/// Derived impact physics.
///
/// All radii and crater dimensions are non-negative and non-decreasing in
/// energy. The damage radii satisfy fireball <= thermal <= shockwave <=
/// airblast across the visualization-relevant energy range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsResult {
    pub mass_kg: f64,
    pub kinetic_energy_j: f64,
    pub kinetic_energy_mt: f64,
    pub crater_diameter_km: f64,
    pub crater_depth_km: f64,
    pub fireball_radius_km: f64,
    pub thermal_radius_km: f64,
    pub shockwave_radius_km: f64,
    pub airblast_radius_km: f64,
    /// Seismic-equivalent moment magnitude, `(log10(E_j) - 4.8) / 1.5`.
    /// `None` when the kinetic energy is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approx_seismic_mw: Option<f64>,
}

/// Compute the full impact physics for a set of projectile parameters.
///
/// The calculation is deterministic, pure, and performs no I/O:
///
/// ```text
/// mass   = (4/3)·π·(d/2)³ · ρ
/// E      = ½ · mass · (v·1000)²
/// E_mt   = E / 4.184e15
/// crater = 1.8 · d^0.78 · v^0.44 / 1000   (km; depth = crater / 5)
/// radii  = c · E_mt^e per zone (see `constants`)
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if the parameters are out of domain
/// (diameter <= 0, velocity < 0, density <= 0, or any non-finite field).
///
/// # Examples
///
/// ```
/// use meteorsim_lib::physics::{compute_impact, ImpactParameters};
///
/// let params = ImpactParameters::from_size_and_velocity(100.0, 20.0).unwrap();
/// let result = compute_impact(&params).unwrap();
/// assert!((result.kinetic_energy_mt - 65.1).abs() / 65.1 < 0.01);
/// ```
pub fn compute_impact(params: &ImpactParameters) -> Result<PhysicsResult> {
    params.validate()?;

    let radius_m = params.diameter_m / 2.0;
    let volume_m3 = (4.0 / 3.0) * std::f64::consts::PI * radius_m.powi(3);
    let mass_kg = volume_m3 * params.density_kg_m3;

    let velocity_m_s = params.velocity_km_s * 1000.0;
    let kinetic_energy_j = 0.5 * mass_kg * velocity_m_s * velocity_m_s;
    let kinetic_energy_mt = kinetic_energy_j / constants::JOULES_PER_MEGATON;

    let crater_diameter_km = constants::CRATER_COEFFICIENT
        * params.diameter_m.powf(constants::CRATER_DIAMETER_EXPONENT)
        * params
            .velocity_km_s
            .powf(constants::CRATER_VELOCITY_EXPONENT)
        / 1000.0;
    let crater_depth_km = crater_diameter_km / constants::CRATER_DEPTH_RATIO;

    let blast_scale = kinetic_energy_mt.powf(constants::BLAST_EXPONENT);
    let fireball_radius_km = constants::FIREBALL_COEFFICIENT * blast_scale;
    let thermal_radius_km =
        constants::THERMAL_COEFFICIENT * kinetic_energy_mt.powf(constants::THERMAL_EXPONENT);
    let shockwave_radius_km = constants::SHOCKWAVE_COEFFICIENT * blast_scale;
    let airblast_radius_km = constants::AIRBLAST_COEFFICIENT * blast_scale;

    let approx_seismic_mw = if kinetic_energy_j > 0.0 {
        Some((kinetic_energy_j.log10() - 4.8) / 1.5)
    } else {
        None
    };

    Ok(PhysicsResult {
        mass_kg,
        kinetic_energy_j,
        kinetic_energy_mt,
        crater_diameter_km,
        crater_depth_km,
        fireball_radius_km,
        thermal_radius_km,
        shockwave_radius_km,
        airblast_radius_km,
        approx_seismic_mw,
    })
}
