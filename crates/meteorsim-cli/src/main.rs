use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use meteorsim_lib::{ImpactEngine, SimulationRequest, TargetLocation};

#[derive(Parser, Debug)]
#[command(author, version, about = "MeteorSim impact assessment utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate an impact with explicit parameters at a target location.
    Simulate {
        /// Projectile diameter in meters.
        #[arg(long)]
        diameter_m: Option<f64>,
        /// Impact velocity in km/s.
        #[arg(long)]
        velocity_km_s: Option<f64>,
        /// Bulk density in kg/m³.
        #[arg(long)]
        density_kg_m3: Option<f64>,
        /// Impact angle in degrees.
        #[arg(long)]
        angle_deg: Option<f64>,
        /// Reference-location key (see `locations`).
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        location: Option<String>,
        /// Impact latitude (requires --lng).
        #[arg(long, requires = "lng")]
        lat: Option<f64>,
        /// Impact longitude (requires --lat).
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
    },
    /// Resolve normalized parameters and physics for a catalog object.
    Physics {
        /// Catalog object identifier.
        #[arg(long)]
        asteroid_id: String,
    },
    /// List hazardous objects over the default near-term window.
    Hazardous,
    /// Print the reference-location table.
    Locations,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let engine = ImpactEngine::from_env().context("failed to initialize the impact engine")?;

    match cli.command {
        Command::Simulate {
            diameter_m,
            velocity_km_s,
            density_kg_m3,
            angle_deg,
            location,
            lat,
            lng,
        } => handle_simulate(
            &engine,
            diameter_m,
            velocity_km_s,
            density_kg_m3,
            angle_deg,
            location,
            lat.zip(lng),
        ),
        Command::Physics { asteroid_id } => handle_physics(&engine, &asteroid_id),
        Command::Hazardous => handle_hazardous(&engine),
        Command::Locations => handle_locations(&engine),
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_simulate(
    engine: &ImpactEngine,
    diameter_m: Option<f64>,
    velocity_km_s: Option<f64>,
    density_kg_m3: Option<f64>,
    angle_deg: Option<f64>,
    location: Option<String>,
    coordinates: Option<(f64, f64)>,
) -> Result<()> {
    let target = match (location, coordinates) {
        (Some(key), _) => TargetLocation::Key(key),
        (None, Some((lat, lng))) => TargetLocation::Coordinates { lat, lng },
        (None, None) => anyhow::bail!("provide --location, or --lat and --lng"),
    };

    let outcome = engine
        .simulate(&SimulationRequest {
            diameter_m,
            velocity_km_s,
            density_kg_m3,
            angle_deg,
            target,
        })
        .context("simulation failed")?;

    println!(
        "Impact at {} ({:.4}, {:.4})",
        outcome.location.name, outcome.location.lat, outcome.location.lng
    );
    println!(
        "Projectile: {:.0} m at {:.1} km/s, density {:.0} kg/m3",
        outcome.parameters.diameter_m,
        outcome.parameters.velocity_km_s,
        outcome.parameters.density_kg_m3
    );
    println!(
        "Energy: {:.2} Mt TNT ({:.3e} J)",
        outcome.physics.kinetic_energy_mt, outcome.physics.kinetic_energy_j
    );
    println!(
        "Crater: {:.2} km across, {:.2} km deep",
        outcome.physics.crater_diameter_km, outcome.physics.crater_depth_km
    );
    println!(
        "Damage radii (km): fireball {:.2}, thermal {:.2}, shockwave {:.2}, airblast {:.2}",
        outcome.physics.fireball_radius_km,
        outcome.physics.thermal_radius_km,
        outcome.physics.shockwave_radius_km,
        outcome.physics.airblast_radius_km
    );
    println!(
        "Casualties: {} total (survival rate {:.1}%)",
        outcome.casualties.total, outcome.casualties.survival_rate_percent
    );
    if let Some(crater) = outcome.reference_crater_m {
        println!("Reference crater (external calculator): {crater:.0} m");
    }
    println!("Survival zones:");
    for zone in &outcome.zones {
        println!(
            "- {} to {:.2} km ({:.0}% survival)",
            zone.name, zone.radius_km, zone.survival_rate_percent
        );
    }

    Ok(())
}

fn handle_physics(engine: &ImpactEngine, asteroid_id: &str) -> Result<()> {
    let resolved = engine
        .object_physics(asteroid_id)
        .with_context(|| format!("failed to resolve physics for '{asteroid_id}'"))?;

    println!("{}", resolved.summary);
    println!();
    println!(
        "Parameters: {:.0} m at {:.2} km/s, density {:.0} kg/m3",
        resolved.parameters.diameter_m,
        resolved.parameters.velocity_km_s,
        resolved.parameters.density_kg_m3
    );
    println!(
        "Energy: {:.2} Mt TNT; crater {:.2} km; airblast radius {:.2} km",
        resolved.physics.kinetic_energy_mt,
        resolved.physics.crater_diameter_km,
        resolved.physics.airblast_radius_km
    );

    Ok(())
}

fn handle_hazardous(engine: &ImpactEngine) -> Result<()> {
    let report = engine
        .hazardous_objects()
        .context("failed to list hazardous objects")?;

    println!("{} hazardous objects in the current window", report.count);
    for object in &report.objects {
        println!(
            "- {} ({:.0} m, {:.1} km/s): risk {:.1} [{}]",
            object.name,
            object.diameter_m,
            object.velocity_km_s,
            object.risk_score,
            serde_json::to_string(&object.threat_level)?.trim_matches('"')
        );
    }

    Ok(())
}

fn handle_locations(engine: &ImpactEngine) -> Result<()> {
    for location in engine.reference_locations() {
        println!(
            "{}: {} (pop {}, {:.1} km2){}",
            location.key,
            location.name,
            location.population,
            location.area_km2,
            if location.coastal { ", coastal" } else { "" }
        );
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
