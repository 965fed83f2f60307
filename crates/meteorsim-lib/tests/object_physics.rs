mod common;

use meteorsim_lib::{CatalogClient, EngineConfig, ImpactEngine};

use common::{apophis_record, spawn_stub};

fn engine_for(base_url: &str) -> ImpactEngine {
    let catalog = CatalogClient::new(base_url, "test-key").expect("client builds");
    ImpactEngine::new(catalog, EngineConfig::default())
}

#[test]
fn resolves_physics_for_catalog_object() {
    let stub = spawn_stub(apophis_record().to_string());
    let engine = engine_for(&stub.base_url);

    let resolved = engine.object_physics("2099942").expect("lookup succeeds");

    assert_eq!(resolved.asteroid_id, "2099942");
    assert_eq!(resolved.name, "99942 Apophis (2004 MN4)");
    assert!(resolved.is_hazardous);

    // Normalization: mean of the 310/680 m estimate, first-approach velocity.
    assert_eq!(resolved.parameters.diameter_m, 495.0);
    assert_eq!(resolved.parameters.velocity_km_s, 7.42);
    assert_eq!(resolved.parameters.density_kg_m3, 2600.0);

    assert!(resolved.physics.kinetic_energy_mt > 0.0);
    assert_eq!(resolved.close_approach.date.as_deref(), Some("2029-04-13"));
    assert_eq!(resolved.close_approach.miss_distance_km, Some(31664.5));

    // The raw record is echoed untouched, including fields the typed view ignores.
    assert!(resolved.raw.get("orbital_data").is_some());

    // Summary is grounded and names the model limitation.
    assert!(resolved.summary.contains("Apophis"));
    assert!(resolved.summary.contains("Mt TNT"));
    assert!(resolved.summary.contains("visualization-grade"));
}

#[test]
fn repeated_lookup_within_ttl_hits_cache() {
    let stub = spawn_stub(apophis_record().to_string());
    let engine = engine_for(&stub.base_url);

    let first = engine.object_physics("2099942").expect("first lookup");
    let second = engine.object_physics("2099942").expect("second lookup");

    assert_eq!(first.raw, second.raw);
    assert_eq!(stub.hits(), 1);
}

#[test]
fn record_without_estimates_uses_normalization_defaults() {
    let stub = spawn_stub(serde_json::json!({ "id": "3542519" }).to_string());
    let engine = engine_for(&stub.base_url);

    let resolved = engine.object_physics("3542519").expect("lookup succeeds");

    assert_eq!(resolved.parameters.diameter_m, 100.0);
    assert_eq!(resolved.parameters.velocity_km_s, 20.0);
    assert!(!resolved.is_hazardous);
}

#[test]
fn unreachable_catalog_surfaces_upstream_unavailable() {
    // Closed port: connection refused.
    let engine = engine_for("http://127.0.0.1:9");

    let err = engine.object_physics("2099942").unwrap_err();
    assert!(matches!(
        err,
        meteorsim_lib::Error::UpstreamUnavailable { .. }
    ));
}
