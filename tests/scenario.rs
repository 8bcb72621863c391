use std::fs;

use smartgrowth::{
    AdoptionOrder, AppState, LayerId, LoadError, ScenarioError, Summary, parse_feature_collection,
};

const COMMERCIAL_SUMMARY: &str = r#"{
    "methodology": "walkshed",
    "aggregate_totals": {
        "current": {"total_businesses_viable": 212, "sites": 14},
        "25": {"new_residents": 1150, "total_businesses_viable": 230, "new_businesses_enabled": 18},
        "50": {"new_residents": 2300, "total_businesses_viable": 251, "new_businesses_enabled": 39},
        "75": {"new_residents": 3450, "total_businesses_viable": 266, "new_businesses_enabled": 54},
        "100": {"new_residents": 4600, "total_businesses_viable": 280, "new_businesses_enabled": 68}
    }
}"#;

const RETROFIT_SUMMARY: &str = r#"{"adoption_scenarios": {
    "10": {"new_units": 120, "parcels": 6},
    "25": {"new_units": 300, "parcels": 15},
    "100": {"new_units": 1200, "parcels": 60}
}}"#;

fn parcels(n: usize) -> String {
    let features: Vec<String> = (0..n)
        .map(|i| {
            let priority = if i % 4 == 3 { "null".to_string() } else { format!("{}", 900 + i) };
            format!(r#"{{"type":"Feature","geometry":null,"properties":{{"APN":"{i:04}","adoption_priority":{priority}}}}}"#)
        })
        .collect();
    format!(r#"{{"type":"FeatureCollection","features":[{}]}}"#, features.join(","))
}

#[test]
fn commercial_viability_uses_current_baseline() {
    let layout = LayerId::CommercialViability.scenario().unwrap().layout;
    let summary = Summary::parse(COMMERCIAL_SUMMARY, &layout).unwrap();

    let at_zero = summary.projected(0.0).unwrap();
    assert_eq!(at_zero.get("total_businesses_viable"), Some(212.0));
    assert_eq!(at_zero.get("new_residents"), Some(0.0));

    let at_25 = summary.projected(25.0).unwrap();
    for (name, value) in summary.breakpoint(25).unwrap().iter() {
        assert_eq!(at_25.get(name), Some(value));
    }
    assert_eq!(at_25.get("sites"), Some(14.0));

    // halfway between the baseline and 25%
    let at_12_5 = summary.projected(12.5).unwrap();
    assert_eq!(at_12_5.get("total_businesses_viable"), Some(221.0));
    assert_eq!(at_12_5.get("new_residents"), Some(575.0));
    assert_eq!(at_12_5.get("new_businesses_enabled"), Some(9.0));
}

#[test]
fn missing_breakpoint_only_breaks_its_intervals() {
    let layout = LayerId::VacantInfill.scenario().unwrap().layout;
    let summary = Summary::parse(RETROFIT_SUMMARY, &layout).unwrap();

    assert_eq!(summary.projected(20.0).unwrap().get("new_units"), Some(240.0));
    assert_eq!(summary.projected(40.0), Err(ScenarioError::MissingBreakpoint(50)));
    assert_eq!(summary.projected(100.0).unwrap().get("parcels"), Some(60.0));
}

#[test]
fn adopted_sets_grow_with_the_slider() {
    let features = parse_feature_collection(&parcels(40)).unwrap();
    let order = AdoptionOrder::from_collection(&features, "APN", "adoption_priority");
    assert_eq!(order.eligible_count(), 30);

    let mut previous = order.adopted(0.0);
    assert!(previous.is_empty());
    for percent in (0..=100).step_by(5) {
        let next = order.adopted(percent as f64);
        assert!(previous.is_subset(&next));
        previous = next;
    }
    assert_eq!(previous.len(), 30);
    assert!(!previous.contains("0003"));
}

#[test]
fn store_loads_layers_from_disk() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("upzone-scenario.geojson"), parcels(8)).unwrap();
    fs::write(
        tmp.path().join("upzone-scenario-summary.json"),
        r#"{"adoption_scenarios":{"10":{"new_units":10,"tax_increase_annual":1000.5},"25":{"new_units":25,"tax_increase_annual":2501.25},
            "50":{"new_units":50},"75":{"new_units":75},"100":{"new_units":100}}}"#,
    ).unwrap();

    let mut state = AppState::new(format!("{}/", tmp.path().display()));
    let id = LayerId::UpzoneScenario;

    let features = state.begin_features(id).unwrap();
    let summary = state.begin_summary(id).unwrap();
    let text = fs::read_to_string(state.data_url(id)).unwrap();
    assert!(state.finish_features_text(id, features, &text));
    let text = fs::read_to_string(state.summary_url(id).unwrap()).unwrap();
    assert!(state.finish_summary_text(id, summary, &text));

    let impact = state.projected_impact(id).unwrap();
    assert_eq!(impact.get("new_units"), Some(25.0));
    assert_eq!(impact.get("tax_increase_annual"), Some(2501.25));

    state.set_adoption(id, 17.5);
    let impact = state.projected_impact(id).unwrap();
    assert_eq!(impact.get("new_units"), Some(18.0));
    assert!((impact.get("tax_increase_annual").unwrap() - 1750.875).abs() < 1e-9);

    state.set_adoption(id, 50.0);
    assert_eq!(state.adopted(id).unwrap().len(), 3);

    // a second load of the same layer is served from the session cache
    assert!(state.begin_features(id).is_none());
    assert!(state.begin_summary(id).is_none());
}

#[test]
fn a_failed_layer_leaves_others_usable() {
    let mut state = AppState::default();
    let failed = state.begin_summary(LayerId::VacantInfill).unwrap();
    assert!(state.fail_load(LayerId::VacantInfill, failed, LoadError::Fetch("404 Not Found".into())));
    assert!(state.projected_impact(LayerId::VacantInfill).is_none());

    let ok = state.begin_summary(LayerId::CommercialRetrofit).unwrap();
    assert!(state.finish_summary_text(LayerId::CommercialRetrofit, ok, RETROFIT_SUMMARY));
    assert_eq!(state.projected_impact(LayerId::CommercialRetrofit).unwrap().get("parcels"), Some(60.0));

    state.set_adoption(LayerId::CommercialRetrofit, 25.0);
    assert_eq!(state.projected_impact(LayerId::CommercialRetrofit).unwrap().get("new_units"), Some(300.0));
}
