use std::fs;

use smartgrowth::{
    FieldValue, read_feature_collection,
    jobs::{DataPaths, files, run_districts, run_precincts, run_sites, run_upzone, validate_data_dir},
};
use tempfile::TempDir;

fn workspace() -> (TempDir, DataPaths) {
    let tmp = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(tmp.path().join("source"), tmp.path().join("public/data"));
    fs::create_dir_all(&paths.source_dir).unwrap();
    (tmp, paths)
}

fn precinct(code: &str, yes: f64, no: f64) -> String {
    format!(
        r#"{{"type":"Feature","geometry":{{"type":"Polygon","coordinates":[[[-121.8,39.7],[-121.79,39.7],[-121.79,39.71],[-121.8,39.7]]]}},
            "properties":{{"PRECINCT":"{code}","COUNTY":"Butte","Precinct":1,"Registered_Voters":900,"NO_Total":{no},"YES_Total":{yes},
            "Total_Votes":{total},"Percent_NO":{pn},"Percent_YES":{py},"PRECINCT_5DIGIT":"0{code}"}}}}"#,
        total = yes + no,
        pn = no * 100.0 / (yes + no),
        py = yes * 100.0 / (yes + no),
    )
}

fn collection(features: &[String]) -> String {
    format!(r#"{{"type":"FeatureCollection","features":[{}]}}"#, features.join(","))
}

#[test]
fn missing_source_aborts_every_job() {
    let (_tmp, paths) = workspace();
    let err = run_precincts(&paths).unwrap_err();
    assert!(err.to_string().contains("Source file not found"));
    assert!(run_sites(&paths).is_err());
    assert!(run_districts(&paths).is_err());
    assert!(run_upzone(&paths).is_err());
    assert!(!paths.output(files::PRECINCTS).exists());
}

#[test]
fn precincts_job_merges_measures() {
    let (_tmp, paths) = workspace();
    fs::write(paths.source(files::MEASURE_O), collection(&[precinct("101", 300.0, 100.0), precinct("102", 50.0, 50.0)])).unwrap();
    fs::write(paths.source(files::MEASURE_P), collection(&[precinct("102", 30.0, 70.0)])).unwrap();

    let report = run_precincts(&paths).unwrap();
    assert_eq!(report.features, 2);
    assert_eq!(report.merge.matched, 1);
    assert_eq!(report.merge.unmatched, vec!["101".to_string()]);

    let merged = read_feature_collection(&report.output).unwrap();
    let first = &merged.features[0].properties;
    assert_eq!(first.text("PRECINCT"), Some("101"));
    assert_eq!(first.number("percent_yes_o"), Some(75.0));
    assert_eq!(first.number("percent_yes_p"), Some(0.0));
    assert_eq!(first.number("registered_voters"), Some(900.0));
    assert!(!first.contains_key("PRECINCT_5DIGIT"));

    let second = &merged.features[1].properties;
    assert_eq!(second.number("percent_yes_p"), Some(30.0));
    assert_eq!(second.number("total_votes_p"), Some(100.0));
}

#[test]
fn sites_and_districts_rewrite_in_place() {
    let (_tmp, paths) = workspace();
    fs::create_dir_all(&paths.data_dir).unwrap();
    fs::write(
        paths.source(files::SITES_CSV),
        "site_id,name,type,acres,dist_downtown_mi,predominant_zone,parks_5min,parks_10min,infra_age,potential_units,priority_score\n\
         4,Esplanade Corner,Commercial,3.5,1.2,CC,True,True,Modern,85.5,72\n",
    ).unwrap();
    fs::write(
        paths.output(files::SITES),
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,"properties":{"Name":"Esplanade Corner","Number_ID":"4"}},
            {"type":"Feature","geometry":null,"properties":{"Name":"Rail Yard","Number_ID":"8","Type":"Industrial"}}
        ]}"#,
    ).unwrap();
    fs::write(
        paths.output(files::DISTRICTS),
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,"properties":{"DISTRICT":"2","NAME":"District 2","COUNCILMEM":"R. Diaz","TermDate":"2024-2028","Email":"r@x"}},
            {"type":"Feature","geometry":null,"properties":{"DISTRICT":"1","NAME":"District 1","COUNCILMEM":"K. Moss","TermDate":"2022-2026","Email":"k@x"}}
        ]}"#,
    ).unwrap();

    let sites = run_sites(&paths).unwrap();
    assert_eq!(sites.merge.matched, 1);
    let merged = read_feature_collection(&sites.output).unwrap();
    assert_eq!(merged.features[0].properties.number("potential_units"), Some(85.5));
    assert_eq!(merged.features[0].properties.get("parks_5min"), Some(&FieldValue::Bool(true)));
    assert_eq!(merged.features[1].properties.text("type"), Some("Industrial"));
    assert_eq!(merged.features[1].properties.number("priority_score"), Some(50.0));

    let districts = run_districts(&paths).unwrap();
    assert_eq!(districts.districts[0], ("1".into(), "District 1".into(), "K. Moss".into()));
    assert_eq!(districts.districts[1].0, "2");
}

#[test]
fn upzone_job_publishes_sorted_compact_layer() {
    let (_tmp, paths) = workspace();
    fs::write(
        paths.source(files::UPZONE_SOURCE),
        r#"{
  "type": "FeatureCollection",
  "name": "Chico_UpzoneScenario",
  "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } },
  "features": [
    { "type": "Feature", "properties": { "APN": "B", "upzone_elig": 1, "upzone_tier": 2, "sc_fiscal": 50, "sc_util": 50, "sc_infra": 50, "sc_loc": 50 },
      "geometry": { "type": "Point", "coordinates": [ -121.837500123456, 39.728500987654 ] } },
    { "type": "Feature", "properties": { "APN": "C", "upzone_elig": 0, "upzone_tier": 1, "sc_fiscal": 99, "sc_util": 99, "sc_infra": 99, "sc_loc": 99 },
      "geometry": { "type": "Point", "coordinates": [ -121.81, 39.71 ] } },
    { "type": "Feature", "properties": { "APN": "A", "upzone_elig": 1, "upzone_tier": 1, "sc_fiscal": 10, "sc_util": 20, "sc_infra": 30, "sc_loc": 40 },
      "geometry": { "type": "Point", "coordinates": [ -121.82, 39.72 ] } }
  ]
}"#,
    ).unwrap();
    fs::write(
        paths.source(files::UPZONE_SUMMARY),
        r#"{"adoption_scenarios":{"10":{"new_units":40},"25":{"new_units":100},"50":{"new_units":200},"75":{"new_units":300},"100":{"new_units":400}}}"#,
    ).unwrap();

    let report = run_upzone(&paths).unwrap();
    assert_eq!(report.stats.eligible, 2);
    assert_eq!(report.stats.min_priority, Some(975.0));
    assert_eq!(report.stats.max_priority, Some(1950.0));
    assert!(report.output_bytes < report.source_bytes);
    assert!(report.size_reduction() > 0.0);

    let text = fs::read_to_string(&report.output).unwrap();
    assert!(!text.contains('\n'));
    assert!(!text.contains("crs"));
    assert!(text.contains("[-121.8375,39.728501]"));

    let published = read_feature_collection(&report.output).unwrap();
    let order: Vec<_> = published.iter().map(|f| f.properties.display("APN")).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
    assert!(published.features[2].properties.get("adoption_priority").unwrap().is_null());

    assert_eq!(
        fs::read_to_string(&report.summary).unwrap(),
        fs::read_to_string(paths.source(files::UPZONE_SUMMARY)).unwrap()
    );
}

#[test]
fn validation_reports_per_file_problems() {
    let (_tmp, paths) = workspace();
    assert!(validate_data_dir(&paths.data_dir).is_err());

    fs::create_dir_all(&paths.data_dir).unwrap();
    assert!(validate_data_dir(&paths.data_dir).unwrap().empty);

    fs::write(
        paths.output("precincts-voting.geojson"),
        r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null,"properties":{"PRECINCT":"1","percent_yes_o":50,"percent_yes_p":40}}]}"#,
    ).unwrap();
    fs::write(paths.output("parks.geojson"), r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
    fs::write(paths.output("council-districts.geojson"), r#"{"type":"Feature"}"#).unwrap();
    fs::write(paths.output("bike-lanes.geojson"), r#"{"type":"FeatureCollection","features":[]}"#).unwrap();

    let report = validate_data_dir(&paths.data_dir).unwrap();
    assert!(report.has_errors());
    assert_eq!(report.extra.len(), 1);
    assert_eq!(report.extra[0].0, "bike-lanes.geojson");

    let by_name = |name: &str| report.checks.iter().find(|c| c.file == name).unwrap();
    assert!(by_name("precincts-voting.geojson").is_valid());
    assert!(by_name("parks.geojson").is_valid());
    assert_eq!(by_name("parks.geojson").warnings.len(), 1);
    assert!(!by_name("council-districts.geojson").is_valid());
    assert_eq!(by_name("opportunity-sites.geojson").errors, vec!["File does not exist".to_string()]);
}
