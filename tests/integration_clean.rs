//! Integration tests for the `admap clean` command.

mod common;

use admap_cli::geojson::FeatureCollection;
use common::TestData;
use predicates::prelude::*;
use std::fs;

const RAW_VILLAGES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "village": "LAHIRIPUR", "vlcode": 31210, "block": "Gosaba", "subdistric": "Gosaba", "district": "South 24 Parganas", "area_km2": 3.2 },
      "geometry": null
    },
    {
      "type": "Feature",
      "properties": { "village": "  satjelia   gram panchayat ", "vlcode": 31205, "block": "Gosaba", "subdistric": "Basanti", "district": "South 24 Parganas", "area_km2": 2.5 },
      "geometry": null
    }
  ]
}"#;

#[test]
fn test_clean_writes_enriched_file() {
    let data = TestData::new();
    let input = data.root().join("raw.geojson");
    let output = data.root().join("out").join("villages.geojson");
    fs::write(&input, RAW_VILLAGES).unwrap();

    data.admap()
        .arg("clean")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"))
        .stdout(predicate::str::contains("Villages: 2"))
        .stdout(predicate::str::contains("Total area: 5.70 km²"))
        .stdout(predicate::str::contains("2  South 24 Parganas"));

    let collection =
        FeatureCollection::from_json_str(&fs::read_to_string(&output).unwrap(), "output").unwrap();
    // Basanti sorts before Gosaba
    assert_eq!(collection.features[0].text("village_clean"), Some("Satjelia GP"));
    assert_eq!(collection.features[0].text("village_code"), Some("31205"));
    assert_eq!(collection.features[1].text("village_clean"), Some("Lahiripur"));
    assert_eq!(collection.features[1].text("subdistric_name"), Some("Gosaba"));
}

#[test]
fn test_clean_to_stdout() {
    let data = TestData::new();
    let input = data.root().join("raw.geojson");
    fs::write(&input, RAW_VILLAGES).unwrap();

    let output = data.admap().arg("clean").arg(&input).output().unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let collection = FeatureCollection::from_json_str(&text, "stdout").unwrap();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.features[1].text("district_name"), Some("South 24 Parganas"));
}

#[test]
fn test_clean_missing_input() {
    let data = TestData::new();
    data.admap()
        .arg("clean")
        .arg(data.root().join("nope.geojson"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.geojson"));
}
