use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
  "owners": [
    {"id": 1, "name": "Harbor Holdings LLC", "address": "1 Wharf Way", "is_company": true}
  ],
  "properties": [
    {"id": 1, "owner": 1, "address": "1 City Hall Sq", "city": "Boston", "zip_code": "02201",
     "latitude": 42.3601, "longitude": -71.0589, "assessed_value": 2500000},
    {"id": 2, "owner": 1, "address": "795 Massachusetts Ave", "city": "Cambridge", "zip_code": "02139",
     "latitude": 42.3736, "longitude": -71.1097, "assessed_value": 1200000, "style": "Federal"},
    {"id": 3, "owner": 1, "address": "455 Main St", "city": "Worcester", "zip_code": "01608",
     "latitude": 42.2626, "longitude": -71.8023, "assessed_value": 640000}
  ]
}"#;

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("properties.json"), SNAPSHOT).unwrap();
    dir
}

fn marketlist(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("marketlist").unwrap();
    cmd.current_dir(dir)
        .env_remove("MARKETLIST_PROPERTIES")
        .env_remove("RUST_LOG")
        .arg("--properties")
        .arg(dir.join("properties.json"));
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_resolve_prints_first_match() {
    let dir = workspace();
    let json = stdout_json(marketlist(dir.path()).args(["--json", "resolve", "massachusetts"]));
    assert_eq!(json["latitude"], 42.3736);
    assert_eq!(json["longitude"], -71.1097);
}

#[test]
fn test_radius_preview_orders_by_distance() {
    let dir = workspace();
    let json = stdout_json(marketlist(dir.path()).args([
        "--json",
        "radius",
        "--lat=42.3601",
        "--lon=-71.0589",
        "--radius=10",
    ]));

    assert_eq!(json["status"], "matched");
    let ids: Vec<u64> = json["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["property"]["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_create_with_unknown_address_is_degraded() {
    let dir = workspace();
    let json = stdout_json(marketlist(dir.path()).args([
        "--json",
        "create",
        "--name",
        "Nowhere",
        "--address",
        "Nonexistent Road",
        "--radius",
        "5",
    ]));

    assert_eq!(json["list"]["center"]["latitude"], 0.0);
    assert_eq!(json["list"]["center"]["longitude"], 0.0);
    assert_eq!(json["members"]["total"], 0);
}

#[test]
fn test_create_by_address_shows_members() {
    let dir = workspace();
    marketlist(dir.path())
        .args(["create", "--name", "Downtown", "--address", "city hall", "--radius", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Downtown"))
        .stdout(predicate::str::contains("2 properties"));
}

#[test]
fn test_search_filters_by_city() {
    let dir = workspace();
    marketlist(dir.path())
        .args(["search", "--city", "worcester"])
        .assert()
        .success()
        .stdout(predicate::str::contains("455 Main St"))
        .stdout(predicate::str::contains("$640,000"))
        .stdout(predicate::str::contains("Cambridge").not());
}

#[test]
fn test_property_detail_includes_owner() {
    let dir = workspace();
    marketlist(dir.path())
        .args(["property", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Federal"))
        .stdout(predicate::str::contains("Harbor Holdings LLC (Company)"));
}

#[test]
fn test_missing_property_exits_with_storage_code() {
    let dir = workspace();
    marketlist(dir.path())
        .args(["property", "99"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("99"));
}

#[test]
fn test_json_errors_are_structured_reports() {
    let dir = workspace();
    let output = marketlist(dir.path())
        .env("RUST_LOG", "off")
        .args(["--json", "property", "99"])
        .assert()
        .code(4)
        .get_output()
        .stderr
        .clone();

    let report: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["code_str"], "E4002");
    assert_eq!(report["category"], "Storage");
}

#[test]
fn test_no_snapshot_configured_is_config_error() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("marketlist")
        .unwrap()
        .current_dir(dir.path())
        .env_remove("MARKETLIST_PROPERTIES")
        .args(["resolve", "main"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("storage.properties_path"));
}

#[test]
fn test_snapshot_path_from_config_file() {
    let dir = workspace();
    std::fs::write(
        dir.path().join(".marketlist.toml"),
        "[storage]\nproperties_path = \"properties.json\"\n",
    )
    .unwrap();

    let json = stdout_json(
        Command::cargo_bin("marketlist")
            .unwrap()
            .current_dir(dir.path())
            .env_remove("MARKETLIST_PROPERTIES")
            .args(["--json", "resolve", "455 main"]),
    );
    assert_eq!(json["latitude"], 42.2626);
}
