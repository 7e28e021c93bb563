//! Integration tests for the carcat CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Helper to get a carcat command isolated from the caller's environment
fn carcat(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("carcat").unwrap();
    cmd.current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join("xdg"))
        .env_remove("CARCAT_HOME")
        .env_remove("CARCAT_DB")
        .env_remove("CARCAT_PAGE_SIZE")
        .env_remove("CARCAT_LOG");
    cmd
}

/// Helper to create a catalog in a temp directory
fn setup_catalog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    carcat(&tmp).arg("init").assert().success();
    tmp
}

/// Run a command with `--format json` and parse its stdout
fn json(tmp: &TempDir, args: &[&str]) -> Value {
    let output = carcat(tmp)
        .args(args)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Init and status
// ============================================================================

#[test]
fn test_init_creates_catalog() {
    let tmp = setup_catalog();
    assert!(tmp.path().join(".carcat/config.yaml").exists());
    assert!(tmp.path().join(".carcat/catalog.db").exists());
}

#[test]
fn test_init_twice_is_a_notice() {
    let tmp = setup_catalog();
    carcat(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_drops_rows() {
    let tmp = setup_catalog();
    json(&tmp, &["car", "new", "Acura", "Regal", "2017"]);
    carcat(&tmp).args(["init", "--force"]).assert().success();

    let stats = json(&tmp, &["status"]);
    assert_eq!(stats["cars"], 0);
    assert_eq!(stats["manufacturers"], 0);
}

#[test]
fn test_init_force_drops_configured_database() {
    let tmp = setup_catalog();
    std::fs::write(tmp.path().join(".carcat/config.yaml"), "database: cars.db\n").unwrap();
    json(&tmp, &["car", "new", "Acura", "Regal", "2017"]);
    assert!(tmp.path().join("cars.db").exists());

    carcat(&tmp).args(["init", "--force"]).assert().success();
    assert!(!tmp.path().join("cars.db").exists());

    let stats = json(&tmp, &["status"]);
    assert_eq!(stats["cars"], 0);
}

#[test]
fn test_command_outside_catalog_fails() {
    let tmp = TempDir::new().unwrap();
    carcat(&tmp)
        .args(["car", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a carcat catalog"));
}

#[test]
fn test_status_pretty() {
    let tmp = setup_catalog();
    carcat(&tmp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog Status"))
        .stdout(predicate::str::contains("Cars"));
}

#[test]
fn test_catalog_flag_from_elsewhere() {
    let tmp = setup_catalog();
    let other = TempDir::new().unwrap();
    carcat(&other)
        .args(["status", "--format", "json", "--catalog"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cars\": 0"));
}

// ============================================================================
// Cars
// ============================================================================

#[test]
fn test_walkthrough_ids() {
    let tmp = setup_catalog();

    let acura = json(&tmp, &["manufacturer", "new", "Acura", "2017"]);
    assert_eq!(acura["id"], 1);
    let regal = json(&tmp, &["model", "new", "Regal"]);
    assert_eq!(regal["id"], 2);

    let car = json(&tmp, &["car", "new", "Acura", "Regal", "2017"]);
    assert_eq!(car["id"], 3);
    assert_eq!(car["manufacturer"]["id"], 1);
    assert_eq!(car["model"]["id"], 2);
    assert_eq!(car["categories"], serde_json::json!([]));

    let car = json(&tmp, &["car", "add-category", "3", "Wagon"]);
    assert_eq!(car["categories"][0]["id"], 4);
    assert_eq!(car["categories"][0]["name"], "Wagon");

    let deleted = json(&tmp, &["car", "delete", "3"]);
    assert_eq!(deleted["cars"], 1);
    assert_eq!(deleted["memberships"], 1);

    carcat(&tmp)
        .args(["car", "add-category", "3", "Wagon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_duplicate_car_fails() {
    let tmp = setup_catalog();
    carcat(&tmp)
        .args(["car", "new", "Buick", "Regal", "2017"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created car"));
    carcat(&tmp)
        .args(["car", "new", "Buick", "Regal", "2017"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let stats = json(&tmp, &["status"]);
    assert_eq!(stats["cars"], 1);
    assert_eq!(stats["manufacturers"], 1);
    assert_eq!(stats["models"], 1);
}

#[test]
fn test_car_new_quiet_prints_id() {
    let tmp = setup_catalog();
    carcat(&tmp)
        .args(["car", "new", "Buick", "Regal", "2017", "-q"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_car_list_filters() {
    let tmp = setup_catalog();
    json(&tmp, &["car", "new", "Buick", "Regal", "2016"]);
    json(&tmp, &["car", "new", "Buick", "Enclave", "2018"]);
    json(&tmp, &["car", "new", "Acura", "TLX", "2018"]);

    let all = json(&tmp, &["car", "list"]);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let buick = json(&tmp, &["car", "list", "--manufacturer", "Buick"]);
    assert_eq!(buick.as_array().unwrap().len(), 2);

    let recent = json(&tmp, &["car", "list", "-m", "Buick", "--min-year", "2017"]);
    let recent = recent.as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["model"]["name"], "Enclave");
}

#[test]
fn test_car_list_paging() {
    let tmp = setup_catalog();
    for model in ["A", "B", "C"] {
        json(&tmp, &["car", "new", "Buick", model, "2017"]);
    }

    let first = json(&tmp, &["car", "list", "--size", "2"]);
    assert_eq!(first.as_array().unwrap().len(), 2);
    let second = json(&tmp, &["car", "list", "--size", "2", "--page", "1"]);
    assert_eq!(second.as_array().unwrap().len(), 1);
}

#[test]
fn test_car_list_tsv_and_csv() {
    let tmp = setup_catalog();
    json(&tmp, &["car", "new", "Buick", "Regal", "2017"]);

    carcat(&tmp)
        .args(["car", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Regal"))
        .stdout(predicate::str::contains("1 car(s) found."));

    carcat(&tmp)
        .args(["car", "list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("id,manufacturer,model,year,categories"));
}

#[test]
fn test_car_list_empty() {
    let tmp = setup_catalog();
    carcat(&tmp)
        .args(["car", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cars found."));
}

#[test]
fn test_car_update_repoints() {
    let tmp = setup_catalog();
    let car = json(&tmp, &["car", "new", "Buick", "Regal", "2017"]);
    let id = car["id"].to_string();

    let updated = json(&tmp, &["car", "update", &id, "Acura", "Regal", "2018"]);
    assert_eq!(updated["id"], car["id"]);
    assert_eq!(updated["manufacturer"]["name"], "Acura");
    assert_eq!(updated["manufacturer"]["year"], 2018);
}

#[test]
fn test_remove_missing_category_is_noop() {
    let tmp = setup_catalog();
    json(&tmp, &["car", "new", "Buick", "Regal", "2017"]);
    let car = json(&tmp, &["car", "remove-category", "3", "Coupe"]);
    assert_eq!(car["categories"], serde_json::json!([]));
}

// ============================================================================
// Deletes
// ============================================================================

#[test]
fn test_delete_missing_is_notice() {
    let tmp = setup_catalog();
    carcat(&tmp)
        .args(["manufacturer", "delete", "Nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deleted"));
}

#[test]
fn test_delete_manufacturer_cascades() {
    let tmp = setup_catalog();
    json(&tmp, &["car", "new", "Buick", "Regal", "2016"]);
    json(&tmp, &["car", "new", "Buick", "Regal", "2017"]);
    json(&tmp, &["car", "add-category", "5", "Wagon"]);

    let deleted = json(&tmp, &["manufacturer", "delete", "Buick"]);
    assert_eq!(deleted["manufacturers"], 2);
    assert_eq!(deleted["cars"], 2);
    assert_eq!(deleted["memberships"], 1);

    let stats = json(&tmp, &["status"]);
    assert_eq!(stats["cars"], 0);
    assert_eq!(stats["models"], 1);
    assert_eq!(stats["categories"], 1);
}

#[test]
fn test_delete_model_in_use_fails() {
    let tmp = setup_catalog();
    json(&tmp, &["car", "new", "Buick", "Regal", "2017"]);
    carcat(&tmp)
        .args(["model", "delete", "Regal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still reference"));

    json(&tmp, &["car", "delete", "3"]);
    let deleted = json(&tmp, &["model", "delete", "Regal"]);
    assert_eq!(deleted["models"], 1);
}

#[test]
fn test_delete_category_keeps_cars() {
    let tmp = setup_catalog();
    json(&tmp, &["car", "new", "Buick", "Regal", "2017"]);
    json(&tmp, &["car", "add-category", "3", "Wagon"]);

    let deleted = json(&tmp, &["category", "delete", "Wagon"]);
    assert_eq!(deleted["categories"], 1);
    assert_eq!(deleted["memberships"], 1);

    let car = json(&tmp, &["car", "show", "3"]);
    assert_eq!(car["categories"], serde_json::json!([]));
}

// ============================================================================
// Other entities
// ============================================================================

#[test]
fn test_manufacturer_show_and_names() {
    let tmp = setup_catalog();
    json(&tmp, &["car", "new", "Buick", "Regal", "2016"]);
    json(&tmp, &["car", "new", "Buick", "Enclave", "2017"]);
    json(&tmp, &["car", "new", "Acura", "TLX", "2017"]);

    let names = json(&tmp, &["manufacturer", "names"]);
    assert_eq!(names, serde_json::json!(["Acura", "Buick"]));

    let versions = json(&tmp, &["manufacturer", "show", "Buick"]);
    assert_eq!(versions.as_array().unwrap().len(), 2);

    let one = json(&tmp, &["manufacturer", "show", "Buick", "--year", "2017"]);
    assert_eq!(one[0]["cars"][0]["model"]["name"], "Enclave");

    carcat(&tmp)
        .args(["mf", "show", "Buick", "--year", "1999"])
        .assert()
        .failure();
}

#[test]
fn test_category_and_model_crud() {
    let tmp = setup_catalog();
    let wagon = json(&tmp, &["category", "new", "Wagon"]);
    carcat(&tmp)
        .args(["cat", "new", "Wagon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let id = wagon["id"].to_string();
    let renamed = json(&tmp, &["category", "update", &id, "Estate"]);
    assert_eq!(renamed["name"], "Estate");

    json(&tmp, &["model", "new", "Regal"]);
    let models = json(&tmp, &["model", "list", "--prefix", "Re"]);
    assert_eq!(models.as_array().unwrap().len(), 1);
}

#[test]
fn test_completions() {
    let tmp = TempDir::new().unwrap();
    carcat(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("carcat"));
}
