use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn versioned_template(dir: &TempDir) -> String {
    format!("{}/{{dataset}}_{{version}}.txt", dir.path().display())
}

#[test]
fn unknown_dataset_is_a_usage_error() {
    let mut cmd = cargo_bin_cmd!("perfplot");
    cmd.args(["plot", "wildfire"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_arguments_fail() {
    let mut cmd = cargo_bin_cmd!("perfplot");
    cmd.assert().failure();

    let mut cmd = cargo_bin_cmd!("perfplot");
    cmd.arg("plot");
    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn empty_inputs_report_no_data() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fire_animation_v1.txt"), "").unwrap();
    fs::write(dir.path().join("fire_animation_v2.txt"), "\n").unwrap();
    let output_dir = dir.path().join("plots");

    let mut cmd = cargo_bin_cmd!("perfplot");
    cmd.args(["plot", "fire-animation", "v1", "v2", "--input-template"])
        .arg(versioned_template(&dir))
        .arg("--output-dir")
        .arg(&output_dir)
        .env_remove("PERFPLOT_TRACE");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("no data to plot"));
    assert!(!output_dir.exists());
}

#[test]
fn plot_writes_four_charts() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("fire_animation_v1.txt"),
        "2548, 3.0e5, 0.008\n48614, 2.0e6, 0.5\n10434109, 9.0e6, 120.0\n",
    )
    .unwrap();
    let output_dir = dir.path().join("charts");

    let mut cmd = cargo_bin_cmd!("perfplot");
    cmd.args(["plot", "fire-animation", "v1", "--input-template"])
        .arg(versioned_template(&dir))
        .arg("--output-dir")
        .arg(&output_dir)
        .args(["--width", "640", "--height", "400"])
        .env_remove("PERFPLOT_TRACE");
    let out = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(out).unwrap();

    let saved: Vec<&str> = stdout
        .lines()
        .filter(|line| line.starts_with("saved: "))
        .collect();
    assert_eq!(saved.len(), 4);
    for name in [
        "fire_animation_perf_bar.png",
        "fire_animation_times_bar.png",
        "fire_animation_perf_line.png",
        "fire_animation_times_line.png",
    ] {
        let path = output_dir.join(name);
        assert!(saved.iter().any(|line| line.ends_with(name)), "{name} not reported");
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}

#[test]
fn report_json_lists_means_per_variant() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("burned_probabilities_v1.txt"),
        "2548, 2.0, 0.5\n2548, 4.0, 1.5\n48614, 10.0, 3.0\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("burned_probabilities_v2.txt"),
        "48614, 8.0, 2.0\n2548, 1.0, 0.25\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("perfplot");
    cmd.args(["report", "burned-probabilities", "v1", "v2", "--format", "json"])
        .arg("--input-template")
        .arg(versioned_template(&dir))
        .env_remove("PERFPLOT_TRACE");
    let out = cmd.assert().success().get_output().stdout.clone();
    let rows: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["key"], 2548);
    assert_eq!(rows[0]["label"], "2005_26");
    assert_eq!(rows[0]["variant"], "v1");
    assert_eq!(rows[0]["metric"], 3.0);
    assert_eq!(rows[0]["time"], 1.0);
    assert_eq!(rows[1]["variant"], "v2");
    assert_eq!(rows[1]["time"], 0.25);
    assert_eq!(rows[3]["metric"], 8.0);
    assert!(rows[0].get("min_metric").is_none());
}

#[test]
fn missing_source_fails_with_code() {
    let dir = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("perfplot");
    cmd.args(["report", "fire_animation", "v9", "--input-template"])
        .arg(versioned_template(&dir))
        .env_remove("PERFPLOT_TRACE");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("SOURCE_NOT_FOUND"));
}

#[test]
fn malformed_labels_file_fails() {
    let dir = TempDir::new().unwrap();
    let labels = dir.path().join("labels.json");
    fs::write(&labels, "[1, 2]").unwrap();

    let mut cmd = cargo_bin_cmd!("perfplot");
    cmd.args(["report", "fire_animation", "--labels"])
        .arg(&labels)
        .env_remove("PERFPLOT_TRACE");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("LABELS_INVALID_JSON"));
}
