//! Simulator tests against files on disk

use std::fs;
use std::path::PathBuf;

use ristretto_core::config::PressureModel;
use ristretto_core::controller::BrewController;
use ristretto_core::profile::ProfileKey;
use ristretto_core::session::StopReason;
use ristretto_core::state::State;
use ristretto_core::telemetry::Telemetry;
use ristretto_sim::config;
use ristretto_sim::documents::JsonProfileDocuments;
use ristretto_sim::runner::{RunOptions, ShotRunner};

/// Fresh scratch directory for one test
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ristretto-sim-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_document(root: &PathBuf, file: &str, text: &str) {
    let path = root.join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn controller(root: &PathBuf) -> BrewController<JsonProfileDocuments> {
    let config = config::SimConfig::default();
    BrewController::new(
        JsonProfileDocuments::new(root),
        config.simulation,
        config.adjustments,
        config.brew.brew_config(),
    )
}

#[test]
fn test_load_config_file() {
    let dir = scratch("config");
    let path = dir.join("sim.toml");
    fs::write(
        &path,
        "[simulation]\npressure_model = \"ramp\"\nramp_time_s = 4.0\n\n[brew]\nprofile = \"7 bar profile\"\nvolumetric = true\n",
    )
    .unwrap();

    let config = config::load(Some(&path)).unwrap();
    assert_eq!(config.simulation.pressure_model, PressureModel::Ramp);
    assert_eq!(config.simulation.ramp_time_s, 4.0);
    assert_eq!(config.brew.profile, "7 bar profile");
    assert!(config.brew.brew_config().volumetric);
}

#[test]
fn test_invalid_config_file() {
    let dir = scratch("bad-config");
    let path = dir.join("sim.toml");
    fs::write(&path, "[simulation\n").unwrap();

    let err = config::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("sim.toml"));
}

#[test]
fn test_document_sets_targets() {
    let dir = scratch("documents");
    write_document(
        &dir,
        ProfileKey::LmLeva.data_file(),
        r#"{"targetTemp": "91.5", "targetDuration": 27.9}"#,
    );

    let mut ctrl = controller(&dir);
    ctrl.select(ProfileKey::LmLeva);
    let targets = ctrl.adjustments().targets;
    assert_eq!(targets.temp_c, 91.5);
    assert_eq!(targets.duration_s, 27.0);
}

#[test]
fn test_missing_document_uses_defaults() {
    let dir = scratch("no-documents");
    let mut ctrl = controller(&dir);
    ctrl.select(ProfileKey::Classic);
    let targets = ctrl.adjustments().targets;
    assert_eq!(targets.temp_c, 92.0);
    assert_eq!(targets.duration_s, 35.0);
}

#[test]
fn test_lever_shot_from_document() {
    let dir = scratch("lever");
    write_document(
        &dir,
        ProfileKey::CreminaLever.data_file(),
        r#"{"target_temp": 90, "target_time": "12"}"#,
    );

    let mut ctrl = controller(&dir);
    ctrl.select_name("Cremina Lever");
    let options = RunOptions {
        json: true,
        ..Default::default()
    };
    let mut runner = ShotRunner::new(Vec::new(), options);
    let report = runner.run(&mut ctrl).unwrap();

    assert_eq!(report.stop_reason, StopReason::PhasesComplete);
    assert!((report.telemetry.elapsed_s - 12.0).abs() < 0.15);
    assert!(report.telemetry.temp_c < 93.0);
    assert_eq!(ctrl.state(), State::ShotComplete);
}

#[test]
fn test_classic_shot_telemetry_stream() {
    let dir = scratch("classic");
    let mut ctrl = controller(&dir);
    ctrl.select_name("Classic");

    let options = RunOptions {
        json: true,
        ..Default::default()
    };
    let mut runner = ShotRunner::new(Vec::new(), options);
    let report = runner.run(&mut ctrl).unwrap();
    let out = String::from_utf8(runner.into_inner()).unwrap();

    let records: Vec<Telemetry> = out
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len() as u32, report.ticks);

    for pair in records.windows(2) {
        assert!(pair[1].weight_g >= pair[0].weight_g);
        assert!(pair[1].elapsed_s > pair[0].elapsed_s);
        assert!(pair[1].pressure_bar >= pair[0].pressure_bar);
    }
    assert!((report.telemetry.weight_g - 36.0).abs() < 0.2);
}
