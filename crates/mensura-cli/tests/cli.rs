//! End-to-end tests of the `mensura` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXTRACT: &str = "Boletín Oficial de Minería | Lunes 2 de febrero de 2026\n\
EXTRACTO\n\
2° Juzgado de Letras de Copiapó, causa Rol V-1234-2025.\n\
Solicitante: MINERA ATACAMA SpA, R.U.T. 76.123.456-7, solicitó la caducidad de la concesión denominada \"LA ROSA 1 AL 20\", comuna de Tierra Amarilla, superficie 200 hectáreas, cuyos vértices son:\n\
V1   Norte 7.012.345,00   Este 456.789,00\n\
V2   Norte 7.012.345,00   Este 458.789,00\n\
V3   Norte 7.011.345,00   Este 458.789,00\n\
\n\
En su reemplazo se constituye la nueva concesión denominada \"LA ROSA NUEVA 1 AL 10\", Rol V-2222-2025, con una superficie de 100 hectáreas, cuyo punto medio tiene coordenadas Norte 7.020.000 Este 460.000.\n\
CVE 2345678";

const MENSURA: &str = "SOLICITUD DE MENSURA\n\
Juzgado de Letras de Vallenar, Rol: 567-2024\n\
pertenencia \"CERRO NEGRO 1 AL 5\", comuna de Alto del Carmen.\n\
V1  6.820.000,00  350.000,00\n\
V2  6.820.000,00  350.500,00\n\
V3  6.819.000,00  350.500,00\n\
V4  6.819.000,00  350.000,00";

/// Binary isolated from any per-user configuration.
fn mensura(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mensura").unwrap();
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("extract.txt"), EXTRACT).unwrap();
    fs::write(dir.path().join("mensura.txt"), MENSURA).unwrap();
    fs::write(dir.path().join("noise.txt"), "lorem ipsum dolor").unwrap();
    dir
}

#[test]
fn test_process_json() {
    let dir = workspace();

    let output = mensura(dir.path())
        .arg("process")
        .arg(dir.path().join("extract.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["kind"], "extract");
    assert_eq!(json["records"].as_array().unwrap().len(), 2);
}

#[test]
fn test_process_csv_to_file() {
    let dir = workspace();
    let out = dir.path().join("out.csv");

    mensura(dir.path())
        .args(["process", "-f", "csv", "-o"])
        .arg(&out)
        .arg(dir.path().join("mensura.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let content = fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("source,kind,role,property_name"));
    assert!(lines.next().unwrap().starts_with("mensura.txt,mensura,single,CERRO NEGRO 1 AL 5"));
}

#[test]
fn test_process_geojson() {
    let dir = workspace();

    let output = mensura(dir.path())
        .args(["process", "--format", "geojson"])
        .arg(dir.path().join("mensura.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["type"], "FeatureCollection");
    assert_eq!(json["features"].as_array().unwrap().len(), 1);
    assert_eq!(json["crs"]["properties"]["name"], "urn:ogc:def:crs:EPSG::32719");
}

#[test]
fn test_process_text_with_warnings() {
    let dir = workspace();

    mensura(dir.path())
        .args(["process", "-f", "text", "--show-warnings"])
        .arg(dir.path().join("noise.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Kind: unknown"))
        .stderr(predicate::str::contains("Warnings:"));
}

#[test]
fn test_process_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    mensura(dir.path())
        .arg("process")
        .arg(dir.path().join("missing.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_summary_and_geojson() {
    let dir = workspace();
    let out_dir = dir.path().join("out");
    let pattern = dir.path().join("*.txt");

    mensura(dir.path())
        .args(["batch", "--summary", "--geojson", "-j", "2", "-o"])
        .arg(&out_dir)
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("3 successful"));

    assert!(out_dir.join("extract.json").exists());
    assert!(out_dir.join("noise.json").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    // header + 2 extract records + mensura + noise
    assert_eq!(summary.lines().count(), 5);

    let geojson: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("boundaries.geojson")).unwrap())
            .unwrap();
    assert_eq!(geojson["features"].as_array().unwrap().len(), 3);
}

#[test]
fn test_batch_continue_on_error() {
    let dir = workspace();
    fs::write(dir.path().join("broken.pdf"), "not a pdf").unwrap();
    let pattern = dir.path().join("*");

    mensura(dir.path())
        .args(["batch", "--continue-on-error"])
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"))
        .stdout(predicate::str::contains("broken.pdf"));

    mensura(dir.path())
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure();
}

#[test]
fn test_batch_no_matches() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = dir.path().join("*.txt");

    mensura(dir.path())
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("mensura.json");

    mensura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    mensura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    mensura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "geometry.default_hectares", "25"])
        .assert()
        .success();

    mensura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "geometry.default_hectares"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25"));

    mensura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "scanner.max_pair_gap", "0"])
        .assert()
        .failure();
}

#[test]
fn test_config_path_default_location() {
    let dir = tempfile::tempdir().unwrap();

    mensura(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mensura"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_process_uses_config_crs() {
    let dir = workspace();
    let config = dir.path().join("mensura.json");

    mensura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "export.crs", "epsg24879"])
        .assert()
        .success();

    mensura(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["process", "-f", "geojson"])
        .arg(dir.path().join("mensura.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("EPSG::24879"));
}

#[test]
fn test_batch_keeps_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), MENSURA).unwrap();
    fs::write(dir.path().join("b.txt"), "").unwrap();
    let out_dir = dir.path().join("out");
    let pattern = dir.path().join("*.txt");

    mensura(dir.path())
        .args(["batch", "--summary", "-o"])
        .arg(&out_dir)
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.lines().any(|l| l.starts_with("b.txt,unknown,single")));
}
