use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const PILL_GO: &str = r#"package demo

//go:hessian class=com.acme.Pill
type Pill hessian.JavaEnum

const (
	PillRed Pill = iota
	PillGreen
	PillBlue
)
"#;

const COIN_GO: &str = r#"package demo

// Coin denominations shared with the java side.
type Coin hessian.JavaEnum

const (
	CoinPenny Coin = 1
	CoinDime  Coin = 10
)
"#;

fn write_config(dir: &Path, package_prefix: &str) -> std::path::PathBuf {
    let config = format!(
        r#"
[naming]
package_prefix = "{}"

[[sources]]
type = "directory"
path = "{}"
"#,
        package_prefix,
        dir.display().to_string().replace('\\', "/"),
    );
    let config_path = dir.join("enumer.toml");
    fs::write(&config_path, config).unwrap();
    config_path
}

fn run_enumer(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hessian-enumer"))
        .args(args)
        .output()
        .expect("Failed to run hessian-enumer")
}

#[test]
fn test_end_to_end_generation() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("pill.go"), PILL_GO).unwrap();
    fs::write(temp.path().join("coin.go"), COIN_GO).unwrap();
    let config_path = write_config(temp.path(), "com.demo");

    let output = run_enumer(&["-c", config_path.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "hessian-enumer failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let pill = fs::read_to_string(temp.path().join("pill_enum.go")).unwrap();
    // directive class wins over the configured prefix
    assert!(pill.contains("return \"com.acme.Pill\""));
    assert!(pill.contains("package demo"));
    let red = pill.find("PillRed").unwrap();
    let green = pill.find("PillGreen").unwrap();
    let blue = pill.find("PillBlue").unwrap();
    assert!(red < green && green < blue, "member order not preserved");

    let coin = fs::read_to_string(temp.path().join("coin_enum.go")).unwrap();
    // no directive: prefix + type name
    assert!(coin.contains("return \"com.demo.Coin\""));
    assert!(coin.contains("Coin(10)"));
}

#[test]
fn test_rerun_skips_unchanged_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("pill.go"), PILL_GO).unwrap();
    let config_path = write_config(temp.path(), "");

    let output = run_enumer(&["-c", config_path.to_str().unwrap()]);
    assert!(output.status.success());

    let output = run_enumer(&["-c", config_path.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("No changes"),
        "expected unchanged rerun, got: {stdout}"
    );
}

#[test]
fn test_naming_violation_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("pill.go"),
        r#"package demo

//go:hessian class=com.acme.Pill
type Pill hessian.JavaEnum

const (
	PillRed Pill = 0
	Other1  Pill = 1
)
"#,
    )
    .unwrap();
    let config_path = write_config(temp.path(), "");

    let output = run_enumer(&["-c", config_path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Other1"), "stderr: {stderr}");
    assert!(!temp.path().join("pill_enum.go").exists());
}

#[test]
fn test_failure_produces_no_partial_output() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a_pill.go"), PILL_GO).unwrap();
    // no directive and no prefix: configuration failure in a later unit
    fs::write(
        temp.path().join("b_coin.go"),
        "package demo\n\ntype Coin hessian.JavaEnum\n\nconst CoinPenny Coin = 1\n",
    )
    .unwrap();
    let config_path = write_config(temp.path(), "");

    let output = run_enumer(&["-c", config_path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Coin"), "stderr: {stderr}");
    // the valid unit must not have been generated either
    assert!(!temp.path().join("pill_enum.go").exists());
}

#[test]
fn test_types_filter() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("pill.go"), PILL_GO).unwrap();
    fs::write(temp.path().join("coin.go"), COIN_GO).unwrap();
    let config_path = write_config(temp.path(), "com.demo");

    let output = run_enumer(&["-c", config_path.to_str().unwrap(), "--types", "Pill"]);
    assert!(output.status.success());
    assert!(temp.path().join("pill_enum.go").exists());
    assert!(!temp.path().join("coin_enum.go").exists());

    let output = run_enumer(&["-c", config_path.to_str().unwrap(), "--types", "Missing"]);
    assert!(!output.status.success());
}

#[test]
fn test_positional_directory_without_config() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("pill.go"), PILL_GO).unwrap();

    // default config path does not exist; directive carries the class
    let output = run_enumer(&[src.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(src.join("pill_enum.go").exists());
}

#[test]
fn test_unit_without_markers_is_a_noop() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("plain.go"),
        "package demo\n\nconst MaxRetries int = 5\n",
    )
    .unwrap();
    let config_path = write_config(temp.path(), "");

    let output = run_enumer(&["-c", config_path.to_str().unwrap()]);
    assert!(output.status.success());
    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with("_enum.go"))
        .collect();
    assert!(entries.is_empty());
}
