use std::fs;
use std::process::Command;

use tempfile::tempdir;

const NEW_CSV: &str = "benchmark,solver,result,wallclock time\na,z3,sat,0.1\nb,z3,sat,0.1\nc,z3,unsat,0.1\n";

fn selection() -> Command {
    Command::new(env!("CARGO_BIN_EXE_selection"))
}

#[test]
fn cli_writes_selection() {
    let dir = tempdir().unwrap();
    let new_csv = dir.path().join("new.csv");
    let old_csv = dir.path().join("old.csv");
    let out = dir.path().join("out.txt");
    fs::write(&new_csv, NEW_CSV).unwrap();
    fs::write(&old_csv, "").unwrap();

    let status = selection()
        .arg("--new_csv")
        .arg(&new_csv)
        .arg("--old_csv")
        .arg(&old_csv)
        .args(["--seed", "1", "--filter", "on"])
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(fs::read_to_string(&out).unwrap(), "a\nb\nc\n");
}

#[test]
fn cli_missing_seed_exits_with_config_code() {
    let dir = tempdir().unwrap();
    let new_csv = dir.path().join("new.csv");
    let out = dir.path().join("out.txt");
    fs::write(&new_csv, NEW_CSV).unwrap();

    let output = selection()
        .arg("--new-csv")
        .arg(&new_csv)
        .arg("--out")
        .arg(&out)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("seed"));
    assert!(!out.exists());
}

#[test]
fn cli_malformed_csv_exits_with_input_code() {
    let dir = tempdir().unwrap();
    let new_csv = dir.path().join("new.csv");
    let out = dir.path().join("out.txt");
    fs::write(&new_csv, "benchmark,solver,result,wallclock time\na,z3,sat,slow\n").unwrap();

    let output = selection()
        .arg("--new_csv")
        .arg(&new_csv)
        .args(["--seed", "3"])
        .arg("--out")
        .arg(&out)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
}
