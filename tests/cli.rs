use std::path::PathBuf;
use std::process::{Command, Output};

fn spool_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spool_cli"))
        .args(args)
        .output()
        .expect("spawn spool_cli")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("spool_cli_{}_{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn out_dir_holds_only_snapshots() {
    let dir = scratch_dir("out_dir");
    let dir_arg = dir.to_str().expect("utf-8 temp dir");

    let output = spool_cli(&["run", "straight_run", "--out-dir", dir_arg]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let mut written: Vec<String> = std::fs::read_dir(&dir)
        .expect("out dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, ["straight_run.snap"]);

    let snapshot = std::fs::read_to_string(dir.join("straight_run.snap")).expect("snapshot");
    assert!(snapshot.starts_with("# spool-mesh snapshot v1\n"));
    assert!(snapshot.contains("mesh.checksum "));

    // A second run refuses to clobber without --overwrite.
    let again = spool_cli(&["run", "straight_run", "--out-dir", dir_arg]);
    assert!(!again.status.success());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn snapshot_goes_to_stdout_by_default() {
    let output = spool_cli(&["run", "weld_ring"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# spool-mesh snapshot v1\n"));
    assert_eq!(stdout, String::from_utf8_lossy(&spool_cli(&["run", "weld_ring"]).stdout));
}

#[test]
fn mesh_export_flags_are_unknown() {
    for flag in [["--obj", "mesh.obj"].as_slice(), ["--no-obj"].as_slice()] {
        let mut args = vec!["run", "straight_run"];
        args.extend_from_slice(flag);
        let output = spool_cli(&args);
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains(&format!("unknown option `{}`", flag[0])), "{stderr}");
    }
}

#[test]
fn list_names_every_scenario() {
    let output = spool_cli(&["list"]);
    assert!(output.status.success());
    let names: Vec<String> = String::from_utf8_lossy(&output.stdout).lines().map(str::to_string).collect();
    assert_eq!(names.len(), 10);
    assert!(names.iter().any(|name| name == "flange_rotating"));
}
