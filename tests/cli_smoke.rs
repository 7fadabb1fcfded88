use std::path::{Path, PathBuf};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_molmovie")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "molmovie.exe"
            } else {
                "molmovie"
            });
            p
        })
}

fn write_frames(dir: &Path, count: usize) {
    std::fs::create_dir_all(dir).unwrap();
    for i in 1..=count {
        std::fs::write(dir.join(format!("frame_{i}.pdb")), "END\n").unwrap();
    }
}

#[test]
fn cli_build_writes_script() {
    let dir = PathBuf::from("target").join("cli_smoke_build");
    let _ = std::fs::remove_dir_all(&dir);
    write_frames(&dir.join("traj"), 4);

    let config_path = dir.join("movie.json");
    let script_path = dir.join("out").join("movie.pml");
    std::fs::write(
        &config_path,
        r#"{
            "setup": [ { "name": "prot", "directory": "traj", "frame_count": 2 } ],
            "scenes": [
                { "scene": 1, "frame": 1, "objects": [ { "name": "prot", "state": 1,
                  "actions": [ { "color": { "selection": "chain A", "color": "red" } } ] } ] },
                { "scene": 2, "frame": 11, "objects": [ { "name": "prot", "state": 4 } ],
                  "camera": [ { "spin": { "axis": "y" } } ] }
            ],
            "produce": { "filename": "movie", "frame_count": 20, "quality": 150 }
        }"#,
    )
    .unwrap();

    let output = std::process::Command::new(exe())
        .arg("build")
        .arg("--config")
        .arg(&config_path)
        .arg("--script")
        .arg(&script_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("The choice \"spin\" is not recognized."));

    let script = std::fs::read_to_string(&script_path).unwrap();
    assert!(script.starts_with("load "));
    assert!(script.contains("color red, prot and chain A"));
    assert!(script.contains("mset 1x20"));
    assert!(script.trim_end().ends_with("save \"movie.pse\""));
}

#[test]
fn cli_check_fails_without_frame_count() {
    let dir = PathBuf::from("target").join("cli_smoke_check");
    std::fs::create_dir_all(&dir).unwrap();
    let config_path = dir.join("movie.json");
    std::fs::write(&config_path, r#"{ "produce": { "filename": "x" } }"#).unwrap();

    let output = std::process::Command::new(exe())
        .args(["check", "--json", "--config"])
        .arg(&config_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frame_count is required"));
}

#[test]
fn cli_reports_malformed_config_as_configuration_error() {
    let dir = PathBuf::from("target").join("cli_smoke_malformed");
    std::fs::create_dir_all(&dir).unwrap();
    let config_path = dir.join("movie.json");
    std::fs::write(&config_path, r#"{ "scenes": [ { "scene": 1 "#).unwrap();

    let output = std::process::Command::new(exe())
        .args(["check", "--config"])
        .arg(&config_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("configuration error: invalid config JSON"));
}
