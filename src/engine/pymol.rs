use std::{
    path::Path,
    process::{Command, Stdio},
};

use crate::foundation::error::{MovieError, MovieResult};

pub const PYMOL_BIN: &str = "pymol";

pub fn is_pymol_on_path() -> bool {
    is_on_path(PYMOL_BIN)
}

fn is_on_path(bin: &str) -> bool {
    Command::new(bin)
        .arg("-cq")
        .arg("-d")
        .arg("quit")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run a rendered command script headless (`pymol -cq <script>`).
///
/// We shell out to the system `pymol` binary rather than embedding it; the script is the
/// whole interface.
pub fn run_pymol(script: &Path) -> MovieResult<()> {
    run_script_with(PYMOL_BIN, script)
}

fn run_script_with(bin: &str, script: &Path) -> MovieResult<()> {
    if !script.is_file() {
        return Err(MovieError::production(format!(
            "script '{}' does not exist",
            script.display()
        )));
    }
    if !is_on_path(bin) {
        return Err(MovieError::production(format!(
            "{bin} is required to run '{}', but was not found on PATH",
            script.display()
        )));
    }

    tracing::info!(script = %script.display(), "running {bin}");
    let output = Command::new(bin)
        .arg("-cq")
        .arg(script)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| MovieError::production(format!("failed to spawn {bin}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MovieError::production(format!(
            "{bin} exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_is_a_production_failure() {
        let err = run_pymol(Path::new("definitely/not/here.pml")).unwrap_err();
        assert!(matches!(err, MovieError::ProductionFailed(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn missing_binary_is_a_production_failure() {
        let script = std::env::temp_dir().join(format!("molmovie_nobin_{}.pml", std::process::id()));
        std::fs::write(&script, "quit\n").unwrap();

        let err = run_script_with("molmovie-no-such-binary", &script).unwrap_err();
        assert!(err.to_string().contains("not found on PATH"));

        std::fs::remove_file(&script).ok();
    }
}
