use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

/// Initialize the session debug log if enabled
pub fn init_debug_logging(cwd: &std::path::Path, debug: bool) -> Result<Option<PathBuf>> {
    if debug {
        let debug_path = cwd.join(".webspark.log");
        std::fs::write(
            &debug_path,
            format!(
                "=== Webspark Debug Log - {}\n\n",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ),
        )
        .ok();
        Ok(Some(debug_path))
    } else {
        Ok(None)
    }
}

/// Append a line to the debug log when one is open. Logging never
/// interferes with the session; write failures are dropped.
pub fn debug_log(debug_file: &Option<PathBuf>, message: &str) {
    if let Some(path) = debug_file {
        if let Ok(mut f) = std::fs::OpenOptions::new().append(true).open(path) {
            let _ = writeln!(f, "{}", message);
        }
    }
}
