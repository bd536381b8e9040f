//! Synchronous external tool invocation.

use std::process::Command;

use tracing::debug;

/// Run `program` with `args`, wait for it, and return trimmed stdout.
///
/// A non-zero exit is an error carrying the tool's stderr.
pub(crate) fn run_tool(program: &str, args: &[&str]) -> Result<String, String> {
    debug!(
        event = "core.command.run_started",
        program = program,
        arg_count = args.len()
    );

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let hint = if stderr.contains("not allowed") || stderr.contains("permission") {
            " (check System Settings > Privacy & Security)"
        } else {
            ""
        };
        return Err(format!(
            "{} exited with {}: {}{}",
            program, output.status, stderr, hint
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
