use std::process::Command;

use anyhow::{Context, Result};

use crate::config::Profile;
use crate::launch::env::project_env;

/// Env var overriding the wrapped executable.
pub const COMMAND_ENV: &str = "CCSWITCH_CLAUDE_BIN";

/// Executable run when no override is set.
pub const DEFAULT_COMMAND: &str = "claude";

/// Ready-to-use command, args and env for [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnParams {
    pub command: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

/// The executable to wrap: `$CCSWITCH_CLAUDE_BIN` or `claude`.
pub fn resolve_command() -> String {
    std::env::var(COMMAND_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_COMMAND.to_string())
}

/// Build spawn parameters for `profile`.
///
/// `args` are passed through unchanged.
pub fn build_spawn_params(command: String, args: Vec<String>, profile: &Profile) -> SpawnParams {
    SpawnParams {
        command,
        args,
        env: project_env(profile),
    }
}

/// Spawn the wrapped executable with inherited stdio and wait for it.
///
/// The overlay is merged over the current environment. Returns the child's
/// exit code; a child killed by a signal maps to `128 + signal` on Unix.
pub fn run(params: &SpawnParams) -> Result<i32> {
    tracing::debug!(
        command = %params.command,
        args = params.args.len(),
        env = params.env.len(),
        "Spawning wrapped process"
    );

    let status = Command::new(&params.command)
        .args(&params.args)
        .envs(params.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .status()
        .with_context(|| format!("failed to start '{}'", params.command))?;

    if let Some(code) = status.code() {
        return Ok(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Ok(128 + signal);
        }
    }

    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_pass_through_untouched() {
        let args = vec!["--model".to_string(), "opus".to_string(), "-p".to_string()];
        let profile = Profile::default_profile();
        let params = build_spawn_params("claude".to_string(), args.clone(), &profile);
        assert_eq!(params.command, "claude");
        assert_eq!(params.args, args);
        assert_eq!(
            params.env,
            vec![("ANTHROPIC_AUTH_TOKEN".to_string(), String::new())]
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_child_exit_code() {
        let params = SpawnParams {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), "exit \"$CCSWITCH_TEST_CODE\"".to_string()],
            env: vec![("CCSWITCH_TEST_CODE".to_string(), "7".to_string())],
        };
        assert_eq!(run(&params).unwrap(), 7);
    }

    #[test]
    fn run_fails_for_missing_executable() {
        let params = SpawnParams {
            command: "ccswitch-definitely-not-installed".to_string(),
            args: vec![],
            env: vec![],
        };
        let err = run(&params).unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }
}
