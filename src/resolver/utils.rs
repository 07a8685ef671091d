// Helper functions for engine implementations

use std::ffi::OsString;
use std::io::ErrorKind;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use super::errors::EngineError;

/// Run an engine command and collect its output within `deadline`.
///
/// `envs` are set on the child on top of the inherited environment. The
/// child is spawned with `kill_on_drop`, so it dies both when the deadline
/// expires and when the caller's future is dropped (client disconnected).
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    envs: &[(&str, OsString)],
    deadline: Duration,
) -> Result<Output, EngineError> {
    let child = TokioCommand::new(program)
        .args(args)
        .envs(envs.iter().map(|(k, v)| (*k, v)))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => EngineError::Unavailable(format!("{} not found", program)),
            _ => EngineError::Process(format!("Failed to start {}: {}", program, e)),
        })?;

    match timeout(deadline, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(EngineError::Process(format!(
            "Failed to wait for {}: {}",
            program, e
        ))),
        Err(_) => {
            tracing::warn!("{} exceeded deadline of {:?}, killed", program, deadline);
            Err(EngineError::TimedOut(deadline))
        }
    }
}

/// Quick probe: does `program args...` start and exit successfully?
pub async fn probe_command(program: &str, args: &[&str], envs: &[(&str, OsString)]) -> bool {
    let status = TokioCommand::new(program)
        .args(args)
        .envs(envs.iter().map(|(k, v)| (*k, v)))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status();

    matches!(
        timeout(Duration::from_secs(10), status).await,
        Ok(Ok(s)) if s.success()
    )
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let err = run_output_with_timeout(
            "definitely-not-a-real-binary-4f2a",
            &[],
            &[],
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_deadline_kills_child() {
        let err = run_output_with_timeout("sleep", &["5".to_string()], &[], Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::TimedOut(_)));
    }

    #[tokio::test]
    async fn test_collects_output() {
        let out = run_output_with_timeout("echo", &["hello".to_string()], &[], Duration::from_secs(5))
            .await
            .unwrap();
        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "hello");
    }

    #[tokio::test]
    async fn test_envs_reach_child() {
        let out = run_output_with_timeout(
            "sh",
            &["-c".to_string(), "printf %s \"$RESOLVER_TEST_VAR\"".to_string()],
            &[("RESOLVER_TEST_VAR", OsString::from("set-by-caller"))],
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(String::from_utf8_lossy(&out.stdout), "set-by-caller");
    }

    #[tokio::test]
    async fn test_probe_command() {
        assert!(probe_command("true", &[], &[]).await);
        assert!(!probe_command("false", &[], &[]).await);
        assert!(!probe_command("definitely-not-a-real-binary-4f2a", &[], &[]).await);
    }
}
