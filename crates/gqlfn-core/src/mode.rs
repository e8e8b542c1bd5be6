//! Runtime mode detection.
//!
//! The process is driven either by a local HTTP listener or by a
//! function-invocation dispatcher. Which one is decided once, from the
//! environment, and never re-evaluated.

use std::fmt;
use std::sync::OnceLock;

use crate::error::StartupError;

/// Environment variable the function-invocation host sets for its runtime API.
pub const INVOCATION_SIGNAL: &str = "AWS_LAMBDA_RUNTIME_API";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeMode {
    LocalHttp,
    FunctionInvocation,
}

impl RuntimeMode {
    /// Detect the mode from the process environment.
    ///
    /// The environment is read on the first call only; every later call in
    /// the same process returns that first answer.
    pub fn detect() -> Result<RuntimeMode, StartupError> {
        static DETECTED: OnceLock<Result<RuntimeMode, StartupError>> = OnceLock::new();
        DETECTED
            .get_or_init(|| Self::from_env_with(|name| std::env::var(name).ok()))
            .clone()
    }

    /// Decide the mode from an arbitrary environment lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<RuntimeMode, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(INVOCATION_SIGNAL) {
            Some(value) if value.trim().is_empty() => {
                Err(StartupError::EmptySignal(INVOCATION_SIGNAL.to_string()))
            }
            Some(_) => Ok(RuntimeMode::FunctionInvocation),
            None => Ok(RuntimeMode::LocalHttp),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeMode::LocalHttp => "local-http",
            RuntimeMode::FunctionInvocation => "function-invocation",
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_signal_defaults_to_local() {
        let mode = RuntimeMode::from_env_with(|_| None).unwrap();
        assert_eq!(mode, RuntimeMode::LocalHttp);
    }

    #[test]
    fn signal_selects_invocation() {
        let mode = RuntimeMode::from_env_with(|name| {
            (name == INVOCATION_SIGNAL).then(|| "127.0.0.1:9001".to_string())
        })
        .unwrap();
        assert_eq!(mode, RuntimeMode::FunctionInvocation);
    }

    #[test]
    fn empty_signal_is_startup_failure() {
        let err = RuntimeMode::from_env_with(|_| Some("  ".to_string())).unwrap_err();
        assert_eq!(err, StartupError::EmptySignal(INVOCATION_SIGNAL.to_string()));
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let mode = RuntimeMode::from_env_with(|name| {
            (name == "AWS_REGION").then(|| "eu-west-1".to_string())
        })
        .unwrap();
        assert_eq!(mode, RuntimeMode::LocalHttp);
    }

    #[test]
    fn detect_is_idempotent() {
        let first = RuntimeMode::detect();
        for _ in 0..5 {
            assert_eq!(RuntimeMode::detect(), first);
        }
    }

    #[test]
    fn display() {
        assert_eq!(RuntimeMode::LocalHttp.to_string(), "local-http");
        assert_eq!(
            RuntimeMode::FunctionInvocation.to_string(),
            "function-invocation"
        );
    }
}
