//! Environment detection utilities.

use std::collections::HashMap;
use std::io::IsTerminal;

/// Read-only view of environment variables.
///
/// Production code reads the process environment through [`ProcessEnv`];
/// tests pass a `HashMap` so nothing touches global process state.
pub trait EnvSource {
    /// Raw value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;

    /// Value of `key` with surrounding whitespace trimmed, treating an empty
    /// value the same as an unset one.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Whether `key` is set to a truthy value (1, true, yes, on).
    fn is_truthy(&self, key: &str) -> bool {
        self.var(key).is_some_and(|v| {
            matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
        })
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| (*v).to_string())
    }
}

/// Check if stdin is a TTY.
#[must_use]
pub fn stdin_is_tty() -> bool {
    std::io::stdin().is_terminal()
}

/// Check if stderr is a TTY.
#[must_use]
pub fn stderr_is_tty() -> bool {
    std::io::stderr().is_terminal()
}

/// Check if color should be enabled for diagnostics on stderr.
#[must_use]
pub fn should_use_color(no_color_flag: bool, env: &dyn EnvSource) -> bool {
    if no_color_flag {
        return false;
    }

    // Check NO_COLOR environment variable
    if env.var("NO_COLOR").is_some() {
        return false;
    }

    // Check TERM=dumb
    if env.var("TERM").is_some_and(|t| t == "dumb") {
        return false;
    }

    if env.is_truthy("CLICOLOR_FORCE") {
        return true;
    }

    stderr_is_tty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_treats_blank_as_unset() {
        let env = HashMap::from([("A", "  "), ("B", " value ")]);
        assert_eq!(env.non_empty("A"), None);
        assert_eq!(env.non_empty("B"), Some("value".to_string()));
        assert_eq!(env.non_empty("C"), None);
    }

    #[test]
    fn truthy_values() {
        let env = HashMap::from([("ON", "Yes"), ("OFF", "0"), ("ONE", "1")]);
        assert!(env.is_truthy("ON"));
        assert!(env.is_truthy("ONE"));
        assert!(!env.is_truthy("OFF"));
        assert!(!env.is_truthy("MISSING"));
    }

    #[test]
    fn no_color_env_disables_color() {
        let env = HashMap::from([("NO_COLOR", "")]);
        assert!(!should_use_color(false, &env));
        assert!(!should_use_color(true, &HashMap::<&str, &str>::new()));
    }

    #[test]
    fn clicolor_force_overrides_tty_detection() {
        let env = HashMap::from([("CLICOLOR_FORCE", "1")]);
        assert!(should_use_color(false, &env));

        let env = HashMap::from([("CLICOLOR_FORCE", "1"), ("NO_COLOR", "1")]);
        assert!(!should_use_color(false, &env));
    }
}
