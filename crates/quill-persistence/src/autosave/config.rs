//! Auto-save configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quiet period applied when none is configured.
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 800;

/// What happens to content whose save was rejected by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep treating the content as saved; only a new, different edit
    /// triggers another attempt.
    #[default]
    Forget,
    /// Roll the duplicate guard back and schedule the same content again
    /// after one quiet period, unless a newer edit is already waiting.
    Rearm,
}

/// Configuration for auto-save behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether auto-save is enabled.
    ///
    /// When disabled, changes are still tracked and can be written with
    /// an explicit flush.
    pub enabled: bool,

    /// Quiet period in milliseconds.
    ///
    /// After a change, the system waits this long before saving.
    /// Additional changes reset the timer.
    pub quiet_period_ms: u64,

    /// Maximum delay before forcing a save.
    ///
    /// If changes keep coming, save after this many milliseconds
    /// since the first unsaved change. `None` means a continuous burst
    /// is never interrupted.
    pub max_wait_ms: Option<u64>,

    /// Handling of rejected saves.
    pub on_failure: FailurePolicy,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quiet_period_ms: DEFAULT_QUIET_PERIOD_MS,
            max_wait_ms: None,
            on_failure: FailurePolicy::Forget,
        }
    }
}

impl AutoSaveConfig {
    /// Create a disabled auto-save config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Builder: set the quiet period.
    #[must_use]
    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period_ms = quiet_period.as_millis() as u64;
        self
    }

    /// Builder: set the maximum wait.
    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait_ms = Some(max_wait.as_millis() as u64);
        self
    }

    /// Builder: set the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    /// Delay before the timer armed by a change should fire.
    ///
    /// Normally the full quiet period. With a maximum wait configured the
    /// delay is shortened so the save lands no later than `max_wait_ms`
    /// after the first unsaved change.
    pub fn next_delay(&self, since_first_unsaved: Duration) -> Duration {
        let quiet = self.quiet_period();
        match self.max_wait_ms {
            Some(max_wait) => {
                let remaining = Duration::from_millis(max_wait).saturating_sub(since_first_unsaved);
                quiet.min(remaining)
            }
            None => quiet,
        }
    }
}
