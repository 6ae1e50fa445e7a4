//! Debate configuration from TOML (`[debate]` section)

use super::ConfigIssue;
use council_application::DebatePolicy;
use council_domain::DurationPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw debate configuration.
///
/// ```toml
/// [debate]
/// enabled = true
/// duration_secs = 300     # 0 = unlimited
/// turn_delay_ms = 400
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub enabled: bool,
    pub duration_secs: u64,
    pub first_turn_delay_ms: u64,
    pub turn_delay_ms: u64,
    pub pause_poll_ms: u64,
    pub rearm_delay_ms: u64,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let policy = DebatePolicy::default();
        Self {
            enabled: true,
            duration_secs: DurationPolicy::default().seconds().unwrap_or(0),
            first_turn_delay_ms: policy.first_turn_delay.as_millis() as u64,
            turn_delay_ms: policy.turn_delay.as_millis() as u64,
            pause_poll_ms: policy.pause_poll.as_millis() as u64,
            rearm_delay_ms: policy.rearm_delay.as_millis() as u64,
        }
    }
}

impl FileDebateConfig {
    pub fn duration(&self) -> DurationPolicy {
        DurationPolicy::from_secs(self.duration_secs)
    }

    /// Timer cadence; the prompt budget is set separately.
    pub fn to_policy(&self) -> DebatePolicy {
        DebatePolicy {
            first_turn_delay: Duration::from_millis(self.first_turn_delay_ms),
            turn_delay: Duration::from_millis(self.turn_delay_ms),
            pause_poll: Duration::from_millis(self.pause_poll_ms.max(1)),
            rearm_delay: Duration::from_millis(self.rearm_delay_ms),
            ..DebatePolicy::default()
        }
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.enabled
            && self.duration_secs > 0
            && !DebatePolicy::DURATION_PRESETS_SECS.contains(&self.duration_secs)
        {
            issues.push(ConfigIssue::info(
                "debate.duration_secs",
                format!(
                    "non-standard debate length of {}s (presets: 60, 300, 600, 0 for unlimited)",
                    self.duration_secs
                ),
            ));
        }
        if self.pause_poll_ms == 0 {
            issues.push(ConfigIssue::warning(
                "debate.pause_poll_ms",
                "pause_poll_ms must be positive, using 1",
            ));
        }
    }
}
