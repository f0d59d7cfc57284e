use std::time::Duration;

use masgo_core::error::{MasgoError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    pub version: u32,

    #[serde(default)]
    pub agent: AgentSection,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: 1,
            agent: AgentSection::default(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MasgoError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.agent.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSection {
    #[serde(default = "default_server_address")]
    pub server_address: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            server_address: default_server_address(),
            poll_interval_ms: default_poll_interval_ms(),
            report_interval_ms: default_report_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl AgentSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.server_address.starts_with("http://")
            || self.server_address.starts_with("https://"))
        {
            return Err(MasgoError::Config(
                "agent.server_address must start with http:// or https://".into(),
            ));
        }
        if !(100..=3_600_000).contains(&self.poll_interval_ms) {
            return Err(MasgoError::Config(
                "agent.poll_interval_ms must be between 100 and 3600000".into(),
            ));
        }
        if !(100..=3_600_000).contains(&self.report_interval_ms) {
            return Err(MasgoError::Config(
                "agent.report_interval_ms must be between 100 and 3600000".into(),
            ));
        }
        if !(100..=60_000).contains(&self.request_timeout_ms) {
            return Err(MasgoError::Config(
                "agent.request_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_server_address() -> String {
    "http://localhost:8080".into()
}
fn default_poll_interval_ms() -> u64 {
    2000
}
fn default_report_interval_ms() -> u64 {
    10000
}
fn default_request_timeout_ms() -> u64 {
    5000
}
