//! Proxy data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheme recorded on working outcomes. Both HTTP and HTTPS test traffic go
/// through a plain `http://` proxy URL.
pub const PROBE_PROTOCOL: &str = "http";

/// A proxy endpoint under test, in `host:port` form.
///
/// Candidates are not validated; a malformed one fails inside the checker.
pub type Candidate = String;

/// Classification of a single probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeStatus {
    Working {
        /// Seconds from dispatch until the body was fully received
        response_time: f64,
        /// Address the test endpoint saw the request coming from
        #[serde(default, skip_serializing_if = "Option::is_none")]
        real_ip: Option<String>,
        protocol: String,
    },
    Failed {
        error: String,
    },
}

/// Result of probing one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub proxy: Candidate,
    #[serde(flatten)]
    pub status: ProbeStatus,
}

impl ProbeOutcome {
    pub fn working(proxy: Candidate, response_time: f64, real_ip: Option<String>) -> Self {
        Self {
            proxy,
            status: ProbeStatus::Working {
                response_time,
                real_ip,
                protocol: PROBE_PROTOCOL.to_string(),
            },
        }
    }

    pub fn failed(proxy: Candidate, error: String) -> Self {
        Self {
            proxy,
            status: ProbeStatus::Failed { error },
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self.status, ProbeStatus::Working { .. })
    }

    pub fn response_time(&self) -> Option<f64> {
        match &self.status {
            ProbeStatus::Working { response_time, .. } => Some(*response_time),
            ProbeStatus::Failed { .. } => None,
        }
    }

    pub fn real_ip(&self) -> Option<&str> {
        match &self.status {
            ProbeStatus::Working { real_ip, .. } => real_ip.as_deref(),
            ProbeStatus::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ProbeStatus::Working { .. } => None,
            ProbeStatus::Failed { error } => Some(error),
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ProbeStatus::Working {
                response_time,
                real_ip,
                ..
            } => write!(
                f,
                "✓ {} - {:.2}s - Real IP: {}",
                self.proxy,
                response_time,
                real_ip.as_deref().unwrap_or("N/A")
            ),
            ProbeStatus::Failed { error } => write!(f, "✗ {} - {}", self.proxy, error),
        }
    }
}
