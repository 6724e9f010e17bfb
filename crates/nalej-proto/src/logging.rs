//! Unified logging service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OrganizationId, Rpc};

/// Search log entries.
pub const SEARCH: Rpc<SearchRequest, LogResponse> = Rpc::new("UnifiedLogging.Search");
/// Ask the platform to package matching entries for download.
pub const DOWNLOAD_REQUEST: Rpc<SearchRequest, DownloadLogResponse> =
    Rpc::new("UnifiedLogging.DownloadRequest");
/// List download requests.
pub const DOWNLOAD_LIST: Rpc<OrganizationId, DownloadLogList> =
    Rpc::new("UnifiedLogging.DownloadList");
/// Check the state of a download request.
pub const DOWNLOAD_CHECK: Rpc<DownloadRequestId, DownloadLogResponse> =
    Rpc::new("UnifiedLogging.DownloadCheck");

/// Log query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Restrict to an application instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_instance_id: Option<String>,
    /// Restrict to a service group instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_group_instance_id: Option<String>,
    /// Restrict to a service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Substring the message must contain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_query_filter: Option<String>,
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    /// Newest entries first.
    #[serde(default)]
    pub descending: bool,
}

/// One log line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Emission time.
    pub timestamp: DateTime<Utc>,
    /// Application instance identifier.
    #[serde(default)]
    pub app_instance_id: String,
    /// Application instance name.
    #[serde(default)]
    pub app_instance_name: String,
    /// Service group instance identifier.
    #[serde(default)]
    pub service_group_instance_id: String,
    /// Service name.
    #[serde(default)]
    pub service_name: String,
    /// Message.
    pub msg: String,
}

/// Result of a search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogResponse {
    /// Organization identifier.
    pub organization_id: String,
    /// Lower bound actually applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    /// Upper bound actually applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    /// Matching entries.
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

/// Identifies a download request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequestId {
    /// Organization identifier.
    pub organization_id: String,
    /// Request identifier.
    pub request_id: String,
}

/// State of a download request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLogResponse {
    /// Organization identifier.
    pub organization_id: String,
    /// Request identifier.
    pub request_id: String,
    /// `PENDING`, `GENERATING`, `READY`, `ERROR`, ...
    pub state: String,
    /// Extra information.
    #[serde(default)]
    pub info: String,
    /// Download location once ready.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Expiration of the download, seconds since epoch.
    #[serde(default)]
    pub expiration: i64,
}

/// Download requests of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadLogList {
    /// Requests.
    #[serde(default)]
    pub requests: Vec<DownloadLogResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_omits_unset_filters() {
        let request = SearchRequest {
            organization_id: "org".into(),
            ..SearchRequest::default()
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"organizationId":"org","descending":false}"#);
    }

    #[test]
    fn log_entry_parses_rfc3339_timestamps() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"timestamp": "2024-03-01T10:00:00Z", "msg": "started"}"#,
        )
        .unwrap();
        assert_eq!(entry.timestamp.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert!(entry.service_name.is_empty());
    }
}
