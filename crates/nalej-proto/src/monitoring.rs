//! Monitoring service.

use serde::{Deserialize, Serialize};

use crate::Rpc;

/// Resource summary of the whole organization.
pub const SUMMARY: Rpc<SummaryRequest, PlatformSummary> = Rpc::new("Monitoring.Summary");
/// Resource summary of one cluster.
pub const CLUSTER_SUMMARY: Rpc<ClusterSummaryRequest, ClusterSummary> =
    Rpc::new("Monitoring.ClusterSummary");

/// Organization wide summary query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Averaging window in minutes; 0 means the latest sample.
    pub range_minutes: i32,
}

/// Cluster summary query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummaryRequest {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster identifier.
    pub cluster_id: String,
    /// Averaging window in minutes; 0 means the latest sample.
    pub range_minutes: i32,
}

/// Total and available amount of one resource.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageSummary {
    /// Capacity.
    pub total: i64,
    /// Unallocated amount.
    pub available: i64,
}

impl UsageSummary {
    /// Allocated percentage, or `None` for an empty capacity.
    #[must_use]
    pub fn used_percent(&self) -> Option<f64> {
        if self.total <= 0 {
            return None;
        }
        Some((self.total - self.available) as f64 * 100.0 / self.total as f64)
    }
}

/// Resource usage of an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    /// Organization identifier.
    pub organization_id: String,
    /// Number of clusters reporting.
    pub total_clusters: i64,
    /// CPU in millicores.
    pub cpu_millicores: UsageSummary,
    /// Memory in bytes.
    pub memory_bytes: UsageSummary,
    /// Storage in bytes.
    pub storage_bytes: UsageSummary,
}

/// Resource usage of a cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Organization identifier.
    pub organization_id: String,
    /// Cluster identifier.
    pub cluster_id: String,
    /// CPU in millicores.
    pub cpu_millicores: UsageSummary,
    /// Memory in bytes.
    pub memory_bytes: UsageSummary,
    /// Storage in bytes.
    pub storage_bytes: UsageSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_percent_of_half_allocated() {
        let usage = UsageSummary {
            total: 4000,
            available: 2000,
        };
        assert_eq!(usage.used_percent(), Some(50.0));
    }

    #[test]
    fn used_percent_of_empty_capacity() {
        assert_eq!(UsageSummary::default().used_percent(), None);
    }
}
