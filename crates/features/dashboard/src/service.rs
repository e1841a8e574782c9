use crate::error::{DashboardError, DashboardErrorExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_auth::ApiClient;
use tracing::debug;

const SUMMARY: &str = "/dashboard/summary";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

/// Headline numbers and recent activity of the current tenant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub metrics: BTreeMap<String, f64>,
    pub recent_activity: Vec<Activity>,
}

impl DashboardSummary {
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, DashboardError> {
        let envelope = self.client.get::<DashboardSummary>(SUMMARY).await.context("Summary")?;
        debug!(metrics = envelope.data.metrics.len(), "Dashboard summary loaded");
        Ok(envelope.into_data())
    }
}
