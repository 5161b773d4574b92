// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard and analytics handlers (read-only projections).

use axum::Json;
use axum::extract::{Extension, Query, State};
use chrono::{Duration, Months, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use tiffinhub_core::{HubError, Identity, Role};
use tiffinhub_storage::models::{AdminDashboard, ProviderAnalytics, ProviderDashboard};
use tiffinhub_storage::queries::reports;

use crate::error::ApiResult;
use crate::handlers::require_own_provider;
use crate::state::AppState;

/// Cutoff timestamp for a provider analytics range. Unknown ranges fall
/// back to 30 days.
fn analytics_since(range: &str) -> String {
    let now = Utc::now();
    let since = match range {
        "7days" => now - Duration::days(7),
        "90days" => now - Duration::days(90),
        "1year" => now.checked_sub_months(Months::new(12)).unwrap_or(now),
        _ => now - Duration::days(30),
    };
    since.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Cutoff timestamp for an admin report range. Unknown ranges fall back to
/// six months.
pub(crate) fn report_since(range: &str) -> String {
    let now = Utc::now();
    let months = match range {
        "1month" => 1,
        "3months" => 3,
        "1year" => 12,
        _ => 6,
    };
    now.checked_sub_months(Months::new(months))
        .unwrap_or(now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DashboardResponse {
    Admin { analytics: AdminDashboard },
    Provider { analytics: ProviderDashboard },
}

/// GET /api/analytics/dashboard
///
/// Admins get the platform rollup, providers their own kitchen's;
/// consumers have no dashboard.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<DashboardResponse>> {
    match identity.role {
        Role::Admin => {
            let analytics = reports::admin_dashboard(&state.db).await?;
            Ok(Json(DashboardResponse::Admin { analytics }))
        }
        Role::Provider => {
            let provider = require_own_provider(&state, &identity).await?;
            let analytics = reports::provider_dashboard(&state.db, &provider.id).await?;
            Ok(Json(DashboardResponse::Provider { analytics }))
        }
        Role::Consumer => {
            Err(HubError::Forbidden("no dashboard for this role".to_string()).into())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProviderAnalyticsResponse {
    pub analytics: ProviderAnalytics,
}

/// GET /api/analytics/provider (provider only)
pub async fn provider_analytics(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<ProviderAnalyticsResponse>> {
    let provider = require_own_provider(&state, &identity).await?;
    let since = analytics_since(query.range.as_deref().unwrap_or("30days"));
    let analytics = reports::provider_analytics(&state.db, &provider.id, &since).await?;
    Ok(Json(ProviderAnalyticsResponse { analytics }))
}

pub(crate) use report_since as admin_report_since;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_ranges_order_correctly() {
        // Lexicographic comparison works on RFC 3339 UTC strings.
        let week = analytics_since("7days");
        let month = analytics_since("30days");
        let quarter = analytics_since("90days");
        let year = analytics_since("1year");
        assert!(year < quarter);
        assert!(quarter < month);
        assert!(month < week);
    }

    #[test]
    fn unknown_analytics_range_defaults_to_thirty_days() {
        let fallback = analytics_since("eternity");
        let month = analytics_since("30days");
        // Generated microseconds apart; the date prefix matches.
        assert_eq!(&fallback[..10], &month[..10]);
    }

    #[test]
    fn report_ranges_order_correctly() {
        let one = report_since("1month");
        let three = report_since("3months");
        let six = report_since("6months");
        let year = report_since("1year");
        assert!(year < six);
        assert!(six < three);
        assert!(three < one);
    }
}
