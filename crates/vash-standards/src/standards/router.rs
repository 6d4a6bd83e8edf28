use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::authority::{AuthorityDefinition, AuthoritySummary};
use super::calculator::{effective_standard, standard_for};
use super::domain::{BedroomSize, Diagnostic, Listing, Location, TierId, VoucherContext};
use super::error::StandardsError;
use super::qualifier::{qualify, QualificationReport, QualificationSummary};
use super::registry::AuthorityRegistry;
use super::resolver::{resolve_tier, towns};
use super::search::{plan_search, SearchPlan};
use crate::error::AppError;

/// Router exposing authority lookups, payment standards and listing qualification.
pub fn standards_router(registry: Arc<AuthorityRegistry>) -> Router {
    Router::new()
        .route("/api/v1/authorities", get(authorities_handler))
        .route("/api/v1/authorities/:county/towns", get(towns_handler))
        .route(
            "/api/v1/authorities/:county/standards",
            post(standards_handler),
        )
        .route("/api/v1/authorities/:county/qualify", post(qualify_handler))
        .with_state(registry)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StandardsRequest {
    pub voucher_bedrooms: BedroomSize,
    pub locations: Vec<String>,
    #[serde(default)]
    pub unit_bedrooms: Option<BedroomSize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationStandard {
    pub location: String,
    pub tier: TierId,
    pub bedrooms: BedroomSize,
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandardsResponse {
    pub authority: String,
    pub effective_date: NaiveDate,
    pub standards: Vec<LocationStandard>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QualifyRequest {
    pub voucher: VoucherContext,
    pub listings: Vec<Listing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualifyResponse {
    pub authority: String,
    pub effective_date: NaiveDate,
    pub plan: SearchPlan,
    pub summary: QualificationSummary,
    #[serde(flatten)]
    pub report: QualificationReport,
}

pub(crate) async fn authorities_handler(
    State(registry): State<Arc<AuthorityRegistry>>,
) -> axum::Json<Vec<AuthoritySummary>> {
    axum::Json(registry.authorities().map(AuthorityDefinition::summary).collect())
}

pub(crate) async fn towns_handler(
    State(registry): State<Arc<AuthorityRegistry>>,
    Path(county): Path<String>,
) -> Response {
    match registry.get_authority(&county) {
        Ok(authority) => {
            let payload = json!({
                "authority": authority.key,
                "towns": towns(authority),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn standards_handler(
    State(registry): State<Arc<AuthorityRegistry>>,
    Path(county): Path<String>,
    axum::Json(request): axum::Json<StandardsRequest>,
) -> Response {
    let authority = match registry.get_authority(&county) {
        Ok(authority) => authority,
        Err(err) => return error_response(err),
    };

    if request.locations.iter().all(|location| location.trim().is_empty()) {
        return error_response(StandardsError::InvalidRequest(
            "select at least one town or ZIP code".to_string(),
        ));
    }

    match location_standards(authority, &request) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn qualify_handler(
    State(registry): State<Arc<AuthorityRegistry>>,
    Path(county): Path<String>,
    axum::Json(request): axum::Json<QualifyRequest>,
) -> Response {
    let authority = match registry.get_authority(&county) {
        Ok(authority) => authority,
        Err(err) => return error_response(err),
    };

    let plan = match plan_search(authority, &request.voucher) {
        Ok(plan) => plan,
        Err(err) => return error_response(err),
    };
    let report = qualify(authority, &request.listings, &request.voucher, &plan.resolutions);

    let response = QualifyResponse {
        authority: authority.key.clone(),
        effective_date: authority.effective_date,
        summary: report.summary(),
        plan,
        report,
    };
    (StatusCode::OK, axum::Json(response)).into_response()
}

fn location_standards(
    authority: &AuthorityDefinition,
    request: &StandardsRequest,
) -> Result<StandardsResponse, StandardsError> {
    let mut standards = Vec::new();
    let mut diagnostics = Vec::new();

    for raw in request.locations.iter().filter(|raw| !raw.trim().is_empty()) {
        let location = Location::parse(raw).as_str().to_string();
        let tier = match resolve_tier(authority, raw) {
            Ok(tier) => tier,
            Err(err) => {
                if let Some(reason) = err.skip_reason() {
                    diagnostics.push(Diagnostic {
                        listing_index: None,
                        listing_id: None,
                        location,
                        reason,
                        detail: err.to_string(),
                    });
                    continue;
                }
                return Err(err);
            }
        };

        let (bedrooms, amount) = match request.unit_bedrooms {
            Some(unit) => {
                let standard =
                    effective_standard(authority, &tier, request.voucher_bedrooms, Some(unit))?;
                (standard.bedrooms, standard.amount)
            }
            None => (
                request.voucher_bedrooms,
                standard_for(authority, &tier, request.voucher_bedrooms)?,
            ),
        };

        standards.push(LocationStandard {
            location,
            tier,
            bedrooms,
            amount,
        });
    }

    Ok(StandardsResponse {
        authority: authority.key.clone(),
        effective_date: authority.effective_date,
        standards,
        diagnostics,
    })
}

fn error_response(err: StandardsError) -> Response {
    AppError::from(err).into_response()
}
