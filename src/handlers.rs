use crate::config::Config;
use crate::crm_client::CrmClient;
use crate::errors::AppError;
use crate::models::*;
use crate::scoring::{inspect_fields, ScoreClassifier, ScoreObserver, TracingObserver};
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub const MISSING_CID_MESSAGE: &str = "Missing contact id (cid) param";
pub const MISSING_API_KEY_MESSAGE: &str = "Missing GHL_API_KEY env variable";

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// CRM client. `None` when no API key is configured.
    pub crm_client: Option<CrmClient>,
    /// Receives the classifier's diagnostic trace.
    pub observer: Arc<dyn ScoreObserver>,
}

impl AppState {
    /// Builds the state from configuration, logging to `tracing`.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    pub fn with_observer(
        config: Config,
        observer: Arc<dyn ScoreObserver>,
    ) -> Result<Self, AppError> {
        let crm_client = match config.ghl_api_key.clone() {
            Some(key) => Some(CrmClient::new(&config.ghl_base_url, key)?),
            None => None,
        };

        Ok(Self {
            config,
            crm_client,
            observer,
        })
    }

    /// Classifier for the redirect-summary endpoint: standard bounds, id
    /// lookup with name fallback.
    pub fn redirect_classifier(&self) -> ScoreClassifier {
        ScoreClassifier::new(
            self.config.score_field_id.clone(),
            self.config.standard_profile.bounds,
        )
        .with_fallback_name(self.config.score_field_name.clone())
    }

    /// Classifier for the full-detail endpoint: diagnostic bounds, id lookup
    /// only.
    pub fn diagnostic_classifier(&self) -> ScoreClassifier {
        ScoreClassifier::new(
            self.config.score_field_id.clone(),
            self.config.diagnostic_profile.bounds,
        )
    }

    /// Validates the request and fetches the contact.
    ///
    /// Order matters: the `cid` check runs before anything touches the CRM
    /// or its configuration.
    async fn fetch_contact(&self, params: &ContactQueryParams) -> Result<Contact, AppError> {
        let cid = params
            .contact_id()
            .ok_or_else(|| AppError::MissingParameter(MISSING_CID_MESSAGE.to_string()))?;

        tracing::info!("Processing request for contact ID: {}", cid);

        let client = self
            .crm_client
            .as_ref()
            .ok_or_else(|| AppError::MissingConfiguration(MISSING_API_KEY_MESSAGE.to_string()))?;

        client
            .get_contact(cid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No contact found with id {}", cid)))
    }
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/getQualityScore
///
/// Looks up the contact's quality score and answers with the redirect URL
/// of its tier.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `query` - Raw query string carrying the contact id (`cid`).
///
/// # Returns
///
/// * `Result<Json<ApiResponse<ScoreSummary>>, AppError>` - Score and redirect URL, or an error.
pub async fn get_quality_score(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<ApiResponse<ScoreSummary>>, AppError> {
    let params = ContactQueryParams::from_query(query.as_deref());
    let contact = state.fetch_contact(&params).await?;

    let decision = state
        .redirect_classifier()
        .classify(&contact.custom_fields, state.observer.as_ref());
    let redirect_url = state.config.redirects.url_for(decision.tier).to_string();

    Ok(Json(ApiResponse::ok(ScoreSummary {
        quality_score: decision.quality_score,
        redirect_url,
    })))
}

/// GET /api/debug-function
///
/// Same decision as [`get_quality_score`] but with the diagnostic tier
/// profile, and echoes the contact name and every custom field.
pub async fn debug_quality_score(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<ApiResponse<ScoreDetail>>, AppError> {
    let params = ContactQueryParams::from_query(query.as_deref());
    let contact = state.fetch_contact(&params).await?;
    let contact_name = contact.display_name();
    tracing::info!(
        "Found contact: {} ({} custom fields)",
        contact_name,
        contact.custom_fields.len()
    );

    let decision = state
        .diagnostic_classifier()
        .classify(&contact.custom_fields, state.observer.as_ref());
    let redirect_url = state.config.redirects.url_for(decision.tier).to_string();
    tracing::info!("Final redirect URL: {}", redirect_url);

    Ok(Json(ApiResponse::ok(ScoreDetail {
        contact_name,
        quality_score: decision.quality_score,
        redirect_url,
        all_fields: contact.custom_fields,
    })))
}

/// GET /api/inspectCustomFields
///
/// Lists the contact's custom fields with fields that look like a quality
/// score first. Used to find the score field id when it changes in the CRM.
pub async fn inspect_custom_fields(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<InspectionResponse>, AppError> {
    let params = ContactQueryParams::from_query(query.as_deref());
    let contact = state.fetch_contact(&params).await?;
    let custom_fields = inspect_fields(&contact.custom_fields);

    tracing::debug!(
        "Inspected {} fields, {} potential matches",
        custom_fields.len(),
        custom_fields.iter().filter(|f| f.potential_match).count()
    );

    Ok(Json(InspectionResponse {
        success: true,
        contact_name: contact.name,
        contact_email: contact.email,
        custom_fields,
    }))
}
