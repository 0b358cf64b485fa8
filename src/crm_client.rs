use crate::errors::AppError;
use crate::models::{Contact, ContactEnvelope};
use url::Url;

/// Client for the CRM contact lookup API.
///
/// The bearer token is injected at construction; nothing here reads the
/// process environment.
#[derive(Clone)]
pub struct CrmClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl CrmClient {
    /// Creates a new `CrmClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the CRM API.
    /// * `api_key` - The API key sent as a bearer token.
    pub fn new(base_url: &str, api_key: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            AppError::Internal(format!("Failed to create CRM client: {}", e))
        })?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!(
                "CRM base URL cannot be a base: {}",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// `{base}/v1/contacts/{cid}?include=customField`, with `cid` encoded as
    /// a single path segment.
    pub fn contact_url(&self, cid: &str) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("CRM base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v1", "contacts", cid]);
        url.query_pairs_mut().append_pair("include", "customField");
        Ok(url)
    }

    /// Gets a contact with its custom fields.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(contact))` - The contact.
    /// * `Ok(None)` - The response had no `contact`.
    /// * `Err(AppError::UpstreamFailure)` - Network error, non-2xx status or
    ///   unreadable body.
    pub async fn get_contact(&self, cid: &str) -> Result<Option<Contact>, AppError> {
        let url = self.contact_url(cid)?;
        tracing::info!("Fetching contact {} from CRM", cid);
        tracing::debug!("CRM URL: {}", url);

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| AppError::UpstreamFailure(format!("CRM request failed: {}", e)))?;

        let status = response.status();
        tracing::debug!("CRM response status: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::UpstreamFailure(format!(
                "CRM returned {}: {}",
                status, error_text
            )));
        }

        let envelope: ContactEnvelope = response.json().await.map_err(|e| {
            AppError::UpstreamFailure(format!("Failed to parse CRM response: {}", e))
        })?;

        match &envelope.contact {
            Some(contact) => tracing::info!(
                "Found contact {} with {} custom fields",
                cid,
                contact.custom_fields.len()
            ),
            None => tracing::info!("No contact found in CRM response for {}", cid),
        }

        Ok(envelope.contact)
    }
}
