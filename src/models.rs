use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============ CRM Models ============

/// A CRM-defined key/value attribute attached to a contact.
///
/// `id` is the stable identity; `name` is a human label that may change.
/// `value` is kept as text even when it is logically numeric.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomField {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "text_value")]
    pub value: String,
}

impl CustomField {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Accepts a JSON string, number or boolean and keeps its text form.
/// `null` becomes the empty string.
fn text_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

/// A CRM contact record as returned by the contact lookup endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Custom fields in the order the CRM sent them.
    #[serde(default, rename = "customField", deserialize_with = "null_as_empty")]
    pub custom_fields: Vec<CustomField>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<CustomField>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CustomField>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Contact {
    /// First and last name joined by a single space, skipping missing parts.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Envelope of `GET /v1/contacts/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactEnvelope {
    #[serde(default)]
    pub contact: Option<Contact>,
}

// ============ API Models ============

/// Query string accepted by every contact endpoint.
#[derive(Debug, Clone, Default)]
pub struct ContactQueryParams {
    /// Contact identifier in the CRM.
    pub cid: Option<String>,
}

impl ContactQueryParams {
    /// Reads `cid` from a raw query string. Unknown keys are ignored and a
    /// repeated `cid` keeps its first occurrence, so this never fails.
    pub fn from_query(query: Option<&str>) -> Self {
        let cid = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "cid")
                .map(|(_, value)| value.into_owned())
        });
        Self { cid }
    }

    /// Returns the contact id if present and non-empty.
    pub fn contact_id(&self) -> Option<&str> {
        self.cid.as_deref().filter(|cid| !cid.is_empty())
    }
}

/// Generic `{success: true, data: ...}` wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Payload of the redirect-summary endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub quality_score: i64,
    pub redirect_url: String,
}

/// Payload of the full-detail endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetail {
    pub contact_name: String,
    pub quality_score: i64,
    pub redirect_url: String,
    pub all_fields: Vec<CustomField>,
}

/// A custom field annotated by the inspection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectedField {
    pub id: String,
    pub name: String,
    pub value: String,
    pub potential_match: bool,
}

/// Body of the inspection endpoint. Unlike the scoring endpoints, the
/// fields sit at the top level next to `success`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    pub custom_fields: Vec<InspectedField>,
}
