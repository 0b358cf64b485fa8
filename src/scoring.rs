//! Quality score extraction and tier classification.
//!
//! 1. Locate the quality score custom field by id (optionally by name)
//! 2. Read its value as a lenient base-10 integer (unreadable → 0)
//! 3. Classify the score into a tier using configurable bounds
//! 4. Map the tier to a redirect URL
//!
//! The inspection helpers at the bottom flag fields that look like a score
//! when the configured field id is unknown.
use crate::models::{CustomField, InspectedField};
use std::fmt;

/// Default id of the quality score custom field.
pub const DEFAULT_SCORE_FIELD_ID: &str = "0NBOPMGYmmBJDGqAACk6";
/// Default name of the quality score custom field.
pub const DEFAULT_SCORE_FIELD_NAME: &str = "00__quality_score";

/// Upper end of the score range used by the inspection heuristic.
pub const MAX_SCORE: i64 = 30;

const POTENTIAL_MATCH_MARKERS: [&str; 3] = ["quality", "score", "00__"];

/// Classification bucket driving the redirect decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Qualified,
    LenderLead,
    NeedsNurture,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Qualified => write!(f, "qualified"),
            Tier::LenderLead => write!(f, "lender_lead"),
            Tier::NeedsNurture => write!(f, "needs_nurture"),
        }
    }
}

/// Threshold pair: `score >= high` is qualified, `low <= score < high`
/// is a lender lead, anything below `low` needs nurturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierBounds {
    low: i64,
    high: i64,
}

impl TierBounds {
    /// Creates bounds, rejecting `low > high`.
    pub fn new(low: i64, high: i64) -> Result<Self, String> {
        if low > high {
            return Err(format!(
                "low bound {} must not exceed high bound {}",
                low, high
            ));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    pub fn classify(&self, score: i64) -> Tier {
        if score >= self.high {
            Tier::Qualified
        } else if score >= self.low {
            Tier::LenderLead
        } else {
            Tier::NeedsNurture
        }
    }
}

/// Named set of tier bounds.
///
/// The redirect entry point and the diagnostic entry point historically use
/// different lower bounds (11 vs 10) for the same rule. Both are kept as
/// separate profiles until product settles on one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierProfile {
    pub name: String,
    pub bounds: TierBounds,
}

impl TierProfile {
    pub fn new(name: impl Into<String>, bounds: TierBounds) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    /// Bounds used by the redirect-summary endpoint (11/21).
    pub fn standard() -> Self {
        Self::new("standard", TierBounds { low: 11, high: 21 })
    }

    /// Bounds used by the full-detail endpoint (10/21).
    pub fn diagnostic() -> Self {
        Self::new("diagnostic", TierBounds { low: 10, high: 21 })
    }
}

/// One-to-one mapping from tier to redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTable {
    pub qualified: String,
    pub lender: String,
    pub nurture: String,
}

impl RedirectTable {
    pub fn url_for(&self, tier: Tier) -> &str {
        match tier {
            Tier::Qualified => &self.qualified,
            Tier::LenderLead => &self.lender,
            Tier::NeedsNurture => &self.nurture,
        }
    }
}

impl Default for RedirectTable {
    fn default() -> Self {
        Self {
            qualified: "https://wefindthebest.homes/schedule".to_string(),
            lender: "https://wefindthebest.homes/lender".to_string(),
            nurture: "https://wefindthebest.homes/next-steps".to_string(),
        }
    }
}

/// How the score field was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMethod {
    ById,
    ByName,
}

/// Receives the classifier's diagnostic trace.
///
/// Purely advisory: implementations must not influence the decision.
pub trait ScoreObserver: Send + Sync {
    fn field_located(&self, field: &CustomField, method: LookupMethod);
    fn field_not_found(&self, field_id: &str, fields: &[CustomField]);
    fn score_resolved(&self, score: i64, tier: Tier, bounds: TierBounds);
}

/// Forwards the classifier trace to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScoreObserver for TracingObserver {
    fn field_located(&self, field: &CustomField, method: LookupMethod) {
        tracing::info!(
            "Found field ({:?}): {}, Name: {}, Value: {}",
            method,
            field.id,
            field.name,
            field.value
        );
    }

    fn field_not_found(&self, field_id: &str, fields: &[CustomField]) {
        let available: Vec<String> = fields
            .iter()
            .map(|f| format!("{}: {} = {}", f.id, f.name, f.value))
            .collect();
        tracing::warn!(
            "Quality score field {} not found. Available fields: {:?}",
            field_id,
            available
        );
    }

    fn score_resolved(&self, score: i64, tier: Tier, bounds: TierBounds) {
        tracing::info!(
            "Final quality score: {} -> {} (bounds {}/{})",
            score,
            tier,
            bounds.low,
            bounds.high
        );
    }
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScoreObserver for NoopObserver {
    fn field_located(&self, _field: &CustomField, _method: LookupMethod) {}
    fn field_not_found(&self, _field_id: &str, _fields: &[CustomField]) {}
    fn score_resolved(&self, _score: i64, _tier: Tier, _bounds: TierBounds) {}
}

/// Outcome of a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDecision {
    pub quality_score: i64,
    pub tier: Tier,
    /// `None` when no field matched and the score defaulted to 0.
    pub matched_by: Option<LookupMethod>,
}

/// Locates the quality score field and classifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreClassifier {
    field_id: String,
    fallback_name: Option<String>,
    bounds: TierBounds,
}

impl ScoreClassifier {
    pub fn new(field_id: impl Into<String>, bounds: TierBounds) -> Self {
        Self {
            field_id: field_id.into(),
            fallback_name: None,
            bounds,
        }
    }

    /// Also match on field name when no field carries the configured id.
    pub fn with_fallback_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_name = Some(name.into());
        self
    }

    pub fn bounds(&self) -> TierBounds {
        self.bounds
    }

    /// First field whose id matches, then (if configured) the first whose
    /// name matches exactly.
    pub fn locate<'a>(&self, fields: &'a [CustomField]) -> Option<(&'a CustomField, LookupMethod)> {
        if let Some(field) = fields.iter().find(|f| f.id == self.field_id) {
            return Some((field, LookupMethod::ById));
        }

        let name = self.fallback_name.as_deref()?;
        fields
            .iter()
            .find(|f| f.name == name)
            .map(|field| (field, LookupMethod::ByName))
    }

    pub fn classify(&self, fields: &[CustomField], observer: &dyn ScoreObserver) -> ScoreDecision {
        let (quality_score, matched_by) = match self.locate(fields) {
            Some((field, method)) => {
                observer.field_located(field, method);
                (parse_score(&field.value), Some(method))
            }
            None => {
                observer.field_not_found(&self.field_id, fields);
                (0, None)
            }
        };

        let tier = self.bounds.classify(quality_score);
        observer.score_resolved(quality_score, tier, self.bounds);

        ScoreDecision {
            quality_score,
            tier,
            matched_by,
        }
    }
}

/// Reads the leading integer of `value`: whitespace is skipped, an optional
/// sign is honoured, and parsing stops at the first non-digit. Returns
/// `None` when no digit is found. Out-of-range values saturate.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Score carried by a field value; unreadable values count as 0.
pub fn parse_score(value: &str) -> i64 {
    parse_leading_int(value).unwrap_or(0)
}

/// Heuristic used by the inspection endpoint: the name mentions
/// `quality`, `score` or `00__` (case-sensitive), or the value reads as an
/// integer in `[0, MAX_SCORE]`.
pub fn is_potential_match(field: &CustomField) -> bool {
    POTENTIAL_MATCH_MARKERS
        .iter()
        .any(|marker| field.name.contains(marker))
        || parse_leading_int(&field.value).is_some_and(|n| (0..=MAX_SCORE).contains(&n))
}

/// Annotates every field and moves potential matches to the front,
/// keeping the original order inside each group.
pub fn inspect_fields(fields: &[CustomField]) -> Vec<InspectedField> {
    let (mut matches, others): (Vec<_>, Vec<_>) = fields
        .iter()
        .map(|f| InspectedField {
            id: f.id.clone(),
            name: f.name.clone(),
            value: f.value.clone(),
            potential_match: is_potential_match(f),
        })
        .partition(|f| f.potential_match);

    matches.extend(others);
    matches
}
