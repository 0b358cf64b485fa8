use crate::scoring::{
    RedirectTable, TierBounds, TierProfile, DEFAULT_SCORE_FIELD_ID, DEFAULT_SCORE_FIELD_NAME,
};

pub const DEFAULT_GHL_BASE_URL: &str = "https://rest.gohighlevel.com";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://wefindthebest.homes";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// CRM bearer token. The server starts without it, but every contact
    /// endpoint then answers with a configuration error.
    pub ghl_api_key: Option<String>,
    pub ghl_base_url: String,
    pub score_field_id: String,
    pub score_field_name: String,
    /// Bounds for the redirect-summary endpoint.
    pub standard_profile: TierProfile,
    /// Bounds for the full-detail endpoint.
    pub diagnostic_profile: TierProfile,
    pub redirects: RedirectTable,
    pub allowed_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            ghl_api_key: None,
            ghl_base_url: DEFAULT_GHL_BASE_URL.to_string(),
            score_field_id: DEFAULT_SCORE_FIELD_ID.to_string(),
            score_field_name: DEFAULT_SCORE_FIELD_NAME.to_string(),
            standard_profile: TierProfile::standard(),
            diagnostic_profile: TierProfile::diagnostic(),
            redirects: RedirectTable::default(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Missing keys fall back to the defaults; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            None => defaults.port,
        };

        let ghl_base_url = match var("GHL_BASE_URL") {
            Some(url) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("GHL_BASE_URL must start with http:// or https://");
                }
                url.trim_end_matches('/').to_string()
            }
            None => defaults.ghl_base_url,
        };

        let standard_profile = profile_from(
            &var,
            "standard",
            "STANDARD_LOW_BOUND",
            "STANDARD_HIGH_BOUND",
            defaults.standard_profile.bounds,
        )?;
        let diagnostic_profile = profile_from(
            &var,
            "diagnostic",
            "DIAGNOSTIC_LOW_BOUND",
            "DIAGNOSTIC_HIGH_BOUND",
            defaults.diagnostic_profile.bounds,
        )?;

        let redirects = RedirectTable {
            qualified: var("REDIRECT_URL_QUALIFIED").unwrap_or(defaults.redirects.qualified),
            lender: var("REDIRECT_URL_LENDER").unwrap_or(defaults.redirects.lender),
            nurture: var("REDIRECT_URL_NURTURE").unwrap_or(defaults.redirects.nurture),
        };

        let config = Self {
            port,
            ghl_api_key: var("GHL_API_KEY"),
            ghl_base_url,
            score_field_id: var("QUALITY_SCORE_FIELD_ID").unwrap_or(defaults.score_field_id),
            score_field_name: var("QUALITY_SCORE_FIELD_NAME")
                .unwrap_or(defaults.score_field_name),
            standard_profile,
            diagnostic_profile,
            redirects,
            allowed_origin: var("CORS_ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
        };

        // Log successful configuration load (without sensitive values)
        tracing::debug!("GHL Base URL: {}", config.ghl_base_url);
        tracing::debug!("Quality score field: {} ({})", config.score_field_id, config.score_field_name);
        tracing::debug!("Allowed origin: {}", config.allowed_origin);
        tracing::debug!("Server Port: {}", config.port);
        if config.ghl_api_key.is_none() {
            tracing::warn!("GHL_API_KEY is not set; contact endpoints will return 500");
        }
        if config.standard_profile.bounds != config.diagnostic_profile.bounds {
            tracing::warn!(
                "Tier profiles disagree: standard {}/{} vs diagnostic {}/{}",
                config.standard_profile.bounds.low(),
                config.standard_profile.bounds.high(),
                config.diagnostic_profile.bounds.low(),
                config.diagnostic_profile.bounds.high()
            );
        }

        Ok(config)
    }
}

fn profile_from<F>(
    var: &F,
    name: &str,
    low_key: &str,
    high_key: &str,
    default: TierBounds,
) -> anyhow::Result<TierProfile>
where
    F: Fn(&str) -> Option<String>,
{
    let bound = |key: &str, fallback: i64| -> anyhow::Result<i64> {
        match var(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("{} must be an integer, got '{}'", key, raw)),
            None => Ok(fallback),
        }
    };

    let low = bound(low_key, default.low())?;
    let high = bound(high_key, default.high())?;
    let bounds = TierBounds::new(low, high)
        .map_err(|e| anyhow::anyhow!("Invalid {} tier profile: {}", name, e))?;

    Ok(TierProfile::new(name, bounds))
}
