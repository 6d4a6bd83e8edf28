use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::error;
use vash_standards::config::AppConfig;
use vash_standards::error::AppError;
use vash_standards::standards::{AuthorityRegistry, BedroomSize};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Builds the registry once for the process; a table that fails validation
/// stops startup.
pub(crate) fn load_registry(config: &AppConfig) -> Result<AuthorityRegistry, AppError> {
    AuthorityRegistry::from_config(&config.standards).map_err(|err| {
        error!(error = %err, "payment standard tables rejected");
        AppError::from(err)
    })
}

/// Accepts `studio`, `0`, `2`, `2br` or `2 bedroom`.
pub(crate) fn parse_bedrooms(raw: &str) -> Result<BedroomSize, String> {
    let value = raw.trim().to_ascii_lowercase();
    if value == "studio" {
        return Ok(BedroomSize::STUDIO);
    }

    let digits = value
        .strip_suffix("bedroom")
        .or_else(|| value.strip_suffix("br"))
        .unwrap_or(&value)
        .trim();

    digits
        .parse::<u8>()
        .map(BedroomSize::new)
        .map_err(|_| format!("'{raw}' is not a bedroom count (try studio, 1, 2br)"))
}

/// Whole-dollar amount with thousands separators.
pub(crate) fn dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
