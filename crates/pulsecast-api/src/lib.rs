//! JSON boundary for the pulsecast forecasting engine.
//!
//! The HTTP service owns routing and transport; it hands request bodies to the
//! functions here and maps [`ApiError::status`] onto its responses.

pub mod conversion;
pub mod error_handling;
pub mod types;

use error_handling::{api_try, parse_body, to_body};
use pulsecast_core::{AnomalySummary, ForecastResult, SeasonalTrendReport};
use tracing::debug;

pub use types::*;

// ============================================================================
// Typed handlers
// ============================================================================

/// Forecast the records of `request`.
pub fn handle_forecast(request: &ForecastRequest) -> Result<ForecastResult, ApiError> {
    api_try(|| {
        let history = conversion::to_observations(&request.data)?;
        debug!(
            records = history.len(),
            horizon_days = request.horizon_days,
            "forecast request"
        );
        pulsecast_core::forecast(&history, &request.options())
    })
}

/// Run the standalone anomaly analysis on the records of `request`.
pub fn handle_anomalies(request: &AnomalyRequest) -> Result<AnomalySummary, ApiError> {
    api_try(|| {
        let observations = conversion::to_observations(&request.data)?;
        debug!(
            records = observations.len(),
            threshold = request.threshold(),
            "anomaly request"
        );
        pulsecast_core::analyze_anomalies(&observations, request.threshold())
    })
}

/// Build a seasonal-trend report from a synthetic history.
pub fn handle_seasonal_trends(
    request: &SeasonalTrendsRequest,
) -> Result<SeasonalTrendReport, ApiError> {
    api_try(|| pulsecast_core::seasonal_trends_with_forecast(&request.options()))
}

// ============================================================================
// JSON entry points
// ============================================================================

/// `{data, horizonDays?}` in, `ForecastResult` JSON out.
pub fn forecast_json(body: &str) -> Result<String, ApiError> {
    let request: ForecastRequest = parse_body(body)?;
    to_body(&handle_forecast(&request)?)
}

/// `{data, threshold?}` in, `{anomalies, volatilityPercent, peakCount, troughCount,
/// highSeverityCount}` out.
pub fn detect_anomalies_json(body: &str) -> Result<String, ApiError> {
    let request: AnomalyRequest = parse_body(body)?;
    to_body(&handle_anomalies(&request)?)
}

/// `{days?, horizonDays?, endDate?, seed?}` in, seasonal-trend report JSON out.
pub fn seasonal_trends_json(body: &str) -> Result<String, ApiError> {
    let request: SeasonalTrendsRequest = parse_body(body)?;
    to_body(&handle_seasonal_trends(&request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn daily_records(values: &[f64]) -> Vec<Value> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| json!({"date": format!("2024-01-{:02}", i + 1), "value": v}))
            .collect()
    }

    #[test]
    fn test_forecast_json_round_trip() {
        let body = json!({
            "data": daily_records(&[100.0, 200.0, 300.0, 400.0, 500.0]),
            "horizonDays": 2
        })
        .to_string();

        let out: Value = serde_json::from_str(&forecast_json(&body).unwrap()).unwrap();
        assert_eq!(out["trendDirection"], "increasing");
        assert_eq!(out["series"].as_array().unwrap().len(), 7);
        assert_eq!(out["series"][5]["date"], "2024-01-06");
        assert_eq!(out["series"][5]["isForecast"], true);
        assert!(out["series"][5].get("actual").is_none());
        assert!(out["regression"]["rSquared"].as_f64().unwrap() > 0.999);
    }

    #[test]
    fn test_forecast_json_short_history_is_neutral() {
        let body = json!({"data": daily_records(&[42.0])}).to_string();
        let out: Value = serde_json::from_str(&forecast_json(&body).unwrap()).unwrap();
        assert_eq!(out["series"].as_array().unwrap().len(), 1);
        assert_eq!(out["overallConfidence"], 0.0);
        assert_eq!(out["trendDirection"], "stable");
    }

    #[test]
    fn test_forecast_json_invalid_value() {
        let body = json!({"data": [{"date": "2024-01-01", "value": "abc"}]}).to_string();
        let err = forecast_json(&body).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_forecast_json_wrong_shape() {
        let err = forecast_json(r#"{"data": 5}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = forecast_json(r#"{"data": [5]}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_forecast_json_bad_date() {
        let body = json!({"data": [{"date": "01.01.2024", "value": 1}]}).to_string();
        let err = forecast_json(&body).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDateFormat);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_forecast_json_rejects_oversized_horizon() {
        let data = daily_records(&[1.0, 2.0]);
        for horizon in [json!(10_000_000_000_000_u64), json!(u64::MAX)] {
            let body = json!({"data": data, "horizonDays": horizon}).to_string();
            let err = forecast_json(&body).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidParameter);
            assert_eq!(err.status(), 400);
        }
    }

    #[test]
    fn test_forecast_json_negative_horizon_is_invalid_input() {
        let body = json!({"data": daily_records(&[1.0, 2.0]), "horizonDays": -1}).to_string();
        let err = forecast_json(&body).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_large_values_never_serialize_as_null() {
        let values: Vec<f64> = (1..=5).map(|i| 1e200 * i as f64).collect();
        let body = json!({"data": daily_records(&values)}).to_string();

        let out = forecast_json(&body).unwrap();
        assert!(!out.contains("null"));
        let out: Value = serde_json::from_str(&out).unwrap();
        assert!(out["volatilityPercent"].as_f64().unwrap() > 0.0);

        let out = detect_anomalies_json(&body).unwrap();
        assert!(!out.contains("null"));
        let out: Value = serde_json::from_str(&out).unwrap();
        assert!(out["volatilityPercent"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_overflowing_values_are_client_errors() {
        let body = json!({
            "data": [
                {"date": "2024-01-01", "value": -f64::MAX},
                {"date": "2024-01-02", "value": 0.0},
                {"date": "2024-01-03", "value": f64::MAX}
            ]
        })
        .to_string();
        let err = forecast_json(&body).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_seasonal_trends_json_rejects_oversized_days() {
        let body = json!({"days": 1_000_000_000_u64, "seed": 1}).to_string();
        let err = seasonal_trends_json(&body).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_detect_anomalies_json() {
        let body = json!({
            "data": daily_records(&[10.0, 10.0, 10.0, 50.0, 10.0, 10.0, 10.0])
        })
        .to_string();

        let out: Value = serde_json::from_str(&detect_anomalies_json(&body).unwrap()).unwrap();
        assert_eq!(out["peakCount"], 1);
        assert_eq!(out["troughCount"], 0);
        assert_eq!(out["highSeverityCount"], 1);
        assert_eq!(out["anomalies"][0]["kind"], "peak");
        assert_eq!(out["anomalies"][0]["severity"], "high");
        assert_eq!(out["anomalies"][0]["date"], "2024-01-04");
    }

    #[test]
    fn test_detect_anomalies_json_custom_threshold() {
        let body = json!({
            "data": daily_records(&[10.0, 10.0, 10.0, 50.0, 10.0, 10.0, 10.0]),
            "threshold": 10.0
        })
        .to_string();
        let out: Value = serde_json::from_str(&detect_anomalies_json(&body).unwrap()).unwrap();
        assert_eq!(out["peakCount"], 0);
    }

    #[test]
    fn test_detect_anomalies_json_invalid_threshold() {
        let body = json!({"data": daily_records(&[1.0, 2.0, 3.0]), "threshold": -1.0}).to_string();
        let err = detect_anomalies_json(&body).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_seasonal_trends_json() {
        let body = json!({"days": 120, "horizonDays": 10, "endDate": "2024-12-31", "seed": 9})
            .to_string();
        let out: Value = serde_json::from_str(&seasonal_trends_json(&body).unwrap()).unwrap();

        assert_eq!(out["forecast"]["series"].as_array().unwrap().len(), 130);
        assert!(!out["recommendations"].as_array().unwrap().is_empty());
        assert!(out["pattern"]["monthly"].as_array().unwrap().len() >= 4);
    }
}
