//! Side-by-side evaluation of up to five salary scenarios.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use salary_core::CalculationResult;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::routes::calculations::SalaryRequest;

pub const MAX_SCENARIOS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub request: SalaryRequest,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub scenarios: Vec<ScenarioRequest>,
}

#[derive(Debug, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    #[serde(flatten)]
    pub result: CalculationResult,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub scenarios: Vec<ScenarioResult>,
    /// Scenario with the highest net salary; the first one wins ties.
    pub best_index: usize,
    pub best_name: String,
}

/// Results are computed like `calculate-salary` but never stored.
async fn compare_scenarios(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CompareRequest>,
) -> ApiResult<Json<CompareResponse>> {
    let count = request.scenarios.len();
    if count == 0 || count > MAX_SCENARIOS {
        return Err(ApiError::Validation(format!(
            "between 1 and {MAX_SCENARIOS} scenarios are required, got {count}"
        )));
    }

    let mut scenarios = Vec::with_capacity(count);
    for (i, scenario) in request.scenarios.into_iter().enumerate() {
        let input = scenario.request.into_input()?;
        scenarios.push(ScenarioResult {
            name: scenario.name.unwrap_or_else(|| format!("Cenário {}", i + 1)),
            result: state.service.evaluate(&input),
        });
    }

    let mut best_index = 0;
    for (i, scenario) in scenarios.iter().enumerate().skip(1) {
        if scenario.result.net_salary > scenarios[best_index].result.net_salary {
            best_index = i;
        }
    }
    let best_name = scenarios[best_index].name.clone();

    Ok(Json(CompareResponse {
        scenarios,
        best_index,
        best_name,
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/compare-scenarios", post(compare_scenarios))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::test_support::{send, test_app};

    #[tokio::test]
    async fn test_compare_picks_highest_net() {
        let (status, body) = send(
            test_app().await,
            "POST",
            "/api/compare-scenarios",
            Some(json!({ "scenarios": [
                { "name": "Actual", "salary": 50000, "calculation_type": "gross_to_net",
                  "medical_aid": 1500, "loans": 5000, "other_discounts": 2000 },
                { "salary": 60000, "calculation_type": "gross_to_net" },
                { "name": "Proposta", "salary": 45000, "calculation_type": "gross_to_net" }
            ]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let scenarios = body["scenarios"].as_array().unwrap();
        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0]["name"], "Actual");
        assert_eq!(scenarios[0]["net_salary"], json!(38225.0));
        assert_eq!(scenarios[1]["name"], "Cenário 2");
        assert_eq!(body["best_index"], 1);
        assert_eq!(body["best_name"], "Cenário 2");
    }

    #[tokio::test]
    async fn test_compare_does_not_touch_history() {
        let app = test_app().await;
        send(
            app.clone(),
            "POST",
            "/api/compare-scenarios",
            Some(json!({ "scenarios": [{ "salary": 30000, "calculation_type": "gross_to_net" }] })),
        )
        .await;

        let (_, history) = send(app, "GET", "/api/calculation-history", None).await;

        assert_eq!(history, json!([]));
    }

    #[tokio::test]
    async fn test_compare_rejects_empty_and_oversized_lists() {
        let app = test_app().await;
        let scenario = json!({ "salary": 30000, "calculation_type": "gross_to_net" });

        for scenarios in [json!([]), json!(vec![scenario; 6])] {
            let (status, body) = send(
                app.clone(),
                "POST",
                "/api/compare-scenarios",
                Some(json!({ "scenarios": scenarios })),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_compare_rejects_oversized_deductions() {
        let (status, body) = send(
            test_app().await,
            "POST",
            "/api/compare-scenarios",
            Some(json!({ "scenarios": [{ "salary": 30000, "calculation_type": "gross_to_net",
                                         "loans": 5e28, "medical_aid": 5e28 }] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_compare_without_scenarios_field_is_a_json_validation_error() {
        let (status, body) =
            send(test_app().await, "POST", "/api/compare-scenarios", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_compare_rejects_invalid_scenario_type() {
        let (status, body) = send(
            test_app().await,
            "POST",
            "/api/compare-scenarios",
            Some(json!({ "scenarios": [{ "salary": 30000, "calculation_type": "sideways" }] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_CALCULATION_TYPE");
    }
}
