//! Salary calculation and history endpoints.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use salary_core::{
    CalculationInput, CalculationResult, CalculationType, DEFAULT_HISTORY_LIMIT, Deductions,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};

/// Body of `POST /calculate-salary`. `calculation_type` stays a string so an
/// unknown value maps to our own 400 instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SalaryRequest {
    pub salary: Decimal,
    pub calculation_type: String,
    #[serde(default)]
    pub medical_aid: Decimal,
    #[serde(default)]
    pub loans: Decimal,
    #[serde(default)]
    pub other_discounts: Decimal,
    #[serde(default)]
    pub dependents: u32,
}

impl SalaryRequest {
    pub fn into_input(self) -> ApiResult<CalculationInput> {
        let calculation_type = CalculationType::parse(&self.calculation_type)
            .ok_or(ApiError::InvalidCalculationType(self.calculation_type))?;

        let input = CalculationInput {
            salary: self.salary,
            calculation_type,
            deductions: Deductions {
                medical_aid: self.medical_aid,
                loans: self.loans,
                other_discounts: self.other_discounts,
            },
            dependents: self.dependents,
        };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

async fn calculate_salary(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SalaryRequest>,
) -> ApiResult<Json<CalculationResult>> {
    let input = request.into_input()?;
    let result = state.service.calculate(&input).await?;
    Ok(Json(result))
}

async fn calculation_history(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<HistoryParams>,
) -> ApiResult<Json<Vec<CalculationResult>>> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let results = state.service.history(limit).await?;
    Ok(Json(results))
}

async fn get_calculation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CalculationResult>> {
    let id = Uuid::parse_str(&id).map_err(|_| {
        debug!(%id, "rejected malformed calculation id");
        ApiError::Validation(format!("'{id}' is not a valid calculation id"))
    })?;
    let result = state.service.find(id).await?;
    Ok(Json(result))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculate-salary", post(calculate_salary))
        .route("/calculation-history", get(calculation_history))
        .route("/calculation-history/{id}", get(get_calculation))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use crate::test_support::{send, test_app, test_state};
    use crate::create_router;

    fn reference_request() -> Value {
        json!({
            "salary": 50000,
            "calculation_type": "gross_to_net",
            "medical_aid": 1500,
            "loans": 5000,
            "other_discounts": 2000,
            "dependents": 0
        })
    }

    #[tokio::test]
    async fn test_gross_to_net_reference_case() {
        let (status, body) =
            send(test_app().await, "POST", "/api/calculate-salary", Some(reference_request()))
                .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["calculation_type"], "gross_to_net");
        assert_eq!(body["gross_salary"], json!(50000.0));
        assert_eq!(body["irps_tax"], json!(1775.0));
        assert_eq!(body["inss_employee"], json!(1500.0));
        assert_eq!(body["inss_employer"], json!(2000.0));
        assert_eq!(body["total_discounts"], json!(11775.0));
        assert_eq!(body["net_salary"], json!(38225.0));
        assert_eq!(body["monthly_breakdown"]["salario_liquido"], json!(38225.0));
        assert_eq!(body["annual_breakdown"]["salario_liquido"], json!(458700.0));
        assert!(body["id"].is_string());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_deductions_and_dependents_default_to_zero() {
        let (status, body) = send(
            test_app().await,
            "POST",
            "/api/calculate-salary",
            Some(json!({ "salary": 15000, "calculation_type": "gross_to_net" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["irps_tax"], json!(0.0));
        assert_eq!(body["total_discounts"], json!(450.0));
        assert_eq!(body["net_salary"], json!(14550.0));
        assert_eq!(body["dependents"], json!(0));
    }

    #[tokio::test]
    async fn test_net_to_gross_recovers_target() {
        let (status, body) = send(
            test_app().await,
            "POST",
            "/api/calculate-salary",
            Some(json!({ "salary": 38225, "calculation_type": "net_to_gross",
                         "medical_aid": 1500, "loans": 5000, "other_discounts": 2000 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["calculation_type"], "net_to_gross");
        let net = body["net_salary"].as_f64().unwrap();
        let gross = body["gross_salary"].as_f64().unwrap();
        assert!((net - 38225.0).abs() < 0.05, "net was {net}");
        assert!((gross - 50000.0).abs() < 0.05, "gross was {gross}");
    }

    #[tokio::test]
    async fn test_invalid_calculation_type_is_400() {
        let (status, body) = send(
            test_app().await,
            "POST",
            "/api/calculate-salary",
            Some(json!({ "salary": 30000, "calculation_type": "invalid_type" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_CALCULATION_TYPE");
        assert_eq!(body["detail"], "Tipo de cálculo inválido");
    }

    #[tokio::test]
    async fn test_negative_and_oversized_amounts_are_400() {
        let app = test_app().await;

        for request in [
            json!({ "salary": -1, "calculation_type": "gross_to_net" }),
            json!({ "salary": 30000, "calculation_type": "gross_to_net", "loans": -10 }),
            json!({ "salary": 1000000001, "calculation_type": "gross_to_net" }),
            json!({ "salary": 50000, "calculation_type": "gross_to_net",
                    "medical_aid": 5e28, "loans": 5e28 }),
            json!({ "salary": 50000, "calculation_type": "gross_to_net",
                    "other_discounts": 1000000000.5 }),
        ] {
            let (status, body) =
                send(app.clone(), "POST", "/api/calculate-salary", Some(request)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_missing_salary_is_a_json_validation_error() {
        let (status, body) = send(
            test_app().await,
            "POST",
            "/api/calculate-salary",
            Some(json!({ "calculation_type": "gross_to_net" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["detail"].as_str().unwrap().contains("salary"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_json_validation_error() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/calculate-salary")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from("{\"salary\": "))
            .unwrap();

        let response = tower::ServiceExt::oneshot(test_app().await, request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_numeric_history_limit_is_a_json_validation_error() {
        let (status, body) =
            send(test_app().await, "GET", "/api/calculation-history?limit=many", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_history_lists_newest_first_and_respects_limit() {
        let app = create_router(test_state().await);
        for salary in [20000, 30000, 40000] {
            let (status, _) = send(
                app.clone(),
                "POST",
                "/api/calculate-salary",
                Some(json!({ "salary": salary, "calculation_type": "gross_to_net" })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(app.clone(), "GET", "/api/calculation-history", None).await;
        assert_eq!(status, StatusCode::OK);
        let history = body.as_array().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0]["gross_salary"], json!(40000.0));
        assert_eq!(history[2]["gross_salary"], json!(20000.0));

        let (_, body) = send(app, "GET", "/api/calculation-history?limit=2", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_history_limit_zero_is_clamped_to_one() {
        let app = test_app().await;
        for _ in 0..2 {
            send(app.clone(), "POST", "/api/calculate-salary", Some(reference_request())).await;
        }

        let (status, body) = send(app, "GET", "/api/calculation-history?limit=0", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let (status, body) = send(test_app().await, "GET", "/api/calculation-history", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_fetch_stored_calculation_by_id() {
        let app = test_app().await;
        let (_, created) =
            send(app.clone(), "POST", "/api/calculate-salary", Some(reference_request())).await;
        let id = created["id"].as_str().unwrap();

        let (status, body) =
            send(app, "GET", &format!("/api/calculation-history/{id}"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);
        assert_eq!(body["net_salary"], created["net_salary"]);
        assert_eq!(body["annual_breakdown"], created["annual_breakdown"]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_404() {
        let (status, body) = send(
            test_app().await,
            "GET",
            "/api/calculation-history/7f1c6a1e-8f43-4a8e-9a57-0b0a4a7e2c11",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["detail"], "Cálculo não encontrado");
    }

    #[tokio::test]
    async fn test_malformed_id_is_400() {
        let (status, body) =
            send(test_app().await, "GET", "/api/calculation-history/not-a-uuid", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}
