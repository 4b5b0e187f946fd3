//! Thirteenth salary and overtime calculators. Nothing here is persisted.

use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use salary_core::calculations::{
    OvertimeInput, OvertimePay, ThirteenthSalary, overtime_pay, thirteenth_salary,
};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::ApiJson;

fn full_year() -> u32 {
    12
}

#[derive(Debug, Deserialize)]
pub struct ThirteenthRequest {
    pub monthly_salary: Decimal,
    #[serde(default = "full_year")]
    pub months_worked: u32,
}

async fn thirteenth(ApiJson(request): ApiJson<ThirteenthRequest>) -> ApiResult<Json<ThirteenthSalary>> {
    let result = thirteenth_salary(request.monthly_salary, request.months_worked)?;
    Ok(Json(result))
}

async fn overtime(ApiJson(input): ApiJson<OvertimeInput>) -> ApiResult<Json<OvertimePay>> {
    let result = overtime_pay(&input)?;
    Ok(Json(result))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/extras/thirteenth-salary", post(thirteenth))
        .route("/extras/overtime", post(overtime))
}
