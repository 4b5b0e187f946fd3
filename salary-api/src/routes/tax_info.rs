//! Read-only description of the active tax tables for display.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use salary_core::IrpsBracket;
use salary_core::tables::TAX_YEAR;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct BracketInfo {
    pub faixa: String,
    pub taxa: String,
    pub descricao: String,
}

#[derive(Debug, Serialize)]
pub struct InssInfo {
    pub empregado: String,
    pub empregador: String,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct TaxInfo {
    pub irps_brackets: Vec<BracketInfo>,
    pub inss: InssInfo,
    pub moeda: &'static str,
    pub ano: i32,
    pub fonte: &'static str,
}

/// `20250` -> `20,250`; `20249.99` -> `20,249.99`.
fn format_amount(value: Decimal) -> String {
    let text = value.round_dp(2).normalize().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{grouped}.{fraction:0<2}"),
        None => grouped,
    }
}

/// `0.15` -> `15%`.
fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn describe(bracket: &IrpsBracket) -> BracketInfo {
    let taxa = format_rate(bracket.rate);
    let (faixa, descricao) = match bracket.upper {
        Some(upper) => {
            let descricao = if bracket.rate.is_zero() {
                "Isento".to_string()
            } else {
                format!("Faixa de {taxa}")
            };
            (
                format!(
                    "{} - {} MTn",
                    format_amount(bracket.lower),
                    format_amount(upper)
                ),
                descricao,
            )
        }
        None => (
            format!("Acima de {} MTn", format_amount(bracket.lower)),
            format!("Faixa máxima de {taxa}"),
        ),
    };

    BracketInfo {
        faixa,
        taxa,
        descricao,
    }
}

async fn tax_info(State(state): State<AppState>) -> Json<TaxInfo> {
    let config = state.service.config();

    Json(TaxInfo {
        irps_brackets: config.schedule.brackets().iter().map(describe).collect(),
        inss: InssInfo {
            empregado: format_rate(config.inss_employee_rate),
            empregador: format_rate(config.inss_employer_rate),
            total: format_rate(config.inss_employee_rate + config.inss_employer_rate),
        },
        moeda: "Metical Moçambicano (MTn)",
        ano: TAX_YEAR,
        fonte: config.schedule.source(),
    })
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/tax-info", get(tax_info))
}
