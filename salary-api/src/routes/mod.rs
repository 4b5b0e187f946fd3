//! API route definitions.
//!
//! | Method | Path                               |
//! |--------|------------------------------------|
//! | GET    | `/api/`                            |
//! | GET    | `/api/health`                      |
//! | POST   | `/api/calculate-salary`            |
//! | GET    | `/api/calculation-history`         |
//! | GET    | `/api/calculation-history/{id}`    |
//! | GET    | `/api/tax-info`                    |
//! | POST   | `/api/compare-scenarios`           |
//! | POST   | `/api/extras/thirteenth-salary`    |
//! | POST   | `/api/extras/overtime`             |

use axum::Router;

use crate::AppState;

pub mod calculations;
pub mod compare;
pub mod extras;
pub mod health;
pub mod tax_info;

/// Routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(calculations::routes())
        .merge(tax_info::routes())
        .merge(compare::routes())
        .merge(extras::routes())
}
