//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    analytics::{
        get_category_breakdown_endpoint, get_dashboard_endpoint, get_monthly_trend_endpoint,
        get_summary_endpoint,
    },
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_category_expenses_endpoint, get_totals_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, list_transactions_in_range_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let transaction_routes = Router::new()
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::USER_TRANSACTIONS, get(list_transactions_endpoint))
        .route(
            endpoints::USER_TRANSACTIONS_RANGE,
            get(list_transactions_in_range_endpoint),
        )
        .route(endpoints::USER_SUMMARY, get(get_totals_endpoint))
        .route(
            endpoints::USER_CATEGORY_EXPENSES,
            get(get_category_expenses_endpoint),
        );

    let analytics_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(endpoints::ANALYTICS_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::CATEGORY_BREAKDOWN,
            get(get_category_breakdown_endpoint),
        )
        .route(endpoints::MONTHLY_TREND, get(get_monthly_trend_endpoint));

    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .merge(transaction_routes)
        .merge(analytics_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested route does not exist" })),
    )
        .into_response()
}
