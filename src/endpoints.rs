//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";
/// The route to create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list a user's transactions a page at a time.
pub const USER_TRANSACTIONS: &str = "/api/users/{user_id}/transactions";
/// The route to list a user's transactions between two dates.
pub const USER_TRANSACTIONS_RANGE: &str = "/api/users/{user_id}/transactions/range";
/// The route for a user's income and expense totals.
pub const USER_SUMMARY: &str = "/api/users/{user_id}/summary";
/// The route for a user's expense totals by category.
pub const USER_CATEGORY_EXPENSES: &str = "/api/users/{user_id}/category-expenses";
/// The route for a user's dashboard.
pub const DASHBOARD: &str = "/api/analytics/users/{user_id}/dashboard";
/// The route for a user's summary, including the savings rate.
pub const ANALYTICS_SUMMARY: &str = "/api/analytics/users/{user_id}/summary";
/// The route for a user's expenses broken down by category.
pub const CATEGORY_BREAKDOWN: &str = "/api/analytics/users/{user_id}/category-breakdown";
/// The route for a user's six month trend.
pub const MONTHLY_TREND: &str = "/api/analytics/users/{user_id}/monthly-trend";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::HEALTH,
            endpoints::TRANSACTIONS,
            endpoints::TRANSACTION,
            endpoints::USER_TRANSACTIONS,
            endpoints::USER_TRANSACTIONS_RANGE,
            endpoints::USER_SUMMARY,
            endpoints::USER_CATEGORY_EXPENSES,
            endpoints::DASHBOARD,
            endpoints::ANALYTICS_SUMMARY,
            endpoints::CATEGORY_BREAKDOWN,
            endpoints::MONTHLY_TREND,
        ] {
            assert_endpoint_is_valid_uri(&format_endpoint(endpoint, 1));
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::MONTHLY_TREND, 42);

        assert_eq!(formatted_path, "/api/analytics/users/42/monthly-trend");
    }
}
