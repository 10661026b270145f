//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/pessoas/{person_id}', use [format_endpoint].

/// The route to list and create people.
pub const PEOPLE: &str = "/api/pessoas";
/// The route to get, update or delete a single person.
pub const PERSON: &str = "/api/pessoas/{person_id}";
/// The route for the income and expense totals of each person.
pub const PEOPLE_REPORT: &str = "/api/pessoas/relatorio-totais";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categorias";
/// The route to get or delete a single category.
pub const CATEGORY: &str = "/api/categorias/{category_id}";
/// The route to check whether a category can be deleted.
pub const CATEGORY_CAN_DELETE: &str = "/api/categorias/{category_id}/pode-remover";
/// The route for the income and expense totals of each category.
pub const CATEGORIES_REPORT: &str = "/api/categorias/relatorio-totais";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transacoes";
/// The route to get, update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transacoes/{transaction_id}";
/// The route for the totals over every transaction.
pub const TRANSACTION_STATISTICS: &str = "/api/transacoes/estatisticas";
/// The route to check a transaction against the business rules without creating it.
pub const VALIDATE_TRANSACTION: &str = "/api/transacoes/validar";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/pessoas/{person_id}', '{person_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::PEOPLE);
        assert_endpoint_is_valid_uri(endpoints::PERSON);
        assert_endpoint_is_valid_uri(endpoints::PEOPLE_REPORT);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::CATEGORY_CAN_DELETE);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES_REPORT);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION_STATISTICS);
        assert_endpoint_is_valid_uri(endpoints::VALIDATE_TRANSACTION);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::PERSON, 1);

        assert_eq!(formatted_path, "/api/pessoas/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint(endpoints::PEOPLE, 1);

        assert_eq!(formatted_path, "/api/pessoas");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::CATEGORY_CAN_DELETE, 7);

        assert_eq!(formatted_path, "/api/categorias/7/pode-remover");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
