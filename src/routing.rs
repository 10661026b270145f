//! Application router configuration.

use axum::{
    Router,
    http::Uri,
    routing::get,
};

use crate::{
    AppState, Error,
    category::{
        can_delete_category_endpoint, create_category_endpoint, delete_category_endpoint,
        get_categories_endpoint, get_category_endpoint,
    },
    endpoints,
    person::{
        create_person_endpoint, delete_person_endpoint, get_people_endpoint, get_person_endpoint,
        update_person_endpoint,
    },
    report::{get_categories_report_endpoint, get_people_report_endpoint, get_statistics_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint, validate_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let people_routes = Router::new()
        .route(
            endpoints::PEOPLE,
            get(get_people_endpoint).post(create_person_endpoint),
        )
        .route(endpoints::PEOPLE_REPORT, get(get_people_report_endpoint))
        .route(
            endpoints::PERSON,
            get(get_person_endpoint)
                .put(update_person_endpoint)
                .delete(delete_person_endpoint),
        );

    let category_routes = Router::new()
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORIES_REPORT,
            get(get_categories_report_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::CATEGORY_CAN_DELETE,
            get(can_delete_category_endpoint),
        );

    let transaction_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_STATISTICS,
            get(get_statistics_endpoint),
        )
        .route(
            endpoints::VALIDATE_TRANSACTION,
            get(validate_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        );

    people_routes
        .merge(category_routes)
        .merge(transaction_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found(uri: Uri) -> Error {
    tracing::debug!("no route for {uri}");

    Error::NotFound
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, endpoints, endpoints::format_endpoint};

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection).expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn post_json(server: &TestServer, path: &str, body: Value) -> Value {
        let response = server.post(path).json(&body).await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    async fn create_person(server: &TestServer, name: &str, age: i64) -> i64 {
        post_json(server, endpoints::PEOPLE, json!({"nome": name, "idade": age})).await["id"]
            .as_i64()
            .expect("person has no id")
    }

    async fn create_category(server: &TestServer, description: &str, purpose: &str) -> i64 {
        post_json(
            server,
            endpoints::CATEGORIES,
            json!({"descricao": description, "finalidade": purpose}),
        )
        .await["id"]
            .as_i64()
            .expect("category has no id")
    }

    async fn create_transaction(
        server: &TestServer,
        amount: &str,
        transaction_type: &str,
        person_id: i64,
        category_id: i64,
    ) -> Value {
        post_json(
            server,
            endpoints::TRANSACTIONS,
            json!({
                "descricao": "Teste",
                "valor": amount,
                "tipo": transaction_type,
                "pessoaId": person_id,
                "categoriaId": category_id,
            }),
        )
        .await
    }

    #[tokio::test]
    async fn minor_cannot_receive_income() {
        let server = get_test_server();
        let ana = create_person(&server, "Ana", 10).await;
        let salary = create_category(&server, "Salário", "Receita").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "descricao": "Mesada",
                "valor": "50.00",
                "tipo": "Receita",
                "pessoaId": ana,
                "categoriaId": salary,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["motivos"][0]["codigo"], "MinorCannotReceiveIncome");
        assert_eq!(body["motivos"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn category_must_permit_type() {
        let server = get_test_server();
        let bob = create_person(&server, "Bob", 30).await;
        let transport = create_category(&server, "Transporte", "Despesa").await;

        let income = server
            .get(endpoints::VALIDATE_TRANSACTION)
            .add_query_param("pessoaId", bob)
            .add_query_param("categoriaId", transport)
            .add_query_param("tipo", "Receita")
            .await
            .json::<Value>();
        let expense = server
            .get(endpoints::VALIDATE_TRANSACTION)
            .add_query_param("pessoaId", bob)
            .add_query_param("categoriaId", transport)
            .add_query_param("tipo", "Despesa")
            .await
            .json::<Value>();

        assert_eq!(income["valido"], false);
        assert_eq!(income["motivos"][0]["codigo"], "CategoryTypeMismatch");
        assert_eq!(expense, json!({"valido": true, "motivos": []}));
    }

    #[tokio::test]
    async fn person_report_totals() {
        let server = get_test_server();
        let bob = create_person(&server, "Bob", 30).await;
        let other = create_category(&server, "Outros", "Ambas").await;
        create_transaction(&server, "1000", "Receita", bob, other).await;
        create_transaction(&server, "300", "Despesa", bob, other).await;

        let report = server
            .get(endpoints::PEOPLE_REPORT)
            .await
            .json::<Value>();

        let row = &report["itens"][0];
        assert_eq!(row["pessoaId"], bob);
        assert_eq!(row["totalReceitas"], "1000.00");
        assert_eq!(row["totalDespesas"], "300.00");
        assert_eq!(row["saldo"], "700.00");
        assert_eq!(report["totalGeral"]["totalReceitas"], "1000.00");
        assert_eq!(report["totalGeral"]["totalDespesas"], "300.00");
        assert_eq!(report["totalGeral"]["saldo"], "700.00");
    }

    #[tokio::test]
    async fn category_in_use_cannot_be_deleted() {
        let server = get_test_server();
        let bob = create_person(&server, "Bob", 30).await;
        let groceries = create_category(&server, "Mercado", "Despesa").await;
        create_transaction(&server, "10", "Despesa", bob, groceries).await;
        create_transaction(&server, "20", "Despesa", bob, groceries).await;

        let check = server
            .get(&format_endpoint(endpoints::CATEGORY_CAN_DELETE, groceries))
            .await
            .json::<Value>();
        let delete = server
            .delete(&format_endpoint(endpoints::CATEGORY, groceries))
            .await;

        assert_eq!(check["podeRemover"], false);
        assert!(check["motivo"].as_str().unwrap().contains('2'));
        delete.assert_status(StatusCode::BAD_REQUEST);
        server
            .get(&format_endpoint(endpoints::CATEGORY, groceries))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn deleting_person_removes_their_transactions() {
        let server = get_test_server();
        let bob = create_person(&server, "Bob", 30).await;
        let groceries = create_category(&server, "Mercado", "Despesa").await;
        for _ in 0..5 {
            create_transaction(&server, "1.99", "Despesa", bob, groceries).await;
        }

        let deletion = server
            .delete(&format_endpoint(endpoints::PERSON, bob))
            .await
            .json::<Value>();
        let remaining = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("pessoaId", bob)
            .await
            .json::<Value>();

        assert_eq!(deletion, json!({"transacoesRemovidas": 5}));
        assert_eq!(remaining, json!([]));
        server
            .get(&format_endpoint(endpoints::PERSON, bob))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn created_transaction_is_listed_once_by_matching_filter() {
        let server = get_test_server();
        let bob = create_person(&server, "Bob", 30).await;
        let other = create_category(&server, "Outros", "Ambas").await;
        create_transaction(&server, "5", "Despesa", bob, other).await;
        let created = create_transaction(&server, "7.25", "Receita", bob, other).await;

        let listed = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("pessoaId", bob)
            .add_query_param("categoriaId", other)
            .add_query_param("tipo", "Receita")
            .await
            .json::<Value>();

        assert_eq!(listed, json!([created]));
    }

    #[tokio::test]
    async fn empty_filter_values_are_ignored() {
        let server = get_test_server();
        let bob = create_person(&server, "Bob", 30).await;
        let other = create_category(&server, "Outros", "Ambas").await;
        create_transaction(&server, "5", "Despesa", bob, other).await;

        let listed = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("pessoaId", "")
            .add_query_param("tipo", "")
            .await
            .json::<Value>();

        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn duplicate_person_name_is_bad_request() {
        let server = get_test_server();
        create_person(&server, "Ana", 10).await;

        let response = server
            .post(endpoints::PEOPLE)
            .json(&json!({"nome": "ana", "idade": 40}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["mensagem"].is_string());
    }

    #[tokio::test]
    async fn statistics_start_at_zero() {
        let server = get_test_server();

        let statistics = server
            .get(endpoints::TRANSACTION_STATISTICS)
            .await
            .json::<Value>();

        assert_eq!(
            statistics,
            json!({
                "quantidadeTransacoes": 0,
                "totalReceitas": "0.00",
                "totalDespesas": "0.00",
                "saldo": "0.00",
            })
        );
    }

    #[tokio::test]
    async fn unknown_type_filter_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("tipo", "Foo")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let message = response.json::<Value>()["mensagem"].as_str().map(str::to_owned);
        assert!(message.is_some_and(|message| message.contains("Foo")));
    }

    #[tokio::test]
    async fn non_numeric_filter_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("pessoaId", "abc")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["mensagem"].is_string());
    }

    #[tokio::test]
    async fn missing_field_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::PEOPLE)
            .json(&json!({"nome": "Ana"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["mensagem"].is_string());
    }

    #[tokio::test]
    async fn amounts_are_accepted_as_numbers_with_two_decimal_places() {
        let server = get_test_server();
        let bob = create_person(&server, "Bob", 30).await;
        let other = create_category(&server, "Outros", "Ambas").await;
        let transaction = |amount: Value| {
            json!({
                "descricao": "Teste",
                "valor": amount,
                "tipo": "Despesa",
                "pessoaId": bob,
                "categoriaId": other,
            })
        };

        let created = server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction(json!(0.1)))
            .await;
        let too_precise = server
            .post(endpoints::TRANSACTIONS)
            .json(&transaction(json!("10.005")))
            .await;

        created.assert_status(StatusCode::CREATED);
        assert_eq!(created.json::<Value>()["valor"], "0.10");
        too_precise.assert_status(StatusCode::BAD_REQUEST);
        assert!(too_precise.json::<Value>()["mensagem"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/desconhecido").await;

        response.assert_status_not_found();
        assert!(response.json::<Value>()["mensagem"].is_string());
    }
}
