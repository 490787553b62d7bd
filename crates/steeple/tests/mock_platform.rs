//! Mock platform tests for the steeple library.
//!
//! These tests use wiremock to simulate a MinistryPlatform instance and
//! test the library's behavior without requiring network access or real
//! credentials.

use std::time::Duration;

use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use steeple::error::AuthError;
use steeple::{
    BaseUrl, ClientCredentials, Error, FileParams, FilePayload, MinistryPlatform, ProcParams,
    Procedure, QueryParams, Record, Table,
};

/// Helper to create a base URL from a mock server.
fn mock_base_url(server: &MockServer) -> BaseUrl {
    // For tests, we need to allow HTTP localhost
    BaseUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

/// A platform facade in managed (client-credentials) mode.
fn managed_platform(server: &MockServer) -> MinistryPlatform {
    MinistryPlatform::from_credentials(
        mock_base_url(server),
        ClientCredentials::new("test-client", "test-secret"),
    )
}

/// Mount the token endpoint, expecting exactly `expected` exchanges.
async fn mount_token_endpoint(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/connect/token"))
        .and(wiremock::matchers::body_string_contains(
            "grant_type=client_credentials",
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(25))
                .set_body_json(json!({
                    "access_token": "test-token",
                    "token_type": "Bearer",
                    "expires_in": 3600
                })),
        )
        .expect(expected)
        .mount(server)
        .await;
}

// ============================================================================
// Token Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_first_request_exchanges_and_injects_bearer() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/tables/Contacts"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Contacts").unwrap();
    let records: Vec<Record> = platform
        .tables()
        .get_records(&table, &QueryParams::new())
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_token_reused_within_safety_window() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/tables/Events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Events").unwrap();

    // Both calls fall inside the five-minute safety window, so only one
    // exchange may happen (verified by the mock expectation on drop)
    let _: Vec<Record> = platform
        .tables()
        .get_records(&table, &QueryParams::new())
        .await
        .unwrap();
    let _: Vec<Record> = platform
        .tables()
        .get_records(&table, &QueryParams::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_callers_share_one_exchange() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/tables/Items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Items").unwrap();

    // All callers observe the missing token at once; the refresh must be
    // single-flight, so the token endpoint sees exactly one exchange
    let calls = (0..8).map(|_| {
        let platform = platform.clone();
        let table = table.clone();
        async move {
            let records: Vec<Record> = platform
                .tables()
                .get_records(&table, &QueryParams::new())
                .await?;
            Ok::<_, Error>(records)
        }
    });

    let results = join_all(calls).await;
    assert!(results.iter().all(|r| r.is_ok()));
}

#[tokio::test]
async fn test_delegated_token_never_exchanges() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 0).await;

    Mock::given(method("GET"))
        .and(path("/tables/Groups"))
        .and(header("authorization", "Bearer widget-login-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let platform =
        MinistryPlatform::with_delegated_token(mock_base_url(&server), "widget-login-token");
    let table = Table::new("Groups").unwrap();

    for _ in 0..3 {
        let _: Vec<Record> = platform
            .tables()
            .get_records(&table, &QueryParams::new())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_rejected_exchange_is_fatal_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/connect/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_client"}"#),
        )
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Contacts").unwrap();
    let result: Result<Vec<Record>, Error> = platform
        .tables()
        .get_records(&table, &QueryParams::new())
        .await;

    match result.unwrap_err() {
        Error::Auth(AuthError::ExchangeRejected { status, detail }) => {
            assert_eq!(status, 400);
            assert!(detail.unwrap().contains("invalid_client"));
        }
        other => panic!("expected auth error, got {other:?}"),
    }
}

// ============================================================================
// Table Operation Tests
// ============================================================================

#[derive(Debug, Deserialize)]
struct Contact {
    #[serde(rename = "Contact_ID")]
    contact_id: i64,
    #[serde(rename = "Contact_Status_ID")]
    contact_status_id: i64,
}

#[tokio::test]
async fn test_get_records_with_filter_and_top() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/tables/Contacts"))
        .and(query_param("$filter", "Contact_Status_ID=1"))
        .and(query_param("$top", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Contact_ID": 11, "Contact_Status_ID": 1},
            {"Contact_ID": 12, "Contact_Status_ID": 1}
        ])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Contacts").unwrap();
    let params = QueryParams::new().filter("Contact_Status_ID=1").top(10);

    let contacts: Vec<Contact> = platform
        .tables()
        .get_records(&table, &params)
        .await
        .unwrap();

    assert!(contacts.len() <= 10);
    assert!(contacts.iter().all(|c| c.contact_status_id == 1));
    assert_eq!(contacts[0].contact_id, 11);
}

#[tokio::test]
async fn test_create_then_read_round_trip() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/tables/Widgets"))
        .and(body_json(json!({"records": [{"Widget_Name": "x"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Widget_ID": 5, "Widget_Name": "x"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tables/Widgets"))
        .and(query_param("$filter", "Widget_ID=5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Widget_ID": 5, "Widget_Name": "x"}
        ])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Widgets").unwrap();

    let submitted = vec![Record::new().set("Widget_Name", "x")];
    let created: Vec<Record> = platform
        .tables()
        .create_records(&table, &submitted, &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    let key = created[0].key("Widget_ID").unwrap();

    let read_back: Option<Record> = platform
        .tables()
        .find_one(&table, &QueryParams::new().filter(format!("Widget_ID={key}")))
        .await
        .unwrap();

    let read_back = read_back.unwrap();
    // Every field submitted must come back equal
    assert_eq!(read_back.get("Widget_Name"), submitted[0].get("Widget_Name"));
}

#[tokio::test]
async fn test_update_with_allow_create_upserts() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("PUT"))
        .and(path("/tables/Widgets"))
        .and(query_param("$allowCreate", "true"))
        .and(body_json(json!({"records": [{"Widget_ID": 5, "Widget_Name": "x"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Widget_ID": 5, "Widget_Name": "x"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tables/Widgets"))
        .and(query_param("$filter", "Widget_ID=5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Widget_ID": 5, "Widget_Name": "x"}
        ])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Widgets").unwrap();

    let records = vec![Record::new().set("Widget_ID", 5).set("Widget_Name", "x")];
    let upserted: Vec<Record> = platform
        .tables()
        .update_records(&table, &records, &QueryParams::new().allow_create(true))
        .await
        .unwrap();
    assert_eq!(upserted[0].key("Widget_ID"), Some(5));

    // The record with id 5 now exists
    let present: Vec<Record> = platform
        .tables()
        .get_records(&table, &QueryParams::new().filter("Widget_ID=5"))
        .await
        .unwrap();
    assert_eq!(present.len(), 1);
    assert_eq!(present[0].get("Widget_Name").unwrap(), "x");
}

#[tokio::test]
async fn test_delete_sends_repeated_ids_and_returns_removed() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("DELETE"))
        .and(path("/tables/Widgets"))
        .and(query_param("$userId", "12"))
        .and(query_param("id", "1"))
        .and(query_param("id", "2"))
        .and(query_param("id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Widget_ID": 1}, {"Widget_ID": 2}, {"Widget_ID": 3}
        ])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Widgets").unwrap();

    let removed: Vec<Record> = platform
        .tables()
        .delete_records(&table, &[1, 2, 3], &QueryParams::new().user_id(12))
        .await
        .unwrap();

    // Pre-deletion representations, in order
    let ids: Vec<i64> = removed.iter().filter_map(|r| r.key("Widget_ID")).collect();
    assert_eq!(ids, [1, 2, 3]);
}

#[tokio::test]
async fn test_error_propagation_includes_status_and_body() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/tables/Nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("Table 'Nope' does not exist"),
        )
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Nope").unwrap();
    let result: Result<Vec<Record>, Error> = platform
        .tables()
        .get_records(&table, &QueryParams::new())
        .await;

    match result.unwrap_err() {
        Error::Http(err) => {
            assert_eq!(err.status, 404);
            assert!(err.to_string().contains("Table 'Nope' does not exist"));
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

// ============================================================================
// Procedure Tests
// ============================================================================

#[tokio::test]
async fn test_procedure_returns_multiple_result_sets() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    // One result set for the rows, one for aggregate stats
    Mock::given(method("GET"))
        .and(path("/procs/api_Widget_GetStats"))
        .and(query_param("@WidgetId", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [{"Widget_ID": 5, "Widget_Name": "x"}],
            [{"Total": 12}]
        ])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let procedure = Procedure::new("api_Widget_GetStats").unwrap();
    let params = ProcParams::new().with("WidgetId", 5);

    let result_sets = platform
        .procedures()
        .execute(&procedure, &params)
        .await
        .unwrap();

    assert_eq!(result_sets.len(), 2);
    assert_eq!(result_sets[0][0]["Widget_ID"], 5);
    assert_eq!(result_sets[1][0]["Total"], 12);
}

#[tokio::test]
async fn test_procedure_with_json_body() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/procs/api_Widget_Archive"))
        .and(body_json(json!({"@Ids": [1, 2]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[]])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let procedure = Procedure::new("api_Widget_Archive").unwrap();

    let result_sets = platform
        .procedures()
        .execute_with_body(&procedure, &json!({"@Ids": [1, 2]}))
        .await
        .unwrap();

    assert_eq!(result_sets.len(), 1);
    assert!(result_sets[0].is_empty());
}

// ============================================================================
// File Tests
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_file_content_fetch() {
    let server = MockServer::start().await;
    // No credentials are ever exchanged on this path
    mount_token_endpoint(&server, 0).await;

    let unique_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/files/{unique_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<svg/>".to_vec()))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let bytes = platform
        .files()
        .content_by_unique_id(&unique_id, false)
        .await
        .unwrap();

    assert_eq!(bytes, b"<svg/>");
}

#[tokio::test]
async fn test_thumbnail_fetch_sets_query_flag() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 0).await;

    let unique_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/files/{unique_id}")))
        .and(query_param("$thumbnail", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"thumb".to_vec()))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let bytes = platform
        .files()
        .content_by_unique_id(&unique_id, true)
        .await
        .unwrap();

    assert_eq!(bytes, b"thumb");
}

#[tokio::test]
async fn test_files_for_record_lists_metadata() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/files/Congregations/4"))
        .and(query_param("$default", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "FileId": 311,
            "UniqueFileId": "7b0a6a66-5dd7-4c3e-9c14-9a7d61cf3a0e",
            "FileName": "campus.svg",
            "IsDefaultImage": true
        }])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Congregations").unwrap();

    let files = platform
        .files()
        .files_for_record(&table, 4, Some(true))
        .await
        .unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "campus.svg");
    assert!(files[0].is_default_image);
}

#[tokio::test]
async fn test_upload_returns_created_descriptions() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/files/Events/42"))
        .and(query_param("$description", "banner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "FileId": 500,
            "UniqueFileId": "3f1f9a66-0000-4c3e-9c14-9a7d61cf3a0e",
            "FileName": "banner.png"
        }])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    let table = Table::new("Events").unwrap();
    let payload = FilePayload::new("banner.png", vec![0u8; 16]).with_content_type("image/png");

    let created = platform
        .files()
        .upload(&table, 42, vec![payload], &FileParams::new().description("banner"))
        .await
        .unwrap();

    assert_eq!(created[0].file_id, 500);
}

#[tokio::test]
async fn test_delete_file_is_fire_and_forget() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("DELETE"))
        .and(path("/files/311"))
        .and(query_param("$userId", "12"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);
    platform.files().delete(311, Some(12)).await.unwrap();
}

// ============================================================================
// Domain / Metadata Tests
// ============================================================================

#[tokio::test]
async fn test_domain_info_and_global_filters() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/domain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "DisplayName": "Grace Fellowship",
            "TimeZoneName": "America/Chicago"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/domain/filters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Key": 1, "Value": "Central Campus"},
            {"Key": 2, "Value": "North Campus"}
        ])))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);

    let info = platform.domain().get().await.unwrap();
    assert_eq!(info.display_name, "Grace Fellowship");

    let filters = platform.domain().global_filters().await.unwrap();
    assert_eq!(filters.len(), 2);
    assert_eq!(filters[1].value, "North Campus");
}

#[tokio::test]
async fn test_metadata_tables_and_refresh() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/tables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Name": "Contacts", "AccessLevel": "ReadWrite"},
            {"Name": "Events", "AccessLevel": "Read"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refreshMetadata"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let platform = managed_platform(&server);

    let tables = platform.metadata().tables().await.unwrap();
    assert_eq!(tables.len(), 2);

    let events = platform
        .metadata()
        .table(&Table::new("Events").unwrap())
        .await
        .unwrap();
    assert_eq!(events.unwrap().access_level.as_deref(), Some("Read"));

    let absent = platform
        .metadata()
        .table(&Table::new("Missing").unwrap())
        .await
        .unwrap();
    assert!(absent.is_none());

    platform.metadata().refresh().await.unwrap();
}
