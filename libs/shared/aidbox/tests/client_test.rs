use serde_json::json;
use wiremock::matchers::{basic_auth, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_aidbox::AidboxClient;
use shared_models::fhir::Patient;

#[tokio::test]
async fn search_hits_the_fhir_endpoint_with_repeated_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fhir/Appointment"))
        .and(query_param("date", "ge2025-06-15"))
        .and(query_param("date", "le2025-06-21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Bundle",
            "total": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AidboxClient::with_base_url(server.uri());
    let bundle = client
        .search(
            "Appointment",
            &[
                ("date".to_string(), "ge2025-06-15".to_string()),
                ("date".to_string(), "le2025-06-21".to_string()),
            ],
        )
        .await
        .unwrap();

    assert_eq!(bundle.total, Some(0));
    assert!(bundle.entry.is_empty());
}

#[tokio::test]
async fn read_decodes_a_single_resource() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fhir/Patient/pat-1"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Patient",
            "id": "pat-1",
            "name": [{ "given": ["Ada"], "family": "Lovelace" }]
        })))
        .mount(&server)
        .await;

    let client = AidboxClient::with_base_url(server.uri());
    let patient: Patient = client.read("Patient", "pat-1").await.unwrap();

    assert_eq!(patient.display_name(), "Ada Lovelace");
}

#[tokio::test]
async fn error_statuses_become_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fhir/Patient/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "resourceType": "OperationOutcome"
        })))
        .mount(&server)
        .await;

    let client = AidboxClient::with_base_url(server.uri());
    let result: anyhow::Result<Patient> = client.read("Patient", "missing").await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}

#[tokio::test]
async fn delete_accepts_an_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/fhir/Appointment/apt-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = AidboxClient::with_base_url(server.uri());
    client.delete("Appointment", "apt-1").await.unwrap();
}

#[tokio::test]
async fn credentials_from_config_become_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fhir/Patient/pat-1"))
        .and(basic_auth("client", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceType": "Patient",
            "id": "pat-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = shared_config::AppConfig {
        aidbox_base_url: server.uri(),
        aidbox_username: "client".to_string(),
        aidbox_password: "secret".to_string(),
        server_port: 3000,
        work_start_hour: 8,
        work_end_hour: 18,
        slot_minutes: 30,
    };
    let client = AidboxClient::new(&config);
    let _: Patient = client.read("Patient", "pat-1").await.unwrap();
}
