// Integration tests for `DeviceClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wavectl_api::{DeviceClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let client = DeviceClient::from_reqwest(&server.uri(), reqwest::Client::new())
        .expect("mock server uri is valid");
    (server, client)
}

fn output_body(wavelength: f64, in_progress: bool) -> serde_json::Value {
    json!({
        "Wavelength": wavelength,
        "WavelengthSettingCompletionPart": if in_progress { 0.4 } else { 1.0 },
        "IsWavelengthSettingInProgress": in_progress,
        "IsWaitingForUserAction": false,
        "Messages": []
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_wavelength_output() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output_body(801.5, true)))
        .mount(&server)
        .await;

    let output = client.wavelength_output().await.unwrap();
    assert_eq!(output.wavelength, 801.5);
    assert!(output.setting_in_progress);
    assert!(!output.waiting_for_user_action);
    assert!(output.messages.is_empty());
}

#[tokio::test]
async fn test_wavelength_output_with_user_action_messages() {
    let (server, client) = setup().await;

    let body = json!({
        "Wavelength": 790.0,
        "WavelengthSettingCompletionPart": 0.8,
        "IsWavelengthSettingInProgress": true,
        "IsWaitingForUserAction": true,
        "Messages": [
            { "Text": "Rotate the crystal to position 3", "Image": "crystal3.png" },
            { "Text": "Close the lid", "Image": null }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let output = client.wavelength_output().await.unwrap();
    assert!(output.waiting_for_user_action);
    assert_eq!(output.messages.len(), 2);
    assert_eq!(output.messages[0].text, "Rotate the crystal to position 3");
    assert_eq!(output.messages[0].image.as_deref(), Some("crystal3.png"));
    assert_eq!(output.messages[1].image, None);
}

#[tokio::test]
async fn test_expanded_interactions() {
    let (server, client) = setup().await;

    let body = json!([
        { "Type": "SIG", "OutputRange": { "From": 630.0, "To": 1030.0 } },
        { "Type": "IDL", "OutputRange": { "From": 1030.0, "To": 2600.0 } }
    ]);

    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/ExpandedInteractions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let interactions = client.expanded_interactions().await.unwrap();
    assert_eq!(interactions.len(), 2);
    assert_eq!(interactions[0].interaction_type, "SIG");
    assert_eq!(interactions[1].output_range.to, 2600.0);
}

#[tokio::test]
async fn test_set_wavelength_sends_interaction_and_value() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/Optical/WavelengthControl/SetWavelength"))
        .and(body_json(json!({ "Interaction": "SIG", "Wavelength": 800.0 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.set_wavelength("SIG", 800.0).await.unwrap();
}

#[tokio::test]
async fn test_finish_after_user_actions() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(
            "/Optical/WavelengthControl/FinishWavelengthSettingAfterUserActions",
        ))
        .and(body_json(json!({ "RestoreShutter": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.finish_after_user_actions(true).await.unwrap();
}

#[tokio::test]
async fn test_shutter_roundtrip_bare_booleans() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/ShutterInterlock/IsShutterOpen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/ShutterInterlock/OpenCloseShutter"))
        .and(body_json(json!(false)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.is_shutter_open().await.unwrap());
    client.open_close_shutter(false).await.unwrap();
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_http_error_status_is_typed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .mount(&server)
        .await;

    let err = client.wavelength_output().await.unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal failure");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deserialization_error_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let err = client.wavelength_output().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json at all"),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_maps_connect_failure_to_transport() {
    // Point at a port nothing listens on.
    let client =
        DeviceClient::from_reqwest("http://127.0.0.1:9/PublicAPI", reqwest::Client::new())
            .expect("valid url");

    let err = client.probe().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_transient());
}
