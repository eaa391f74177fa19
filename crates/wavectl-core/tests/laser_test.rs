// End-to-end facade tests: `Laser` against a wiremock device.
//
// Status sequences are scripted by mounting `up_to_n_times` mocks in
// order, so the device appears to make progress across polls.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wavectl_core::monitor::AutoAcknowledge;
use wavectl_core::{
    CoreError, Laser, LaserConfig, PollPolicy, ShutterState, UserActionHandler, UserPrompt,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn fast_config() -> LaserConfig {
    LaserConfig {
        poll: PollPolicy {
            poll_interval: Duration::from_millis(1),
            max_duration: Duration::from_secs(5),
            settle_delay: Duration::from_millis(1),
            ..PollPolicy::default()
        },
        ..LaserConfig::default()
    }
}

fn output(wavelength: f64, fraction: f64, in_progress: bool) -> serde_json::Value {
    json!({
        "Wavelength": wavelength,
        "WavelengthSettingCompletionPart": fraction,
        "IsWavelengthSettingInProgress": in_progress,
        "IsWaitingForUserAction": false,
        "Messages": []
    })
}

fn interactions_body() -> serde_json::Value {
    json!([
        { "Type": "SIG", "OutputRange": { "From": 630.0, "To": 1030.0 } },
        { "Type": "IDL", "OutputRange": { "From": 1030.0, "To": 2600.0 } }
    ])
}

async fn mount_interactions(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/ExpandedInteractions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(interactions_body()))
        .mount(server)
        .await;
}

/// Mount the probe response consumed by `Laser::connect`.
async fn mount_probe(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output(795.0, 0.0, false)))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

// ── Wavelength ──────────────────────────────────────────────────────

#[tokio::test]
async fn set_wavelength_converges_over_three_polls() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    mount_interactions(&server).await;

    Mock::given(method("PUT"))
        .and(path("/Optical/WavelengthControl/SetWavelength"))
        .and(body_json(json!({ "Interaction": "SIG", "Wavelength": 800.0 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    // Two in-progress polls with rising progress, then settled; the
    // settled response also serves the read-back.
    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output(796.0, 0.4, true)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output(799.0, 0.9, true)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output(800.0, 1.0, false)))
        .mount(&server)
        .await;

    let laser = Laser::connect(&server.uri(), fast_config()).await.unwrap();
    laser
        .set_wavelength(800.0, None, true, &AutoAcknowledge)
        .await
        .expect("tuning should converge and verify");
}

#[tokio::test]
async fn set_wavelength_reports_mismatch_when_value_does_not_stick() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    mount_interactions(&server).await;

    Mock::given(method("PUT"))
        .and(path("/Optical/WavelengthControl/SetWavelength"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // Device claims completion but never moved off 790 nm.
    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output(790.0, 1.0, false)))
        .mount(&server)
        .await;

    let laser = Laser::connect(&server.uri(), fast_config()).await.unwrap();
    let err = laser
        .set_wavelength(800.0, None, false, &AutoAcknowledge)
        .await
        .unwrap_err();

    match err {
        CoreError::ValueMismatch { requested, actual } => {
            assert_eq!(requested, 800.0);
            assert_eq!(actual, 790.0);
        }
        other => panic!("expected ValueMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn set_wavelength_pauses_for_interlock_then_resumes() {
    struct Recording(Mutex<Vec<UserPrompt>>);
    impl UserActionHandler for Recording {
        async fn acknowledge(&self, prompts: &[UserPrompt]) -> Result<(), CoreError> {
            self.0.lock().unwrap().extend_from_slice(prompts);
            Ok(())
        }
    }

    let server = MockServer::start().await;
    mount_probe(&server).await;
    mount_interactions(&server).await;

    Mock::given(method("PUT"))
        .and(path("/Optical/WavelengthControl/SetWavelength"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // First poll: blocked on the interlock.
    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Wavelength": 797.0,
            "WavelengthSettingCompletionPart": 0.6,
            "IsWavelengthSettingInProgress": true,
            "IsWaitingForUserAction": true,
            "Messages": [
                { "Text": "Rotate the crystal to position 3", "Image": "crystal3.png" }
            ]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output(800.0, 1.0, false)))
        .mount(&server)
        .await;

    // The acknowledged interlock must produce exactly one resume
    // directive carrying the restore flag.
    Mock::given(method("PUT"))
        .and(path(
            "/Optical/WavelengthControl/FinishWavelengthSettingAfterUserActions",
        ))
        .and(body_json(json!({ "RestoreShutter": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let handler = Recording(Mutex::new(Vec::new()));
    let laser = Laser::connect(&server.uri(), fast_config()).await.unwrap();
    laser
        .set_wavelength(800.0, None, true, &handler)
        .await
        .expect("operation should converge after the acknowledgment");

    let seen = handler.0.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].text, "Rotate the crystal to position 3");
    assert_eq!(seen[0].image.as_deref(), Some("crystal3.png"));
}

#[tokio::test]
async fn set_wavelength_validates_interactions_before_writing() {
    let server = MockServer::start().await;
    mount_probe(&server).await;
    mount_interactions(&server).await;

    let laser = Laser::connect(&server.uri(), fast_config()).await.unwrap();

    // No interaction covers 100 nm.
    let err = laser
        .set_wavelength(100.0, None, false, &AutoAcknowledge)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NoInteractionForWavelength { .. }));

    // SIG exists but does not cover 2000 nm.
    let err = laser
        .set_wavelength(2000.0, Some("SIG"), false, &AutoAcknowledge)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::WavelengthOutOfRange { .. }));

    // No such interaction at all.
    let err = laser
        .set_wavelength(800.0, Some("DFG"), false, &AutoAcknowledge)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UnknownInteraction { .. }));
}

// ── Shutter ─────────────────────────────────────────────────────────

#[tokio::test]
async fn set_shutter_verifies_read_back() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    Mock::given(method("PUT"))
        .and(path("/ShutterInterlock/OpenCloseShutter"))
        .and(body_json(json!(true)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ShutterInterlock/IsShutterOpen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;

    let laser = Laser::connect(&server.uri(), fast_config()).await.unwrap();
    laser.set_shutter(ShutterState::Open).await.unwrap();
}

#[tokio::test]
async fn set_shutter_reports_mismatch_when_interlock_holds_it_closed() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    Mock::given(method("PUT"))
        .and(path("/ShutterInterlock/OpenCloseShutter"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    // Interlock keeps the shutter closed despite the accepted write.
    Mock::given(method("GET"))
        .and(path("/ShutterInterlock/IsShutterOpen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
        .mount(&server)
        .await;

    let laser = Laser::connect(&server.uri(), fast_config()).await.unwrap();
    let err = laser.set_shutter(ShutterState::Open).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::ShutterMismatch {
            requested: ShutterState::Open,
            actual: ShutterState::Closed,
        }
    ));
}

#[tokio::test]
async fn set_shutter_skips_verification_when_disabled() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    Mock::given(method("PUT"))
        .and(path("/ShutterInterlock/OpenCloseShutter"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    // No IsShutterOpen mock: a verification attempt would 404 and fail
    // the call, so success proves the read-back was skipped.

    let mut config = fast_config();
    config.verify_writes = false;
    let laser = Laser::connect(&server.uri(), config).await.unwrap();
    laser.set_shutter(ShutterState::Closed).await.unwrap();
}

// ── Connection ──────────────────────────────────────────────────────

#[tokio::test]
async fn connect_probes_the_base_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = Laser::connect(&server.uri(), fast_config())
        .await
        .err()
        .expect("connect must fail when the probe fails");
    assert!(matches!(err, CoreError::Api(_)));
}

#[tokio::test]
async fn reads_are_fresh_per_call() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output(801.0, 1.0, false)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Optical/WavelengthControl/Output"))
        .respond_with(ResponseTemplate::new(200).set_body_json(output(650.0, 1.0, false)))
        .mount(&server)
        .await;

    let laser = Laser::connect(&server.uri(), fast_config()).await.unwrap();
    assert_eq!(laser.wavelength().await.unwrap(), 801.0);
    assert_eq!(laser.wavelength().await.unwrap(), 650.0);
}
