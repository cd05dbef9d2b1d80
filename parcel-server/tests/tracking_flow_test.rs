//! End-to-end tests of the register / info / delete sequence against a mock
//! upstream provider.

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use parcel_server::carriers::CarrierDirectory;
use parcel_server::tracking::{
    TrackClient, TrackClientConfig, TrackError, Tracker, TrackingRequest,
};

fn tracker_for(server: &MockServer) -> Tracker {
    let config = TrackClientConfig::new("test-key").with_base_url(server.base_url());
    let client = TrackClient::new(config).unwrap();
    let directory = Arc::new(CarrierDirectory::from_document(json!([
        { "key": 100, "name": "DHL" },
        { "key": 200, "name": "DHL Express" }
    ])));
    Tracker::new(client, directory)
}

fn request(number: &str) -> TrackingRequest {
    TrackingRequest {
        number: number.to_string(),
        carrier: None,
        carrier_text: None,
    }
}

#[tokio::test]
async fn successful_lookup_runs_all_three_calls() {
    let server = MockServer::start();

    let register = server.mock(|when, then| {
        when.method(POST)
            .path("/register")
            .header("17token", "test-key")
            .json_body(json!([{ "number": "RR123456789VN", "carrier": 100 }]));
        then.status(200).json_body(json!({
            "code": 0,
            "data": { "accepted": [{ "number": "RR123456789VN" }] }
        }));
    });
    let info = server.mock(|when, then| {
        when.method(POST)
            .path("/gettrackinfo")
            .header("17token", "test-key")
            .json_body(json!([{ "number": "RR123456789VN", "carrier": 100 }]));
        then.status(200).json_body(json!({
            "code": 0,
            "data": {
                "accepted": [{ "track_info": { "latest_status": "InTransit" } }]
            }
        }));
    });
    let stop = server.mock(|when, then| {
        when.method(POST)
            .path("/deletetrack")
            .json_body(json!([{ "number": "RR123456789VN", "carrier": 100 }]));
        then.status(200).json_body(json!({
            "code": 0,
            "data": { "accepted": [{ "number": "RR123456789VN" }] }
        }));
    });

    let tracker = tracker_for(&server);
    // "dhl" must resolve to the exact DHL entry, not DHL Express.
    let report = tracker
        .track(&TrackingRequest {
            number: "RR123456789VN".to_string(),
            carrier: None,
            carrier_text: Some("dhl".to_string()),
        })
        .await
        .unwrap();

    register.assert();
    info.assert();
    stop.assert();

    assert_eq!(report.register["code"], 0);
    assert_eq!(
        report.info["data"]["accepted"][0]["track_info"]["latest_status"],
        "InTransit"
    );
    assert_eq!(report.stop["code"], 0);
}

#[tokio::test]
async fn blank_number_is_rejected_before_any_call() {
    let server = MockServer::start();
    let register = server.mock(|when, then| {
        when.method(POST).path("/register");
        then.status(200).json_body(json!({}));
    });

    let tracker = tracker_for(&server);
    let err = tracker.track(&request("   ")).await.unwrap_err();

    assert!(matches!(err, TrackError::Validation(_)));
    assert_eq!(err.to_string(), "number is required");
    register.assert_hits(0);
}

#[tokio::test]
async fn register_error_list_stops_the_sequence() {
    let server = MockServer::start();
    let register = server.mock(|when, then| {
        when.method(POST).path("/register");
        then.status(200).json_body(json!({
            "code": 0,
            "data": {
                "errors": [
                    { "code": -18019901, "message": "Submitted number is invalid." }
                ]
            }
        }));
    });
    let info = server.mock(|when, then| {
        when.method(POST).path("/gettrackinfo");
        then.status(200).json_body(json!({}));
    });
    let stop = server.mock(|when, then| {
        when.method(POST).path("/deletetrack");
        then.status(200).json_body(json!({}));
    });

    let tracker = tracker_for(&server);
    let err = tracker.track(&request("BAD")).await.unwrap_err();

    match err {
        TrackError::Upstream {
            status,
            message,
            detail,
        } => {
            // The provider said 200 but the error list counts as a failure;
            // its status and body still travel with the error.
            assert_eq!(status, Some(200));
            assert_eq!(message, "Submitted number is invalid.");
            assert!(detail.is_some());
        }
        other => panic!("expected upstream error, got {other:?}"),
    }

    register.assert();
    info.assert_hits(0);
    stop.assert_hits(0);
}

#[tokio::test]
async fn register_http_failure_uses_the_status_reason() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/register");
        then.status(401).json_body(json!({ "code": 401 }));
    });

    let tracker = tracker_for(&server);
    let err = tracker.track(&request("RR1")).await.unwrap_err();

    match err {
        TrackError::Upstream {
            status, message, ..
        } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn info_failure_skips_the_delete_step() {
    let server = MockServer::start();
    let register = server.mock(|when, then| {
        when.method(POST).path("/register");
        then.status(200)
            .json_body(json!({ "code": 0, "data": { "accepted": [] } }));
    });
    let info = server.mock(|when, then| {
        when.method(POST).path("/gettrackinfo");
        then.status(500).json_body(json!({ "code": -1 }));
    });
    let stop = server.mock(|when, then| {
        when.method(POST).path("/deletetrack");
        then.status(200).json_body(json!({}));
    });

    let tracker = tracker_for(&server);
    let err = tracker.track(&request("RR1")).await.unwrap_err();

    match err {
        TrackError::Upstream {
            status,
            message,
            detail,
        } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "Internal Server Error");
            assert_eq!(detail, Some(json!({ "code": -1 })));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }

    register.assert();
    info.assert();
    stop.assert_hits(0);
}

#[tokio::test]
async fn delete_body_is_reported_even_on_provider_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/register");
        then.status(200).json_body(json!({ "code": 0 }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/gettrackinfo");
        then.status(200).json_body(json!({ "code": 0 }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/deletetrack");
        then.status(500).json_body(json!({ "code": -18019902 }));
    });

    let tracker = tracker_for(&server);
    let report = tracker.track(&request("RR1")).await.unwrap();

    assert_eq!(report.stop, json!({ "code": -18019902 }));
}

#[tokio::test]
async fn unreadable_delete_body_becomes_an_empty_object() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/register");
        then.status(200).json_body(json!({ "code": 0 }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/gettrackinfo");
        then.status(200).json_body(json!({ "code": 0 }));
    });
    let stop = server.mock(|when, then| {
        when.method(POST).path("/deletetrack");
        then.status(502).body("gateway exploded");
    });

    let tracker = tracker_for(&server);
    let report = tracker.track(&request("RR1")).await.unwrap();

    stop.assert();
    assert_eq!(report.stop, json!({}));
    assert_eq!(report.register, json!({ "code": 0 }));
    assert_eq!(report.info, json!({ "code": 0 }));
}

#[tokio::test]
async fn delete_transport_failure_still_yields_a_report() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/register");
        then.status(200).json_body(json!({ "code": 0 }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/gettrackinfo");
        then.status(200).json_body(json!({ "code": 0 }));
    });
    // The delete response outlasts the client timeout, so the third call
    // dies at the transport level rather than with a bad status.
    server.mock(|when, then| {
        when.method(POST).path("/deletetrack");
        then.status(200)
            .json_body(json!({ "code": 0 }))
            .delay(std::time::Duration::from_secs(5));
    });

    let config = TrackClientConfig::new("test-key")
        .with_base_url(server.base_url())
        .with_timeout(1);
    let client = TrackClient::new(config).unwrap();
    let tracker = Tracker::new(client, Arc::new(CarrierDirectory::empty()));

    let report = tracker.track(&request("RR1")).await.unwrap();
    assert_eq!(report.stop, json!({}));
    assert_eq!(report.info, json!({ "code": 0 }));
}

#[tokio::test]
async fn unresolved_carrier_is_omitted_from_payloads() {
    let server = MockServer::start();
    let register = server.mock(|when, then| {
        when.method(POST)
            .path("/register")
            .json_body(json!([{ "number": "RR1" }]));
        then.status(200).json_body(json!({ "code": 0 }));
    });
    let info = server.mock(|when, then| {
        when.method(POST)
            .path("/gettrackinfo")
            .json_body(json!([{ "number": "RR1" }]));
        then.status(200).json_body(json!({ "code": 0 }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/deletetrack");
        then.status(200).json_body(json!({}));
    });

    let tracker = tracker_for(&server);
    tracker
        .track(&TrackingRequest {
            number: "RR1".to_string(),
            carrier: None,
            carrier_text: Some("no such carrier".to_string()),
        })
        .await
        .unwrap();

    register.assert();
    info.assert();
}

#[tokio::test]
async fn number_is_trimmed_before_upstream_calls() {
    let server = MockServer::start();
    let register = server.mock(|when, then| {
        when.method(POST)
            .path("/register")
            .json_body(json!([{ "number": "RR1", "carrier": 7 }]));
        then.status(200).json_body(json!({ "code": 0 }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/gettrackinfo");
        then.status(200).json_body(json!({ "code": 0 }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/deletetrack");
        then.status(200).json_body(json!({}));
    });

    let tracker = tracker_for(&server);
    tracker
        .track(&TrackingRequest {
            number: "  RR1  ".to_string(),
            carrier: Some(7),
            carrier_text: None,
        })
        .await
        .unwrap();

    register.assert();
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    // Nothing listens on the discard port.
    let config = TrackClientConfig::new("test-key")
        .with_base_url("http://127.0.0.1:9")
        .with_timeout(2);
    let client = TrackClient::new(config).unwrap();
    let tracker = Tracker::new(client, Arc::new(CarrierDirectory::empty()));

    let err = tracker.track(&request("RR1")).await.unwrap_err();
    assert!(matches!(err, TrackError::Transport(_)));
}
