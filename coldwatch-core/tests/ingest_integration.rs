//! End-to-end tests for the ingestion cycle
//!
//! Drives the processor the way the host does: raw JSON documents in,
//! snapshots out, with explicit timestamps standing in for the event
//! loop's clock.

use coldwatch_core::{
    ConnectivityWatchdog, DoorPosition, IngestError, Severity, TelemetryIngestor,
};

fn ingestor() -> TelemetryIngestor {
    TelemetryIngestor::new()
}

fn has_reason(snapshot: &coldwatch_core::Snapshot, fragment: &str) -> bool {
    snapshot
        .anomaly
        .as_ref()
        .expect("online snapshot carries an anomaly result")
        .reasons
        .iter()
        .any(|r| r.contains(fragment))
}

#[test]
fn baseline_payload_scores_zero_with_door_reason() {
    // Spec scenario: readings exactly at baseline, both doors reporting
    // open (wire state 1 = open).
    let mut ingestor = ingestor();
    let snapshot = ingestor
        .ingest_json(
            r#"{
                "deviceId": "cs-gw-01",
                "location": "Cold Room A",
                "firmwareVersion": "2.4.1",
                "ts": 1724760000,
                "dht22": [{"id": 0, "temperature": 20.0, "humidity": 70.0}],
                "doors": [{"id": 0, "state": 1}, {"id": 1, "state": 1}]
            }"#,
            1_000,
        )
        .unwrap();

    let anomaly = snapshot.anomaly.as_ref().unwrap();
    assert_eq!(anomaly.score, 0.0);
    assert_eq!(anomaly.severity, Severity::Normal);
    assert!(has_reason(&snapshot, "Door 1 & Door 2 are open"));
    assert!(snapshot.connectivity.online);
}

#[test]
fn out_of_range_temperature_scores_and_names_the_rule() {
    // tempDelta = 8 >= default limit 6
    let mut ingestor = ingestor();
    let snapshot = ingestor
        .ingest_json(
            r#"{
                "dht22": [{"id": 0, "temperature": 28.0, "humidity": 70.0}],
                "doors": [{"id": 0, "state": 0}, {"id": 1, "state": 0}]
            }"#,
            1_000,
        )
        .unwrap();

    let anomaly = snapshot.anomaly.as_ref().unwrap();
    assert!(anomaly.score >= ingestor.config().per_sensor_score_weight);
    assert!(has_reason(&snapshot, "out of range"));
}

#[test]
fn silence_goes_offline_and_resets_doors() {
    let mut ingestor: TelemetryIngestor =
        TelemetryIngestor::with_watchdog(ConnectivityWatchdog::new(15_000));

    ingestor
        .ingest_json(
            r#"{
                "dht22": [{"id": 0, "temperature": 18.0, "humidity": 70.0}],
                "doors": [{"id": 0, "state": 1}]
            }"#,
            0,
        )
        .unwrap();
    assert!(ingestor.connectivity().online);

    // Inside the timeout: nothing fires
    assert!(ingestor.poll(14_999).is_none());

    // One millisecond past the timeout
    let offline = ingestor.poll(15_001).expect("watchdog fires after the gap");

    assert!(offline.is_offline());
    assert!(offline.summary.is_none());
    assert!(offline.anomaly.is_none());
    for door in offline.doors.iter() {
        assert_eq!(door.position, DoorPosition::Unknown);
    }
}

#[test]
fn window_length_never_exceeds_capacity() {
    let mut ingestor = ingestor();

    for i in 0..100u64 {
        let snapshot = ingestor
            .ingest_json(
                r#"{"dht22": [{"id": 3, "temperature": 18.0, "humidity": 70.0}]}"#,
                i * 3_000,
            )
            .unwrap();

        for window in snapshot.series.iter() {
            assert!(window.points.len() <= 12);
        }
    }

    let last = ingestor.ingest_json(
        r#"{"dht22": [{"id": 3, "temperature": 19.0, "humidity": 71.0}]}"#,
        400_000,
    );
    let snapshot = last.unwrap();
    assert_eq!(snapshot.window(3).unwrap().points.len(), 12);
    // Newest point is the one just pushed
    let newest = snapshot.window(3).unwrap().points.last().unwrap();
    assert_eq!(newest.temperature_c, 19.0);
}

#[test]
fn malformed_payload_is_isolated() {
    let mut ingestor = ingestor();

    ingestor
        .ingest_json(r#"{"dht22": [{"id": 0, "temperature": 18.0, "humidity": 70.0}]}"#, 0)
        .unwrap();

    let err = ingestor.ingest_json("definitely not json", 1_000).unwrap_err();
    assert!(matches!(err, IngestError::MalformedPayload { .. }));

    // Prior state untouched: still online, window still has one point
    assert!(ingestor.connectivity().online);
    assert_eq!(ingestor.connectivity().last_event_at, Some(0));

    // And the next good payload processes normally
    let snapshot = ingestor
        .ingest_json(r#"{"dht22": [{"id": 0, "temperature": 18.1, "humidity": 70.2}]}"#, 2_000)
        .unwrap();
    assert_eq!(snapshot.window(0).unwrap().points.len(), 2);
}

#[test]
fn array_wrapped_payload_uses_first_element() {
    let mut ingestor = ingestor();
    let snapshot = ingestor
        .ingest_json(
            r#"[{"deviceId": "cs-gw-02", "dht22": [{"id": 0, "temperature": 18.0, "humidity": 70.0}]}]"#,
            0,
        )
        .unwrap();

    assert_eq!(snapshot.summary.as_ref().unwrap().device_id.as_str(), "cs-gw-02");
}

#[test]
fn legacy_flat_door_fields_apply() {
    let mut ingestor = ingestor();
    let snapshot = ingestor
        .ingest_json(r#"{"dht22": [], "door1": false, "door2": true}"#, 0)
        .unwrap();

    assert_eq!(snapshot.doors[0].position, DoorPosition::Closed);
    assert_eq!(snapshot.doors[1].position, DoorPosition::Open);
    assert!(has_reason(&snapshot, "Door 2 is open"));
}

#[test]
fn config_patch_persists_across_payloads() {
    let mut ingestor = ingestor();

    ingestor
        .ingest_json(
            r#"{"dht22": [], "config": {"baseTemp": 4.0, "sensorLimit": 3.0}}"#,
            0,
        )
        .unwrap();
    assert_eq!(ingestor.config().base_temperature_c, 4.0);
    assert_eq!(ingestor.config().sensor_limit, 3.0);
    // Unpatched fields keep their defaults
    assert_eq!(ingestor.config().base_humidity_pct, 70.0);

    // A 7.5 degree reading is now 3.5 over the patched baseline: out of range
    let snapshot = ingestor
        .ingest_json(
            r#"{
                "dht22": [{"id": 0, "temperature": 7.5, "humidity": 70.0}],
                "doors": [{"id": 0, "state": 0}, {"id": 1, "state": 0}]
            }"#,
            3_000,
        )
        .unwrap();
    assert!(has_reason(&snapshot, "temperature out of range"));
}

#[test]
fn unknown_door_id_skipped_rest_of_payload_processed() {
    let mut ingestor = ingestor();
    let snapshot = ingestor
        .ingest_json(
            r#"{
                "dht22": [{"id": 0, "temperature": 18.0, "humidity": 70.0}],
                "doors": [{"id": 42, "state": 1}, {"id": 0, "state": 0}]
            }"#,
            0,
        )
        .unwrap();

    // The unknown id changed nothing, the known one landed
    assert_eq!(snapshot.doors[0].position, DoorPosition::Closed);
    assert_eq!(snapshot.window(0).unwrap().points.len(), 1);
}

#[test]
fn snapshot_serializes_for_consumers() {
    let mut ingestor = ingestor();
    let snapshot = ingestor
        .ingest_json(
            r#"{
                "deviceId": "cs-gw-01",
                "dht22": [{"id": 0, "temperature": 28.0, "humidity": 70.0}],
                "doors": [{"id": 0, "state": 1}]
            }"#,
            0,
        )
        .unwrap();

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"cs-gw-01\""));
    assert!(json.contains("out of range"));
}
