//! Property tests for the bounded-window and scoring invariants

use proptest::prelude::*;

use coldwatch_core::{
    payload::Label, score, Config, ConfigPatch, ConfigStore, DoorEvent, DoorStateTracker,
    SensorReading, SeriesBuffer,
};

fn arb_reading() -> impl Strategy<Value = SensorReading> {
    (any::<u32>(), -1.0e6f32..1.0e6, -1.0e6f32..1.0e6).prop_map(|(sensor_id, t, h)| {
        SensorReading {
            sensor_id,
            temperature_c: t,
            humidity_pct: h,
        }
    })
}

fn closed_doors() -> DoorStateTracker {
    let mut tracker = DoorStateTracker::new();
    for id in [0, 1] {
        tracker
            .apply(
                &DoorEvent {
                    door_id: id,
                    is_open: false,
                    changed_at: None,
                },
                0,
            )
            .unwrap();
    }
    tracker
}

proptest! {
    #[test]
    fn score_stays_in_unit_interval(readings in prop::collection::vec(arb_reading(), 0..16)) {
        let tracker = closed_doors();
        let result = score(&readings, tracker.list(), &Config::default());

        prop_assert!(result.score >= 0.0);
        prop_assert!(result.score <= 1.0);
        prop_assert!(!result.reasons.is_empty());
    }

    #[test]
    fn score_is_deterministic(readings in prop::collection::vec(arb_reading(), 0..16)) {
        let tracker = closed_doors();
        let config = Config::default();

        let a = score(&readings, tracker.list(), &config);
        let b = score(&readings, tracker.list(), &config);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn fallback_reason_iff_nothing_fired(
        temperature in -1.0e3f32..1.0e3,
        humidity in -1.0e3f32..1.0e3,
    ) {
        let tracker = closed_doors();
        let config = Config::default();
        let reading = SensorReading { sensor_id: 0, temperature_c: temperature, humidity_pct: humidity };
        let result = score(&[reading], tracker.list(), &config);

        let fallback = result.reasons.iter().any(|r| r.contains("normal"));
        let in_range = (temperature - config.base_temperature_c).abs() < config.sensor_limit
            && (humidity - config.base_humidity_pct).abs() < config.sensor_limit;

        prop_assert_eq!(fallback, in_range);
        if fallback {
            prop_assert_eq!(result.reasons.len(), 1);
            prop_assert_eq!(result.score, 0.0);
        }
    }

    #[test]
    fn window_keeps_last_min_n_c_points(values in prop::collection::vec(-100.0f32..100.0, 0..40)) {
        const CAPACITY: usize = 12;
        let mut buffer: SeriesBuffer<CAPACITY> = SeriesBuffer::new();

        for (i, v) in values.iter().enumerate() {
            buffer.push(*v, 50.0, Label::from_elapsed(i as u64 * 1000));
        }

        let expected_len = values.len().min(CAPACITY);
        prop_assert_eq!(buffer.len(), expected_len);

        let kept: Vec<f32> = buffer.iter().map(|p| p.temperature_c).collect();
        let expected: Vec<f32> = values[values.len() - expected_len..].to_vec();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn patch_changes_exactly_the_named_field(limit in 0.1f32..100.0) {
        let mut store = ConfigStore::new();
        let before = *store.get();

        store.apply_patch(&ConfigPatch { sensor_limit: Some(limit), ..Default::default() });

        let after = *store.get();
        prop_assert_eq!(after.sensor_limit, limit);
        prop_assert_eq!(after.base_temperature_c, before.base_temperature_c);
        prop_assert_eq!(after.base_humidity_pct, before.base_humidity_pct);
        prop_assert_eq!(after.sensor_diff_threshold, before.sensor_diff_threshold);
        prop_assert_eq!(after.per_sensor_score_weight, before.per_sensor_score_weight);
        prop_assert_eq!(after.diff_score_weight, before.diff_score_weight);
    }
}
