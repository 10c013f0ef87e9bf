//! Runtime-tunable scoring thresholds
//!
//! The device can push partial configuration updates inside any telemetry
//! payload. A patch only ever *replaces* fields: absent fields keep their
//! prior value and no field can become undefined. Non-numeric wire values
//! are already dropped at the wire boundary; non-finite numbers are
//! rejected here so a stray `NaN` can never poison the thresholds.

use crate::constants::{
    DEFAULT_BASE_HUMIDITY_PCT, DEFAULT_BASE_TEMPERATURE_C, DEFAULT_DIFF_SCORE_WEIGHT,
    DEFAULT_PER_SENSOR_SCORE_WEIGHT, DEFAULT_SENSOR_DIFF_THRESHOLD, DEFAULT_SENSOR_LIMIT,
};

/// Effective scoring configuration
///
/// All fields have documented defaults and are always defined.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Config {
    /// Baseline temperature the cold room should hold, in Celsius
    pub base_temperature_c: f32,
    /// Baseline relative humidity, in percent
    pub base_humidity_pct: f32,
    /// Deviation from baseline at which a reading is out of range
    pub sensor_limit: f32,
    /// Deviation from baseline counted as major drift
    pub sensor_diff_threshold: f32,
    /// Score contribution per out-of-range reading
    pub per_sensor_score_weight: f32,
    /// Score contribution per drift/combined-deviation rule
    pub diff_score_weight: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_temperature_c: DEFAULT_BASE_TEMPERATURE_C,
            base_humidity_pct: DEFAULT_BASE_HUMIDITY_PCT,
            sensor_limit: DEFAULT_SENSOR_LIMIT,
            sensor_diff_threshold: DEFAULT_SENSOR_DIFF_THRESHOLD,
            per_sensor_score_weight: DEFAULT_PER_SENSOR_SCORE_WEIGHT,
            diff_score_weight: DEFAULT_DIFF_SCORE_WEIGHT,
        }
    }
}

/// Partial configuration update
///
/// `None` means "keep the current value". Produced by the wire decoder,
/// which maps non-numeric wire fields to `None` rather than failing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigPatch {
    pub base_temperature_c: Option<f32>,
    pub base_humidity_pct: Option<f32>,
    pub sensor_limit: Option<f32>,
    pub sensor_diff_threshold: Option<f32>,
    pub per_sensor_score_weight: Option<f32>,
    pub diff_score_weight: Option<f32>,
}

impl ConfigPatch {
    /// True if the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Holder for the current effective configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    current: Config,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current effective configuration
    pub fn get(&self) -> &Config {
        &self.current
    }

    /// Overlay present, finite fields onto the current configuration
    ///
    /// Never fails; a field that would not improve on "keep the previous
    /// value" (absent or non-finite) is ignored.
    pub fn apply_patch(&mut self, patch: &ConfigPatch) {
        overlay(&mut self.current.base_temperature_c, patch.base_temperature_c);
        overlay(&mut self.current.base_humidity_pct, patch.base_humidity_pct);
        overlay(&mut self.current.sensor_limit, patch.sensor_limit);
        overlay(
            &mut self.current.sensor_diff_threshold,
            patch.sensor_diff_threshold,
        );
        overlay(
            &mut self.current.per_sensor_score_weight,
            patch.per_sensor_score_weight,
        );
        overlay(&mut self.current.diff_score_weight, patch.diff_score_weight);
    }
}

fn overlay(field: &mut f32, update: Option<f32>) {
    if let Some(value) = update {
        if value.is_finite() {
            *field = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let store = ConfigStore::new();
        let config = store.get();

        assert_eq!(config.base_temperature_c, 20.0);
        assert_eq!(config.base_humidity_pct, 70.0);
        assert_eq!(config.sensor_limit, 6.0);
    }

    #[test]
    fn patch_changes_only_present_fields() {
        let mut store = ConfigStore::new();
        let before = *store.get();

        store.apply_patch(&ConfigPatch {
            sensor_limit: Some(8.0),
            ..ConfigPatch::default()
        });

        let after = store.get();
        assert_eq!(after.sensor_limit, 8.0);
        assert_eq!(after.base_temperature_c, before.base_temperature_c);
        assert_eq!(after.base_humidity_pct, before.base_humidity_pct);
        assert_eq!(after.sensor_diff_threshold, before.sensor_diff_threshold);
        assert_eq!(after.per_sensor_score_weight, before.per_sensor_score_weight);
        assert_eq!(after.diff_score_weight, before.diff_score_weight);
    }

    #[test]
    fn empty_patch_is_noop() {
        let mut store = ConfigStore::new();
        let before = *store.get();

        store.apply_patch(&ConfigPatch::default());
        assert_eq!(*store.get(), before);
    }

    #[test]
    fn non_finite_values_keep_previous() {
        let mut store = ConfigStore::new();

        store.apply_patch(&ConfigPatch {
            sensor_limit: Some(f32::NAN),
            base_temperature_c: Some(f32::INFINITY),
            ..ConfigPatch::default()
        });

        assert_eq!(store.get().sensor_limit, 6.0);
        assert_eq!(store.get().base_temperature_c, 20.0);
    }

    #[test]
    fn patches_accumulate() {
        let mut store = ConfigStore::new();

        store.apply_patch(&ConfigPatch {
            base_temperature_c: Some(4.0),
            ..ConfigPatch::default()
        });
        store.apply_patch(&ConfigPatch {
            sensor_limit: Some(3.0),
            ..ConfigPatch::default()
        });

        assert_eq!(store.get().base_temperature_c, 4.0);
        assert_eq!(store.get().sensor_limit, 3.0);
    }
}
