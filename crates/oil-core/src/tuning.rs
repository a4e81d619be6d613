//! Runtime-adjustable numeric parameters.
//!
//! A tuning collaborator (debug panel, JS bindings, CLI preset) discovers
//! parameters through [`Tunable::params`] and writes them through
//! [`Tunable::set`]. Nothing here depends on a collaborator being present;
//! without one, the defaults simply stay in place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Declared range of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: Option<f32>,
}

impl ParamSpec {
    pub const fn new(name: &'static str, label: &'static str, min: f32, max: f32) -> Self {
        Self {
            name,
            label,
            min,
            max,
            step: None,
        }
    }

    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = Some(step);
        self
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

pub trait Tunable {
    /// Prefix used in preset keys, e.g. `"trail"` for `"trail.strength"`.
    fn group(&self) -> &'static str;

    fn params(&self) -> &'static [ParamSpec];

    fn value(&self, name: &str) -> Option<f32>;

    /// Writes a value that has already been range-checked.
    fn store(&mut self, name: &str, value: f32);

    /// Validates, clamps and stores `value`; returns what was stored.
    /// Takes effect on the next draw.
    fn set(&mut self, name: &str, value: f32) -> Result<f32, TuningError> {
        let spec = self
            .params()
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| TuningError::UnknownParam(name.to_string()))?;
        if !value.is_finite() {
            return Err(TuningError::NotFinite {
                name: name.to_string(),
                value,
            });
        }
        let clamped = spec.clamp(value);
        self.store(name, clamped);
        Ok(clamped)
    }
}

/// One parameter as reported to a tuning UI, including its live value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamState {
    pub key: String,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: Option<f32>,
    pub value: f32,
}

pub fn describe(tunable: &dyn Tunable) -> Vec<ParamState> {
    tunable
        .params()
        .iter()
        .filter_map(|spec| {
            Some(ParamState {
                key: format!("{}.{}", tunable.group(), spec.name),
                label: spec.label,
                min: spec.min,
                max: spec.max,
                step: spec.step,
                value: tunable.value(spec.name)?,
            })
        })
        .collect()
}

/// Splits `"group.name"` into its parts.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    let (group, name) = key.split_once('.')?;
    if group.is_empty() || name.is_empty() {
        return None;
    }
    Some((group, name))
}

/// Saved parameter values keyed by `"group.name"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TuningPreset {
    values: BTreeMap<String, f32>,
}

impl TuningPreset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        serde_json::from_str(json).map_err(|e| TuningError::Preset(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        // A string-keyed map of floats always serialises.
        serde_json::to_string_pretty(&self.values).unwrap_or_default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f32) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Records every current value of `tunable`.
    pub fn capture(&mut self, tunable: &dyn Tunable) {
        for state in describe(tunable) {
            self.values.insert(state.key, state.value);
        }
    }

    /// Applies the entries belonging to `tunable`'s group. Bad entries are
    /// logged and skipped. Returns how many were applied.
    pub fn apply_to(&self, tunable: &mut dyn Tunable) -> usize {
        let group = tunable.group();
        let mut applied = 0;
        for (key, &value) in &self.values {
            let Some((g, name)) = split_key(key) else {
                log::warn!("[tuning] ignoring malformed preset key `{key}`");
                continue;
            };
            if g != group {
                continue;
            }
            match tunable.set(name, value) {
                Ok(_) => applied += 1,
                Err(e) => log::warn!("[tuning] preset entry `{key}` skipped: {e}"),
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Knobs {
        gain: f32,
    }

    const KNOB_PARAMS: &[ParamSpec] = &[ParamSpec::new("gain", "gain", 0.0, 2.0).with_step(0.1)];

    impl Tunable for Knobs {
        fn group(&self) -> &'static str {
            "knobs"
        }
        fn params(&self) -> &'static [ParamSpec] {
            KNOB_PARAMS
        }
        fn value(&self, name: &str) -> Option<f32> {
            (name == "gain").then_some(self.gain)
        }
        fn store(&mut self, name: &str, value: f32) {
            if name == "gain" {
                self.gain = value;
            }
        }
    }

    #[test]
    fn set_clamps_and_rejects() {
        let mut knobs = Knobs { gain: 1.0 };
        assert_eq!(knobs.set("gain", 5.0), Ok(2.0));
        assert_eq!(knobs.gain, 2.0);
        assert_eq!(
            knobs.set("volume", 1.0),
            Err(TuningError::UnknownParam("volume".into()))
        );
        assert!(matches!(
            knobs.set("gain", f32::NAN),
            Err(TuningError::NotFinite { .. })
        ));
        assert_eq!(knobs.gain, 2.0);
    }

    #[test]
    fn preset_round_trips_through_json() {
        let mut knobs = Knobs { gain: 0.7 };
        let mut preset = TuningPreset::new();
        preset.capture(&knobs);
        assert_eq!(preset.get("knobs.gain"), Some(0.7));

        let restored = TuningPreset::from_json(&preset.to_json()).unwrap();
        knobs.gain = 0.0;
        assert_eq!(restored.apply_to(&mut knobs), 1);
        assert!((knobs.gain - 0.7).abs() < 1e-6);
    }

    #[test]
    fn preset_skips_foreign_and_malformed_keys() {
        let preset =
            TuningPreset::from_json(r#"{"other.gain": 0.1, "nodot": 1.0, "knobs.bogus": 1.0}"#)
                .unwrap();
        let mut knobs = Knobs { gain: 1.0 };
        assert_eq!(preset.apply_to(&mut knobs), 0);
        assert_eq!(knobs.gain, 1.0);
        assert!(TuningPreset::from_json("[1, 2]").is_err());
    }
}
