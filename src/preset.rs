// Preset persistence helpers. Kept free of web-sys so host tests can include
// this file directly.

use oil_core::TuningPreset;

/// Reads a preset previously written to storage. Missing or unreadable
/// data means "no preset": the defaults stay in place.
pub fn parse_stored(raw: Option<&str>) -> Option<TuningPreset> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match TuningPreset::from_json(raw) {
        Ok(preset) if !preset.is_empty() => Some(preset),
        Ok(_) => None,
        Err(e) => {
            log::warn!("[tuning] ignoring stored preset: {e}");
            None
        }
    }
}

/// Serialises the live values for storage.
pub fn to_stored(preset: &TuningPreset) -> String {
    preset.to_json()
}
