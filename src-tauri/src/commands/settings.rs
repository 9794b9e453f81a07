use crate::error::ScorecardError;
use crate::models::scale::{MAX_SCORE, MIN_SCORE};
use crate::models::scorecard::MAX_COMPETITORS;
use crate::render::palette::ColorScheme;
use crate::session::{lock_session, SharedSession};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 1;

pub const STORE_PATH_ENV: &str = "SCORECARD_STORE_PATH";
const STORE_FILE_NAME: &str = "scorecard.db";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardSettings {
    pub max_competitors: usize,
    pub default_score: u8,
    pub color_scheme: ColorScheme,
    pub show_radar_on_load: bool,
}

impl Default for ScorecardSettings {
    fn default() -> Self {
        Self {
            max_competitors: MAX_COMPETITORS,
            default_score: MIN_SCORE,
            color_scheme: ColorScheme::Green,
            show_radar_on_load: false,
        }
    }
}

/// Where the durable store and its settings file live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub store_file: PathBuf,
    pub settings_file: PathBuf,
}

impl StorePaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self::for_store_file(dir.join(STORE_FILE_NAME))
    }

    /// Settings always sit next to the store file.
    pub fn for_store_file(store_file: PathBuf) -> Self {
        let settings_file = store_file
            .parent()
            .map(|dir| dir.join(SETTINGS_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME));
        Self {
            store_file,
            settings_file,
        }
    }

    /// `SCORECARD_STORE_PATH` wins over the app data directory.
    pub fn resolve(store_override: Option<String>, app_data_dir: &Path) -> Self {
        match store_override.filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => Self::for_store_file(PathBuf::from(raw.trim())),
            None => Self::in_dir(app_data_dir),
        }
    }
}

#[tauri::command]
pub async fn get_settings(
    session: tauri::State<'_, SharedSession>,
) -> Result<Value, ScorecardError> {
    get_settings_internal(session.inner())
}

#[tauri::command]
pub async fn save_settings(
    settings: Value,
    session: tauri::State<'_, SharedSession>,
) -> Result<Value, ScorecardError> {
    save_settings_internal(session.inner(), settings)
}

pub fn get_settings_internal(session: &SharedSession) -> Result<Value, ScorecardError> {
    let path = lock_session(session).paths.settings_file.clone();
    load_settings_from_disk(&path)
}

/// Merges `incoming` into the saved settings and applies the result to the live session.
pub fn save_settings_internal(
    session: &SharedSession,
    incoming: Value,
) -> Result<Value, ScorecardError> {
    let mut guard = lock_session(session);
    let saved = save_settings_to_disk(&guard.paths.settings_file, incoming)?;
    guard.settings = effective_settings(&saved);
    log::info!("settings updated: {:?}", guard.settings);
    Ok(saved)
}

/// Typed view of the settings file; anything unreadable falls back to defaults.
pub fn load_effective_settings(path: &Path) -> ScorecardSettings {
    match load_settings_from_disk(path) {
        Ok(value) => effective_settings(&value),
        Err(err) => {
            log::warn!("using default settings: {err}");
            ScorecardSettings::default()
        }
    }
}

pub fn effective_settings(value: &Value) -> ScorecardSettings {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

pub fn load_settings_from_disk(path: &Path) -> Result<Value, ScorecardError> {
    ensure_parent_dir(path)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(path).map_err(|e| {
            ScorecardError::StoreUnavailable(format!("failed to read settings.json: {e}"))
        })?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| json!({}))
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(path, &migrated)?;
    }

    Ok(migrated)
}

pub fn save_settings_to_disk(path: &Path, incoming: Value) -> Result<Value, ScorecardError> {
    ensure_parent_dir(path)?;

    let mut merged = load_settings_from_disk(path).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &incoming);

    let migrated = migrate_settings(merged);
    write_settings_file(path, &migrated)?;
    Ok(migrated)
}

fn ensure_parent_dir(path: &Path) -> Result<(), ScorecardError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir).map_err(|e| {
            ScorecardError::StoreUnavailable(format!(
                "failed to create {}: {e}",
                dir.display()
            ))
        }),
        _ => Ok(()),
    }
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<(), ScorecardError> {
    let raw = serde_json::to_string_pretty(settings).map_err(|e| {
        ScorecardError::StoreUnavailable(format!("failed to serialize settings: {e}"))
    })?;
    fs::write(path, raw).map_err(|e| {
        ScorecardError::StoreUnavailable(format!("failed to write settings.json: {e}"))
    })
}

fn migrate_settings(input: Value) -> Value {
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    fill_defaults(&mut out, &default_settings());
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    let defaults = ScorecardSettings::default();
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "maxCompetitors": defaults.max_competitors,
        "defaultScore": defaults.default_score,
        "colorScheme": defaults.color_scheme,
        "showRadarOnLoad": defaults.show_radar_on_load
    })
}

fn fill_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object())
    else {
        return;
    };

    for (key, default_value) in default_obj {
        target_obj
            .entry(key.clone())
            .or_insert_with(|| default_value.clone());
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    let (Some(target_obj), Some(incoming_obj)) = (target.as_object_mut(), incoming.as_object())
    else {
        return;
    };

    for (key, value) in incoming_obj {
        if key == "schema_version" {
            continue;
        }
        target_obj.insert(key.clone(), value.clone());
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(obj, "maxCompetitors", 1, MAX_COMPETITORS as u64, MAX_COMPETITORS as u64);
    clamp_u64(obj, "defaultScore", MIN_SCORE as u64, MAX_SCORE as u64, MIN_SCORE as u64);
    sanitize_enum(obj, "colorScheme", &ColorScheme::NAMES, "green");
    ensure_bool(obj, "showRadarOnLoad", false);
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn sanitize_enum(map: &mut Map<String, Value>, key: &str, allowed: &[&str], default: &str) {
    let valid = map
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| allowed.contains(value))
        .unwrap_or(default);
    map.insert(key.to_string(), json!(valid));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}
