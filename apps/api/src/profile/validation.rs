//! Health profile schema validation.
//!
//! `validate_request` walks the untyped JSON payload and collects EVERY
//! violated constraint (field type, inclusive numeric range, string
//! length, enum membership, the blood-pressure co-requirement) instead
//! of stopping at the first. Unknown fields are ignored. Only a
//! payload with zero issues is deserialized into the typed model, so a
//! returned `RecommendationRequest` is range-clean by construction.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::profile::models::RecommendationRequest;

/// The closed set of accepted activity levels.
pub const ACTIVITY_LEVELS: [&str; 4] = ["sedentary", "light", "moderate", "high"];

/// Top-level numeric fields: (key, inclusive min, inclusive max).
const PROFILE_NUMBER_RULES: &[(&str, f64, f64)] = &[
    ("age", 0.0, 120.0),
    ("height_cm", 50.0, 260.0),
    ("weight_kg", 1.0, 400.0),
    ("heart_rate", 20.0, 220.0),
];

const LIFESTYLE_NUMBER_RULES: &[(&str, f64, f64)] = &[
    ("steps_per_day", 0.0, 50000.0),
    ("sleep_hours", 0.0, 24.0),
    ("sleep_quality", 1.0, 5.0),
    ("stress_level", 1.0, 5.0),
];

/// Free-text lifestyle fields: (key, max length).
const LIFESTYLE_STRING_RULES: &[(&str, usize)] = &[
    ("diet_description", 2000),
    ("smoking", 200),
    ("alcohol", 200),
];

/// One violated constraint, addressed by its dotted field path.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub constraint: String,
    pub message: String,
    pub value: Value,
}

impl ValidationIssue {
    fn new(
        path: impl Into<String>,
        constraint: &str,
        message: impl Into<String>,
        value: &Value,
    ) -> Self {
        Self {
            path: path.into(),
            constraint: constraint.to_string(),
            message: message.into(),
            value: value.clone(),
        }
    }
}

/// Validates an arbitrary payload against the recommendation request
/// schema. Returns the typed request, or the full list of violations.
pub fn validate_request(payload: &Value) -> Result<RecommendationRequest, Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    let Some(root) = payload.as_object() else {
        return Err(vec![ValidationIssue::new(
            "",
            "type",
            "expected an object",
            payload,
        )]);
    };

    if let Some(user_id) = root.get("userId") {
        if !user_id.is_null() {
            match user_id.as_str() {
                Some(id) if id.chars().count() > 200 => issues.push(ValidationIssue::new(
                    "userId",
                    "max_length",
                    "must be at most 200 characters",
                    user_id,
                )),
                Some(_) => {}
                None => issues.push(ValidationIssue::new(
                    "userId",
                    "type",
                    "expected a string or null",
                    user_id,
                )),
            }
        }
    }

    match root.get("profile") {
        Some(Value::Object(profile)) => validate_profile(profile, "profile", &mut issues),
        Some(other) => issues.push(ValidationIssue::new(
            "profile",
            "type",
            "expected an object",
            other,
        )),
        None => issues.push(ValidationIssue::new(
            "profile",
            "required",
            "profile is required",
            &Value::Null,
        )),
    }

    if !issues.is_empty() {
        return Err(issues);
    }

    // A clean pass guarantees this succeeds; the fallback covers drift
    // between the rules above and the typed model.
    serde_json::from_value(payload.clone())
        .map_err(|err| vec![ValidationIssue::new("", "structure", err.to_string(), payload)])
}

fn validate_profile(profile: &Map<String, Value>, path: &str, issues: &mut Vec<ValidationIssue>) {
    for &(key, min, max) in PROFILE_NUMBER_RULES {
        check_number(profile, path, key, min, max, false, issues);
    }
    check_string(profile, path, "sex", Some(100), issues);
    check_string(profile, path, "work_type", Some(200), issues);

    if let Some(bp) = object_field(profile, path, "blood_pressure", issues) {
        let bp_path = join_path(path, "blood_pressure");
        check_number(bp, &bp_path, "systolic", 50.0, 260.0, true, issues);
        check_number(bp, &bp_path, "diastolic", 30.0, 200.0, true, issues);
        check_string(bp, &bp_path, "measured_at", None, issues);
    }

    for key in ["conditions", "medications", "allergies"] {
        check_string_list(profile, path, key, issues);
    }

    if let Some(lifestyle) = object_field(profile, path, "lifestyle", issues) {
        let lifestyle_path = join_path(path, "lifestyle");
        check_enum(lifestyle, &lifestyle_path, "activity_level", &ACTIVITY_LEVELS, issues);
        for &(key, min, max) in LIFESTYLE_NUMBER_RULES {
            check_number(lifestyle, &lifestyle_path, key, min, max, false, issues);
        }
        for &(key, max) in LIFESTYLE_STRING_RULES {
            check_string(lifestyle, &lifestyle_path, key, Some(max), issues);
        }
        if let Some(exercise) = object_field(lifestyle, &lifestyle_path, "exercise", issues) {
            let exercise_path = join_path(&lifestyle_path, "exercise");
            check_number(exercise, &exercise_path, "sessions_per_week", 0.0, 21.0, false, issues);
            check_number(exercise, &exercise_path, "minutes_per_session", 0.0, 500.0, false, issues);
            check_string_list(exercise, &exercise_path, "types", issues);
        }
    }

    if let Some(location) = object_field(profile, path, "location", issues) {
        let location_path = join_path(path, "location");
        check_string(location, &location_path, "city", Some(200), issues);
        check_string(location, &location_path, "country", Some(200), issues);
        check_number(location, &location_path, "latitude", -90.0, 90.0, false, issues);
        check_number(location, &location_path, "longitude", -180.0, 180.0, false, issues);
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn check_number(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
    min: f64,
    max: f64,
    required: bool,
    issues: &mut Vec<ValidationIssue>,
) {
    let path = join_path(parent, key);
    let Some(value) = obj.get(key) else {
        if required {
            issues.push(ValidationIssue::new(
                path,
                "required",
                format!("{key} is required"),
                &Value::Null,
            ));
        }
        return;
    };
    let Some(number) = value.as_f64() else {
        issues.push(ValidationIssue::new(path, "type", "expected a number", value));
        return;
    };
    if number < min {
        issues.push(ValidationIssue::new(
            path,
            "min",
            format!("must be at least {min}"),
            value,
        ));
    } else if number > max {
        issues.push(ValidationIssue::new(
            path,
            "max",
            format!("must be at most {max}"),
            value,
        ));
    }
}

fn check_string(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
    max_len: Option<usize>,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(value) = obj.get(key) else { return };
    let path = join_path(parent, key);
    let Some(text) = value.as_str() else {
        issues.push(ValidationIssue::new(path, "type", "expected a string", value));
        return;
    };
    if let Some(max) = max_len {
        if text.chars().count() > max {
            issues.push(ValidationIssue::new(
                path,
                "max_length",
                format!("must be at most {max} characters"),
                value,
            ));
        }
    }
}

fn check_string_list(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(value) = obj.get(key) else { return };
    let path = join_path(parent, key);
    let Some(items) = value.as_array() else {
        issues.push(ValidationIssue::new(
            path,
            "type",
            "expected an array of strings",
            value,
        ));
        return;
    };
    for (index, item) in items.iter().enumerate() {
        if !item.is_string() {
            issues.push(ValidationIssue::new(
                format!("{path}.{index}"),
                "type",
                "expected a string",
                item,
            ));
        }
    }
}

fn check_enum(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
    allowed: &[&str],
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(value) = obj.get(key) else { return };
    let path = join_path(parent, key);
    let Some(text) = value.as_str() else {
        issues.push(ValidationIssue::new(path, "type", "expected a string", value));
        return;
    };
    if !allowed.contains(&text) {
        issues.push(ValidationIssue::new(
            path,
            "enum",
            format!("must be one of: {}", allowed.join(", ")),
            value,
        ));
    }
}

fn object_field<'a>(
    obj: &'a Map<String, Value>,
    parent: &str,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<&'a Map<String, Value>> {
    let value = obj.get(key)?;
    match value.as_object() {
        Some(map) => Some(map),
        None => {
            issues.push(ValidationIssue::new(
                join_path(parent, key),
                "type",
                "expected an object",
                value,
            ));
            None
        }
    }
}
