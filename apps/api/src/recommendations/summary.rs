//! Profile summary builder.
//!
//! Pure, deterministic transformation of a validated profile into the
//! human-readable text block embedded in the assistant prompt. Group
//! order is fixed: identity → vitals → conditions/medications/allergies
//! → lifestyle → location → work type. A line is emitted only when its
//! value is present; empty strings and empty lists count as absent.

use crate::profile::models::{HealthProfile, Lifestyle};

/// Renders one "Label: value" line per present field, joined by newlines.
/// An entirely empty profile yields an empty string.
pub fn build_user_summary(profile: &HealthProfile) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(age) = profile.age {
        parts.push(format!("Age: {age}"));
    }
    if let Some(sex) = non_empty(&profile.sex) {
        parts.push(format!("Sex/Gender: {sex}"));
    }
    if let Some(height) = profile.height_cm {
        parts.push(format!("Height: {height} cm"));
    }
    if let Some(weight) = profile.weight_kg {
        parts.push(format!("Weight: {weight} kg"));
    }
    if let (Some(height), Some(weight)) = (profile.height_cm, profile.weight_kg) {
        let meters = height / 100.0;
        parts.push(format!("BMI: {:.1}", weight / (meters * meters)));
    }

    if let Some(bp) = &profile.blood_pressure {
        let measured = non_empty(&bp.measured_at)
            .map(|date| format!(" measured on {date}"))
            .unwrap_or_default();
        parts.push(format!(
            "Blood pressure: {}/{}{measured}",
            bp.systolic, bp.diastolic
        ));
    }
    if let Some(heart_rate) = profile.heart_rate {
        parts.push(format!("Heart rate: {heart_rate}"));
    }

    if let Some(conditions) = list(&profile.conditions) {
        parts.push(format!("Known conditions: {}", conditions.join(", ")));
    }
    if let Some(medications) = list(&profile.medications) {
        parts.push(format!("Medications: {}", medications.join("; ")));
    }
    if let Some(allergies) = list(&profile.allergies) {
        parts.push(format!("Allergies: {}", allergies.join("; ")));
    }

    if let Some(lifestyle) = &profile.lifestyle {
        let details = lifestyle_details(lifestyle);
        if !details.is_empty() {
            parts.push(format!("Lifestyle: {}", details.join(" | ")));
        }
    }

    if let Some(location) = &profile.location {
        let place: Vec<&str> = [non_empty(&location.city), non_empty(&location.country)]
            .into_iter()
            .flatten()
            .collect();
        let place = place.join(", ");
        let coords = match (location.latitude, location.longitude) {
            (Some(lat), Some(lon)) => format!(" ({lat}, {lon})"),
            _ => String::new(),
        };
        if !place.is_empty() || !coords.is_empty() {
            parts.push(format!("Location: {place}{coords}"));
        }
    }

    if let Some(work_type) = non_empty(&profile.work_type) {
        parts.push(format!("Work type: {work_type}"));
    }

    parts.join("\n")
}

/// Lifestyle sub-fields fold into one pipe-separated line; exercise
/// sub-parts merge further into a single semicolon-separated segment.
fn lifestyle_details(lifestyle: &Lifestyle) -> Vec<String> {
    let mut details: Vec<String> = Vec::new();

    if let Some(level) = lifestyle.activity_level {
        details.push(format!("Activity level: {}", level.as_str()));
    }
    if let Some(steps) = lifestyle.steps_per_day {
        details.push(format!("Steps per day: {steps}"));
    }
    if let Some(exercise) = &lifestyle.exercise {
        let mut segments: Vec<String> = Vec::new();
        if let Some(sessions) = exercise.sessions_per_week {
            segments.push(format!("{sessions} sessions/week"));
        }
        if let Some(minutes) = exercise.minutes_per_session {
            segments.push(format!("{minutes} minutes/session"));
        }
        if let Some(types) = list(&exercise.types) {
            segments.push(format!("Types: {}", types.join(", ")));
        }
        if !segments.is_empty() {
            details.push(format!("Exercise: {}", segments.join("; ")));
        }
    }
    if let Some(diet) = non_empty(&lifestyle.diet_description) {
        details.push(format!("Diet: {diet}"));
    }
    if let Some(hours) = lifestyle.sleep_hours {
        details.push(format!("Sleep hours: {hours}"));
    }
    if let Some(quality) = lifestyle.sleep_quality {
        details.push(format!("Sleep quality (1-5): {quality}"));
    }
    if let Some(stress) = lifestyle.stress_level {
        details.push(format!("Stress level (1-5): {stress}"));
    }
    if let Some(smoking) = non_empty(&lifestyle.smoking) {
        details.push(format!("Smoking: {smoking}"));
    }
    if let Some(alcohol) = non_empty(&lifestyle.alcohol) {
        details.push(format!("Alcohol: {alcohol}"));
    }

    details
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

fn list(value: &Option<Vec<String>>) -> Option<&[String]> {
    value.as_deref().filter(|items| !items.is_empty())
}
