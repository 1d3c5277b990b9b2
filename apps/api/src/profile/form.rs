#![allow(dead_code)]

//! Client-side wizard form model.
//!
//! Mirrors the multi-step intake form: every numeric input is held as
//! free text while the user types, then coerced once on submit. Server
//! validation stays authoritative; this exists so a form frontend can
//! build a clean payload and show a live BMI preview.

use crate::profile::models::{
    ActivityLevel, BloodPressure, ExerciseDetails, HealthProfile, Lifestyle, LocationInfo,
    RecommendationRequest,
};

/// Raw wizard state across the Basics → Vitals → Medical → Lifestyle →
/// Location → Review steps.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub age: String,
    pub sex: String,
    pub height_cm: String,
    pub weight_kg: String,
    pub systolic: String,
    pub diastolic: String,
    pub measured_at: String,
    pub heart_rate: String,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
    pub activity_level: ActivityLevel,
    pub steps_per_day: String,
    pub sessions_per_week: String,
    pub minutes_per_session: String,
    pub exercise_types: Vec<String>,
    pub diet_description: String,
    pub sleep_hours: String,
    pub sleep_quality: String,
    pub stress_level: String,
    pub smoking: String,
    pub alcohol: String,
    pub city: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
    pub work_type: String,
}

impl ProfileForm {
    /// Live BMI preview shown on the basics step, one decimal place.
    pub fn bmi_preview(&self) -> Option<String> {
        let height = number(&self.height_cm)?;
        let weight = number(&self.weight_kg)?;
        if height <= 0.0 {
            return None;
        }
        let meters = height / 100.0;
        Some(format!("{:.1}", weight / (meters * meters)))
    }

    /// Coerces the raw form state into a submission payload. Empty and
    /// unparsable numeric inputs become absent fields; a blood pressure
    /// reading is included only when both sides are filled in, since a
    /// half-filled reading can never pass server validation.
    pub fn sanitize(&self) -> RecommendationRequest {
        let blood_pressure = match (number(&self.systolic), number(&self.diastolic)) {
            (Some(systolic), Some(diastolic)) => Some(BloodPressure {
                systolic,
                diastolic,
                measured_at: text(&self.measured_at),
            }),
            _ => None,
        };

        let exercise = {
            let sessions_per_week = number(&self.sessions_per_week);
            let minutes_per_session = number(&self.minutes_per_session);
            let types = string_list(&self.exercise_types);
            if sessions_per_week.is_none() && minutes_per_session.is_none() && types.is_none() {
                None
            } else {
                Some(ExerciseDetails {
                    sessions_per_week,
                    minutes_per_session,
                    types,
                })
            }
        };

        let lifestyle = Lifestyle {
            activity_level: Some(self.activity_level),
            steps_per_day: number(&self.steps_per_day),
            exercise,
            diet_description: text(&self.diet_description),
            sleep_hours: number(&self.sleep_hours),
            sleep_quality: number(&self.sleep_quality),
            stress_level: number(&self.stress_level),
            smoking: text(&self.smoking),
            alcohol: text(&self.alcohol),
        };

        let location = {
            let city = text(&self.city);
            let country = text(&self.country);
            let latitude = number(&self.latitude);
            let longitude = number(&self.longitude);
            if city.is_none() && country.is_none() && latitude.is_none() && longitude.is_none() {
                None
            } else {
                Some(LocationInfo {
                    city,
                    country,
                    latitude,
                    longitude,
                })
            }
        };

        RecommendationRequest {
            user_id: None,
            profile: HealthProfile {
                age: number(&self.age),
                sex: text(&self.sex),
                height_cm: number(&self.height_cm),
                weight_kg: number(&self.weight_kg),
                blood_pressure,
                heart_rate: number(&self.heart_rate),
                conditions: string_list(&self.conditions),
                medications: string_list(&self.medications),
                allergies: string_list(&self.allergies),
                lifestyle: Some(lifestyle),
                location,
                work_type: text(&self.work_type),
            },
        }
    }
}

fn number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

fn text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn string_list(items: &[String]) -> Option<Vec<String>> {
    let cleaned: Vec<String> = items
        .iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::validation::validate_request;
    use crate::recommendations::summary::build_user_summary;

    fn filled_form() -> ProfileForm {
        ProfileForm {
            age: "28".to_string(),
            sex: "female".to_string(),
            height_cm: "165".to_string(),
            weight_kg: "60".to_string(),
            systolic: "118".to_string(),
            diastolic: "76".to_string(),
            activity_level: ActivityLevel::Moderate,
            steps_per_day: "9000".to_string(),
            city: "Paris".to_string(),
            country: "France".to_string(),
            ..ProfileForm::default()
        }
    }

    #[test]
    fn test_sanitize_coerces_numeric_strings() {
        let profile = filled_form().sanitize().profile;
        assert_eq!(profile.age, Some(28.0));
        assert_eq!(profile.height_cm, Some(165.0));
        let bp = profile.blood_pressure.unwrap();
        assert_eq!(bp.systolic, 118.0);
        assert_eq!(bp.diastolic, 76.0);
    }

    #[test]
    fn test_empty_and_unparsable_inputs_become_absent() {
        let form = ProfileForm {
            age: "".to_string(),
            heart_rate: "fast".to_string(),
            ..ProfileForm::default()
        };
        let profile = form.sanitize().profile;
        assert!(profile.age.is_none());
        assert!(profile.heart_rate.is_none());
    }

    #[test]
    fn test_half_filled_blood_pressure_is_dropped() {
        let form = ProfileForm {
            systolic: "118".to_string(),
            ..ProfileForm::default()
        };
        assert!(form.sanitize().profile.blood_pressure.is_none());
    }

    #[test]
    fn test_default_form_keeps_the_activity_level_selection() {
        let profile = ProfileForm::default().sanitize().profile;
        let lifestyle = profile.lifestyle.unwrap();
        assert_eq!(lifestyle.activity_level, Some(ActivityLevel::Sedentary));
        assert!(lifestyle.exercise.is_none());
    }

    #[test]
    fn test_sanitized_payload_passes_server_validation() {
        let payload = serde_json::to_value(filled_form().sanitize()).unwrap();
        let request = validate_request(&payload).unwrap();
        assert_eq!(request.profile.age, Some(28.0));
    }

    #[test]
    fn test_bmi_preview_matches_the_server_summary() {
        let form = filled_form();
        let preview = form.bmi_preview().unwrap();
        assert_eq!(preview, "22.0");
        let summary = build_user_summary(&form.sanitize().profile);
        assert!(summary.contains(&format!("BMI: {preview}")));
    }

    #[test]
    fn test_bmi_preview_needs_both_inputs() {
        let form = ProfileForm {
            height_cm: "165".to_string(),
            ..ProfileForm::default()
        };
        assert!(form.bmi_preview().is_none());
    }
}
