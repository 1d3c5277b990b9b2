// Prompt template for the recommendations pipeline.
// The section list is a stable contract: consumers may rely on these
// headers appearing in the assistant's reply, though adherence is
// advisory to the remote model, not machine-checked here.

use crate::profile::models::HealthProfile;
use crate::recommendations::summary::build_user_summary;

/// Instructional template wrapped around the profile summary.
/// Replace `{summary}` before sending.
pub const RECOMMENDATIONS_PROMPT_TEMPLATE: &str = "User profile summary:\n{summary}\n\nPlease return structured lifestyle recommendations with sections for:\n- Summary of situation\n- Key observations\n- Recommendations for next weeks\n- Location-adapted notes\n- Red flags & when to see a doctor\n- Tracking & next steps";

/// Builds the full prompt sent to the assistant for one profile.
pub fn build_recommendations_prompt(profile: &HealthProfile) -> String {
    RECOMMENDATIONS_PROMPT_TEMPLATE.replace("{summary}", &build_user_summary(profile))
}
