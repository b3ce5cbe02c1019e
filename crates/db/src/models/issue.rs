//! Issue entity model.

use irs_core::schema::IssueForm;
use irs_core::types::{DbId, Timestamp};
use serde::Serialize;

/// A stored issue report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub platform: String,
    pub product_category: String,
    pub severity: String,
    pub frequency: String,
    pub custom_frequency_description: Option<String>,
    pub reproducible: bool,
    pub steps_to_reproduce: String,
    pub expected_behavior: Option<String>,
    pub actual_behavior: String,
    pub hardware_version: String,
    pub software_version: String,
    pub os_version: Option<String>,
    pub additional_environment: Option<String>,
    pub reporter: String,
    pub status: String,
    /// Unset until ticket creation succeeds.
    pub ticket_id: Option<String>,
    pub created_at: Timestamp,
}

impl Issue {
    /// Build a fresh row from a validated form.
    pub(crate) fn from_form(id: DbId, form: &IssueForm, status: &str, created_at: Timestamp) -> Self {
        Self {
            id,
            title: form.title.clone(),
            description: form.description.clone(),
            platform: form.platform.clone(),
            product_category: form.product_category.clone(),
            severity: form.severity.clone(),
            frequency: form.frequency.clone(),
            custom_frequency_description: non_blank(&form.custom_frequency_description),
            reproducible: form.reproducible.unwrap_or(false),
            steps_to_reproduce: form.steps_to_reproduce.clone(),
            expected_behavior: non_blank(&form.expected_behavior),
            actual_behavior: form.actual_behavior.clone(),
            hardware_version: form.hardware_version.clone(),
            software_version: form.software_version.clone(),
            os_version: non_blank(&form.os_version),
            additional_environment: non_blank(&form.additional_environment),
            reporter: form.reporter.clone(),
            status: status.to_string(),
            ticket_id: None,
            created_at,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}
