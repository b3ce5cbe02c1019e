//! Issue form schema and the per-step validation ruleset.
//!
//! [`IssueForm`] is the single definition of what an issue submission must
//! contain. The wizard runs [`validate_step`] before letting the user leave
//! a step; the backend runs [`validate_issue_form`] on the submitted JSON.
//! Both read the same field rules, so they cannot drift apart.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

/// The five steps of the issue reporting wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    IssueDetails,
    Reproducibility,
    Environment,
    Media,
    Review,
}

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 5;

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::IssueDetails),
            2 => Ok(Self::Reproducibility),
            3 => Ok(Self::Environment),
            4 => Ok(Self::Media),
            5 => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::IssueDetails => 1,
            Self::Reproducibility => 2,
            Self::Environment => 3,
            Self::Media => 4,
            Self::Review => 5,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::IssueDetails => "Issue Details",
            Self::Reproducibility => "Reproducibility",
            Self::Environment => "Environment",
            Self::Media => "Media & Attachments",
            Self::Review => "Review & Submit",
        }
    }

    /// The following step, or `None` on the last step.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.to_number() + 1).ok()
    }

    /// The preceding step, or `None` on the first step.
    pub fn previous(self) -> Option<Self> {
        self.to_number()
            .checked_sub(1)
            .and_then(|n| Self::from_number(n).ok())
    }
}

// ---------------------------------------------------------------------------
// Enum-like field values
// ---------------------------------------------------------------------------

pub const SEVERITY_LOW: &str = "low";
pub const SEVERITY_MEDIUM: &str = "medium";
pub const SEVERITY_HIGH: &str = "high";
pub const SEVERITY_CRITICAL: &str = "critical";

/// All accepted severity values.
pub const VALID_SEVERITIES: &[&str] = &[
    SEVERITY_LOW,
    SEVERITY_MEDIUM,
    SEVERITY_HIGH,
    SEVERITY_CRITICAL,
];

pub const FREQUENCY_ALWAYS: &str = "always";
pub const FREQUENCY_OFTEN: &str = "often";
pub const FREQUENCY_SOMETIMES: &str = "sometimes";
pub const FREQUENCY_RARELY: &str = "rarely";
pub const FREQUENCY_ONCE: &str = "once";
/// Selecting this frequency makes `customFrequencyDescription` mandatory.
pub const FREQUENCY_CUSTOM: &str = "custom";

/// All accepted frequency values.
pub const VALID_FREQUENCIES: &[&str] = &[
    FREQUENCY_ALWAYS,
    FREQUENCY_OFTEN,
    FREQUENCY_SOMETIMES,
    FREQUENCY_RARELY,
    FREQUENCY_ONCE,
    FREQUENCY_CUSTOM,
];

/// Maximum length for the title (characters).
pub const MAX_TITLE_LENGTH: u64 = 200;

/// Maximum length for the free-text description (characters).
pub const MAX_DESCRIPTION_LENGTH: u64 = 10_000;

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// The issue draft as entered in the wizard and posted as `issueData`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueForm {
    // Step 1: issue details.
    #[validate(
        custom(function = "not_blank", message = "Title is required"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: String,
    #[validate(
        custom(function = "not_blank", message = "Description is required"),
        length(max = 10000, message = "Description must be at most 10000 characters")
    )]
    pub description: String,
    #[validate(custom(function = "not_blank", message = "Platform is required"))]
    pub platform: String,
    #[validate(custom(function = "not_blank", message = "Product category is required"))]
    pub product_category: String,
    #[validate(custom(function = "valid_severity"))]
    pub severity: String,

    // Step 2: reproducibility.
    #[validate(custom(function = "valid_frequency"))]
    pub frequency: String,
    pub custom_frequency_description: Option<String>,
    #[validate(required(message = "Please state whether the issue is reproducible"))]
    pub reproducible: Option<bool>,
    #[validate(custom(function = "not_blank", message = "Steps to reproduce are required"))]
    pub steps_to_reproduce: String,
    pub expected_behavior: Option<String>,
    #[validate(custom(function = "not_blank", message = "Actual behavior is required"))]
    pub actual_behavior: String,

    // Step 3: environment.
    #[validate(custom(function = "not_blank", message = "Hardware version is required"))]
    pub hardware_version: String,
    #[validate(custom(function = "not_blank", message = "Software version is required"))]
    pub software_version: String,
    pub os_version: Option<String>,
    pub additional_environment: Option<String>,
    #[validate(custom(function = "not_blank", message = "Reporter is required"))]
    pub reporter: String,
}

impl IssueForm {
    /// Whether the custom frequency was selected.
    pub fn has_custom_frequency(&self) -> bool {
        self.frequency == FREQUENCY_CUSTOM
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn valid_severity(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_SEVERITIES, "Severity")
}

fn valid_frequency(value: &str) -> Result<(), ValidationError> {
    one_of(value, VALID_FREQUENCIES, "Frequency")
}

fn one_of(value: &str, allowed: &[&str], label: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Owned(format!("{label} is required"))));
    }
    if !allowed.contains(&value) {
        return Err(ValidationError::new("one_of").with_message(Cow::Owned(format!(
            "{label} must be one of: {}",
            allowed.join(", ")
        ))));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Field errors
// ---------------------------------------------------------------------------

/// Field names in form order, each with the step that collects it.
const FIELD_STEPS: &[(&str, WizardStep)] = &[
    ("title", WizardStep::IssueDetails),
    ("description", WizardStep::IssueDetails),
    ("platform", WizardStep::IssueDetails),
    ("product_category", WizardStep::IssueDetails),
    ("severity", WizardStep::IssueDetails),
    ("frequency", WizardStep::Reproducibility),
    ("custom_frequency_description", WizardStep::Reproducibility),
    ("reproducible", WizardStep::Reproducibility),
    ("steps_to_reproduce", WizardStep::Reproducibility),
    ("actual_behavior", WizardStep::Reproducibility),
    ("hardware_version", WizardStep::Environment),
    ("software_version", WizardStep::Environment),
    ("reporter", WizardStep::Environment),
];

/// The field a cross-field rule reports against.
pub const FIELD_CUSTOM_FREQUENCY: &str = "custom_frequency_description";

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors for one validation run, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Record a failure. Errors stay sorted in form order; fields outside
    /// the form schema sort last.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
        self.0.sort_by_key(|e| field_rank(e.field));
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "Validation failed: {}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        let parts: Vec<String> = errors
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        CoreError::Validation(parts.join("; "))
    }
}

fn field_rank(field: &str) -> usize {
    FIELD_STEPS
        .iter()
        .position(|(name, _)| *name == field)
        .unwrap_or(usize::MAX)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Run the rules for a single wizard step.
///
/// Step 1 also enforces the custom frequency description, even though
/// `frequency` itself is collected on step 2. Steps 4 and 5 carry no form
/// rules; terms acceptance is checked by the wizard, not the form.
pub fn validate_step(step: WizardStep, form: &IssueForm) -> Result<(), FieldErrors> {
    let mut errors = collect_field_errors(form, |s| s == step);
    if step == WizardStep::IssueDetails {
        check_custom_frequency(form, &mut errors);
    }
    errors.into_result()
}

/// Run every rule of the schema. This is the backend's trust-boundary check.
pub fn validate_issue_form(form: &IssueForm) -> Result<(), FieldErrors> {
    let mut errors = collect_field_errors(form, |_| true);
    check_custom_frequency(form, &mut errors);
    errors.into_result()
}

fn collect_field_errors(form: &IssueForm, include: impl Fn(WizardStep) -> bool) -> FieldErrors {
    let mut out = FieldErrors::default();
    let Err(errors) = form.validate() else {
        return out;
    };
    let by_field = errors.field_errors();
    for &(name, step) in FIELD_STEPS {
        if !include(step) {
            continue;
        }
        if let Some(first) = by_field.get(name).and_then(|list| list.first()) {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{name} is invalid"));
            out.push(name, message);
        }
    }
    out
}

fn check_custom_frequency(form: &IssueForm, errors: &mut FieldErrors) {
    if !form.has_custom_frequency() {
        return;
    }
    let described = form
        .custom_frequency_description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if !described {
        errors.push(
            FIELD_CUSTOM_FREQUENCY,
            "Please describe how often the issue occurs".to_string(),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
