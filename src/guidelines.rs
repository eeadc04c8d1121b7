//! Pre-generation guideline gate.
//!
//! [`GuidelinePolicy`] checks a questionnaire against minimum-content rules,
//! a banned-word list, the accepted story types, and the publication's
//! excluded categories. Rules run in a fixed order and the first failure is
//! the only one reported.

use serde::Serialize;

use crate::error::ValidationError;
use crate::types::{PublicationProfile, QuestionnaireData, StoryType};

/// Minimum trimmed length for each required narrative field.
pub const MIN_FIELD_LENGTH: usize = 5;

/// Words that reject a submission wherever they appear (case-insensitive).
pub const BANNED_WORDS: &[&str] = &["spam", "scam", "illegal", "harmful", "offensive"];

/// Which rule rejected a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum RejectionRule {
    /// A required field is missing or too short.
    MissingContent { field: &'static str },
    /// The text contains a banned word.
    ProhibitedContent,
    /// The story type tag is not one of [`StoryType::ALL`].
    InvalidStoryType,
    /// The submission hits the publication's excluded categories.
    PublicationConflict,
}

/// A rejected submission: the failing rule and one message for the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub rule: RejectionRule,
    pub message: String,
}

/// Result of running the guideline gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Pass,
    Reject(Rejection),
}

impl ValidationOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationOutcome::Pass)
    }

    /// The rejection message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Pass => None,
            ValidationOutcome::Reject(r) => Some(&r.message),
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationOutcome::Pass => Ok(()),
            ValidationOutcome::Reject(Rejection { rule, message }) => {
                Err(ValidationError { rule, message })
            }
        }
    }
}

/// The publication guideline policy.
///
/// The excluded-categories rule is a plain substring heuristic over the
/// submission text. It is not a content-safety system.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuidelinePolicy;

impl GuidelinePolicy {
    pub fn new() -> Self {
        Self
    }

    /// Validate a questionnaire against the publication's guidelines.
    ///
    /// # Example
    ///
    /// ```
    /// use article_pipeline::{GuidelinePolicy, PublicationProfile, QuestionnaireData};
    ///
    /// let mut q = QuestionnaireData::new("profile");
    /// q.background = Some("".into());
    /// let outcome = GuidelinePolicy::new().validate(&q, &PublicationProfile::new("Tech Weekly"));
    /// assert!(outcome.message().unwrap().contains("background"));
    /// ```
    pub fn validate(
        &self,
        questionnaire: &QuestionnaireData,
        publication: &PublicationProfile,
    ) -> ValidationOutcome {
        match self.check(questionnaire, publication) {
            Ok(()) => ValidationOutcome::Pass,
            Err(rejection) => ValidationOutcome::Reject(rejection),
        }
    }

    fn check(
        &self,
        q: &QuestionnaireData,
        publication: &PublicationProfile,
    ) -> Result<(), Rejection> {
        let required = [
            (&q.background, "background"),
            (&q.challenges, "challenges"),
            (&q.unique_perspective, "unique perspective"),
            (&q.highlights, "highlights"),
            (&q.aspirations, "future aspirations"),
        ];
        for (value, field) in required {
            let len = value.as_deref().map_or(0, |v| v.trim().chars().count());
            if len < MIN_FIELD_LENGTH {
                return Err(Rejection {
                    rule: RejectionRule::MissingContent { field },
                    message: format!(
                        "Your {} response is too short or missing. Please provide more detailed information (minimum {} characters) to meet our publication guidelines.",
                        field, MIN_FIELD_LENGTH
                    ),
                });
            }
        }

        let all_text = q.combined_text();
        if BANNED_WORDS.iter().any(|word| all_text.contains(word)) {
            return Err(Rejection {
                rule: RejectionRule::ProhibitedContent,
                message: "Your submission contains content that violates our publication guidelines. Please revise and resubmit.".to_string(),
            });
        }

        if q.story_type.parse::<StoryType>().is_err() {
            let allowed: Vec<&str> = StoryType::ALL.iter().map(|t| t.as_str()).collect();
            return Err(Rejection {
                rule: RejectionRule::InvalidStoryType,
                message: format!(
                    "Invalid story type selected. Please choose from: {}.",
                    allowed.join(", ")
                ),
            });
        }

        if let Some(excluded) = publication
            .excluding_categories
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            let excluded = excluded.to_lowercase();
            if excluded.contains(&q.story_type.to_lowercase()) || all_text.contains(&excluded) {
                return Err(Rejection {
                    rule: RejectionRule::PublicationConflict,
                    message: "Your submission content conflicts with this publication's guidelines. Please review the publication requirements and resubmit.".to_string(),
                });
            }
        }

        Ok(())
    }
}
