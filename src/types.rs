use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::diagnostics::GenerationDiagnostics;

/// A submitter's article questionnaire.
///
/// Every narrative field is optional at the type level; the
/// [`GuidelinePolicy`](crate::GuidelinePolicy) decides which ones must be
/// filled in before generation may proceed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireData {
    /// Raw story-type tag. Parsed into [`StoryType`] during validation.
    pub story_type: String,

    // --- Subject identity ---
    pub name: Option<String>,
    pub preferred_title: Option<String>,

    // --- Narrative ---
    pub background: Option<String>,
    pub inspiration: Option<String>,
    pub challenges: Option<String>,
    pub unique_perspective: Option<String>,
    pub highlights: Option<String>,
    pub anecdotes: Option<String>,
    pub aspirations: Option<String>,
    pub additional_info: Option<String>,

    // --- Article intent ---
    pub goal: Option<String>,
    pub audience: Option<String>,
    pub message: Option<String>,
    /// Key points to cover.
    pub points: Option<String>,
    pub seo_keywords: Option<String>,
    pub tone: Option<String>,
    /// Either a plain string or a structured list/map of profiles.
    pub social_links: Option<Value>,
    pub references: Option<String>,
    pub title_ideas: Option<String>,
    pub exclude_info: Option<String>,

    // --- SEO geo/entity ---
    pub geo_location: Option<String>,
    pub person_name: Option<String>,
    pub company_name: Option<String>,

    /// Free-text length hint ("make it longer", "keep it short").
    pub additional_prompt: Option<String>,
}

impl QuestionnaireData {
    /// Create an otherwise empty questionnaire for the given story type.
    pub fn new(story_type: impl Into<String>) -> Self {
        Self {
            story_type: story_type.into(),
            ..Default::default()
        }
    }

    /// Every string-valued field, in declaration order.
    ///
    /// Absent fields are skipped. `social_links` only participates when it
    /// was submitted as a plain string.
    pub fn string_values(&self) -> Vec<&str> {
        let social = match &self.social_links {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        };
        std::iter::once(Some(self.story_type.as_str()))
            .chain([
                self.name.as_deref(),
                self.preferred_title.as_deref(),
                self.background.as_deref(),
                self.inspiration.as_deref(),
                self.challenges.as_deref(),
                self.unique_perspective.as_deref(),
                self.highlights.as_deref(),
                self.anecdotes.as_deref(),
                self.aspirations.as_deref(),
                self.additional_info.as_deref(),
                self.goal.as_deref(),
                self.audience.as_deref(),
                self.message.as_deref(),
                self.points.as_deref(),
                self.seo_keywords.as_deref(),
                self.tone.as_deref(),
                social,
                self.references.as_deref(),
                self.title_ideas.as_deref(),
                self.exclude_info.as_deref(),
                self.geo_location.as_deref(),
                self.person_name.as_deref(),
                self.company_name.as_deref(),
                self.additional_prompt.as_deref(),
            ])
            .flatten()
            .collect()
    }

    /// Lower-cased, space-joined concatenation of [`string_values`](Self::string_values).
    pub fn combined_text(&self) -> String {
        self.string_values().join(" ").to_lowercase()
    }

    /// Social links rendered for display: strings verbatim, anything else as JSON.
    pub fn social_links_text(&self) -> Option<String> {
        match &self.social_links {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
        .filter(|s| !s.trim().is_empty())
    }
}

/// Returns the field's text when it carries anything besides whitespace.
pub(crate) fn filled(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// The story formats a publication accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Profile,
    Editorial,
    Advertorial,
    Listicle,
}

impl StoryType {
    /// All accepted story types, in display order.
    pub const ALL: [StoryType; 4] = [
        StoryType::Profile,
        StoryType::Editorial,
        StoryType::Advertorial,
        StoryType::Listicle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryType::Profile => "profile",
            StoryType::Editorial => "editorial",
            StoryType::Advertorial => "advertorial",
            StoryType::Listicle => "listicle",
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryType {
    type Err = String;

    /// Exact, case-sensitive match against the lowercase tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoryType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown story type '{}'", s))
    }
}

/// Read-only publication policy and context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationProfile {
    pub publication_name: Option<String>,
    /// Approximate target length in words. Zero is treated as unset.
    pub word_limit: Option<u32>,
    /// Comma or line separated categories the publication refuses.
    pub excluding_categories: Option<String>,
}

impl PublicationProfile {
    pub fn new(publication_name: impl Into<String>) -> Self {
        Self {
            publication_name: Some(publication_name.into()),
            ..Default::default()
        }
    }

    pub fn with_word_limit(mut self, words: u32) -> Self {
        self.word_limit = Some(words);
        self
    }

    pub fn with_excluding_categories(mut self, categories: impl Into<String>) -> Self {
        self.excluding_categories = Some(categories.into());
        self
    }

    /// Publication name, or `fallback` when it is missing or blank.
    pub(crate) fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        filled(&self.publication_name).unwrap_or(fallback)
    }

    pub(crate) fn effective_word_limit(&self) -> Option<u32> {
        self.word_limit.filter(|w| *w > 0)
    }
}

/// Which path produced a [`GenerationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// External generator output, formatted to HTML.
    Generated,
    /// Locally composed article text.
    Fallback,
}

/// Article content handed back to the caller, who owns persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub content: String,
    pub source: ContentSource,
    #[serde(default)]
    pub diagnostics: GenerationDiagnostics,
}

impl GenerationResult {
    pub fn is_fallback(&self) -> bool {
        self.source == ContentSource::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_story_type_parse_exact() {
        assert_eq!("listicle".parse::<StoryType>(), Ok(StoryType::Listicle));
        assert!("Profile".parse::<StoryType>().is_err());
        assert!("interview".parse::<StoryType>().is_err());
    }

    #[test]
    fn test_string_values_skip_structured_social_links() {
        let mut q = QuestionnaireData::new("profile");
        q.name = Some("Jane".into());
        q.social_links = Some(json!(["https://x.example/jane"]));
        assert_eq!(q.string_values(), vec!["profile", "Jane"]);

        q.social_links = Some(json!("@jane"));
        assert_eq!(q.string_values(), vec!["profile", "Jane", "@jane"]);
    }

    #[test]
    fn test_social_links_text_renders_json() {
        let mut q = QuestionnaireData::new("profile");
        assert_eq!(q.social_links_text(), None);
        q.social_links = Some(json!({"x": "@jane"}));
        assert_eq!(q.social_links_text().as_deref(), Some(r#"{"x":"@jane"}"#));
    }

    #[test]
    fn test_questionnaire_deserializes_partial_record() {
        let q: QuestionnaireData = serde_json::from_value(json!({
            "story_type": "editorial",
            "background": "Grew up in rural Ohio",
        }))
        .unwrap();
        assert_eq!(q.story_type, "editorial");
        assert_eq!(q.background.as_deref(), Some("Grew up in rural Ohio"));
        assert!(q.challenges.is_none());
    }

    #[test]
    fn test_publication_name_fallback() {
        let p = PublicationProfile::default();
        assert_eq!(p.name_or("the publication"), "the publication");
        let p = PublicationProfile::new("Tech Weekly");
        assert_eq!(p.name_or("the publication"), "Tech Weekly");
    }
}
