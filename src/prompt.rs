//! Prompt assembly for article generation.
//!
//! [`PromptBuilder`] turns a validated questionnaire and publication profile
//! into a single prompt that spells out the exact markdown structure the
//! [`MarkdownToHtmlFormatter`](crate::MarkdownToHtmlFormatter) expects back.

use std::fmt::Write;

use crate::types::{filled, PublicationProfile, QuestionnaireData};

/// Section headers every article must contain, in order.
pub const SECTIONS: [&str; 5] = [
    "Introduction",
    "The Journey",
    "Key Achievements",
    "Future Outlook",
    "Conclusion",
];

/// The only field line preceded by a blank line.
const GOAL_LABEL: &str = "Goal of the article";

/// The attribution sentence closing every article, in its markdown form.
pub fn attribution_line(publication: &PublicationProfile) -> String {
    format!(
        "*This article was generated using AI technology for {}.*",
        publication.name_or("the publication")
    )
}

/// Builds the generation prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Assemble the prompt. Absent or blank fields are omitted; the order of
    /// the remaining lines never changes.
    ///
    /// # Example
    ///
    /// ```
    /// use article_pipeline::{PromptBuilder, PublicationProfile, QuestionnaireData};
    ///
    /// let mut q = QuestionnaireData::new("profile");
    /// q.name = Some("Jane Doe".into());
    /// let prompt = PromptBuilder::new().build(&q, &PublicationProfile::new("Tech Weekly"));
    /// assert!(prompt.contains("Subject Name: Jane Doe"));
    /// assert!(!prompt.contains("Background:"));
    /// ```
    pub fn build(&self, q: &QuestionnaireData, publication: &PublicationProfile) -> String {
        let story = q.story_type.as_str();
        let mut prompt = String::with_capacity(2048);

        let _ = write!(
            prompt,
            "You are a professional journalist writing a high-quality {} article for {}. ",
            story,
            publication.name_or("a publication")
        );
        if let Some(words) = publication.effective_word_limit() {
            let _ = write!(prompt, "The article should be approximately {} words. ", words);
        }

        prompt.push_str(
            "\n\nIMPORTANT: You must structure your response in proper Markdown format with these exact sections:\n",
        );
        let _ = writeln!(
            prompt,
            "1. A main title starting with # (e.g., \"# {}: A {} Story\")",
            filled(&q.name).unwrap_or("Subject"),
            story
        );
        for (i, section) in SECTIONS.iter().enumerate() {
            let note = if *section == "Key Achievements" {
                " (use bullet points)"
            } else {
                ""
            };
            let _ = writeln!(prompt, "{}. ## {} section{}", i + 2, section, note);
        }
        let _ = writeln!(prompt, "{}. Attribution note at the end\n", SECTIONS.len() + 2);

        let _ = write!(
            prompt,
            "Write a {} article based on the following information:\n\n",
            story
        );

        let social_links = q.social_links_text();
        let fields: [(&str, Option<&str>); 23] = [
            // subject
            ("Subject Name", filled(&q.name)),
            ("Preferred Title", filled(&q.preferred_title)),
            ("Background", filled(&q.background)),
            ("Inspiration", filled(&q.inspiration)),
            ("Challenges", filled(&q.challenges)),
            ("Unique Perspective", filled(&q.unique_perspective)),
            ("Highlights", filled(&q.highlights)),
            ("Anecdotes", filled(&q.anecdotes)),
            ("Aspirations", filled(&q.aspirations)),
            ("Additional Information", filled(&q.additional_info)),
            // article requirements
            (GOAL_LABEL, filled(&q.goal)),
            ("Target Audience", filled(&q.audience)),
            ("Key Message", filled(&q.message)),
            ("Key Points to Cover", filled(&q.points)),
            ("Tone", filled(&q.tone)),
            // SEO
            ("SEO Keywords", filled(&q.seo_keywords)),
            ("Geographic Location", filled(&q.geo_location)),
            ("Person Name for SEO", filled(&q.person_name)),
            ("Company Name for SEO", filled(&q.company_name)),
            // references
            ("References to include", filled(&q.references)),
            ("Social Media Links", social_links.as_deref()),
            ("Title Ideas", filled(&q.title_ideas)),
            ("Information to exclude", filled(&q.exclude_info)),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                if label == GOAL_LABEL {
                    prompt.push('\n');
                }
                let _ = writeln!(prompt, "{}: {}", label, value);
            }
        }

        prompt.push_str("\n\nCRITICAL FORMATTING REQUIREMENTS:\n");
        prompt.push_str("- Start with a main title using # symbol\n");
        let _ = writeln!(
            prompt,
            "- Use ## for section headers ({})",
            SECTIONS.join(", ")
        );
        prompt.push_str("- Use bullet points (-) for Key Achievements section\n");
        let _ = writeln!(prompt, "- End with: \"{}\"", attribution_line(publication));
        prompt.push_str("- Write in a professional, journalistic tone\n");
        prompt.push_str("- Ensure all provided information is incorporated naturally\n");
        prompt.push_str("- Make the article engaging and informative\n\n");

        let _ = write!(
            prompt,
            "Please write a compelling, well-structured {} article that follows journalistic standards and incorporates all the provided information. Ensure the article is engaging, informative, and optimized for the target audience.",
            story
        );

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn questionnaire() -> QuestionnaireData {
        let mut q = QuestionnaireData::new("editorial");
        q.name = Some("Jane Doe".into());
        q.background = Some("Grew up in rural Ohio".into());
        q.goal = Some("Raise awareness".into());
        q.seo_keywords = Some("agritech, ohio".into());
        q
    }

    #[test]
    fn test_preamble_names_publication_and_story() {
        let p = PublicationProfile::new("Tech Weekly").with_word_limit(800);
        let prompt = PromptBuilder.build(&questionnaire(), &p);
        assert!(prompt.starts_with(
            "You are a professional journalist writing a high-quality editorial article for Tech Weekly. The article should be approximately 800 words. "
        ));
    }

    #[test]
    fn test_missing_publication_name_and_zero_word_limit() {
        let p = PublicationProfile {
            word_limit: Some(0),
            ..Default::default()
        };
        let prompt = PromptBuilder.build(&questionnaire(), &p);
        assert!(prompt.contains("article for a publication. \n\n"));
        assert!(!prompt.contains("approximately"));
        assert!(prompt.contains("generated using AI technology for the publication.*"));
    }

    #[test]
    fn test_structural_contract_enumerated() {
        let prompt = PromptBuilder.build(&questionnaire(), &PublicationProfile::new("Tech Weekly"));
        assert!(prompt.contains("1. A main title starting with # (e.g., \"# Jane Doe: A editorial Story\")\n"));
        assert!(prompt.contains("2. ## Introduction section\n"));
        assert!(prompt.contains("4. ## Key Achievements section (use bullet points)\n"));
        assert!(prompt.contains("6. ## Conclusion section\n"));
        assert!(prompt.contains("7. Attribution note at the end\n"));
        assert!(prompt.contains(
            "- End with: \"*This article was generated using AI technology for Tech Weekly.*\"\n"
        ));
    }

    #[test]
    fn test_fields_grouped_in_fixed_order() {
        let prompt = PromptBuilder.build(&questionnaire(), &PublicationProfile::new("Tech Weekly"));
        let expected = "information:\n\nSubject Name: Jane Doe\nBackground: Grew up in rural Ohio\n\nGoal of the article: Raise awareness\nSEO Keywords: agritech, ohio\n\n\nCRITICAL";
        assert!(prompt.contains(expected), "prompt was:\n{}", prompt);
    }

    #[test]
    fn test_sections_run_together_without_goal() {
        let mut q = questionnaire();
        q.goal = None;
        q.references = Some("Ohio Farm Bureau".into());
        let prompt = PromptBuilder.build(&q, &PublicationProfile::new("Tech Weekly"));
        assert!(prompt.contains(
            "Background: Grew up in rural Ohio\nSEO Keywords: agritech, ohio\nReferences to include: Ohio Farm Bureau\n\n\nCRITICAL"
        ));
    }

    #[test]
    fn test_empty_questionnaire_keeps_information_header() {
        let prompt = PromptBuilder.build(&QuestionnaireData::new("listicle"), &PublicationProfile::default());
        assert!(prompt.contains("based on the following information:\n\n\n\nCRITICAL"));
    }

    #[test]
    fn test_blank_fields_omitted() {
        let mut q = questionnaire();
        q.tone = Some("   ".into());
        q.references = None;
        let prompt = PromptBuilder.build(&q, &PublicationProfile::default());
        assert!(!prompt.contains("Tone:"));
        assert!(!prompt.contains("References to include:"));
    }

    #[test]
    fn test_structured_social_links_rendered_as_json() {
        let mut q = questionnaire();
        q.social_links = Some(json!(["https://x.example/jane"]));
        let prompt = PromptBuilder.build(&q, &PublicationProfile::default());
        assert!(prompt.contains("Social Media Links: [\"https://x.example/jane\"]\n"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let p = PublicationProfile::new("Tech Weekly");
        let q = questionnaire();
        assert_eq!(PromptBuilder.build(&q, &p), PromptBuilder.build(&q, &p));
    }
}
