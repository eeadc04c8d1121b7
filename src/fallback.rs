//! Deterministic local article used when the external generator is unavailable.

use std::fmt::Write;

use crate::prompt::attribution_line;
use crate::types::{filled, PublicationProfile, QuestionnaireData};

/// Length directives read from `additional_prompt`.
///
/// Both are case-insensitive substring matches, so "make it longer" sets
/// `longer` and "shorter please" sets `shorter`. They are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthDirectives {
    pub longer: bool,
    pub shorter: bool,
}

impl LengthDirectives {
    pub fn parse(additional_prompt: Option<&str>) -> Self {
        let hint = additional_prompt.unwrap_or_default().to_lowercase();
        Self {
            longer: hint.contains("long"),
            shorter: hint.contains("short"),
        }
    }
}

/// Composes a complete article from questionnaire fields alone.
///
/// The output uses the same markdown structure the generator is asked for
/// (title, five `##` sections, attribution line) but is returned as-is,
/// without passing through the HTML formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackComposer;

impl FallbackComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, q: &QuestionnaireData, publication: &PublicationProfile) -> String {
        let directives = LengthDirectives::parse(q.additional_prompt.as_deref());
        let long = directives.longer;
        let story = q.story_type.as_str();
        let name = filled(&q.name);
        let publication_name = publication.name_or("the publication");

        let mut article = String::with_capacity(2048);
        let _ = write!(article, "# {}: A {} Story\n\n", name.unwrap_or("Subject Name"), story);

        article.push_str("## Introduction\n\n");
        match filled(&q.background) {
            Some(background) => {
                article.push_str(background);
                if long {
                    article.push_str(" This comprehensive background provides essential context for understanding the subject's journey and the challenges they have overcome.");
                }
            }
            None => {
                let _ = write!(
                    article,
                    "This article explores the remarkable journey and achievements of {} in their field.",
                    name.unwrap_or("our subject")
                );
                if long {
                    article.push_str(" Through detailed examination of their background, experiences, and accomplishments, we gain valuable insights into what drives success in today's competitive landscape.");
                }
            }
        }
        article.push_str("\n\n");

        article.push_str("## The Journey\n\n");
        match filled(&q.message) {
            Some(message) => {
                article.push_str(message);
                if long {
                    article.push_str(" This journey represents not just personal growth, but also the evolution of an entire field or industry approach.");
                }
            }
            None => {
                article.push_str("The journey began with a vision to make a difference and has evolved into a story of perseverance and success.");
                if long {
                    article.push_str(" Every step along this path has been marked by determination, innovation, and an unwavering commitment to excellence that continues to inspire others in similar pursuits.");
                }
            }
        }
        article.push_str("\n\n");

        article.push_str("## Key Achievements\n\n");
        let mut achievements: Vec<String> = Vec::new();
        if let Some(goal) = filled(&q.goal) {
            achievements.push(goal.to_string());
        }
        if let Some(highlights) = filled(&q.highlights) {
            achievements.push(highlights.to_string());
        }
        if let Some(audience) = filled(&q.audience) {
            achievements.push(format!("Successfully reached and engaged {}", audience));
        }
        if let Some(perspective) = filled(&q.unique_perspective) {
            achievements.push(perspective.to_string());
        }
        if achievements.is_empty() {
            achievements.extend(
                [
                    "Achieved significant milestones in their field",
                    "Built a strong reputation through consistent excellence",
                    "Demonstrated leadership and innovation",
                ]
                .map(String::from),
            );
        }
        if long {
            achievements.extend(
                [
                    "Pioneered new approaches and methodologies",
                    "Mentored and inspired the next generation of professionals",
                    "Received recognition from industry leaders and peers",
                ]
                .map(String::from),
            );
        }
        for achievement in &achievements {
            let _ = writeln!(article, "- {}", achievement);
        }
        article.push('\n');

        article.push_str("## Future Outlook\n\n");
        match filled(&q.aspirations) {
            Some(aspirations) => {
                article.push_str(aspirations);
                if long {
                    article.push_str(" These forward-looking goals demonstrate a continued commitment to growth, innovation, and making a lasting impact on their field.");
                }
            }
            None => {
                let _ = write!(
                    article,
                    "Looking ahead, {} continues to innovate and inspire in their industry.",
                    name.unwrap_or("the subject")
                );
                if !directives.shorter {
                    let _ = write!(
                        article,
                        " The {} presented here demonstrates the power of dedication and vision in achieving remarkable results",
                        story
                    );
                    if long {
                        article.push_str(", while also pointing toward exciting future developments that will further advance their field");
                    }
                    article.push('.');
                }
            }
        }
        article.push_str("\n\n");

        article.push_str("## Conclusion\n\n");
        let _ = write!(
            article,
            "This comprehensive {} showcases the remarkable journey and achievements of {}.",
            story,
            name.unwrap_or("the subject")
        );
        if long {
            article.push_str(" Through this detailed exploration, we see not just individual success, but also the broader implications for industry standards, innovation, and the future of professional excellence.");
        }
        let _ = write!(
            article,
            " For {}, this represents another compelling story of success and inspiration.\n\n",
            publication_name
        );

        article.push_str(&attribution_line(publication));
        article
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{MarkdownToHtmlFormatter, ATTRIBUTION_MARKER};

    fn questionnaire() -> QuestionnaireData {
        let mut q = QuestionnaireData::new("profile");
        q.name = Some("Jane Doe".into());
        q.background = Some("Grew up in rural Ohio".into());
        q.challenges = Some("Faced funding rejection twelve times".into());
        q.unique_perspective = Some("Combines AI with agriculture".into());
        q.highlights = Some("Built a $2M startup".into());
        q.aspirations = Some("Expand to three new markets".into());
        q
    }

    fn sections(article: &str) -> Vec<&str> {
        article
            .lines()
            .filter_map(|l| l.strip_prefix("## "))
            .collect()
    }

    #[test]
    fn test_baseline_structure() {
        let article = FallbackComposer.compose(&questionnaire(), &PublicationProfile::new("Tech Weekly"));
        assert!(article.starts_with("# Jane Doe: A profile Story\n\n## Introduction\n\nGrew up in rural Ohio\n\n"));
        assert_eq!(
            sections(&article),
            vec!["Introduction", "The Journey", "Key Achievements", "Future Outlook", "Conclusion"]
        );
        assert!(article.contains("- Built a $2M startup\n- Combines AI with agriculture\n\n"));
        assert!(article.ends_with(
            "For Tech Weekly, this represents another compelling story of success and inspiration.\n\n*This article was generated using AI technology for Tech Weekly.*"
        ));
    }

    #[test]
    fn test_generic_filler_when_fields_missing() {
        let q = QuestionnaireData::new("editorial");
        let article = FallbackComposer.compose(&q, &PublicationProfile::default());
        assert!(article.starts_with("# Subject Name: A editorial Story"));
        assert!(article.contains("achievements of our subject in their field."));
        assert!(article.contains("- Achieved significant milestones in their field\n- Built a strong reputation through consistent excellence\n- Demonstrated leadership and innovation\n"));
        assert!(article.contains("Looking ahead, the subject continues to innovate and inspire in their industry. The editorial presented here demonstrates the power of dedication and vision in achieving remarkable results.\n"));
        assert!(article.ends_with("for the publication.*"));
    }

    #[test]
    fn test_audience_bullet() {
        let mut q = questionnaire();
        q.goal = Some("Raise awareness".into());
        q.audience = Some("rural founders".into());
        let article = FallbackComposer.compose(&q, &PublicationProfile::default());
        assert!(article.contains("- Raise awareness\n- Built a $2M startup\n- Successfully reached and engaged rural founders\n- Combines AI with agriculture\n"));
    }

    #[test]
    fn test_longer_directive_extends_every_section() {
        let mut q = questionnaire();
        q.additional_prompt = Some("Please make it LONGER".into());
        let baseline = FallbackComposer.compose(&questionnaire(), &PublicationProfile::default());
        let longer = FallbackComposer.compose(&q, &PublicationProfile::default());
        assert!(longer.len() > baseline.len());
        assert!(longer.contains("Grew up in rural Ohio This comprehensive background"));
        assert!(longer.contains("evolved into a story of perseverance and success. Every step"));
        assert!(longer.contains("- Received recognition from industry leaders and peers\n"));
        assert!(longer.contains("Expand to three new markets These forward-looking goals"));
        assert!(longer.contains("Through this detailed exploration"));
        assert_eq!(longer.matches("\n- ").count(), baseline.matches("\n- ").count() + 3);
    }

    #[test]
    fn test_shorter_directive_drops_outlook_sentence() {
        let mut q = QuestionnaireData::new("listicle");
        q.additional_prompt = Some("keep it short".into());
        let article = FallbackComposer.compose(&q, &PublicationProfile::default());
        assert!(article.contains("inspire in their industry.\n\n## Conclusion"));
        assert!(!article.contains("presented here demonstrates"));
    }

    #[test]
    fn test_directives_are_independent() {
        let d = LengthDirectives::parse(Some("not too long, not too short"));
        assert!(d.longer && d.shorter);
        assert_eq!(LengthDirectives::parse(None), LengthDirectives::default());

        let mut q = QuestionnaireData::new("listicle");
        q.additional_prompt = Some("not too long, not too short".into());
        let article = FallbackComposer.compose(&q, &PublicationProfile::default());
        assert!(!article.contains("presented here demonstrates"));
        assert!(article.contains("- Pioneered new approaches and methodologies\n"));
    }

    #[test]
    fn test_attribution_satisfies_formatter_contract() {
        let article = FallbackComposer.compose(&questionnaire(), &PublicationProfile::new("Tech Weekly"));
        let last = article.lines().last().unwrap();
        assert!(last.starts_with('*') && last.contains(ATTRIBUTION_MARKER));

        let html = MarkdownToHtmlFormatter::new().format(&article);
        assert_eq!(html.html.matches("<div ").count(), 1);
        assert_eq!(html.dropped_lines, 0);
    }
}
