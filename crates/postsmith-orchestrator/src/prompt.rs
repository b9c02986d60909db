//! Prompt builder for generation jobs
//!
//! Prompts are deterministic: the same request and content settings always
//! produce the same text. Generated copy is requested in Arabic; media prompts
//! are requested in English.

use crate::job::{AdviceKind, GenerationRequest, Job};
use postsmith_core::{Channel, ContentConfig, Platform, Result};

/// Build the prompt for a request
///
/// Fails only when a topic-driven job has no topic.
pub fn build_prompt(request: &GenerationRequest, content: &ContentConfig) -> Result<String> {
    let brand = content.brand.as_str();

    let prompt = match &request.job {
        Job::GenerateIdeas { instruction } => ideas_prompt(brand, instruction.as_deref()),

        Job::GeneratePost { platform } => {
            let topic = request.require_topic()?;
            let mut prompt = format!(
                "Generate a professional and engaging {} post in Arabic about '{}' for '{}'. \
                 Include relevant emojis and hashtags.",
                platform.label(),
                topic,
                brand
            );
            prompt.push_str(platform_guidance(*platform));
            prompt
        }

        Job::GenerateArticle => {
            let topic = request.require_topic()?;
            format!(
                "Generate the complete HTML content for the main article section \
                 (<div class=\"article-content\">...</div>) for a Blogger post about '{topic}' \
                 for '{brand}'. Adhere strictly to the following HTML structure and CSS classes: \
                 article-paragraph, section-title, subsection-title, bullet-list, numbered-list, \
                 highlight-box, quote-box, decorative-divider. Ensure id attributes for sections \
                 (e.g., id=\"section1\", id=\"section2\", etc.) are present for internal linking \
                 from a table of contents. The content should be professional, insightful, and \
                 comprehensive, reflecting the quality of '{brand}'. Do not include <html>, <head>, \
                 <body>, or any external CSS/JS links. Only generate the content that goes inside \
                 the <div class=\"article-content\">. Ensure all text is in Arabic. Include a table \
                 of contents within the article-content div, linking to the sections you create. \
                 Make sure the content is rich and detailed."
            )
        }

        Job::GenerateImagePrompt => {
            let topic = request.require_topic()?;
            format!(
                "Generate one single, highly detailed, professional, and visually appealing AI \
                 image generation prompt (in English) for a poster related to the topic '{topic}'. \
                 The image should be conceptual, without any text, and suitable for an academic \
                 services center. Focus on abstract representations, metaphors, or symbolic \
                 imagery. The prompt should aim for high-quality, modern, clean aesthetics, \
                 suitable for a digital art style, with vibrant colors and a sense of academic \
                 excellence."
            )
        }

        Job::GenerateVideoPrompt => {
            let topic = request.require_topic()?;
            format!(
                "Generate one single, highly detailed, professional, and visually appealing AI \
                 video generation prompt (in English) for a short promotional video related to \
                 the topic '{topic}' for '{brand}'. The video should be conceptual, dynamic, and \
                 engaging, without spoken dialogue. Describe visual scenes, transitions, and \
                 potential background music mood. Focus on abstract representations of academic \
                 excellence, problem-solving, and support. Include a description for a subtle, \
                 integrated logo of '{brand}' (e.g., a glowing watermark or appearing briefly at \
                 the end). The prompt should aim for high-quality, modern, and clean aesthetics."
            )
        }

        Job::GenerateCarousel { slides } => {
            let topic = request.require_topic()?;
            format!(
                "Generate {slides} concise and engaging text slides in Arabic for a social media \
                 carousel post about '{topic}' for '{brand}'. Each slide should have a clear, \
                 distinct message, building upon the previous one. Focus on key benefits or steps \
                 related to the topic. Format each slide as \"Slide X: [Title]\\n[Short \
                 Description]\" and separate slides with a blank line."
            )
        }

        Job::Rephrase { platform, text } => format!(
            "Rephrase the following {} post in Arabic, making it slightly different but \
             maintaining the original meaning and professional tone for '{}'. Original post: \"{}\"",
            platform.label(),
            brand,
            text
        ),

        Job::SeoOptimize { platform, text } => format!(
            "Rewrite the following {} post in Arabic to be optimized for SEO. Focus on \
             incorporating relevant keywords naturally, improving readability, and making it more \
             discoverable. Keep the professional tone for '{}'. Original post: \"{}\"",
            platform.label(),
            brand,
            text
        ),

        Job::Marketize { platform, text } => format!(
            "Rewrite the following {platform} post in Arabic to be a marketing-focused post for \
             '{brand}'. Emphasize how '{brand}' can help with the topic of the post (e.g., \
             ensuring originality, preventing plagiarism, academic support). Make it persuasive \
             and professional. Original post: \"{text}\"",
            platform = platform.label(),
        ),

        Job::Customize {
            platform,
            text,
            instruction,
        } => format!(
            "Refine the following {} post in Arabic based on these instructions: \"{}\". Keep the \
             professional tone for '{}'. Original post: \"{}\"",
            platform.label(),
            instruction,
            brand,
            text
        ),

        Job::Translate { text, .. } => {
            format!("Translate the following Arabic text to English: \"{}\"", text)
        }

        Job::Advise {
            kind: AdviceKind::Hashtags,
            platform,
            text,
        } => format!(
            "Generate a list of 5-10 highly relevant and trending hashtags and keywords in Arabic \
             for the following {} post. Focus on academic services, education, and the specific \
             topic of the post. Post content: \"{}\"",
            platform.label(),
            text
        ),

        Job::Advise {
            kind: AdviceKind::PerformanceTips,
            platform,
            text,
        } => format!(
            "Provide 3-5 concise and actionable tips in Arabic to improve the performance and \
             engagement of the following {} post. Focus on best practices for that specific \
             platform. Post content: \"{}\"",
            platform.label(),
            text
        ),

        Job::DraftReply {
            channel,
            client_message,
        } => reply_prompt(*channel, client_message, content),

        Job::CustomizeReply {
            channel,
            text,
            instruction,
        } => format!(
            "Refine the following {} message response in Arabic based on these instructions: \
             \"{}\". Maintain the appropriate tone for a client message from '{}'. Original \
             message: \"{}\"",
            channel.label(),
            instruction,
            brand,
            text
        ),
    };

    Ok(prompt)
}

fn ideas_prompt(brand: &str, instruction: Option<&str>) -> String {
    let mut prompt = format!(
        "Generate 3-5 trending and relevant content ideas in Arabic for an academic services \
         center named '{}'. Focus on topics related to academic research, student support, \
         educational challenges, and professional development. The ideas should be engaging for \
         students, researchers, and academics. Provide each idea as a short, catchy title on its \
         own line, prefixed with \"- \".",
        brand
    );

    if let Some(instruction) = instruction.map(str::trim).filter(|i| !i.is_empty()) {
        prompt.push_str(&format!(
            " Apply the following instructions: \"{}\"",
            instruction
        ));
    }

    prompt
}

fn platform_guidance(platform: Platform) -> &'static str {
    match platform {
        Platform::Facebook | Platform::LinkedIn => " Max 200 words.",
        Platform::Twitter => " Be concise (max 280 characters).",
        Platform::Instagram => " Focus on visual appeal, concise text, and strong hashtags.",
        Platform::TikTok => {
            " Suggest a visual concept and trending audio idea suitable for a short, engaging video."
        }
        Platform::YouTube => {
            " Suggest a YouTube video title and a short, engaging description with keywords."
        }
    }
}

fn reply_prompt(channel: Channel, client_message: &str, content: &ContentConfig) -> String {
    match channel {
        Channel::WhatsApp => format!(
            "Generate a concise, friendly, and professional WhatsApp response in Arabic to a \
             client message: \"{}\". The response should be from '{}' and offer assistance. \
             Include a call to action with our WhatsApp number {}.",
            client_message, content.brand, content.whatsapp_contact
        ),
        Channel::Gmail => format!(
            "Generate a formal and professional email response in Arabic to a client message: \
             \"{}\". The response should be from '{}', address the client formally, offer \
             detailed assistance, and include our Gmail: {}. Provide only the email body, no \
             subject or salutation.",
            client_message, content.brand, content.gmail_contact
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postsmith_core::{SlideCount, TranslationKey};

    fn build(job: Job, topic: Option<&str>) -> Result<String> {
        let request = GenerationRequest::new(job, topic.map(str::to_string));
        build_prompt(&request, &ContentConfig::default())
    }

    #[test]
    fn test_post_prompt_carries_topic_brand_and_guidance() {
        let prompt = build(
            Job::GeneratePost {
                platform: Platform::Twitter,
            },
            Some("Avoiding plagiarism"),
        )
        .unwrap();
        assert!(prompt.contains("Twitter post"));
        assert!(prompt.contains("'Avoiding plagiarism'"));
        assert!(prompt.contains("Requires for Academic Services"));
        assert!(prompt.ends_with("(max 280 characters)."));
    }

    #[test]
    fn test_topic_jobs_fail_without_topic() {
        for job in [
            Job::GenerateArticle,
            Job::GenerateImagePrompt,
            Job::GenerateVideoPrompt,
            Job::GenerateCarousel {
                slides: SlideCount::default(),
            },
        ] {
            assert!(build(job, None).is_err());
        }
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let job = Job::GenerateCarousel {
            slides: SlideCount::new(5).unwrap(),
        };
        let first = build(job.clone(), Some("Time management")).unwrap();
        let second = build(job, Some("Time management")).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("Generate 5 concise"));
    }

    #[test]
    fn test_ideas_prompt_instruction() {
        let plain = build(Job::GenerateIdeas { instruction: None }, None).unwrap();
        assert!(!plain.contains("Apply the following instructions"));

        let blank = build(
            Job::GenerateIdeas {
                instruction: Some("  ".into()),
            },
            None,
        )
        .unwrap();
        assert_eq!(plain, blank);

        let custom = build(
            Job::GenerateIdeas {
                instruction: Some("focus on PhD students".into()),
            },
            None,
        )
        .unwrap();
        assert!(custom.ends_with("\"focus on PhD students\""));
    }

    #[test]
    fn test_reply_prompts_use_contacts() {
        let whatsapp = build(
            Job::DraftReply {
                channel: Channel::WhatsApp,
                client_message: "How much for proofreading?".into(),
            },
            None,
        )
        .unwrap();
        assert!(whatsapp.contains("01551053732"));

        let gmail = build(
            Job::DraftReply {
                channel: Channel::Gmail,
                client_message: "How much for proofreading?".into(),
            },
            None,
        )
        .unwrap();
        assert!(gmail.contains("requiresforeducationalservices@gmail.com"));
    }

    #[test]
    fn test_refinement_prompts_quote_source() {
        let prompt = build(
            Job::Translate {
                key: TranslationKey::Article,
                text: "نص".into(),
            },
            None,
        )
        .unwrap();
        assert_eq!(prompt, "Translate the following Arabic text to English: \"نص\"");

        let prompt = build(
            Job::Customize {
                platform: Platform::Instagram,
                text: "original".into(),
                instruction: "add a question".into(),
            },
            None,
        )
        .unwrap();
        assert!(prompt.contains("\"add a question\""));
        assert!(prompt.ends_with("Original post: \"original\""));
    }
}
