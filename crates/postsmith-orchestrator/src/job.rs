//! Job catalog
//!
//! Every generation operation is a variant of [`Job`] carrying its typed
//! parameters. [`JobId`] is the structured token used to report which job is
//! currently in flight.

use postsmith_core::{Channel, Platform, PostField, PostsmithError, Result, SlideCount, TranslationKey};
use serde::{Deserialize, Serialize};

/// Advisory outputs that are shown to the user but never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    Hashtags,
    PerformanceTips,
}

/// A content-generation operation with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    GenerateIdeas { instruction: Option<String> },
    GeneratePost { platform: Platform },
    GenerateArticle,
    GenerateImagePrompt,
    GenerateVideoPrompt,
    GenerateCarousel { slides: SlideCount },
    Rephrase { platform: Platform, text: String },
    SeoOptimize { platform: Platform, text: String },
    Marketize { platform: Platform, text: String },
    Customize {
        platform: Platform,
        text: String,
        instruction: String,
    },
    Translate { key: TranslationKey, text: String },
    Advise {
        kind: AdviceKind,
        platform: Platform,
        text: String,
    },
    DraftReply {
        channel: Channel,
        client_message: String,
    },
    CustomizeReply {
        channel: Channel,
        text: String,
        instruction: String,
    },
}

/// Job kind without parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Ideas,
    Post,
    Article,
    ImagePrompt,
    VideoPrompt,
    Carousel,
    Rephrase,
    SeoOptimize,
    Marketize,
    Customize,
    Translate,
    Hashtags,
    PerformanceTips,
    DraftReply,
    CustomizeReply,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ideas => "ideas",
            Self::Post => "post",
            Self::Article => "article",
            Self::ImagePrompt => "image-prompt",
            Self::VideoPrompt => "video-prompt",
            Self::Carousel => "carousel",
            Self::Rephrase => "rephrase",
            Self::SeoOptimize => "seo",
            Self::Marketize => "marketing",
            Self::Customize => "customize",
            Self::Translate => "translate",
            Self::Hashtags => "hashtags",
            Self::PerformanceTips => "tips",
            Self::DraftReply => "reply",
            Self::CustomizeReply => "customize-reply",
        };
        f.write_str(name)
    }
}

/// What a job is aimed at, when it is aimed at something specific
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobTarget {
    Platform(Platform),
    Channel(Channel),
    Translation(TranslationKey),
}

impl std::fmt::Display for JobTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Platform(platform) => write!(f, "{}", platform),
            Self::Channel(channel) => write!(f, "{}", channel),
            Self::Translation(key) => write!(f, "{}", key),
        }
    }
}

/// Identity of a job invocation, e.g. `post-facebook` or `article-global`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId {
    pub kind: JobKind,
    pub target: Option<JobTarget>,
}

impl Serialize for JobId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{}-{}", self.kind, target),
            None => write!(f, "{}-global", self.kind),
        }
    }
}

impl Job {
    pub fn kind(&self) -> JobKind {
        match self {
            Job::GenerateIdeas { .. } => JobKind::Ideas,
            Job::GeneratePost { .. } => JobKind::Post,
            Job::GenerateArticle => JobKind::Article,
            Job::GenerateImagePrompt => JobKind::ImagePrompt,
            Job::GenerateVideoPrompt => JobKind::VideoPrompt,
            Job::GenerateCarousel { .. } => JobKind::Carousel,
            Job::Rephrase { .. } => JobKind::Rephrase,
            Job::SeoOptimize { .. } => JobKind::SeoOptimize,
            Job::Marketize { .. } => JobKind::Marketize,
            Job::Customize { .. } => JobKind::Customize,
            Job::Translate { .. } => JobKind::Translate,
            Job::Advise {
                kind: AdviceKind::Hashtags,
                ..
            } => JobKind::Hashtags,
            Job::Advise {
                kind: AdviceKind::PerformanceTips,
                ..
            } => JobKind::PerformanceTips,
            Job::DraftReply { .. } => JobKind::DraftReply,
            Job::CustomizeReply { .. } => JobKind::CustomizeReply,
        }
    }

    pub fn target(&self) -> Option<JobTarget> {
        match self {
            Job::GeneratePost { platform }
            | Job::Rephrase { platform, .. }
            | Job::SeoOptimize { platform, .. }
            | Job::Marketize { platform, .. }
            | Job::Customize { platform, .. }
            | Job::Advise { platform, .. } => Some(JobTarget::Platform(*platform)),
            Job::DraftReply { channel, .. } | Job::CustomizeReply { channel, .. } => {
                Some(JobTarget::Channel(*channel))
            }
            Job::Translate { key, .. } => Some(JobTarget::Translation(*key)),
            Job::GenerateIdeas { .. }
            | Job::GenerateArticle
            | Job::GenerateImagePrompt
            | Job::GenerateVideoPrompt
            | Job::GenerateCarousel { .. } => None,
        }
    }

    pub fn id(&self) -> JobId {
        JobId {
            kind: self.kind(),
            target: self.target(),
        }
    }

    /// Jobs that build their prompt from the selected topic
    pub fn needs_topic(&self) -> bool {
        matches!(
            self,
            Job::GeneratePost { .. }
                | Job::GenerateArticle
                | Job::GenerateImagePrompt
                | Job::GenerateVideoPrompt
                | Job::GenerateCarousel { .. }
        )
    }

    /// The post variant this job owns, if it writes one
    pub fn post_field(&self) -> Option<(Platform, PostField)> {
        match self {
            Job::GeneratePost { platform } => Some((*platform, PostField::Original)),
            Job::Rephrase { platform, .. } => Some((*platform, PostField::Rephrased)),
            Job::SeoOptimize { platform, .. } => Some((*platform, PostField::SeoOptimized)),
            Job::Marketize { platform, .. } => Some((*platform, PostField::Marketing)),
            Job::Customize { platform, .. } => Some((*platform, PostField::Customized)),
            _ => None,
        }
    }

    /// Reject missing required input before any network call
    pub fn validate(&self) -> Result<()> {
        match self {
            Job::Customize { instruction, .. } | Job::CustomizeReply { instruction, .. }
                if instruction.trim().is_empty() =>
            {
                Err(PostsmithError::Validation(
                    "Please enter customization instructions.".to_string(),
                ))
            }
            Job::DraftReply { client_message, .. } if client_message.trim().is_empty() => Err(
                PostsmithError::Validation("Please enter the client's message.".to_string()),
            ),
            Job::Rephrase { text, .. }
            | Job::SeoOptimize { text, .. }
            | Job::Marketize { text, .. }
            | Job::Customize { text, .. }
            | Job::Translate { text, .. }
            | Job::Advise { text, .. }
            | Job::CustomizeReply { text, .. }
                if text.trim().is_empty() =>
            {
                Err(PostsmithError::Validation(format!(
                    "Nothing to {}: source text is empty.",
                    self.kind()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Short description used in failure messages
    pub fn describe(&self) -> String {
        match self {
            Job::GenerateIdeas { .. } => "generate ideas".to_string(),
            Job::GeneratePost { platform } => format!("generate the {} post", platform.label()),
            Job::GenerateArticle => "generate the article".to_string(),
            Job::GenerateImagePrompt => "generate the image prompt".to_string(),
            Job::GenerateVideoPrompt => "generate the video prompt".to_string(),
            Job::GenerateCarousel { .. } => "generate the carousel slides".to_string(),
            Job::Rephrase { platform, .. } => format!("rephrase the {} post", platform.label()),
            Job::SeoOptimize { platform, .. } => {
                format!("optimize the {} post for SEO", platform.label())
            }
            Job::Marketize { platform, .. } => {
                format!("generate a marketing post for {}", platform.label())
            }
            Job::Customize { platform, .. } => format!("customize the {} post", platform.label()),
            Job::Translate { .. } => "translate".to_string(),
            Job::Advise {
                kind: AdviceKind::Hashtags,
                platform,
                ..
            } => format!("generate hashtags/keywords for {}", platform.label()),
            Job::Advise {
                kind: AdviceKind::PerformanceTips,
                platform,
                ..
            } => format!("provide performance tips for {}", platform.label()),
            Job::DraftReply { channel, .. } => {
                format!("generate the {} reply", channel.label())
            }
            Job::CustomizeReply { channel, .. } => {
                format!("customize the {} reply", channel.label())
            }
        }
    }
}

/// One job invocation bound to the topic it runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub job: Job,
    pub topic: Option<String>,
}

impl GenerationRequest {
    pub fn new(job: Job, topic: Option<String>) -> Self {
        Self { job, topic }
    }

    /// The topic, required by topic-driven jobs
    pub fn require_topic(&self) -> Result<&str> {
        self.topic
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                PostsmithError::Validation(format!(
                    "Cannot {} without a selected topic.",
                    self.job.describe()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_ids() {
        let id = Job::GeneratePost {
            platform: Platform::Facebook,
        }
        .id();
        assert_eq!(id.to_string(), "post-facebook");
        assert_eq!(Job::GenerateArticle.id().to_string(), "article-global");

        let id = Job::Translate {
            key: TranslationKey::Idea(1),
            text: "x".into(),
        }
        .id();
        assert_eq!(id.to_string(), "translate-idea:1");

        let id = Job::Advise {
            kind: AdviceKind::PerformanceTips,
            platform: Platform::TikTok,
            text: "x".into(),
        }
        .id();
        assert_eq!(id.kind, JobKind::PerformanceTips);
        assert_eq!(id.to_string(), "tips-tiktok");
    }

    #[test]
    fn test_customize_requires_instruction() {
        let job = Job::Customize {
            platform: Platform::LinkedIn,
            text: "post".into(),
            instruction: "   ".into(),
        };
        assert!(matches!(job.validate(), Err(PostsmithError::Validation(_))));

        let job = Job::Customize {
            platform: Platform::LinkedIn,
            text: "post".into(),
            instruction: "shorter".into(),
        };
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_reply_requires_client_message() {
        let job = Job::DraftReply {
            channel: Channel::WhatsApp,
            client_message: "".into(),
        };
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_post_field_ownership() {
        let rephrase = Job::Rephrase {
            platform: Platform::Twitter,
            text: "t".into(),
        };
        assert_eq!(
            rephrase.post_field(),
            Some((Platform::Twitter, PostField::Rephrased))
        );
        assert_eq!(Job::GenerateArticle.post_field(), None);
        assert!(Job::GenerateArticle.needs_topic());
        assert!(!rephrase.needs_topic());
    }

    #[test]
    fn test_require_topic() {
        let request = GenerationRequest::new(Job::GenerateArticle, None);
        assert!(request.require_topic().is_err());

        let request = GenerationRequest::new(Job::GenerateArticle, Some("  ".into()));
        assert!(request.require_topic().is_err());

        let request = GenerationRequest::new(Job::GenerateArticle, Some("Plagiarism".into()));
        assert_eq!(request.require_topic().unwrap(), "Plagiarism");
    }
}
