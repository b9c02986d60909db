//! Core type definitions for Postsmith content generation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ErrorKind, PostsmithError, Result};

/// Social platforms that receive generated posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    TikTok,
    LinkedIn,
    Twitter,
    YouTube,
}

impl Platform {
    /// Every post-capable platform, in catalog order
    pub const ALL: [Platform; 6] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::TikTok,
        Platform::LinkedIn,
        Platform::Twitter,
        Platform::YouTube,
    ];

    /// Human-readable platform name used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::YouTube => "YouTube",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Facebook => write!(f, "facebook"),
            Self::Instagram => write!(f, "instagram"),
            Self::TikTok => write!(f, "tiktok"),
            Self::LinkedIn => write!(f, "linkedin"),
            Self::Twitter => write!(f, "twitter"),
            Self::YouTube => write!(f, "youtube"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "facebook" | "fb" => Ok(Self::Facebook),
            "instagram" | "ig" => Ok(Self::Instagram),
            "tiktok" => Ok(Self::TikTok),
            "linkedin" => Ok(Self::LinkedIn),
            "twitter" | "x" => Ok(Self::Twitter),
            "youtube" | "yt" => Ok(Self::YouTube),
            _ => Err(format!("Invalid platform: {}", s)),
        }
    }
}

/// Direct-message channels that receive drafted client replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    WhatsApp,
    Gmail,
}

impl Channel {
    pub fn label(&self) -> &'static str {
        match self {
            Channel::WhatsApp => "WhatsApp",
            Channel::Gmail => "Gmail",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WhatsApp => write!(f, "whatsapp"),
            Self::Gmail => write!(f, "gmail"),
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whatsapp" => Ok(Self::WhatsApp),
            "gmail" | "email" => Ok(Self::Gmail),
            _ => Err(format!("Invalid channel: {}", s)),
        }
    }
}

/// Variants of a post, each owned by exactly one job kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostField {
    Original,
    Translated,
    Rephrased,
    SeoOptimized,
    Marketing,
    Customized,
}

impl std::fmt::Display for PostField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Translated => write!(f, "translated"),
            Self::Rephrased => write!(f, "rephrased"),
            Self::SeoOptimized => write!(f, "seo_optimized"),
            Self::Marketing => write!(f, "marketing"),
            Self::Customized => write!(f, "customized"),
        }
    }
}

/// All generated variants of one platform's post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rephrased: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_optimized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customized: Option<String>,
}

impl PostRecord {
    pub fn get(&self, field: PostField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Overwrite one variant, leaving the others untouched
    pub fn set(&mut self, field: PostField, text: impl Into<String>) {
        *self.slot_mut(field) = Some(text.into());
    }

    fn slot(&self, field: PostField) -> &Option<String> {
        match field {
            PostField::Original => &self.original,
            PostField::Translated => &self.translated,
            PostField::Rephrased => &self.rephrased,
            PostField::SeoOptimized => &self.seo_optimized,
            PostField::Marketing => &self.marketing,
            PostField::Customized => &self.customized,
        }
    }

    fn slot_mut(&mut self, field: PostField) -> &mut Option<String> {
        match field {
            PostField::Original => &mut self.original,
            PostField::Translated => &mut self.translated,
            PostField::Rephrased => &mut self.rephrased,
            PostField::SeoOptimized => &mut self.seo_optimized,
            PostField::Marketing => &mut self.marketing,
            PostField::Customized => &mut self.customized,
        }
    }
}

/// One slide of a carousel post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselSlide {
    pub title: String,
    pub description: String,
}

/// Number of carousel slides to request (2 to 10 inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlideCount(u8);

impl SlideCount {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 10;

    pub fn new(count: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(PostsmithError::Validation(format!(
                "Carousel slide count must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                count
            )))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for SlideCount {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for SlideCount {
    type Error = PostsmithError;

    fn try_from(count: u8) -> Result<Self> {
        Self::new(count)
    }
}

impl From<SlideCount> for u8 {
    fn from(count: SlideCount) -> u8 {
        count.0
    }
}

impl std::fmt::Display for SlideCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one translatable unit of content
///
/// Renders as a composite string (e.g. `post:facebook:original`, `idea:2`)
/// which is the key of [`ContentStore::translations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationKey {
    PostOriginal(Platform),
    Idea(usize),
    Article,
    ImagePrompt(usize),
    VideoPrompt(usize),
    CarouselSlide(usize),
    Reply(Channel),
}

impl TranslationKey {
    /// Platform whose `translated` post field mirrors this translation
    pub fn post_platform(&self) -> Option<Platform> {
        match self {
            TranslationKey::PostOriginal(platform) => Some(*platform),
            _ => None,
        }
    }
}

impl std::fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PostOriginal(platform) => write!(f, "post:{}:original", platform),
            Self::Idea(index) => write!(f, "idea:{}", index),
            Self::Article => write!(f, "article"),
            Self::ImagePrompt(index) => write!(f, "image-prompt:{}", index),
            Self::VideoPrompt(index) => write!(f, "video-prompt:{}", index),
            Self::CarouselSlide(index) => write!(f, "carousel-slide:{}", index),
            Self::Reply(channel) => write!(f, "reply:{}", channel),
        }
    }
}

impl std::str::FromStr for TranslationKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let index = |raw: &str| {
            raw.parse::<usize>()
                .map_err(|_| format!("Invalid index in translation key: {}", s))
        };

        match parts.as_slice() {
            ["post", platform, "original"] => Ok(Self::PostOriginal(platform.parse()?)),
            ["idea", i] => Ok(Self::Idea(index(i)?)),
            ["article"] => Ok(Self::Article),
            ["image-prompt", i] => Ok(Self::ImagePrompt(index(i)?)),
            ["video-prompt", i] => Ok(Self::VideoPrompt(index(i)?)),
            ["carousel-slide", i] => Ok(Self::CarouselSlide(index(i)?)),
            ["reply", channel] => Ok(Self::Reply(channel.parse()?)),
            _ => Err(format!("Invalid translation key: {}", s)),
        }
    }
}

/// Every artifact generated for the currently selected topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStore {
    pub posts: BTreeMap<Platform, PostRecord>,
    pub article: Option<String>,
    pub image_prompts: Vec<String>,
    pub video_prompts: Vec<String>,
    pub carousel_slides: Vec<CarouselSlide>,
    /// Composite key (see [`TranslationKey`]) to translated text
    pub translations: BTreeMap<String, String>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear back to the empty initial form
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True once any generated content field is populated
    pub fn has_content(&self) -> bool {
        self.article.is_some()
            || !self.posts.is_empty()
            || !self.image_prompts.is_empty()
            || !self.video_prompts.is_empty()
            || !self.carousel_slides.is_empty()
    }

    pub fn post(&self, platform: Platform) -> Option<&PostRecord> {
        self.posts.get(&platform)
    }

    pub fn set_post_field(&mut self, platform: Platform, field: PostField, text: impl Into<String>) {
        self.posts.entry(platform).or_default().set(field, text);
    }

    pub fn set_article(&mut self, html: impl Into<String>) {
        self.article = Some(html.into());
    }

    pub fn replace_image_prompts(&mut self, prompt: impl Into<String>) {
        self.image_prompts = vec![prompt.into()];
    }

    pub fn replace_video_prompts(&mut self, prompt: impl Into<String>) {
        self.video_prompts = vec![prompt.into()];
    }

    pub fn replace_carousel(&mut self, slides: Vec<CarouselSlide>) {
        self.carousel_slides = slides;
    }

    /// Store a translation; post-original translations also fill the post's `translated` field
    pub fn set_translation(&mut self, key: TranslationKey, text: impl Into<String>) {
        let text = text.into();
        if let Some(platform) = key.post_platform() {
            self.set_post_field(platform, PostField::Translated, text.clone());
        }
        self.translations.insert(key.to_string(), text);
    }

    pub fn translation(&self, key: &TranslationKey) -> Option<&str> {
        self.translations.get(&key.to_string()).map(String::as_str)
    }
}

/// Outcome of a single generation job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success { text: String },
    Failure { reason: ErrorKind, message: String },
}

impl GenerationResult {
    pub fn failure(error: &PostsmithError) -> Self {
        GenerationResult::Failure {
            reason: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            GenerationResult::Success { text } => Some(text),
            GenerationResult::Failure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("facebook".parse::<Platform>().unwrap(), Platform::Facebook);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("LinkedIn".parse::<Platform>().unwrap(), Platform::LinkedIn);
        assert!("myspace".parse::<Platform>().is_err());
        assert!("whatsapp".parse::<Platform>().is_err());
    }

    #[test]
    fn test_channel_from_str() {
        assert_eq!("whatsapp".parse::<Channel>().unwrap(), Channel::WhatsApp);
        assert_eq!("email".parse::<Channel>().unwrap(), Channel::Gmail);
        assert!("sms".parse::<Channel>().is_err());
    }

    #[test]
    fn test_slide_count_bounds() {
        assert!(SlideCount::new(1).is_err());
        assert_eq!(SlideCount::new(2).unwrap().get(), 2);
        assert_eq!(SlideCount::new(10).unwrap().get(), 10);
        assert!(SlideCount::new(11).is_err());
        assert_eq!(SlideCount::default().get(), 3);
    }

    #[test]
    fn test_translation_key_composite_form() {
        let key = TranslationKey::PostOriginal(Platform::Instagram);
        assert_eq!(key.to_string(), "post:instagram:original");
        assert_eq!(TranslationKey::Idea(2).to_string(), "idea:2");
        assert_eq!(TranslationKey::CarouselSlide(0).to_string(), "carousel-slide:0");

        for key in [
            TranslationKey::PostOriginal(Platform::YouTube),
            TranslationKey::Idea(4),
            TranslationKey::Article,
            TranslationKey::ImagePrompt(0),
            TranslationKey::VideoPrompt(0),
            TranslationKey::CarouselSlide(9),
            TranslationKey::Reply(Channel::Gmail),
        ] {
            assert_eq!(key.to_string().parse::<TranslationKey>().unwrap(), key);
        }
        assert!("idea:x".parse::<TranslationKey>().is_err());
        assert!("post:facebook".parse::<TranslationKey>().is_err());
    }

    #[test]
    fn test_post_fields_are_independent() {
        let mut store = ContentStore::new();
        store.set_post_field(Platform::Facebook, PostField::Original, "first");
        store.set_post_field(Platform::Facebook, PostField::Rephrased, "second");
        store.set_post_field(Platform::Facebook, PostField::Original, "third");

        let record = store.post(Platform::Facebook).unwrap();
        assert_eq!(record.get(PostField::Original), Some("third"));
        assert_eq!(record.get(PostField::Rephrased), Some("second"));
        assert_eq!(record.get(PostField::Marketing), None);
        assert!(store.post(Platform::Twitter).is_none());
    }

    #[test]
    fn test_post_translation_mirrors_into_record() {
        let mut store = ContentStore::new();
        store.set_post_field(Platform::Twitter, PostField::Original, "مرحبا");
        store.set_translation(TranslationKey::PostOriginal(Platform::Twitter), "Hello");
        store.set_translation(TranslationKey::Idea(0), "Idea in English");

        assert_eq!(
            store.post(Platform::Twitter).unwrap().get(PostField::Translated),
            Some("Hello")
        );
        assert_eq!(store.translations.get("post:twitter:original").unwrap(), "Hello");
        assert_eq!(
            store.translation(&TranslationKey::Idea(0)),
            Some("Idea in English")
        );
        assert_eq!(store.posts.len(), 1);
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let mut store = ContentStore::new();
        assert!(store.is_empty());
        assert!(!store.has_content());

        store.set_article("<div></div>");
        store.replace_image_prompts("a");
        store.replace_image_prompts("b");
        assert_eq!(store.image_prompts, vec!["b".to_string()]);
        assert!(store.has_content());

        store.reset();
        assert!(store.is_empty());
        assert!(store.posts.is_empty());
        assert!(store.article.is_none());
    }

    #[test]
    fn test_generation_result_from_error() {
        let result = GenerationResult::failure(&PostsmithError::Validation("empty".into()));
        assert!(!result.is_success());
        assert!(matches!(
            result,
            GenerationResult::Failure {
                reason: ErrorKind::Validation,
                ..
            }
        ));

        let ok = GenerationResult::Success { text: "hi".into() };
        assert_eq!(ok.text(), Some("hi"));
    }
}
