//! Parsing of generated text into structured content

use postsmith_core::{CarouselSlide, PostsmithError, Result, SlideCount};
use regex::Regex;
use std::sync::LazyLock;

/// `- idea`, `* idea`, `• idea` or `3. idea`
static IDEA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•]\s+|\d+\.\s*)(.+?)\s*$").expect("valid idea regex")
});

/// `Slide 2:`, `**Slide 2:**` or `slide 2 -`
static SLIDE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:\*\*)?\s*slide\s*\d+\s*[:.\-]\s*(?:\*\*)?\s*")
        .expect("valid slide regex")
});

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid blank line regex"));

/// Extract list items from generated ideas text
///
/// Only lines opening with `-`, `*` or `•` followed by a space, or with
/// `N.`, count; the marker is stripped. Everything else (bold headings,
/// rules, notes, blank lines) is ignored.
pub fn parse_ideas(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| IDEA_LINE.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_matches('*').trim().to_string())
        .filter(|idea| !is_marker_only(idea))
        .collect()
}

fn is_marker_only(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || matches!(c, '-' | '*' | '•' | '_' | '='))
}

/// Split generated carousel text into exactly `count` slides
///
/// Blocks are separated by blank lines. The first line of a block, minus any
/// `Slide N:` prefix, is the title; the remaining lines are the description.
/// With surplus blocks, any preamble before the first `Slide N:` block is
/// skipped and the rest is truncated; too few blocks is an error.
pub fn parse_carousel(text: &str, count: SlideCount) -> Result<Vec<CarouselSlide>> {
    let wanted = usize::from(count.get());

    let mut blocks: Vec<&str> = BLANK_LINE
        .split(text.trim())
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect();

    if blocks.len() > wanted {
        if let Some(first) = blocks.iter().position(|block| SLIDE_PREFIX.is_match(block)) {
            let preamble = first.min(blocks.len() - wanted);
            if preamble > 0 {
                tracing::debug!("Skipping {} carousel preamble block(s)", preamble);
                blocks.drain(..preamble);
            }
        }
    }

    let mut slides: Vec<CarouselSlide> = blocks.into_iter().map(parse_slide).collect();

    if slides.len() < wanted {
        return Err(PostsmithError::Parse(format!(
            "Expected {} carousel slides, got {}",
            wanted,
            slides.len()
        )));
    }

    if slides.len() > wanted {
        tracing::warn!(
            "Carousel response had {} slides, keeping the first {}",
            slides.len(),
            wanted
        );
        slides.truncate(wanted);
    }

    Ok(slides)
}

fn parse_slide(block: &str) -> CarouselSlide {
    let mut lines = block.lines();
    let first = lines.next().unwrap_or_default();

    let title = SLIDE_PREFIX
        .replace(first, "")
        .trim()
        .trim_matches('*')
        .trim()
        .to_string();

    let description = lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    CarouselSlide { title, description }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ideas_mixed_markers() {
        let ideas = parse_ideas("- Idea A\n2. Idea B\n\nnotes");
        assert_eq!(ideas, vec!["Idea A".to_string(), "Idea B".to_string()]);
    }

    #[test]
    fn test_parse_ideas_other_bullets() {
        let text = "Here are some ideas:\n* First\n• Second\n  10. Tenth  \n-\n";
        assert_eq!(parse_ideas(text), vec!["First", "Second", "Tenth"]);
        assert!(parse_ideas("no list here").is_empty());

        let text = "**أفكار المحتوى:**\n- Idea A\n- Idea B\n---\n- ***\n* **Bold idea**";
        assert_eq!(parse_ideas(text), vec!["Idea A", "Idea B", "Bold idea"]);
    }

    #[test]
    fn test_parse_carousel_three_slides() {
        let text = "Slide 1: T1\nD1\n\nSlide 2: T2\nD2\n\nSlide 3: T3\nD3";
        let slides = parse_carousel(text, SlideCount::default()).unwrap();
        assert_eq!(slides.len(), 3);
        assert_eq!(
            slides[0],
            CarouselSlide {
                title: "T1".into(),
                description: "D1".into()
            }
        );
        assert_eq!(slides[2].title, "T3");
        assert_eq!(slides[2].description, "D3");
    }

    #[test]
    fn test_parse_carousel_bold_prefix_and_multiline_description() {
        let text = "**Slide 1: Plan**\nStep one\nStep two\n\n  \nslide 2 - Write\nDraft it";
        let slides = parse_carousel(text, SlideCount::new(2).unwrap()).unwrap();
        assert_eq!(slides[0].title, "Plan");
        assert_eq!(slides[0].description, "Step one\nStep two");
        assert_eq!(slides[1].title, "Write");
    }

    #[test]
    fn test_parse_carousel_count_mismatch() {
        let text = "Slide 1: A\na\n\nSlide 2: B\nb\n\nSlide 3: C\nc";
        let slides = parse_carousel(text, SlideCount::new(2).unwrap()).unwrap();
        assert_eq!(slides.len(), 2);

        let result = parse_carousel(text, SlideCount::new(4).unwrap());
        assert!(matches!(result, Err(PostsmithError::Parse(_))));
    }

    #[test]
    fn test_parse_carousel_skips_preamble() {
        let text = "Here are your slides:\n\nSlide 1: T1\nD1\n\nSlide 2: T2\nD2\n\nSlide 3: T3\nD3";
        let slides = parse_carousel(text, SlideCount::default()).unwrap();
        let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["T1", "T2", "T3"]);
        assert_eq!(slides[2].description, "D3");

        let unprefixed = "Intro\n\nOne\na\n\nTwo\nb\n\nThree\nc";
        let slides = parse_carousel(unprefixed, SlideCount::default()).unwrap();
        assert_eq!(slides[0].title, "Intro");
    }
}
