use lazy_static::lazy_static;
use regex::Regex;

/// Pulls the video identifier out of the URL shapes users actually paste:
/// `youtube.com/watch?v=ID`, `youtu.be/ID` and `youtube.com/embed/ID`.
pub fn extract_youtube_id(url: &str) -> Option<String> {
    lazy_static! {
        static ref PATTERNS: [Regex; 3] = [
            Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]+)").unwrap(),
            Regex::new(r"(?:https?://)?(?:www\.)?youtu\.be/([a-zA-Z0-9_-]+)").unwrap(),
            Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]+)").unwrap(),
        ];
    }
    PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| caps[1].to_string())
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_all_supported_url_shapes() {
        for url in [
            "https://www.youtube.com/watch?v=abc123",
            "https://youtu.be/abc123",
            "https://www.youtube.com/embed/abc123",
            "http://youtube.com/watch?v=abc123",
            "www.youtu.be/abc123",
        ] {
            assert_eq!(extract_youtube_id(url).as_deref(), Some("abc123"), "{url}");
        }
    }

    #[test]
    fn handles_ids_with_dash_and_underscore() {
        assert_eq!(
            extract_youtube_id("https://youtu.be/a-b_C9").as_deref(),
            Some("a-b_C9")
        );
    }

    #[test]
    fn unrelated_urls_yield_nothing() {
        assert_eq!(extract_youtube_id("https://vimeo.com/12345"), None);
        assert_eq!(extract_youtube_id("not a url"), None);
        assert_eq!(extract_youtube_id("https://www.youtube.com/watch"), None);
    }

    #[test]
    fn embed_url_targets_the_embed_endpoint() {
        assert_eq!(embed_url("abc123"), "https://www.youtube.com/embed/abc123");
    }
}
