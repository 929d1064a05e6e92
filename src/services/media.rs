use regex::Regex;

/// Embeddable player URL for a YouTube link, or `None` for anything else.
pub fn youtube_embed_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() || url == "null" {
        return None;
    }

    let patterns = [
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
        r#"youtube\.com/embed/([^"&?/\s]{11})"#,
    ];

    patterns.iter().find_map(|pattern| {
        let regex = Regex::new(pattern).ok()?;
        let id = regex.captures(url)?.get(1)?.as_str();
        Some(format!(
            "https://www.youtube.com/embed/{}?rel=0&modestbranding=1",
            id
        ))
    })
}
