/// Text helpers used while normalizing source data
pub mod text {
    /// Strip markup, decode the common entities and collapse whitespace
    pub fn clean_text(html: &str) -> String {
        let stripped = html
            .chars()
            .fold((String::new(), false), |(mut text, in_tag), c| match c {
                '<' => (text, true),
                '>' if in_tag => {
                    text.push(' ');
                    (text, false)
                }
                _ if !in_tag => {
                    text.push(c);
                    (text, in_tag)
                }
                _ => (text, in_tag),
            })
            .0;

        decode_entities(&stripped)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn decode_entities(text: &str) -> String {
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }

    /// Truncate on a word boundary, appending `suffix` when cut
    pub fn truncate(text: &str, max_chars: usize, suffix: &str) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }

        let keep = max_chars.saturating_sub(suffix.chars().count());
        let truncated: String = text.chars().take(keep).collect();
        match truncated.rfind(' ') {
            Some(last_space) if last_space > 0 => format!("{}{}", &truncated[..last_space], suffix),
            _ => format!("{}{}", truncated, suffix),
        }
    }
}

/// URL helpers
pub mod url {
    use url::Url;

    pub fn extract_domain(url_str: &str) -> Option<String> {
        Url::parse(url_str)
            .ok()
            .and_then(|url| url.domain().map(|d| d.to_string()))
    }

    pub fn is_remote(location: &str) -> bool {
        match Url::parse(location) {
            Ok(url) => url.scheme() == "http" || url.scheme() == "https",
            Err(_) => false,
        }
    }

    /// Resolve `href` against the page it was found on
    pub fn resolve(base: &str, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        if let Ok(absolute) = Url::parse(href) {
            return Some(absolute.to_string());
        }
        Url::parse(base)
            .and_then(|base| base.join(href))
            .ok()
            .map(|u| u.to_string())
    }
}
