use crate::types::{RadarError, Result, SourceSpec};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

/// One feed listed in an OPML document.
#[derive(Debug, Clone, PartialEq)]
pub struct OpmlFeed {
    pub title: String,
    pub url: String,
}

/// Reads feed lists out of OPML subscription exports.
#[derive(Debug, Clone, Default)]
pub struct OpmlParser;

impl OpmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Every `outline` element carrying an `xmlUrl`, in document order.
    pub fn parse_outlines(&self, raw: &str) -> Result<Vec<OpmlFeed>> {
        let mut reader = Reader::from_str(raw);
        let mut feeds = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                    if element.name().as_ref() == b"outline" {
                        if let Some(feed) = outline_feed(&element, &reader)? {
                            feeds.push(feed);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(RadarError::Parse(format!(
                        "Invalid OPML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        info!("Found {} feeds in OPML document", feeds.len());
        Ok(feeds)
    }

    /// Feed sources for the first `source.max_feeds` outlines, each capped at
    /// `source.max_articles_per_feed` articles.
    pub fn feed_sources(&self, raw: &str, source: &SourceSpec) -> Result<Vec<SourceSpec>> {
        let feeds = self.parse_outlines(raw)?;
        Ok(feeds
            .into_iter()
            .take(source.max_feeds)
            .map(|feed| {
                let mut spec = SourceSpec::rss(feed.title, feed.url);
                spec.max_articles = source.max_articles_per_feed;
                spec
            })
            .collect())
    }
}

fn outline_feed(element: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Option<OpmlFeed>> {
    let mut url = None;
    let mut title = None;
    let mut text = None;

    for attribute in element.attributes() {
        let attribute =
            attribute.map_err(|e| RadarError::Parse(format!("Invalid OPML attribute: {}", e)))?;
        let value = attribute
            .decode_and_unescape_value(reader)
            .map_err(|e| RadarError::Parse(format!("Invalid OPML attribute value: {}", e)))?
            .trim()
            .to_string();

        match attribute.key.as_ref() {
            b"xmlUrl" => url = Some(value),
            b"title" => title = Some(value),
            b"text" => text = Some(value),
            _ => {}
        }
    }

    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    let title = title
        .filter(|t| !t.is_empty())
        .or(text.filter(|t| !t.is_empty()))
        .unwrap_or_default();
    debug!("OPML outline: {} ({})", title, url);
    Ok(Some(OpmlFeed { title, url }))
}
