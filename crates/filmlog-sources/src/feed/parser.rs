use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::BTreeMap;

use crate::error::SourceError;

/// One item/entry of a feed before any domain interpretation
///
/// Namespaced children (`prefix:name`) are kept verbatim under
/// `extensions[prefix][name]`, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeedEntry {
    pub guid: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: Option<String>,
    pub extensions: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl RawFeedEntry {
    /// Whether the entry carries any field under the given namespace prefix
    pub fn has_extension(&self, namespace: &str) -> bool {
        self.extensions.contains_key(namespace)
    }

    /// First non-empty value of `namespace:field`, or `None` when absent
    pub fn extension(&self, namespace: &str, field: &str) -> Option<&str> {
        self.extensions
            .get(namespace)?
            .get(field)?
            .iter()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }

    fn assign(&mut self, name: &str, value: String) {
        if let Some((prefix, local)) = name.split_once(':') {
            self.extensions
                .entry(prefix.to_string())
                .or_default()
                .entry(local.to_string())
                .or_default()
                .push(value);
            return;
        }

        match name {
            "guid" | "id" => self.guid = value,
            "title" => self.title = value,
            "link" => {
                if self.link.is_empty() {
                    self.link = value;
                }
            }
            // Atom feeds may carry both; the first one seen wins
            "description" | "summary" | "content" => {
                if self.description.is_empty() {
                    self.description = value;
                }
            }
            "pubDate" | "published" => self.published = Some(value),
            _ => {}
        }
    }
}

fn is_entry_element(name: &str) -> bool {
    name == "item" || name == "entry"
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Parse an RSS or Atom document into its entries, in feed order
pub fn parse_feed(xml: &[u8]) -> Result<Vec<RawFeedEntry>, SourceError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut current: Option<RawFeedEntry> = None;
    // Nesting depth below the current item; direct children are depth 1
    let mut depth = 0usize;
    let mut field: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if current.is_none() {
                    if is_entry_element(&name) {
                        current = Some(RawFeedEntry::default());
                        depth = 0;
                    }
                } else {
                    depth += 1;
                    if depth == 1 {
                        field = Some(name);
                        text.clear();
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                // Atom links are attribute-only: <link href="..."/>
                if let Some(entry) = current.as_mut() {
                    if depth == 0 && element_name(&e) == "link" && entry.link.is_empty() {
                        if let Ok(Some(href)) = e.try_get_attribute("href") {
                            if let Ok(value) = href.unescape_value() {
                                entry.link = value.into_owned();
                            }
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    let value = e
                        .unescape()
                        .map_err(|e| SourceError::FeedParse(format!("invalid text content: {}", e)))?;
                    text.push_str(&value);
                }
            }
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                if current.is_some() {
                    if depth == 0 {
                        if let Some(entry) = current.take() {
                            entries.push(entry);
                        }
                    } else {
                        if depth == 1 {
                            if let (Some(entry), Some(name)) = (current.as_mut(), field.take()) {
                                entry.assign(&name, text.trim().to_string());
                            }
                            text.clear();
                        }
                        depth -= 1;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SourceError::FeedParse(format!(
                    "XML parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if current.is_some() {
        return Err(SourceError::FeedParse("document ended inside an unterminated item".to_string()));
    }

    tracing::debug!("Parsed {} entries from feed", entries.len());
    Ok(entries)
}
