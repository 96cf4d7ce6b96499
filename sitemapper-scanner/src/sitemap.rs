//! Namespace-agnostic parsing of `<urlset>` and `<sitemapindex>` documents.
//!
//! Elements are matched on their local name only. Sitemaps in the wild declare
//! the `http://www.sitemaps.org/schemas/sitemap/0.9` namespace inconsistently
//! (default namespace, a prefix, or none at all) and all of them must parse.

use crate::error::{Result, ScanError};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A parsed sitemap document, dispatched on its root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: `loc` of every child `<sitemap>`
    Index(Vec<String>),
    /// `<urlset>`: `loc` of every child `<url>`
    UrlSet(Vec<String>),
}

impl SitemapDocument {
    pub fn locs(&self) -> &[String] {
        match self {
            SitemapDocument::Index(locs) | SitemapDocument::UrlSet(locs) => locs,
        }
    }
}

#[derive(Clone, Copy)]
enum Root {
    Index,
    UrlSet,
}

impl Root {
    fn entry_name(self) -> &'static [u8] {
        match self {
            Root::Index => b"sitemap",
            Root::UrlSet => b"url",
        }
    }
}

fn root_from_name(name: &[u8]) -> Result<Root> {
    match name {
        b"sitemapindex" => Ok(Root::Index),
        b"urlset" => Ok(Root::UrlSet),
        other => Err(ScanError::UnknownRoot(
            String::from_utf8_lossy(other).into_owned(),
        )),
    }
}

/// Parse a sitemap body.
///
/// Text is decoded with the encoding named in the XML declaration (UTF-8 when
/// there is none). Entries without a `loc` child (or with an empty one) are
/// skipped. Unknown roots and malformed XML are errors.
pub fn parse_sitemap(xml: &[u8]) -> Result<SitemapDocument> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut root: Option<Root> = None;
    let mut root_closed = false;

    let mut in_entry = false;
    let mut in_loc = false;
    let mut loc_text = String::new();
    let mut entry_loc: Option<String> = None;
    let mut locs = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| ScanError::ParseError(e.to_string()))?;

        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                match (stack.len(), root) {
                    (0, _) if root_closed => {
                        return Err(ScanError::ParseError(
                            "content after the root element".to_string(),
                        ));
                    }
                    (0, _) => root = Some(root_from_name(&name)?),
                    (1, Some(kind)) if name == kind.entry_name() => {
                        in_entry = true;
                        entry_loc = None;
                    }
                    (2, Some(_)) if in_entry && name == b"loc" => {
                        in_loc = true;
                        loc_text.clear();
                    }
                    _ => {}
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                if stack.is_empty() {
                    if root_closed {
                        return Err(ScanError::ParseError(
                            "content after the root element".to_string(),
                        ));
                    }
                    root = Some(root_from_name(e.local_name().as_ref())?);
                    root_closed = true;
                }
            }
            Event::Text(t) if in_loc => {
                let text = t
                    .unescape()
                    .map_err(|e| ScanError::ParseError(e.to_string()))?;
                loc_text.push_str(&text);
            }
            Event::CData(c) if in_loc => {
                let text = c
                    .decode()
                    .map_err(|e| ScanError::ParseError(e.to_string()))?;
                loc_text.push_str(&text);
            }
            Event::End(_) => {
                stack.pop();
                match stack.len() {
                    2 if in_loc => {
                        in_loc = false;
                        entry_loc = Some(loc_text.trim().to_string());
                    }
                    1 if in_entry => {
                        in_entry = false;
                        if let Some(loc) = entry_loc.take().filter(|loc| !loc.is_empty()) {
                            locs.push(loc);
                        }
                    }
                    0 => root_closed = true,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ScanError::ParseError(format!(
            "unexpected end of document inside <{}>",
            String::from_utf8_lossy(open)
        )));
    }

    match root {
        Some(Root::Index) => Ok(SitemapDocument::Index(locs)),
        Some(Root::UrlSet) => Ok(SitemapDocument::UrlSet(locs)),
        None => Err(ScanError::ParseError("no root element".to_string())),
    }
}
