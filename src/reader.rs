//! Pull-style tag reader over a quick-xml event stream
//!
//! Exposes the current tag, its attributes and element text, and keeps its own
//! open-element stack so nesting errors surface as `UnbalancedMarkup` instead
//! of tokenizer errors.

use crate::error::KmlError;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Kind of token the reader is positioned on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    StartTag,
    EndTag,
    Text,
    EndOfDocument,
}

pub struct TagReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    token: TokenKind,
    name: String,
    attributes: IndexMap<String, String>,
    text: String,
    cached_text: Option<String>,
    open: Vec<String>,
}

impl<'a> TagReader<&'a [u8]> {
    pub fn from_text(source: &'a str) -> Self {
        Self::from_reader(source.as_bytes())
    }
}

impl TagReader<BufReader<File>> {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, KmlError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> TagReader<R> {
    pub fn from_reader(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        // Runs stay untrimmed: comments, CDATA and child elements can split
        // element text, and `read_text` trims only the joined result
        reader
            .trim_text(false)
            .expand_empty_elements(true)
            .check_end_names(false);

        Self {
            reader,
            buf: Vec::new(),
            token: TokenKind::EndOfDocument,
            name: String::new(),
            attributes: IndexMap::new(),
            text: String::new(),
            cached_text: None,
            open: Vec::new(),
        }
    }

    /// Local name (namespace prefix dropped) of the current start or end tag
    pub fn current_tag_name(&self) -> &str {
        &self.name
    }

    /// Attributes of the current start tag, in document order
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn token(&self) -> TokenKind {
        self.token
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Move to the next start tag, end tag, non-blank text run, or end of input
    pub fn advance(&mut self) -> Result<TokenKind, KmlError> {
        self.next_token(false)
    }

    fn next_token(&mut self, keep_blank_text: bool) -> Result<TokenKind, KmlError> {
        self.cached_text = None;

        loop {
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|e| KmlError::MalformedMarkup {
                    position: self.reader.buffer_position(),
                    message: e.to_string(),
                })?;

            match event {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    let attributes =
                        collect_attributes(&start).map_err(|e| KmlError::MalformedMarkup {
                            position: self.reader.buffer_position(),
                            message: e.to_string(),
                        })?;
                    log::trace!("<{}> at depth {}", name, self.open.len());
                    self.open.push(name.clone());
                    self.name = name;
                    self.attributes = attributes;
                    self.token = TokenKind::StartTag;
                    return Ok(self.token);
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.local_name().as_ref()).into_owned();
                    match self.open.pop() {
                        Some(expected) if expected == name => {}
                        expected => {
                            return Err(KmlError::UnbalancedMarkup {
                                expected,
                                found: Some(name),
                            });
                        }
                    }
                    self.name = name;
                    self.attributes.clear();
                    self.token = TokenKind::EndTag;
                    return Ok(self.token);
                }
                Event::Text(text) => {
                    let value = match text.unescape() {
                        Ok(value) => value.into_owned(),
                        Err(e) => {
                            // HTML entities such as &nbsp; are common in descriptions
                            log::debug!("keeping raw text after unescape failure: {}", e);
                            String::from_utf8_lossy(&text).into_owned()
                        }
                    };
                    if !keep_blank_text && value.trim().is_empty() {
                        continue;
                    }
                    self.text = value;
                    self.token = TokenKind::Text;
                    return Ok(self.token);
                }
                Event::CData(cdata) => {
                    self.text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    self.token = TokenKind::Text;
                    return Ok(self.token);
                }
                Event::Eof => {
                    if let Some(expected) = self.open.pop() {
                        return Err(KmlError::UnbalancedMarkup {
                            expected: Some(expected),
                            found: None,
                        });
                    }
                    self.token = TokenKind::EndOfDocument;
                    return Ok(self.token);
                }
                _ => {}
            }
        }
    }

    /// Text content of the element whose start tag is current, up to its end tag.
    ///
    /// Text inside nested child elements is discarded. The reader is left on
    /// the element's end tag; calling again before `advance` returns the same text.
    pub fn read_text(&mut self) -> Result<String, KmlError> {
        if let Some(text) = &self.cached_text {
            return Ok(text.clone());
        }
        match self.token {
            TokenKind::StartTag => {}
            TokenKind::Text => {
                let text = self.text.trim().to_string();
                self.cached_text = Some(text.clone());
                return Ok(text);
            }
            TokenKind::EndTag | TokenKind::EndOfDocument => return Ok(String::new()),
        }

        // Runs are joined as written; whitespace-only runs can separate values
        let depth = self.open.len();
        let mut collected = String::new();
        loop {
            match self.next_token(true)? {
                TokenKind::Text if self.open.len() == depth => collected.push_str(&self.text),
                TokenKind::EndTag if self.open.len() < depth => break,
                TokenKind::EndOfDocument => break,
                _ => {}
            }
        }

        let text = collected.trim().to_string();
        self.cached_text = Some(text.clone());
        Ok(text)
    }

    /// Consume the current element and everything inside it
    pub fn skip_element(&mut self) -> Result<(), KmlError> {
        if self.token != TokenKind::StartTag {
            return Ok(());
        }
        let depth = self.open.len();
        loop {
            match self.advance()? {
                TokenKind::EndTag if self.open.len() < depth => return Ok(()),
                TokenKind::EndOfDocument => return Ok(()),
                _ => {}
            }
        }
    }
}

fn collect_attributes(start: &BytesStart<'_>) -> Result<IndexMap<String, String>, quick_xml::Error> {
    let mut map = IndexMap::new();
    for attr in start.attributes().with_checks(false) {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map(Cow::into_owned)
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        map.insert(key, value);
    }
    Ok(map)
}
