//! # Response Renderer
//!
//! Prints the status line of an outcome in the success or failure style and
//! then its body: XML bodies are pretty-printed with colored markup, anything
//! else (including XML that fails to parse) is printed as decoded text.

use super::ansi_escape_codes::*;
use crate::repl::io::Console;
use crate::repl::services::HttpResponse;
use anyhow::{bail, Result};
use bytes::Bytes;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

const INDENT: &str = "    ";

/// The terminal result of one send
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: u16,
    pub reason: String,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub success: bool,
}

impl From<HttpResponse> for Outcome {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            reason: response.reason.clone(),
            content_type: response.content_type().map(str::to_string),
            success: response.is_success(),
            body: response.body,
        }
    }
}

impl Outcome {
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status, self.reason).trim_end().to_string()
    }
}

/// Whether `content_type` names an XML media type. Parameters are ignored.
pub fn is_xml(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    match media_type.strip_prefix("application/") {
        Some(subtype) => subtype == "xml" || subtype.ends_with("+xml"),
        None => media_type == "text/xml",
    }
}

/// Decode a body using the `charset` parameter of `content_type`
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset)
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);
    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!("Body contained malformed {} sequences", encoding.name());
    }
    text.into_owned()
}

fn charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// Owned markup token collected before formatting
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Start(String, Vec<(String, String)>),
    Empty(String, Vec<(String, String)>),
    End(String),
    Text(String),
    Markup(String),
}

fn start_token(e: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>)> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        // validates entity references; the raw form is what gets displayed
        attr.unescape_value()?;
        attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        ));
    }
    Ok((name, attributes))
}

fn tokenize(body: &[u8]) -> Result<Vec<Token>> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if depth == 0 && seen_root {
                    bail!("more than one root element");
                }
                seen_root = true;
                depth += 1;
                let (name, attrs) = start_token(&e)?;
                tokens.push(Token::Start(name, attrs));
            }
            Event::Empty(e) => {
                if depth == 0 && seen_root {
                    bail!("more than one root element");
                }
                seen_root = true;
                let (name, attrs) = start_token(&e)?;
                tokens.push(Token::Empty(name, attrs));
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                tokens.push(Token::End(String::from_utf8_lossy(e.name().as_ref()).into_owned()));
            }
            Event::Text(e) => {
                if depth == 0 {
                    bail!("text outside the root element");
                }
                e.unescape()?;
                tokens.push(Token::Text(String::from_utf8_lossy(&e).into_owned()));
            }
            Event::CData(e) => {
                tokens.push(Token::Text(format!("<![CDATA[{}]]>", String::from_utf8_lossy(&e))));
            }
            Event::Comment(e) => {
                tokens.push(Token::Markup(format!("<!--{}-->", String::from_utf8_lossy(&e))));
            }
            Event::Decl(e) => {
                tokens.push(Token::Markup(format!("<?{}?>", String::from_utf8_lossy(&e))));
            }
            Event::PI(e) => {
                tokens.push(Token::Markup(format!("<?{}?>", String::from_utf8_lossy(&e))));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        bail!("unclosed element at end of document");
    }
    if !seen_root {
        bail!("no root element");
    }
    Ok(tokens)
}

fn open_tag(name: &str, attrs: &[(String, String)], empty: bool, color: bool) -> String {
    let (element, attribute, value, reset) = if color {
        (STYLE_ELEMENT, STYLE_ATTRIBUTE, STYLE_VALUE, RESET)
    } else {
        ("", "", "", "")
    };
    let mut tag = format!("<{element}{name}{reset}");
    for (key, val) in attrs {
        tag.push_str(&format!(" {attribute}{key}{reset}=\"{value}{val}{reset}\""));
    }
    tag.push_str(if empty { "/>" } else { ">" });
    tag
}

fn close_tag(name: &str, color: bool) -> String {
    if color {
        format!("</{STYLE_ELEMENT}{name}{RESET}>")
    } else {
        format!("</{name}>")
    }
}

/// Re-indent an XML document, one element per line. Elements holding only
/// text stay on one line. Fails on malformed input.
pub fn pretty_print_xml(body: &[u8], color: bool) -> Result<String> {
    let tokens = tokenize(body)?;
    let mut out = String::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        let indent = INDENT.repeat(depth);
        match (&tokens[i], tokens.get(i + 1), tokens.get(i + 2)) {
            (Token::Start(name, attrs), Some(Token::Text(text)), Some(Token::End(_))) => {
                out.push_str(&format!(
                    "{indent}{}{text}{}\n",
                    open_tag(name, attrs, false, color),
                    close_tag(name, color)
                ));
                i += 3;
            }
            (Token::Start(name, attrs), Some(Token::End(_)), _) | (Token::Empty(name, attrs), _, _) => {
                out.push_str(&format!("{indent}{}\n", open_tag(name, attrs, true, color)));
                i += if matches!(tokens[i], Token::Start(..)) { 2 } else { 1 };
            }
            (Token::Start(name, attrs), _, _) => {
                out.push_str(&format!("{indent}{}\n", open_tag(name, attrs, false, color)));
                depth += 1;
                i += 1;
            }
            (Token::End(name), _, _) => {
                depth = depth.saturating_sub(1);
                out.push_str(&format!("{}{}\n", INDENT.repeat(depth), close_tag(name, color)));
                i += 1;
            }
            (Token::Text(text), _, _) => {
                out.push_str(&format!("{indent}{text}\n"));
                i += 1;
            }
            (Token::Markup(markup), _, _) => {
                if color {
                    out.push_str(&format!("{indent}{STYLE_MARKUP}{markup}{RESET}\n"));
                } else {
                    out.push_str(&format!("{indent}{markup}\n"));
                }
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Writes outcomes to a console
#[derive(Debug, Clone, Copy)]
pub struct ResponseRenderer {
    color: bool,
}

impl Default for ResponseRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ResponseRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Print `outcome` and hand back its success flag
    pub fn render(&self, outcome: &Outcome, console: &mut dyn Console) -> Result<bool> {
        let status = outcome.status_line();
        if self.color {
            let style = if outcome.success { STYLE_SUCCESS } else { STYLE_FAILURE };
            console.println(&format!("{style}{status}{RESET}"))?;
        } else {
            console.println(&status)?;
        }
        console.println("")?;

        if outcome.body.is_empty() {
            return Ok(outcome.success);
        }

        let content_type = outcome.content_type.as_deref();
        if is_xml(content_type) {
            match pretty_print_xml(&outcome.body, self.color) {
                Ok(pretty) => {
                    console.print(&pretty)?;
                    return Ok(outcome.success);
                }
                Err(e) => tracing::debug!("Body is not well-formed XML: {:#}", e),
            }
        }

        console.println(&decode_body(&outcome.body, content_type))?;
        console.println("")?;
        Ok(outcome.success)
    }
}
