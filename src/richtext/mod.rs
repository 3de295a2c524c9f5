//! Structured rich text → HTML / plain text
//!
//! Rich text arrives as a list of blocks, each with its raw text and a list
//! of formatting spans addressed by UTF-16 offsets into that text. The HTML
//! produced here is not sanitized: link URLs and embed markup are emitted as
//! the repository stores them.

use serde::{Deserialize, Serialize};

/// A rich text field
pub type RichText = Vec<Block>;

/// Block type tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
    #[serde(rename = "heading3")]
    Heading3,
    #[serde(rename = "heading4")]
    Heading4,
    #[serde(rename = "heading5")]
    Heading5,
    #[serde(rename = "heading6")]
    Heading6,
    #[serde(rename = "preformatted")]
    Preformatted,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "o-list-item")]
    OrderedListItem,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "embed")]
    Embed,
    #[serde(other)]
    Unknown,
}

/// One block of rich text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    /// Image source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Embed>,
}

/// oEmbed payload of an embed block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

/// Span type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Strong,
    Em,
    Hyperlink,
    Label,
    #[serde(other)]
    Unknown,
}

/// A formatting range over a block's text (UTF-16 offsets, end exclusive)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default)]
    pub data: Option<SpanData>,
}

/// Link or label payload of a span
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Maps links to repository documents onto site URLs
pub trait LinkResolver: Send + Sync {
    fn resolve(&self, doc_type: Option<&str>, uid: Option<&str>) -> String;
}

/// Plain text of a rich text field, blocks joined by a single space
pub fn as_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// HTML fragment of a rich text field
pub fn as_html(blocks: &[Block], resolver: &dyn LinkResolver) -> String {
    let mut html = String::new();
    let mut open_list: Option<BlockKind> = None;

    for block in blocks {
        let list_kind = match block.kind {
            BlockKind::ListItem | BlockKind::OrderedListItem => Some(block.kind),
            _ => None,
        };

        if open_list != list_kind {
            if let Some(kind) = open_list {
                html.push_str(list_close(kind));
            }
            if let Some(kind) = list_kind {
                html.push_str(list_open(kind));
            }
            open_list = list_kind;
        }

        render_block(block, resolver, &mut html);
    }

    if let Some(kind) = open_list {
        html.push_str(list_close(kind));
    }

    html
}

fn list_open(kind: BlockKind) -> &'static str {
    if kind == BlockKind::OrderedListItem {
        "<ol>"
    } else {
        "<ul>"
    }
}

fn list_close(kind: BlockKind) -> &'static str {
    if kind == BlockKind::OrderedListItem {
        "</ol>"
    } else {
        "</ul>"
    }
}

fn render_block(block: &Block, resolver: &dyn LinkResolver, out: &mut String) {
    let tag = match block.kind {
        BlockKind::Paragraph => "p",
        BlockKind::Heading1 => "h1",
        BlockKind::Heading2 => "h2",
        BlockKind::Heading3 => "h3",
        BlockKind::Heading4 => "h4",
        BlockKind::Heading5 => "h5",
        BlockKind::Heading6 => "h6",
        BlockKind::Preformatted => "pre",
        BlockKind::ListItem | BlockKind::OrderedListItem => "li",
        BlockKind::Image => {
            let src = block.url.as_deref().unwrap_or_default();
            let alt = block.alt.as_deref().unwrap_or_default();
            out.push_str(&format!(
                r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                escape_html(src),
                escape_html(alt)
            ));
            return;
        }
        BlockKind::Embed => {
            if let Some(embed) = &block.oembed {
                out.push_str(&format!(
                    r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}">{}</div>"#,
                    escape_html(embed.embed_url.as_deref().unwrap_or_default()),
                    escape_html(embed.kind.as_deref().unwrap_or_default()),
                    escape_html(embed.provider_name.as_deref().unwrap_or_default()),
                    embed.html.as_deref().unwrap_or_default()
                ));
            }
            return;
        }
        BlockKind::Unknown => {
            tracing::debug!("Skipping rich text block of unknown type");
            return;
        }
    };

    out.push('<');
    out.push_str(tag);
    out.push('>');
    render_spans(&block.text, &block.spans, resolver, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Render text with its spans, keeping the emitted tags properly nested.
///
/// When a span ends while spans opened after it are still open, those are
/// closed and reopened around the boundary.
fn render_spans(text: &str, spans: &[Span], resolver: &dyn LinkResolver, out: &mut String) {
    let mut spans: Vec<&Span> = spans.iter().filter(|s| s.start < s.end).collect();
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut open: Vec<&Span> = Vec::new();
    let mut next = 0;
    let mut offset = 0;
    let mut chars = text.chars();

    loop {
        close_ending(&mut open, offset, resolver, out);

        while next < spans.len() && spans[next].start <= offset {
            if spans[next].end > offset {
                out.push_str(&open_tag(spans[next], resolver));
                open.push(spans[next]);
            }
            next += 1;
        }

        match chars.next() {
            Some('\n') => {
                out.push_str("<br />");
                offset += 1;
            }
            Some(c) => {
                push_escaped(c, out);
                offset += c.len_utf16();
            }
            None => break,
        }
    }

    while let Some(span) = open.pop() {
        out.push_str(close_tag(span));
    }
}

fn close_ending(open: &mut Vec<&Span>, offset: usize, resolver: &dyn LinkResolver, out: &mut String) {
    let Some(lowest) = open.iter().position(|s| s.end <= offset) else {
        return;
    };

    let mut reopen = Vec::new();
    while open.len() > lowest {
        if let Some(span) = open.pop() {
            out.push_str(close_tag(span));
            if span.end > offset {
                reopen.push(span);
            }
        }
    }

    for span in reopen.into_iter().rev() {
        out.push_str(&open_tag(span, resolver));
        open.push(span);
    }
}

fn open_tag(span: &Span, resolver: &dyn LinkResolver) -> String {
    match span.kind {
        SpanKind::Strong => "<strong>".to_string(),
        SpanKind::Em => "<em>".to_string(),
        SpanKind::Hyperlink => {
            let data = span.data.clone().unwrap_or_default();
            let href = if data.link_type.as_deref() == Some("Document") {
                resolver.resolve(data.doc_type.as_deref(), data.uid.as_deref())
            } else {
                data.url.clone().unwrap_or_default()
            };
            match data.target.as_deref() {
                Some(target) => format!(
                    r#"<a href="{}" target="{}" rel="noopener noreferrer">"#,
                    escape_html(&href),
                    escape_html(target)
                ),
                None => format!(r#"<a href="{}">"#, escape_html(&href)),
            }
        }
        SpanKind::Label => {
            let label = span
                .data
                .as_ref()
                .and_then(|d| d.label.as_deref())
                .unwrap_or_default();
            format!(r#"<span class="{}">"#, escape_html(label))
        }
        SpanKind::Unknown => "<span>".to_string(),
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Hyperlink => "</a>",
        SpanKind::Label | SpanKind::Unknown => "</span>",
    }
}

fn push_escaped(c: char, out: &mut String) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(c, &mut out);
    }
    out
}
