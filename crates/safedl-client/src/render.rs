//! Cell rendering for the catalog table.
//!
//! Rendering is a pure function of a column descriptor, a record and the
//! mode. Front ends map the resulting [`CellView`] onto their widgets.

use once_cell::sync::Lazy;
use regex::Regex;

use safedl_core::{url_fields, ColumnDescriptor, ColumnType, ShowMode, SoftwareRecord};

/// Whole-value URL shapes: explicit scheme, bare domain, IPv4, localhost.
static URL_PATTERNS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)^https?://.+").expect("valid scheme regex"),
        Regex::new(
            r"(?i)^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*\.[a-z]{2,}(/.*)?$",
        )
        .expect("valid domain regex"),
        Regex::new(r"^(\d{1,3}\.){3}\d{1,3}(:\d+)?(/.*)?$").expect("valid ip regex"),
        Regex::new(r"(?i)^localhost(:\d+)?(/.*)?$").expect("valid localhost regex"),
    ]
});

/// URL spans inside free text.
static URL_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)https?://\S+|www\.\S+|[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*\.[a-z]{2,}(/\S*)?",
    )
    .expect("valid url span regex")
});

/// Whether the cell is shown or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Read-only view.
    #[default]
    View,
    /// Admin editing.
    Edit,
}

/// A clickable link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target, always with a scheme.
    pub href: String,
    /// Display text (host without `www.`).
    pub text: String,
}

impl Link {
    /// Link for a raw URL value.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            href: format_url(raw),
            text: display_domain(raw),
        }
    }
}

/// Piece of linkified text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text, kept verbatim.
    Text(String),
    /// A detected URL.
    Link(Link),
}

/// Multi-line editor bound to one physical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    /// Record field written by this editor.
    pub field: String,
    /// Current raw value.
    pub value: String,
}

/// Rendered cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    /// Nothing to show.
    Empty,
    /// Plain text.
    Text(String),
    /// The whole value is one link.
    Link(Link),
    /// Download links of a url column.
    Links(Vec<Link>),
    /// Text with URL spans linkified.
    Rich(Vec<Segment>),
    /// Editors, one per physical field.
    Editors(Vec<Editor>),
}

/// Render one cell of `record` for `column`.
#[must_use]
pub fn render_cell(column: &ColumnDescriptor, record: &SoftwareRecord, mode: RenderMode) -> CellView {
    match (mode, column.column_type) {
        (RenderMode::Edit, _) => CellView::Editors(
            column
                .physical_fields()
                .into_iter()
                .map(|field| Editor {
                    value: record.text(&field),
                    field,
                })
                .collect(),
        ),
        (RenderMode::View, ColumnType::Url) => url_links(&column.key, record),
        (RenderMode::View, ColumnType::Text | ColumnType::Email) => {
            linkify(&record.text(&column.key))
        }
        (RenderMode::View, ColumnType::Number) => match record.get(&column.key) {
            Some(value) if !value.is_empty() => CellView::Text(value.to_string()),
            _ => CellView::Empty,
        },
    }
}

/// Links of a url column, selected by its show tag. Empty variants are skipped.
fn url_links(key: &str, record: &SoftwareRecord) -> CellView {
    let [bit32, bit64, common, show] = url_fields(key);
    let visible = match ShowMode::from_tag(&record.text(&show)) {
        ShowMode::Both => vec![bit32, bit64, common],
        ShowMode::Bit32 => vec![bit32],
        ShowMode::Bit64 => vec![bit64],
        ShowMode::Common => vec![common],
    };

    let links: Vec<Link> = visible
        .iter()
        .map(|field| record.text(field))
        .filter(|value| !value.trim().is_empty())
        .map(|value| Link::new(&value))
        .collect();

    if links.is_empty() {
        CellView::Empty
    } else {
        CellView::Links(links)
    }
}

/// Render free text, turning URLs into links.
///
/// A value that is a URL as a whole becomes a single link. Otherwise only
/// the URL spans are linkified and the surrounding text is kept as is.
#[must_use]
pub fn linkify(text: &str) -> CellView {
    if text.trim().is_empty() {
        return CellView::Empty;
    }
    if is_url(text) {
        return CellView::Link(Link::new(text));
    }

    let mut segments = Vec::new();
    let mut last = 0;
    for span in URL_SPAN.find_iter(text) {
        if span.start() > last {
            segments.push(Segment::Text(text[last..span.start()].to_string()));
        }
        segments.push(Segment::Link(Link::new(span.as_str())));
        last = span.end();
    }

    if segments.is_empty() {
        return CellView::Text(text.to_string());
    }
    if last < text.len() {
        segments.push(Segment::Text(text[last..].to_string()));
    }
    CellView::Rich(segments)
}

/// Whether the whole (trimmed) value looks like a URL.
#[must_use]
pub fn is_url(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && URL_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}

/// Prefix `https://` when the value has no http(s) scheme.
#[must_use]
pub fn format_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Host of a URL without `www.`, for display. Falls back to the raw value.
#[must_use]
pub fn display_domain(url: &str) -> String {
    let formatted = format_url(url);
    let rest = formatted
        .split_once("://")
        .map_or(formatted.as_str(), |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    let host = host_port.split(':').next().unwrap_or_default().to_lowercase();

    if host.is_empty() {
        return url.trim().to_string();
    }
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}
