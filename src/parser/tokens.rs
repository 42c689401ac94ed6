use std::sync::LazyLock;

use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:!doctype|html|body|div|p|h[1-6]|br|strong|b|table|ul|li|span|a)\b").unwrap());

static ROOT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["div.entry-content", "main", "article", "#content", "body"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

/// Flat, document-ordered view of a block of markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Heading { level: u8, text: String },
    /// Bold, emphasized, or header-cell text: the usual dress of a field label.
    Emphasis(String),
    Text(String),
    Link { text: String, url: String },
    /// Hard line break (`<br>` or a newline in plain text).
    Break,
    /// Boundary of a block-level element or a blank line.
    Paragraph,
}

impl Token {
    pub fn ends_line(&self) -> bool {
        matches!(self, Token::Break | Token::Paragraph)
    }
}

/// A source document, parsed once and shared by every segmentation strategy.
pub enum Document {
    Html(Html),
    Text(String),
}

impl Document {
    /// Anything that carries recognizable tags is parsed as HTML; the rest is
    /// kept as plain text so its line structure survives.
    pub fn parse(raw: &str) -> Document {
        if MARKUP_RE.is_match(raw) {
            Document::Html(Html::parse_document(raw))
        } else {
            Document::Text(raw.to_string())
        }
    }

    /// The element that holds the listings: the WordPress `entry-content`
    /// container when present, then progressively wider fallbacks.
    pub fn content_root(&self) -> Option<ElementRef<'_>> {
        match self {
            Document::Html(html) => ROOT_SELECTORS
                .iter()
                .find_map(|sel| html.select(sel).next())
                .or_else(|| Some(html.root_element())),
            Document::Text(_) => None,
        }
    }

    /// Document as lines of text; blank lines mark paragraph boundaries.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Document::Text(text) => text.lines().map(|l| collapse_ws(l)).collect(),
            Document::Html(_) => self
                .content_root()
                .map(|root| render_lines(&tokenize_element(root)))
                .unwrap_or_default(),
        }
    }
}

/// Tokenize an element and everything beneath it.
pub fn tokenize_element(element: ElementRef<'_>) -> Vec<Token> {
    let mut tokens = Vec::new();
    walk(*element, &mut tokens);
    trim_breaks(&mut tokens);
    tokens
}

/// Tokenize a run of sibling nodes, e.g. a heading and what follows it.
pub fn tokenize_nodes<'a>(nodes: impl IntoIterator<Item = ego_tree::NodeRef<'a, Node>>) -> Vec<Token> {
    let mut tokens = Vec::new();
    for node in nodes {
        walk(node, &mut tokens);
    }
    trim_breaks(&mut tokens);
    tokens
}

/// Tokenize an HTML fragment (a slice of a larger page).
pub fn tokenize_fragment(markup: &str) -> Vec<Token> {
    let fragment = Html::parse_fragment(markup);
    tokenize_element(fragment.root_element())
}

/// Tokenize plain text: every line is one text token, blank lines are
/// paragraph boundaries.
pub fn tokenize_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Token> {
    let mut tokens = Vec::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            push_paragraph(&mut tokens);
        } else {
            tokens.push(Token::Text(line.to_string()));
            tokens.push(Token::Break);
        }
    }
    trim_breaks(&mut tokens);
    tokens
}

/// Render tokens back into lines; paragraphs become blank lines.
pub fn render_lines(tokens: &[Token]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for token in tokens {
        match token {
            Token::Heading { text, .. } => {
                flush_line(&mut current, &mut lines);
                lines.push(String::new());
                lines.push(text.clone());
            }
            Token::Emphasis(t) | Token::Text(t) => current.push(t),
            Token::Link { text, url } => current.push(if text.is_empty() { url } else { text }),
            Token::Break => {
                if current.is_empty() {
                    lines.push(String::new());
                } else {
                    flush_line(&mut current, &mut lines);
                }
            }
            Token::Paragraph => {
                flush_line(&mut current, &mut lines);
                lines.push(String::new());
            }
        }
    }
    flush_line(&mut current, &mut lines);
    lines
}

fn flush_line(current: &mut Vec<&str>, lines: &mut Vec<String>) {
    if !current.is_empty() {
        lines.push(collapse_ws(&current.join(" ")));
        current.clear();
    }
}

fn walk(node: ego_tree::NodeRef<'_, Node>, tokens: &mut Vec<Token>) {
    match node.value() {
        Node::Text(text) => {
            let t = collapse_ws(text);
            if !t.is_empty() {
                tokens.push(Token::Text(t));
            }
        }
        Node::Element(el) => {
            let Some(element) = ElementRef::wrap(node) else {
                return;
            };
            match el.name() {
                "script" | "style" | "noscript" | "template" | "head" | "iframe" | "svg" => {}
                "br" => tokens.push(Token::Break),
                "hr" => push_paragraph(tokens),
                name @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                    let text = element_text(element);
                    push_paragraph(tokens);
                    if !text.is_empty() {
                        tokens.push(Token::Heading {
                            level: name.as_bytes()[1] - b'0',
                            text,
                        });
                    }
                    push_paragraph(tokens);
                }
                "strong" | "b" | "em" | "th" | "dt" => {
                    let block = matches!(el.name(), "th" | "dt");
                    if block {
                        push_paragraph(tokens);
                    }
                    // Nested links inside bold text are kept as links.
                    if element.select(&LINK_SELECTOR).next().is_some() {
                        for child in node.children() {
                            walk(child, tokens);
                        }
                    } else {
                        let text = element_text(element);
                        if !text.is_empty() {
                            tokens.push(Token::Emphasis(text));
                        }
                    }
                }
                "a" => {
                    let text = element_text(element);
                    match el.attr("href").map(str::trim) {
                        Some(href) if !href.is_empty() && !href.starts_with('#') => {
                            tokens.push(Token::Link {
                                text,
                                url: href.to_string(),
                            });
                        }
                        _ if !text.is_empty() => tokens.push(Token::Text(text)),
                        _ => {}
                    }
                }
                name => {
                    let block = is_block_element(name);
                    if block {
                        push_paragraph(tokens);
                    }
                    for child in node.children() {
                        walk(child, tokens);
                    }
                    if block {
                        push_paragraph(tokens);
                    }
                }
            }
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                walk(child, tokens);
            }
        }
        _ => {}
    }
}

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

fn is_block_element(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "section"
            | "article"
            | "main"
            | "aside"
            | "header"
            | "footer"
            | "ul"
            | "ol"
            | "li"
            | "dl"
            | "dd"
            | "table"
            | "tbody"
            | "thead"
            | "tr"
            | "td"
            | "blockquote"
            | "pre"
            | "figure"
            | "body"
            | "html"
    )
}

fn push_paragraph(tokens: &mut Vec<Token>) {
    match tokens.last() {
        None | Some(Token::Paragraph) => {}
        Some(Token::Break) => {
            tokens.pop();
            push_paragraph(tokens);
        }
        Some(_) => tokens.push(Token::Paragraph),
    }
}

fn trim_breaks(tokens: &mut Vec<Token>) {
    while tokens.last().is_some_and(Token::ends_line) {
        tokens.pop();
    }
    let lead = tokens.iter().take_while(|t| t.ends_line()).count();
    tokens.drain(..lead);
}

pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_ws(&element.text().collect::<Vec<_>>().join(" "))
}

/// Collapse whitespace runs (including non-breaking spaces) to one space.
pub fn collapse_ws(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ──
