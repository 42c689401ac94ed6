use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::debug;

use super::extract::Walk;
use super::fields::normalize_label;
use super::tokens::{self, Document, Token};

static P_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static STRONG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("strong, b").unwrap());
static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div, article, section, li").unwrap());
static TITLE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p\b[^>]*>\s*<(?:strong|b)\b[^>]*>\s*Project\s+Title").unwrap());

const TITLE_MARKER: &str = "project title";

/// One candidate project listing, as a token run in document order.
#[derive(Debug, Clone, Default)]
pub struct RawBlock {
    pub tokens: Vec<Token>,
}

impl RawBlock {
    pub fn new(tokens: Vec<Token>) -> Self {
        RawBlock { tokens }
    }

    /// Number of distinct canonical fields labeled inside the block.
    pub fn field_label_count(&self) -> usize {
        Walk::run(&self.tokens).field_labels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Named page layouts, in the order auto-detection tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// `<p><strong>Project Title:</strong> …` paragraphs, optionally followed by more paragraphs.
    TitleParagraphs,
    /// Raw markup split on the `<p><strong>Project Title` marker.
    TitleMarker,
    /// One block per heading and the content up to the next heading.
    Headings,
    /// Repeated sibling containers (cards, list items) sharing tag and class.
    Containers,
    /// Blank-line separated text with a title-like first line.
    PlainText,
}

impl Layout {
    pub const PRIORITY: [Layout; 5] = [
        Layout::TitleParagraphs,
        Layout::TitleMarker,
        Layout::Headings,
        Layout::Containers,
        Layout::PlainText,
    ];

    pub fn strategy(self) -> &'static dyn Strategy {
        match self {
            Layout::TitleParagraphs => &TitleParagraphs,
            Layout::TitleMarker => &TitleMarkerSplit,
            Layout::Headings => &Headings,
            Layout::Containers => &RepeatedContainers,
            Layout::PlainText => &PlainText,
        }
    }
}

/// A way of cutting a document into project blocks.
pub trait Strategy {
    fn name(&self) -> &'static str;
    fn segment(&self, doc: &Document) -> Vec<RawBlock>;
}

/// Cut a document into blocks.
///
/// With a hint only that layout is tried. Otherwise every layout runs in
/// [`Layout::PRIORITY`] order and the first one producing at least one block
/// with a recognizable field label wins. No winner means no blocks.
pub fn segment(doc: &Document, hint: Option<Layout>) -> Vec<RawBlock> {
    let candidates: &[Layout] = match &hint {
        Some(layout) => std::slice::from_ref(layout),
        None => &Layout::PRIORITY,
    };

    for layout in candidates {
        let strategy = layout.strategy();
        let blocks = strategy.segment(doc);
        if blocks.iter().any(|b| b.field_label_count() > 0) {
            debug!("Layout {} matched {} blocks", strategy.name(), blocks.len());
            return blocks;
        }
        debug!("Layout {} found no field-bearing blocks", strategy.name());
    }
    Vec::new()
}

// ── Strategies ──

pub struct TitleParagraphs;

impl Strategy for TitleParagraphs {
    fn name(&self) -> &'static str {
        "title-paragraphs"
    }

    fn segment(&self, doc: &Document) -> Vec<RawBlock> {
        let Some(root) = doc.content_root() else {
            return Vec::new();
        };
        root.select(&P_SELECTOR)
            .filter(|p| is_title_paragraph(*p))
            .map(|p| {
                // The title paragraph plus its following siblings, up to the next
                // title paragraph or heading.
                let trailing = p.next_siblings().take_while(|n| {
                    ElementRef::wrap(*n).map_or(true, |el| !is_title_paragraph(el) && !is_heading(el))
                });
                RawBlock::new(tokens::tokenize_nodes(std::iter::once(*p).chain(trailing)))
            })
            .collect()
    }
}

pub struct TitleMarkerSplit;

impl Strategy for TitleMarkerSplit {
    fn name(&self) -> &'static str {
        "title-marker"
    }

    fn segment(&self, doc: &Document) -> Vec<RawBlock> {
        let Some(root) = doc.content_root() else {
            return Vec::new();
        };
        let markup = root.inner_html();
        let starts: Vec<usize> = TITLE_MARKER_RE.find_iter(&markup).map(|m| m.start()).collect();
        starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(markup.len());
                RawBlock::new(tokens::tokenize_fragment(&markup[start..end]))
            })
            .filter(|b| !b.is_empty())
            .collect()
    }
}

pub struct Headings;

impl Strategy for Headings {
    fn name(&self) -> &'static str {
        "headings"
    }

    /// Each level from h2 to h5 is tried; the level whose sections carry the
    /// most field labels wins, shallower on ties. A level needs two labeled
    /// sections, since a lone heading is a page title rather than a listing.
    fn segment(&self, doc: &Document) -> Vec<RawBlock> {
        let Some(root) = doc.content_root() else {
            return Vec::new();
        };
        let mut best: Option<(usize, Vec<RawBlock>)> = None;
        for level in 2..=5u8 {
            let Ok(selector) = Selector::parse(&format!("h{}", level)) else {
                continue;
            };
            let blocks: Vec<RawBlock> = root
                .select(&selector)
                .map(|h| {
                    let trailing = h.next_siblings().take_while(|n| {
                        ElementRef::wrap(*n).map_or(true, |el| heading_level(el).map_or(true, |l| l > level))
                    });
                    RawBlock::new(tokens::tokenize_nodes(std::iter::once(*h).chain(trailing)))
                })
                .collect();
            let labeled = blocks.iter().filter(|b| b.field_label_count() > 0).count();
            if labeled >= 2 && best.as_ref().map_or(true, |(n, _)| labeled > *n) {
                best = Some((labeled, blocks));
            }
        }
        best.map(|(_, blocks)| drop_preamble(blocks)).unwrap_or_default()
    }
}

pub struct RepeatedContainers;

impl Strategy for RepeatedContainers {
    fn name(&self) -> &'static str {
        "containers"
    }

    /// Groups element children of every container by tag and class. A group
    /// qualifies when two or more members each carry at least two distinct
    /// field labels; the group with the most such members wins, earliest first
    /// on ties. Key/value rows carry one label each and never qualify.
    fn segment(&self, doc: &Document) -> Vec<RawBlock> {
        let Some(root) = doc.content_root() else {
            return Vec::new();
        };
        let mut best: Option<(usize, Vec<RawBlock>)> = None;
        for parent in std::iter::once(root).chain(root.select(&CONTAINER_SELECTOR)) {
            let mut groups: Vec<(String, Vec<ElementRef>)> = Vec::new();
            for child in parent.children().filter_map(ElementRef::wrap) {
                if !matches!(child.value().name(), "div" | "article" | "section" | "li") {
                    continue;
                }
                let key = format!("{}.{}", child.value().name(), child.value().attr("class").unwrap_or(""));
                match groups.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, members)) => members.push(child),
                    None => groups.push((key, vec![child])),
                }
            }
            for (_, members) in groups.into_iter().filter(|(_, m)| m.len() >= 2) {
                let blocks: Vec<RawBlock> = members
                    .into_iter()
                    .map(|el| RawBlock::new(tokens::tokenize_element(el)))
                    .collect();
                let rich = blocks.iter().filter(|b| b.field_label_count() >= 2).count();
                if rich >= 2 && best.as_ref().map_or(true, |(n, _)| rich > *n) {
                    best = Some((rich, blocks));
                }
            }
        }
        best.map(|(_, blocks)| blocks).unwrap_or_default()
    }
}

pub struct PlainText;

impl Strategy for PlainText {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    /// A title-like line after one or more blank lines opens a new block.
    fn segment(&self, doc: &Document) -> Vec<RawBlock> {
        let lines = doc.lines();
        let mut blocks: Vec<Vec<&str>> = Vec::new();
        let mut after_blank = true;
        for line in &lines {
            let line = line.trim();
            if line.is_empty() {
                after_blank = true;
                if let Some(current) = blocks.last_mut() {
                    current.push("");
                }
                continue;
            }
            if blocks.is_empty() || (after_blank && is_title_like(line)) {
                blocks.push(Vec::new());
            }
            if let Some(current) = blocks.last_mut() {
                current.push(line);
            }
            after_blank = false;
        }
        let blocks = blocks
            .iter()
            .map(|lines| RawBlock::new(tokens::tokenize_lines(lines)))
            .collect();
        drop_preamble(blocks)
    }
}

// ── Helpers ──

fn is_title_paragraph(p: ElementRef<'_>) -> bool {
    p.value().name() == "p"
        && p.select(&STRONG_SELECTOR)
            .next()
            .is_some_and(|s| tokens::element_text(s).to_lowercase().contains(TITLE_MARKER))
}

fn heading_level(el: ElementRef<'_>) -> Option<u8> {
    match el.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn is_heading(el: ElementRef<'_>) -> bool {
    heading_level(el).is_some()
}

/// Short, capitalized, not a sentence and not a `Label: value` line.
fn is_title_like(line: &str) -> bool {
    let starts_upper = line
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
    let words = line.split_whitespace().count();
    let labeled = line
        .split_once(':')
        .is_some_and(|(label, _)| normalize_label(label).is_some());
    starts_upper && words <= 15 && line.len() <= 150 && !line.ends_with('.') && !labeled
}

/// Leading blocks with no labels are page introduction, not listings.
fn drop_preamble(blocks: Vec<RawBlock>) -> Vec<RawBlock> {
    let first = blocks
        .iter()
        .position(|b| b.field_label_count() > 0)
        .unwrap_or(blocks.len());
    blocks.into_iter().skip(first).collect()
}

// ── Tests ──
