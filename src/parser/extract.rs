use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::fields::{normalize_label, sanitize_key};
use super::segment::RawBlock;
use super::tokens::{collapse_ws, Token};
use super::UnknownLabels;
use crate::record::{Field, ProjectRecord};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}").unwrap()
});
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'()\[\]]+[^\s<>"'()\[\].,;:!?]"#).unwrap());
static PREFIX_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][^:]{0,40}):(?:\s+(.*))?$").unwrap());
static LIST_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:[,;/&]|\band\b|\bor\b)\s*").unwrap());

/// Extra key for a contact label whose value holds no address.
const CONTACT_KEY: &str = "contact";
/// Longest label we try to recognize in front of a colon inside running text.
const MAX_LABEL_WORDS: usize = 5;
/// Longest unknown label accepted at the start of a line.
const MAX_EXTRA_LABEL_WORDS: usize = 4;

/// Per-block inputs that do not come from the block itself.
pub struct ExtractContext<'a> {
    pub department: &'a str,
    pub source: &'a str,
    pub unknown_labels: UnknownLabels,
}

/// A recognized label and the raw text that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelValue {
    pub label: String,
    pub target: Target,
    pub lines: Vec<String>,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Field(Field),
    Extra(String),
}

impl Target {
    fn of(label: &str) -> Target {
        match normalize_label(label) {
            Some(f) => Target::Field(f),
            None => Target::Extra(sanitize_key(label)),
        }
    }
}

/// Everything one pass over a block's tokens produces.
#[derive(Debug, Default)]
pub struct Walk {
    pub heading: Option<String>,
    /// Lines seen before the first label.
    pub preamble: Vec<String>,
    pub pairs: Vec<LabelValue>,
    /// Every link target in the block, in order.
    pub urls: Vec<String>,
}

impl Walk {
    pub fn run(tokens: &[Token]) -> Walk {
        let mut w = Walk {
            preamble: vec![String::new()],
            ..Default::default()
        };
        let mut line_start = true;
        for token in tokens {
            match token {
                Token::Heading { text, .. } => {
                    w.new_line();
                    if w.heading.is_none() && w.pairs.is_empty() && w.preamble_is_empty() {
                        w.heading = Some(text.clone());
                    } else {
                        w.push_text(text);
                    }
                    w.new_line();
                }
                Token::Emphasis(text) => match emphasis_label(text, line_start) {
                    Some((label, rest)) => {
                        w.start(label);
                        if !rest.is_empty() {
                            w.push_text(rest);
                        }
                    }
                    None => w.text(text, line_start),
                },
                Token::Text(text) => w.text(text, line_start),
                Token::Link { text, url } => {
                    w.urls.push(url.clone());
                    if let Some(p) = w.pairs.last_mut() {
                        p.urls.push(url.clone());
                    }
                    w.push_text(if text.is_empty() { url } else { text });
                }
                Token::Break | Token::Paragraph => {
                    w.new_line();
                    line_start = true;
                    continue;
                }
            }
            line_start = false;
        }
        w
    }

    /// Distinct canonical fields the block carries labels for.
    pub fn field_labels(&self) -> HashSet<Field> {
        self.pairs
            .iter()
            .filter_map(|p| match p.target {
                Target::Field(f) => Some(f),
                Target::Extra(_) => None,
            })
            .collect()
    }

    fn preamble_is_empty(&self) -> bool {
        self.preamble.iter().all(|l| l.trim().is_empty())
    }

    fn has_title_context(&self) -> bool {
        self.heading.is_some() || !self.pairs.is_empty() || !self.preamble_is_empty()
    }

    fn start(&mut self, label: &str) {
        let label = label.trim().trim_end_matches(':').trim();
        self.pairs.push(LabelValue {
            label: label.to_string(),
            target: Target::of(label),
            lines: vec![String::new()],
            urls: Vec::new(),
        });
    }

    fn open_lines(&mut self) -> &mut Vec<String> {
        match self.pairs.last_mut() {
            Some(p) => &mut p.lines,
            None => &mut self.preamble,
        }
    }

    fn push_text(&mut self, text: &str) {
        let lines = self.open_lines();
        if let Some(last) = lines.last_mut() {
            if !last.is_empty() {
                last.push(' ');
            }
            last.push_str(text);
        }
    }

    fn new_line(&mut self) {
        let lines = self.open_lines();
        if lines.last().is_some_and(|l| !l.is_empty()) {
            lines.push(String::new());
        }
    }

    fn text(&mut self, text: &str, line_start: bool) {
        for (i, (label, value)) in split_inline(text).into_iter().enumerate() {
            match label {
                Some(label) => {
                    self.start(&label);
                    if !value.is_empty() {
                        self.push_text(&value);
                    }
                }
                None if i == 0 && line_start && self.has_title_context() => {
                    match extra_prefix(&value) {
                        Some((label, rest)) => {
                            self.start(label);
                            if !rest.is_empty() {
                                self.push_text(rest);
                            }
                        }
                        None => self.push_text(&value),
                    }
                }
                None => {
                    if !value.is_empty() {
                        self.push_text(&value);
                    }
                }
            }
        }
    }
}

/// Bold text is a label when it ends with a colon, when it opens with a known
/// label and a colon, or when it is a known label on its own at the start of a
/// line. Inline emphasis in prose ("<em>background</em> radiation") stays text.
fn emphasis_label(text: &str, line_start: bool) -> Option<(&str, &str)> {
    let t = text.trim();
    if let Some(label) = t.strip_suffix(':') {
        let words = label.split_whitespace().count();
        if (1..=8).contains(&words) {
            return Some((label, ""));
        }
    }
    if line_start && normalize_label(t).is_some() {
        return Some((t, ""));
    }
    let (label, rest) = t.split_once(':')?;
    normalize_label(label)?;
    Some((label, rest.trim()))
}

/// A short capitalized `Label: value` prefix that is not in the label table.
fn extra_prefix(text: &str) -> Option<(&str, &str)> {
    let caps = PREFIX_LABEL_RE.captures(text)?;
    let label = caps.get(1)?.as_str();
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    if label.split_whitespace().count() > MAX_EXTRA_LABEL_WORDS || rest.starts_with("//") {
        return None;
    }
    Some((label, rest.trim()))
}

/// Split running text at every known label that is followed by a colon.
///
/// Returns `(label, value)` pieces in order; the first piece has no label when
/// the text does not open with one. Labels found mid-text must start with a
/// capital letter, which keeps ordinary prose ("the project: ...") intact.
fn split_inline(text: &str) -> Vec<(Option<String>, String)> {
    let mut out: Vec<(Option<String>, String)> = Vec::new();
    let mut label: Option<String> = None;
    let mut seg_start = 0;

    for (colon, _) in text.match_indices(':') {
        if colon < seg_start || text[colon + 1..].starts_with("//") {
            continue;
        }
        let before = &text[seg_start..colon];
        let spans = word_spans(before);
        let found = (1..=spans.len().min(MAX_LABEL_WORDS)).rev().find_map(|k| {
            let start = spans[spans.len() - k].0;
            let candidate = &before[start..];
            normalize_label(candidate)?;
            let at_start = seg_start == 0 && start == 0;
            let capitalized = candidate.chars().next().is_some_and(char::is_uppercase);
            (at_start || capitalized).then_some(start)
        });
        if let Some(start) = found {
            let value = before[..start].trim().to_string();
            if label.is_some() || !value.is_empty() {
                out.push((label.take(), value));
            }
            label = Some(before[start..].trim().to_string());
            seg_start = colon + 1;
        }
    }

    let tail = text[seg_start..].trim().to_string();
    if label.is_some() || !tail.is_empty() {
        out.push((label, tail));
    }
    out
}

fn word_spans(s: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(st)) => {
                spans.push((st, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(st) = start {
        spans.push((st, s.len()));
    }
    spans
}

/// Build one record from one block. Never fails: a block with nothing
/// recognizable still yields a record carrying `department` and `source`.
pub fn extract_record(block: &RawBlock, ctx: &ExtractContext) -> ProjectRecord {
    let walk = Walk::run(&block.tokens);
    let mut record = ProjectRecord::new(ctx.department, ctx.source);
    let mut labeled: HashSet<Field> = HashSet::new();

    for pair in &walk.pairs {
        match &pair.target {
            Target::Field(field) => {
                if labeled.contains(field) {
                    debug!("Repeated label {:?} ignored", pair.label);
                    continue;
                }
                if let Some(value) = clean_value(Some(*field), &pair.lines, &pair.urls) {
                    record.set(*field, value);
                    labeled.insert(*field);
                } else if *field == Field::ContactEmail && ctx.unknown_labels == UnknownLabels::Retain {
                    // "Contact: Dr. X" names a person, not an address; the
                    // block-wide email scan still gets its chance below.
                    if let Some(text) = clean_value(None, &pair.lines, &pair.urls) {
                        record.extra.entry(CONTACT_KEY.to_string()).or_insert(text);
                    }
                }
            }
            Target::Extra(key) => {
                if ctx.unknown_labels == UnknownLabels::Drop
                    || key.is_empty()
                    || Field::from_key(key).is_some()
                {
                    continue;
                }
                if let Some(value) = clean_value(None, &pair.lines, &pair.urls) {
                    record.extra.entry(key.clone()).or_insert(value);
                }
            }
        }
    }

    // Title: explicit label, then heading, then the first free line.
    let mut body: Vec<String> = walk
        .preamble
        .iter()
        .map(|l| collapse_ws(l))
        .filter(|l| !l.is_empty())
        .collect();
    if !record.has(Field::ProjectTitle) {
        let title = match &walk.heading {
            Some(h) => Some(h.clone()),
            None if !body.is_empty() => Some(body.remove(0)),
            None => None,
        };
        if let Some(t) = title.map(|t| t.trim_end_matches(':').trim().to_string()) {
            if !t.is_empty() {
                record.set(Field::ProjectTitle, t);
            }
        }
    }

    // Unlabeled body text ahead of the first label reads as the description.
    if !record.has(Field::ProjectDescription) && !body.is_empty() {
        record.set(Field::ProjectDescription, body.join("\n"));
    }

    if !record.has(Field::ContactEmail) {
        if let Some(email) = find_email(&walk) {
            record.set(Field::ContactEmail, email);
        }
    }

    if !record.has(Field::Website) {
        if let Some(url) = find_website(&walk, ctx.source) {
            record.set(Field::Website, url);
        }
    }

    if !record.has(Field::ProjectTitle) || record.extracted_field_count() <= 1 {
        debug!(
            "Partial record in {} ({} fields)",
            ctx.department,
            record.extracted_field_count()
        );
    }

    record
}

/// Per-field cleanup. Returns `None` when nothing is left.
///
/// Description paragraphs keep their line structure, joined with `\n`; every
/// other field is flattened to a single line.
fn clean_value(field: Option<Field>, lines: &[String], urls: &[String]) -> Option<String> {
    let mut lines: Vec<String> = lines.iter().map(|l| collapse_ws(l)).filter(|l| !l.is_empty()).collect();
    if let Some(first) = lines.first_mut() {
        *first = first
            .trim_start_matches(|c: char| matches!(c, ':' | '-' | '\u{2013}' | '\u{2014}') || c.is_whitespace())
            .to_string();
        if first.is_empty() {
            lines.remove(0);
        }
    }
    if lines.is_empty() && urls.is_empty() {
        return None;
    }

    let joined = lines.join(" ");
    let value = match field {
        Some(Field::ProjectDescription) => lines.join("\n"),
        Some(f) if f.is_list() => split_list(&joined),
        Some(Field::ContactEmail) => EMAIL_RE
            .find(&joined)
            .map(|m| m.as_str().to_string())
            .or_else(|| urls.iter().find_map(|u| mailto(u)))?,
        Some(Field::Website) => urls
            .iter()
            .find(|u| is_absolute_url(u))
            .cloned()
            .or_else(|| URL_RE.find(&joined).map(|m| m.as_str().to_string()))
            .unwrap_or(joined),
        _ => joined,
    };
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Split a list value and join it back as one comma-separated display string.
/// Separators inside parentheses are part of the item: "Undergraduate (Junior
/// or Senior)" stays one entry.
fn split_list(value: &str) -> String {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut start = 0;
    for m in LIST_SPLIT_RE.find_iter(value) {
        if paren_depth(&value[..m.start()]) > 0 {
            continue;
        }
        items.push(&value[start..m.start()]);
        start = m.end();
    }
    items.push(&value[start..]);
    items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn paren_depth(prefix: &str) -> i32 {
    prefix.chars().fold(0, |depth, c| match c {
        '(' | '[' => depth + 1,
        ')' | ']' => depth - 1,
        _ => depth,
    })
}

fn find_email(walk: &Walk) -> Option<String> {
    let texts = walk
        .preamble
        .iter()
        .chain(walk.pairs.iter().flat_map(|p| &p.lines));
    for text in texts {
        if let Some(m) = EMAIL_RE.find(text) {
            return Some(m.as_str().to_string());
        }
    }
    walk.urls.iter().find_map(|u| mailto(u))
}

fn find_website(walk: &Walk, source: &str) -> Option<String> {
    let source = source.trim_end_matches('/');
    let from_text = walk
        .preamble
        .iter()
        .chain(walk.pairs.iter().flat_map(|p| &p.lines))
        .flat_map(|t| URL_RE.find_iter(t).map(|m| m.as_str().to_string()));
    walk.urls
        .iter()
        .filter(|u| is_absolute_url(u))
        .cloned()
        .chain(from_text)
        .find(|u| u.trim_end_matches('/') != source)
}

fn mailto(url: &str) -> Option<String> {
    let addr = url.strip_prefix("mailto:")?;
    let addr = addr.split('?').next().unwrap_or(addr);
    EMAIL_RE.find(addr).map(|m| m.as_str().to_string())
}

fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokens::{tokenize_fragment, tokenize_lines};

    const DEPT: &str = "electrical_and_computer_engineering";

    fn ctx() -> ExtractContext<'static> {
        ExtractContext {
            department: DEPT,
            source: "https://www.eng.ufl.edu/research/electrical-and-computer-engineering/",
            unknown_labels: UnknownLabels::Retain,
        }
    }

    fn from_text(text: &str) -> ProjectRecord {
        let lines: Vec<&str> = text.lines().collect();
        let block = RawBlock::new(tokenize_lines(&lines));
        extract_record(&block, &ctx())
    }

    fn from_html(html: &str) -> ProjectRecord {
        let block = RawBlock::new(tokenize_fragment(html));
        extract_record(&block, &ctx())
    }

    #[test]
    fn plain_text_example() {
        let r = from_text("Trustworthy Machine Learning\nFaculty Mentor: Dr. Kejun Huang\nContact: example@ufl.edu");
        assert_eq!(r.project_title.as_deref(), Some("Trustworthy Machine Learning"));
        assert_eq!(r.faculty_mentor.as_deref(), Some("Dr. Kejun Huang"));
        assert_eq!(r.contact_email.as_deref(), Some("example@ufl.edu"));
        assert_eq!(r.department.as_deref(), Some(DEPT));
        assert!(r.project_id.is_none());
    }

    #[test]
    fn strong_labels_in_one_paragraph() {
        let r = from_html(
            "<p><strong>Project Title:</strong> Radar Sensing<br>\
             <strong>Faculty Mentor:</strong> Dr. Ada Lovelace<br>\
             <strong>Ph.D. Student Mentor(s):</strong> Sam Lee, Kim Park<br>\
             <strong>Terms Available:</strong> Fall; Spring and Summer<br>\
             <strong>Student Level:</strong> Junior, Senior<br>\
             <strong>Credit:</strong> 0-3<br>\
             <strong>Stipend:</strong> No</p>",
        );
        assert_eq!(r.project_title.as_deref(), Some("Radar Sensing"));
        assert_eq!(r.faculty_mentor.as_deref(), Some("Dr. Ada Lovelace"));
        assert_eq!(r.phd_student_mentors.as_deref(), Some("Sam Lee, Kim Park"));
        assert_eq!(r.terms_available.as_deref(), Some("Fall, Spring, Summer"));
        assert_eq!(r.student_level.as_deref(), Some("Junior, Senior"));
        assert_eq!(r.credit.as_deref(), Some("0-3"));
        assert_eq!(r.stipend.as_deref(), Some("No"));
    }

    #[test]
    fn embedded_email_without_label() {
        let r = from_text("Soft Robotics\nFaculty Mentor: Dr. Y\nReach out to jane.doe@ufl.edu with questions.");
        assert_eq!(r.contact_email.as_deref(), Some("jane.doe@ufl.edu"));
    }

    #[test]
    fn mailto_link_fills_email() {
        let r = from_html(r#"<h3>Optics</h3><p><strong>Mentor:</strong> <a href="mailto:prof@ufl.edu">Prof. X</a></p>"#);
        assert_eq!(r.faculty_mentor.as_deref(), Some("Prof. X"));
        assert_eq!(r.contact_email.as_deref(), Some("prof@ufl.edu"));
    }

    #[test]
    fn explicit_email_label_wins() {
        let r = from_text("T\nMentor: a@ufl.edu\nEmail: b@ufl.edu");
        assert_eq!(r.contact_email.as_deref(), Some("b@ufl.edu"));
    }

    #[test]
    fn website_from_link_but_not_source() {
        let r = from_html(
            r#"<h3>Power Grids</h3>
               <p><a href="https://www.eng.ufl.edu/research/electrical-and-computer-engineering/">Back</a></p>
               <p>See <a href="https://lab.ufl.edu/grid">the lab</a>.</p>"#,
        );
        assert_eq!(r.website.as_deref(), Some("https://lab.ufl.edu/grid"));
    }

    #[test]
    fn labeled_website_prefers_href() {
        let r = from_html(r#"<p><b>Website:</b> <a href="https://x.ufl.edu">Lab page</a></p>"#);
        assert_eq!(r.website.as_deref(), Some("https://x.ufl.edu"));
    }

    #[test]
    fn description_spans_paragraphs() {
        let r = from_html(
            "<h3>Wearables</h3>\
             <p><strong>Project Description:</strong> First paragraph.</p>\
             <p>Second   paragraph.</p>\
             <p><strong>Credit:</strong> 1</p>",
        );
        assert_eq!(r.project_description.as_deref(), Some("First paragraph.\nSecond paragraph."));
        assert_eq!(r.credit.as_deref(), Some("1"));
    }

    #[test]
    fn inline_labels_on_one_line() {
        let r = from_text("Quantum Devices\nFaculty Mentor: Dr. Q Credit: 3 Stipend: $1,000");
        assert_eq!(r.faculty_mentor.as_deref(), Some("Dr. Q"));
        assert_eq!(r.credit.as_deref(), Some("3"));
        assert_eq!(r.stipend.as_deref(), Some("$1,000"));
    }

    #[test]
    fn lowercase_colon_in_prose_is_not_a_label() {
        let r = from_text("Bio Sensors\nDescription: we build one project: a sensor.");
        assert_eq!(r.project_description.as_deref(), Some("we build one project: a sensor."));
    }

    #[test]
    fn unknown_labels_are_retained_or_dropped() {
        let text = "Coastal Modeling\nFaculty Mentor: Dr. Z\nLab Location: NEB 201";
        let r = from_text(text);
        assert_eq!(r.extra.get("lab_location").map(String::as_str), Some("NEB 201"));
        assert_eq!(r.faculty_mentor.as_deref(), Some("Dr. Z"));

        let lines: Vec<&str> = text.lines().collect();
        let block = RawBlock::new(tokenize_lines(&lines));
        let dropped = extract_record(
            &block,
            &ExtractContext {
                unknown_labels: UnknownLabels::Drop,
                ..ctx()
            },
        );
        assert!(dropped.extra.is_empty());
        assert_eq!(dropped.faculty_mentor.as_deref(), Some("Dr. Z"));
    }

    #[test]
    fn title_with_colon_is_not_an_extra() {
        let r = from_text("Deep Learning: A Survey\nMentor: Dr. W");
        assert_eq!(r.project_title.as_deref(), Some("Deep Learning: A Survey"));
        assert!(r.extra.is_empty());
    }

    #[test]
    fn empty_block_still_yields_record() {
        let r = extract_record(&RawBlock::new(Vec::new()), &ctx());
        assert_eq!(r.department.as_deref(), Some(DEPT));
        assert!(r.source.is_some());
        assert_eq!(r.extracted_field_count(), 0);
    }

    #[test]
    fn labeled_department_is_kept() {
        let r = from_text("Grid Storage\nDepartment: Electrical & Computer Engineering");
        assert_eq!(r.department.as_deref(), Some("Electrical & Computer Engineering"));
    }

    #[test]
    fn first_label_occurrence_wins() {
        let r = from_text("T\nCredit: 1\nCredit: 3");
        assert_eq!(r.credit.as_deref(), Some("1"));
    }

    #[test]
    fn urls_are_not_split_as_labels() {
        let r = from_text("T\nWebsite: https://lab.ufl.edu/a:b");
        assert_eq!(r.website.as_deref(), Some("https://lab.ufl.edu/a:b"));
    }

    #[test]
    fn split_inline_pieces() {
        let pieces = split_inline("Mentor: A Credit: 2");
        assert_eq!(
            pieces,
            vec![
                (Some("Mentor".to_string()), "A".to_string()),
                (Some("Credit".to_string()), "2".to_string()),
            ]
        );
        assert_eq!(split_inline("no labels here"), vec![(None, "no labels here".to_string())]);
    }

    #[test]
    fn inline_emphasis_in_prose_is_not_a_label() {
        let r = from_html(
            "<h3>Dark Matter</h3>\
             <p><strong>Project Description:</strong> We measure <em>background</em> radiation \
             in underground detectors.</p>",
        );
        assert_eq!(
            r.project_description.as_deref(),
            Some("We measure background radiation in underground detectors.")
        );
        assert!(r.prerequisites.is_none());
    }

    #[test]
    fn bold_label_without_colon_at_line_start() {
        let r = from_html("<h3>Optics</h3><p><strong>Credit</strong> 3 hours</p>");
        assert_eq!(r.credit.as_deref(), Some("3 hours"));
    }

    #[test]
    fn contact_without_address_falls_back_to_block_email() {
        let r = from_text("Coral Reef Genomics\nWrite to msantos@bio.ufl.edu to apply.\nContact: Dr. Maria Santos");
        assert_eq!(r.contact_email.as_deref(), Some("msantos@bio.ufl.edu"));
        assert_eq!(r.extra.get("contact").map(String::as_str), Some("Dr. Maria Santos"));
    }

    #[test]
    fn contact_name_is_dropped_with_unknown_labels() {
        let lines = ["Coral Reef Genomics", "Contact: Dr. Maria Santos"];
        let block = RawBlock::new(tokenize_lines(&lines));
        let r = extract_record(
            &block,
            &ExtractContext {
                unknown_labels: UnknownLabels::Drop,
                ..ctx()
            },
        );
        assert!(r.contact_email.is_none());
        assert!(r.extra.is_empty());
    }

    #[test]
    fn list_split_keeps_parenthesized_items() {
        assert_eq!(split_list("Undergraduate (Junior or Senior)"), "Undergraduate (Junior or Senior)");
        assert_eq!(split_list("Fall (A/B), Spring"), "Fall (A/B), Spring");
        assert_eq!(split_list("Sophomore (any major), Junior"), "Sophomore (any major), Junior");
    }

    #[test]
    fn list_split_dedupes() {
        assert_eq!(split_list("Fall, fall; Spring / Summer"), "Fall, Spring, Summer");
        assert_eq!(split_list("Junior or Senior"), "Junior, Senior");
    }
}
