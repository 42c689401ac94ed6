use std::collections::HashMap;
use std::sync::LazyLock;

use crate::record::Field;

/// Accepted label variants per canonical field, already in normalized form
/// (lowercase, no punctuation, singular where a plural would also appear).
const LABEL_TABLE: &[(Field, &[&str])] = &[
    (
        Field::ProjectTitle,
        &["project title", "title", "project", "project name", "research project", "research title"],
    ),
    (
        Field::Department,
        &["department", "dept", "home department", "academic department", "department name"],
    ),
    (
        Field::FacultyMentor,
        &[
            "faculty mentor",
            "faculty advisor",
            "faculty adviser",
            "faculty supervisor",
            "faculty contact",
            "faculty lead",
            "faculty",
            "mentor",
            "advisor",
            "adviser",
            "supervisor",
            "research mentor",
            "pi",
            "principal investigator",
            "professor",
        ],
    ),
    (
        Field::PhdStudentMentors,
        &[
            "phd student mentor",
            "phd mentor",
            "phd student",
            "doctoral student mentor",
            "graduate student mentor",
            "graduate mentor",
            "graduate student",
            "grad student mentor",
            "grad mentor",
            "student mentor",
            "postdoc mentor",
        ],
    ),
    (
        Field::TermsAvailable,
        &[
            "terms available",
            "term available",
            "available term",
            "term",
            "semester available",
            "semester",
            "availability",
            "timeframe",
        ],
    ),
    (
        Field::StudentLevel,
        &[
            "student level",
            "level",
            "student year",
            "class standing",
            "academic level",
            "eligible student",
            "year level",
        ],
    ),
    (
        Field::Prerequisites,
        &[
            "prerequisite",
            "prereq",
            "required skill",
            "skill",
            "qualification",
            "preferred qualification",
            "required background",
            "background",
        ],
    ),
    (
        Field::Credit,
        &["credit", "course credit", "academic credit", "credit hour", "credit available"],
    ),
    (
        Field::Stipend,
        &["stipend", "pay", "paid", "payment", "compensation", "funding", "salary", "wage"],
    ),
    (
        Field::ApplicationRequirements,
        &[
            "application requirement",
            "application material",
            "application instruction",
            "application process",
            "application",
            "how to apply",
            "to apply",
        ],
    ),
    (
        Field::ApplicationDeadline,
        &["application deadline", "deadline", "apply by", "due date", "application due"],
    ),
    (
        Field::Website,
        &[
            "website",
            "web site",
            "project website",
            "lab website",
            "webpage",
            "web page",
            "homepage",
            "url",
            "link",
        ],
    ),
    (
        Field::ProjectDescription,
        &[
            "project description",
            "description",
            "project summary",
            "summary",
            "project overview",
            "overview",
            "abstract",
            "project detail",
            "detail",
        ],
    ),
    (
        Field::ContactEmail,
        &[
            "contact email",
            "email",
            "e mail",
            "email address",
            "contact",
            "contact info",
            "contact information",
        ],
    ),
];

static LABELS: LazyLock<HashMap<&'static str, Field>> = LazyLock::new(|| {
    LABEL_TABLE
        .iter()
        .flat_map(|(field, variants)| variants.iter().map(move |v| (*v, *field)))
        .collect()
});

/// Map raw label text to its canonical field.
///
/// Matching is exact against the table after [`normalize_text`]; when that
/// misses, a trailing plural `s` on the last word is dropped and the lookup
/// retried ("Prerequisites" → "prerequisite").
pub fn normalize_label(raw: &str) -> Option<Field> {
    let norm = normalize_text(raw);
    if norm.is_empty() {
        return None;
    }
    if let Some(field) = LABELS.get(norm.as_str()) {
        return Some(*field);
    }
    let singular = norm.strip_suffix('s').filter(|s| s.len() >= 2)?;
    LABELS.get(singular).copied()
}

/// Lowercase, drop `(s)`, periods and apostrophes, turn other punctuation
/// into spaces and collapse whitespace.
pub fn normalize_text(raw: &str) -> String {
    let lower = raw.to_lowercase().replace("(s)", "");
    let mut out = String::with_capacity(lower.len());
    let mut prev_space = true;
    for ch in lower.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
            prev_space = false;
        } else if matches!(ch, '.' | '\'' | '\u{2019}') {
            continue;
        } else if !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Fallback key for labels outside the table: `"Lab Location:"` → `lab_location`.
pub fn sanitize_key(raw: &str) -> String {
    normalize_text(raw).replace(' ', "_")
}

/// All table entries, for the `labels` listing.
pub fn label_table() -> impl Iterator<Item = (Field, &'static [&'static str])> {
    LABEL_TABLE.iter().map(|(f, v)| (*f, *v))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_and_case_insensitive() {
        assert_eq!(normalize_label("Faculty Mentor:"), normalize_label("faculty mentor"));
        assert_eq!(normalize_label("FACULTY MENTOR"), Some(Field::FacultyMentor));
        assert_eq!(normalize_label("  Faculty   Mentor :  "), Some(Field::FacultyMentor));
    }

    #[test]
    fn every_variant_normalizes_stably() {
        for (field, variants) in label_table() {
            for v in variants {
                assert_eq!(normalize_label(v), Some(field), "variant {:?}", v);
                assert_eq!(normalize_label(&format!("{}:", v.to_uppercase())), Some(field));
                assert_eq!(normalize_text(&normalize_text(v)), normalize_text(v));
            }
        }
    }

    #[test]
    fn no_variant_listed_twice() {
        let total: usize = LABEL_TABLE.iter().map(|(_, v)| v.len()).sum();
        assert_eq!(LABELS.len(), total);
    }

    #[test]
    fn phd_mentor_spellings() {
        for label in [
            "Ph.D. Student Mentor(s):",
            "PhD Student Mentors",
            "Graduate Student Mentor",
            "Ph.D. Mentor",
        ] {
            assert_eq!(normalize_label(label), Some(Field::PhdStudentMentors), "{}", label);
        }
    }

    #[test]
    fn plurals_fold_to_singular() {
        assert_eq!(normalize_label("Prerequisites:"), Some(Field::Prerequisites));
        assert_eq!(normalize_label("Credits"), Some(Field::Credit));
        assert_eq!(normalize_label("Application Requirements"), Some(Field::ApplicationRequirements));
        assert_eq!(normalize_label("Terms Available:"), Some(Field::TermsAvailable));
    }

    #[test]
    fn short_aliases() {
        assert_eq!(normalize_label("PI:"), Some(Field::FacultyMentor));
        assert_eq!(normalize_label("E-mail"), Some(Field::ContactEmail));
        assert_eq!(normalize_label("Contact:"), Some(Field::ContactEmail));
    }

    #[test]
    fn unknown_labels_miss() {
        assert_eq!(normalize_label("Lab Location:"), None);
        assert_eq!(normalize_label(""), None);
        assert_eq!(normalize_label(":::"), None);
        assert_eq!(normalize_label("s"), None);
    }

    #[test]
    fn sanitized_keys() {
        assert_eq!(sanitize_key("Lab Location:"), "lab_location");
        assert_eq!(sanitize_key("Hours / Week"), "hours_week");
    }
}
