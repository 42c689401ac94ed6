use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical schema keys, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ProjectTitle,
    Department,
    FacultyMentor,
    PhdStudentMentors,
    TermsAvailable,
    StudentLevel,
    Prerequisites,
    Credit,
    Stipend,
    ApplicationRequirements,
    ApplicationDeadline,
    Website,
    ProjectDescription,
    ContactEmail,
    Source,
    ProjectId,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::ProjectTitle,
        Field::Department,
        Field::FacultyMentor,
        Field::PhdStudentMentors,
        Field::TermsAvailable,
        Field::StudentLevel,
        Field::Prerequisites,
        Field::Credit,
        Field::Stipend,
        Field::ApplicationRequirements,
        Field::ApplicationDeadline,
        Field::Website,
        Field::ProjectDescription,
        Field::ContactEmail,
        Field::Source,
        Field::ProjectId,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::ProjectTitle => "project_title",
            Field::Department => "department",
            Field::FacultyMentor => "faculty_mentor",
            Field::PhdStudentMentors => "phd_student_mentors",
            Field::TermsAvailable => "terms_available",
            Field::StudentLevel => "student_level",
            Field::Prerequisites => "prerequisites",
            Field::Credit => "credit",
            Field::Stipend => "stipend",
            Field::ApplicationRequirements => "application_requirements",
            Field::ApplicationDeadline => "application_deadline",
            Field::Website => "website",
            Field::ProjectDescription => "project_description",
            Field::ContactEmail => "contact_email",
            Field::Source => "source",
            Field::ProjectId => "project_id",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Fields whose values are comma-joined lists.
    pub fn is_list(self) -> bool {
        matches!(self, Field::TermsAvailable | Field::StudentLevel)
    }
}

/// One extracted project posting. Absent fields are `None` and are omitted
/// from JSON entirely; there is no empty-string sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_mentor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phd_student_mentors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_available: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stipend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Labels that matched no canonical field, keyed by their sanitized text.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl ProjectRecord {
    pub fn new(department: &str, source: &str) -> Self {
        ProjectRecord {
            department: Some(department.to_string()),
            source: Some(source.to_string()),
            ..Default::default()
        }
    }

    pub fn has(&self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    pub fn set(&mut self, field: Field, value: String) {
        *self.slot_mut(field) = Some(value);
    }

    /// Count of canonical fields that were extracted from the block itself,
    /// i.e. excluding the bookkeeping fields every record carries.
    pub fn extracted_field_count(&self) -> usize {
        Field::ALL
            .into_iter()
            .filter(|f| !matches!(f, Field::Source | Field::ProjectId | Field::Department))
            .filter(|f| self.has(*f))
            .count()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::ProjectTitle => &self.project_title,
            Field::Department => &self.department,
            Field::FacultyMentor => &self.faculty_mentor,
            Field::PhdStudentMentors => &self.phd_student_mentors,
            Field::TermsAvailable => &self.terms_available,
            Field::StudentLevel => &self.student_level,
            Field::Prerequisites => &self.prerequisites,
            Field::Credit => &self.credit,
            Field::Stipend => &self.stipend,
            Field::ApplicationRequirements => &self.application_requirements,
            Field::ApplicationDeadline => &self.application_deadline,
            Field::Website => &self.website,
            Field::ProjectDescription => &self.project_description,
            Field::ContactEmail => &self.contact_email,
            Field::Source => &self.source,
            Field::ProjectId => &self.project_id,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::ProjectTitle => &mut self.project_title,
            Field::Department => &mut self.department,
            Field::FacultyMentor => &mut self.faculty_mentor,
            Field::PhdStudentMentors => &mut self.phd_student_mentors,
            Field::TermsAvailable => &mut self.terms_available,
            Field::StudentLevel => &mut self.student_level,
            Field::Prerequisites => &mut self.prerequisites,
            Field::Credit => &mut self.credit,
            Field::Stipend => &mut self.stipend,
            Field::ApplicationRequirements => &mut self.application_requirements,
            Field::ApplicationDeadline => &mut self.application_deadline,
            Field::Website => &mut self.website,
            Field::ProjectDescription => &mut self.project_description,
            Field::ContactEmail => &mut self.contact_email,
            Field::Source => &mut self.source,
            Field::ProjectId => &mut self.project_id,
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_omitted() {
        let r = ProjectRecord::new("chemistry", "chemistry.html");
        let json = serde_json::to_value(&r).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["department"], "chemistry");
        assert_eq!(obj["source"], "chemistry.html");
    }

    #[test]
    fn json_round_trip_keeps_every_string() {
        let mut r = ProjectRecord::new("physics", "https://example.edu/physics");
        r.set(Field::ProjectTitle, "Dark Matter \"Halo\" Survey".into());
        r.set(Field::ProjectDescription, "Line one\nLine two  with  spaces".into());
        r.set(Field::Credit, "0".into());
        r.set(Field::ProjectId, "physics_1".into());
        r.extra.insert("lab_location".into(), "NPB 2160".into());

        let json = serde_json::to_string(&[r.clone()]).unwrap();
        let back: Vec<ProjectRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![r]);
    }

    #[test]
    fn extras_flatten_into_the_object() {
        let mut r = ProjectRecord::new("physics", "p.html");
        r.extra.insert("lab_location".into(), "NPB".into());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["lab_location"], "NPB");
    }

    #[test]
    fn field_keys_round_trip() {
        for f in Field::ALL {
            assert_eq!(Field::from_key(f.key()), Some(f));
        }
        assert_eq!(Field::from_key("nope"), None);
    }
}
