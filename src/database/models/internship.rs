use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::types::{FieldErrors, InternshipPhase, ReviewStatus};

use super::user::non_empty;

pub const MAX_TEXT_LEN: usize = 200;
pub const MAX_REMARKS_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    pub id: Uuid,
    pub student_id: Uuid,
    pub company_name: String,
    pub position: String,
    pub location: Option<String>,
    pub stipend: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub internship_phase: InternshipPhase,
    pub review_status: ReviewStatus,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_remarks: Option<String>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Internship {
    pub fn is_active(&self) -> bool {
        self.internship_phase.is_active()
    }

    fn check_fields(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_text(&mut errors, "companyName", &self.company_name);
        check_text(&mut errors, "position", &self.position);
        if let Some(location) = &self.location {
            if location.chars().count() > MAX_TEXT_LEN {
                errors.insert("location".to_string(), format!("must be at most {} characters", MAX_TEXT_LEN));
            }
        }
        if matches!(self.stipend, Some(s) if s < 0) {
            errors.insert("stipend".to_string(), "must not be negative".to_string());
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                errors.insert("endDate".to_string(), "must not be before startDate".to_string());
            }
        }
        errors
    }
}

/// Body of `POST /api/student/internships`
///
/// Accepts `internshipStatus` as an alias for `internshipPhase`, and the
/// legacy `hasJoined` flag, so older form builds keep working.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipSubmission {
    pub company_name: String,
    pub position: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub stipend: Option<i64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, alias = "internshipStatus")]
    pub internship_phase: Option<InternshipPhase>,
    #[serde(default)]
    pub has_joined: Option<bool>,
}

impl InternshipSubmission {
    pub fn requested_phase(&self) -> Option<InternshipPhase> {
        self.internship_phase
            .or_else(|| self.has_joined.map(InternshipPhase::from_has_joined))
    }

    /// Build a new, unreviewed internship owned by `student_id`
    pub fn into_internship(self, student_id: Uuid, now: DateTime<Utc>) -> Result<Internship, FieldErrors> {
        let requested = self.requested_phase();

        let internship = Internship {
            id: Uuid::new_v4(),
            student_id,
            company_name: self.company_name.trim().to_string(),
            position: self.position.trim().to_string(),
            location: self.location.and_then(non_empty),
            stipend: self.stipend,
            start_date: self.start_date,
            end_date: self.end_date,
            internship_phase: InternshipPhase::NotStarted,
            review_status: ReviewStatus::Pending,
            reviewed_at: None,
            review_remarks: None,
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        };

        let mut errors = internship.check_fields();
        if matches!(requested, Some(phase) if phase != InternshipPhase::NotStarted) {
            errors.insert(
                "internshipPhase".to_string(),
                "new internships start as NOT_STARTED until reviewed".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(internship)
        } else {
            Err(errors)
        }
    }
}

/// Body of `PATCH /api/student/internships/:id`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipUpdate {
    pub company_name: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub stipend: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(alias = "internshipStatus")]
    pub internship_phase: Option<InternshipPhase>,
    pub has_joined: Option<bool>,
}

impl InternshipUpdate {
    pub fn requested_phase(&self) -> Option<InternshipPhase> {
        self.internship_phase
            .or_else(|| self.has_joined.map(InternshipPhase::from_has_joined))
    }

    pub fn touches_details(&self) -> bool {
        self.company_name.is_some()
            || self.position.is_some()
            || self.location.is_some()
            || self.stipend.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    /// Apply the detail fields; phase changes are handled by the service
    pub fn apply_details(&self, internship: &mut Internship) -> Result<(), FieldErrors> {
        if let Some(company_name) = &self.company_name {
            internship.company_name = company_name.trim().to_string();
        }
        if let Some(position) = &self.position {
            internship.position = position.trim().to_string();
        }
        if let Some(location) = &self.location {
            internship.location = non_empty(location.clone());
        }
        if self.stipend.is_some() {
            internship.stipend = self.stipend;
        }
        if self.start_date.is_some() {
            internship.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            internship.end_date = self.end_date;
        }

        let errors = internship.check_fields();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Body of `POST /api/faculty/internships/:id/review`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub decision: crate::types::ReviewDecision,
    #[serde(default, alias = "reviewRemarks")]
    pub remarks: Option<String>,
}

impl ReviewRequest {
    pub fn validate(&self) -> Result<Option<String>, FieldErrors> {
        let mut errors = FieldErrors::new();
        let remarks = self.remarks.clone().and_then(non_empty);

        if let Some(text) = &remarks {
            if text.chars().count() > MAX_REMARKS_LEN {
                errors.insert("remarks".to_string(), format!("must be at most {} characters", MAX_REMARKS_LEN));
            }
        } else if self.decision == crate::types::ReviewDecision::Rejected {
            errors.insert("remarks".to_string(), "are required when rejecting".to_string());
        }

        if errors.is_empty() {
            Ok(remarks)
        } else {
            Err(errors)
        }
    }
}

/// Body of `PATCH /api/faculty/internships/:id/phase`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseChange {
    #[serde(alias = "internshipStatus")]
    pub internship_phase: InternshipPhase,
}

/// Query string accepted by the internship list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipQuery {
    pub phase: Option<InternshipPhase>,
    pub review_status: Option<ReviewStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl InternshipQuery {
    pub fn into_filter(self, api: &ApiConfig) -> InternshipFilter {
        let limit = self
            .limit
            .unwrap_or(api.default_page_size)
            .clamp(1, api.max_page_size.max(1));

        InternshipFilter {
            phase: self.phase,
            review_status: self.review_status,
            student_id: None,
            mentor_id: None,
            limit: Some(limit),
            offset: self.offset,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InternshipFilter {
    pub phase: Option<InternshipPhase>,
    pub review_status: Option<ReviewStatus>,
    pub student_id: Option<Uuid>,
    /// Restrict to students mentored by this faculty member
    pub mentor_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl InternshipFilter {
    pub fn for_student(student_id: Uuid) -> Self {
        Self {
            student_id: Some(student_id),
            ..Default::default()
        }
    }

    pub fn for_mentor(mentor_id: Uuid) -> Self {
        Self {
            mentor_id: Some(mentor_id),
            ..Default::default()
        }
    }

    /// Whether `internship` passes the phase/review/student predicates.
    /// Mentor scoping needs the owning user and is checked by the store.
    pub fn matches(&self, internship: &Internship) -> bool {
        self.phase.map_or(true, |p| internship.internship_phase == p)
            && self.review_status.map_or(true, |s| internship.review_status == s)
            && self.student_id.map_or(true, |id| internship.student_id == id)
    }
}

/// Internship counts by phase and by review status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSummary {
    pub total: u64,
    pub active: u64,
    pub by_phase: BTreeMap<String, u64>,
    pub by_review_status: BTreeMap<String, u64>,
}

impl Default for PhaseSummary {
    fn default() -> Self {
        Self {
            total: 0,
            active: 0,
            by_phase: InternshipPhase::ALL.iter().map(|p| (p.as_str().to_string(), 0)).collect(),
            by_review_status: ReviewStatus::ALL.iter().map(|s| (s.as_str().to_string(), 0)).collect(),
        }
    }
}

impl PhaseSummary {
    pub fn tally(&mut self, phase: InternshipPhase, status: ReviewStatus, count: u64) {
        self.total += count;
        if phase.is_active() {
            self.active += count;
        }
        *self.by_phase.entry(phase.as_str().to_string()).or_insert(0) += count;
        *self.by_review_status.entry(status.as_str().to_string()).or_insert(0) += count;
    }
}

fn check_text(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), "is required".to_string());
    } else if value.chars().count() > MAX_TEXT_LEN {
        errors.insert(field.to_string(), format!("must be at most {} characters", MAX_TEXT_LEN));
    }
}
