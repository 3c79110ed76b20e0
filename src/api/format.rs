//! Wire representations that add derived fields to stored records.

use serde::Serialize;

use crate::database::models::{Internship, User};
use crate::services::StudentDetail;

/// An internship as returned to clients, with the derived `isActive` flag
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipView {
    #[serde(flatten)]
    pub internship: Internship,
    pub is_active: bool,
}

impl From<Internship> for InternshipView {
    fn from(internship: Internship) -> Self {
        let is_active = internship.is_active();
        Self { internship, is_active }
    }
}

pub fn internship_views(internships: Vec<Internship>) -> Vec<InternshipView> {
    internships.into_iter().map(InternshipView::from).collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetailView {
    pub student: User,
    pub internships: Vec<InternshipView>,
}

impl From<StudentDetail> for StudentDetailView {
    fn from(detail: StudentDetail) -> Self {
        Self {
            student: detail.student,
            internships: internship_views(detail.internships),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InternshipPhase, ReviewStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn internship(phase: InternshipPhase) -> Internship {
        let now = Utc::now();
        Internship {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            position: "Intern".to_string(),
            location: None,
            stipend: None,
            start_date: None,
            end_date: None,
            internship_phase: phase,
            review_status: ReviewStatus::Approved,
            reviewed_at: Some(now),
            review_remarks: Some("ok".to_string()),
            reviewed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn view_flattens_and_derives_is_active() {
        let value = serde_json::to_value(InternshipView::from(internship(InternshipPhase::Active))).unwrap();
        assert_eq!(value["internshipPhase"], "ACTIVE");
        assert_eq!(value["isActive"], true);
        assert_eq!(value["reviewStatus"], "APPROVED");
        assert_eq!(value["reviewRemarks"], "ok");
        assert!(value.get("internship").is_none());

        let value = serde_json::to_value(InternshipView::from(internship(InternshipPhase::Completed))).unwrap();
        assert_eq!(value["isActive"], false);
    }
}
