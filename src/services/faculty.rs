use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{PortalService, ServiceError, ServiceResult};
use crate::database::models::{
    Document, Internship, InternshipFilter, InternshipQuery, PhaseChange, PhaseSummary, ReviewRequest, User,
    UserFilter,
};
use crate::types::{InternshipPhase, ReviewDecision, ReviewStatus, Role};

/// A mentee together with every internship they have submitted
#[derive(Debug, Clone)]
pub struct StudentDetail {
    pub student: User,
    pub internships: Vec<Internship>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyDashboard {
    pub mentee_count: usize,
    pub pending_reviews: u64,
    pub internships: PhaseSummary,
}

impl PortalService {
    pub async fn mentored_students(&self, faculty_id: Uuid) -> ServiceResult<Vec<User>> {
        let filter = UserFilter {
            role: Some(Role::Student),
            mentor_id: Some(faculty_id),
        };
        Ok(self.store.list_users(&filter).await?)
    }

    pub async fn mentored_student(&self, faculty_id: Uuid, student_id: Uuid) -> ServiceResult<StudentDetail> {
        let student = self
            .store
            .find_user(student_id)
            .await?
            .filter(|u| u.role == Role::Student && u.mentor_id == Some(faculty_id))
            .ok_or(ServiceError::NotFound("student"))?;

        let internships = self
            .store
            .list_internships(&InternshipFilter::for_student(student.id))
            .await?;

        Ok(StudentDetail { student, internships })
    }

    pub async fn faculty_internships(&self, faculty_id: Uuid, query: InternshipQuery) -> ServiceResult<Vec<Internship>> {
        let filter = InternshipFilter {
            mentor_id: Some(faculty_id),
            ..query.into_filter(&self.api)
        };
        Ok(self.store.list_internships(&filter).await?)
    }

    /// Internships of students mentored by someone else are reported as missing
    pub async fn faculty_internship(&self, faculty_id: Uuid, id: Uuid) -> ServiceResult<Internship> {
        let internship = self.load_internship(id).await?;
        let owner = self.store.find_user(internship.student_id).await?;

        match owner {
            Some(student) if student.mentor_id == Some(faculty_id) => Ok(internship),
            _ => Err(ServiceError::NotFound("internship")),
        }
    }

    /// Record an approve/reject decision on a pending application.
    /// Rejecting an internship that never started also terminates it.
    pub async fn review_internship(
        &self,
        faculty_id: Uuid,
        id: Uuid,
        review: ReviewRequest,
    ) -> ServiceResult<Internship> {
        let remarks = review.validate()?;
        let mut internship = self.faculty_internship(faculty_id, id).await?;

        if internship.review_status != ReviewStatus::Pending {
            return Err(ServiceError::Conflict(format!(
                "internship has already been reviewed ({})",
                internship.review_status
            )));
        }

        internship.review_status = review.decision.into();
        internship.review_remarks = remarks;
        internship.reviewed_at = Some(Utc::now());
        internship.reviewed_by = Some(faculty_id);

        if review.decision == ReviewDecision::Rejected && internship.internship_phase == InternshipPhase::NotStarted {
            Self::apply_phase(&mut internship, InternshipPhase::Terminated)?;
        }

        let internship = self.save_internship(internship).await?;
        tracing::info!(
            "Faculty {} marked internship {} as {}",
            faculty_id,
            internship.id,
            internship.review_status
        );
        Ok(internship)
    }

    pub async fn update_phase(&self, faculty_id: Uuid, id: Uuid, change: PhaseChange) -> ServiceResult<Internship> {
        let mut internship = self.faculty_internship(faculty_id, id).await?;
        let from = internship.internship_phase;
        Self::apply_phase(&mut internship, change.internship_phase)?;

        let internship = self.save_internship(internship).await?;
        tracing::info!(
            "Faculty {} moved internship {} from {} to {}",
            faculty_id,
            internship.id,
            from,
            internship.internship_phase
        );
        Ok(internship)
    }

    pub async fn faculty_documents(&self, faculty_id: Uuid, internship_id: Uuid) -> ServiceResult<Vec<Document>> {
        let internship = self.faculty_internship(faculty_id, internship_id).await?;
        Ok(self.store.list_documents(internship.id).await?)
    }

    pub async fn faculty_dashboard(&self, faculty_id: Uuid) -> ServiceResult<FacultyDashboard> {
        let mentees = self.mentored_students(faculty_id).await?;
        let internships = self
            .store
            .summarize_internships(&InternshipFilter::for_mentor(faculty_id))
            .await?;
        let pending_reviews = internships
            .by_review_status
            .get(ReviewStatus::Pending.as_str())
            .copied()
            .unwrap_or(0);

        Ok(FacultyDashboard {
            mentee_count: mentees.len(),
            pending_reviews,
            internships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::InternshipSubmission;
    use crate::services::testing;
    use serde_json::json;

    struct Fixture {
        service: PortalService,
        mentor: User,
        other_mentor: User,
        internship: Internship,
    }

    async fn fixture() -> Fixture {
        let service = testing::service();
        let mentor = testing::user(&service, "mentor@college.edu", Role::Faculty).await;
        let other_mentor = testing::user(&service, "other@college.edu", Role::Faculty).await;
        let student = testing::user(&service, "asha@college.edu", Role::Student).await;
        service.assign_mentor(student.id, mentor.id).await.unwrap();

        let submission: InternshipSubmission =
            serde_json::from_value(json!({"companyName": "Acme", "position": "Intern"})).unwrap();
        let internship = service.submit_internship(student.id, submission).await.unwrap();

        Fixture {
            service,
            mentor,
            other_mentor,
            internship,
        }
    }

    fn review(decision: &str, remarks: Option<&str>) -> ReviewRequest {
        serde_json::from_value(json!({"decision": decision, "remarks": remarks})).unwrap()
    }

    fn phase(phase: InternshipPhase) -> PhaseChange {
        PhaseChange { internship_phase: phase }
    }

    #[tokio::test]
    async fn only_the_mentor_sees_the_internship() {
        let f = fixture().await;

        assert!(f.service.faculty_internship(f.mentor.id, f.internship.id).await.is_ok());
        assert!(matches!(
            f.service.faculty_internship(f.other_mentor.id, f.internship.id).await,
            Err(ServiceError::NotFound("internship"))
        ));
        assert!(f
            .service
            .faculty_internships(f.other_mentor.id, InternshipQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn approval_records_review_and_unlocks_activation() {
        let f = fixture().await;

        let err = f
            .service
            .update_phase(f.mentor.id, f.internship.id, phase(InternshipPhase::Active))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let approved = f
            .service
            .review_internship(f.mentor.id, f.internship.id, review("APPROVED", Some("Good fit")))
            .await
            .unwrap();
        assert_eq!(approved.review_status, ReviewStatus::Approved);
        assert_eq!(approved.review_remarks.as_deref(), Some("Good fit"));
        assert_eq!(approved.reviewed_by, Some(f.mentor.id));
        assert!(approved.reviewed_at.is_some());

        let active = f
            .service
            .update_phase(f.mentor.id, f.internship.id, phase(InternshipPhase::Active))
            .await
            .unwrap();
        assert!(active.is_active());

        // second review is refused
        assert!(matches!(
            f.service
                .review_internship(f.mentor.id, f.internship.id, review("REJECTED", Some("changed mind")))
                .await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn rejection_terminates_unstarted_internship() {
        let f = fixture().await;

        let rejected = f
            .service
            .review_internship(f.mentor.id, f.internship.id, review("REJECTED", Some("Unverified company")))
            .await
            .unwrap();
        assert_eq!(rejected.review_status, ReviewStatus::Rejected);
        assert_eq!(rejected.internship_phase, InternshipPhase::Terminated);

        assert!(matches!(
            f.service
                .update_phase(f.mentor.id, f.internship.id, phase(InternshipPhase::Completed))
                .await,
            Err(ServiceError::Transition(_))
        ));
    }

    #[tokio::test]
    async fn dashboard_counts_mentees_and_pending() {
        let f = fixture().await;
        let dashboard = f.service.faculty_dashboard(f.mentor.id).await.unwrap();

        assert_eq!(dashboard.mentee_count, 1);
        assert_eq!(dashboard.pending_reviews, 1);
        assert_eq!(dashboard.internships.total, 1);
        assert_eq!(dashboard.internships.by_phase["NOT_STARTED"], 1);

        let other = f.service.faculty_dashboard(f.other_mentor.id).await.unwrap();
        assert_eq!(other.mentee_count, 0);
        assert_eq!(other.internships.total, 0);
    }
}
