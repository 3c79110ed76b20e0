use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{PortalService, ServiceError, ServiceResult};
use crate::database::models::{Internship, InternshipFilter, InternshipQuery, PhaseSummary, User, UserFilter};
use crate::types::Role;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionDashboard {
    pub student_count: usize,
    pub faculty_count: usize,
    /// Students without an assigned mentor
    pub unassigned_students: usize,
    pub internships: PhaseSummary,
}

impl PortalService {
    pub async fn principal_dashboard(&self) -> ServiceResult<InstitutionDashboard> {
        let students = self.users_with_role(Role::Student).await?;
        let faculty = self.users_with_role(Role::Faculty).await?;
        let internships = self
            .store
            .summarize_internships(&InternshipFilter::default())
            .await?;

        Ok(InstitutionDashboard {
            student_count: students.len(),
            faculty_count: faculty.len(),
            unassigned_students: students.iter().filter(|s| s.mentor_id.is_none()).count(),
            internships,
        })
    }

    pub async fn all_internships(&self, query: InternshipQuery) -> ServiceResult<Vec<Internship>> {
        Ok(self.store.list_internships(&query.into_filter(&self.api)).await?)
    }

    pub async fn users_with_role(&self, role: Role) -> ServiceResult<Vec<User>> {
        let filter = UserFilter {
            role: Some(role),
            mentor_id: None,
        };
        Ok(self.store.list_users(&filter).await?)
    }

    pub async fn assign_mentor(&self, student_id: Uuid, faculty_id: Uuid) -> ServiceResult<User> {
        let mut student = self
            .store
            .find_user(student_id)
            .await?
            .filter(|u| u.role == Role::Student)
            .ok_or(ServiceError::NotFound("student"))?;

        let mentor = self
            .store
            .find_user(faculty_id)
            .await?
            .filter(|u| u.role == Role::Faculty)
            .ok_or(ServiceError::NotFound("faculty member"))?;

        if !mentor.is_active {
            return Err(ServiceError::Conflict(format!(
                "faculty member {} is deactivated",
                mentor.email
            )));
        }

        student.mentor_id = Some(mentor.id);
        student.updated_at = Utc::now();
        let student = self.store.update_user(student).await?;

        tracing::info!("Assigned mentor {} to student {}", mentor.id, student.id);
        Ok(student)
    }
}
