use chrono::Utc;
use uuid::Uuid;

use super::uploads::{checksum, sanitize_file_name};
use super::{PortalService, ServiceError, ServiceResult, UploadRequest};
use crate::database::models::{
    Document, Internship, InternshipFilter, InternshipSubmission, InternshipUpdate, ProfileUpdate, User,
};
use crate::types::{FieldErrors, InternshipPhase, ReviewStatus};

impl PortalService {
    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> ServiceResult<User> {
        let mut user = self.load_user(user_id).await?;
        update.apply(&mut user)?;
        user.updated_at = Utc::now();

        let user = self.store.update_user(user).await?;
        tracing::info!("Updated profile of user {}", user.id);
        Ok(user)
    }

    pub async fn submit_internship(&self, student_id: Uuid, submission: InternshipSubmission) -> ServiceResult<Internship> {
        let internship = submission.into_internship(student_id, Utc::now())?;
        let internship = self.store.insert_internship(internship).await?;

        tracing::info!(
            "Student {} submitted internship {} at {}",
            student_id,
            internship.id,
            internship.company_name
        );
        Ok(internship)
    }

    pub async fn own_internships(&self, student_id: Uuid) -> ServiceResult<Vec<Internship>> {
        Ok(self
            .store
            .list_internships(&InternshipFilter::for_student(student_id))
            .await?)
    }

    /// Someone else's internship is reported as missing, not forbidden
    pub async fn own_internship(&self, student_id: Uuid, id: Uuid) -> ServiceResult<Internship> {
        let internship = self.load_internship(id).await?;
        if internship.student_id != student_id {
            return Err(ServiceError::NotFound("internship"));
        }
        Ok(internship)
    }

    /// Details may change while the application is still pending review.
    /// Students may start an approved internship and mark it completed,
    /// but termination is left to faculty.
    pub async fn update_own_internship(
        &self,
        student_id: Uuid,
        id: Uuid,
        update: InternshipUpdate,
    ) -> ServiceResult<Internship> {
        let mut internship = self.own_internship(student_id, id).await?;
        let requested = update.requested_phase();

        if !update.touches_details() && requested.is_none() {
            let mut errors = FieldErrors::new();
            errors.insert("body".to_string(), "no updatable fields supplied".to_string());
            return Err(ServiceError::Validation(errors));
        }

        if update.touches_details() {
            if internship.review_status != ReviewStatus::Pending {
                return Err(ServiceError::Conflict(format!(
                    "internship details are locked once reviewed (review status {})",
                    internship.review_status
                )));
            }
            update.apply_details(&mut internship)?;
        }

        match requested {
            Some(InternshipPhase::Terminated) => {
                return Err(ServiceError::Forbidden(
                    "Only faculty can terminate an internship".to_string(),
                ));
            }
            // Forms resend the current phase alongside detail edits
            Some(phase) if phase == internship.internship_phase && update.touches_details() => {}
            Some(phase) => Self::apply_phase(&mut internship, phase)?,
            None => {}
        }

        let internship = self.save_internship(internship).await?;
        tracing::info!(
            "Student {} updated internship {} (phase {})",
            student_id,
            internship.id,
            internship.internship_phase
        );
        Ok(internship)
    }

    pub async fn upload_document(
        &self,
        student_id: Uuid,
        internship_id: Uuid,
        upload: UploadRequest,
    ) -> ServiceResult<Document> {
        let internship = self.own_internship(student_id, internship_id).await?;

        if upload.body.is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert("body".to_string(), "upload must not be empty".to_string());
            return Err(ServiceError::Validation(errors));
        }
        if upload.body.len() > self.uploads.max_bytes() {
            return Err(ServiceError::PayloadTooLarge {
                limit: self.uploads.max_bytes(),
            });
        }

        let id = Uuid::new_v4();
        let path = self.uploads.save(internship.id, id, &upload.body).await?;

        let document = Document {
            id,
            internship_id: internship.id,
            kind: upload.kind,
            file_name: sanitize_file_name(&upload.file_name),
            content_type: upload.content_type,
            size_bytes: upload.body.len() as i64,
            sha256: checksum(&upload.body),
            storage_path: path.to_string_lossy().into_owned(),
            uploaded_by: student_id,
            uploaded_at: Utc::now(),
        };

        let document = match self.store.insert_document(document).await {
            Ok(document) => document,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    tracing::warn!("Failed to remove orphaned upload {}: {}", path.display(), cleanup);
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            "Student {} uploaded {} ({} bytes) for internship {}",
            student_id,
            document.kind,
            document.size_bytes,
            internship.id
        );
        Ok(document)
    }

    pub async fn own_documents(&self, student_id: Uuid, internship_id: Uuid) -> ServiceResult<Vec<Document>> {
        let internship = self.own_internship(student_id, internship_id).await?;
        Ok(self.store.list_documents(internship.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use crate::types::{DocumentKind, ReviewStatus, Role};
    use serde_json::json;

    async fn submitted(service: &PortalService, student: &User) -> Internship {
        let submission: InternshipSubmission = serde_json::from_value(json!({
            "companyName": "Acme", "position": "Backend Intern", "stipend": 10000
        }))
        .unwrap();
        service.submit_internship(student.id, submission).await.unwrap()
    }

    fn phase_update(phase: InternshipPhase) -> InternshipUpdate {
        InternshipUpdate {
            internship_phase: Some(phase),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn other_students_internships_are_not_found() {
        let service = testing::service();
        let asha = testing::user(&service, "asha@college.edu", Role::Student).await;
        let ravi = testing::user(&service, "ravi@college.edu", Role::Student).await;
        let internship = submitted(&service, &asha).await;

        assert!(matches!(
            service.own_internship(ravi.id, internship.id).await,
            Err(ServiceError::NotFound("internship"))
        ));
        assert!(service.own_internships(ravi.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cannot_start_before_approval() {
        let service = testing::service();
        let asha = testing::user(&service, "asha@college.edu", Role::Student).await;
        let internship = submitted(&service, &asha).await;

        let err = service
            .update_own_internship(asha.id, internship.id, phase_update(InternshipPhase::Active))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn approved_internship_can_be_started_and_completed() {
        let service = testing::service();
        let asha = testing::user(&service, "asha@college.edu", Role::Student).await;
        let mut internship = submitted(&service, &asha).await;

        // approve directly through the store
        let previous = internship.updated_at;
        internship.review_status = ReviewStatus::Approved;
        service.store().update_internship(internship.clone(), previous).await.unwrap();

        let active = service
            .update_own_internship(asha.id, internship.id, phase_update(InternshipPhase::Active))
            .await
            .unwrap();
        assert!(active.is_active());

        let done = service
            .update_own_internship(asha.id, internship.id, phase_update(InternshipPhase::Completed))
            .await
            .unwrap();
        assert_eq!(done.internship_phase, InternshipPhase::Completed);
        assert!(!done.is_active());

        // details are locked after review
        let edit = InternshipUpdate {
            company_name: Some("Other".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_own_internship(asha.id, internship.id, edit).await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn students_cannot_terminate() {
        let service = testing::service();
        let asha = testing::user(&service, "asha@college.edu", Role::Student).await;
        let internship = submitted(&service, &asha).await;

        assert!(matches!(
            service
                .update_own_internship(asha.id, internship.id, phase_update(InternshipPhase::Terminated))
                .await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn pending_details_can_be_edited() {
        let service = testing::service();
        let asha = testing::user(&service, "asha@college.edu", Role::Student).await;
        let internship = submitted(&service, &asha).await;

        let update: InternshipUpdate = serde_json::from_value(json!({
            "location": "Pune", "hasJoined": false
        }))
        .unwrap();
        let updated = service
            .update_own_internship(asha.id, internship.id, update)
            .await
            .unwrap();
        assert_eq!(updated.location.as_deref(), Some("Pune"));
        assert!(updated.updated_at >= internship.updated_at);
    }

    #[tokio::test]
    async fn uploads_are_checksummed_and_bounded() {
        let service = testing::service();
        let asha = testing::user(&service, "asha@college.edu", Role::Student).await;
        let internship = submitted(&service, &asha).await;

        let upload = |body: Vec<u8>| UploadRequest {
            kind: DocumentKind::OfferLetter,
            file_name: "../offer.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            body,
        };

        let document = service
            .upload_document(asha.id, internship.id, upload(b"abc".to_vec()))
            .await
            .unwrap();
        assert_eq!(document.file_name, "offer.pdf");
        assert_eq!(document.size_bytes, 3);
        assert_eq!(document.sha256, checksum(b"abc"));
        assert_eq!(service.own_documents(asha.id, internship.id).await.unwrap().len(), 1);

        let err = service
            .upload_document(asha.id, internship.id, upload(vec![0u8; 65]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PayloadTooLarge { limit: 64 }));

        tokio::fs::remove_dir_all(service.uploads.root()).await.unwrap();
    }
}
