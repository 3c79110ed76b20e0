use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{normalize_email, Document, Internship, InternshipFilter, PhaseSummary, User, UserFilter};
use super::store::{PortalStore, StoreError};

/// Process-local store used by tests and `PORTAL_STORAGE=memory`.
///
/// Lock order is users, then internships, then documents.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    internships: RwLock<HashMap<Uuid, Internship>>,
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mentees(users: &HashMap<Uuid, User>, mentor_id: Uuid) -> HashSet<Uuid> {
        users
            .values()
            .filter(|u| u.mentor_id == Some(mentor_id))
            .map(|u| u.id)
            .collect()
    }

    async fn filtered(&self, filter: &InternshipFilter) -> Vec<Internship> {
        let users = self.users.read().await;
        let mentees = filter.mentor_id.map(|mentor| Self::mentees(&users, mentor));
        let internships = self.internships.read().await;

        let mut rows: Vec<Internship> = internships
            .values()
            .filter(|i| filter.matches(i))
            .filter(|i| mentees.as_ref().map_or(true, |set| set.contains(&i.student_id)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        rows
    }
}

#[async_trait]
impl PortalStore for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let email = normalize_email(&user.email);
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict(format!("email '{}' is already registered", email)));
        }
        let user = User { email, ..user };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        Ok(self.users.read().await.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut rows: Vec<User> = users
            .values()
            .filter(|u| filter.role.map_or(true, |r| u.role == r))
            .filter(|u| filter.mentor_id.map_or(true, |m| u.mentor_id == Some(m)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.email.cmp(&b.email)));
        Ok(rows)
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(existing) => {
                // email is immutable once registered
                let updated = User { email: existing.email.clone(), ..user };
                *existing = updated.clone();
                Ok(updated)
            }
            None => Err(StoreError::NotFound(format!("user {}", user.id))),
        }
    }

    async fn insert_internship(&self, internship: Internship) -> Result<Internship, StoreError> {
        let mut internships = self.internships.write().await;
        if internships.contains_key(&internship.id) {
            return Err(StoreError::Conflict(format!("internship {} already exists", internship.id)));
        }
        internships.insert(internship.id, internship.clone());
        Ok(internship)
    }

    async fn find_internship(&self, id: Uuid) -> Result<Option<Internship>, StoreError> {
        Ok(self.internships.read().await.get(&id).cloned())
    }

    async fn list_internships(&self, filter: &InternshipFilter) -> Result<Vec<Internship>, StoreError> {
        let rows = self.filtered(filter).await;
        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn update_internship(
        &self,
        internship: Internship,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Internship, StoreError> {
        let mut internships = self.internships.write().await;
        match internships.get_mut(&internship.id) {
            Some(existing) if existing.updated_at != expected_updated_at => Err(StoreError::Conflict(format!(
                "internship {} was modified concurrently",
                internship.id
            ))),
            Some(existing) => {
                *existing = internship.clone();
                Ok(internship)
            }
            None => Err(StoreError::NotFound(format!("internship {}", internship.id))),
        }
    }

    async fn summarize_internships(&self, filter: &InternshipFilter) -> Result<PhaseSummary, StoreError> {
        let mut summary = PhaseSummary::default();
        for internship in self.filtered(filter).await {
            summary.tally(internship.internship_phase, internship.review_status, 1);
        }
        Ok(summary)
    }

    async fn insert_document(&self, document: Document) -> Result<Document, StoreError> {
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn list_documents(&self, internship_id: Uuid) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| d.internship_id == internship_id)
            .cloned()
            .collect())
    }
}
