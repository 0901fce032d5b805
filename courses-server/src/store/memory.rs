//! In-process course store
//!
//! Mirrors the PostgreSQL store's semantics over hash maps guarded by a
//! tokio `RwLock`. Nothing survives a restart.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CourseStore, StoreError};
use crate::models::{
    mean_rating, Content, Course, CourseDetail, CourseFilter, CoursePatch, HashtagTag, MemberKind,
    NewContent, NewCourse, NewReview, Paginated, Pagination, Review, ReviewOutcome,
};

/// Course row plus its associations
#[derive(Debug, Clone)]
struct Entry {
    course: Course,
    students: BTreeSet<Uuid>,
    collaborators: BTreeSet<Uuid>,
    favorites: BTreeSet<Uuid>,
    hashtags: BTreeSet<String>,
    content: Vec<Content>,
    reviews: Vec<Review>,
}

impl Entry {
    fn new(course: Course) -> Self {
        Self {
            course,
            students: BTreeSet::new(),
            collaborators: BTreeSet::new(),
            favorites: BTreeSet::new(),
            hashtags: BTreeSet::new(),
            content: Vec::new(),
            reviews: Vec::new(),
        }
    }

    fn members(&self, kind: MemberKind) -> &BTreeSet<Uuid> {
        match kind {
            MemberKind::Student => &self.students,
            MemberKind::Collaborator => &self.collaborators,
            MemberKind::Favorite => &self.favorites,
        }
    }

    fn members_mut(&mut self, kind: MemberKind) -> &mut BTreeSet<Uuid> {
        match kind {
            MemberKind::Student => &mut self.students,
            MemberKind::Collaborator => &mut self.collaborators,
            MemberKind::Favorite => &mut self.favorites,
        }
    }

    fn matches(&self, filter: &CourseFilter) -> bool {
        filter.matches_row(&self.course)
            && filter.student.map_or(true, |s| self.students.contains(&s))
            && filter
                .collaborator
                .map_or(true, |c| self.collaborators.contains(&c))
            && filter
                .hashtag
                .as_ref()
                .map_or(true, |t| self.hashtags.contains(t.as_str()))
    }

    fn recompute_rating(&mut self) -> f64 {
        self.course.rating = mean_rating(self.reviews.iter().map(|r| r.rating));
        self.course.rating
    }

    fn detail(&self) -> CourseDetail {
        CourseDetail {
            course: self.course.clone(),
            students: self.students.iter().copied().collect(),
            collaborators: self.collaborators.iter().copied().collect(),
            favorited_by: self.favorites.iter().copied().collect(),
            hashtags: self.hashtags.iter().cloned().collect(),
            content: self.content.clone(),
            reviews: self.reviews.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    courses: HashMap<Uuid, Entry>,
    /// Course ids in insertion order
    order: Vec<Uuid>,
    next_content_id: i64,
}

impl Inner {
    fn entry(&self, id: Uuid) -> Result<&Entry, StoreError> {
        self.courses
            .get(&id)
            .ok_or_else(|| StoreError::not_found("course", id))
    }

    fn entry_mut(&mut self, id: Uuid) -> Result<&mut Entry, StoreError> {
        self.courses
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("course", id))
    }

    fn ordered(&self) -> impl Iterator<Item = &Entry> {
        self.order.iter().filter_map(move |id| self.courses.get(id))
    }
}

/// In-memory [`CourseStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _inner = self.inner.read().await;
        Ok(())
    }

    async fn create_course(&self, new: NewCourse) -> Result<Course, StoreError> {
        let mut course = Course {
            id: Uuid::new_v4(),
            name: String::new(),
            description: String::new(),
            owner_id: new.owner_id,
            created_at: Utc::now(),
            blocked: false,
            in_edition: true,
            latitude: None,
            longitude: None,
            sub_level: 0,
            category: None,
            rating: 0.0,
        };
        new.apply_to(&mut course);

        let mut inner = self.inner.write().await;
        inner.order.push(course.id);
        inner.courses.insert(course.id, Entry::new(course.clone()));
        Ok(course)
    }

    async fn get_course(&self, id: Uuid) -> Result<CourseDetail, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entry(id)?.detail())
    }

    async fn list_courses(
        &self,
        filter: &CourseFilter,
        page: Pagination,
    ) -> Result<Paginated<Course>, StoreError> {
        let inner = self.inner.read().await;
        let matching: Vec<Course> = inner
            .ordered()
            .filter(|e| e.matches(filter))
            .map(|e| e.course.clone())
            .collect();
        Ok(Paginated::from_vec(matching, page))
    }

    async fn replace_course(&self, id: Uuid, new: NewCourse) -> Result<Course, StoreError> {
        let mut inner = self.inner.write().await;
        let entry = inner.entry_mut(id)?;
        new.apply_to(&mut entry.course);
        Ok(entry.course.clone())
    }

    async fn patch_course(&self, id: Uuid, patch: CoursePatch) -> Result<Course, StoreError> {
        let mut inner = self.inner.write().await;
        let entry = inner.entry_mut(id)?;
        patch.apply_to(&mut entry.course);
        Ok(entry.course.clone())
    }

    async fn delete_course(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.courses.remove(&id).is_none() {
            return Err(StoreError::not_found("course", id));
        }
        inner.order.retain(|c| *c != id);
        Ok(())
    }

    async fn list_members(
        &self,
        course_id: Uuid,
        kind: MemberKind,
    ) -> Result<Vec<Uuid>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entry(course_id)?.members(kind).iter().copied().collect())
    }

    async fn add_member(
        &self,
        course_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.entry_mut(course_id)?.members_mut(kind).insert(user_id) {
            return Err(StoreError::conflict(kind.as_str(), user_id));
        }
        Ok(())
    }

    async fn remove_member(
        &self,
        course_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.entry_mut(course_id)?.members_mut(kind).remove(&user_id) {
            return Err(StoreError::not_found(kind.as_str(), user_id));
        }
        Ok(())
    }

    async fn courses_for_user(
        &self,
        user_id: Uuid,
        kind: MemberKind,
    ) -> Result<Vec<Course>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .ordered()
            .filter(|e| e.members(kind).contains(&user_id))
            .map(|e| e.course.clone())
            .collect())
    }

    async fn list_hashtags(&self, course_id: Uuid) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entry(course_id)?.hashtags.iter().cloned().collect())
    }

    async fn add_hashtag(&self, course_id: Uuid, tag: &HashtagTag) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner
            .entry_mut(course_id)?
            .hashtags
            .insert(tag.as_str().to_owned())
        {
            return Err(StoreError::conflict("hashtag", tag.as_str()));
        }
        Ok(())
    }

    async fn remove_hashtag(&self, course_id: Uuid, tag: &HashtagTag) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.entry_mut(course_id)?.hashtags.remove(tag.as_str()) {
            return Err(StoreError::not_found("hashtag", tag.as_str()));
        }
        Ok(())
    }

    async fn list_content(&self, course_id: Uuid) -> Result<Vec<Content>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entry(course_id)?.content.clone())
    }

    async fn add_content(
        &self,
        course_id: Uuid,
        content: NewContent,
    ) -> Result<Content, StoreError> {
        let mut inner = self.inner.write().await;
        inner.entry(course_id)?;
        inner.next_content_id += 1;
        let stored = Content {
            id: inner.next_content_id,
            name: content.name().to_owned(),
            link: content.link().to_owned(),
        };
        inner.entry_mut(course_id)?.content.push(stored.clone());
        Ok(stored)
    }

    async fn remove_content(&self, course_id: Uuid, content_id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let entry = inner.entry_mut(course_id)?;
        let before = entry.content.len();
        entry.content.retain(|c| c.id != content_id);
        if entry.content.len() == before {
            return Err(StoreError::not_found("content", content_id));
        }
        Ok(())
    }

    async fn list_reviews(&self, course_id: Uuid) -> Result<Vec<Review>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entry(course_id)?.reviews.clone())
    }

    async fn upsert_review(
        &self,
        course_id: Uuid,
        new: NewReview,
    ) -> Result<ReviewOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        let entry = inner.entry_mut(course_id)?;

        let (review, created) = match entry.reviews.iter_mut().find(|r| r.user_id == new.user_id) {
            Some(existing) => {
                existing.rating = new.rating.get();
                existing.description = new.description.as_str().to_owned();
                (existing.clone(), false)
            }
            None => {
                let review = Review {
                    id: Uuid::new_v4(),
                    user_id: new.user_id,
                    rating: new.rating.get(),
                    description: new.description.as_str().to_owned(),
                    created_at: Utc::now(),
                };
                entry.reviews.push(review.clone());
                (review, true)
            }
        };

        let course_rating = entry.recompute_rating();
        Ok(ReviewOutcome {
            review,
            created,
            course_rating,
        })
    }

    async fn delete_review(&self, course_id: Uuid, user_id: Uuid) -> Result<f64, StoreError> {
        let mut inner = self.inner.write().await;
        let entry = inner.entry_mut(course_id)?;
        let before = entry.reviews.len();
        entry.reviews.retain(|r| r.user_id != user_id);
        if entry.reviews.len() == before {
            return Err(StoreError::not_found("review", user_id));
        }
        Ok(entry.recompute_rating())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseName, Rating, ReviewText};

    fn new_course(name: &str) -> NewCourse {
        NewCourse::new(CourseName::new(name).unwrap(), Uuid::new_v4())
    }

    fn review(user_id: Uuid, rating: i32) -> NewReview {
        NewReview {
            user_id,
            rating: Rating::new(rating).unwrap(),
            description: ReviewText::default(),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = MemoryStore::new();
        let mut new = new_course("Rust");
        new.description = "systems".into();
        let created = store.create_course(new).await.unwrap();

        let detail = store.get_course(created.id).await.unwrap();
        assert_eq!(detail.course.name, "Rust");
        assert_eq!(detail.course.description, "systems");
        assert!(detail.course.in_edition);
        assert_eq!(detail.course.rating, 0.0);
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let store = MemoryStore::new();
        let created = store.create_course(new_course("gone")).await.unwrap();
        store.delete_course(created.id).await.unwrap();

        let err = store.get_course(created.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { resource: "course", .. }));
        assert!(matches!(
            store.delete_course(created.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn members_conflict_and_not_found() {
        let store = MemoryStore::new();
        let course = store.create_course(new_course("c")).await.unwrap();
        let user = Uuid::new_v4();

        store.add_member(course.id, MemberKind::Student, user).await.unwrap();
        let err = store
            .add_member(course.id, MemberKind::Student, user)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { resource: "student", .. }));

        // Same user in another relation is independent
        store
            .add_member(course.id, MemberKind::Collaborator, user)
            .await
            .unwrap();

        let other = Uuid::new_v4();
        let err = store
            .remove_member(course.id, MemberKind::Student, other)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { resource: "student", .. }));

        store
            .remove_member(course.id, MemberKind::Student, user)
            .await
            .unwrap();
        assert!(store
            .list_members(course.id, MemberKind::Student)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn member_on_missing_course() {
        let store = MemoryStore::new();
        let err = store
            .add_member(Uuid::new_v4(), MemberKind::Favorite, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { resource: "course", .. }));
    }

    #[tokio::test]
    async fn review_upsert_replaces_same_user() {
        let store = MemoryStore::new();
        let course = store.create_course(new_course("c")).await.unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let first = store.upsert_review(course.id, review(alice, 2)).await.unwrap();
        assert!(first.created);
        assert_eq!(first.course_rating, 2.0);

        let second = store.upsert_review(course.id, review(alice, 4)).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.review.id, first.review.id);
        assert_eq!(second.course_rating, 4.0);

        let third = store.upsert_review(course.id, review(bob, 5)).await.unwrap();
        assert_eq!(third.course_rating, 4.5);
        assert_eq!(store.list_reviews(course.id).await.unwrap().len(), 2);

        let rating = store.delete_review(course.id, alice).await.unwrap();
        assert_eq!(rating, 5.0);
        let rating = store.delete_review(course.id, bob).await.unwrap();
        assert_eq!(rating, 0.0);
    }

    #[tokio::test]
    async fn list_filters_by_collections() {
        let store = MemoryStore::new();
        let a = store.create_course(new_course("alpha")).await.unwrap();
        let b = store.create_course(new_course("beta")).await.unwrap();
        let student = Uuid::new_v4();
        let tag = HashtagTag::new("#Rust").unwrap();

        store.add_member(a.id, MemberKind::Student, student).await.unwrap();
        store.add_hashtag(b.id, &tag).await.unwrap();

        let by_student = CourseFilter {
            student: Some(student),
            ..Default::default()
        };
        let page = store.list_courses(&by_student, Pagination::new(1)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, a.id);

        let by_tag = CourseFilter {
            hashtag: Some(tag),
            ..Default::default()
        };
        let page = store.list_courses(&by_tag, Pagination::new(1)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, b.id);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order_across_pages() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for i in 0..12 {
            ids.push(store.create_course(new_course(&format!("c{i}"))).await.unwrap().id);
        }

        let filter = CourseFilter::default();
        let first = store.list_courses(&filter, Pagination::new(1)).await.unwrap();
        let second = store.list_courses(&filter, Pagination::new(2)).await.unwrap();

        assert_eq!(first.num_pages(), 2);
        assert_eq!(first.items.len(), 10);
        assert_eq!(second.items.len(), 2);
        let listed: Vec<Uuid> = first.items.iter().chain(&second.items).map(|c| c.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn content_ids_are_unique_and_removable() {
        let store = MemoryStore::new();
        let course = store.create_course(new_course("c")).await.unwrap();
        let one = store
            .add_content(course.id, NewContent::new("one", "https://a").unwrap())
            .await
            .unwrap();
        let two = store
            .add_content(course.id, NewContent::new("two", "https://b").unwrap())
            .await
            .unwrap();
        assert_ne!(one.id, two.id);

        store.remove_content(course.id, one.id).await.unwrap();
        let err = store.remove_content(course.id, one.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { resource: "content", .. }));
        assert_eq!(store.list_content(course.id).await.unwrap(), vec![two]);
    }

    #[tokio::test]
    async fn courses_for_user_by_kind() {
        let store = MemoryStore::new();
        let a = store.create_course(new_course("a")).await.unwrap();
        let b = store.create_course(new_course("b")).await.unwrap();
        let user = Uuid::new_v4();
        store.add_member(a.id, MemberKind::Favorite, user).await.unwrap();
        store.add_member(b.id, MemberKind::Student, user).await.unwrap();

        let favorites = store.courses_for_user(user, MemberKind::Favorite).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, a.id);
        assert!(store
            .courses_for_user(user, MemberKind::Collaborator)
            .await
            .unwrap()
            .is_empty());
    }
}
