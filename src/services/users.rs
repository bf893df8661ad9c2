use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{DateTime, Document, doc, oid::ObjectId},
    options::{IndexOptions, ReturnDocument},
};

use crate::{auth::hash_password, database::USERS, error::AppError, models::User};

#[derive(Clone)]
pub struct UserService {
    collection: Collection<User>,
}

impl UserService {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS),
        }
    }

    pub async fn ensure_indexes(&self) -> Result<(), AppError> {
        let email_unique = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(email_unique).await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    pub async fn find_page(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<User>, AppError> {
        let cursor = self.collection.find(filter).skip(skip).limit(limit).await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection.count_documents(filter).await?)
    }

    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        let result = self.collection.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();

        Ok(user)
    }

    /// Applies a `$set` update and returns the updated document. A
    /// plaintext `password` in the update must be hashed by the caller
    /// before it gets here; this layer never sees plaintext.
    pub async fn update(&self, id: ObjectId, mut set: Document) -> Result<Option<User>, AppError> {
        set.insert("updatedAt", DateTime::now());

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?)
    }

    /// Atomically increments the refresh token version, invalidating
    /// every refresh token signed with an older version.
    pub async fn bump_refresh_token_version(
        &self,
        id: ObjectId,
    ) -> Result<Option<User>, AppError> {
        Ok(self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$inc": { "refreshTokenVersion": 1 } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }
}

/// Builds the user profile update document, hashing a supplied password.
pub fn profile_update(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<Document, AppError> {
    let mut set = doc! {};

    if let Some(name) = name {
        set.insert("name", name);
    }
    if let Some(email) = email {
        set.insert("email", email);
    }
    if let Some(password) = password {
        set.insert("password", hash_password(&password)?);
    }

    Ok(set)
}

/// Case-insensitive name search, or everything when no keyword given.
pub fn users_filter(keyword: Option<&str>) -> Document {
    match keyword {
        Some(keyword) if !keyword.is_empty() => doc! {
            "name": { "$regex": keyword, "$options": "i" },
        },
        _ => doc! {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_filter_keyword() {
        let filter = users_filter(Some("jane"));

        assert_eq!(
            filter,
            doc! { "name": { "$regex": "jane", "$options": "i" } }
        );
    }

    #[test]
    fn test_users_filter_empty() {
        assert_eq!(users_filter(None), doc! {});
        assert_eq!(users_filter(Some("")), doc! {});
    }

    #[test]
    fn test_profile_update_hashes_password() {
        let set = profile_update(None, None, Some("P4ssw0rd!".into())).unwrap();

        let stored = set.get_str("password").unwrap();
        assert_ne!(stored, "P4ssw0rd!");
        assert!(stored.starts_with("$2"));
    }

    #[test]
    fn test_profile_update_partial() {
        let set = profile_update(Some("Jane".into()), None, None).unwrap();

        assert_eq!(set, doc! { "name": "Jane" });
    }
}
