use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{DateTime, Document, doc, oid::ObjectId},
    options::ReturnDocument,
};

use crate::{database::REVIEWS, error::AppError, models::Review};

#[derive(Clone)]
pub struct ReviewService {
    collection: Collection<Review>,
}

impl ReviewService {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(REVIEWS),
        }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Review>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_product(&self, product_id: ObjectId) -> Result<Vec<Review>, AppError> {
        let cursor = self.collection.find(doc! { "product": product_id }).await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_product_and_author(
        &self,
        product_id: ObjectId,
        author: ObjectId,
    ) -> Result<Option<Review>, AppError> {
        Ok(self
            .collection
            .find_one(doc! { "product": product_id, "author": author })
            .await?)
    }

    pub async fn ratings_for_product(&self, product_id: ObjectId) -> Result<Vec<f64>, AppError> {
        let reviews = self.find_by_product(product_id).await?;

        Ok(reviews.into_iter().map(|review| review.rating).collect())
    }

    pub async fn count_for_product(&self, product_id: ObjectId) -> Result<u64, AppError> {
        Ok(self
            .collection
            .count_documents(doc! { "product": product_id })
            .await?)
    }

    pub async fn create(&self, mut review: Review) -> Result<Review, AppError> {
        let result = self.collection.insert_one(&review).await?;
        review.id = result.inserted_id.as_object_id();

        Ok(review)
    }

    pub async fn update(
        &self,
        id: ObjectId,
        mut set: Document,
    ) -> Result<Option<Review>, AppError> {
        set.insert("updatedAt", DateTime::now());

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Review>, AppError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?)
    }
}
