use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{DateTime, Document, doc, oid::ObjectId},
    options::ReturnDocument,
};

use crate::{database::ORDERS, error::AppError, models::Order};

#[derive(Clone)]
pub struct OrderService {
    collection: Collection<Order>,
}

impl OrderService {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ORDERS),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Order>, AppError> {
        let cursor = self.collection.find(doc! {}).await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_user(&self, user_id: ObjectId) -> Result<Vec<Order>, AppError> {
        let cursor = self.collection.find(doc! { "orderBy": user_id }).await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Order>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn create(&self, mut order: Order) -> Result<Order, AppError> {
        let result = self.collection.insert_one(&order).await?;
        order.id = result.inserted_id.as_object_id();

        Ok(order)
    }

    pub async fn update(&self, id: ObjectId, mut set: Document) -> Result<Option<Order>, AppError> {
        set.insert("updatedAt", DateTime::now());

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }
}
