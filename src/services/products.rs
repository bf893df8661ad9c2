use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{DateTime, Document, doc, oid::ObjectId},
    options::ReturnDocument,
};

use crate::{database::PRODUCTS, error::AppError, models::Product};

pub const SIMILAR_PRODUCTS_LIMIT: i64 = 8;

#[derive(Clone)]
pub struct ProductService {
    collection: Collection<Product>,
}

impl ProductService {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(PRODUCTS),
        }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_page(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Product>, AppError> {
        let cursor = self.collection.find(filter).skip(skip).limit(limit).await?;

        Ok(cursor.try_collect().await?)
    }

    /// Same-category products, excluding the product itself. Bounded:
    /// this backs a recommendation strip, not a catalog listing.
    pub async fn find_similar(
        &self,
        id: Option<ObjectId>,
        category: &str,
    ) -> Result<Vec<Product>, AppError> {
        let cursor = self
            .collection
            .find(similar_filter(id, category))
            .limit(SIMILAR_PRODUCTS_LIMIT)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection.count_documents(filter).await?)
    }

    pub async fn create(&self, mut product: Product) -> Result<Product, AppError> {
        let result = self.collection.insert_one(&product).await?;
        product.id = result.inserted_id.as_object_id();

        Ok(product)
    }

    pub async fn update(
        &self,
        id: ObjectId,
        mut set: Document,
    ) -> Result<Option<Product>, AppError> {
        set.insert("updatedAt", DateTime::now());

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Product>, AppError> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?)
    }

    /// Storefront landing view: up to four product previews per category.
    pub async fn grouped_by_category(&self) -> Result<Vec<Document>, AppError> {
        let pipeline = [
            doc! {
                "$group": {
                    "_id": "$category",
                    "products": {
                        "$push": {
                            "id": "$_id",
                            "name": "$name",
                            "image": "$image",
                            "rating": "$rating",
                            "price": "$price",
                        },
                    },
                },
            },
            doc! {
                "$project": {
                    "_id": 0,
                    "category": "$_id",
                    "products": { "$slice": ["$products", 4] },
                },
            },
        ];

        let cursor = self.collection.aggregate(pipeline).await?;

        Ok(cursor.try_collect().await?)
    }
}

/// Same category, excluding the product itself.
pub fn similar_filter(id: Option<ObjectId>, category: &str) -> Document {
    doc! { "_id": { "$ne": id }, "category": category }
}

/// Combines the optional catalog filters into one query document.
pub fn products_filter(
    keyword: Option<&str>,
    category: Option<&str>,
    min_price_limit: Option<f64>,
    max_price_limit: Option<f64>,
    min_rating: Option<f64>,
) -> Document {
    let mut filter = doc! {};

    if let Some(keyword) = keyword.filter(|k| !k.is_empty()) {
        filter.insert("name", doc! { "$regex": keyword, "$options": "i" });
    }
    if let Some(category) = category.filter(|c| !c.is_empty()) {
        filter.insert("category", doc! { "$regex": category, "$options": "i" });
    }

    let mut price = doc! {};
    if let Some(min) = min_price_limit {
        price.insert("$gt", min);
    }
    if let Some(max) = max_price_limit {
        price.insert("$lt", max);
    }
    if !price.is_empty() {
        filter.insert("price", price);
    }

    if let Some(min_rating) = min_rating {
        filter.insert("rating", doc! { "$gt": min_rating });
    }

    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter() {
        assert_eq!(products_filter(None, None, None, None, None), doc! {});
    }

    #[test]
    fn test_keyword_and_category_are_case_insensitive() {
        let filter = products_filter(Some("phone"), Some("electronics"), None, None, None);

        assert_eq!(
            filter,
            doc! {
                "name": { "$regex": "phone", "$options": "i" },
                "category": { "$regex": "electronics", "$options": "i" },
            }
        );
    }

    #[test]
    fn test_price_limits_combine() {
        let filter = products_filter(None, None, Some(10.0), Some(100.0), None);

        assert_eq!(
            filter,
            doc! { "price": { "$gt": 10.0, "$lt": 100.0 } }
        );
    }

    #[test]
    fn test_min_rating() {
        let filter = products_filter(None, None, None, None, Some(3.5));

        assert_eq!(filter, doc! { "rating": { "$gt": 3.5 } });
    }

    #[test]
    fn test_empty_strings_ignored() {
        assert_eq!(products_filter(Some(""), Some(""), None, None, None), doc! {});
    }

    #[test]
    fn test_similar_filter_excludes_self() {
        let id = ObjectId::new();
        let filter = similar_filter(Some(id), "electronics");

        assert_eq!(
            filter,
            doc! { "_id": { "$ne": id }, "category": "electronics" }
        );
        assert!(SIMILAR_PRODUCTS_LIMIT > 0);
    }
}
