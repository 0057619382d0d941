//! Entry repository - document store operations for meal entries

use crate::error::{ApiError, ApiResult};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use std::future::IntoFuture;
use std::time::Duration;
use validator::Validate;

/// Meal entry document
///
/// All nutritional fields are optional and carry no cross-field
/// consistency requirement. `calories` is stored as text, and
/// `ingredients` is one opaque string, not a list; both contracts are
/// inherited from the existing stored data and must be preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub dish: Option<String>,
    pub carbohydrates: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub ingredients: Option<String>,
    pub calories: Option<String>,
}

/// Input payload for creating or updating an entry
///
/// The id is never part of the payload; it is assigned by the repository
/// on creation and immutable thereafter. Validation is structural only:
/// string fields are bounded, numeric fields carry no range constraints.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EntryPayload {
    #[validate(length(max = 256))]
    pub dish: Option<String>,
    pub carbohydrates: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    #[validate(length(max = 4096))]
    pub ingredients: Option<String>,
    #[validate(length(max = 64))]
    pub calories: Option<String>,
}

impl EntryPayload {
    /// Build the `$set` document for a partial update
    ///
    /// Only fields present in the payload are included, so absent fields
    /// retain their stored values. May be empty when the payload carries
    /// no fields at all.
    fn set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(dish) = &self.dish {
            set.insert("dish", dish.clone());
        }
        if let Some(carbohydrates) = self.carbohydrates {
            set.insert("carbohydrates", carbohydrates);
        }
        if let Some(protein) = self.protein {
            set.insert("protein", protein);
        }
        if let Some(fat) = self.fat {
            set.insert("fat", fat);
        }
        if let Some(ingredients) = &self.ingredients {
            set.insert("ingredients", ingredients.clone());
        }
        if let Some(calories) = &self.calories {
            set.insert("calories", calories.clone());
        }
        set
    }
}

/// Input payload for the single-field ingredient update
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct IngredientPayload {
    #[validate(length(max = 4096))]
    pub ingredients: Option<String>,
}

/// Parse an external id string into an ObjectId
///
/// Malformed ids are not rejected: they fall back to the all-zero id,
/// which matches no stored document, so lookups behave as "no match".
fn parse_id(raw: &str) -> ObjectId {
    ObjectId::parse_str(raw).unwrap_or_else(|_| ObjectId::from_bytes([0; 12]))
}

/// Entry repository
///
/// Holds the collection handle injected at construction and bounds every
/// store call with a per-operation timeout. Store errors surface to the
/// caller unmodified in kind; nothing is retried here.
#[derive(Clone)]
pub struct EntryRepository {
    collection: Collection<Entry>,
    op_timeout: Duration,
}

impl EntryRepository {
    /// Create a repository over the entries collection
    pub fn new(db: &Database, op_timeout: Duration) -> Self {
        Self {
            collection: crate::db::entries_collection(db),
            op_timeout,
        }
    }

    /// Run a store operation under the per-call timeout
    async fn bounded<T>(
        &self,
        op: impl IntoFuture<Output = mongodb::error::Result<T>>,
    ) -> ApiResult<T> {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ApiError::Timeout),
        }
    }

    /// Insert a new entry and return its assigned id
    ///
    /// Any client-supplied id is ignored; the repository assigns the id.
    /// Validation failure means nothing is persisted.
    pub async fn create(&self, payload: EntryPayload) -> ApiResult<ObjectId> {
        payload
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let entry = Entry {
            id: ObjectId::new(),
            dish: payload.dish,
            carbohydrates: payload.carbohydrates,
            protein: payload.protein,
            fat: payload.fat,
            ingredients: payload.ingredients,
            calories: payload.calories,
        };

        self.bounded(self.collection.insert_one(&entry)).await?;

        Ok(entry.id)
    }

    /// Fetch every stored entry
    ///
    /// Order is whatever the store yields; an empty collection produces
    /// an empty vec, not an error.
    pub async fn list(&self) -> ApiResult<Vec<Entry>> {
        self.bounded(async {
            let cursor = self.collection.find(doc! {}).await?;
            cursor.try_collect().await
        })
        .await
    }

    /// Fetch a single entry by its external id
    pub async fn find_by_id(&self, raw_id: &str) -> ApiResult<Entry> {
        let found = self
            .bounded(self.collection.find_one(doc! { "_id": parse_id(raw_id) }))
            .await?;

        found.ok_or_else(|| ApiError::NotFound(format!("No entry with id {}", raw_id)))
    }

    /// Fetch entries whose `ingredients` field equals the given string
    ///
    /// Exact equality, never substring or tokenized search.
    pub async fn find_by_ingredient(&self, ingredient: &str) -> ApiResult<Vec<Entry>> {
        self.bounded(async {
            let cursor = self
                .collection
                .find(doc! { "ingredients": ingredient })
                .await?;
            cursor.try_collect().await
        })
        .await
    }

    /// Overwrite the fields present in the payload on the matching entry
    ///
    /// Issues an explicit `$set` so absent fields keep their stored
    /// values. An all-absent payload modifies nothing and never reaches
    /// the store, since an empty update document is illegal. Returns the
    /// number of documents actually modified (0 when the id is unmatched
    /// or no value changed).
    pub async fn update(&self, raw_id: &str, payload: EntryPayload) -> ApiResult<u64> {
        payload
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let set = payload.set_document();
        if set.is_empty() {
            return Ok(0);
        }

        let result = self
            .bounded(
                self.collection
                    .update_one(doc! { "_id": parse_id(raw_id) }, doc! { "$set": set }),
            )
            .await?;

        Ok(result.modified_count)
    }

    /// Overwrite only the `ingredients` field on the matching entry
    pub async fn update_ingredient(
        &self,
        raw_id: &str,
        payload: IngredientPayload,
    ) -> ApiResult<u64> {
        payload
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let result = self
            .bounded(self.collection.update_one(
                doc! { "_id": parse_id(raw_id) },
                doc! { "$set": { "ingredients": payload.ingredients } },
            ))
            .await?;

        Ok(result.modified_count)
    }

    /// Delete the matching entry
    ///
    /// Returns the number of documents deleted; 0 when nothing matched,
    /// which is not an error.
    pub async fn delete(&self, raw_id: &str) -> ApiResult<u64> {
        let result = self
            .bounded(self.collection.delete_one(doc! { "_id": parse_id(raw_id) }))
            .await?;

        Ok(result.deleted_count)
    }
}
