use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    self, CreateCollectionBuilder, Distance, GetPointsBuilder, PointId, PointStruct,
    ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::QdrantConfig;
use crate::error::{SimilarityError, SimilarityResult};
use crate::models::{SimilarUser, User};
use crate::repository::UserStore;

/// Qdrant-backed implementation of UserStore
pub struct QdrantUserStore {
    client: Qdrant,
    collection: String,
}

impl QdrantUserStore {
    pub fn new(config: QdrantConfig) -> SimilarityResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| SimilarityError::Config(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            collection: config.collection,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn uuid_to_point_id(id: Uuid) -> PointId {
        PointId::from(id.to_string())
    }

    fn point_id_to_uuid(point_id: &PointId) -> SimilarityResult<Uuid> {
        match &point_id.point_id_options {
            Some(qdrant::point_id::PointIdOptions::Uuid(uuid_str)) => Uuid::parse_str(uuid_str)
                .map_err(|e| SimilarityError::IndexUnavailable(format!("Invalid UUID: {}", e))),
            Some(qdrant::point_id::PointIdOptions::Num(num)) => Ok(Uuid::from_u128(*num as u128)),
            None => Err(SimilarityError::IndexUnavailable(
                "Missing point ID".to_string(),
            )),
        }
    }

    /// Point payload: the user without its id, which is the point id.
    fn user_to_payload(user: &User) -> SimilarityResult<HashMap<String, QdrantValue>> {
        let value = serde_json::to_value(user)
            .map_err(|e| SimilarityError::IndexUnavailable(format!("Payload encoding: {}", e)))?;

        let serde_json::Value::Object(mut map) = value else {
            return Err(SimilarityError::IndexUnavailable(
                "User payload is not an object".to_string(),
            ));
        };
        map.remove("id");

        Ok(map
            .into_iter()
            .filter_map(|(key, val)| json_to_qdrant_value(val).map(|v| (key, v)))
            .collect())
    }

    fn point_to_user(
        id: Option<&PointId>,
        payload: HashMap<String, QdrantValue>,
    ) -> SimilarityResult<User> {
        let id = id
            .map(Self::point_id_to_uuid)
            .transpose()?
            .ok_or_else(|| SimilarityError::IndexUnavailable("Missing point ID".to_string()))?;

        let mut map: serde_json::Map<String, serde_json::Value> = payload
            .into_iter()
            .filter_map(|(key, val)| qdrant_value_to_json(val).map(|v| (key, v)))
            .collect();
        map.insert("id".to_string(), serde_json::Value::String(id.to_string()));

        serde_json::from_value(serde_json::Value::Object(map)).map_err(|e| {
            SimilarityError::IndexUnavailable(format!("Malformed payload for point {}: {}", id, e))
        })
    }

    /// Vector size of an existing collection, if it has a single unnamed vector.
    async fn collection_dimension(&self) -> SimilarityResult<Option<u64>> {
        let info = self.client.collection_info(&self.collection).await?;

        let size = info
            .result
            .and_then(|r| r.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|vc| match vc.config {
                Some(qdrant::vectors_config::Config::Params(p)) => Some(p.size),
                _ => None,
            });

        Ok(size)
    }
}

fn json_to_qdrant_value(val: serde_json::Value) -> Option<QdrantValue> {
    use qdrant::value::Kind;

    match val {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(QdrantValue::from(b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(QdrantValue::from(i))
            } else {
                n.as_f64().map(QdrantValue::from)
            }
        }
        serde_json::Value::String(s) => Some(QdrantValue::from(s)),
        serde_json::Value::Array(items) => Some(QdrantValue {
            kind: Some(Kind::ListValue(qdrant::ListValue {
                values: items.into_iter().filter_map(json_to_qdrant_value).collect(),
            })),
        }),
        serde_json::Value::Object(map) => Some(QdrantValue {
            kind: Some(Kind::StructValue(qdrant::Struct {
                fields: map
                    .into_iter()
                    .filter_map(|(k, v)| json_to_qdrant_value(v).map(|v| (k, v)))
                    .collect(),
            })),
        }),
    }
}

fn qdrant_value_to_json(val: QdrantValue) -> Option<serde_json::Value> {
    use qdrant::value::Kind;

    match val.kind {
        Some(Kind::NullValue(_)) => Some(serde_json::Value::Null),
        Some(Kind::BoolValue(b)) => Some(serde_json::Value::Bool(b)),
        Some(Kind::IntegerValue(i)) => Some(serde_json::Value::Number(i.into())),
        Some(Kind::DoubleValue(f)) => {
            serde_json::Number::from_f64(f).map(serde_json::Value::Number)
        }
        Some(Kind::StringValue(s)) => Some(serde_json::Value::String(s)),
        Some(Kind::ListValue(list)) => Some(serde_json::Value::Array(
            list.values
                .into_iter()
                .filter_map(qdrant_value_to_json)
                .collect(),
        )),
        Some(Kind::StructValue(s)) => Some(serde_json::Value::Object(
            s.fields
                .into_iter()
                .filter_map(|(k, v)| qdrant_value_to_json(v).map(|v| (k, v)))
                .collect(),
        )),
        None => None,
    }
}

#[async_trait]
impl UserStore for QdrantUserStore {
    #[instrument(skip(self), fields(collection = %self.collection))]
    async fn ensure_collection(&self, dimension: u64) -> SimilarityResult<bool> {
        if self.client.collection_exists(&self.collection).await? {
            return match self.collection_dimension().await? {
                Some(existing) if existing != dimension => Err(SimilarityError::Config(format!(
                    "Collection {} has dimension {}, configured embedding dimension is {}",
                    self.collection, existing, dimension
                ))),
                _ => {
                    info!("Collection already exists");
                    Ok(false)
                }
            };
        }

        let builder = CreateCollectionBuilder::new(&self.collection)
            .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine));

        match self.client.create_collection(builder).await {
            Ok(_) => {
                info!(dimension, "Created collection");
                Ok(true)
            }
            // Another replica may have created it in the meantime.
            Err(e) => {
                if self.client.collection_exists(&self.collection).await? {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    #[instrument(skip(self, user, vector), fields(user_id = %user.id))]
    async fn upsert(&self, user: &User, vector: Vec<f32>) -> SimilarityResult<()> {
        let point = PointStruct::new(
            Self::uuid_to_point_id(user.id),
            vector,
            Self::user_to_payload(user)?,
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await?;

        debug!("Upserted user point");
        Ok(())
    }

    #[instrument(skip(self, vector))]
    async fn search(&self, vector: Vec<f32>, limit: u32) -> SimilarityResult<Vec<SimilarUser>> {
        let builder =
            SearchPointsBuilder::new(&self.collection, vector, limit as u64).with_payload(true);

        let results = self.client.search_points(builder).await?;

        results
            .result
            .into_iter()
            .map(|point| {
                let score = point.score;
                let user = Self::point_to_user(point.id.as_ref(), point.payload)?;
                Ok(SimilarUser { user, score })
            })
            .collect()
    }

    async fn get(&self, id: Uuid) -> SimilarityResult<Option<User>> {
        let builder = GetPointsBuilder::new(&self.collection, vec![Self::uuid_to_point_id(id)])
            .with_payload(true);

        let results = self.client.get_points(builder).await?;

        results
            .result
            .into_iter()
            .next()
            .map(|point| Self::point_to_user(point.id.as_ref(), point.payload))
            .transpose()
    }

    async fn list(&self, limit: u32) -> SimilarityResult<Vec<User>> {
        let builder = ScrollPointsBuilder::new(&self.collection)
            .limit(limit)
            .with_payload(true);

        let results = self.client.scroll(builder).await?;

        results
            .result
            .into_iter()
            .map(|point| Self::point_to_user(point.id.as_ref(), point.payload))
            .collect()
    }

    async fn health_check(&self) -> SimilarityResult<()> {
        self.client.health_check().await?;
        Ok(())
    }
}
