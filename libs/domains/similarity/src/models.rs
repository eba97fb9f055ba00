use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::text::EmbeddingText;

pub const DEFAULT_SIMILAR_LIMIT: u32 = 10;
pub const MAX_SIMILAR_LIMIT: u32 = 100;
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Textual attributes of a user; the input of every embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub name: String,
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub age: Option<u8>,
}

impl UserProfile {
    pub fn embedding_text(&self) -> String {
        EmbeddingText::new()
            .field("Name", Some(&self.name))
            .field("Bio", Some(&self.bio))
            .list("Interests", &self.interests)
            .field("Location", self.location.as_deref())
            .number("Age", self.age)
            .build()
    }
}

/// A stored user. Serialized flat, which is also the vector store payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile,
            created_at: Utc::now(),
        }
    }
}

/// A stored user paired with its cosine similarity to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarUser {
    pub user: User,
    pub score: f32,
}

/// DTO for creating a new user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[serde(default)]
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"), length(max = 2000))]
    pub bio: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub interests: Vec<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(range(max = 150))]
    pub age: Option<u8>,
}

impl From<CreateUser> for UserProfile {
    fn from(input: CreateUser) -> Self {
        Self {
            name: input.name.trim().to_string(),
            bio: input.bio.trim().to_string(),
            interests: clean_list(input.interests),
            location: clean_optional(input.location),
            age: input.age,
        }
    }
}

/// Attributes describing the kind of user to look for.
///
/// Every field is optional but at least one must carry text.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "has_any_attribute"))]
pub struct SimilarityQuery {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub interests: Vec<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(range(max = 150))]
    pub age: Option<u8>,
}

impl SimilarityQuery {
    /// Built with the same rules as [`UserProfile::embedding_text`], so a
    /// query repeating a user's attributes embeds to the same text.
    pub fn embedding_text(&self) -> String {
        let interests = clean_list(self.interests.clone());
        EmbeddingText::new()
            .field("Name", self.name.as_deref())
            .field("Bio", self.bio.as_deref())
            .list("Interests", &interests)
            .field("Location", self.location.as_deref())
            .number("Age", self.age)
            .build()
    }
}

impl From<UserProfile> for SimilarityQuery {
    fn from(profile: UserProfile) -> Self {
        Self {
            name: Some(profile.name),
            bio: Some(profile.bio),
            interests: profile.interests,
            location: profile.location,
            age: profile.age,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindSimilarParams {
    /// Maximum number of results (1-100, default 10)
    #[serde(default = "default_similar_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
}

impl Default for FindSimilarParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SIMILAR_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Maximum number of users (1-100, default 100)
    #[serde(default = "default_list_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// User response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub user: UserProfile,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user: user.profile,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SimilarUserResponse {
    pub id: Uuid,
    pub user: UserProfile,
    /// Cosine similarity, higher is closer
    pub similarity_score: f32,
}

impl From<SimilarUser> for SimilarUserResponse {
    fn from(found: SimilarUser) -> Self {
        Self {
            id: found.user.id,
            user: found.user.profile,
            similarity_score: found.score,
        }
    }
}

fn default_similar_limit() -> u32 {
    DEFAULT_SIMILAR_LIMIT
}

fn default_list_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}

fn has_any_attribute(query: &SimilarityQuery) -> Result<(), ValidationError> {
    if query.embedding_text().is_empty() {
        return Err(ValidationError::new("empty_query")
            .with_message("at least one attribute is required".into()));
    }
    Ok(())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
