use serde::{Deserialize, Serialize};

use crate::entity::tag;

#[derive(Serialize, Clone, utoipa::ToSchema)]
pub struct TagResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "beach")]
    pub name: String,
}

impl From<tag::Model> for TagResponse {
    fn from(m: tag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TagSearchQuery {
    /// Substring to look for; blank returns no suggestions.
    pub q: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddTagRequest {
    #[schema(example = "Sunset")]
    pub tag_name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TagChangeResponse {
    pub tag: TagResponse,
    pub message: String,
}
