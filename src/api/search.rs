use std::sync::Arc;

use axum::{Extension, Json, extract::Query};
use serde::Deserialize;

use crate::{error::SearchError, management::SearchProxy, types::SearchResultItem};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search(
    Query(params): Query<SearchParams>,
    Extension(proxy): Extension<Arc<SearchProxy>>,
) -> Result<Json<Vec<SearchResultItem>>, SearchError> {
    let Some(q) = params.q else {
        return Ok(Json(Vec::new()));
    };

    proxy.search(&q).await.map(Json)
}
