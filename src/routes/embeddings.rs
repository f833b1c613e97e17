use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::company;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateEmbeddingsQuery {
    /// Recompute every company, not only those missing an embedding (default: false)
    #[param(required = false)]
    pub force: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateEmbeddingsResponse {
    pub message: String,
    pub updated_count: usize,
}

/// Compute and store company profile embeddings
#[utoipa::path(
    post,
    path = "/api/update-embeddings",
    params(UpdateEmbeddingsQuery),
    responses(
        (status = 200, description = "Embeddings refreshed", body = UpdateEmbeddingsResponse),
        (status = 500, description = "Failed to update embeddings")
    ),
    tag = "companies"
)]
#[tracing::instrument(skip(state))]
pub async fn update_embeddings(
    State(state): State<AppState>,
    Query(query): Query<UpdateEmbeddingsQuery>,
) -> Result<Json<UpdateEmbeddingsResponse>, AppError> {
    let mut select = company::Entity::find().order_by_asc(company::Column::Id);
    if !query.force.unwrap_or(false) {
        select = select.filter(company::Column::EmbeddingVector.is_null());
    }
    let companies = select.all(&state.db).await?;

    if companies.is_empty() {
        return Ok(Json(UpdateEmbeddingsResponse {
            message: "All embeddings are up to date".to_string(),
            updated_count: 0,
        }));
    }

    let embedder = state.embedder.clone();
    let profiles: Vec<String> = companies.iter().map(company::Model::profile_text).collect();
    let vectors = tokio::task::spawn_blocking(move || embedder.embed_batch(&profiles))
        .await
        .map_err(|e| AppError::InternalError(format!("embedding task failed: {e}")))?;

    let now = Utc::now();
    let txn = state.db.begin().await?;
    for (company, vector) in companies.iter().zip(vectors) {
        company::ActiveModel {
            id: Set(company.id),
            embedding_vector: Set(Some(serde_json::to_string(&vector)?)),
            updated_at: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await?;
    }
    txn.commit().await?;

    tracing::info!(updated = companies.len(), "company embeddings refreshed");
    Ok(Json(UpdateEmbeddingsResponse {
        message: "Embeddings updated successfully".to_string(),
        updated_count: companies.len(),
    }))
}
