use super::AnalysisQuery;
use crate::services::{analysis_service, analysis_service::MarketSummary, ServiceError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

pub async fn get_price(
    State(state): State<AppState>,
    query: Result<Query<AnalysisQuery>, QueryRejection>,
) -> Result<Json<MarketSummary>, ServiceError> {
    let query = AnalysisQuery::from_extractor(query)?;
    let (asset, range) = query.resolve(&state)?;
    let summary = analysis_service::summary(&state, asset, range).await?;
    Ok(Json(summary))
}
