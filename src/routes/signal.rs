use super::AnalysisQuery;
use crate::services::{analysis_service, analysis_service::SignalView, ServiceError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

pub async fn get_signal(
    State(state): State<AppState>,
    query: Result<Query<AnalysisQuery>, QueryRejection>,
) -> Result<Json<SignalView>, ServiceError> {
    let query = AnalysisQuery::from_extractor(query)?;
    let (asset, range) = query.resolve(&state)?;
    let view = analysis_service::signal(&state, asset, range, query.mode).await?;
    Ok(Json(view))
}
