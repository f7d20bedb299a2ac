use super::AnalysisQuery;
use crate::services::{analysis_service, analysis_service::IndicatorView, ServiceError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

/// SMA(20) and RSI(14) columns aligned with the price series; absent values
/// serialize as `null`.
pub async fn get_indicators(
    State(state): State<AppState>,
    query: Result<Query<AnalysisQuery>, QueryRejection>,
) -> Result<Json<IndicatorView>, ServiceError> {
    let query = AnalysisQuery::from_extractor(query)?;
    let (asset, range) = query.resolve(&state)?;
    let view = analysis_service::indicators(&state, asset, range).await?;
    Ok(Json(view))
}
