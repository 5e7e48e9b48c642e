use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::rating::{combination_steps, combine, monthly_compensation, CombinationStep, CompensationDelta};

#[derive(Deserialize)]
pub struct CombineRequest {
    pub ratings: Vec<i32>,
}

#[derive(Serialize)]
pub struct CombineResponse {
    pub combined_rating: u32,
    pub monthly_compensation: i64,
    pub steps: Vec<CombinationStep>,
}

#[derive(Deserialize)]
pub struct CompareRequest {
    pub current: Vec<i32>,
    pub potential: Vec<i32>,
}

#[derive(Serialize)]
pub struct CompareResponse {
    pub current_combined_rating: u32,
    pub potential_combined_rating: u32,
    #[serde(flatten)]
    pub compensation: CompensationDelta,
}

/// POST /api/v1/ratings/combine
pub async fn handle_combine(
    body: Result<Json<CombineRequest>, JsonRejection>,
) -> Result<Json<CombineResponse>, AppError> {
    let Json(req) = body?;
    let combined_rating = combine(&req.ratings);
    Ok(Json(CombineResponse {
        combined_rating,
        monthly_compensation: monthly_compensation(i64::from(combined_rating)),
        steps: combination_steps(&req.ratings),
    }))
}

/// POST /api/v1/ratings/compare
pub async fn handle_compare(
    body: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>, AppError> {
    let Json(req) = body?;
    let current = combine(&req.current);
    let potential = combine(&req.potential);
    Ok(Json(CompareResponse {
        current_combined_rating: current,
        potential_combined_rating: potential,
        compensation: CompensationDelta::between(i64::from(current), i64::from(potential)),
    }))
}
