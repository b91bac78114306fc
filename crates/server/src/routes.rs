//! Route handlers and their wire types.

use crate::{ApiError, GENERATION_STATUS_HEADER};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use recipe::{GenerationRequest, RecipeSet};
use runtime::{Backend, Mode, RecipeAnalyzer};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Comma-separated ingredient list.
    pub ingredients: String,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
}

/// Body of a successful `POST /api/analyze`.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub recipes: RecipeSet,
    pub status: &'static str,
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    mode: Mode,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Smart Recipe Analyzer API",
        "version": VERSION,
        "docs": "/docs",
    }))
}

pub(crate) async fn health<B: Backend + 'static>(
    State(analyzer): State<Arc<RecipeAnalyzer<B>>>,
) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        mode: analyzer.mode(),
    })
}

/// A fixed response for exercising clients without calling a provider.
pub(crate) async fn example<B: Backend + 'static>(
    State(analyzer): State<Arc<RecipeAnalyzer<B>>>,
) -> Json<Value> {
    Json(json!({
        "recipes": example_recipes(),
        "status": "success",
        "mode": analyzer.mode(),
    }))
}

pub(crate) async fn analyze<B: Backend + 'static>(
    State(analyzer): State<Arc<RecipeAnalyzer<B>>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    let request =
        GenerationRequest::parse(&body.ingredients, body.dietary_restrictions.as_deref())?;

    tracing::info!(
        ingredients = %request.joined(),
        dietary = request.dietary_restrictions().unwrap_or("none"),
        "analyzing ingredients"
    );

    // Cancels the generation if the client goes away mid-request.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let result = analyzer.analyze(&request, &cancel).await;
    let mode = analyzer.mode().label_for(result.strategy);
    let status = HeaderValue::from_static(result.status.as_str());

    tracing::info!(
        recipes = result.recipes.len(),
        strategy = %result.strategy,
        status = %result.status,
        "analysis complete"
    );

    let response = RecipeResponse {
        recipes: result.recipes,
        status: "success",
        mode,
    };
    Ok(([(GENERATION_STATUS_HEADER, status)], Json(response)).into_response())
}

fn example_recipes() -> Value {
    json!([
        {
            "name": "Garlic Butter Pasta",
            "ingredients": ["pasta", "garlic", "butter", "parmesan cheese", "black pepper"],
            "instructions": [
                "Boil pasta according to package directions",
                "Mince garlic and saute in butter until fragrant",
                "Toss cooked pasta with garlic butter",
                "Add grated parmesan and black pepper to taste"
            ],
            "cookingTime": "20 minutes",
            "difficulty": "Easy",
            "nutrition": {"calories": 450, "protein": "12g", "carbs": "60g"}
        },
        {
            "name": "Simple Aglio e Olio",
            "ingredients": ["pasta", "garlic", "olive oil", "red pepper flakes", "parsley"],
            "instructions": [
                "Cook pasta until al dente",
                "Slice garlic and cook in olive oil",
                "Add red pepper flakes",
                "Toss pasta with garlic oil and parsley"
            ],
            "cookingTime": "15 minutes",
            "difficulty": "Easy",
            "nutrition": {"calories": 380, "protein": "10g", "carbs": "55g"}
        }
    ])
}
