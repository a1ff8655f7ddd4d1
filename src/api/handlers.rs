use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::models::{ApiJson, ApiPath, HealthResponse, MessageResponse, SuggestionErrorBody};
use super::server::AppState;
use crate::{
    categories::CategoryManager,
    contexts::ContextManager,
    db::models::{
        CategoryPatch, ContextEntryPatch, NewCategory, NewContextEntry, NewTask, TaskPatch,
    },
    error::TodoError,
    suggestions::{self, AnalyzeError},
    tasks::TaskManager,
};

type ApiResult<T> = std::result::Result<T, TodoError>;

// ---- tasks ----

/// All tasks, newest first
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let tasks = TaskManager::new(&state.db_pool).list_task_details().await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let task = TaskManager::new(&state.db_pool).get_task_detail(id).await?;
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewTask>,
) -> ApiResult<impl IntoResponse> {
    let task_mgr = TaskManager::new(&state.db_pool);
    let task = task_mgr.add_task(req).await?;
    let detail = task_mgr.with_category(task).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT: every writable field is replaced; omitted fields fall back to defaults
pub async fn replace_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<NewTask>,
) -> ApiResult<impl IntoResponse> {
    let task_mgr = TaskManager::new(&state.db_pool);
    let task = task_mgr.replace_task(id, req).await?;
    Ok(Json(task_mgr.with_category(task).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<TaskPatch>,
) -> ApiResult<impl IntoResponse> {
    let task_mgr = TaskManager::new(&state.db_pool);
    let task = task_mgr.update_task(id, req).await?;
    Ok(Json(task_mgr.with_category(task).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    TaskManager::new(&state.db_pool).delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- categories ----

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let categories = CategoryManager::new(&state.db_pool).list_categories().await?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let category = CategoryManager::new(&state.db_pool).get_category(id).await?;
    Ok(Json(category))
}

pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewCategory>,
) -> ApiResult<impl IntoResponse> {
    let category = CategoryManager::new(&state.db_pool).add_category(req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn replace_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<NewCategory>,
) -> ApiResult<impl IntoResponse> {
    let category = CategoryManager::new(&state.db_pool)
        .replace_category(id, req)
        .await?;
    Ok(Json(category))
}

pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<CategoryPatch>,
) -> ApiResult<impl IntoResponse> {
    let category = CategoryManager::new(&state.db_pool)
        .update_category(id, req)
        .await?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    CategoryManager::new(&state.db_pool).delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- context entries ----

pub async fn list_contexts(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let entries = ContextManager::new(&state.db_pool).list_entries().await?;
    Ok(Json(entries))
}

pub async fn get_context(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let entry = ContextManager::new(&state.db_pool).get_entry(id).await?;
    Ok(Json(entry))
}

pub async fn create_context(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewContextEntry>,
) -> ApiResult<impl IntoResponse> {
    let entry = ContextManager::new(&state.db_pool).add_entry(req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn replace_context(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<NewContextEntry>,
) -> ApiResult<impl IntoResponse> {
    let entry = ContextManager::new(&state.db_pool)
        .replace_entry(id, req)
        .await?;
    Ok(Json(entry))
}

pub async fn update_context(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<ContextEntryPatch>,
) -> ApiResult<impl IntoResponse> {
    let entry = ContextManager::new(&state.db_pool)
        .update_entry(id, req)
        .await?;
    Ok(Json(entry))
}

pub async fn delete_context(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    ContextManager::new(&state.db_pool).delete_entry(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- suggestions ----

/// Run the suggestion pipeline over every stored task and context entry.
/// The request body is ignored.
pub async fn ai_suggestions(State(state): State<AppState>) -> impl IntoResponse {
    match suggestions::analyze(state.store.as_ref(), &state.fetcher).await {
        Ok(suggestions) => (StatusCode::OK, Json(suggestions)).into_response(),
        Err(AnalyzeError::NoTasks) => (
            StatusCode::NOT_FOUND,
            Json(MessageResponse {
                message: AnalyzeError::NoTasks.to_string(),
            }),
        )
            .into_response(),
        Err(AnalyzeError::Suggestion(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SuggestionErrorBody::from(&e)),
        )
            .into_response(),
        Err(AnalyzeError::Store(e)) => {
            tracing::error!("Failed to read records for suggestions: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "code": e.to_error_code(),
                })),
            )
                .into_response()
        },
    }
}

// ---- misc ----

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "smart-todo".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        llm_configured: state.fetcher.is_configured(),
    })
}

pub async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not found",
            "code": "NOT_FOUND"
        })),
    )
}
