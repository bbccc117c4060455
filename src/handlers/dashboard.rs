// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    // Importamos os models para referenciar no Swagger
    models::{
        dashboard::DashboardView,
        inventory::{FilterOptions, FilterSelection},
    },
};

// GET /api/dashboard/filters
#[utoipa::path(
    get,
    path = "/api/dashboard/filters",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Tecidos e cores disponíveis na planilha completa", body = FilterOptions),
        (status = 422, description = "Planilha com coluna ausente ou valor inválido"),
        (status = 503, description = "Planilha indisponível")
    ),
    params(
        ("accept-language" = Option<String>, Header, description = "Idioma das mensagens de erro (pt, en)")
    )
)]
pub async fn get_filters(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let options = app_state
        .dashboard_service
        .get_filter_options()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(options)))
}

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Painel com a seleção padrão", body = DashboardView),
        (status = 422, description = "Planilha com coluna ausente ou valor inválido"),
        (status = 503, description = "Planilha indisponível")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .dashboard_service
        .get_dashboard(&FilterSelection::default())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// POST /api/dashboard
// Cada mudança de filtro no painel gera um novo render completo.
#[utoipa::path(
    post,
    path = "/api/dashboard",
    tag = "Dashboard",
    request_body = FilterSelection,
    responses(
        (status = 200, description = "Painel filtrado (seleção vazia gera painel vazio)", body = DashboardView),
        (status = 422, description = "Planilha com coluna ausente ou valor inválido"),
        (status = 503, description = "Planilha indisponível")
    )
)]
pub async fn filter_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(selection): Json<FilterSelection>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .dashboard_service
        .get_dashboard(&selection)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}
