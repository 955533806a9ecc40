use crate::errors::AppError;
use crate::models::{
    DashboardView, RangeAggregate, RangeSelection, Scope, SelectRequest, SelectResponse,
    SelectionQuery, SummaryQuery, YearSummary,
};
use crate::state::AppState;
use crate::stats::aggregate;
use crate::summary::year_summary;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::Datelike;
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Html<String>, AppError> {
    let shown = state.dashboard.current().await;
    if query.device.is_none() && query.scope.is_none() {
        if let Some(view) = &shown {
            return Ok(Html(render_index(view)));
        }
    }

    let (device, scope) = match &shown {
        Some(view) => (
            query.device.unwrap_or_else(|| view.selection.device_id.clone()),
            query.scope.unwrap_or_else(|| view.selection.scope.to_string()),
        ),
        None => (
            query.device.unwrap_or_else(|| state.default_device.clone()),
            query.scope.unwrap_or_else(|| Scope::Day.to_string()),
        ),
    };
    let selection = parse_selection(&device, &scope)?;
    let response = apply_selection(&state, selection.clone()).await;

    let view = match state.dashboard.current().await {
        Some(view) => view,
        None => DashboardView {
            token: response.token,
            selection,
            aggregate: response.aggregate,
        },
    };
    Ok(Html(render_index(&view)))
}

pub async fn get_aggregate(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<RangeAggregate>, AppError> {
    let device = query.device.unwrap_or_else(|| state.default_device.clone());
    let scope = query.scope.unwrap_or_else(|| Scope::Day.to_string());
    let selection = parse_selection(&device, &scope)?;

    Ok(Json(
        aggregate(state.loader.as_ref(), &selection, state.today(), state.fallback).await,
    ))
}

pub async fn select(
    State(state): State<AppState>,
    Json(payload): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, AppError> {
    let selection = parse_selection(&payload.device, &payload.scope)?;
    Ok(Json(apply_selection(&state, selection).await))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<Option<DashboardView>> {
    Json(state.dashboard.current().await)
}

pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<YearSummary>, AppError> {
    let device = query.device.unwrap_or_else(|| state.default_device.clone());
    validate_device(&device)?;
    let year = query.year.unwrap_or_else(|| state.today().year());
    if !(1970..=9999).contains(&year) {
        return Err(AppError::bad_request("year out of range"));
    }

    Ok(Json(year_summary(state.loader.as_ref(), device.trim(), year).await))
}

async fn apply_selection(state: &AppState, selection: RangeSelection) -> SelectResponse {
    let token = state.dashboard.begin();
    info!(
        "selection #{token}: {} / {}",
        selection.device_id, selection.scope
    );

    let aggregate = aggregate(state.loader.as_ref(), &selection, state.today(), state.fallback).await;
    let applied = state
        .dashboard
        .publish(token, selection, aggregate.clone())
        .await;

    SelectResponse {
        token,
        applied,
        aggregate,
    }
}

fn parse_selection(device: &str, scope: &str) -> Result<RangeSelection, AppError> {
    validate_device(device)?;
    let scope = scope.parse::<Scope>().map_err(AppError::bad_request)?;
    Ok(RangeSelection {
        scope,
        device_id: device.trim().to_string(),
    })
}

/// Device ids become path segments, so only a plain name is accepted.
fn validate_device(device: &str) -> Result<(), AppError> {
    let device = device.trim();
    if device.is_empty() || device.len() > 64 {
        return Err(AppError::bad_request("device must be 1-64 characters"));
    }
    if !device
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "device may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}
