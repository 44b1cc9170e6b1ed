use crate::edit::EditError;
use crate::errors::AppError;
use crate::models::{ConsoleSnapshot, CreateLinkForm, EditLinkForm, Link, StartEditForm, WeeklyChart};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let service = state.service.as_ref();
    let mut console = state.console.lock().await;
    console.refresh_links(service).await;
    console.refresh_stats(service).await;
    let notice = console.take_notice();
    Html(render_index(&console, notice.as_ref(), &state.short_link_base))
}

pub async fn create_link(
    State(state): State<AppState>,
    Form(form): Form<CreateLinkForm>,
) -> Redirect {
    let mut console = state.console.lock().await;
    // Failures are kept as a notice for the next render.
    let _ = console
        .create_link(state.service.as_ref(), &form.long_url, &form.custom_short_code)
        .await;
    Redirect::to("/")
}

pub async fn start_edit(
    State(state): State<AppState>,
    Form(form): Form<StartEditForm>,
) -> Result<Redirect, AppError> {
    let mut console = state.console.lock().await;
    if !console.start_edit(&form.short_code) {
        return Err(AppError::not_found(format!(
            "no link with short code {}",
            form.short_code
        )));
    }
    Ok(Redirect::to("/"))
}

pub async fn save_edit(
    State(state): State<AppState>,
    Form(form): Form<EditLinkForm>,
) -> Result<Redirect, AppError> {
    let mut console = state.console.lock().await;
    match console.save_edit(state.service.as_ref(), &form.long_url).await {
        Ok(_) | Err(EditError::Service(_)) => Ok(Redirect::to("/")),
        Err(err @ EditError::NoActiveSession) => Err(AppError::conflict(err.to_string())),
    }
}

pub async fn cancel_edit(State(state): State<AppState>) -> Redirect {
    state.console.lock().await.cancel_edit();
    Redirect::to("/")
}

pub async fn get_links(State(state): State<AppState>) -> Json<Vec<Link>> {
    let mut console = state.console.lock().await;
    console.refresh_links(state.service.as_ref()).await;
    Json(console.directory().links().to_vec())
}

pub async fn get_chart(State(state): State<AppState>) -> Json<WeeklyChart> {
    let mut console = state.console.lock().await;
    console.refresh_stats(state.service.as_ref()).await;
    Json(console.chart().clone())
}

pub async fn get_console(State(state): State<AppState>) -> Json<ConsoleSnapshot> {
    Json(state.console.lock().await.snapshot())
}

pub async fn health() -> &'static str {
    "ok"
}
