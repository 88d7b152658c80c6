//! HTML page handlers
//!
//! Each handler builds its parameter struct from the request, opens the
//! session and renders whatever the catalog action returns.

use axum::{
    extract::State,
    http::Method,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::extract::{Form, Query};
use crate::{
    error::AppResult,
    models::{BookForm, IdQuery, RequestMethod, SearchQuery},
    services::books::Outcome,
    view::BookView,
    AppState,
};

/// Render an action result, keeping the session cookie on the response
fn respond(jar: CookieJar, result: AppResult<Outcome>) -> Response {
    match result {
        Ok(outcome) => (jar, BookView::render(outcome)).into_response(),
        Err(err) => (jar, err).into_response(),
    }
}

pub async fn list_books(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, session) = state.services.sessions.open(jar);
    let result = state.services.books.list(&session).await;
    respond(jar, result)
}

pub async fn show_book(State(state): State<AppState>, Query(query): Query<IdQuery>) -> Response {
    match state.services.books.show(query.id.as_deref()).await {
        Ok(outcome) => BookView::render(outcome),
        Err(err) => err.into_response(),
    }
}

pub async fn create_form(State(state): State<AppState>) -> Response {
    BookView::render(state.services.books.create_form())
}

pub async fn create_book(
    State(state): State<AppState>,
    method: Method,
    jar: CookieJar,
    Form(form): Form<BookForm>,
) -> Response {
    let (jar, session) = state.services.sessions.open(jar);
    let result = state
        .services
        .books
        .create(RequestMethod::from(&method), &form, &session)
        .await;
    respond(jar, result)
}

pub async fn edit_form(State(state): State<AppState>, Query(query): Query<IdQuery>) -> Response {
    match state.services.books.edit_form(query.id.as_deref()).await {
        Ok(outcome) => BookView::render(outcome),
        Err(err) => err.into_response(),
    }
}

/// On GET the fields come from the query string and the action is a no-op
pub async fn update_book(
    State(state): State<AppState>,
    method: Method,
    jar: CookieJar,
    Form(form): Form<BookForm>,
) -> Response {
    let (jar, session) = state.services.sessions.open(jar);
    let result = state
        .services
        .books
        .update(RequestMethod::from(&method), &form, &session)
        .await;
    respond(jar, result)
}

pub async fn delete_book(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<IdQuery>,
) -> Response {
    let (jar, session) = state.services.sessions.open(jar);
    let result = state.services.books.delete(query.id.as_deref(), &session).await;
    respond(jar, result)
}

pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    match state.services.books.search(query.search.as_deref()).await {
        Ok(outcome) => BookView::render(outcome),
        Err(err) => err.into_response(),
    }
}
