//! HTML rendering of action outcomes

use std::fmt::Write;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    models::{Book, BookType},
    services::{
        books::Outcome,
        session::{Notice, NoticeKind},
    },
};

pub const LIST_PATH: &str = "/books";

pub struct BookView;

impl BookView {
    /// One response per outcome
    pub fn render(outcome: Outcome) -> Response {
        match outcome {
            Outcome::List { books, notices } => Html(book_list(&books, &notices)).into_response(),
            Outcome::Detail(book) => Html(book_details(&book)).into_response(),
            Outcome::CreateForm => Html(page("Add New Book", &book_form(None))).into_response(),
            Outcome::EditForm(book) => {
                Html(page("Edit Book", &book_form(Some(&book)))).into_response()
            }
            Outcome::SearchResults { term, books } => {
                Html(search_results(&term, &books)).into_response()
            }
            Outcome::RedirectToList => Redirect::to(LIST_PATH).into_response(),
        }
    }

    pub fn error(status: StatusCode, message: &str) -> Response {
        let body = format!(
            r#"<div class="alert alert-danger"><h4 class="alert-heading">Error</h4><p>{}</p></div>
<a href="{LIST_PATH}" class="btn btn-primary">Back to Home</a>"#,
            escape(message)
        );
        (status, Html(page("Error", &body))).into_response()
    }
}

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} - Book Catalog</title>
<link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
</head>
<body>
<nav class="navbar navbar-dark bg-dark mb-4"><div class="container"><a class="navbar-brand" href="{LIST_PATH}">Book Catalog</a></div></nav>
<main class="container">
<h1 class="mb-4">{title}</h1>
{body}
</main>
<script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js"></script>
</body>
</html>"#,
        title = escape(title),
    )
}

fn type_label(book: &Book) -> &'static str {
    book.book_type().map(|t| t.as_str()).unwrap_or("")
}

fn id_of(book: &Book) -> String {
    book.id().map(|id| id.to_string()).unwrap_or_default()
}

fn notices_html(notices: &[Notice]) -> String {
    let mut out = String::new();
    for notice in notices {
        let class = match notice.kind {
            NoticeKind::Delete => "alert-warning",
            NoticeKind::Create | NoticeKind::Update => "alert-success",
        };
        let _ = write!(
            out,
            r#"<div class="alert {class} alert-dismissible fade show" role="alert">{}<button type="button" class="btn-close" data-bs-dismiss="alert"></button></div>"#,
            escape(&notice.message)
        );
    }
    out
}

fn search_form(term: &str) -> String {
    format!(
        r#"<form action="/books/search" method="get" class="d-flex mb-4">
<input type="text" class="form-control me-2" name="search" placeholder="Search by title or author" value="{}">
<button class="btn btn-outline-primary" type="submit">Search</button>
</form>"#,
        escape(term)
    )
}

fn book_rows(books: &[Book], with_delete: bool) -> String {
    let mut rows = String::new();
    for book in books {
        let id = id_of(book);
        let created = book
            .created_at()
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let delete = if with_delete {
            format!(
                r#" <a href="/books/delete?id={id}" class="btn btn-danger btn-sm" onclick="return confirm('Delete this book?')">Delete</a>"#
            )
        } else {
            String::new()
        };
        let _ = write!(
            rows,
            r#"<tr><td>{}</td><td>{}</td><td><span class="badge bg-secondary">{}</span></td><td>{created}</td>
<td><a href="/books/view?id={id}" class="btn btn-info btn-sm">View</a> <a href="/books/edit?id={id}" class="btn btn-warning btn-sm">Edit</a>{delete}</td></tr>"#,
            escape(book.title()),
            escape(book.author()),
            type_label(book),
        );
    }
    rows
}

fn book_table(books: &[Book], with_delete: bool) -> String {
    format!(
        r#"<table class="table table-striped">
<thead><tr><th>Title</th><th>Author</th><th>Type</th><th>Added</th><th>Actions</th></tr></thead>
<tbody>{}</tbody>
</table>"#,
        book_rows(books, with_delete)
    )
}

fn book_list(books: &[Book], notices: &[Notice]) -> String {
    let mut body = notices_html(notices);
    body.push_str(r#"<a href="/books/create" class="btn btn-primary mb-3">Add New Book</a>"#);
    body.push_str(&search_form(""));
    if books.is_empty() {
        body.push_str(r#"<div class="alert alert-info">No books found. Add your first book!</div>"#);
    } else {
        body.push_str(&book_table(books, true));
    }
    page("Book Catalog", &body)
}

fn book_details(book: &Book) -> String {
    let fmt_ts = |ts: Option<chrono::DateTime<chrono::Utc>>| {
        ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default()
    };
    let description = if book.description().is_empty() {
        "<em>No description</em>".to_string()
    } else {
        escape(book.description())
    };
    let body = format!(
        r#"<div class="mb-3"><a href="{LIST_PATH}" class="btn btn-primary">Back to List</a> <a href="/books/edit?id={id}" class="btn btn-warning">Edit</a></div>
<div class="card"><div class="card-body">
<h2 class="card-title">{title}</h2>
<h6 class="card-subtitle mb-2 text-muted">by {author}</h6>
<p><span class="badge bg-secondary">{book_type}</span></p>
<p class="card-text">{description}</p>
<p class="text-muted small">Created: {created}<br>Updated: {updated}</p>
</div></div>"#,
        id = id_of(book),
        title = escape(book.title()),
        author = escape(book.author()),
        book_type = type_label(book),
        created = fmt_ts(book.created_at()),
        updated = fmt_ts(book.updated_at()),
    );
    page("Book Details", &body)
}

fn book_form(book: Option<&Book>) -> String {
    let (action, hidden_id, submit) = match book {
        Some(b) => (
            "/books/update",
            format!(r#"<input type="hidden" name="id" value="{}">"#, id_of(b)),
            "Update Book",
        ),
        None => ("/books/create", String::new(), "Add Book"),
    };
    let title = book.map(|b| escape(b.title())).unwrap_or_default();
    let author = book.map(|b| escape(b.author())).unwrap_or_default();
    let description = book.map(|b| escape(b.description())).unwrap_or_default();
    let current = book.and_then(Book::book_type);

    let mut options = String::from(r#"<option value="">Select a type</option>"#);
    for t in BookType::ALL {
        let selected = if current == Some(t) { " selected" } else { "" };
        let _ = write!(options, r#"<option value="{t}"{selected}>{t}</option>"#);
    }

    format!(
        r#"<div class="mb-3"><a href="{LIST_PATH}" class="btn btn-primary">Back to List</a></div>
<form action="{action}" method="post">
{hidden_id}
<div class="mb-3"><label for="title" class="form-label">Title *</label>
<input type="text" class="form-control" id="title" name="title" value="{title}" maxlength="255" required></div>
<div class="mb-3"><label for="author" class="form-label">Author *</label>
<input type="text" class="form-control" id="author" name="author" value="{author}" maxlength="255" required></div>
<div class="mb-3"><label for="type" class="form-label">Type *</label>
<select class="form-select" id="type" name="type" required>{options}</select></div>
<div class="mb-3"><label for="description" class="form-label">Description</label>
<textarea class="form-control" id="description" name="description" rows="4">{description}</textarea></div>
<a href="{LIST_PATH}" class="btn btn-secondary">Cancel</a>
<button type="submit" class="btn btn-success">{submit}</button>
</form>"#
    )
}

fn search_results(term: &str, books: &[Book]) -> String {
    let mut body = format!(
        r#"<div class="mb-3"><a href="{LIST_PATH}" class="btn btn-primary">Back to List</a></div>{}"#,
        search_form(term)
    );
    let _ = write!(
        body,
        r#"<div class="alert alert-info">Found {} book(s) matching "{}"</div>"#,
        books.len(),
        escape(term)
    );
    if !books.is_empty() {
        body.push_str(&book_table(books, false));
    }
    page("Search Results", &body)
}
