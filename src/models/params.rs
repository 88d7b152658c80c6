//! Request parameters, parsed once at the HTTP boundary

use axum::http::Method;
use serde::Deserialize;
use utoipa::IntoParams;

/// Whether a request arrived on the form-submission method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Submit,
    Other,
}

impl From<&Method> for RequestMethod {
    fn from(method: &Method) -> Self {
        if *method == Method::POST {
            RequestMethod::Submit
        } else {
            RequestMethod::Other
        }
    }
}

/// `?id=` on show, edit and delete
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Fields posted by the create and edit forms. Missing fields are empty.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub id: Option<String>,
    pub title: String,
    pub author: String,
    #[serde(rename = "type")]
    pub book_type: String,
    pub description: String,
}

/// `?search=` on the HTML search page
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// `?q=` on the JSON search endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApiSearchQuery {
    /// Substring matched against title and author, case-insensitively
    pub q: Option<String>,
}
