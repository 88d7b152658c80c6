//! Book catalog actions.
//!
//! Each action checks its input, makes the repository calls it needs and
//! returns exactly one [`Outcome`] (or an error) for the view to render.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{parse_book_id, Book, BookForm, BookId, RequestMethod},
    repository::BookRepository,
};

use super::session::{Notice, NoticeKind, Session};

/// What the view should render for a finished action
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    List { books: Vec<Book>, notices: Vec<Notice> },
    Detail(Book),
    CreateForm,
    EditForm(Book),
    SearchResults { term: String, books: Vec<Book> },
    RedirectToList,
}

#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    // -----------------------------------------------------------------------
    // Queries shared by the HTML pages and the JSON API
    // -----------------------------------------------------------------------

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.find_all().await
    }

    pub async fn get_book(&self, id: BookId) -> AppResult<Book> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".into()))
    }

    /// Blank terms are rejected before the repository is consulted
    pub async fn search_books(&self, term: &str) -> AppResult<Vec<Book>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::InvalidInput("Search term is required".into()));
        }
        self.repository.search(term).await
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    // -----------------------------------------------------------------------
    // Page actions
    // -----------------------------------------------------------------------

    /// All books plus any notices left by the previous action
    pub async fn list(&self, session: &Session) -> AppResult<Outcome> {
        let books = self.list_books().await?;
        let notices = session.take_notices().await?;
        Ok(Outcome::List { books, notices })
    }

    pub async fn show(&self, raw_id: Option<&str>) -> AppResult<Outcome> {
        let id = parse_book_id(raw_id)?;
        Ok(Outcome::Detail(self.get_book(id).await?))
    }

    pub fn create_form(&self) -> Outcome {
        Outcome::CreateForm
    }

    pub async fn edit_form(&self, raw_id: Option<&str>) -> AppResult<Outcome> {
        let id = parse_book_id(raw_id)?;
        Ok(Outcome::EditForm(self.get_book(id).await?))
    }

    pub async fn create(
        &self,
        method: RequestMethod,
        form: &BookForm,
        session: &Session,
    ) -> AppResult<Outcome> {
        if method != RequestMethod::Submit {
            return Ok(Outcome::RedirectToList);
        }

        let mut book = Book::new();
        apply_form(&mut book, form)?;
        self.repository.create(&mut book).await?;

        tracing::info!(book_id = ?book.id(), "Created {}", book);
        leave_notice(session, NoticeKind::Create, "Book added successfully!").await;
        Ok(Outcome::RedirectToList)
    }

    pub async fn update(
        &self,
        method: RequestMethod,
        form: &BookForm,
        session: &Session,
    ) -> AppResult<Outcome> {
        if method != RequestMethod::Submit {
            return Ok(Outcome::RedirectToList);
        }

        let id = parse_book_id(form.id.as_deref())?;
        let mut book = self.get_book(id).await?;
        apply_form(&mut book, form)?;

        // The row can vanish between lookup and write
        if !self.repository.update(&mut book).await? {
            return Err(AppError::NotFound("Book not found".into()));
        }

        tracing::info!(book_id = id, "Updated {}", book);
        leave_notice(session, NoticeKind::Update, "Book updated successfully!").await;
        Ok(Outcome::RedirectToList)
    }

    pub async fn delete(&self, raw_id: Option<&str>, session: &Session) -> AppResult<Outcome> {
        let id = parse_book_id(raw_id)?;

        if !self.repository.exists(id).await? || !self.repository.delete(id).await? {
            return Err(AppError::NotFound("Book not found".into()));
        }

        tracing::info!(book_id = id, "Deleted book");
        leave_notice(session, NoticeKind::Delete, "Book deleted successfully!").await;
        Ok(Outcome::RedirectToList)
    }

    /// Blank terms send the visitor back to the listing
    pub async fn search(&self, raw_term: Option<&str>) -> AppResult<Outcome> {
        let term = raw_term.unwrap_or_default().trim();
        if term.is_empty() {
            return Ok(Outcome::RedirectToList);
        }

        let books = self.search_books(term).await?;
        Ok(Outcome::SearchResults {
            term: term.to_string(),
            books,
        })
    }
}

/// Store a notice after a change; failures are logged, never returned
async fn leave_notice(session: &Session, kind: NoticeKind, message: &str) {
    if let Err(e) = session.set_notice(kind, message).await {
        tracing::warn!(notice = kind.key(), "Failed to store notice: {}", e);
    }
}

/// Copy form fields onto a book through its validating setters
fn apply_form(book: &mut Book, form: &BookForm) -> AppResult<()> {
    book.set_title(&form.title)?;
    book.set_author(&form.author)?;
    book.set_type(&form.book_type)?;
    book.set_description(&form.description);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::BookType,
        repository::{InMemoryBooksRepository, MockBookRepository},
        services::session::{MemorySessionStore, SessionStore},
    };
    use async_trait::async_trait;

    /// Session store whose backend is unreachable
    struct DownStore;

    #[async_trait]
    impl SessionStore for DownStore {
        async fn get(&self, _: &str, _: &str) -> AppResult<Option<String>> {
            Err(AppError::Session("connection refused".into()))
        }

        async fn set_once(&self, _: &str, _: &str, _: &str) -> AppResult<()> {
            Err(AppError::Session("connection refused".into()))
        }

        async fn consume(&self, _: &str, _: &str) -> AppResult<Option<String>> {
            Err(AppError::Session("connection refused".into()))
        }
    }

    fn service() -> BookService {
        BookService::new(Arc::new(InMemoryBooksRepository::new()))
    }

    fn session() -> Session {
        Session::new("test-session", Arc::new(MemorySessionStore::new()))
    }

    fn form(title: &str, author: &str, book_type: &str) -> BookForm {
        BookForm {
            id: None,
            title: title.to_string(),
            author: author.to_string(),
            book_type: book_type.to_string(),
            description: "  A description  ".to_string(),
        }
    }

    async fn create(service: &BookService, session: &Session, f: &BookForm) -> Book {
        let outcome = service.create(RequestMethod::Submit, f, session).await.unwrap();
        assert_eq!(outcome, Outcome::RedirectToList);
        service.list_books().await.unwrap().remove(0)
    }

    #[tokio::test]
    async fn test_create_sets_notice_shown_once() {
        let service = service();
        let session = session();
        let book = create(&service, &session, &form("Dune", "Herbert", "Fantasy")).await;
        assert_eq!(book.description(), "A description");

        let Outcome::List { books, notices } = service.list(&session).await.unwrap() else {
            panic!("expected list");
        };
        assert_eq!(books.len(), 1);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Create);
        assert_eq!(notices[0].message, "Book added successfully!");

        let Outcome::List { notices, .. } = service.list(&session).await.unwrap() else {
            panic!("expected list");
        };
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_create_without_submission_is_noop() {
        let service = service();
        let session = session();
        let outcome = service
            .create(RequestMethod::Other, &form("Dune", "Herbert", "Fantasy"), &session)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::RedirectToList);
        assert!(service.list_books().await.unwrap().is_empty());
        assert!(session.take_notices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_invalid_type_writes_nothing() {
        let service = service();
        let session = session();
        let result = service
            .create(RequestMethod::Submit, &form("Dune", "Herbert", "Romance"), &session)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(service.list_books().await.unwrap().is_empty());
        assert!(session.take_notices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_show_requires_numeric_id() {
        let service = service();
        for raw in [None, Some("abc"), Some("0"), Some("-1")] {
            assert!(matches!(service.show(raw).await, Err(AppError::InvalidInput(_))));
            assert!(matches!(service.edit_form(raw).await, Err(AppError::InvalidInput(_))));
        }
        assert!(matches!(service.show(Some("12")).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_show_and_edit_form() {
        let service = service();
        let book = create(&service, &session(), &form("IT", "King", "Horror")).await;
        let id = book.id().unwrap().to_string();

        assert_eq!(service.show(Some(&id)).await.unwrap(), Outcome::Detail(book.clone()));
        assert_eq!(service.edit_form(Some(&id)).await.unwrap(), Outcome::EditForm(book));
    }

    #[tokio::test]
    async fn test_update_applies_fields() {
        let service = service();
        let session = session();
        let book = create(&service, &session, &form("IT", "King", "Horror")).await;
        session.take_notices().await.unwrap();

        let mut edit = form("It", "Stephen King", "Crime");
        edit.id = book.id().map(|id| id.to_string());
        let outcome = service.update(RequestMethod::Submit, &edit, &session).await.unwrap();
        assert_eq!(outcome, Outcome::RedirectToList);

        let stored = service.get_book(book.id().unwrap()).await.unwrap();
        assert_eq!(stored.title(), "It");
        assert_eq!(stored.author(), "Stephen King");
        assert_eq!(stored.book_type(), Some(BookType::Crime));
        assert_eq!(stored.created_at(), book.created_at());

        let notices = session.take_notices().await.unwrap();
        assert_eq!(notices[0].kind, NoticeKind::Update);
    }

    #[tokio::test]
    async fn test_update_distinguishes_bad_id_from_missing_book() {
        let service = service();
        let session = session();

        let mut edit = form("IT", "King", "Horror");
        edit.id = Some("x".into());
        assert!(matches!(
            service.update(RequestMethod::Submit, &edit, &session).await,
            Err(AppError::InvalidInput(_))
        ));

        edit.id = Some("404".into());
        assert!(matches!(
            service.update(RequestMethod::Submit, &edit, &session).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_without_submission_is_noop() {
        let service = service();
        let session = session();
        let book = create(&service, &session, &form("IT", "King", "Horror")).await;

        let mut edit = form("Changed", "King", "Horror");
        edit.id = book.id().map(|id| id.to_string());
        let outcome = service.update(RequestMethod::Other, &edit, &session).await.unwrap();

        assert_eq!(outcome, Outcome::RedirectToList);
        assert_eq!(service.get_book(book.id().unwrap()).await.unwrap().title(), "IT");
    }

    #[tokio::test]
    async fn test_update_invalid_field_keeps_stored_row() {
        let service = service();
        let session = session();
        let book = create(&service, &session, &form("IT", "King", "Horror")).await;

        let mut edit = form("", "King", "Horror");
        edit.id = book.id().map(|id| id.to_string());
        assert!(matches!(
            service.update(RequestMethod::Submit, &edit, &session).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(service.get_book(book.id().unwrap()).await.unwrap(), book);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let service = service();
        let session = session();
        let book = create(&service, &session, &form("IT", "King", "Horror")).await;
        session.take_notices().await.unwrap();
        let id = book.id().unwrap().to_string();

        assert_eq!(
            service.delete(Some(&id), &session).await.unwrap(),
            Outcome::RedirectToList
        );
        assert_eq!(session.take_notices().await.unwrap()[0].kind, NoticeKind::Delete);

        assert!(matches!(
            service.delete(Some(&id), &session).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(Some("nope"), &session).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_search() {
        let service = service();
        let session = session();
        create(&service, &session, &form("Dune", "Herbert", "Fantasy")).await;
        let it = create(&service, &session, &form("IT", "King", "Horror")).await;

        let outcome = service.search(Some("  king ")).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::SearchResults {
                term: "king".into(),
                books: vec![it],
            }
        );
    }

    #[tokio::test]
    async fn test_blank_search_never_reaches_repository() {
        // No expectations: any repository call panics
        let service = BookService::new(Arc::new(MockBookRepository::new()));

        for raw in [None, Some(""), Some("   ")] {
            assert_eq!(service.search(raw).await.unwrap(), Outcome::RedirectToList);
        }
        assert!(matches!(service.search_books(" ").await, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_bad_id_never_reaches_repository() {
        let service = BookService::new(Arc::new(MockBookRepository::new()));
        let session = session();

        assert!(service.show(Some("abc")).await.is_err());
        assert!(service.delete(None, &session).await.is_err());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut repo = MockBookRepository::new();
        repo.expect_find_all()
            .returning(|| Err(AppError::Storage(sqlx::Error::PoolTimedOut)));
        repo.expect_create()
            .returning(|_| Err(AppError::Storage(sqlx::Error::PoolTimedOut)));
        let service = BookService::new(Arc::new(repo));
        let session = session();

        assert!(matches!(service.list(&session).await, Err(AppError::Storage(_))));
        assert!(matches!(
            service
                .create(RequestMethod::Submit, &form("Dune", "Herbert", "Fantasy"), &session)
                .await,
            Err(AppError::Storage(_))
        ));
        assert!(session.take_notices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lost_notice_does_not_fail_stored_change() {
        let service = service();
        let session = Session::new("down", Arc::new(DownStore));

        let outcome = service
            .create(RequestMethod::Submit, &form("Dune", "Herbert", "Fantasy"), &session)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::RedirectToList);

        let books = service.list_books().await.unwrap();
        assert_eq!(books.len(), 1);
        let id = books[0].id().unwrap().to_string();

        let mut edit = form("Dune Messiah", "Herbert", "Fantasy");
        edit.id = Some(id.clone());
        assert_eq!(
            service.update(RequestMethod::Submit, &edit, &session).await.unwrap(),
            Outcome::RedirectToList
        );
        assert_eq!(service.list_books().await.unwrap()[0].title(), "Dune Messiah");

        assert_eq!(
            service.delete(Some(&id), &session).await.unwrap(),
            Outcome::RedirectToList
        );
        assert!(service.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_race_reports_not_found() {
        let mut repo = MockBookRepository::new();
        repo.expect_exists().returning(|_| Ok(true));
        repo.expect_delete().returning(|_| Ok(false));
        let service = BookService::new(Arc::new(repo));

        assert!(matches!(
            service.delete(Some("3"), &session()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
