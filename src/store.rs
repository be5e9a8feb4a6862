//! Data access for books and pages.
//!
//! Every statement is parameterized. Updates and deletes against an id that
//! does not exist affect zero rows and still succeed. Each call holds the
//! connection lock for its whole duration.

use anyhow::Result;
use libsql::Connection;

use crate::db::Database;
use crate::model::{Book, BookInput, Page, PageInput};

pub struct Library<'a> {
    db: &'a Database,
}

impl<'a> Library<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn conn(&self) -> &Connection {
        self.db.connection()
    }

    // ========================================================================
    // Books
    // ========================================================================

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        let _guard = self.db.lock_conn().await;
        let mut rows = self.conn().query("SELECT id, name FROM books", ()).await?;

        let mut books = Vec::new();
        while let Some(row) = rows.next().await? {
            books.push(Book {
                id: row.get(0)?,
                name: row.get(1)?,
            });
        }
        Ok(books)
    }

    pub async fn create_book(&self, input: BookInput) -> Result<Book> {
        let _guard = self.db.lock_conn().await;
        let mut rows = self
            .conn()
            .query(
                "INSERT INTO books (name) VALUES (?) RETURNING id",
                libsql::params![input.name.as_str()],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(input.with_id(row.get(0)?))
        } else {
            anyhow::bail!("Failed to create book")
        }
    }

    pub async fn update_book(&self, id: i64, input: BookInput) -> Result<Book> {
        let _guard = self.db.lock_conn().await;
        let affected = self
            .conn()
            .execute(
                "UPDATE books SET name = ? WHERE id = ?",
                libsql::params![input.name.as_str(), id],
            )
            .await?;

        if affected == 0 {
            tracing::debug!("update of book {} matched no rows", id);
        }
        Ok(input.with_id(id))
    }

    /// Deletes the book's pages and then the book, atomically.
    pub async fn delete_book(&self, id: i64) -> Result<()> {
        let _guard = self.db.lock_conn().await;

        self.conn().execute("BEGIN TRANSACTION", ()).await?;

        let result = async {
            let pages = self
                .conn()
                .execute("DELETE FROM pages WHERE book_id = ?", libsql::params![id])
                .await?;
            self.conn()
                .execute("DELETE FROM books WHERE id = ?", libsql::params![id])
                .await?;
            Ok::<u64, anyhow::Error>(pages)
        }
        .await;

        match result {
            Ok(pages) => match self.conn().execute("COMMIT", ()).await {
                Ok(_) => {
                    tracing::debug!("deleted book {} with {} pages", id, pages);
                    Ok(())
                }
                Err(e) => {
                    let _ = self.conn().execute("ROLLBACK", ()).await;
                    Err(e.into())
                }
            },
            Err(e) => {
                let _ = self.conn().execute("ROLLBACK", ()).await;
                Err(e)
            }
        }
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// Pages ordered by `number`, then `id`; optionally only those of one book.
    pub async fn list_pages(&self, book_id: Option<i64>) -> Result<Vec<Page>> {
        let _guard = self.db.lock_conn().await;
        let mut rows = match book_id {
            Some(book_id) => {
                let query = r#"
                    SELECT id, book_id, name, number, content
                    FROM pages
                    WHERE book_id = ?
                    ORDER BY number ASC, id ASC
                "#;
                self.conn().query(query, libsql::params![book_id]).await?
            }
            None => {
                let query = r#"
                    SELECT id, book_id, name, number, content
                    FROM pages
                    ORDER BY number ASC, id ASC
                "#;
                self.conn().query(query, ()).await?
            }
        };

        let mut pages = Vec::new();
        while let Some(row) = rows.next().await? {
            pages.push(Self::row_to_page(&row)?);
        }
        Ok(pages)
    }

    pub async fn create_page(&self, input: PageInput) -> Result<Page> {
        let _guard = self.db.lock_conn().await;
        let query = r#"
            INSERT INTO pages (book_id, name, number, content)
            VALUES (?, ?, ?, ?)
            RETURNING id
        "#;

        let mut rows = self
            .conn()
            .query(
                query,
                libsql::params![
                    input.book_id,
                    input.name.as_str(),
                    input.number,
                    input.content.as_str()
                ],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(input.with_id(row.get(0)?))
        } else {
            anyhow::bail!("Failed to create page")
        }
    }

    pub async fn update_page(&self, id: i64, input: PageInput) -> Result<Page> {
        let _guard = self.db.lock_conn().await;
        let query = r#"
            UPDATE pages
            SET book_id = ?, name = ?, number = ?, content = ?
            WHERE id = ?
        "#;

        let affected = self
            .conn()
            .execute(
                query,
                libsql::params![
                    input.book_id,
                    input.name.as_str(),
                    input.number,
                    input.content.as_str(),
                    id
                ],
            )
            .await?;

        if affected == 0 {
            tracing::debug!("update of page {} matched no rows", id);
        }
        Ok(input.with_id(id))
    }

    pub async fn delete_page(&self, id: i64) -> Result<()> {
        let _guard = self.db.lock_conn().await;
        self.conn()
            .execute("DELETE FROM pages WHERE id = ?", libsql::params![id])
            .await?;
        Ok(())
    }

    fn row_to_page(row: &libsql::Row) -> Result<Page> {
        Ok(Page {
            id: row.get(0)?,
            book_id: row.get(1)?,
            name: row.get::<Option<String>>(2)?.unwrap_or_default(),
            number: row.get::<Option<i64>>(3)?.unwrap_or(0),
            content: row.get(4)?,
        })
    }
}
