//! Books repository for database operations.
//!
//! A book and its genre links are written in one transaction so a book is
//! never observed with a partial genre list.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookData, BookSummary},
};

const SELECT_BOOK: &str = r#"
    SELECT b.id, b.title, b.author_id, b.summary, b.isbn,
           COALESCE(
               ARRAY_AGG(bg.genre_id ORDER BY bg.position) FILTER (WHERE bg.genre_id IS NOT NULL),
               '{}'
           ) AS genre_ids
    FROM books b
    LEFT JOIN book_genres bg ON bg.book_id = b.id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: Uuid) -> AppResult<Option<Book>> {
        let query = format!("{} WHERE b.id = $1 GROUP BY b.id", SELECT_BOOK);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Replace the genre links of a book
    async fn sync_book_genres(
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
        genre_ids: &[Uuid],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        for (idx, genre_id) in genre_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO book_genres (book_id, genre_id, position)
                VALUES ($1, $2, $3)
                ON CONFLICT (book_id, genre_id) DO UPDATE SET position = $3
                "#,
            )
            .bind(book_id)
            .bind(genre_id)
            .bind(idx as i32)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

fn require_author(data: &BookData) -> AppResult<Uuid> {
    data.author
        .ok_or_else(|| AppError::Validation("Book author is required".to_string()))
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let query = format!("{} GROUP BY b.id ORDER BY b.title", SELECT_BOOK);
        let rows = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Book>> {
        self.fetch(id).await
    }

    async fn by_author(&self, author_id: Uuid) -> AppResult<Vec<BookSummary>> {
        let rows = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, summary FROM books WHERE author_id = $1 ORDER BY title",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_genre(&self, genre_id: Uuid) -> AppResult<Vec<BookSummary>> {
        let rows = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title, b.summary
            FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, data: &BookData) -> AppResult<Book> {
        let author_id = require_author(data)?;
        let id = Uuid::new_v4();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .execute(&mut *tx)
        .await?;
        Self::sync_book_genres(&mut tx, id, &data.genre).await?;
        tx.commit().await?;

        self.fetch(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after insert", id)))
    }

    async fn update(&self, id: Uuid, data: &BookData) -> AppResult<Option<Book>> {
        let author_id = require_author(data)?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author_id = $3, summary = $4, isbn = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }
        Self::sync_book_genres(&mut tx, id, &data.genre).await?;
        tx.commit().await?;

        self.fetch(id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
