use crate::domain::borrow::{Book, BorrowCore, BorrowRecord, ClosedBorrow, OpenBorrow};
use crate::domain::value_objects::{BookId, MemberId, TransactionId};
use crate::ports::library_store::{LibraryStore as LibraryStoreTrait, Result, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row, postgres::PgRow};

/// sqlxのエラーをストレージポートのバックエンドエラーに変換する
fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(Box::new(err))
}

/// PostgreSQLの行データをBorrowRecordに変換する
///
/// returned_onがNULLなら貸出中、値があれば返却済みとして復元する。
fn map_row_to_record(row: &PgRow) -> BorrowRecord {
    let core = BorrowCore {
        transaction_id: TransactionId::from_uuid(row.get("transaction_id")),
        book_id: BookId::from_uuid(row.get("book_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        borrowed_on: row.get("borrowed_on"),
        due_on: row.get("due_on"),
    };

    match row.get::<Option<NaiveDate>, _>("returned_on") {
        None => BorrowRecord::Open(OpenBorrow { core }),
        Some(returned_on) => BorrowRecord::Closed(ClosedBorrow { core, returned_on }),
    }
}

/// LibraryStoreのPostgreSQL実装
///
/// 変更操作はすべてデータベーストランザクションの中で実行され、
/// 途中で失敗した場合は単位全体がロールバックされる。
/// フィルタや検索条件の文字列連結は行わず、すべてパラメータ化クエリを使う。
pub struct PostgresLibraryStore {
    pool: PgPool,
}

impl PostgresLibraryStore {
    /// PostgreSQLコネクションプールから新しいストアを作成
    ///
    /// 接続設定は起動時に読み込んだ値をここへ渡す。コードへの埋め込みはしない。
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryStoreTrait for PostgresLibraryStore {
    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT book_id, title, author, genre, available
            FROM books
            WHERE book_id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(|row| Book {
            book_id: BookId::from_uuid(row.get("book_id")),
            title: row.get("title"),
            author: row.get("author"),
            genre: row.get("genre"),
            available: row.get("available"),
        }))
    }

    async fn set_book_availability(&self, book_id: BookId, available: bool) -> Result<()> {
        let result = sqlx::query("UPDATE books SET available = $2 WHERE book_id = $1")
            .bind(book_id.value())
            .bind(available)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::BookNotFound);
        }

        Ok(())
    }

    async fn get_borrow_record(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<BorrowRecord>> {
        let row = sqlx::query(
            r#"
            SELECT transaction_id, book_id, member_id, borrowed_on, due_on, returned_on
            FROM borrow_records
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.as_ref().map(map_row_to_record))
    }

    async fn records_for_member(&self, member_id: MemberId) -> Result<Vec<BorrowRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT transaction_id, book_id, member_id, borrowed_on, due_on, returned_on
            FROM borrow_records
            WHERE member_id = $1
            ORDER BY borrowed_on DESC
            "#,
        )
        .bind(member_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.iter().map(map_row_to_record).collect())
    }

    /// 原子的単位：レコード挿入＋フラグ反転
    ///
    /// 楽観的ガード付きUPDATEでフラグを反転する。
    /// `available = TRUE`の行だけが対象になるため、並行する貸出のうち
    /// 先に反転した側だけが挿入に進める。ロックは蔵書の行単位。
    async fn insert_borrow_record(&self, open: OpenBorrow) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let flipped = sqlx::query(
            "UPDATE books SET available = FALSE WHERE book_id = $1 AND available = TRUE",
        )
        .bind(open.book_id.value())
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        if flipped.rows_affected() == 0 {
            // 反転できなかった理由を区別する（未登録か貸出中か）
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE book_id = $1)")
                    .bind(open.book_id.value())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(backend)?;

            return Err(if exists {
                StoreError::BookUnavailable
            } else {
                StoreError::BookNotFound
            });
        }

        sqlx::query(
            r#"
            INSERT INTO borrow_records (transaction_id, book_id, member_id, borrowed_on, due_on)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(open.transaction_id.value())
        .bind(open.book_id.value())
        .bind(open.member_id.value())
        .bind(open.borrowed_on)
        .bind(open.due_on)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(())
    }

    /// 原子的単位：返却日設定＋フラグ復元
    ///
    /// レコード行を`FOR UPDATE`でロックして返却済みを再確認する。
    /// 別の蔵書に対する操作とは互いにブロックしない。
    async fn set_borrow_record_return_date(
        &self,
        transaction_id: TransactionId,
        returned_on: NaiveDate,
    ) -> Result<BookId> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let row = sqlx::query(
            r#"
            SELECT book_id, returned_on
            FROM borrow_records
            WHERE transaction_id = $1
            FOR UPDATE
            "#,
        )
        .bind(transaction_id.value())
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend)?;

        let row = row.ok_or(StoreError::RecordNotFound)?;
        if row.get::<Option<NaiveDate>, _>("returned_on").is_some() {
            return Err(StoreError::AlreadyReturned);
        }
        let book_id = BookId::from_uuid(row.get("book_id"));

        sqlx::query("UPDATE borrow_records SET returned_on = $2 WHERE transaction_id = $1")
            .bind(transaction_id.value())
            .bind(returned_on)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        sqlx::query("UPDATE books SET available = TRUE WHERE book_id = $1")
            .bind(book_id.value())
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(book_id)
    }
}
