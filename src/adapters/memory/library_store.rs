use crate::domain::borrow::{Book, BorrowRecord, ClosedBorrow, OpenBorrow};
use crate::domain::value_objects::{BookId, MemberId, TransactionId};
use crate::ports::library_store::{LibraryStore as LibraryStoreTrait, Result, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

/// ストレージの内部状態
///
/// 蔵書と貸出レコードを1つのロックの下に置くことで、
/// 原子的単位（挿入＋フラグ反転、返却＋フラグ復元）を保証する。
struct State {
    books: HashMap<BookId, Book>,
    records: Vec<BorrowRecord>,
}

/// LibraryStoreのインメモリ実装
///
/// テストとローカル実行をサポートする状態を持ったアダプター。
/// 両方の変更操作は状態ロックの内側でガード条件を再確認するため、
/// 同じ蔵書への並行貸出はどちらか一方だけが成功する。
pub struct MemoryLibraryStore {
    state: Mutex<State>,
}

impl MemoryLibraryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                books: HashMap::new(),
                records: Vec::new(),
            }),
        }
    }

    /// テスト用に蔵書を登録
    pub fn add_book(&self, book: Book) {
        self.state.lock().unwrap().books.insert(book.book_id, book);
    }

    /// テスト用に貸出レコードを直接登録
    pub fn add_record(&self, record: BorrowRecord) {
        self.state.lock().unwrap().records.push(record);
    }
}

impl Default for MemoryLibraryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LibraryStoreTrait for MemoryLibraryStore {
    async fn get_book(&self, book_id: BookId) -> Result<Option<Book>> {
        let state = self.state.lock().unwrap();
        Ok(state.books.get(&book_id).cloned())
    }

    async fn set_book_availability(&self, book_id: BookId, available: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let book = state
            .books
            .get_mut(&book_id)
            .ok_or(StoreError::BookNotFound)?;
        book.available = available;
        Ok(())
    }

    async fn get_borrow_record(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<BorrowRecord>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .records
            .iter()
            .find(|r| r.transaction_id() == transaction_id)
            .cloned())
    }

    async fn records_for_member(&self, member_id: MemberId) -> Result<Vec<BorrowRecord>> {
        let state = self.state.lock().unwrap();
        let mut records: Vec<BorrowRecord> = state
            .records
            .iter()
            .filter(|r| r.member_id() == member_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.core().borrowed_on.cmp(&a.core().borrowed_on));
        Ok(records)
    }

    /// ロックの内側でフラグを再確認してから挿入と反転をまとめて適用する
    async fn insert_borrow_record(&self, open: OpenBorrow) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        let book = state
            .books
            .get_mut(&open.book_id)
            .ok_or(StoreError::BookNotFound)?;

        if !book.available {
            return Err(StoreError::BookUnavailable);
        }

        book.available = false;
        state.records.push(BorrowRecord::Open(open));
        Ok(())
    }

    /// ロックの内側で未返却を再確認してから返却日設定とフラグ復元をまとめて適用する
    async fn set_borrow_record_return_date(
        &self,
        transaction_id: TransactionId,
        returned_on: NaiveDate,
    ) -> Result<BookId> {
        let mut state = self.state.lock().unwrap();

        let index = state
            .records
            .iter()
            .position(|r| r.transaction_id() == transaction_id)
            .ok_or(StoreError::RecordNotFound)?;

        let open = match &state.records[index] {
            BorrowRecord::Open(open) => open.clone(),
            BorrowRecord::Closed(_) => return Err(StoreError::AlreadyReturned),
        };

        // レコードを閉じる前に蔵書の存在を確認し、単位全体を失敗させる
        let book_id = open.book_id;
        let book = state
            .books
            .get_mut(&book_id)
            .ok_or(StoreError::BookNotFound)?;
        book.available = true;

        state.records[index] = BorrowRecord::Closed(ClosedBorrow {
            core: open.core,
            returned_on,
        });

        Ok(book_id)
    }
}
