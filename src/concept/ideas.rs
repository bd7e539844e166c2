//! 点子库子模块
//!
//! ## 职责
//! - 打开 SQLite 点子库并在缺表时建表
//! - 列出 / 按 id 读取消费者访谈点子
//! - `insert` 仅用于初始化数据
//!
//! ## 错误语义
//! - 所有 SQLite 错误统一映射为 `AppError::Database`

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::AppError;

use super::IdeaRow;

pub struct IdeaRepository {
    conn: Connection,
}

impl IdeaRepository {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let conn = Connection::open(path)
            .map_err(|e| AppError::Database(format!("打开点子库失败 {}: {}", path.display(), e)))?;
        log::debug!("🗄️ 打开点子库: {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Database(format!("创建内存点子库失败: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS idea_repository (
                id INTEGER PRIMARY KEY,
                product TEXT NOT NULL,
                idea_text TEXT NOT NULL
            );",
        )
        .map_err(|e| AppError::Database(format!("创建点子表失败: {}", e)))?;

        Ok(Self { conn })
    }

    /// 按 id 升序列出点子，`limit` 为空时返回全部。
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<IdeaRow>, AppError> {
        let limit = limit.map(|n| n as i64).unwrap_or(-1);

        let mut stmt = self
            .conn
            .prepare("SELECT id, product, idea_text FROM idea_repository ORDER BY id ASC LIMIT ?1")
            .map_err(|e| AppError::Database(format!("准备点子查询失败: {}", e)))?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(IdeaRow {
                    id: row.get(0)?,
                    product: row.get(1)?,
                    idea_text: row.get(2)?,
                })
            })
            .map_err(|e| AppError::Database(format!("查询点子失败: {}", e)))?;

        let mut ideas = Vec::new();
        for row in rows {
            ideas.push(row.map_err(|e| AppError::Database(format!("读取点子失败: {}", e)))?);
        }
        Ok(ideas)
    }

    pub fn get(&self, id: i64) -> Result<Option<IdeaRow>, AppError> {
        self.conn
            .query_row(
                "SELECT id, product, idea_text FROM idea_repository WHERE id = ?1",
                params![id],
                |row| {
                    Ok(IdeaRow {
                        id: row.get(0)?,
                        product: row.get(1)?,
                        idea_text: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| AppError::Database(format!("读取点子 {} 失败: {}", id, e)))
    }

    /// 写入一条点子，返回新行 id。
    pub fn insert(&self, product: &str, idea_text: &str) -> Result<i64, AppError> {
        self.conn
            .execute(
                "INSERT INTO idea_repository (product, idea_text) VALUES (?1, ?2)",
                params![product, idea_text],
            )
            .map_err(|e| AppError::Database(format!("写入点子失败: {}", e)))?;
        Ok(self.conn.last_insert_rowid())
    }
}
