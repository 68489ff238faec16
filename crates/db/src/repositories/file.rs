//! File repository for catalog operations.
//!
//! Implements the [`FileCatalog`] contract using SeaORM. Each write runs in its own transaction;
//! returning early drops the transaction, which rolls it back.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};

use crate::entities::files;
use filekeep_core::file::{CatalogError, FileCatalog, FileRecord, NewFileRecord};
use filekeep_shared::types::FileId;

/// File catalog backed by the `files` table.
#[derive(Debug, Clone)]
pub struct FileRepository {
    db: DatabaseConnection,
}

impl FileRepository {
    /// Creates a new file repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl FileCatalog for FileRepository {
    async fn insert(&self, record: NewFileRecord) -> Result<FileId, CatalogError> {
        let txn = self.db.begin().await.map_err(backend)?;
        let storage_name = record.storage_name.clone();

        let active_model = files::ActiveModel {
            original_name: Set(record.original_name),
            storage_name: Set(record.storage_name),
            path: Set(record.path),
            size: Set(record.size),
            storage_type: Set(record.storage_type),
            created_at: Set(Utc::now().into()),
            is_deleted: Set(false),
            ..Default::default()
        };

        let result = files::Entity::insert(active_model)
            .exec(&txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    CatalogError::DuplicateKey(storage_name.clone())
                }
                _ => backend(e),
            })?;

        txn.commit().await.map_err(backend)?;

        Ok(FileId(result.last_insert_id))
    }

    async fn get_by_id(&self, id: FileId, is_deleted: bool) -> Result<FileRecord, CatalogError> {
        files::Entity::find_by_id(id.into_inner())
            .filter(files::Column::IsDeleted.eq(is_deleted))
            .one(&self.db)
            .await
            .map_err(backend)?
            .map(to_domain)
            .ok_or(CatalogError::NotFound(id))
    }

    async fn soft_delete(&self, id: FileId) -> Result<u64, CatalogError> {
        let txn = self.db.begin().await.map_err(backend)?;

        let result = files::Entity::update_many()
            .col_expr(files::Column::IsDeleted, Expr::value(true))
            .filter(files::Column::Id.eq(id.into_inner()))
            .filter(files::Column::IsDeleted.eq(false))
            .exec(&txn)
            .await
            .map_err(backend)?;

        if result.rows_affected == 0 {
            return Err(CatalogError::NotFound(id));
        }

        txn.commit().await.map_err(backend)?;
        Ok(result.rows_affected)
    }

    async fn hard_delete(&self, id: FileId) -> Result<u64, CatalogError> {
        let txn = self.db.begin().await.map_err(backend)?;

        let result = files::Entity::delete_many()
            .filter(files::Column::Id.eq(id.into_inner()))
            .filter(files::Column::IsDeleted.eq(true))
            .exec(&txn)
            .await
            .map_err(backend)?;

        if result.rows_affected == 0 {
            return Err(CatalogError::NotFound(id));
        }

        txn.commit().await.map_err(backend)?;
        Ok(result.rows_affected)
    }
}

fn backend(e: DbErr) -> CatalogError {
    CatalogError::backend(e.to_string())
}

fn to_domain(model: files::Model) -> FileRecord {
    FileRecord {
        id: FileId(model.id),
        original_name: model.original_name,
        storage_name: model.storage_name,
        path: model.path,
        size: model.size,
        storage_type: model.storage_type,
        created_at: model.created_at.with_timezone(&Utc),
        is_deleted: model.is_deleted,
    }
}
