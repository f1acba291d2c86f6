use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, PaginatorTrait, Set, SqlErr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique, column_type = "Text")]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sea_orm(column_type = "Text")]
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
    pub last_login_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn db_err(e: DbErr) -> ModelError {
    ModelError::Db(e.to_string())
}

/// Insert a user row. A clash on the unique `email` index yields `ModelError::Duplicate`.
pub async fn create(db: &DatabaseConnection, email: &str, password_hash: &str, role: &str) -> Result<Model, ModelError> {
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        role: Set(role.to_string()),
        created_at: Set(Utc::now().into()),
        last_login_at: Set(None),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => ModelError::Duplicate(detail),
        _ => db_err(e),
    })
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn exists_by_email(db: &DatabaseConnection, email: &str) -> Result<bool, ModelError> {
    let n = Entity::find()
        .filter(Column::Email.eq(email))
        .count(db)
        .await
        .map_err(db_err)?;
    Ok(n > 0)
}

pub async fn touch_last_login(db: &DatabaseConnection, id: Uuid, at: DateTime<Utc>) -> Result<(), ModelError> {
    let at: DateTimeWithTimeZone = at.into();
    let res = Entity::update_many()
        .col_expr(Column::LastLoginAt, Expr::value(Some(at)))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(db_err)?;
    if res.rows_affected == 0 {
        return Err(ModelError::Validation("user not found".into()));
    }
    Ok(())
}
