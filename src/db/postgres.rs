use entity::{favorite, follow, user};
use migration::{Migrator, MigratorTrait};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::db::store::UserStore;
use crate::types::error::AppError;
use crate::types::user::User;

// names the offending field from the violated constraint; the user
// table has exactly two unique indexes, idx_user_username and
// idx_user_email
fn unique_conflict(msg: &str) -> AppError {
    if msg.contains("idx_user_email") {
        AppError::taken("email")
    } else {
        AppError::taken("username")
    }
}

/// Postgres-backed store. Relation sets live in the `follow` and
/// `favorite` join tables; their composite primary keys make the set
/// invariant structural rather than convention-enforced.
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    pub async fn connect(uri: &str) -> Result<Self, DbErr> {
        info!("connecting to postgres");
        let db = Database::connect(uri).await?;
        info!("running migrations");
        Migrator::up(&db, None).await?;
        info!("store ready");
        Ok(Self { db })
    }

    async fn load(&self, model: user::Model) -> Result<User, AppError> {
        let following = follow::Entity::find()
            .filter(follow::Column::UserId.eq(model.id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|f| f.target_id)
            .collect();
        let favorites = favorite::Entity::find()
            .filter(favorite::Column::UserId.eq(model.id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|f| f.item_id)
            .collect();

        Ok(User {
            id: model.id,
            username: model.username,
            email: model.email,
            bio: model.bio,
            image: model.image,
            salt: model.salt,
            hash: model.hash,
            following,
            favorites,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn row(u: &User) -> user::ActiveModel {
        user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username.clone()),
            email: Set(u.email.clone()),
            bio: Set(u.bio.clone()),
            image: Set(u.image.clone()),
            salt: Set(u.salt.clone()),
            hash: Set(u.hash.clone()),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        match user::Entity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.load(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        match found {
            Some(model) => Ok(Some(self.load(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        match found {
            Some(model) => Ok(Some(self.load(model).await?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, u: &User) -> Result<(), AppError> {
        // pre-check so conflicts surface as field-level errors; the
        // unique indexes remain the backstop under races
        if user::Entity::find()
            .filter(user::Column::Username.eq(u.username.as_str()))
            .one(&self.db)
            .await?
            .is_some()
        {
            return Err(AppError::taken("username"));
        }
        if user::Entity::find()
            .filter(user::Column::Email.eq(u.email.as_str()))
            .one(&self.db)
            .await?
            .is_some()
        {
            return Err(AppError::taken("email"));
        }

        // a concurrent registration can still slip past the pre-check;
        // the unique index then fires and must surface the same
        // field-level error, not a bare db failure
        match user::Entity::insert(Self::row(u)).exec(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) => Err(unique_conflict(&msg)),
                _ => Err(e.into()),
            },
        }
    }

    async fn save(&self, u: &User) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        user::Entity::insert(Self::row(u))
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Username,
                        user::Column::Email,
                        user::Column::Bio,
                        user::Column::Image,
                        user::Column::Salt,
                        user::Column::Hash,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await?;

        // reconcile relation rows against the in-memory sets; the
        // transaction keeps the user and its edges consistent
        follow::Entity::delete_many()
            .filter(follow::Column::UserId.eq(u.id))
            .exec(&txn)
            .await?;
        for target in &u.following {
            follow::Entity::insert(follow::ActiveModel {
                user_id: Set(u.id),
                target_id: Set(*target),
            })
            .exec(&txn)
            .await?;
        }

        favorite::Entity::delete_many()
            .filter(favorite::Column::UserId.eq(u.id))
            .exec(&txn)
            .await?;
        for item in &u.favorites {
            favorite::Entity::insert(favorite::ActiveModel {
                user_id: Set(u.id),
                item_id: Set(*item),
            })
            .exec(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}
