use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, TransactionTrait};
use tracing::debug;

use super::{DaoBase, DaoResult, TeacherProfileDao};
use crate::db::entities::{prelude::User, teacher_profile, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find_first(move |query| query.filter(user::Column::Email.eq(email)))
            .await
    }

    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        let username = username.to_string();
        self.find_first(move |query| query.filter(user::Column::Username.eq(username)))
            .await
    }

    /// Inserts the account and its teacher profile in one transaction.
    /// `profile.user_id` is overwritten with the new account id.
    pub async fn create_with_profile(
        &self,
        user: user::ActiveModel,
        mut profile: teacher_profile::ActiveModel,
    ) -> DaoResult<(user::Model, teacher_profile::Model)> {
        let txn = self.db.begin().await?;

        let user = self.create_in(&txn, user).await?;
        profile.user_id = sea_orm::Set(user.id);
        let profile = TeacherProfileDao::new(&self.db)
            .create_in(&txn, profile)
            .await?;

        txn.commit().await?;
        debug!(user_id = %user.id, profile_id = %profile.id, "account created");
        Ok((user, profile))
    }

    /// Saves the account and re-saves its profile in the same transaction.
    /// A missing profile is recreated, so every saved account ends up with one.
    pub async fn save_with_profile<F, G>(
        &self,
        user: user::Model,
        apply_user: F,
        apply_profile: G,
    ) -> DaoResult<(user::Model, teacher_profile::Model)>
    where
        F: for<'a> FnOnce(&'a mut user::ActiveModel) + Send,
        G: for<'a> FnOnce(&'a mut teacher_profile::ActiveModel) + Send,
    {
        let txn = self.db.begin().await?;

        let user = self.save_in(&txn, user, apply_user).await?;
        let profile = TeacherProfileDao::new(&self.db)
            .sync_in(&txn, user.id, apply_profile)
            .await?;

        txn.commit().await?;
        Ok((user, profile))
    }
}
