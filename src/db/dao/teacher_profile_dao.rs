use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::warn;
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::teacher_profile::{self, Entity as TeacherProfile};

#[derive(Clone)]
pub struct TeacherProfileDao {
    db: DatabaseConnection,
}

impl DaoBase for TeacherProfileDao {
    type Entity = TeacherProfile;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TeacherProfileDao {
    pub async fn find_by_user_id(&self, user_id: Uuid) -> DaoResult<Option<teacher_profile::Model>> {
        self.find_by_user_id_in(self.db(), user_id).await
    }

    pub async fn find_by_user_id_in<C>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> DaoResult<Option<teacher_profile::Model>>
    where
        C: ConnectionTrait,
    {
        let profile = TeacherProfile::find()
            .filter(teacher_profile::Column::UserId.eq(user_id))
            .one(conn)
            .await?;
        Ok(profile)
    }

    /// Re-saves the user's profile with `apply`, creating it with defaults when absent.
    pub async fn sync_in<C, F>(
        &self,
        conn: &C,
        user_id: Uuid,
        apply: F,
    ) -> DaoResult<teacher_profile::Model>
    where
        C: ConnectionTrait + Sync,
        F: for<'a> FnOnce(&'a mut teacher_profile::ActiveModel) + Send,
    {
        match self.find_by_user_id_in(conn, user_id).await? {
            Some(profile) => self.save_in(conn, profile, apply).await,
            None => {
                warn!(%user_id, "teacher profile missing, recreating");
                let mut active = teacher_profile::ActiveModel::empty_for(user_id);
                apply(&mut active);
                self.create_in(conn, active).await
            }
        }
    }
}
