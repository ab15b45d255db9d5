use sea_orm::Set;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::password::{PasswordContext, hash_password, validate_password},
    db::dao::{DaoBase, DaoLayerError, TeacherProfileDao, UserDao},
    db::entities::{teacher_profile, user},
    error::{AppError, FieldErrors},
    schemas::{AccountChanges, RegisterRequest, TeacherProfileChanges},
    validation::REQUIRED_FIELD_MESSAGE,
};

pub const EMAIL_TAKEN_MESSAGE: &str = "Un utilisateur avec cette adresse email existe déjà.";
pub const USERNAME_TAKEN_MESSAGE: &str = "Un utilisateur avec ce nom existe déjà.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Les mots de passe ne correspondent pas.";
pub const USER_NOT_FOUND_MESSAGE: &str = "Utilisateur introuvable.";

/// A user together with its teacher profile.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: user::Model,
    pub profile: teacher_profile::Model,
}

impl From<(user::Model, teacher_profile::Model)> for Account {
    fn from((user, profile): (user::Model, teacher_profile::Model)) -> Self {
        Self { user, profile }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
    profile_dao: TeacherProfileDao,
}

impl UserService {
    pub fn new(user_dao: UserDao, profile_dao: TeacherProfileDao) -> Self {
        Self {
            user_dao,
            profile_dao,
        }
    }

    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<user::Model>, AppError> {
        match self.user_dao.find_by_id(*id).await {
            Ok(model) => Ok(Some(model)),
            Err(DaoLayerError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_username(username).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        Ok(self.user_dao.find_by_email(&normalize_email(email)).await?)
    }

    /// The only way to create a user: the row and its profile are written together.
    pub async fn create_account(
        &self,
        account: NewAccount,
        profile: TeacherProfileChanges,
    ) -> Result<Account, AppError> {
        let user = user::ActiveModel {
            username: Set(account.username),
            email: Set(normalize_email(&account.email)),
            first_name: Set(account.first_name),
            last_name: Set(account.last_name),
            password_hash: Set(account.password_hash),
            is_active: Set(true),
            is_staff: Set(account.is_staff),
            is_superuser: Set(account.is_superuser),
            last_login_at: Set(None),
            ..Default::default()
        };
        let mut profile_row = teacher_profile::ActiveModel::empty_for(Uuid::nil());
        profile.apply(&mut profile_row);

        let created = self.user_dao.create_with_profile(user, profile_row).await?;
        Ok(created.into())
    }

    /// Checks uniqueness, password strength and confirmation together, then
    /// creates the account with the submitted profile in a single write.
    /// Presence of the fields is checked earlier by the request's `validate`.
    pub async fn register(&self, request: RegisterRequest) -> Result<Account, AppError> {
        let RegisterRequest {
            username,
            email,
            first_name,
            last_name,
            password,
            password_confirm,
            teacher_profile,
        } = request;
        let username = username.unwrap_or_default();
        let email = normalize_email(&email.unwrap_or_default());
        let first_name = first_name.unwrap_or_default();
        let last_name = last_name.unwrap_or_default();
        let password = password.unwrap_or_default();
        let password_confirm = password_confirm.unwrap_or_default();
        let teacher_profile = teacher_profile.unwrap_or_default();
        let mut errors = FieldErrors::new();

        if self.user_dao.find_by_email(&email).await?.is_some() {
            push_error(&mut errors, "email", EMAIL_TAKEN_MESSAGE);
        }
        if self.user_dao.find_by_username(&username).await?.is_some() {
            push_error(&mut errors, "username", USERNAME_TAKEN_MESSAGE);
        }
        let context = PasswordContext {
            username: &username,
            email: &email,
            first_name: &first_name,
            last_name: &last_name,
        };
        if let Err(messages) = validate_password(&password, &context) {
            errors.entry("password".to_string()).or_default().extend(messages);
        }
        if password != password_confirm {
            push_error(&mut errors, "password_confirm", PASSWORD_MISMATCH_MESSAGE);
        }

        if !errors.is_empty() {
            info!(fields = ?errors.keys().collect::<Vec<_>>(), "registration rejected");
            return Err(AppError::validation(errors));
        }

        let password_hash = hash_password(&password)?;
        let account = self
            .create_account(
                NewAccount {
                    username,
                    email,
                    first_name,
                    last_name,
                    password_hash,
                    is_staff: false,
                    is_superuser: false,
                },
                teacher_profile,
            )
            .await?;
        info!(user_id = %account.user.id, username = %account.user.username, "user registered");
        Ok(account)
    }

    pub async fn account(&self, user_id: Uuid) -> Result<Account, AppError> {
        let user = self.load_user(user_id).await?;
        match self.profile_dao.find_by_user_id(user.id).await? {
            Some(profile) => Ok(Account { user, profile }),
            None => {
                warn!(%user_id, "account read without profile, re-saving");
                let saved = self
                    .user_dao
                    .save_with_profile(user, |_| {}, |_| {})
                    .await?;
                Ok(saved.into())
            }
        }
    }

    /// `partial = false` is a full replacement and requires `username`.
    pub async fn update_account(
        &self,
        user_id: Uuid,
        changes: AccountChanges,
        partial: bool,
    ) -> Result<Account, AppError> {
        let user = self.load_user(user_id).await?;
        let AccountChanges {
            username,
            email,
            first_name,
            last_name,
            teacher_profile,
        } = changes;
        let email = email.map(|email| normalize_email(&email));
        let mut errors = FieldErrors::new();

        if !partial && username.is_none() {
            push_error(&mut errors, "username", REQUIRED_FIELD_MESSAGE);
        }
        if let Some(username) = username.as_deref() {
            let taken = self
                .user_dao
                .find_by_username(username)
                .await?
                .is_some_and(|other| other.id != user.id);
            if taken {
                push_error(&mut errors, "username", USERNAME_TAKEN_MESSAGE);
            }
        }
        if let Some(email) = email.as_deref() {
            let taken = self
                .user_dao
                .find_by_email(email)
                .await?
                .is_some_and(|other| other.id != user.id);
            if taken {
                push_error(&mut errors, "email", EMAIL_TAKEN_MESSAGE);
            }
        }
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        let saved = self
            .user_dao
            .save_with_profile(
                user,
                move |active| {
                    if let Some(username) = username {
                        active.username = Set(username);
                    }
                    if let Some(email) = email {
                        active.email = Set(email);
                    }
                    if let Some(first_name) = first_name {
                        active.first_name = Set(first_name);
                    }
                    if let Some(last_name) = last_name {
                        active.last_name = Set(last_name);
                    }
                },
                move |active| {
                    if let Some(changes) = teacher_profile {
                        changes.apply(active);
                    }
                },
            )
            .await?;
        info!(%user_id, "account updated");
        Ok(saved.into())
    }

    pub async fn update_teacher_profile(
        &self,
        user_id: Uuid,
        changes: TeacherProfileChanges,
    ) -> Result<Account, AppError> {
        let user = self.load_user(user_id).await?;
        let profile = self
            .profile_dao
            .sync_in(self.profile_dao.db(), user.id, move |active| changes.apply(active))
            .await?;
        info!(%user_id, profile_id = %profile.id, "teacher profile updated");
        Ok(Account { user, profile })
    }

    pub async fn record_login(&self, user: user::Model) -> Result<Account, AppError> {
        let now = chrono::Utc::now().fixed_offset();
        let saved = self
            .user_dao
            .save_with_profile(user, move |active| active.last_login_at = Set(Some(now)), |_| {})
            .await?;
        Ok(saved.into())
    }

    async fn load_user(&self, user_id: Uuid) -> Result<user::Model, AppError> {
        self.find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND_MESSAGE))
    }
}

/// Lower-cases the domain part; the local part is kept as typed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}
