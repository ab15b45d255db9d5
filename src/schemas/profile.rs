use sea_orm::{Set, entity::prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validate_username;
use crate::db::entities::{teacher_profile, user};

/// Teacher-facing profile fields a client may write. Any other key
/// (`is_verified`, timestamps, ...) is dropped at deserialization.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct TeacherProfileChanges {
    #[validate(length(max = 200, message = "Assurez-vous que ce champ comporte au plus 200 caractères."))]
    pub commission_scolaire: Option<String>,
    #[validate(length(max = 200, message = "Assurez-vous que ce champ comporte au plus 200 caractères."))]
    pub school_name: Option<String>,
    pub grade_levels: Option<Vec<String>>,
    pub subjects: Option<Vec<String>>,
    #[validate(length(max = 20, message = "Assurez-vous que ce champ comporte au plus 20 caractères."))]
    pub phone_number: Option<String>,
}

impl TeacherProfileChanges {
    /// Writes every provided field onto the row; absent fields stay untouched.
    pub fn apply(self, active: &mut teacher_profile::ActiveModel) {
        if let Some(commission_scolaire) = self.commission_scolaire {
            active.commission_scolaire = Set(commission_scolaire);
        }
        if let Some(school_name) = self.school_name {
            active.school_name = Set(school_name);
        }
        if let Some(grade_levels) = self.grade_levels {
            active.set_grade_levels(grade_levels);
        }
        if let Some(subjects) = self.subjects {
            active.set_subjects(subjects);
        }
        if let Some(phone_number) = self.phone_number {
            active.phone_number = Set(phone_number);
        }
    }
}

/// Body of `PUT`/`PATCH /auth/profile/`. Read-only keys such as `id` or
/// `date_joined` are ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AccountChanges {
    #[validate(
        length(max = 150, message = "Assurez-vous que ce champ comporte au plus 150 caractères."),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(email(message = "Saisissez une adresse e-mail valide."))]
    pub email: Option<String>,
    #[validate(length(max = 150, message = "Assurez-vous que ce champ comporte au plus 150 caractères."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Assurez-vous que ce champ comporte au plus 150 caractères."))]
    pub last_name: Option<String>,
    #[validate(nested)]
    pub teacher_profile: Option<TeacherProfileChanges>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TeacherProfileResponse {
    pub commission_scolaire: String,
    pub school_name: String,
    pub grade_levels: Vec<String>,
    pub subjects: Vec<String>,
    pub phone_number: String,
}

impl From<&teacher_profile::Model> for TeacherProfileResponse {
    fn from(profile: &teacher_profile::Model) -> Self {
        Self {
            commission_scolaire: profile.commission_scolaire.clone(),
            school_name: profile.school_name.clone(),
            grade_levels: profile.grade_levels(),
            subjects: profile.subjects(),
            phone_number: profile.phone_number.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub date_joined: DateTimeWithTimeZone,
    pub teacher_profile: TeacherProfileResponse,
}

impl UserResponse {
    pub fn new(user: &user::Model, profile: &teacher_profile::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            date_joined: user.created_at,
            teacher_profile: TeacherProfileResponse::from(profile),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: &'static str,
    pub user: UserResponse,
}
