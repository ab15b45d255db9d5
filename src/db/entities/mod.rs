#[allow(unused_imports)]
pub mod prelude {
    pub use super::refresh_token::Entity as RefreshToken;
    pub use super::teacher_profile::Entity as TeacherProfile;
    pub use super::user::Entity as User;
}

pub mod refresh_token;
pub mod teacher_profile;
pub mod user;
