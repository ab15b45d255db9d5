use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
const MAX_SIMILARITY: f64 = 0.7;

const COMMON_PASSWORDS: &[&str] = &[
    "123456", "123456789", "12345678", "1234567890", "password", "password1",
    "password123", "qwerty", "qwerty123", "azerty", "azerty123", "abc123", "111111",
    "123123", "iloveyou", "admin", "admin123", "welcome", "welcome1", "letmein",
    "monkey", "dragon", "football", "baseball", "sunshine", "princess", "master",
    "shadow", "superman", "trustno1", "motdepasse", "soleil", "bonjour", "doudou",
    "chouchou", "loulou", "marseille", "000000", "654321", "1q2w3e4r", "zaq12wsx",
    "passw0rd", "starwars", "whatever", "hello123", "changeme", "secret", "login",
];

/// Account attributes a password must not resemble.
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordContext<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

impl PasswordContext<'_> {
    fn attributes(&self) -> [(&str, &'static str); 4] {
        [
            (self.username, "nom d'utilisateur"),
            (self.email, "adresse électronique"),
            (self.first_name, "prénom"),
            (self.last_name, "nom"),
        ]
    }
}

/// Strength rules applied to new passwords; every failing rule contributes one message.
pub fn validate_password(password: &str, context: &PasswordContext<'_>) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(label) = similar_attribute(password, context) {
        errors.push(format!(
            "Le mot de passe est trop semblable au champ « {label} »."
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Ce mot de passe est trop court. Il doit contenir au minimum {MIN_PASSWORD_LEN} caractères."
        ));
    }
    if COMMON_PASSWORDS.contains(&password.trim().to_lowercase().as_str()) {
        errors.push("Ce mot de passe est trop courant.".to_string());
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("Ce mot de passe est entièrement numérique.".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn similar_attribute(password: &str, context: &PasswordContext<'_>) -> Option<&'static str> {
    let password = password.to_lowercase();
    context.attributes().into_iter().find_map(|(value, label)| {
        let value = value.trim().to_lowercase();
        if value.is_empty() {
            return None;
        }
        let mut parts: Vec<&str> = value
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|part| !part.is_empty())
            .collect();
        parts.push(value.as_str());

        parts
            .into_iter()
            .filter(|part| !exceeds_length_ratio(&password, part))
            .any(|part| quick_ratio(&password, part) >= MAX_SIMILARITY)
            .then_some(label)
    })
}

// A much longer password cannot be "too similar" to a short attribute.
fn exceeds_length_ratio(password: &str, part: &str) -> bool {
    let password_len = password.chars().count();
    let part_len = part.chars().count();
    let bound = MAX_SIMILARITY / 2.0 * password_len as f64;
    password_len >= 10 * part_len && (part_len as f64) < bound
}

/// Upper bound on sequence similarity: shared characters over total length.
fn quick_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }
    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }
    let mut matches = 0usize;
    for c in a.chars() {
        if let Some(count) = available.get_mut(&c) {
            if *count > 0 {
                *count -= 1;
                matches += 1;
            }
        }
    }
    2.0 * matches as f64 / total as f64
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| {
            tracing::error!(error = %err, "password hashing failed");
            AppError::internal("Password hashing failed")
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|err| {
        tracing::error!(error = %err, "stored password hash is invalid");
        AppError::internal("Invalid password hash")
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
