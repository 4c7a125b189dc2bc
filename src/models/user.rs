//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// How the account signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    #[default]
    Credentials,
    Github,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    Serif,
    SansSerif,
    Monospace,
}

/// Display preferences set from the customize page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default)]
    pub font_family: FontFamily,
}

/// Partial preferences update; absent fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub font_size: Option<FontSize>,
    pub font_family: Option<FontFamily>,
}

impl Preferences {
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(font_size) = update.font_size {
            self.font_size = font_size;
        }
        if let Some(font_family) = update.font_family {
            self.font_family = font_family;
        }
    }
}

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// UUID (also used as document ID)
    pub id: String,
    pub name: String,
    /// Lowercased, unique across users
    pub email: String,
    /// Argon2 PHC string; only set for credentials accounts
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub provider: AuthProvider,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    /// Favorited quote dates (YYYY-MM-DD), no duplicates
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub preferences: Preferences,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn is_favorite(&self, date: &str) -> bool {
        self.favorites.iter().any(|f| f == date)
    }

    /// Flip a favorite. Returns whether `date` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, date: &str) -> bool {
        if self.remove_favorite(date) {
            false
        } else {
            self.favorites.push(date.to_string());
            true
        }
    }

    /// Remove a favorite if present. Returns whether anything was removed.
    pub fn remove_favorite(&mut self, date: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| f != date);
        self.favorites.len() != before
    }

    /// Public view without credentials.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            is_admin: self.is_admin,
            provider: self.provider,
            preferences: self.preferences,
            created_at: self.created_at.clone(),
        }
    }
}

/// User as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub is_admin: bool,
    pub provider: AuthProvider,
    pub preferences: Preferences,
    pub created_at: String,
}
