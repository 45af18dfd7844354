//! Principal Entity
//!
//! The identity a session stands for. Holds public fields only; the
//! credential hash lives in [`super::credential::CredentialRecord`].

use crate::domain::value_object::user_name::UserName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Unique, case-sensitive key
    pub username: UserName,
    /// Optional profile field
    pub display_name: Option<String>,
}

impl Principal {
    pub fn new(username: UserName) -> Self {
        Self {
            username,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        self.display_name = (!display_name.trim().is_empty()).then_some(display_name);
        self
    }
}
