//! The resolved caller of a request.

use dora_patisserie_core::{UserId, UserRole};

use super::Profile;

/// The identity of the calling request, resolved from the session plus a
/// profile lookup. Components dispatch on the variant instead of comparing
/// role strings.
#[derive(Debug, Clone)]
pub enum Identity {
    /// No session, or a session with no live account behind it.
    Anonymous,
    /// Authenticated account with the customer role.
    Customer(Profile),
    /// Authenticated account with the owner role.
    Owner(Profile),
}

impl Identity {
    /// Classify a profile into the matching identity variant.
    #[must_use]
    pub fn from_profile(profile: Profile) -> Self {
        match profile.role {
            UserRole::Owner => Self::Owner(profile),
            UserRole::Customer => Self::Customer(profile),
        }
    }

    /// The authenticated user's id, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Customer(profile) | Self::Owner(profile) => Some(profile.id),
        }
    }

    /// Whether the caller is authenticated at all.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    /// Whether the caller holds the owner role.
    #[must_use]
    pub const fn is_owner(&self) -> bool {
        matches!(self, Self::Owner(_))
    }
}
