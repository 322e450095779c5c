//! # Session State
//!
//! Current-user identity, role, and the permission predicates derived from them.
//!
//! The snapshot is plain data. Loading it from persisted storage and mutating it
//! on login/logout is the app layer's job; everything here is a pure function of
//! the snapshot and the record being checked.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Roles
// ============================================================================

/// User role as reported by the profile endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// May edit or delete any content
    Editor,
    /// May create posts and manage their own content
    Author,
    /// Read and comment only
    Reader,
}

impl Role {
    /// Wire/storage representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Author => "author",
            Self::Reader => "reader",
        }
    }

    /// Whether this role may edit or delete content it did not write.
    #[must_use]
    pub fn moderates_content(&self) -> bool {
        matches!(self, Self::Admin | Self::Editor)
    }

    /// Whether this role may create posts.
    #[must_use]
    pub fn can_create_posts(&self) -> bool {
        matches!(self, Self::Admin | Self::Editor | Self::Author)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "author" => Ok(Self::Author),
            "reader" => Ok(Self::Reader),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

// ============================================================================
// Author References
// ============================================================================

/// How a record names its author on the wire.
///
/// The API is inconsistent: posts carry the author's username, some payloads carry
/// a numeric id, and nested serializers embed a user object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    /// Numeric user id
    ById(i64),
    /// Username string
    ByName(String),
    /// Embedded user object; either field may be absent
    Embedded {
        /// `None` when the object has no `id` key, `Some(None)` for `"id": null`.
        /// A present key decides authorship even when null.
        #[serde(
            default,
            deserialize_with = "present_key",
            skip_serializing_if = "Option::is_none"
        )]
        id: Option<Option<i64>>,
        /// Username, if the object carries one
        #[serde(default)]
        username: Option<String>,
    },
}

fn present_key<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

/// A record whose authorship can be checked against the current user.
pub trait Authored {
    /// The record's author reference, if it carries a non-null one.
    fn author_ref(&self) -> Option<AuthorRef>;

    /// If the record is itself a user record (exposes both `id` and `username`),
    /// its id. Only consulted when [`Authored::author_ref`] is `None`.
    fn user_record_id(&self) -> Option<i64> {
        None
    }
}

// ============================================================================
// Session Snapshot
// ============================================================================

/// Read-only snapshot of the signed-in user.
///
/// `role` is only meaningful while `token` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Auth token, present when signed in
    pub token: Option<String>,
    /// Username of the signed-in user
    pub username: Option<String>,
    /// Numeric id of the signed-in user
    pub user_id: Option<i64>,
    /// Role of the signed-in user
    pub role: Option<Role>,
}

impl Session {
    /// Whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Role, masked to `None` when there is no token.
    #[must_use]
    pub fn effective_role(&self) -> Option<Role> {
        self.token.as_ref().and(self.role)
    }

    /// `role == admin`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.effective_role() == Some(Role::Admin)
    }

    /// `role ∈ {admin, editor, author}`.
    #[must_use]
    pub fn can_create_post(&self) -> bool {
        self.effective_role().is_some_and(|role| role.can_create_posts())
    }

    /// Whether the current user may edit or delete `item`.
    ///
    /// True for admins and editors, or when the item's author resolves to the
    /// current user. Without a token and a role the answer is always `false`.
    #[must_use]
    pub fn can_edit_or_delete<T: Authored + ?Sized>(&self, item: &T) -> bool {
        let Some(role) = self.effective_role() else {
            return false;
        };
        role.moderates_content() || self.is_author_of(item)
    }

    /// Resolve authorship in a fixed order:
    /// string author vs username, numeric author vs user id, embedded `id` vs
    /// user id, embedded `username` vs username, then the user-record fallback.
    /// An embedded `"id": null` still takes the id branch and never matches.
    /// Anything ambiguous resolves to not-the-author.
    #[must_use]
    pub fn is_author_of<T: Authored + ?Sized>(&self, item: &T) -> bool {
        match item.author_ref() {
            Some(AuthorRef::ByName(name)) => self.username.as_deref() == Some(name.as_str()),
            Some(AuthorRef::ById(id)) => self.user_id == Some(id),
            Some(AuthorRef::Embedded { id: Some(id), .. }) => id.is_some() && self.user_id == id,
            Some(AuthorRef::Embedded {
                id: None,
                username: Some(name),
            }) => self.username.as_deref() == Some(name.as_str()),
            Some(AuthorRef::Embedded {
                id: None,
                username: None,
            }) => false,
            None => match item.user_record_id() {
                Some(id) => self.user_id == Some(id),
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        author: Option<AuthorRef>,
        record: Option<i64>,
    }

    impl Authored for Item {
        fn author_ref(&self) -> Option<AuthorRef> {
            self.author.clone()
        }

        fn user_record_id(&self) -> Option<i64> {
            self.record
        }
    }

    fn by(author: AuthorRef) -> Item {
        Item {
            author: Some(author),
            record: None,
        }
    }

    fn session(role: Role) -> Session {
        Session {
            token: Some("tok".into()),
            username: Some("ada".into()),
            user_id: Some(7),
            role: Some(role),
        }
    }

    #[test]
    fn test_admin_can_edit_anything() {
        let item = by(AuthorRef::ByName("someone-else".into()));
        assert!(session(Role::Admin).can_edit_or_delete(&item));
        assert!(session(Role::Editor).can_edit_or_delete(&item));
    }

    #[test]
    fn test_reader_cannot_edit_foreign_item() {
        let item = by(AuthorRef::ById(99));
        assert!(!session(Role::Reader).can_edit_or_delete(&item));
    }

    #[test]
    fn test_reader_can_edit_own_item_by_each_reference_form() {
        let s = session(Role::Reader);
        assert!(s.can_edit_or_delete(&by(AuthorRef::ByName("ada".into()))));
        assert!(s.can_edit_or_delete(&by(AuthorRef::ById(7))));
        assert!(s.can_edit_or_delete(&by(AuthorRef::Embedded {
            id: Some(Some(7)),
            username: None
        })));
        assert!(s.can_edit_or_delete(&by(AuthorRef::Embedded {
            id: None,
            username: Some("ada".into())
        })));
    }

    #[test]
    fn test_embedded_id_takes_precedence_over_username() {
        let s = session(Role::Reader);
        let item = by(AuthorRef::Embedded {
            id: Some(Some(8)),
            username: Some("ada".into()),
        });
        assert!(!s.can_edit_or_delete(&item));
    }

    #[test]
    fn test_user_record_fallback_only_without_author() {
        let s = session(Role::Reader);
        let own = Item {
            author: None,
            record: Some(7),
        };
        assert!(s.can_edit_or_delete(&own));

        let shadowed = Item {
            author: Some(AuthorRef::ByName("bob".into())),
            record: Some(7),
        };
        assert!(!s.can_edit_or_delete(&shadowed));
    }

    #[test]
    fn test_ambiguous_author_fails_closed() {
        let s = session(Role::Reader);
        let empty = by(AuthorRef::Embedded {
            id: None,
            username: None,
        });
        assert!(!s.can_edit_or_delete(&empty));
        let none = Item {
            author: None,
            record: None,
        };
        assert!(!s.can_edit_or_delete(&none));
    }

    #[test]
    fn test_no_token_means_no_permissions() {
        let mut s = session(Role::Admin);
        s.token = None;
        assert!(!s.is_admin());
        assert!(!s.can_create_post());
        assert!(!s.can_edit_or_delete(&by(AuthorRef::ByName("ada".into()))));
    }

    #[test]
    fn test_create_capability_by_role() {
        assert!(session(Role::Author).can_create_post());
        assert!(!session(Role::Reader).can_create_post());
    }

    #[test]
    fn test_author_ref_wire_forms() {
        let id: AuthorRef = serde_json::from_str("3").unwrap();
        assert_eq!(id, AuthorRef::ById(3));
        let name: AuthorRef = serde_json::from_str("\"ada\"").unwrap();
        assert_eq!(name, AuthorRef::ByName("ada".into()));
        let obj: AuthorRef = serde_json::from_str(r#"{"username":"ada","avatar":"x"}"#).unwrap();
        assert_eq!(
            obj,
            AuthorRef::Embedded {
                id: None,
                username: Some("ada".into())
            }
        );
    }

    #[test]
    fn test_null_embedded_id_fails_closed() {
        let s = session(Role::Reader);
        let null_id: AuthorRef = serde_json::from_str(r#"{"id":null,"username":"ada"}"#).unwrap();
        assert_eq!(
            null_id,
            AuthorRef::Embedded {
                id: Some(None),
                username: Some("ada".into())
            }
        );
        assert!(!s.can_edit_or_delete(&by(null_id)));

        let no_id: AuthorRef = serde_json::from_str(r#"{"username":"ada"}"#).unwrap();
        assert!(s.can_edit_or_delete(&by(no_id)));

        let mut anonymous = s.clone();
        anonymous.user_id = None;
        let null_id = by(AuthorRef::Embedded {
            id: Some(None),
            username: None,
        });
        assert!(!anonymous.is_author_of(&null_id));
    }

    #[test]
    fn test_role_parsing_rejects_unknown() {
        assert_eq!("editor".parse::<Role>(), Ok(Role::Editor));
        assert!("superuser".parse::<Role>().is_err());
    }
}
