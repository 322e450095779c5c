//! # Route Resolution
//!
//! Maps a parsed [`Route`] to the typed [`View`] the router dispatches, together
//! with the access requirement its guard enforces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::location::{ListParams, Route, HOME_HASH};

/// Where a post list comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListSource {
    /// `#/` and `#posts`
    Latest,
    /// `#posts/by_category/<slug>`
    Category(String),
    /// `#posts/by_tag/<name>`
    Tag(String),
    /// `#posts/by_user/<username>`
    User(String),
    /// `#my-posts`
    Mine,
    /// `#saved-posts`
    Saved,
}

impl ListSource {
    /// Heading shown above the list.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Latest => "Latest Posts".to_string(),
            Self::Category(name) => format!("Posts in Category: {name}"),
            Self::Tag(name) => format!("Posts Tagged: {name}"),
            Self::User(name) => format!("Posts by User: {name}"),
            Self::Mine => "My Posts".to_string(),
            Self::Saved => "Saved Posts".to_string(),
        }
    }

    /// API path including the page window.
    #[must_use]
    pub fn endpoint(&self, params: ListParams) -> String {
        let page = params.query();
        match self {
            Self::Latest => format!("/posts/?{page}"),
            Self::Category(slug) => {
                format!("/posts/by_category/?slug={}&{page}", urlencoding::encode(slug))
            }
            Self::Tag(name) => format!("/posts/by_tag/?name={}&{page}", urlencoding::encode(name)),
            Self::User(name) => {
                format!("/posts/by_user/?username={}&{page}", urlencoding::encode(name))
            }
            Self::Mine => format!("/posts/my_posts/?{page}"),
            Self::Saved => format!("/posts/saved/?{page}"),
        }
    }

    /// Location the pagination widget links back to.
    #[must_use]
    pub fn base_url(&self) -> String {
        match self {
            Self::Latest => HOME_HASH.to_string(),
            Self::Category(name) => format!("#posts/by_category/{name}"),
            Self::Tag(name) => format!("#posts/by_tag/{name}"),
            Self::User(name) => format!("#posts/by_user/{name}"),
            Self::Mine => "#my-posts".to_string(),
            Self::Saved => "#saved-posts".to_string(),
        }
    }

    /// Whether the list request carries the auth token.
    #[must_use]
    pub fn authenticated(&self) -> bool {
        matches!(self, Self::Mine | Self::Saved)
    }
}

/// Guard a view requires before its loader runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    /// Anyone
    Public,
    /// Signed-out users only; signed-in users go home
    GuestOnly,
    /// Signed-in users only; others go to login
    Authenticated,
    /// Admins only; others go home
    Admin,
}

/// Typed dispatch target for one navigation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    /// Paginated post list
    PostList {
        /// Which list
        source: ListSource,
        /// Page window
        params: ListParams,
    },
    /// One post with its comments
    PostDetail {
        /// Post slug
        slug: String,
    },
    /// Login form
    Login,
    /// Registration form
    Register,
    /// Logout workflow; renders nothing itself
    Logout,
    /// Current user's profile
    Profile,
    /// Create (`None`) or edit (`Some(slug)`) form
    PostForm {
        /// Slug of the post being edited
        slug: Option<String>,
    },
    /// Category administration
    AdminCategories,
    /// User list
    AdminUsers(ListParams),
    /// Tag list
    AdminTags(ListParams),
    /// Redirect home once the guard has passed
    RedirectHome {
        /// Guard checked before redirecting
        access: Access,
    },
    /// Static not-found page
    NotFound,
}

impl View {
    /// Resolve a route. Never fails: unknown routes become [`View::NotFound`].
    pub fn resolve(route: &Route) -> Self {
        let params = route.list_params();
        match route.name.as_str() {
            "home" => Self::PostList {
                source: ListSource::Latest,
                params,
            },
            "posts" => Self::resolve_posts(route, params),
            "login" => Self::Login,
            "register" => Self::Register,
            "logout" => Self::Logout,
            "profile" => Self::Profile,
            "my-posts" => Self::PostList {
                source: ListSource::Mine,
                params,
            },
            "saved-posts" => Self::PostList {
                source: ListSource::Saved,
                params,
            },
            "create-post" => Self::PostForm { slug: None },
            "edit-post" => match route.param(0) {
                Some(slug) => Self::PostForm {
                    slug: Some(slug.to_string()),
                },
                None => Self::RedirectHome {
                    access: Access::Authenticated,
                },
            },
            "admin" => match route.param(0) {
                Some("categories") => Self::AdminCategories,
                Some("users") => Self::AdminUsers(params),
                Some("tags") => Self::AdminTags(params),
                _ => Self::RedirectHome {
                    access: Access::Admin,
                },
            },
            _ => Self::NotFound,
        }
    }

    fn resolve_posts(route: &Route, params: ListParams) -> Self {
        let Some(first) = route.param(0) else {
            return Self::PostList {
                source: ListSource::Latest,
                params,
            };
        };
        let source = match (first, route.param(1)) {
            ("by_category", Some(value)) => ListSource::Category(value.to_string()),
            ("by_tag", Some(value)) => ListSource::Tag(value.to_string()),
            ("by_user", Some(value)) => ListSource::User(value.to_string()),
            _ => {
                return Self::PostDetail {
                    slug: first.to_string(),
                }
            }
        };
        Self::PostList { source, params }
    }

    /// Guard this view requires.
    #[must_use]
    pub fn access(&self) -> Access {
        match self {
            Self::PostList { source, .. } if source.authenticated() => Access::Authenticated,
            Self::PostList { .. } | Self::PostDetail { .. } | Self::Logout | Self::NotFound => {
                Access::Public
            }
            Self::Login | Self::Register => Access::GuestOnly,
            Self::Profile | Self::PostForm { .. } => Access::Authenticated,
            Self::AdminCategories | Self::AdminUsers(_) | Self::AdminTags(_) => Access::Admin,
            Self::RedirectHome { access } => *access,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PostList { .. } => "post_list",
            Self::PostDetail { .. } => "post_detail",
            Self::Login => "login",
            Self::Register => "register",
            Self::Logout => "logout",
            Self::Profile => "profile",
            Self::PostForm { slug: None } => "create_post",
            Self::PostForm { slug: Some(_) } => "edit_post",
            Self::AdminCategories => "admin_categories",
            Self::AdminUsers(_) => "admin_users",
            Self::AdminTags(_) => "admin_tags",
            Self::RedirectHome { .. } => "redirect_home",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn view(hash: &str) -> View {
        match Location::parse(hash) {
            Location::Route(route) => View::resolve(&route),
            Location::SkipLink => panic!("skip link"),
        }
    }

    #[test]
    fn test_every_surfaced_route_resolves() {
        assert_eq!(view("#/").kind(), "post_list");
        assert_eq!(view("#posts/hello").kind(), "post_detail");
        assert_eq!(view("#login").kind(), "login");
        assert_eq!(view("#register").kind(), "register");
        assert_eq!(view("#logout").kind(), "logout");
        assert_eq!(view("#profile").kind(), "profile");
        assert_eq!(view("#create-post").kind(), "create_post");
        assert_eq!(view("#edit-post/hello").kind(), "edit_post");
        assert_eq!(view("#admin/categories").kind(), "admin_categories");
        assert_eq!(view("#admin/users").kind(), "admin_users");
        assert_eq!(view("#admin/tags").kind(), "admin_tags");
        assert_eq!(view("#nope").kind(), "not_found");
    }

    #[test]
    fn test_list_sources() {
        assert_eq!(
            view("#posts/by_tag/rust?offset=10"),
            View::PostList {
                source: ListSource::Tag("rust".into()),
                params: ListParams { offset: 10, limit: 10 }
            }
        );
        assert_eq!(
            view("#my-posts"),
            View::PostList {
                source: ListSource::Mine,
                params: ListParams::default()
            }
        );
        assert!(matches!(
            view("#posts"),
            View::PostList { source: ListSource::Latest, .. }
        ));
    }

    #[test]
    fn test_by_category_without_value_is_a_slug() {
        assert_eq!(
            view("#posts/by_category"),
            View::PostDetail {
                slug: "by_category".into()
            }
        );
    }

    #[test]
    fn test_access_requirements() {
        assert_eq!(view("#my-posts").access(), Access::Authenticated);
        assert_eq!(view("#saved-posts").access(), Access::Authenticated);
        assert_eq!(view("#login").access(), Access::GuestOnly);
        assert_eq!(view("#admin/users").access(), Access::Admin);
        assert_eq!(view("#admin/other").access(), Access::Admin);
        assert_eq!(view("#edit-post").access(), Access::Authenticated);
        assert_eq!(view("#posts/x").access(), Access::Public);
    }

    #[test]
    fn test_list_source_endpoints() {
        let params = ListParams { offset: 20, limit: 5 };
        assert_eq!(
            ListSource::Category("web dev".into()).endpoint(params),
            "/posts/by_category/?slug=web%20dev&limit=5&offset=20"
        );
        assert_eq!(ListSource::Latest.endpoint(params), "/posts/?limit=5&offset=20");
        assert_eq!(ListSource::Saved.base_url(), "#saved-posts");
        assert!(ListSource::Mine.authenticated());
        assert!(!ListSource::User("ada".into()).authenticated());
        assert_eq!(ListSource::User("ada".into()).title(), "Posts by User: ada");
    }
}
