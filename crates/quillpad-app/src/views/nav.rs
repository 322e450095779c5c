//! Navigation bar model and active-link matching.

use serde::{Deserialize, Serialize};

use quillpad_core::location::{base_hash, HOME_HASH};
use quillpad_core::Session;

/// Label of the account group when the username is unknown.
pub const ACCOUNT_LABEL: &str = "Account";

/// A single navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Text
    pub label: String,
    /// Hash location
    pub href: String,
}

impl NavLink {
    fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Top-level entry of the bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavItem {
    /// Plain link
    Link(NavLink),
    /// Dropdown group
    Group {
        /// Toggle text
        label: String,
        /// Links inside the group
        links: Vec<NavLink>,
    },
}

/// The highlighted link and, if it sits in a group, that group's label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveNav {
    /// Highlighted link target
    pub href: String,
    /// Enclosing group label
    pub group: Option<String>,
}

/// Navigation bar built from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavBar {
    /// Entries, left to right
    pub items: Vec<NavItem>,
}

impl NavBar {
    /// Bar for the given session.
    #[must_use]
    pub fn for_session(session: &Session) -> Self {
        let mut items = vec![NavItem::Link(NavLink::new("Home", HOME_HASH))];
        if session.is_authenticated() {
            items.push(NavItem::Link(NavLink::new("My Posts", "#my-posts")));
            if session.can_create_post() {
                items.push(NavItem::Link(NavLink::new("Create Post", "#create-post")));
            }
            items.push(NavItem::Link(NavLink::new("Saved", "#saved-posts")));
            if session.is_admin() {
                items.push(NavItem::Group {
                    label: "Admin".into(),
                    links: vec![
                        NavLink::new("Categories", "#admin/categories"),
                        NavLink::new("Users", "#admin/users"),
                        NavLink::new("Tags", "#admin/tags"),
                    ],
                });
            }
            items.push(NavItem::Group {
                label: session
                    .username
                    .clone()
                    .unwrap_or_else(|| ACCOUNT_LABEL.to_string()),
                links: vec![
                    NavLink::new("Profile", "#profile"),
                    NavLink::new("Logout", "#logout"),
                ],
            });
        } else {
            items.push(NavItem::Link(NavLink::new("Login", "#login")));
            items.push(NavItem::Link(NavLink::new("Register", "#register")));
        }
        Self { items }
    }

    /// Links in display order with their group label.
    fn links(&self) -> impl Iterator<Item = (&NavLink, Option<&str>)> {
        self.items.iter().flat_map(|item| match item {
            NavItem::Link(link) => vec![(link, None)],
            NavItem::Group { label, links } => links
                .iter()
                .map(|link| (link, Some(label.as_str())))
                .collect::<Vec<_>>(),
        })
    }

    fn first_match<F>(&self, predicate: F) -> Option<ActiveNav>
    where
        F: Fn(&str) -> bool,
    {
        self.links()
            .find(|(link, _)| predicate(&link.href))
            .map(|(link, group)| ActiveNav {
                href: link.href.clone(),
                group: group.map(str::to_string),
            })
    }

    /// Link to highlight for `hash`.
    ///
    /// Exact match on the hash without its query; then the route's base
    /// (`#route`); then any link under it (`#route/...`); finally the home link
    /// for the root and empty hashes.
    #[must_use]
    pub fn active_for(&self, hash: &str) -> Option<ActiveNav> {
        let current = base_hash(hash);
        if let Some(active) = self.first_match(|href| href == current) {
            return Some(active);
        }

        let route = current
            .strip_prefix('#')
            .unwrap_or(current)
            .split('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("home");
        let base_route = format!("#{route}");
        let prefix = format!("{base_route}/");
        if let Some(active) = self
            .first_match(|href| href == base_route)
            .or_else(|| self.first_match(|href| href.starts_with(&prefix)))
        {
            return Some(active);
        }

        if current == HOME_HASH || current == "#" || current.is_empty() {
            return self.first_match(|href| href == HOME_HASH);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillpad_core::Role;

    fn admin() -> Session {
        Session {
            token: Some("t".into()),
            username: Some("root".into()),
            user_id: Some(1),
            role: Some(Role::Admin),
        }
    }

    #[test]
    fn test_signed_out_bar() {
        let bar = NavBar::for_session(&Session::default());
        let hrefs: Vec<_> = bar.links().map(|(l, _)| l.href.clone()).collect();
        assert_eq!(hrefs, vec!["#/", "#login", "#register"]);
    }

    #[test]
    fn test_reader_has_no_create_or_admin() {
        let mut session = admin();
        session.role = Some(Role::Reader);
        let bar = NavBar::for_session(&session);
        assert!(bar.links().all(|(l, _)| l.href != "#create-post"));
        assert!(bar.links().all(|(_, g)| g != Some("Admin")));
    }

    #[test]
    fn test_exact_match_ignores_query() {
        let bar = NavBar::for_session(&admin());
        let active = bar.active_for("#my-posts?offset=10").unwrap();
        assert_eq!(active.href, "#my-posts");
        assert_eq!(active.group, None);
    }

    #[test]
    fn test_group_link_marks_group() {
        let bar = NavBar::for_session(&admin());
        let active = bar.active_for("#admin/users").unwrap();
        assert_eq!(active.group.as_deref(), Some("Admin"));
    }

    #[test]
    fn test_prefix_fallback() {
        let bar = NavBar::for_session(&admin());
        let active = bar.active_for("#admin/unknown").unwrap();
        assert_eq!(active.href, "#admin/categories");
    }

    #[test]
    fn test_home_fallback_and_no_match() {
        let bar = NavBar::for_session(&Session::default());
        assert_eq!(bar.active_for("").unwrap().href, "#/");
        assert_eq!(bar.active_for("#").unwrap().href, "#/");
        assert_eq!(bar.active_for("#posts/hello"), None);
    }
}
