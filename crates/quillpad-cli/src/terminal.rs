//! Plain-text surface, location and editor for the terminal.

use parking_lot::Mutex;
use std::io::{BufRead, Write};
use std::sync::Arc;

use quillpad_app::views::{
    ActiveNav, CategoryForm, CommentView, CommentsView, FooterView, FormStatus, NavBar, NavItem,
    PostSummary,
};
use quillpad_app::{
    Alert, AlertId, EditorError, EditorFactory, HashLocation, RegionPatch, RichEditor, Surface,
    ViewContent,
};
use quillpad_core::PageWindow;

// ============================================================================
// Rendering
// ============================================================================

fn card_lines(out: &mut Vec<String>, post: &PostSummary) {
    let mut flags = Vec::new();
    if post.liked {
        flags.push("liked");
    }
    if post.saved {
        flags.push("saved");
    }
    out.push(format!(
        "* {} [{}] by {} ({} likes){}",
        post.title,
        post.slug,
        post.author,
        post.like_count,
        if flags.is_empty() {
            String::new()
        } else {
            format!(" <{}>", flags.join(", "))
        }
    ));
    out.push(format!("    {}", post.excerpt));
}

fn pagination_line(out: &mut Vec<String>, window: Option<&PageWindow>) {
    if let Some(window) = window {
        let pages: Vec<String> = window
            .window()
            .iter()
            .map(|page| {
                if *page == window.current_page {
                    format!("[{page}]")
                } else {
                    page.to_string()
                }
            })
            .collect();
        out.push(format!(
            "page {} of {}: {}",
            window.current_page,
            window.total_pages,
            pages.join(" ")
        ));
    }
}

fn comment_lines(out: &mut Vec<String>, comment: &CommentView) {
    let mut stack = vec![(comment, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        out.push(format!(
            "{}- #{} {}: {}",
            "  ".repeat(depth),
            node.id,
            node.author,
            node.content_html.trim()
        ));
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
}

fn comments_lines(out: &mut Vec<String>, comments: &CommentsView) {
    match comments {
        CommentsView::Loading => out.push("Loading comments...".into()),
        CommentsView::Failed(message) => out.push(message.clone()),
        CommentsView::Loaded { comments, count, .. } => {
            out.push(format!("Comments ({count})"));
            if comments.is_empty() {
                out.push("No comments yet.".into());
            }
            for comment in comments {
                comment_lines(out, comment);
            }
        }
    }
}

/// Text lines for a main-region render.
#[must_use]
pub fn render_lines(content: &ViewContent) -> Vec<String> {
    let mut out = Vec::new();
    match content {
        ViewContent::Empty => {}
        ViewContent::Loading(label) | ViewContent::Error(label) => out.push(label.clone()),
        ViewContent::PostList(list) => {
            out.push(format!("== {} ==", list.title));
            if list.posts.is_empty() {
                out.push("No posts found.".into());
            }
            for post in &list.posts {
                card_lines(&mut out, post);
            }
            pagination_line(&mut out, list.pagination.as_ref());
        }
        ViewContent::PostDetail(detail) => {
            card_lines(&mut out, &detail.summary);
            out.push(detail.content_html.trim().to_string());
            comments_lines(&mut out, &detail.comments);
        }
        ViewContent::LoginForm => out.push("Login: `login <username> <password>`".into()),
        ViewContent::RegisterForm => {
            out.push("Register: `register <username> <email> <password>`".into());
        }
        ViewContent::Profile(profile) => {
            let user = &profile.user;
            out.push(format!("== {} ==", user.username.as_deref().unwrap_or("?")));
            out.push(format!("email: {}", user.email.as_deref().unwrap_or("-")));
            out.push(format!("role: {}", user.role.as_deref().unwrap_or("-")));
            out.push(format!("bio: {}", user.bio.as_deref().unwrap_or("")));
        }
        ViewContent::PostForm(form) => {
            out.push(format!("== {} ==", form.heading));
            match &form.status {
                FormStatus::Loading => out.push("Loading form...".into()),
                FormStatus::Failed(message) => out.push(message.clone()),
                FormStatus::Ready => out.push(format!(
                    "{} categories, {} tags. `type <markdown>` then `publish <title>`",
                    form.categories.len(),
                    form.tags.len()
                )),
            }
        }
        ViewContent::CategoryAdmin(admin) => {
            out.push("== Categories ==".into());
            for category in &admin.categories {
                out.push(format!("* {} ({})", category.name, category.id));
            }
            if let CategoryForm::Open { editing } = &admin.form {
                out.push(match editing {
                    Some(category) => format!("editing {}", category.name),
                    None => "new category".into(),
                });
            }
        }
        ViewContent::UserAdmin(admin) => {
            out.push("== Users ==".into());
            for user in &admin.users {
                out.push(format!(
                    "* {} ({})",
                    user.username.as_deref().unwrap_or("?"),
                    user.role.as_deref().unwrap_or("-")
                ));
            }
            pagination_line(&mut out, admin.pagination.as_ref());
        }
        ViewContent::TagAdmin(admin) => {
            out.push("== Tags ==".into());
            for tag in &admin.tags {
                out.push(format!("* {}", tag.name));
            }
            pagination_line(&mut out, admin.pagination.as_ref());
        }
        ViewContent::NotFound => out.push("404 - Page not found.".into()),
    }
    out
}

fn patch_lines(patch: &RegionPatch) -> Vec<String> {
    let mut out = Vec::new();
    match patch {
        RegionPatch::Comments(comments) => comments_lines(&mut out, comments),
        RegionPatch::Like {
            slug,
            liked,
            like_count,
        } => out.push(format!("[{slug}] liked={liked} ({like_count} likes)")),
        RegionPatch::Saved { slug, saved: true } => out.push(format!("[{slug}] saved")),
        RegionPatch::RemovePost { slug } => out.push(format!("[{slug}] removed")),
        RegionPatch::PostForm(form) => {
            out.extend(render_lines(&ViewContent::PostForm(form.clone())));
        }
        RegionPatch::EditorUnavailable(message) => out.push(message.clone()),
        RegionPatch::Profile(profile) => {
            out.extend(render_lines(&ViewContent::Profile(profile.clone())));
        }
        RegionPatch::ReplyForm { open: Some(id) } => out.push(format!("replying to #{id}")),
        _ => {}
    }
    out
}

fn nav_line(nav: &NavBar) -> String {
    let labels: Vec<String> = nav
        .items
        .iter()
        .map(|item| match item {
            NavItem::Link(link) => link.label.clone(),
            NavItem::Group { label, links } => {
                let inner: Vec<&str> = links.iter().map(|l| l.label.as_str()).collect();
                format!("{label}[{}]", inner.join("|"))
            }
        })
        .collect();
    format!("nav: {}", labels.join(" · "))
}

// ============================================================================
// Surface
// ============================================================================

/// [`Surface`] writing plain text to a writer and reading confirmations from
/// stdin.
pub struct TerminalSurface<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalSurface<W> {
    /// Surface writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn write_lines(&self, lines: &[String]) {
        let mut out = self.out.lock();
        for line in lines {
            if let Err(err) = writeln!(out, "{line}") {
                tracing::warn!(error = %err, "Terminal write failed");
                return;
            }
        }
        let _ = out.flush();
    }
}

impl<W: Write + Send> Surface for TerminalSurface<W> {
    fn render(&self, content: ViewContent) {
        self.write_lines(&render_lines(&content));
    }

    fn patch(&self, patch: RegionPatch) {
        self.write_lines(&patch_lines(&patch));
    }

    fn show_alert(&self, alert: &Alert) {
        self.write_lines(&[format!(
            "[{}] {} (#{})",
            alert.level, alert.message, alert.id.0
        )]);
    }

    fn dismiss_alert(&self, _id: AlertId) {}

    fn clear_alerts(&self) {}

    fn render_nav(&self, nav: &NavBar) {
        self.write_lines(&[nav_line(nav)]);
    }

    fn set_active_nav(&self, active: Option<&ActiveNav>) {
        if let Some(active) = active {
            tracing::debug!(href = %active.href, "Active link");
        }
    }

    fn render_footer(&self, footer: &FooterView) {
        let mut lines = vec!["--".to_string()];
        let recent: Vec<&str> = footer
            .recent_posts
            .iter()
            .map(|post| post.slug.as_str())
            .collect();
        lines.push(format!("recent: {}", recent.join(", ")));
        let tags: Vec<&str> = footer.popular_tags.iter().map(|t| t.name.as_str()).collect();
        lines.push(format!("tags: {}", tags.join(", ")));
        if let Some(stats) = &footer.stats {
            lines.push(format!(
                "{} posts, {} comments",
                stats.total_posts.unwrap_or_default(),
                stats.total_comments.unwrap_or_default()
            ));
        }
        self.write_lines(&lines);
    }

    fn focus_main_content(&self) {}

    fn confirm(&self, prompt: &str) -> bool {
        self.write_lines(&[format!("{prompt} [y/N]")]);
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(err) => {
                tracing::warn!(error = %err, "Could not read confirmation");
                false
            }
        }
    }
}

// ============================================================================
// Location and Editor
// ============================================================================

/// Location held in memory for the session.
#[derive(Debug, Default)]
pub struct ShellLocation(Mutex<String>);

impl ShellLocation {
    /// Location starting at `hash`.
    pub fn at(hash: &str) -> Self {
        Self(Mutex::new(hash.to_string()))
    }
}

impl HashLocation for ShellLocation {
    fn current(&self) -> String {
        self.0.lock().clone()
    }

    fn assign(&self, hash: &str) {
        *self.0.lock() = hash.to_string();
    }
}

/// Editors backed by one shared text buffer the shell writes into.
#[derive(Debug, Default, Clone)]
pub struct BufferEditorFactory {
    buffer: Arc<Mutex<String>>,
}

impl BufferEditorFactory {
    /// Replace the buffer contents.
    pub fn write(&self, markdown: &str) {
        *self.buffer.lock() = markdown.to_string();
    }
}

struct BufferEditor {
    buffer: Arc<Mutex<String>>,
}

impl RichEditor for BufferEditor {
    fn markdown(&self) -> String {
        self.buffer.lock().clone()
    }

    fn destroy(&mut self) -> Result<(), EditorError> {
        Ok(())
    }
}

impl EditorFactory for BufferEditorFactory {
    fn create(&self, initial_content: &str) -> Result<Box<dyn RichEditor>, EditorError> {
        *self.buffer.lock() = initial_content.to_string();
        Ok(Box::new(BufferEditor {
            buffer: self.buffer.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillpad_app::views::PostListView;

    #[test]
    fn test_empty_list_says_so() {
        let lines = render_lines(&ViewContent::PostList(PostListView {
            title: "Latest Posts".into(),
            posts: vec![],
            pagination: None,
        }));
        assert_eq!(lines, vec!["== Latest Posts ==", "No posts found."]);
    }

    #[test]
    fn test_surface_writes_alerts() {
        let surface = TerminalSurface::new(Vec::new());
        surface.show_alert(&Alert {
            id: AlertId(3),
            level: quillpad_app::AlertLevel::Danger,
            message: "Error 500: Internal Server Error".into(),
        });
        let written = String::from_utf8(surface.out.lock().clone()).unwrap();
        assert!(written.contains("Error 500"));
        assert!(written.contains("#3"));
    }

    #[test]
    fn test_buffer_editor_reads_shell_writes() {
        let factory = BufferEditorFactory::default();
        let editor = factory.create("draft").unwrap();
        assert_eq!(editor.markdown(), "draft");
        factory.write("# Final");
        assert_eq!(editor.markdown(), "# Final");
    }

    fn comment(id: i64, children: Vec<CommentView>) -> CommentView {
        CommentView {
            id,
            author: "ada".into(),
            avatar_url: None,
            content_html: format!("<p>c{id}</p>\n"),
            created_at: None,
            can_reply: true,
            can_delete: false,
            children,
        }
    }

    #[test]
    fn test_comments_indent_by_depth() {
        let mut lines = Vec::new();
        comments_lines(
            &mut lines,
            &CommentsView::Loaded {
                post_id: 1,
                comments: vec![
                    comment(1, vec![comment(2, vec![comment(3, vec![])]), comment(4, vec![])]),
                    comment(5, vec![]),
                ],
                count: 5,
                can_comment: true,
            },
        );
        assert_eq!(
            lines,
            vec![
                "Comments (5)",
                "- #1 ada: <p>c1</p>",
                "  - #2 ada: <p>c2</p>",
                "    - #3 ada: <p>c3</p>",
                "  - #4 ada: <p>c4</p>",
                "- #5 ada: <p>c5</p>",
            ]
        );
    }

    #[test]
    fn test_deep_reply_chain_renders() {
        const DEPTH: i64 = 3_000;
        let mut chain = comment(DEPTH - 1, vec![]);
        for id in (0..DEPTH - 1).rev() {
            chain = comment(id, vec![chain]);
        }
        let mut lines = Vec::new();
        comment_lines(&mut lines, &chain);
        assert_eq!(lines.len(), DEPTH as usize);
        assert!(lines[2].starts_with("    - #2 "));
    }
}
