//! Interactive shell: one line, one navigation or user action.

use std::path::PathBuf;
use std::sync::Arc;

use quillpad_app::{
    AlertId, App, FilePart, Intent, PasswordChange, PostDraft, Registration,
};

use crate::terminal::{BufferEditorFactory, ShellLocation};

/// Shell help text.
pub const HELP: &str = "\
navigation:  go <#location> | reload
posts:       like <slug> | save <slug> | delete-post <slug>
             type <markdown> | publish <title> | update <slug> <title>
comments:    comment <text> | reply <id> <text> | open-reply <id> | cancel-reply
             delete-comment <id>
profile:     bio <text> | avatar <path> | password <current> <new> <confirm>
categories:  new-category | cancel-category | edit-category <id>
             category <name> | rename-category <id> <name> | delete-category <id>
account:     login <user> <password> | register <user> <email> <password> | logout
other:       dismiss <alert id> | help | quit";

/// Malformed shell input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    /// First word is not a command
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    /// Arguments missing or malformed
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Move to a location
    Go(String),
    /// Re-run the current location
    Reload,
    /// Replace the editor buffer
    Type(String),
    /// Upload the file at this path as the avatar
    Avatar(PathBuf),
    /// Dispatch a user action
    Act(Intent),
    /// Print help
    Help,
    /// Leave the shell
    Quit,
}

fn id(raw: Option<&str>, usage: &'static str) -> Result<i64, ShellError> {
    raw.and_then(|s| s.parse().ok()).ok_or(ShellError::Usage(usage))
}

fn text(rest: &str, usage: &'static str) -> Result<String, ShellError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ShellError::Usage(usage));
    }
    Ok(rest.to_string())
}

fn words<const N: usize>(rest: &str, usage: &'static str) -> Result<[String; N], ShellError> {
    let parts: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    parts.try_into().map_err(|_| ShellError::Usage(usage))
}

/// Split `"<word> <rest>"`.
fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    }
}

/// Parse one line. Blank lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let (command, rest) = split_word(line);
    let act = |intent: Intent| Ok(Some(ShellCommand::Act(intent)));
    match command {
        "" => Ok(None),
        "go" | "open" => {
            let hash = text(rest, "go <#location>")?;
            let hash = if hash.starts_with('#') { hash } else { format!("#{hash}") };
            Ok(Some(ShellCommand::Go(hash)))
        }
        "reload" => Ok(Some(ShellCommand::Reload)),
        "type" => Ok(Some(ShellCommand::Type(rest.to_string()))),
        "avatar" => Ok(Some(ShellCommand::Avatar(PathBuf::from(text(rest, "avatar <path>")?)))),
        "help" | "?" => Ok(Some(ShellCommand::Help)),
        "quit" | "exit" => Ok(Some(ShellCommand::Quit)),

        "like" => act(Intent::ToggleLike {
            slug: text(rest, "like <slug>")?,
        }),
        "save" => act(Intent::ToggleSave {
            slug: text(rest, "save <slug>")?,
        }),
        "delete-post" => act(Intent::DeletePost {
            slug: text(rest, "delete-post <slug>")?,
        }),
        "publish" => act(Intent::SubmitPost(PostDraft {
            title: text(rest, "publish <title>")?,
            is_published: true,
            ..PostDraft::default()
        })),
        "update" => {
            let (slug, title) = split_word(rest);
            act(Intent::SubmitPost(PostDraft {
                slug: Some(text(slug, "update <slug> <title>")?),
                title: text(title, "update <slug> <title>")?,
                is_published: true,
                ..PostDraft::default()
            }))
        }

        "comment" => act(Intent::SubmitComment {
            parent: None,
            content: rest.to_string(),
        }),
        "reply" => {
            let (target, content) = split_word(rest);
            act(Intent::SubmitComment {
                parent: Some(id(Some(target), "reply <id> <text>")?),
                content: content.to_string(),
            })
        }
        "open-reply" => act(Intent::OpenReply {
            comment_id: id(rest.split_whitespace().next(), "open-reply <id>")?,
        }),
        "cancel-reply" => act(Intent::CancelReply),
        "delete-comment" => act(Intent::DeleteComment {
            comment_id: id(rest.split_whitespace().next(), "delete-comment <id>")?,
        }),

        "bio" => act(Intent::UpdateProfile {
            bio: rest.to_string(),
        }),
        "password" => {
            let [current, new, confirm] = words(rest, "password <current> <new> <confirm>")?;
            act(Intent::ChangePassword(PasswordChange {
                current,
                new,
                confirm,
            }))
        }

        "new-category" => act(Intent::ShowCategoryForm),
        "cancel-category" => act(Intent::CancelCategoryForm),
        "edit-category" => act(Intent::EditCategory {
            id: id(rest.split_whitespace().next(), "edit-category <id>")?,
        }),
        "category" => act(Intent::SubmitCategory {
            id: None,
            name: rest.to_string(),
        }),
        "rename-category" => {
            let (target, name) = split_word(rest);
            act(Intent::SubmitCategory {
                id: Some(id(Some(target), "rename-category <id> <name>")?),
                name: name.to_string(),
            })
        }
        "delete-category" => act(Intent::DeleteCategory {
            id: id(rest.split_whitespace().next(), "delete-category <id>")?,
        }),

        "login" => {
            let [username, password] = words(rest, "login <user> <password>")?;
            act(Intent::Login { username, password })
        }
        "register" => {
            let [username, email, password] = words(rest, "register <user> <email> <password>")?;
            act(Intent::Register(Registration {
                username,
                email,
                password,
            }))
        }
        "logout" => act(Intent::Logout),
        "dismiss" => {
            let raw = rest.trim_start_matches('#');
            let alert = raw.parse().map_err(|_| ShellError::Usage("dismiss <alert id>"))?;
            act(Intent::DismissAlert(AlertId(alert)))
        }
        other => Err(ShellError::Unknown(other.to_string())),
    }
}

/// The engine plus the terminal-side handles the shell drives.
pub struct Shell {
    /// Engine
    pub app: App,
    /// Current location
    pub location: Arc<ShellLocation>,
    /// Editor buffer
    pub editor: BufferEditorFactory,
}

impl Shell {
    /// Run one command. Returns `false` when the shell should exit.
    pub async fn execute(&self, command: ShellCommand) -> anyhow::Result<bool> {
        match command {
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Go(hash) => {
                quillpad_app::HashLocation::assign(self.location.as_ref(), &hash);
                self.app.handle_location_change().await;
            }
            ShellCommand::Reload => self.app.handle_location_change().await,
            ShellCommand::Type(markdown) => self.editor.write(&markdown),
            ShellCommand::Avatar(path) => {
                let bytes = std::fs::read(&path)?;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "avatar".to_string());
                let file = FilePart {
                    content_type: guess_image_type(&file_name).map(str::to_string),
                    file_name,
                    bytes,
                };
                self.act(Intent::UploadAvatar { file: Some(file) }).await;
            }
            ShellCommand::Act(intent) => self.act(intent).await,
        }
        Ok(true)
    }

    async fn act(&self, intent: Intent) {
        if let Err(err) = self.app.dispatch(intent).await {
            // Errors with an alert level were already shown by the surface.
            if err.alert_level().is_none() {
                println!("{err}");
            }
        }
    }
}

fn guess_image_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
