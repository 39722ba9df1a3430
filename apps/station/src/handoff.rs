//! # Share and Mail Handoff
//!
//! Passes a persisted export to something outside the station.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Handoff Collaborators                                │
//! │                                                                         │
//! │  ExportHandle { path, uri }                                            │
//! │       │                                                                 │
//! │       ├──► ShareTarget::share(ShareRequest)                            │
//! │       │        CommandShare: `<program> <path>`                        │
//! │       │                                                                 │
//! │       └──► mailto_url(..) ──► MailClient::can_open(url)?               │
//! │                                   │ yes                                 │
//! │                                   ▼                                     │
//! │                               MailClient::open(url)                    │
//! │                                   CommandMail: `<program> <url>`       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both command implementations spawn the program and return without
//! waiting for it; the station has no way to know what the user does with
//! the share dialog or the draft mail. A runtime task waits on each child
//! so finished programs do not linger as zombies.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use packlist_export::{ExportHandle, XLSX_MIME_TYPE, XLSX_UTI};
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::state::MailSettings;

/// Handoff errors.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("Sharing is unavailable: {0}")]
    ShareUnavailable(String),

    #[error("Mail is unavailable: {0}")]
    MailUnavailable(String),

    #[error("invalid mailto link: {0}")]
    Url(#[from] url::ParseError),
}

// =============================================================================
// Share
// =============================================================================

/// What the share collaborator receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub path: PathBuf,
    pub uri: String,
    pub mime_type: String,
    pub dialog_title: String,
    pub uti: String,
}

impl ShareRequest {
    /// Builds the request for a persisted export.
    pub fn for_export(handle: &ExportHandle, dialog_title: &str) -> Self {
        ShareRequest {
            path: handle.path.clone(),
            uri: handle.uri.clone(),
            mime_type: XLSX_MIME_TYPE.to_string(),
            dialog_title: dialog_title.to_string(),
            uti: XLSX_UTI.to_string(),
        }
    }
}

/// Platform share sheet.
pub trait ShareTarget: Send + Sync {
    fn share(&self, request: &ShareRequest) -> Result<(), HandoffError>;
}

/// Shares by opening the file with a program.
#[derive(Debug, Clone)]
pub struct CommandShare {
    program: String,
}

impl CommandShare {
    /// Uses `program`, or the platform opener when `None`.
    pub fn new(program: Option<String>) -> Self {
        CommandShare {
            program: program.unwrap_or_else(|| default_opener().to_string()),
        }
    }
}

impl ShareTarget for CommandShare {
    fn share(&self, request: &ShareRequest) -> Result<(), HandoffError> {
        debug!(program = %self.program, title = %request.dialog_title, "Sharing export");
        spawn_detached(&self.program, request.path.as_os_str())
            .map_err(|e| HandoffError::ShareUnavailable(format!("{}: {}", self.program, e)))?;
        info!(path = ?request.path, "Export handed to share program");
        Ok(())
    }
}

// =============================================================================
// Mail
// =============================================================================

/// Mail composer reachable through `mailto:` links.
pub trait MailClient: Send + Sync {
    /// Returns true if `url` can be opened at all.
    fn can_open(&self, url: &Url) -> bool;

    fn open(&self, url: &Url) -> Result<(), HandoffError>;
}

/// Opens `mailto:` links with a program.
#[derive(Debug, Clone)]
pub struct CommandMail {
    program: String,
}

impl CommandMail {
    /// Uses `program`, or the platform opener when `None`.
    pub fn new(program: Option<String>) -> Self {
        CommandMail {
            program: program.unwrap_or_else(|| default_opener().to_string()),
        }
    }
}

impl MailClient for CommandMail {
    fn can_open(&self, url: &Url) -> bool {
        url.scheme() == "mailto" && program_available(&self.program)
    }

    fn open(&self, url: &Url) -> Result<(), HandoffError> {
        spawn_detached(&self.program, OsStr::new(url.as_str()))
            .map_err(|e| HandoffError::MailUnavailable(format!("{}: {}", self.program, e)))?;
        info!(program = %self.program, "Mail draft opened");
        Ok(())
    }
}

/// Builds the `mailto:` link announcing an export.
///
/// Produces `mailto:<recipient>?subject=<subject>&body=<body_prefix><uri>`
/// with both values percent-encoded.
pub fn mailto_url(settings: &MailSettings, handle: &ExportHandle) -> Result<Url, HandoffError> {
    let mut url = Url::parse(&format!("mailto:{}", settings.recipient))?;
    let body = format!("{}{}", settings.body_prefix, handle.uri);
    let query = format!(
        "subject={}&body={}",
        escape_query_value(&settings.subject),
        escape_query_value(&body)
    );
    // `set_query` encodes spaces and non-ASCII but leaves query delimiters alone.
    url.set_query(Some(&query));
    Ok(url)
}

fn escape_query_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '&' => escaped.push_str("%26"),
            '=' => escaped.push_str("%3D"),
            '+' => escaped.push_str("%2B"),
            '#' => escaped.push_str("%23"),
            other => escaped.push(other),
        }
    }
    escaped
}

// =============================================================================
// Process Helpers
// =============================================================================

/// Program that opens files and URLs with the user's default application.
pub fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Starts `program arg` without waiting for it and reaps it on a runtime task.
///
/// Must be called from within the tokio runtime.
fn spawn_detached(
    program: &str,
    arg: &OsStr,
) -> std::io::Result<JoinHandle<Option<ExitStatus>>> {
    let runtime = Handle::try_current().map_err(std::io::Error::other)?;
    let mut child = Command::new(program)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let program = program.to_string();
    Ok(runtime.spawn(async move {
        match child.wait().await {
            Ok(status) => {
                debug!(%program, %status, "Handoff process exited");
                Some(status)
            }
            Err(e) => {
                warn!(%program, error = %e, "Failed to wait for handoff process");
                None
            }
        }
    }))
}

/// Returns true if `program` is a file path that exists or is found on `PATH`.
fn program_available(program: &str) -> bool {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file();
    }

    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                dir.join(program).is_file()
                    || (cfg!(windows) && dir.join(format!("{program}.exe")).is_file())
            })
        })
        .unwrap_or(false)
}

// =============================================================================
// Test Doubles
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    fn handle(uri_path: &str) -> ExportHandle {
        ExportHandle {
            path: PathBuf::from(uri_path),
            uri: format!("file://{uri_path}"),
            size_bytes: 10,
        }
    }

    #[test]
    fn test_mailto_url_default_settings() {
        let url = mailto_url(&MailSettings::default(), &handle("/tmp/cache/PackingList.xlsx")).unwrap();

        assert_eq!(
            url.as_str(),
            "mailto:youremail@example.com?subject=Packing%20List\
             &body=Here%20is%20the%20packing%20list:%20file:///tmp/cache/PackingList.xlsx"
        );
    }

    #[test]
    fn test_mailto_url_escapes_delimiters() {
        let settings = MailSettings {
            subject: "Boxes & pallets".to_string(),
            ..MailSettings::default()
        };

        let url = mailto_url(&settings, &handle("/tmp/a&b=c/PackingList.xlsx")).unwrap();
        let query = url.query().unwrap();

        assert!(query.starts_with("subject=Boxes%20%26%20pallets&body="));
        assert!(query.contains("/tmp/a%26b%3Dc/PackingList.xlsx"));
        assert_eq!(query.matches('&').count(), 1);
    }

    #[test]
    fn test_mailto_url_encodes_non_ascii() {
        let settings = MailSettings {
            subject: "Упаковка".to_string(),
            ..MailSettings::default()
        };

        let url = mailto_url(&settings, &handle("/tmp/PackingList.xlsx")).unwrap();

        assert!(url.as_str().is_ascii());
        assert!(url.query().unwrap().starts_with("subject=%D0%A3"));
    }

    #[test]
    fn test_share_request_carries_xlsx_types() {
        let request = ShareRequest::for_export(&handle("/tmp/PackingList.xlsx"), "Packing List");

        assert_eq!(request.mime_type, XLSX_MIME_TYPE);
        assert_eq!(request.uti, "com.microsoft.excel.xlsx");
        assert_eq!(request.dialog_title, "Packing List");
        assert_eq!(request.path, PathBuf::from("/tmp/PackingList.xlsx"));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let program = "/nonexistent/packlist-opener".to_string();
        let url = Url::parse("mailto:a@b.c").unwrap();

        let mail = CommandMail::new(Some(program.clone()));
        assert!(!mail.can_open(&url));
        assert!(matches!(mail.open(&url), Err(HandoffError::MailUnavailable(_))));

        let share = CommandShare::new(Some(program));
        let request = ShareRequest::for_export(&handle("/tmp/PackingList.xlsx"), "Packing List");
        assert!(matches!(share.share(&request), Err(HandoffError::ShareUnavailable(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_handoff_process_is_reaped() {
        let reaper = spawn_detached("true", OsStr::new("PackingList.xlsx")).unwrap();

        let status = reaper.await.unwrap().unwrap();

        assert!(status.success());
    }

    #[test]
    fn test_spawn_outside_runtime_fails() {
        assert!(spawn_detached("true", OsStr::new("x")).is_err());
    }

    #[test]
    fn test_mail_rejects_other_schemes() {
        let mail = CommandMail::new(Some(default_opener().to_string()));
        let url = Url::parse("https://example.com").unwrap();
        assert!(!mail.can_open(&url));
    }
}
