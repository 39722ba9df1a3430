//! # Export Commands
//!
//! ## Export Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Share / Email Flow                                   │
//! │                                                                         │
//! │  :share / :email                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  generate_export()                                             │    │
//! │  │  1. Clone the packing list under the session lock              │    │
//! │  │  2. build_rows → serialize (lock released)                     │    │
//! │  │  3. persist to <cache>/PackingList.xlsx (async write)          │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │       │ ExportHandle { path, uri }          │ EXPORT_WRITE_FAILURE      │
//! │       ▼                                     ▼                           │
//! │  share_export: ShareTarget::share       abort, nothing handed off      │
//! │  email_export: mailto → can_open? → open                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call writes a fresh file from the current packing list; nothing is
//! reused between exports.

use packlist_export::{build_rows, persist, serialize, ExportHandle};
use tracing::{debug, info};

use crate::error::{ApiError, ErrorCode};
use crate::handoff::{mailto_url, MailClient, ShareRequest, ShareTarget};
use crate::state::{ConfigState, SessionState};

/// Writes the current packing list to the export location.
pub async fn generate_export(
    session: &SessionState,
    config: &ConfigState,
) -> Result<ExportHandle, ApiError> {
    let list = session.with_session(|s| s.packing_list().clone());
    debug!(
        boxes = list.box_count(),
        lines = list.line_count(),
        "generate_export command"
    );

    let bytes = serialize(build_rows(&list), &config.layout())?;
    let cache = config.export_cache()?;
    let handle = persist(&bytes, &cache).await?;

    info!(uri = %handle.uri, "Packing list exported");
    Ok(handle)
}

/// Exports and hands the file to the share collaborator.
pub async fn share_export(
    session: &SessionState,
    config: &ConfigState,
    target: &dyn ShareTarget,
) -> Result<ExportHandle, ApiError> {
    let handle = generate_export(session, config).await?;

    let request = ShareRequest::for_export(&handle, &config.config().share.dialog_title);
    target.share(&request)?;

    Ok(handle)
}

/// Exports and opens a mail draft that links the file.
///
/// ## Errors
/// `MAIL_UNAVAILABLE` if the mail client cannot open `mailto:` links; the
/// export file is still written.
pub async fn email_export(
    session: &SessionState,
    config: &ConfigState,
    client: &dyn MailClient,
) -> Result<ExportHandle, ApiError> {
    let handle = generate_export(session, config).await?;

    let url = mailto_url(&config.config().mail, &handle)?;
    if !client.can_open(&url) {
        return Err(ApiError::new(
            ErrorCode::MailUnavailable,
            "No mail client can open mailto: links",
        ));
    }
    client.open(&url)?;

    info!(recipient = %config.config().mail.recipient, "Mail draft requested");
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::commands::scan;
    use crate::handoff::fakes::{RecordingMail, RecordingShare};
    use crate::state::StationConfig;
    use packlist_core::DecodeEvent;
    use packlist_export::{decode, ExportRow};

    fn config_in(dir: &Path) -> ConfigState {
        let mut config = StationConfig::default();
        config.export.cache_dir = Some(dir.to_path_buf());
        ConfigState::new(config)
    }

    fn scanned_session() -> SessionState {
        let session = SessionState::default();
        scan::request_new_box(&session);
        scan::on_decode(&session, &DecodeEvent::new("WB_100")).unwrap();
        for code in ["ABC123", "ABC123", "XYZ789"] {
            scan::request_product_scan(&session);
            scan::on_decode(&session, &DecodeEvent::new(code)).unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_generate_export_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let session = scanned_session();

        let handle = generate_export(&session, &config).await.unwrap();

        assert_eq!(handle.path, tmp.path().join("PackingList.xlsx"));
        let bytes = std::fs::read(&handle.path).unwrap();
        let rows = decode(&bytes, &config.layout()).unwrap();
        assert_eq!(
            rows,
            vec![
                ExportRow {
                    barcode: "ABC123".to_string(),
                    quantity: 2,
                    box_id: "WB_100".to_string(),
                    has_marking: false,
                },
                ExportRow {
                    barcode: "XYZ789".to_string(),
                    quantity: 1,
                    box_id: "WB_100".to_string(),
                    has_marking: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_session_exports_header_only() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());

        let handle = generate_export(&SessionState::default(), &config)
            .await
            .unwrap();

        let bytes = std::fs::read(&handle.path).unwrap();
        assert!(decode(&bytes, &config.layout()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_aborts_share() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let config = config_in(&blocker);
        let share = RecordingShare::default();

        let err = share_export(&scanned_session(), &config, &share)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ExportWriteFailure);
        assert!(share.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_share_export_hands_off_request() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let share = RecordingShare::default();

        let handle = share_export(&scanned_session(), &config, &share)
            .await
            .unwrap();

        let requests = share.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, handle.path);
        assert_eq!(requests[0].dialog_title, "Packing List");
        assert_eq!(requests[0].uti, "com.microsoft.excel.xlsx");
    }

    #[tokio::test]
    async fn test_share_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let share = RecordingShare {
            unavailable: true,
            ..RecordingShare::default()
        };

        let err = share_export(&scanned_session(), &config_in(tmp.path()), &share)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ShareUnavailable);
    }

    #[tokio::test]
    async fn test_email_export_opens_mailto() {
        let tmp = tempfile::tempdir().unwrap();
        let mail = RecordingMail::new(true);

        let handle = email_export(&scanned_session(), &config_in(tmp.path()), &mail)
            .await
            .unwrap();

        let opened = mail.opened.lock().unwrap();
        assert_eq!(opened.len(), 1);
        assert!(opened[0].starts_with("mailto:youremail@example.com?subject=Packing%20List&body="));
        assert!(opened[0].ends_with("PackingList.xlsx"));
        assert!(handle.path.exists());
    }

    #[tokio::test]
    async fn test_email_without_client_still_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mail = RecordingMail::new(false);

        let err = email_export(&scanned_session(), &config_in(tmp.path()), &mail)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::MailUnavailable);
        assert!(mail.opened.lock().unwrap().is_empty());
        assert!(tmp.path().join("PackingList.xlsx").exists());
    }
}
