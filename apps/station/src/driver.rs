//! # Station Driver
//!
//! Reads operator input and decode events line by line and dispatches them
//! to the commands, strictly one at a time in arrival order.
//!
//! ## Input Lines
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Line                                   │  Meaning                      │
//! │  ─────────────────────────────────────  │  ───────────────────────────  │
//! │  {"type":"code128","data":"WB_100"}     │  decode event                 │
//! │  ABC123                                 │  decode event (keyboard wedge)│
//! │  :new-box                               │  "Новая коробка" button       │
//! │  :scan-item                             │  "Сканировать товар" button   │
//! │  :share                                 │  "Поделиться" button          │
//! │  :email                                 │  "Отправить по Email" button  │
//! │  :status                                │  session summary              │
//! │  :config                                │  effective configuration      │
//! │  :quit                                  │  stop reading                 │
//! │  (blank)                                │  skipped                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use packlist_core::{DecodeEvent, ScanSession};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::commands::{config, export, scan};
use crate::error::ApiError;
use crate::handoff::{CommandMail, CommandShare, MailClient, ShareTarget};
use crate::notice::{ConsoleNotifier, Notice, NoticeLevel, Notifier};
use crate::state::{ConfigState, SessionState};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Decode(DecodeEvent),
    NewBox,
    ScanItem,
    Share,
    Email,
    Status,
    Config,
    Quit,
}

/// Whether the loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Input>, ApiError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Some(action) = trimmed.strip_prefix(':') {
        let input = match action {
            "new-box" => Input::NewBox,
            "scan-item" => Input::ScanItem,
            "share" => Input::Share,
            "email" => Input::Email,
            "status" => Input::Status,
            "config" => Input::Config,
            "quit" | "q" => Input::Quit,
            other => return Err(ApiError::validation(format!("Unknown action ':{}'", other))),
        };
        return Ok(Some(input));
    }

    if trimmed.starts_with('{') {
        let event: DecodeEvent = serde_json::from_str(trimmed)
            .map_err(|e| ApiError::validation(format!("Malformed decode event: {}", e)))?;
        return Ok(Some(Input::Decode(event)));
    }

    Ok(Some(Input::Decode(DecodeEvent::new(line))))
}

// =============================================================================
// Station
// =============================================================================

/// State plus collaborators, wired for the loop.
pub struct Station {
    session: SessionState,
    config: ConfigState,
    share: Arc<dyn ShareTarget>,
    mail: Arc<dyn MailClient>,
    notifier: Arc<dyn Notifier>,
}

impl Station {
    pub fn new(
        session: SessionState,
        config: ConfigState,
        share: Arc<dyn ShareTarget>,
        mail: Arc<dyn MailClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Station {
            session,
            config,
            share,
            mail,
            notifier,
        }
    }

    /// Builds a station with a fresh session, the command handoffs and the
    /// console notifier.
    pub fn from_config(config: ConfigState) -> Result<Self, ApiError> {
        let session = ScanSession::with_rules(config.scan_rules()?, config.marking_detector());
        let settings = config.config();
        let share = Arc::new(CommandShare::new(settings.share.program.clone()));
        let mail = Arc::new(CommandMail::new(settings.mail.program.clone()));

        Ok(Station::new(
            SessionState::new(session),
            config,
            share,
            mail,
            Arc::new(ConsoleNotifier),
        ))
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Parses and handles one line.
    pub async fn handle_line(&self, line: &str) -> Flow {
        match parse_line(line) {
            Ok(Some(input)) => self.handle(input).await,
            Ok(None) => Flow::Continue,
            Err(err) => {
                self.report(&err);
                Flow::Continue
            }
        }
    }

    /// Handles one input and notifies the operator of the result.
    pub async fn handle(&self, input: Input) -> Flow {
        debug!(?input, "Handling input");

        let result = match input {
            Input::Quit => return Flow::Quit,
            Input::NewBox => {
                let mode = scan::request_new_box(&self.session);
                Ok(vec![Notice::armed("Новая коробка", mode)])
            }
            Input::ScanItem => {
                let mode = scan::request_product_scan(&self.session);
                Ok(vec![Notice::armed("Сканировать товар", mode)])
            }
            Input::Decode(event) => {
                scan::on_decode(&self.session, &event).map(|outcome| Notice::for_outcome(&outcome))
            }
            Input::Share => export::share_export(&self.session, &self.config, self.share.as_ref())
                .await
                .map(|handle| vec![Notice::export_ready(&handle)]),
            Input::Email => export::email_export(&self.session, &self.config, self.mail.as_ref())
                .await
                .map(|handle| vec![Notice::export_ready(&handle)]),
            Input::Status => Ok(vec![Notice::summary(&scan::get_summary(&self.session))]),
            Input::Config => toml::to_string_pretty(&config::get_config(&self.config))
                .map(|text| vec![Notice::new(NoticeLevel::Info, "station.toml", text)])
                .map_err(|e| ApiError::internal(e.to_string())),
        };

        match result {
            Ok(notices) => {
                for notice in &notices {
                    self.notifier.notify(notice);
                }
            }
            Err(err) => self.report(&err),
        }

        Flow::Continue
    }

    fn report(&self, err: &ApiError) {
        warn!(code = ?err.code, "{}", err.message);
        self.notifier.notify(&Notice::for_error(err));
    }
}

/// Reads lines until end of input or `:quit`.
pub async fn run_loop<R>(station: &Station, reader: R) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if station.handle_line(&line).await == Flow::Quit {
            info!("Quit requested");
            break;
        }
    }
    Ok(())
}
