//! # Operator Notices
//!
//! Short messages shown to the operator after every action.
//!
//! | Situation                 | Title                  | Message                                              |
//! |---------------------------|------------------------|------------------------------------------------------|
//! | Box accepted              | Начата новая коробка   | Штрих-код коробки: WB_100                            |
//! |                           | Успех                  | ШК коробки отсканирован.                             |
//! | Product counted           | Успех                  | ШК продукта отсканирован.                            |
//! | Box code without prefix   | Ошибка                 | Неверный шк код.                                     |
//! | Product before any box    | Ошибка                 | Начните новую коробку перед сканированием продукта.  |
//! | Any other failure         | Ошибка                 | error message                                        |

use std::fmt;
use std::io::Write;

use packlist_core::{ScanMode, ScanOutcome, SessionSummary};
use packlist_export::ExportHandle;
use serde::Serialize;

use crate::error::{ApiError, ErrorCode};

const TITLE_SUCCESS: &str = "Успех";
const TITLE_ERROR: &str = "Ошибка";
const TITLE_PACKING_LIST: &str = "Packing List";

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One message for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Notices for a decode outcome. Ignored events produce none.
    pub fn for_outcome(outcome: &ScanOutcome) -> Vec<Notice> {
        match outcome {
            ScanOutcome::Ignored(_) => Vec::new(),
            ScanOutcome::BoxStarted { box_id } => vec![
                Notice::new(
                    NoticeLevel::Success,
                    "Начата новая коробка",
                    format!("Штрих-код коробки: {}", box_id),
                ),
                Notice::new(NoticeLevel::Success, TITLE_SUCCESS, "ШК коробки отсканирован."),
            ],
            ScanOutcome::ProductCounted { .. } => vec![Notice::new(
                NoticeLevel::Success,
                TITLE_SUCCESS,
                "ШК продукта отсканирован.",
            )],
        }
    }

    /// Notice for a failed command.
    pub fn for_error(err: &ApiError) -> Notice {
        let message = match err.code {
            ErrorCode::InvalidBoxCode => "Неверный шк код.".to_string(),
            ErrorCode::NoActiveBox => {
                "Начните новую коробку перед сканированием продукта.".to_string()
            }
            _ => err.message.clone(),
        };
        Notice::new(NoticeLevel::Error, TITLE_ERROR, message)
    }

    /// Confirms an operator action that armed the scanner.
    pub fn armed(label: &str, mode: ScanMode) -> Notice {
        Notice::new(NoticeLevel::Info, label, format!("mode: {}", mode))
    }

    /// Export written and handed off.
    pub fn export_ready(handle: &ExportHandle) -> Notice {
        Notice::new(NoticeLevel::Info, TITLE_PACKING_LIST, handle.uri.clone())
    }

    /// Session overview.
    pub fn summary(summary: &SessionSummary) -> Notice {
        Notice::new(
            NoticeLevel::Info,
            TITLE_PACKING_LIST,
            format!(
                "box: {} | mode: {} | boxes: {} | lines: {} | units: {}",
                summary.current_box.as_deref().unwrap_or("-"),
                summary.mode,
                summary.box_count,
                summary.product_lines,
                summary.total_units
            ),
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.title, self.message)
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Delivers notices to the operator.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Prints one notice per line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", notice) {
            tracing::warn!("Failed to print notice: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use super::*;

    /// Keeps every notice for inspection.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        pub notices: Mutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.notices
                .lock()
                .unwrap()
                .iter()
                .map(|n| n.message.clone())
                .collect()
        }

        pub fn last(&self) -> Option<Notice> {
            self.notices.lock().unwrap().last().cloned()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: &Notice) {
            self.notices.lock().unwrap().push(notice.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packlist_core::IgnoreReason;

    #[test]
    fn test_box_started_notices() {
        let notices = Notice::for_outcome(&ScanOutcome::BoxStarted {
            box_id: "WB_100".to_string(),
        });

        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].title, "Начата новая коробка");
        assert_eq!(notices[0].message, "Штрих-код коробки: WB_100");
        assert_eq!(notices[1].to_string(), "[Успех] ШК коробки отсканирован.");
    }

    #[test]
    fn test_product_and_ignored_notices() {
        let counted = Notice::for_outcome(&ScanOutcome::ProductCounted {
            box_id: "WB_100".to_string(),
            barcode: "ABC123".to_string(),
            quantity: 1,
            first_in_box: true,
        });
        assert_eq!(
            counted,
            vec![Notice::new(NoticeLevel::Success, "Успех", "ШК продукта отсканирован.")]
        );

        assert!(Notice::for_outcome(&ScanOutcome::Ignored(IgnoreReason::Disarmed)).is_empty());
        assert!(
            Notice::for_outcome(&ScanOutcome::Ignored(IgnoreReason::BoxCodeDuringProductScan))
                .is_empty()
        );
    }

    #[test]
    fn test_error_notices_use_operator_texts() {
        let invalid = Notice::for_error(&ApiError::new(ErrorCode::InvalidBoxCode, "raw"));
        assert_eq!(invalid.level, NoticeLevel::Error);
        assert_eq!(invalid.title, "Ошибка");
        assert_eq!(invalid.message, "Неверный шк код.");

        let no_box = Notice::for_error(&ApiError::new(ErrorCode::NoActiveBox, "raw"));
        assert_eq!(no_box.message, "Начните новую коробку перед сканированием продукта.");

        let other = Notice::for_error(&ApiError::new(ErrorCode::ExportWriteFailure, "disk full"));
        assert_eq!(other.message, "disk full");
    }
}
