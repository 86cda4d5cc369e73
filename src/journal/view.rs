use serde::Serialize;

use crate::db::AttachmentManager;
use crate::models::TradeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// One-line message shown above the journal after an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// A journal row as displayed: the record plus whether its screenshot can
/// actually be shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeView {
    #[serde(flatten)]
    pub record: TradeRecord,
    pub has_screenshot: bool,
}

impl TradeView {
    pub fn new(record: &TradeRecord, attachments: &AttachmentManager) -> Self {
        Self {
            has_screenshot: attachments.exists(record.screenshot_path.as_deref()),
            record: record.clone(),
        }
    }
}

/// Everything the list view needs after an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub notices: Vec<Notice>,
    pub trades: Vec<TradeView>,
}

impl RenderModel {
    pub fn build(records: &[TradeRecord], attachments: &AttachmentManager, notices: Vec<Notice>) -> Self {
        Self {
            notices,
            trades: records
                .iter()
                .map(|r| TradeView::new(r, attachments))
                .collect(),
        }
    }
}
