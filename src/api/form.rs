use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;

use axum::extract::Multipart;

use crate::errors::{AppError, JournalError};
use crate::journal::Upload;
use crate::models::{
    ExecutionGrade, MarketBias, NewTrade, NewsImpact, Session, TradeResult, TradeType,
};

/// Multipart part carrying the screenshot file.
pub const SCREENSHOT_FIELD: &str = "screenshot";

/// Drain a multipart journal form into a typed submission.
pub async fn read_submission(
    mut multipart: Multipart,
) -> Result<(NewTrade, Option<Upload>), AppError> {
    let mut fields = HashMap::new();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == SCREENSHOT_FIELD {
            let extension = field
                .file_name()
                .and_then(|n| Path::new(n).extension())
                .and_then(|e| e.to_str())
                .map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read screenshot: {e}")))?;

            // An empty file input still posts a part.
            if !bytes.is_empty() {
                upload = Some(Upload {
                    bytes: bytes.to_vec(),
                    extension,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read field '{name}': {e}")))?;
            fields.insert(name, value);
        }
    }

    let trade = parse_fields(&fields)?;
    Ok((trade, upload))
}

/// Build a `NewTrade` from raw form values keyed by field name.
///
/// Choices must match a dropdown label exactly. Blank numeric inputs are
/// zero and a blank confidence is 1, the form's defaults. Trade id presence
/// is checked by the journal itself.
pub fn parse_fields(fields: &HashMap<String, String>) -> Result<NewTrade, JournalError> {
    Ok(NewTrade {
        trade_id: text(fields, "trade_id"),
        market_bias: choice(fields, "market_bias", MarketBias::from_label, MarketBias::ALL)?,
        trade_type: choice(fields, "trade_type", TradeType::from_label, TradeType::ALL)?,
        setup: text(fields, "setup"),
        entry_price: number(fields, "entry_price")?,
        exit_price: number(fields, "exit_price")?,
        stop_loss: number(fields, "stop_loss")?,
        take_profit: number(fields, "take_profit")?,
        lot_size: number(fields, "lot_size")?,
        risk: text(fields, "risk"),
        reward: text(fields, "reward"),
        result: choice(fields, "result", TradeResult::from_label, TradeResult::ALL)?,
        profit_loss: number(fields, "profit_loss")?,
        r_multiple: number(fields, "r_multiple")?,
        emotion_before: text(fields, "emotion_before"),
        emotion_during: text(fields, "emotion_during"),
        emotion_after: text(fields, "emotion_after"),
        execution_grade: choice(
            fields,
            "execution_grade",
            ExecutionGrade::from_label,
            ExecutionGrade::ALL,
        )?,
        mistake: text(fields, "mistake"),
        lesson: text(fields, "lesson"),
        action_plan: text(fields, "action_plan"),
        session: choice(fields, "session", Session::from_label, Session::ALL)?,
        news_impact: choice(fields, "news_impact", NewsImpact::from_label, NewsImpact::ALL)?,
        slippage: text(fields, "slippage"),
        volatility: text(fields, "volatility"),
        market_conditions: text(fields, "market_conditions"),
        time_in_trade: text(fields, "time_in_trade"),
        confidence: confidence(fields)?,
    })
}

fn text(fields: &HashMap<String, String>, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

fn choice<T: Display>(
    fields: &HashMap<String, String>,
    name: &str,
    parse: fn(&str) -> Option<T>,
    all: &[T],
) -> Result<T, JournalError> {
    let raw = fields
        .get(name)
        .ok_or_else(|| JournalError::Validation(format!("{name} is required")))?;

    parse(raw).ok_or_else(|| {
        let options: Vec<String> = all.iter().map(|o| o.to_string()).collect();
        JournalError::Validation(format!(
            "{name} must be one of: {} (got '{raw}')",
            options.join(", ")
        ))
    })
}

fn number(fields: &HashMap<String, String>, name: &str) -> Result<f64, JournalError> {
    let raw = fields.get(name).map(|v| v.trim()).unwrap_or("");
    if raw.is_empty() {
        return Ok(0.0);
    }

    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| JournalError::Validation(format!("{name} must be a number (got '{raw}')")))
}

fn confidence(fields: &HashMap<String, String>) -> Result<u8, JournalError> {
    let raw = fields.get("confidence").map(|v| v.trim()).unwrap_or("");
    if raw.is_empty() {
        return Ok(1);
    }

    raw.parse::<u8>()
        .ok()
        .filter(|v| (1..=10).contains(v))
        .ok_or_else(|| {
            JournalError::Validation(format!("confidence must be between 1 and 10 (got '{raw}')"))
        })
}
