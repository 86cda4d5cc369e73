use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{ExecutionGrade, MarketBias, NewsImpact, Session, TradeResult, TradeType};

/// Format of the `Date/Time` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One logged trade, one row of the backing file.
///
/// Field order is the column order of the backing file and must stay in
/// step with `db::trade_repo::COLUMNS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_id: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub market_bias: MarketBias,
    pub trade_type: TradeType,
    pub setup: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub lot_size: f64,
    pub risk: String,
    pub reward: String,
    pub result: TradeResult,
    pub profit_loss: f64,
    pub r_multiple: f64,
    pub emotion_before: String,
    pub emotion_during: String,
    pub emotion_after: String,
    pub execution_grade: ExecutionGrade,
    pub screenshot_path: Option<String>,
    pub mistake: String,
    pub lesson: String,
    pub action_plan: String,
    pub session: Session,
    pub news_impact: NewsImpact,
    pub slippage: String,
    pub volatility: String,
    pub market_conditions: String,
    pub time_in_trade: String,
    #[serde(deserialize_with = "confidence_value::deserialize")]
    pub confidence: u8,
}

/// A submitted journal form: everything but the server-assigned timestamp
/// and the attachment reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrade {
    pub trade_id: String,
    pub market_bias: MarketBias,
    pub trade_type: TradeType,
    pub setup: String,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub lot_size: f64,
    pub risk: String,
    pub reward: String,
    pub result: TradeResult,
    pub profit_loss: f64,
    pub r_multiple: f64,
    pub emotion_before: String,
    pub emotion_during: String,
    pub emotion_after: String,
    pub execution_grade: ExecutionGrade,
    pub mistake: String,
    pub lesson: String,
    pub action_plan: String,
    pub session: Session,
    pub news_impact: NewsImpact,
    pub slippage: String,
    pub volatility: String,
    pub market_conditions: String,
    pub time_in_trade: String,
    pub confidence: u8,
}

impl NewTrade {
    /// A form with every choice at its first option and every other field
    /// blank, the state of a freshly opened form.
    pub fn blank(trade_id: impl Into<String>) -> Self {
        Self {
            trade_id: trade_id.into(),
            market_bias: MarketBias::Bullish,
            trade_type: TradeType::Buy,
            setup: String::new(),
            entry_price: 0.0,
            exit_price: 0.0,
            stop_loss: 0.0,
            take_profit: 0.0,
            lot_size: 0.0,
            risk: String::new(),
            reward: String::new(),
            result: TradeResult::Win,
            profit_loss: 0.0,
            r_multiple: 0.0,
            emotion_before: String::new(),
            emotion_during: String::new(),
            emotion_after: String::new(),
            execution_grade: ExecutionGrade::A,
            mistake: String::new(),
            lesson: String::new(),
            action_plan: String::new(),
            session: Session::London,
            news_impact: NewsImpact::Yes,
            slippage: String::new(),
            volatility: String::new(),
            market_conditions: String::new(),
            time_in_trade: String::new(),
            confidence: 1,
        }
    }

    /// Stamp the submission into a record. Seconds precision only, so the
    /// timestamp survives a trip through the backing file unchanged.
    pub fn into_record(self, timestamp: NaiveDateTime, screenshot_path: Option<String>) -> TradeRecord {
        use chrono::Timelike;

        TradeRecord {
            trade_id: self.trade_id,
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            market_bias: self.market_bias,
            trade_type: self.trade_type,
            setup: self.setup,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            lot_size: self.lot_size,
            risk: self.risk,
            reward: self.reward,
            result: self.result,
            profit_loss: self.profit_loss,
            r_multiple: self.r_multiple,
            emotion_before: self.emotion_before,
            emotion_during: self.emotion_during,
            emotion_after: self.emotion_after,
            execution_grade: self.execution_grade,
            screenshot_path,
            mistake: self.mistake,
            lesson: self.lesson,
            action_plan: self.action_plan,
            session: self.session,
            news_impact: self.news_impact,
            slippage: self.slippage,
            volatility: self.volatility,
            market_conditions: self.market_conditions,
            time_in_trade: self.time_in_trade,
            confidence: self.confidence,
        }
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Confidence is written as an integer but may come back as `7.0` once a
/// spreadsheet has touched the file.
mod confidence_value {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        let rounded = raw.round();
        if !(1.0..=10.0).contains(&rounded) {
            return Err(serde::de::Error::custom(format!(
                "confidence {raw} is outside 1-10"
            )));
        }
        Ok(rounded as u8)
    }
}
