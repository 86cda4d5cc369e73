pub mod trade;

pub use trade::{NewTrade, TradeRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Form choices — closed sets offered as dropdowns on the journal form
// ---------------------------------------------------------------------------

/// Declares a closed choice set whose serialized form is the label shown on
/// the form and written to the backing file.
macro_rules! form_choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Exact, case-sensitive match against the form label.
            pub fn from_label(s: &str) -> Option<Self> {
                match s {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

form_choice!(
    /// Directional read of the market before the trade.
    MarketBias {
        Bullish => "Bullish",
        Bearish => "Bearish",
        Neutral => "Neutral",
    }
);

form_choice!(TradeType {
    Buy => "Buy",
    Sell => "Sell",
});

form_choice!(
    /// Outcome of a closed trade.
    TradeResult {
        Win => "Win",
        Loss => "Loss",
        BreakEven => "Break Even",
    }
);

form_choice!(
    /// Self-assessed quality of execution, A being a textbook trade.
    ExecutionGrade {
        A => "A",
        B => "B",
        C => "C",
    }
);

form_choice!(Session {
    London => "London",
    NewYork => "New York",
    Asia => "Asia",
});

form_choice!(
    /// Whether a scheduled news release affected the trade.
    NewsImpact {
        Yes => "Yes",
        No => "No",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for result in TradeResult::ALL {
            assert_eq!(TradeResult::from_label(result.as_str()), Some(*result));
        }
        for session in Session::ALL {
            assert_eq!(Session::from_label(&session.to_string()), Some(*session));
        }
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_eq!(MarketBias::from_label("bullish"), None);
        assert_eq!(TradeResult::from_label("BreakEven"), None);
        assert_eq!(Session::from_label("New York"), Some(Session::NewYork));
    }

    #[test]
    fn test_serde_uses_form_labels() {
        let json = serde_json::to_string(&TradeResult::BreakEven).unwrap();
        assert_eq!(json, "\"Break Even\"");

        let session: Session = serde_json::from_str("\"New York\"").unwrap();
        assert_eq!(session, Session::NewYork);
    }
}
