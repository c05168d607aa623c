//! Status badges: closed status enums mapped exhaustively to a label and a tone.

use std::fmt;

use crate::types::NetPosition;

/// Colour family of a badge. Renderers decide what each tone looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    Warning,
    Critical,
    Info,
}

/// Label plus tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

impl Badge {
    pub const fn new(label: &'static str, tone: Tone) -> Self {
        Self { label, tone }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// Anything that renders as a badge.
pub trait Status {
    fn badge(&self) -> Badge;
}

impl Status for NetPosition {
    fn badge(&self) -> Badge {
        match self {
            NetPosition::NetBuy => Badge::new("NET BUY", Tone::Positive),
            NetPosition::NetSell => Badge::new("NET SELL", Tone::Negative),
            NetPosition::Neutral => Badge::new("NEUTRAL", Tone::Neutral),
        }
    }
}

/// Market sentiment label from the news service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl From<&str> for Sentiment {
    /// Case-insensitive; anything unrecognised is neutral.
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "BULLISH" => Sentiment::Bullish,
            "BEARISH" => Sentiment::Bearish,
            _ => Sentiment::Neutral,
        }
    }
}

impl Status for Sentiment {
    fn badge(&self) -> Badge {
        match self {
            Sentiment::Bullish => Badge::new("BULLISH", Tone::Positive),
            Sentiment::Bearish => Badge::new("BEARISH", Tone::Negative),
            Sentiment::Neutral => Badge::new("NEUTRAL", Tone::Neutral),
        }
    }
}

/// Whether cached master data is still current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Freshness {
    Fresh,
    Stale,
}

impl Freshness {
    pub fn from_stale(is_stale: bool) -> Self {
        if is_stale {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }
}

impl Status for Freshness {
    fn badge(&self) -> Badge {
        match self {
            Freshness::Fresh => Badge::new("Fresh", Tone::Positive),
            Freshness::Stale => Badge::new("Stale", Tone::Negative),
        }
    }
}

/// News urgency. Only levels 1 and 2 get a badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Urgency {
    Immediate,
    Normal,
}

impl Urgency {
    pub fn from_level(level: Option<i64>) -> Option<Self> {
        match level {
            Some(1) => Some(Urgency::Immediate),
            Some(2) => Some(Urgency::Normal),
            _ => None,
        }
    }
}

impl Status for Urgency {
    fn badge(&self) -> Badge {
        match self {
            Urgency::Immediate => Badge::new("Urgency: Immediate", Tone::Critical),
            Urgency::Normal => Badge::new("Normal Priority", Tone::Warning),
        }
    }
}

/// Asset class of a news item, from the prefix of its first related symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstrumentKind {
    Forex,
    Commodity,
    Other,
    Unknown,
}

impl InstrumentKind {
    pub fn classify<S: AsRef<str>>(symbols: &[S]) -> Self {
        let Some(first) = symbols.first() else {
            return InstrumentKind::Unknown;
        };
        let symbol = first.as_ref();
        if symbol.starts_with("FX:") {
            InstrumentKind::Forex
        } else if symbol.starts_with("TVC:") || symbol.starts_with("COMEX:") {
            InstrumentKind::Commodity
        } else {
            InstrumentKind::Other
        }
    }
}

impl Status for InstrumentKind {
    fn badge(&self) -> Badge {
        match self {
            InstrumentKind::Forex => Badge::new("Forex", Tone::Info),
            InstrumentKind::Commodity => Badge::new("Commodity", Tone::Warning),
            InstrumentKind::Other => Badge::new("Other", Tone::Neutral),
            InstrumentKind::Unknown => Badge::new("Unknown", Tone::Neutral),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_position_badges() {
        assert_eq!(NetPosition::NetBuy.badge().tone, Tone::Positive);
        assert_eq!(NetPosition::NetSell.badge().tone, Tone::Negative);
        assert_eq!(NetPosition::Neutral.badge().label, "NEUTRAL");
    }

    #[test]
    fn sentiment_is_case_insensitive() {
        assert_eq!(Sentiment::from("bullish"), Sentiment::Bullish);
        assert_eq!(Sentiment::from("Bearish "), Sentiment::Bearish);
        assert_eq!(Sentiment::from("mixed"), Sentiment::Neutral);
        assert_eq!(Sentiment::Bearish.badge().tone, Tone::Negative);
    }

    #[test]
    fn freshness() {
        assert_eq!(Freshness::from_stale(true).badge(), Badge::new("Stale", Tone::Negative));
        assert_eq!(Freshness::from_stale(false).badge().label, "Fresh");
    }

    #[test]
    fn urgency_levels() {
        assert_eq!(
            Urgency::from_level(Some(1)).map(|u| u.badge().label),
            Some("Urgency: Immediate")
        );
        assert_eq!(Urgency::from_level(Some(2)).map(|u| u.badge().tone), Some(Tone::Warning));
        assert_eq!(Urgency::from_level(Some(3)), None);
        assert_eq!(Urgency::from_level(None), None);
    }

    #[test]
    fn instrument_prefixes() {
        assert_eq!(InstrumentKind::classify(&["FX:EURUSD"]), InstrumentKind::Forex);
        assert_eq!(InstrumentKind::classify(&["TVC:GOLD"]), InstrumentKind::Commodity);
        assert_eq!(InstrumentKind::classify(&["COMEX:GC1!"]), InstrumentKind::Commodity);
        assert_eq!(InstrumentKind::classify(&["NASDAQ:AAPL", "FX:EURUSD"]), InstrumentKind::Other);
        assert_eq!(InstrumentKind::classify::<&str>(&[]), InstrumentKind::Unknown);
    }
}
