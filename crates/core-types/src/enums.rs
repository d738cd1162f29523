use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of indices and ETFs the application can chart.
///
/// The table is fixed at build time: each variant resolves to a provider
/// ticker and a human-readable name, and an unknown key never makes it past
/// `from_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    /// S&P 500, price only.
    #[default]
    Sp500,
    /// S&P 500 with dividends reinvested.
    Sp500tr,
    Nasdaq100,
    Kokusai,
    Emerging,
}

impl Instrument {
    /// Every supported instrument, in display order.
    pub const ALL: [Instrument; 5] = [
        Instrument::Sp500,
        Instrument::Sp500tr,
        Instrument::Nasdaq100,
        Instrument::Kokusai,
        Instrument::Emerging,
    ];

    /// The short key used by external callers (CLI flags, form fields, file names).
    pub fn key(&self) -> &'static str {
        match self {
            Instrument::Sp500 => "sp500",
            Instrument::Sp500tr => "sp500tr",
            Instrument::Nasdaq100 => "nasdaq100",
            Instrument::Kokusai => "kokusai",
            Instrument::Emerging => "emerging",
        }
    }

    /// The ticker understood by the market-data provider.
    pub fn ticker(&self) -> &'static str {
        match self {
            Instrument::Sp500 => "^GSPC",
            Instrument::Sp500tr => "^SP500TR",
            Instrument::Nasdaq100 => "^NDX",
            Instrument::Kokusai => "TOK",
            Instrument::Emerging => "EEM",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Instrument::Sp500 => "S&P 500",
            Instrument::Sp500tr => "S&P 500 (Total Return)",
            Instrument::Nasdaq100 => "Nasdaq 100",
            Instrument::Kokusai => "MSCI Kokusai ETF",
            Instrument::Emerging => "MSCI Emerging Markets ETF",
        }
    }
}

impl FromStr for Instrument {
    type Err = CoreError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Instrument::ALL
            .into_iter()
            .find(|instrument| instrument.key() == key)
            .ok_or_else(|| CoreError::UnknownInstrument(key.to_string()))
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_round_trips_through_from_str() {
        for instrument in Instrument::ALL {
            assert_eq!(instrument.key().parse::<Instrument>(), Ok(instrument));
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert_eq!(
            "dowjones".parse::<Instrument>(),
            Err(CoreError::UnknownInstrument("dowjones".to_string()))
        );
        // Keys are case-sensitive, matching the serde representation.
        assert!("SP500".parse::<Instrument>().is_err());
    }

    #[test]
    fn table_resolves_tickers_and_names() {
        assert_eq!(Instrument::Sp500.ticker(), "^GSPC");
        assert_eq!(Instrument::Sp500tr.ticker(), "^SP500TR");
        assert_eq!(Instrument::Nasdaq100.ticker(), "^NDX");
        assert_eq!(Instrument::Kokusai.ticker(), "TOK");
        assert_eq!(Instrument::Emerging.ticker(), "EEM");
        assert_eq!(Instrument::Emerging.display_name(), "MSCI Emerging Markets ETF");
    }

    #[test]
    fn default_is_sp500() {
        assert_eq!(Instrument::default(), Instrument::Sp500);
    }

    #[test]
    fn serde_uses_the_short_key() {
        let json = serde_json::to_string(&Instrument::Nasdaq100).unwrap();
        assert_eq!(json, "\"nasdaq100\"");
        let back: Instrument = serde_json::from_str("\"kokusai\"").unwrap();
        assert_eq!(back, Instrument::Kokusai);
    }
}
