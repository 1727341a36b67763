//! Symbol selection for queries that accept one or many trading pairs.

use indexmap::IndexSet;

/// One trading pair or an explicit list of them.
///
/// Callers state up front whether they want a single series or a keyed
/// mapping; internally every selection is normalized to an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbols {
    One(String),
    Many(Vec<String>),
}

impl Symbols {
    /// Uppercases, trims, and deduplicates the selection, preserving the
    /// caller's order. May be empty if the caller supplied no usable names.
    pub(crate) fn normalize(&self) -> Vec<String> {
        let raw = match self {
            Symbols::One(symbol) => std::slice::from_ref(symbol),
            Symbols::Many(symbols) => symbols.as_slice(),
        };
        let unique: IndexSet<String> = raw
            .iter()
            .map(|symbol| symbol.trim().to_uppercase())
            .filter(|symbol| !symbol.is_empty())
            .collect();
        unique.into_iter().collect()
    }
}

impl From<&str> for Symbols {
    fn from(symbol: &str) -> Self {
        Symbols::One(symbol.to_string())
    }
}

impl From<String> for Symbols {
    fn from(symbol: String) -> Self {
        Symbols::One(symbol)
    }
}

impl From<Vec<String>> for Symbols {
    fn from(symbols: Vec<String>) -> Self {
        Symbols::Many(symbols)
    }
}

impl From<Vec<&str>> for Symbols {
    fn from(symbols: Vec<&str>) -> Self {
        Symbols::Many(symbols.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Symbols {
    fn from(symbols: &[&str]) -> Self {
        Symbols::Many(symbols.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_symbol_is_uppercased() {
        let symbols: Symbols = "btc-usdt".into();
        assert_eq!(symbols.normalize(), vec!["BTC-USDT".to_string()]);
    }

    #[test]
    fn duplicates_collapse_preserving_first_position() {
        let symbols: Symbols = vec!["eth-btc", "BTC-USDT", "Eth-Btc"].into();
        assert_eq!(
            symbols.normalize(),
            vec!["ETH-BTC".to_string(), "BTC-USDT".to_string()]
        );
    }

    #[test]
    fn blank_entries_are_dropped() {
        let symbols: Symbols = vec!["", "  ", "xrp-usdt"].into();
        assert_eq!(symbols.normalize(), vec!["XRP-USDT".to_string()]);
    }
}
