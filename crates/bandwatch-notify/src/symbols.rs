//! Display-symbol formatting.

/// Map a symbol to its TradingView exchange prefix, where known.
fn exchange(symbol: &str) -> Option<&'static str> {
    match symbol {
        "AAPL" | "MSFT" | "TSLA" | "AMZN" | "QQQ" | "NVDA" => Some("NASDAQ"),
        "SPY" => Some("AMEX"),
        "MES=F" | "MNQ=F" => Some("CME_MINI"),
        "MGC=F" | "MHG=F" | "SIL=F" => Some("COMEX"),
        "MCL=F" => Some("NYMEX"),
        _ => None,
    }
}

/// Clickable display form of a symbol (`NASDAQ:AAPL`); symbols without a
/// known exchange display as-is. Cosmetic only, never part of any key.
pub fn display_symbol(symbol: &str) -> String {
    match exchange(symbol) {
        Some(exch) => format!("{}:{}", exch, symbol),
        None => symbol.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_symbol() {
        assert_eq!(display_symbol("AAPL"), "NASDAQ:AAPL");
        assert_eq!(display_symbol("MES=F"), "CME_MINI:MES=F");
    }

    #[test]
    fn test_unmapped_symbol_passes_through() {
        assert_eq!(display_symbol("EURUSD=X"), "EURUSD=X");
    }
}
