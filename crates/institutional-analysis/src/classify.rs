//! Keyword classification of free-form insider transaction text.

/// Narrow keyword sets used by the ownership scorer.
pub const BUY_KEYWORDS: &[&str] = &["buy", "purchase"];
pub const SELL_KEYWORDS: &[&str] = &["sale", "sell"];

/// Extended sets for the cluster tracker, which also sees filing-style
/// wording ("Acquisition (Non Open Market)", "Disposition to Issuer").
pub const BUY_KEYWORDS_EXTENDED: &[&str] = &["buy", "purchase", "acquisition", "acquired"];
pub const SELL_KEYWORDS_EXTENDED: &[&str] = &["sale", "sell", "disposition", "disposed"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Buy,
    Sell,
    Unknown,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "Buy",
            TransactionType::Sell => "Sell",
            TransactionType::Unknown => "Unknown",
        }
    }
}

fn classify_with(text: &str, buys: &[&str], sells: &[&str]) -> TransactionType {
    let lower = text.to_lowercase();
    if buys.iter().any(|k| lower.contains(k)) {
        TransactionType::Buy
    } else if sells.iter().any(|k| lower.contains(k)) {
        TransactionType::Sell
    } else {
        TransactionType::Unknown
    }
}

/// Case-insensitive substring classification with the narrow keyword set.
pub fn classify_transaction(text: &str) -> TransactionType {
    classify_with(text, BUY_KEYWORDS, SELL_KEYWORDS)
}

/// Classification with the extended filing-style keyword set.
pub fn classify_transaction_extended(text: &str) -> TransactionType {
    classify_with(text, BUY_KEYWORDS_EXTENDED, SELL_KEYWORDS_EXTENDED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_plain_wording() {
        assert_eq!(classify_transaction("Open Market Purchase"), TransactionType::Buy);
        assert_eq!(classify_transaction("SALE"), TransactionType::Sell);
        assert_eq!(classify_transaction("Buy at $12.30"), TransactionType::Buy);
        assert_eq!(classify_transaction("Option Exercise"), TransactionType::Unknown);
    }

    #[test]
    fn buy_wins_when_both_match() {
        // "Buyback sale program" contains both; buy keywords are checked first.
        assert_eq!(classify_transaction("buy then sell"), TransactionType::Buy);
    }

    #[test]
    fn extended_set_covers_filing_wording() {
        assert_eq!(
            classify_transaction_extended("Acquisition (Non Open Market)"),
            TransactionType::Buy
        );
        assert_eq!(
            classify_transaction_extended("Disposition to Issuer"),
            TransactionType::Sell
        );
        assert_eq!(
            classify_transaction_extended("Acquisition (Non Open Market)".to_uppercase().as_str()),
            TransactionType::Buy
        );
        // Narrow set does not know filing wording.
        assert_eq!(
            classify_transaction("Disposition to Issuer"),
            TransactionType::Unknown
        );
    }
}
