// Transaction kinds as stored in the ledger
pub const TRANSACTION_KIND_DEPOSIT: &str = "deposit";
pub const TRANSACTION_KIND_WITHDRAWAL: &str = "withdrawal";
pub const TRANSACTION_KIND_BUY: &str = "buy";
pub const TRANSACTION_KIND_SELL: &str = "sell";
pub const TRANSACTION_KIND_DIVIDEND: &str = "dividend";
