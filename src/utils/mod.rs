pub mod analytics;
pub mod ledger;
