//! Price source port trait.

use crate::domain::error::FrontierError;
use crate::domain::price_table::PriceTable;

pub trait PricePort {
    /// Aligned closes for `tickers`, in that order. An empty slice selects
    /// every ticker the source holds, in source order.
    fn load_close_prices(&self, tickers: &[String]) -> Result<PriceTable, FrontierError>;
}
