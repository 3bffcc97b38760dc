//! Price data access port trait.

use crate::domain::candle::Candle;
use crate::domain::error::TradelabError;

pub trait DataPort {
    /// Load the full candle series, ordered by timestamp.
    fn load_candles(&self) -> Result<Vec<Candle>, TradelabError>;
}
