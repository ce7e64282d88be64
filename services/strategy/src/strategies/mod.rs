//! The concrete strategy set
//!
//! Seven strategies ship with the engine: four microstructure, two crypto
//! carry/trend, one equities pair. `default_set` builds them all with
//! their default parameters, the configuration the pipeline runs with.

pub mod funding;
pub mod imbalance;
pub mod liquidity;
pub mod market_maker;
pub mod momentum;
pub mod pairs;
pub mod vwap;

pub use funding::FundingArbitrage;
pub use imbalance::OrderBookImbalance;
pub use liquidity::LiquidityDetector;
pub use market_maker::MarketMaker;
pub use momentum::Momentum;
pub use pairs::PairsTrading;
pub use vwap::VwapExecutor;

use crate::Strategy;

/// Every shipped strategy with default parameters, in the engine's
/// canonical registration order.
pub fn default_set() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(OrderBookImbalance::default()),
        Box::new(MarketMaker::default()),
        Box::new(VwapExecutor::default()),
        Box::new(LiquidityDetector::default()),
        Box::new(FundingArbitrage::default()),
        Box::new(Momentum::default()),
        Box::new(PairsTrading::default()),
    ]
}
