pub mod filter;
pub mod gate;
pub mod lexicon;
pub mod normalize;
pub mod pipeline;
pub mod pool;
pub mod rebalance;
pub mod scoring;
