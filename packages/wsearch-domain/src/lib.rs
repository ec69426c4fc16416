pub mod candidate;
pub mod dedup;
pub mod entity;
pub mod normalize;
pub mod scoring;
pub mod tiers;
