//! Risk scoring, the risk register and the risk manager (clause 6.1).

#![warn(missing_docs)]

pub mod scoring;
pub mod register;
pub mod manager;

pub use scoring::{
    level_weight, axis_weight, risk_score, score_of, priority_for_score, calculate_priority, is_critical,
};
pub use register::{RiskEntry, RiskRegister};
pub use manager::{RiskManager, RiskManagerConfig, RiskHeatMap, RiskStatistics};
