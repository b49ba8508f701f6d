//! Built-in detection rules.

mod billing_ratio;
mod new_entity;
mod oon_cluster;
mod outlier;

pub use billing_ratio::BillingRatioOutlier;
pub use new_entity::NewEntityHighVolume;
pub use oon_cluster::OonDmeCluster;
pub use outlier::ZScoreOutlier;
