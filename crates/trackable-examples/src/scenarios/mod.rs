pub mod churn;
pub mod leak;
