pub mod error;
pub mod subscription_repo;
