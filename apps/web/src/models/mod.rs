pub mod portfolio;
pub mod provider;
pub mod upload;
