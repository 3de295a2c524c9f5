//! Configuration module

mod site;

pub use site::LabelsConfig;
pub use site::ListingConfig;
pub use site::PostConfig;
pub use site::SiteConfig;
pub use site::StoreConfig;
pub use site::ACCESS_TOKEN_ENV;
