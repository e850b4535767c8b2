//! Configuration module

mod site;

pub use site::DeployConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
