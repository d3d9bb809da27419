//! Configuration module

mod site;

pub use site::Collection;
pub use site::HighlightConfig;
pub use site::MissingDatePolicy;
pub use site::SiteConfig;
pub use site::CONFIG_FILE;
