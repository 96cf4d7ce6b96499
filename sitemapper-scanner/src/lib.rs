pub mod client;
pub mod collector;
pub mod error;
pub mod locator;
pub mod result;
pub mod robots;
pub mod sitemap;
pub mod validator;

pub use client::{HttpSettings, build_client, join_path};
pub use collector::SitemapCollector;
pub use error::ScanError;
pub use locator::{SITEMAP_PATHS, SitemapLocator};
pub use result::{BranchFailure, CollectReport, LinkSet};
pub use robots::{RobotsChecker, RobotsReport};
pub use sitemap::{SitemapDocument, parse_sitemap};
pub use validator::LinkValidator;
