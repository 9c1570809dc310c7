pub mod mapping;
pub mod resolver;

pub use mapping::{CategoryMapping, UNCLASSIFIED_PREFIX};
pub use resolver::{category_mix, main_category, CategoryShare};
