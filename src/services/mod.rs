pub mod genre_catalog;
pub mod providers;
pub mod recommendations;

pub use genre_catalog::GenreCatalog;
pub use recommendations::RecommendationService;
