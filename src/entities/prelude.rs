pub use super::cast_appearance::Entity as CastAppearance;
pub use super::crew_appearance::Entity as CrewAppearance;
pub use super::genre::Entity as Genre;
pub use super::request_cache::Entity as RequestCache;
pub use super::series::Entity as Series;
pub use super::tracked_series::Entity as TrackedSeries;
