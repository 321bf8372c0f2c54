pub mod cache;
pub mod credits;
pub mod genres;
pub mod series;
pub mod tracklist;
