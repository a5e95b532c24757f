pub mod backend;
pub mod geocode;
