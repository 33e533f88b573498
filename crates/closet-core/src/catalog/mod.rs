mod db;
mod error;
mod models;

pub use db::Catalog;
pub use error::{CatalogError, CatalogResult};
pub use models::{Item, NewItem, NewOutfit, Outfit, OutfitItem};
