//! Command implementations for the cardex CLI

mod acquire;
mod clear;
mod crawl;
mod search;

pub use acquire::acquire;
pub use clear::clear_cache;
pub use crawl::crawl;
pub use search::search;
