// SPDX-License-Identifier: GPL-3.0-only
pub mod models;
pub mod store;
pub mod views;

pub use models::{Category, CategoryFilter, Listing};
pub use store::CatalogStore;
pub use views::{featured_listings, filter_listings};
