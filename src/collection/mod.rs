// SPDX-License-Identifier: GPL-3.0-only
pub mod backend;
pub mod traits;

pub use backend::BackendCollectionService;
pub use traits::{CollectionService, ConnectionState, ListingDraft};
