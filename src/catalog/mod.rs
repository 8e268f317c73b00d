/*!
 * Vocabulary catalog.
 *
 * - `model`: parts, words and their audio references
 * - `source`: where the dataset is fetched from
 * - `store`: the loaded-once, all-or-nothing holder with its loading flag
 */

pub mod model;
pub mod source;
pub mod store;

pub use model::{AudioRefs, Catalog, Part, VoiceId, Word};
pub use source::{CatalogSource, FileCatalogSource, HttpCatalogSource};
pub use store::CatalogStore;
