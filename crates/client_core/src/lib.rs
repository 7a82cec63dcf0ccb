//! Client core for browsing the character API: a paginated list controller
//! over a [`CharacterApi`] and a write-through [`FavoritesStore`] over a
//! [`storage::KeyValueStore`]. The two are independent.

pub mod api;
pub mod error;
pub mod favorites;
pub mod pagination;

pub use api::{CharacterApi, HttpCharacterApi, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use error::{FavoritesError, PageError};
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use pagination::{PageController, PageState};
