//! Plain-text rendering of controller and store snapshots.

use client_core::{FavoritesStore, PageState};
use shared::domain::Character;

pub fn page_header(state: &PageState) -> String {
    match state.total_pages {
        Some(total) => format!("page {} of {total}", state.page_number),
        None => format!("page {} of ...", state.page_number),
    }
}

pub fn character_line(character: &Character, favorite: bool) -> String {
    let marker = if favorite { '*' } else { ' ' };
    format!(
        "{marker} {:>4}  {}  [{} / {}]",
        character.id, character.name, character.status, character.species
    )
}

pub fn page_lines(state: &PageState, favorites: &FavoritesStore) -> Vec<String> {
    let mut lines = Vec::with_capacity(state.items.len() + 1);
    lines.push(page_header(state));
    lines.extend(
        state
            .items
            .iter()
            .map(|c| character_line(c, favorites.is_favorite(c))),
    );
    lines
}

pub fn favorites_lines(favorites: &[Character]) -> Vec<String> {
    if favorites.is_empty() {
        return vec!["no saved characters".to_string()];
    }
    favorites.iter().map(|c| character_line(c, true)).collect()
}
