//! Fixed genre list offered by the book form.

use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

static GENRES: Lazy<Vec<Genre>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/genres.json")).unwrap_or_else(|err| {
        tracing::error!(error = %err, "bundled genre list is not valid JSON");
        Vec::new()
    })
});

/// Genres in display order.
pub fn genres() -> &'static [Genre] {
    &GENRES
}

pub fn genre_names() -> impl Iterator<Item = &'static str> {
    GENRES.iter().map(|genre| genre.name.as_str())
}

pub fn is_known_genre(name: &str) -> bool {
    genre_names().any(|known| known == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_list_parses() {
        assert_eq!(genres().len(), 20);
        assert!(is_known_genre("Sci-Fi"));
        assert!(is_known_genre("Romance"));
        assert!(!is_known_genre("sci-fi"));
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<u32> = genres().iter().map(|g| g.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), genres().len());
    }
}
