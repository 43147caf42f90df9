//! Local mirror of the backend's song list. Only confirmed server responses
//! change it.

use drummer_proto::protocol::Song;

#[derive(Debug, Default)]
pub struct SongCatalog {
    songs: Vec<Song>,
}

impl SongCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the backend's list, order kept. Records already held (added by
    /// a submission that resolved before the list arrived) stay after the
    /// fetched ones; fetched duplicates of them are skipped.
    pub fn populate(&mut self, songs: Vec<Song>) {
        let held = std::mem::take(&mut self.songs);
        self.songs = songs
            .into_iter()
            .filter(|s| !held.iter().any(|h| h.id == s.id))
            .collect();
        self.songs.extend(held);
    }

    pub fn list(&self) -> &[Song] {
        &self.songs
    }

    pub fn add(&mut self, song: Song) {
        self.songs.push(song);
    }

    /// Swap in the server's record for `id`. `false` if `id` is unknown.
    pub fn replace(&mut self, id: &str, song: Song) -> bool {
        match self.songs.iter_mut().find(|s| s.id == id) {
            Some(slot) => {
                *slot = song;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.songs.len();
        self.songs.retain(|s| s.id != id);
        self.songs.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn song(id: &str, name: &str) -> Song {
        Song {
            id: id.into(),
            name: name.into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_populate_keeps_order_and_add_appends() {
        let mut catalog = SongCatalog::new();
        catalog.populate(vec![song("2", "B"), song("1", "A")]);
        catalog.add(song("3", "C"));
        let ids: Vec<&str> = catalog.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);
    }

    #[test]
    fn test_populate_after_add_keeps_added_record() {
        let mut catalog = SongCatalog::new();
        catalog.add(song("3", "C"));
        catalog.populate(vec![song("1", "A"), song("3", "C"), song("2", "B")]);
        let ids: Vec<&str> = catalog.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_replace_in_place() {
        let mut catalog = SongCatalog::new();
        catalog.populate(vec![song("1", "A"), song("2", "B")]);
        assert!(catalog.replace("1", song("1", "A2")));
        assert_eq!(catalog.list()[0].name, "A2");
        assert!(!catalog.replace("9", song("9", "Z")));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut catalog = SongCatalog::new();
        catalog.populate(vec![song("1", "A")]);
        assert!(!catalog.remove("9"));
        assert!(catalog.remove("1"));
        assert!(catalog.is_empty());
        assert!(catalog.get("1").is_none());
    }
}
