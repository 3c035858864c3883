// crates/friday-core/src/banner.rs

//! "Friday isn't in your region yet" banner, dismissable once per browser.

use crate::error::Result;
use crate::geo::GeoState;
use crate::store::KeyValueStore;

pub const BANNER_DISMISSED_KEY: &str = "friday_geo_banner_dismissed";

/// Missing or unparsable flag counts as not dismissed.
pub fn is_dismissed(store: &dyn KeyValueStore) -> bool {
    matches!(store.get(BANNER_DISMISSED_KEY), Ok(Some(v)) if v.trim() == "true")
}

pub fn dismiss(store: &dyn KeyValueStore) -> Result<()> {
    store.set(BANNER_DISMISSED_KEY, "true")
}

pub fn reset(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(BANNER_DISMISSED_KEY)
}

/// Shown only once geo has resolved outside the launch region.
pub fn should_show(state: &GeoState, store: &dyn KeyValueStore) -> bool {
    state.is_recognized_region() == Some(false) && !is_dismissed(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPolicy, GeoResolution};
    use crate::store::{FileStore, MemoryStore};

    #[test]
    fn hidden_while_loading_and_in_region() {
        let store = MemoryStore::new();
        assert!(!should_show(&GeoState::Loading, &store));
        assert!(!should_show(
            &GeoState::Resolved(GeoResolution::fail_open(0)),
            &store
        ));
    }

    #[test]
    fn dismissal_sticks() {
        let store = MemoryStore::new();
        let abroad = GeoState::Resolved(GeoPolicy::default().resolve("France", "FR", 0));
        assert!(should_show(&abroad, &store));
        dismiss(&store).unwrap();
        assert!(!should_show(&abroad, &store));
        reset(&store).unwrap();
        assert!(should_show(&abroad, &store));
    }

    #[test]
    fn flag_survives_file_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        dismiss(&FileStore::open(&path).unwrap()).unwrap();
        assert!(is_dismissed(&FileStore::open(&path).unwrap()));
    }

    #[test]
    fn garbage_flag_is_not_dismissed() {
        let store = MemoryStore::new();
        store.set(BANNER_DISMISSED_KEY, "yes please").unwrap();
        assert!(!is_dismissed(&store));
    }
}
