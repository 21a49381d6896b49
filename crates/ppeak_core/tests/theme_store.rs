use ppeak_core::db::open_db_in_memory;
use ppeak_core::{
    world_storage_key, AttributeMap, DocumentRoot, DurableStore, SqliteLocalStore, ThemeState,
    ThemeStore, World, ATTR_AESTHETIC, ATTR_THEME,
};
use std::cell::RefCell;
use std::rc::Rc;

fn assert_reflected<S: DurableStore>(theme: &ThemeStore<S, AttributeMap>) {
    let expected_theme = if theme.is_dark() { "dark" } else { "light" };
    assert_eq!(
        theme.document().attribute(ATTR_AESTHETIC),
        Some(theme.world().as_str())
    );
    assert_eq!(theme.document().attribute(ATTR_THEME), Some(expected_theme));
}

#[test]
fn init_defaults_to_classical_and_reflects_attributes() {
    let conn = open_db_in_memory().unwrap();
    let theme = ThemeStore::init(SqliteLocalStore::new(&conn), AttributeMap::new(), "ppeak");

    assert_eq!(theme.world(), World::Classical);
    assert!(!theme.is_dark());
    assert_reflected(&theme);
    assert_eq!(theme.document().write_count(), 2);
}

#[test]
fn set_world_keeps_dark_flag_consistent() {
    let conn = open_db_in_memory().unwrap();
    let mut theme = ThemeStore::init(SqliteLocalStore::new(&conn), AttributeMap::new(), "ppeak");

    for world in [World::Gaming, World::Classical, World::Gaming] {
        theme.set_world(world);
        assert_eq!(theme.world(), world);
        assert_eq!(theme.is_dark(), world == World::Gaming);
        assert_eq!(theme.state(), ThemeState::for_world(world));
        assert_reflected(&theme);
    }
}

#[test]
fn selected_world_survives_reinitialization() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLocalStore::new(&conn);

    let mut theme = ThemeStore::init(&store, AttributeMap::new(), "ppeak");
    theme.set_world(World::Gaming);
    drop(theme);

    let reloaded = ThemeStore::init(&store, AttributeMap::new(), "ppeak");
    assert_eq!(reloaded.world(), World::Gaming);
    assert!(reloaded.is_dark());
    assert_reflected(&reloaded);
}

#[test]
fn invalid_persisted_value_falls_back_to_classical() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLocalStore::new(&conn);
    store
        .set_item(&world_storage_key("ppeak"), "vaporwave")
        .unwrap();

    let theme = ThemeStore::init(&store, AttributeMap::new(), "ppeak");
    assert_eq!(theme.world(), World::Classical);
    assert_reflected(&theme);
    assert_eq!(
        store.get_item(&world_storage_key("ppeak")).unwrap().as_deref(),
        Some("vaporwave")
    );
}

#[test]
fn repeated_set_world_is_idempotent_and_reapplies_attributes() {
    let conn = open_db_in_memory().unwrap();
    let mut theme = ThemeStore::init(SqliteLocalStore::new(&conn), AttributeMap::new(), "ppeak");

    let notified = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notified);
    theme.subscribe(move |state| sink.borrow_mut().push(state));

    theme.set_world(World::Gaming);
    let state_after_first = theme.state();
    let writes_after_first = theme.document().write_count();

    theme.set_world(World::Gaming);

    assert_eq!(theme.state(), state_after_first);
    assert_eq!(theme.document().write_count(), writes_after_first + 2);
    assert_reflected(&theme);
    assert_eq!(
        notified.borrow().as_slice(),
        [ThemeState::for_world(World::Gaming)]
    );
}

#[test]
fn subscribers_observe_changes_until_unsubscribed() {
    let conn = open_db_in_memory().unwrap();
    let mut theme = ThemeStore::init(SqliteLocalStore::new(&conn), AttributeMap::new(), "ppeak");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = theme.subscribe(move |state| sink.borrow_mut().push(state.world()));
    assert_eq!(theme.subscriber_count(), 1);

    theme.set_world(World::Gaming);
    theme.set_world(World::Classical);
    assert!(theme.unsubscribe(id));
    assert!(!theme.unsubscribe(id));
    theme.set_world(World::Gaming);

    assert_eq!(
        seen.borrow().as_slice(),
        [World::Gaming, World::Classical]
    );
    assert_eq!(theme.subscriber_count(), 0);
}

#[test]
fn namespaces_do_not_share_world_preference() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLocalStore::new(&conn);

    let mut staging = ThemeStore::init(&store, AttributeMap::new(), "staging");
    staging.set_world(World::Gaming);

    let production = ThemeStore::init(&store, AttributeMap::new(), "ppeak");
    assert_eq!(production.world(), World::Classical);
}
