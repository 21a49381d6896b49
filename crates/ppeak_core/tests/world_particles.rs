use ppeak_core::anim::particles::{
    style_for, FrameHandle, FrameScheduler, GlyphPaint, ParticleCanvas, ParticleEngine,
};
use ppeak_core::anim::visibility::{LazyVisibilityTrigger, ObserveOptions, ViewportObserver};
use ppeak_core::db::open_db_in_memory;
use ppeak_core::{AttributeMap, SqliteLocalStore, ThemeStore, World};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Canvas {
    size: (f32, f32),
    last_frame: Vec<GlyphPaint>,
}

impl ParticleCanvas for Canvas {
    fn size(&self) -> (f32, f32) {
        self.size
    }

    fn set_size(&mut self, width: f32, height: f32) {
        self.size = (width, height);
    }

    fn clear(&mut self) {
        self.last_frame.clear();
    }

    fn draw_glyph(&mut self, paint: &GlyphPaint) {
        self.last_frame.push(*paint);
    }
}

#[derive(Default)]
struct Clock {
    next: u64,
}

impl FrameScheduler for Clock {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        FrameHandle(self.next)
    }

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

#[derive(Default)]
struct Observer {
    observing: bool,
}

impl ViewportObserver for Observer {
    fn observe(&mut self, _target: &str, _options: ObserveOptions) {
        self.observing = true;
    }

    fn disconnect(&mut self) {
        self.observing = false;
    }
}

#[test]
fn particle_engine_follows_theme_store_once_visible() {
    let conn = open_db_in_memory().unwrap();
    let mut theme = ThemeStore::init(SqliteLocalStore::new(&conn), AttributeMap::new(), "ppeak");

    let engine = Rc::new(RefCell::new(ParticleEngine::new(
        Canvas::default(),
        Clock::default(),
        theme.world(),
        11,
    )));
    let mut trigger = LazyVisibilityTrigger::new(Observer::default());
    trigger.mount(Some("#hero-particles"));

    // Not visible yet: nothing mounted, nothing drawn.
    assert!(!engine.borrow().is_active());

    if trigger.on_intersection(true) {
        engine.borrow_mut().mount(1280.0, 720.0);
    }
    assert!(!trigger.observer().observing);

    let listener_engine = Rc::clone(&engine);
    let subscription = theme.subscribe(move |state| {
        listener_engine.borrow_mut().set_world(state.world());
    });

    theme.set_world(World::Gaming);
    engine.borrow_mut().on_frame();

    let gaming = style_for(World::Gaming);
    {
        let engine = engine.borrow();
        assert_eq!(engine.world(), World::Gaming);
        assert!(engine
            .particles()
            .iter()
            .all(|particle| gaming.glyphs.contains(&particle.glyph)));
        assert!(engine
            .canvas()
            .last_frame
            .iter()
            .all(|paint| paint.color == gaming.accent));
    }

    assert!(theme.unsubscribe(subscription));
    engine.borrow_mut().teardown();
    theme.set_world(World::Classical);
    assert_eq!(engine.borrow().world(), World::Gaming);
    assert!(!engine.borrow().has_pending_frame());
}
