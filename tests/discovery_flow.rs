//! End-to-end flows: events in, worker replies fed back, no network.

use cinematch::app::{AppSettings, FetchTicket, LoadPhase};
use cinematch::catalog::{Catalog, CatalogQuery};
use cinematch::domain::{CastMember, ProviderAvailability, Video};
use cinematch::storage::{FavoritesStore, JsonFileStore, KeyValueStore, MemoryStore};
use cinematch::worker::{CatalogWorker, WorkerMessage, WorkerResponse};
use cinematch::{handle_event, initialize, Action, AppState, CinematchError, Config, Event, Movie, View};
use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

/// Catalog serving scripted pages keyed by a query label and page number.
#[derive(Default)]
struct FakeCatalog {
    pages: HashMap<(String, u32), Vec<Movie>>,
    failing: Vec<(String, u32)>,
}

impl FakeCatalog {
    fn with_page(mut self, label: &str, page: u32, ids: impl IntoIterator<Item = i64>) -> Self {
        let movies = ids.into_iter().map(|id| Movie::new(id, format!("{label} #{id}"))).collect();
        self.pages.insert((label.to_string(), page), movies);
        self
    }

    fn failing_on(mut self, label: &str, page: u32) -> Self {
        self.failing.push((label.to_string(), page));
        self
    }

    fn page(&self, label: String, page: u32) -> cinematch::Result<Vec<Movie>> {
        if self.failing.contains(&(label.clone(), page)) {
            return Err(CinematchError::Catalog(format!("{label} page {page}: 503")));
        }
        Ok(self.pages.get(&(label, page)).cloned().unwrap_or_default())
    }
}

impl Catalog for FakeCatalog {
    fn popular(&self, page: u32) -> cinematch::Result<Vec<Movie>> {
        self.page("popular".to_string(), page)
    }

    fn discover_by_genres(&self, genre_ids: &[u32], page: u32) -> cinematch::Result<Vec<Movie>> {
        let ids: Vec<String> = genre_ids.iter().map(ToString::to_string).collect();
        self.page(format!("genres:{}", ids.join(",")), page)
    }

    fn discover_by_year(&self, year: &str, page: u32) -> cinematch::Result<Vec<Movie>> {
        self.page(format!("year:{year}"), page)
    }

    fn search(&self, query: &str, year: Option<&str>, page: u32) -> cinematch::Result<Vec<Movie>> {
        match year {
            Some(year) => self.page(format!("search:{query}:{year}"), page),
            None => self.page(format!("search:{query}"), page),
        }
    }

    fn videos(&self, _movie_id: i64) -> cinematch::Result<Vec<Video>> {
        Ok(vec![])
    }

    fn watch_providers(&self, _movie_id: i64) -> cinematch::Result<ProviderAvailability> {
        Ok(ProviderAvailability::default())
    }

    fn credits(&self, _movie_id: i64) -> cinematch::Result<Vec<CastMember>> {
        Ok(vec![])
    }

    fn similar(&self, _movie_id: i64) -> cinematch::Result<Vec<Movie>> {
        Ok(vec![Movie::new(9000, "similar")])
    }
}

/// Drives an `AppState` and answers worker messages synchronously.
struct Harness {
    state: AppState,
    worker: CatalogWorker,
    pending_debounce: Option<u64>,
}

impl Harness {
    fn new(catalog: FakeCatalog) -> Self {
        let state = initialize(&Config::default(), Box::new(MemoryStore::default()));
        Self::with_state(state, catalog)
    }

    fn with_state(mut state: AppState, catalog: FakeCatalog) -> Self {
        let start = state.start();
        let mut harness = Self {
            state,
            worker: CatalogWorker::new(Box::new(catalog)),
            pending_debounce: None,
        };
        harness.run(start);
        harness
    }

    /// Sends `event` and runs every resulting worker call to completion.
    fn send(&mut self, event: Event) {
        let (_, actions) = handle_event(&mut self.state, &event).unwrap();
        self.run(actions);
    }

    /// Sends `event` and returns its actions without running them.
    fn send_deferred(&mut self, event: Event) -> Vec<Action> {
        handle_event(&mut self.state, &event).unwrap().1
    }

    fn run(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::PostToWorker(message) => {
                    let response = self.worker.handle_message(message);
                    self.send(Event::WorkerResponse(response));
                }
                Action::ScheduleDebounce { token, .. } => self.pending_debounce = Some(token),
                Action::Quit => {}
            }
        }
    }

    fn type_and_wait(&mut self, text: &str) {
        self.send(Event::SearchInput(text.to_string()));
        let token = self.pending_debounce.take().unwrap();
        self.send(Event::DebounceElapsed { token });
    }

    fn ids(&self) -> Vec<i64> {
        self.state.displayed_movies().iter().map(|m| m.id).collect()
    }
}

fn fetch_message(actions: &[Action]) -> WorkerMessage {
    actions
        .iter()
        .find_map(|action| match action {
            Action::PostToWorker(message @ WorkerMessage::FetchPage { .. }) => Some(message.clone()),
            _ => None,
        })
        .unwrap()
}

#[test]
fn search_pages_merge_without_duplicates() {
    let catalog = FakeCatalog::default()
        .with_page("popular", 1, 100..120)
        .with_page("search:batman", 1, 1..=20)
        .with_page("search:batman", 2, 19..=38);
    let mut app = Harness::new(catalog);
    assert_eq!(app.ids().len(), 20);

    app.type_and_wait("batman");
    assert_eq!(app.ids(), (1..=20).collect::<Vec<_>>());

    app.send(Event::SentinelVisible);
    assert_eq!(app.ids(), (1..=38).collect::<Vec<_>>());
    assert_eq!(app.state.engine().page(), 2);
}

#[test]
fn reply_for_superseded_filter_is_discarded() {
    let catalog = FakeCatalog::default()
        .with_page("search:alien", 1, [1, 2, 3])
        .with_page("search:alien:1979", 1, [10]);
    let mut app = Harness::new(catalog);

    app.send(Event::SearchInput("alien".into()));
    let token = app.pending_debounce.take().unwrap();
    let stale = fetch_message(&app.send_deferred(Event::DebounceElapsed { token }));

    let current = fetch_message(&app.send_deferred(Event::SelectYear(Some("1979".into()))));

    let reply = app.worker.handle_message(current);
    app.send(Event::WorkerResponse(reply));
    assert_eq!(app.ids(), vec![10]);

    let stale_reply = app.worker.handle_message(stale);
    let (render, actions) = handle_event(&mut app.state, &Event::WorkerResponse(stale_reply)).unwrap();
    assert!(!render);
    assert!(actions.is_empty());
    assert_eq!(app.ids(), vec![10]);
    assert_eq!(app.state.engine().phase(), LoadPhase::Idle);
}

#[test]
fn sentinel_gives_way_to_manual_control_after_three_loads() {
    let mut catalog = FakeCatalog::default();
    for page in 1..=5 {
        let start = i64::from(page) * 10;
        catalog = catalog.with_page("popular", page, start..start + 10);
    }
    let mut app = Harness::new(catalog);

    app.send(Event::SentinelVisible);
    app.send(Event::SentinelVisible);
    assert_eq!(app.state.engine().auto_load_count(), 3);

    assert!(app.send_deferred(Event::SentinelVisible).is_empty());
    assert!(app.state.engine().manual_load_available());

    app.send(Event::LoadMore);
    assert_eq!(app.ids().len(), 40);
    assert_eq!(app.state.engine().page(), 4);
}

#[test]
fn empty_page_ends_pagination() {
    let catalog = FakeCatalog::default().with_page("year:1999", 1, [603, 604]);
    let mut app = Harness::new(catalog);

    app.send(Event::SelectYear(Some("1999".into())));
    app.send(Event::SentinelVisible);

    assert_eq!(app.ids(), vec![603, 604]);
    assert!(!app.state.engine().has_more());
    assert!(app.send_deferred(Event::SentinelVisible).is_empty());
    assert!(app.send_deferred(Event::LoadMore).is_empty());
}

#[test]
fn failed_page_keeps_list_and_is_retried() {
    let catalog = FakeCatalog::default()
        .with_page("popular", 1, 1..=20)
        .failing_on("popular", 2);
    let mut app = Harness::new(catalog);

    app.send(Event::SentinelVisible);
    assert_eq!(app.ids().len(), 20);
    assert_eq!(app.state.engine().phase(), LoadPhase::Idle);
    assert!(app.state.engine().has_more());

    let retry = app.send_deferred(Event::SentinelVisible);
    let WorkerMessage::FetchPage { page, .. } = fetch_message(&retry) else {
        unreachable!()
    };
    assert_eq!(page, 2);
}

#[test]
fn mood_filter_uses_genre_discovery() {
    let catalog = FakeCatalog::default().with_page("genres:27", 1, [31, 32]);
    let mut app = Harness::new(catalog);

    app.send(Event::SelectMood(Some(cinematch::Mood::Scared)));
    assert_eq!(app.ids(), vec![31, 32]);
    assert_eq!(
        app.state.engine().query(),
        &CatalogQuery::DiscoverByGenres { genre_ids: vec![27] }
    );
}

#[test]
fn year_change_in_favorites_fetches_on_return() {
    let catalog = FakeCatalog::default()
        .with_page("popular", 1, [1, 2])
        .with_page("year:2001", 1, [120]);
    let mut app = Harness::new(catalog);

    app.send(Event::SwitchView(View::Favorites));
    let deferred = app.send_deferred(Event::SelectYear(Some("2001".into())));
    assert!(deferred.is_empty());

    app.send(Event::SwitchView(View::Discover));
    assert_eq!(app.ids(), vec![120]);
}

#[test]
fn opened_movie_loads_details_and_similar_titles() {
    let catalog = FakeCatalog::default().with_page("popular", 1, [603]);
    let mut app = Harness::new(catalog);

    app.send(Event::OpenMovie { movie_id: 603 });
    let details = app.state.detail().details().unwrap();
    assert_eq!(details.similar.len(), 1);
    assert!(details.providers.flatrate.is_empty());

    app.send(Event::OpenSimilar { index: 0 });
    assert_eq!(app.state.detail().selected().map(|m| m.id), Some(9000));
}

#[test]
fn favorites_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let catalog = || FakeCatalog::default().with_page("popular", 1, [603, 604]);

    {
        let store = JsonFileStore::open(path.clone()).unwrap();
        let state = initialize(&Config::default(), Box::new(store));
        let mut app = Harness::with_state(state, catalog());
        app.send(Event::ToggleFavorite { movie_id: Some(604) });
        app.send(Event::ToggleFavorite { movie_id: Some(603) });
    }

    let store = JsonFileStore::open(path).unwrap();
    let raw = store.get(cinematch::storage::FAVORITES_KEY).unwrap().unwrap();
    assert!(raw.contains("604"));

    let favorites = FavoritesStore::load(Box::new(store));
    let ids: Vec<i64> = favorites.list().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![604, 603]);

    let state = AppState::new(favorites, &AppSettings::default());
    let mut app = Harness::with_state(state, catalog());
    app.send(Event::SwitchView(View::Favorites));
    assert_eq!(app.ids(), vec![604, 603]);
}

#[test]
fn spawned_worker_replies_through_callback() {
    let catalog = FakeCatalog::default().with_page("popular", 1, [1, 2, 3]);
    let (sender, receiver) = mpsc::channel();
    let handle = CatalogWorker::new(Box::new(catalog))
        .spawn(move |response| {
            let _ = sender.send(response);
        })
        .unwrap();

    let ticket = FetchTicket {
        epoch: 4,
        page: 1,
        query: CatalogQuery::Popular,
    };
    handle
        .post(WorkerMessage::fetch_page(ticket.epoch, ticket.page, ticket.query))
        .unwrap();

    let response = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
    let WorkerResponse::PageLoaded { epoch, page, movies } = response else {
        panic!("unexpected response: {response:?}");
    };
    assert_eq!((epoch, page, movies.len()), (4, 1, 3));
}
