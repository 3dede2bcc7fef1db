//! Integration tests for event handling: ready, slide changes and resizes.

use crate::helpers::{MemoryFetcher, TestDeckBuilder, coordinator, funnel, funnel_with_comment};
use funnel_deck::chart::MountPoint;
use funnel_deck::deck::{Deck, DeckEvent, NavigationPolicy, Presentation};
use funnel_deck::types::{SlideRef, Viewport};
use futures::executor::block_on;

const INLINE: &str = r#"{"data": {"labels": ["Seen", "Clicked"], "values": [10, 4]}}"#;

fn sample_deck() -> Deck {
    let first = [
        funnel("funnel-a", &[("data-data-source", "sales"), ("data-use-json", "false")]),
        funnel("funnel-b", &[]),
        "<div id=\"chart-x\"></div>".to_string(),
    ]
    .concat();
    let inline = funnel_with_comment("funnel-c", &[], Some(INLINE));
    let missing = funnel("funnel-d", &[("data-data-source", "nowhere")]);

    TestDeckBuilder::new()
        .with_slide(&first)
        .with_stack(&[inline.as_str(), missing.as_str()])
        .with_slide("<p>outro</p>")
        .build()
}

fn content(deck: &Deck, id: &str) -> String {
    deck.mount(id).map(|m| m.content().to_string()).unwrap_or_default()
}

#[test]
fn test_ready_processes_first_slide() {
    let mut deck = sample_deck();
    let coordinator = coordinator(MemoryFetcher::with_sales());

    let event = deck.ready();
    let report = block_on(coordinator.handle(&mut deck, event));

    assert_eq!(report.slide, Some(SlideRef::new(0, 0)));
    assert_eq!(report.found, vec!["funnel-a", "funnel-b"]);
    assert_eq!(report.drawn, vec!["funnel-a", "funnel-b"]);
    assert!(report.skipped.is_empty());
    assert!(content(&deck, "funnel-a").contains("draw=\"1\""));
    assert!(content(&deck, "funnel-b").contains("draw=\"1\""));
    // Containers on other slides are untouched
    assert!(content(&deck, "funnel-c").is_empty());
}

#[test]
fn test_slide_change_processes_new_slide() {
    let mut deck = sample_deck();
    let coordinator = coordinator(MemoryFetcher::with_sales());

    let event = deck.navigate(SlideRef::new(1, 0)).unwrap();
    let report = block_on(coordinator.handle(&mut deck, event));
    assert_eq!(report.drawn, vec!["funnel-c"]);

    let event = deck.navigate(SlideRef::new(1, 1)).unwrap();
    let report = block_on(coordinator.handle(&mut deck, event));
    assert_eq!(report.found, vec!["funnel-d"]);
    assert_eq!(report.skipped, vec!["funnel-d"]);
    assert!(coordinator.charts().record("funnel-d").is_none());

    let event = deck.navigate(SlideRef::new(2, 0)).unwrap();
    let report = block_on(coordinator.handle(&mut deck, event));
    assert!(report.found.is_empty());
}

#[test]
fn test_always_reinit_rebuilds_on_return() {
    let mut deck = sample_deck();
    let coordinator = coordinator(MemoryFetcher::with_sales());

    let ready = deck.ready();
    block_on(coordinator.handle(&mut deck, ready));
    for slide in [SlideRef::new(1, 0), SlideRef::new(0, 0)] {
        let event = deck.navigate(slide).unwrap();
        block_on(coordinator.handle(&mut deck, event));
    }

    let renderer = coordinator.charts().renderer();
    let creates = renderer
        .events()
        .iter()
        .filter(|e| e.as_str() == "create funnel-a")
        .count();
    assert_eq!(creates, 2);
    assert!(renderer.events().contains(&"teardown funnel-a".to_string()));
    // Rebuilding reuses cached data
    let sales_fetches = coordinator
        .resolver()
        .fetcher()
        .requested()
        .iter()
        .filter(|path| path.ends_with("sales.csv"))
        .count();
    assert_eq!(sales_fetches, 1);
}

#[test]
fn test_reinit_on_horizontal_reuses_within_stack() {
    let inline = funnel_with_comment("funnel-c", &[], Some(INLINE));
    let mut deck = TestDeckBuilder::new()
        .with_slide("<h1>intro</h1>")
        .with_stack(&[inline.as_str(), "<p>details</p>"])
        .build();
    let coordinator =
        coordinator(MemoryFetcher::new()).with_navigation(NavigationPolicy::ReinitOnHorizontal);

    for slide in [SlideRef::new(1, 0), SlideRef::new(1, 1), SlideRef::new(1, 0)] {
        let event = deck.navigate(slide).unwrap();
        block_on(coordinator.handle(&mut deck, event));
    }

    let renderer = coordinator.charts().renderer();
    assert_eq!(renderer.count("create"), 1);
    assert_eq!(renderer.count("draw"), 2);
    assert!(content(&deck, "funnel-c").contains("draw=\"2\""));

    // Arriving from another stack forces a rebuild
    for slide in [SlideRef::new(0, 0), SlideRef::new(1, 0)] {
        let event = deck.navigate(slide).unwrap();
        block_on(coordinator.handle(&mut deck, event));
    }
    assert_eq!(renderer.count("create"), 2);
}

#[test]
fn test_unknown_previous_slide_forces_reinit() {
    let mut deck = sample_deck();
    let coordinator =
        coordinator(MemoryFetcher::with_sales()).with_navigation(NavigationPolicy::ReinitOnHorizontal);

    let ready = deck.ready();
    block_on(coordinator.handle(&mut deck, ready));
    let event = DeckEvent::SlideChanged {
        previous: None,
        current: SlideRef::new(0, 0),
    };
    block_on(coordinator.handle(&mut deck, event));

    assert_eq!(coordinator.charts().renderer().count("create"), 4);
}

#[test]
fn test_resize_rebuilds_current_slide_with_new_direction() {
    let mut deck = sample_deck().with_viewport(Viewport::new(1280.0, 720.0));
    let coordinator = coordinator(MemoryFetcher::with_sales());

    let ready = deck.ready();
    block_on(coordinator.handle(&mut deck, ready));
    assert!(content(&deck, "funnel-a").contains("direction=\"horizontal\""));

    let event = deck.resize(Viewport::new(480.0, 800.0));
    let report = block_on(coordinator.handle(&mut deck, event));

    assert_eq!(report.slide, Some(SlideRef::new(0, 0)));
    assert_eq!(report.drawn.len(), 2);
    assert!(content(&deck, "funnel-a").contains("direction=\"vertical\""));
    let record = coordinator.charts().record("funnel-a").unwrap();
    let record = record.lock();
    assert!(!record.instance.draws[0].animation);
}

#[test]
fn test_failing_container_does_not_stop_siblings() {
    let body = [
        funnel("funnel-missing", &[("data-data-source", "absent"), ("data-format", "csv")]),
        funnel_with_comment("funnel-broken", &[], Some(r#"{"data": {"labels": [], "values": []}}"#)),
        funnel("funnel-ok", &[("data-data-source", "sales"), ("data-format", "csv")]),
    ]
    .concat();
    let mut deck = TestDeckBuilder::new().with_slide(&body).build();
    let coordinator = coordinator(MemoryFetcher::with_sales());

    let ready = deck.ready();
    let report = block_on(coordinator.handle(&mut deck, ready));

    assert_eq!(report.found.len(), 3);
    assert_eq!(report.skipped, vec!["funnel-missing", "funnel-broken"]);
    assert_eq!(report.drawn, vec!["funnel-ok"]);
}

#[test]
fn test_host_entry_points() {
    let mut deck = sample_deck();
    let coordinator = coordinator(MemoryFetcher::with_sales());

    assert!(!block_on(coordinator.initialize_chart(&mut deck, "funnel-zzz", true)));
    assert!(!coordinator.draw_chart(&mut deck, "funnel-a"));

    assert!(block_on(coordinator.initialize_chart(&mut deck, "funnel-a", false)));
    assert!(content(&deck, "funnel-a").is_empty());
    assert!(coordinator.draw_chart(&mut deck, "funnel-a"));
    assert!(!content(&deck, "funnel-a").is_empty());

    // Without force the existing record is kept
    let before = coordinator.charts().record("funnel-a").unwrap();
    assert!(block_on(coordinator.initialize_chart(&mut deck, "funnel-a", false)));
    let after = coordinator.charts().record("funnel-a").unwrap();
    assert!(std::sync::Arc::ptr_eq(&before, &after));
}

#[test]
fn test_presentation_view_of_deck() {
    let deck = sample_deck();

    assert_eq!(deck.current_slide(), SlideRef::new(0, 0));
    let ids: Vec<String> = deck
        .containers(SlideRef::new(1, 1))
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["funnel-d"]);
    assert_eq!(deck.container("funnel-c").unwrap().inline_comments, vec![INLINE]);
}
