//! Integration tests for kitabu
//!
//! Exercise the public API end to end with the JSON fixtures in
//! tests/fixtures/: catalog lookup, opening a book in the viewer, and the
//! dashboards built from provider profiles.

use std::path::PathBuf;

use kitabu::dashboard::{heading, Collection, Panel};
use kitabu::{
    Book, BookFilter, CatalogProvider, Dashboard, Direction, Level, PaginatedViewer, Role,
    SimulatedHost, StaticCatalog, Tab,
};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

fn catalog() -> StaticCatalog {
    StaticCatalog::from_path(fixture("catalog.json")).expect("catalog fixture should load")
}

// -- Catalog tests ------------------------------------------------------------

#[test]
fn test_catalog_lists_and_filters() {
    let catalog = catalog();
    let all = catalog.books(&BookFilter::any()).expect("listing");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].page_count, 6);

    let beginner = catalog
        .books(&BookFilter::any().with_level(Level::Beginner))
        .expect("listing");
    assert_eq!(beginner.len(), 1);
    assert_eq!(beginner[0].title, "Simba na Marafiki");
}

#[test]
fn test_catalog_book_matches_standalone_fixture() {
    let from_catalog = catalog().book(1).expect("book 1");
    let standalone = Book::from_path(fixture("simba.json")).expect("simba fixture");
    assert_eq!(from_catalog, standalone);
}

// -- Viewer tests -------------------------------------------------------------

#[test]
fn test_read_catalog_book_to_the_end() {
    let book = catalog().book(1).expect("book 1");
    let mut viewer = PaginatedViewer::new(book).expect("readable");

    let mut seen = vec![viewer.current_page().text.clone()];
    for _ in 0..10 {
        viewer.navigate(Direction::Next);
        viewer.complete_transition();
        let text = viewer.current_page().text.clone();
        if seen.last() != Some(&text) {
            seen.push(text);
        }
    }
    assert_eq!(seen.len(), 6);
    assert!(seen[5].starts_with("Wote watatu"));
    assert_eq!(viewer.page_view().position_label, "Page 6 of 6");
}

#[test]
fn test_fullscreen_converges_after_external_exit() {
    let host = SimulatedHost::new();
    let book = catalog().book(2).expect("book 2");
    let mut viewer = PaginatedViewer::new(book).expect("readable");

    viewer.toggle_fullscreen(&host);
    assert!(viewer.state().is_fullscreen);

    host.external_exit();
    viewer.sync_fullscreen(kitabu::FullscreenHost::is_fullscreen(&host));
    assert!(!viewer.state().is_fullscreen);
    assert_eq!(viewer.page_view().fullscreen_label, "Enter fullscreen");
}

// -- Dashboard tests ----------------------------------------------------------

#[test]
fn test_dashboards_from_provider_profiles() {
    let catalog = catalog();

    let mut parent = Dashboard::new(catalog.profile(Role::Parent).expect("parent"));
    assert_eq!(heading(parent.role()), "Wasifu wa Mzazi");
    assert!(parent.select(Tab::Children));
    match parent.panel() {
        Panel::Children(children) => {
            let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, ["Juma Wanjiku", "Amina Wanjiku"]);
        }
        other => panic!("expected children panel, got {:?}", other),
    }

    let mut child = Dashboard::new(catalog.profile(Role::Child).expect("child"));
    assert!(!child.select(Tab::Reports));
    assert!(child.select(Tab::Books));
    assert_eq!(child.panel(), Panel::Books(Collection::Reading));

    let author = Dashboard::new(catalog.profile(Role::Author).expect("author"));
    assert_eq!(author.profile().email(), Some("thomas@example.com"));
}
