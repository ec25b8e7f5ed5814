//! Catalog integration tests

mod common;

use lectern::models::BookField;
use uuid::Uuid;

#[tokio::test]
async fn add_and_get_round_trip() {
    let (_repository, services) = common::setup().await;
    let id = services
        .catalog
        .add("The Hobbit", "J.R.R. Tolkien", "Library", Some("fantasy"), 3)
        .await
        .unwrap();

    let book = services.catalog.get(id).await.unwrap().unwrap();
    assert_eq!(book.title, "The Hobbit");
    assert_eq!(book.author, "J.R.R. Tolkien");
    assert_eq!(book.genre.as_deref(), Some("fantasy"));
    assert_eq!(book.location_tag, "Library");
    assert_eq!(book.total_copies, 3);

    assert!(services.catalog.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_filters_by_location() {
    let (_repository, services) = common::setup().await;
    services
        .catalog
        .add("A", "Author", "3B", None, 1)
        .await
        .unwrap();
    services
        .catalog
        .add("B", "Author", "3B", None, 1)
        .await
        .unwrap();
    services
        .catalog
        .add("C", "Author", "4A", None, 1)
        .await
        .unwrap();

    assert_eq!(services.catalog.list(None).await.unwrap().len(), 3);
    assert_eq!(services.catalog.list(Some("3B")).await.unwrap().len(), 2);
    assert!(services.catalog.list(Some("9Z")).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_is_case_insensitive_substring_per_field() {
    let (_repository, services) = common::setup().await;
    services
        .catalog
        .add("Dune", "Frank Herbert", "Library", Some("Science Fiction"), 2)
        .await
        .unwrap();
    services
        .catalog
        .add("Emma", "Jane Austen", "Reading Corner", None, 1)
        .await
        .unwrap();

    let by_title = services.catalog.search("dUnE", BookField::Title).await.unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].title, "Dune");

    let by_author = services
        .catalog
        .search("austen", BookField::Author)
        .await
        .unwrap();
    assert_eq!(by_author.len(), 1);

    let by_genre = services
        .catalog
        .search("fiction", BookField::Genre)
        .await
        .unwrap();
    assert_eq!(by_genre.len(), 1);
    assert_eq!(by_genre[0].title, "Dune");

    let by_location = services
        .catalog
        .search("corner", BookField::Location)
        .await
        .unwrap();
    assert_eq!(by_location.len(), 1);
    assert_eq!(by_location[0].title, "Emma");

    assert!(services
        .catalog
        .search("no such thing", BookField::Title)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn empty_query_matches_nothing() {
    let (_repository, services) = common::setup().await;
    services
        .catalog
        .add("Dune", "Frank Herbert", "Library", None, 1)
        .await
        .unwrap();

    for field in [
        BookField::Title,
        BookField::Author,
        BookField::Genre,
        BookField::Location,
    ] {
        assert!(services.catalog.search("", field).await.unwrap().is_empty());
    }
}
