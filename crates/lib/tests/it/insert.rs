//! Tests for the atomic subtree-create protocol and the write primitives.

use std::collections::HashSet;

use crate::helpers::{create_tree, name_set, names, test_store};
use taxa::{SubtreeInserter, SubtreeSpec};

#[tokio::test]
async fn test_create_single_root() {
    let store = test_store().await;
    let root = create_tree(&store, &SubtreeSpec::leaf("category")).await;

    assert_eq!(root.name, "category");
    assert!(root.parent_id.is_none());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_nested_subtree() {
    // The original five-node shape: three children, one grandchild.
    let store = test_store().await;
    let spec = SubtreeSpec::with_children(
        "category 1",
        vec![
            SubtreeSpec::leaf("category 1.1"),
            SubtreeSpec::leaf("category 1.2"),
            SubtreeSpec::with_children("category 1.3", vec![SubtreeSpec::leaf("category 1.3.1")]),
        ],
    );
    let root = create_tree(&store, &spec).await;
    assert_eq!(store.count().await.unwrap(), 5);

    let descendants = store.get_descendants(&root.id).await.unwrap();
    let deep = descendants
        .iter()
        .find(|c| c.name == "category 1.3.1")
        .unwrap();
    let middle = descendants
        .iter()
        .find(|c| c.name == "category 1.2")
        .unwrap();

    assert_eq!(
        name_set(&store.get_ancestors(&deep.id).await.unwrap()),
        HashSet::from(["category 1.3".to_string(), "category 1".to_string()])
    );
    assert_eq!(
        name_set(&store.get_children(&root.id).await.unwrap()),
        HashSet::from([
            "category 1.1".to_string(),
            "category 1.2".to_string(),
            "category 1.3".to_string(),
        ])
    );
    assert_eq!(
        name_set(&store.get_siblings(&middle.id).await.unwrap()),
        HashSet::from(["category 1.1".to_string(), "category 1.3".to_string()])
    );
}

#[tokio::test]
async fn test_created_subtree_round_trips_through_descendants() {
    let store = test_store().await;
    let spec = SubtreeSpec::with_children(
        "Electronics",
        vec![
            SubtreeSpec::with_children("Phones", vec![SubtreeSpec::leaf("Smartphones")]),
            SubtreeSpec::leaf("Laptops"),
        ],
    );
    let root = create_tree(&store, &spec).await;
    assert_eq!(store.count().await.unwrap(), 4);

    // Exactly the submitted non-root names come back out.
    let descendants = store.get_descendants(&root.id).await.unwrap();
    assert_eq!(
        name_set(&descendants),
        HashSet::from([
            "Phones".to_string(),
            "Laptops".to_string(),
            "Smartphones".to_string(),
        ])
    );

    assert_eq!(
        name_set(&store.get_children(&root.id).await.unwrap()),
        HashSet::from(["Phones".to_string(), "Laptops".to_string()])
    );

    let smartphones = descendants.iter().find(|c| c.name == "Smartphones").unwrap();
    assert_eq!(
        name_set(&store.get_ancestors(&smartphones.id).await.unwrap()),
        HashSet::from(["Phones".to_string(), "Electronics".to_string()])
    );

    let phones = descendants.iter().find(|c| c.name == "Phones").unwrap();
    assert_eq!(
        name_set(&store.get_siblings(&phones.id).await.unwrap()),
        HashSet::from(["Laptops".to_string()])
    );
}

#[tokio::test]
async fn test_duplicate_root_name_fails_second_insert() {
    let store = test_store().await;
    let inserter = SubtreeInserter::new(&store);

    inserter.insert(&SubtreeSpec::leaf("Books")).await.unwrap();
    let err = inserter.insert(&SubtreeSpec::leaf("Books")).await.unwrap_err();

    assert!(err.is_duplicate_name());
    assert!(!err.is_invalid_spec());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_empty_name_rejected_before_storage() {
    let store = test_store().await;
    let inserter = SubtreeInserter::new(&store);

    let err = inserter.insert(&SubtreeSpec::leaf("")).await.unwrap_err();
    assert!(err.is_invalid_spec());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_over_length_child_name_rejects_whole_subtree() {
    let store = test_store().await;
    let spec = SubtreeSpec::with_children(
        "valid",
        vec![SubtreeSpec::leaf("x".repeat(256))],
    );

    let err = SubtreeInserter::new(&store).insert(&spec).await.unwrap_err();
    assert!(err.is_invalid_spec());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_within_batch_rejected() {
    // Even under different parents, a repeated name can never materialize.
    let store = test_store().await;
    let spec = SubtreeSpec::with_children(
        "Root",
        vec![
            SubtreeSpec::with_children("A", vec![SubtreeSpec::leaf("Shared")]),
            SubtreeSpec::with_children("B", vec![SubtreeSpec::leaf("Shared")]),
        ],
    );

    let err = SubtreeInserter::new(&store).insert(&spec).await.unwrap_err();
    assert!(err.is_invalid_spec());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_explicit_empty_children_is_a_leaf() {
    let store = test_store().await;
    let spec = SubtreeSpec::with_children("Leafy", vec![]);
    let root = create_tree(&store, &spec).await;

    assert!(store.get_descendants(&root.id).await.unwrap().is_empty());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_collision_anywhere_in_batch_persists_nothing() {
    let store = test_store().await;
    store.create_root("Books").await.unwrap();
    let before = store.count().await.unwrap();

    // The collision sits deep in the batch, not at the root.
    let spec = SubtreeSpec::with_children(
        "Media",
        vec![
            SubtreeSpec::leaf("Films"),
            SubtreeSpec::with_children("Print", vec![SubtreeSpec::leaf("Books")]),
        ],
    );
    let err = SubtreeInserter::new(&store).insert(&spec).await.unwrap_err();

    assert!(err.is_duplicate_name());
    assert_eq!(store.count().await.unwrap(), before);
    assert!(!store.exists_by_names(&names(&["Media", "Films", "Print"])).await.unwrap());
}

#[tokio::test]
async fn test_create_root_primitive_reports_duplicates() {
    let store = test_store().await;
    store.create_root("Books").await.unwrap();

    let err = store.create_root("Books").await.unwrap_err();
    assert!(err.is_duplicate_name());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_children_assigns_distinct_ids() {
    let store = test_store().await;
    let root = store.create_root("root").await.unwrap();
    let created = store
        .create_children(&root.id, &names(&["a", "b", "c"]))
        .await
        .unwrap();

    assert_eq!(created.len(), 3);
    let ids: HashSet<_> = created.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), 3);
    for child in &created {
        assert_eq!(child.parent_id.as_ref(), Some(&root.id));
    }
}

#[tokio::test]
async fn test_delete_cascades_to_the_whole_subtree() {
    let store = test_store().await;
    let spec = SubtreeSpec::with_children(
        "Electronics",
        vec![
            SubtreeSpec::with_children("Phones", vec![SubtreeSpec::leaf("Smartphones")]),
            SubtreeSpec::leaf("Laptops"),
        ],
    );
    let root = create_tree(&store, &spec).await;
    let phones = store
        .get_descendants(&root.id)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Phones")
        .unwrap();

    store.delete(&phones.id).await.unwrap();

    // Phones and Smartphones are gone; the rest of the tree survives.
    assert_eq!(store.count().await.unwrap(), 2);
    assert_eq!(
        name_set(&store.get_descendants(&root.id).await.unwrap()),
        HashSet::from(["Laptops".to_string()])
    );

    let err = store.delete(&phones.id).await.unwrap_err();
    assert!(err.is_not_found());
}
