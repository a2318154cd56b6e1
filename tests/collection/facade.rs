// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use embedding_collections::core::types::Metadata;
use embedding_collections::{
    Collection, CollectionOptions, EmbeddingStore, ErrorKind, StaticModelRegistry,
    DEFAULT_SIMILAR_LIMIT,
};
use serde_json::json;

use crate::common::{points_model, registry_with};

fn open_points<'a>(
    store: &'a EmbeddingStore,
    registry: &'a StaticModelRegistry,
) -> Collection<'a> {
    let collection = Collection::open(
        store,
        registry,
        "points",
        CollectionOptions::with_model_id("model-a"),
    )
    .unwrap();
    collection.embed("a", "east", None, false).unwrap();
    collection.embed("b", "east-ish", None, false).unwrap();
    collection.embed("c", "west", None, false).unwrap();
    collection
}

#[cfg(test)]
mod embed_tests {
    use super::*;

    #[test]
    fn test_embed_stores_encoded_vector() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        assert_eq!(collection.count().unwrap(), 3);
        let record = collection.fetch("b").unwrap();
        assert_eq!(record.vector().unwrap(), vec![0.99, 0.01]);
        assert_eq!(record.collection_id, collection.id());
    }

    #[test]
    fn test_content_kept_only_when_requested() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);
        collection.embed("kept", "north", None, true).unwrap();

        assert_eq!(collection.fetch("a").unwrap().content, None);
        assert_eq!(
            collection.fetch("kept").unwrap().content.as_deref(),
            Some("north")
        );
    }

    #[test]
    fn test_metadata_written_only_when_non_empty() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        let metadata: Metadata = json!({"tag": "compass"}).as_object().cloned().unwrap();
        collection.embed("m", "north", Some(&metadata), false).unwrap();
        collection.embed("n", "north", Some(&Metadata::new()), false).unwrap();

        assert_eq!(collection.fetch("m").unwrap().metadata, Some(metadata));
        assert_eq!(collection.fetch("n").unwrap().metadata, None);
    }

    #[test]
    fn test_duplicate_embed_rejected() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        let err = collection.embed("a", "west", None, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Uniqueness);

        let record = collection.fetch("a").unwrap();
        assert_eq!(record.vector().unwrap(), vec![1.0, 0.0]);
        assert_eq!(record.content, None);
    }

    #[test]
    fn test_model_failure_writes_nothing() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        let err = collection.embed("q", "unknown text", None, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Model);
        assert_eq!(collection.count().unwrap(), 3);
    }

    #[test]
    fn test_bound_model_is_called() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let model = points_model("model-a");
        let registry = StaticModelRegistry::new();
        let collection = Collection::open(
            &store,
            &registry,
            "docs",
            CollectionOptions::with_model(model.clone()),
        )
        .unwrap();

        collection.embed("1", "east", None, false).unwrap();
        collection.similar("west", 1).unwrap();
        assert_eq!(model.calls(), 2);
    }

    #[test]
    fn test_multi_embed_unsupported() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        let err = collection
            .embed_multi(&[("x", "east"), ("y", "west")], true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        let err = collection
            .embed_multi_with_metadata(&[("x", "east", Metadata::new())])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);

        assert_eq!(collection.count().unwrap(), 3);
    }
}

#[cfg(test)]
mod similarity_tests {
    use super::*;

    #[test]
    fn test_similar_by_vector() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        let results = collection.similar_by_vector(&[1.0, 0.0], 2, None).unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_similar_by_vector_skip() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        let results = collection
            .similar_by_vector(&[1.0, 0.0], DEFAULT_SIMILAR_LIMIT, Some("a"))
            .unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_similar_by_id_self_exclusion() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        let results = collection.similar_by_id("a", DEFAULT_SIMILAR_LIMIT).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "b");
        assert!(results.iter().all(|r| r.id != "a"));
    }

    #[test]
    fn test_similar_by_unknown_id() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        let err = collection.similar_by_id("nope", 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_similar_by_text() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = open_points(&store, &registry);

        let results = collection.similar("west", 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "c");
    }

    #[test]
    fn test_similar_on_empty_collection() {
        let store = EmbeddingStore::open_in_memory().unwrap();
        let registry = registry_with(&[points_model("model-a")]);
        let collection = Collection::open(
            &store,
            &registry,
            "empty",
            CollectionOptions::with_model_id("model-a"),
        )
        .unwrap();

        assert!(collection.similar("east", 5).unwrap().is_empty());
        assert!(collection.similar_by_vector(&[0.0, 1.0], 5, None).unwrap().is_empty());
    }
}
