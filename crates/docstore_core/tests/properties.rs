//! Property tests over generated documents.

use docstore_core::{
    navigator, DocumentTransaction, ErrorKind, Handle, Path, PathSegment, Transaction, Value,
};
use docstore_testkit::{document_strategy, invalid_key_strategy, paths_in, TestStore};
use proptest::prelude::*;

/// Mints a handle for `path` by walking it from the root.
fn handle_for(txn: &mut Transaction<'_>, path: &Path) -> Handle {
    let mut handle = txn.root().unwrap();
    for segment in path.segments() {
        handle = match segment {
            PathSegment::Key(key) => txn.child(handle, key).unwrap(),
            PathSegment::Index(idx) => txn.element(handle, *idx).unwrap(),
        };
    }
    handle
}

fn store_for(document: &Value) -> TestStore {
    TestStore::with_json(&docstore_codec::serialize(document).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_node_is_reachable_through_handles(document in document_strategy()) {
        let test_store = store_for(&document);
        let mut txn = test_store.begin().unwrap();

        for path in paths_in(&document) {
            let handle = handle_for(&mut txn, &path);
            prop_assert_eq!(&txn.path(handle).unwrap(), &path);
            let expected = navigator::resolve(&document, &path).unwrap();
            prop_assert_eq!(&txn.get_value(handle).unwrap(), expected);
        }
    }

    #[test]
    fn rollback_never_touches_the_store(document in document_strategy()) {
        let test_store = store_for(&document);
        let before = test_store.persisted_bytes();

        let mut txn = test_store.begin().unwrap();
        let root = txn.root().unwrap();
        for key in txn.keys(root).unwrap() {
            txn.remove(root, &key).unwrap();
        }
        txn.make_string(root, "scratch", "x").unwrap();
        txn.rollback();

        prop_assert_eq!(test_store.persisted_bytes(), before);
        prop_assert_eq!(test_store.document(), document);
    }

    #[test]
    fn unchanged_commit_preserves_document(document in document_strategy()) {
        let test_store = store_for(&document);
        let mut txn = test_store.begin().unwrap();
        txn.commit().unwrap();
        prop_assert_eq!(test_store.document(), document);
    }

    #[test]
    fn handles_survive_sibling_inserts(document in document_strategy(), extra in "[a-z]{1,8}") {
        let test_store = store_for(&document);
        let mut txn = test_store.begin().unwrap();
        let paths = paths_in(&document);
        let handles: Vec<Handle> = paths.iter().map(|p| handle_for(&mut txn, p)).collect();

        let root = txn.root().unwrap();
        let key = format!("{extra}_new");
        if !txn.has(root, &key).unwrap() {
            txn.make_int(root, &key, 1).unwrap();
        }

        for (handle, path) in handles.iter().zip(&paths) {
            let expected = navigator::resolve(&document, path).unwrap();
            prop_assert_eq!(txn.kind(*handle).unwrap(), expected.kind());
        }
    }

    #[test]
    fn invalid_keys_never_mutate(document in document_strategy(), key in invalid_key_strategy()) {
        let test_store = store_for(&document);
        let mut txn = test_store.begin().unwrap();
        let root = txn.root().unwrap();

        let err = txn.make_object(root, &key).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidKey);
        let err = txn.remove(root, &key).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidKey);
        prop_assert_eq!(txn.get_value(root).unwrap(), document);
    }

    #[test]
    fn removing_a_key_stales_its_subtree(document in document_strategy()) {
        let test_store = store_for(&document);
        let mut txn = test_store.begin().unwrap();
        let root = txn.root().unwrap();
        let keys = txn.keys(root).unwrap();
        prop_assume!(!keys.is_empty());

        let victim = Path::root().key(keys[0].as_str());
        let doomed: Vec<Handle> = paths_in(&document)
            .iter()
            .filter(|p| victim.is_ancestor_of(p))
            .map(|p| handle_for(&mut txn, p))
            .collect();

        txn.remove(root, &keys[0]).unwrap();
        for handle in doomed {
            prop_assert_eq!(txn.kind(handle).unwrap_err().kind(), ErrorKind::StaleHandle);
        }
    }
}
