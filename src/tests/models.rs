use std::sync::Arc;

use loom::model::Builder;
use loom::thread::spawn;

use crate::{BucketMap, SizeAccounting, ABSENT};

// Checks that racing inserts of the same key leave exactly one entry.
#[test]
fn put_put_same_key() {
    let mut model_builder = Builder::new();
    model_builder.max_threads = 3;
    model_builder.check(|| {
        let map = Arc::new(BucketMap::new(2));
        let map_clone = map.clone();
        let thread_put = spawn(move || map_clone.put(1, 10));
        let previous = map.put(1, 20);
        let other_previous = thread_put.join().unwrap();

        assert!(
            (previous == ABSENT && other_previous == 20)
                || (previous == 10 && other_previous == ABSENT)
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.dump().to_string().matches("(1,").count(), 1);
        assert_eq!(map.num_ops(), 2);
    });
}

// Checks that a reader sees either the old chain or the new chain, never a freed entry.
#[test]
fn get_delete_same_bucket() {
    let mut model_builder = Builder::new();
    model_builder.max_threads = 3;
    model_builder.check(|| {
        let map = Arc::new(BucketMap::new(1));
        assert_eq!(map.put(1, 1), ABSENT);
        assert_eq!(map.put(2, 2), ABSENT);

        let map_clone = map.clone();
        let thread_delete = spawn(move || map_clone.delete(2));
        let read = map.get(1);
        let maybe_deleted = map.get(2);

        assert_eq!(thread_delete.join().unwrap(), 2);
        assert_eq!(read, 1);
        assert!(maybe_deleted == 2 || maybe_deleted == ABSENT);
        assert_eq!(map.get(2), ABSENT);
        assert_eq!(map.len(), 1);
    });
}

// Checks that only one of two racing deletions removes the entry, and the count follows it.
#[test]
fn delete_delete_same_key() {
    for accounting in [SizeAccounting::Exact, SizeAccounting::Eager] {
        let mut model_builder = Builder::new();
        model_builder.max_threads = 3;
        model_builder.check(move || {
            let map = Arc::new(BucketMap::with_accounting(1, accounting));
            assert_eq!(map.put(7, 70), ABSENT);

            let map_clone = map.clone();
            let thread_delete = spawn(move || map_clone.delete(7));
            let removed = map.delete(7);
            let other_removed = thread_delete.join().unwrap();

            assert!(
                (removed == 70 && other_removed == ABSENT)
                    || (removed == ABSENT && other_removed == 70)
            );
            let expected_size = match accounting {
                SizeAccounting::Exact => 0,
                SizeAccounting::Eager => -1,
            };
            assert_eq!(map.statistics().size, expected_size);
            assert_eq!(map.num_ops(), 3);
        });
    }
}
