mod common;

use circulation::domain::ports::LibraryStore;
use common::{engine_with_store, seed_book};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Throws a few hundred randomized circulation requests at the engine and
/// checks that the availability invariant holds regardless of ordering.
#[tokio::test]
async fn test_random_command_stream_keeps_invariants() {
    let (engine, store) = engine_with_store();
    seed_book(&engine, "Dune", "9780000000001", 3).await;
    seed_book(&engine, "Foundation", "9780000000002", 1).await;

    let mut rng = StdRng::seed_from_u64(42);
    let patrons = ["100001", "100002", "100003", "bad-id"];

    for _ in 0..500 {
        let patron = patrons[rng.gen_range(0..patrons.len())];
        let book_id = rng.gen_range(0..4u32); // includes unknown ids
        if rng.gen_bool(0.5) {
            let _ = engine.borrow_book(patron, book_id).await;
        } else {
            let _ = engine.return_book(patron, book_id).await;
        }
    }

    for book in store.all_books().await.unwrap() {
        assert!(
            book.available_copies <= book.total_copies,
            "book {} oversubscribed",
            book.id
        );
    }

    // Every valid patron stays at or below the borrowing limit.
    for patron in ["100001", "100002", "100003"] {
        let report = engine.patron_report(patron).await.unwrap().unwrap();
        assert!(report.total_active <= 5, "patron {patron} over the limit");
    }
}
