//! Shared counter backed by a `Store`, written the way a request-handling
//! layer would use it: an application context built once at startup and
//! passed by reference, never a process-wide global.

use anyhow::Result;

use lifecell::Store;

/// Application context threaded through handlers.
struct AppState {
    count: Store<i64>,
}

impl AppState {
    fn new() -> Self {
        Self {
            count: Store::new(0),
        }
    }
}

/// What a POST handler would do.
fn handle_increment(state: &AppState) {
    state.count.update(|current| current + 1);
}

fn main() -> Result<()> {
    let state = AppState::new();

    // A subscriber sees the current value immediately, then every change.
    let printer = state.count.subscribe(|value| println!("[count] {value}"));

    for _ in 0..3 {
        handle_increment(&state);
    }

    // Stores are safe to hit from concurrent handlers.
    let mut writers = Vec::new();
    for _ in 0..4 {
        let count = state.count.clone();
        writers.push(std::thread::spawn(move || {
            for _ in 0..5 {
                count.update(|current| current + 1);
            }
        }));
    }
    for writer in writers {
        writer.join().expect("writer panicked");
    }

    println!("final = {}", state.count.get());
    printer.unsubscribe();
    Ok(())
}
