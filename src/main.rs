//! Demo: one producer, one consumer, a 16-slot buffer, and keyboard
//! cancellation. Press Enter to stop the run early.

use std::io::{self, BufRead};
use std::thread;

use blocking_ringbuffer::pipeline::{run, CancelFlag};

const CAPACITY: usize = 16;
const ITEM_COUNT: i32 = 1000;

fn main() {
    let cancel = CancelFlag::new();

    // Not joined: it may still be blocked on stdin when the pipeline drains,
    // and process exit reaps it.
    let watcher = cancel.clone();
    thread::spawn(move || {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_ok() {
            watcher.cancel();
        }
    });

    let emitted = run(CAPACITY, ITEM_COUNT, cancel, |value| {
        println!("              {value}-->get");
    });

    println!("all threads stopped ({emitted} items produced)");
}
