use std::fmt;
use std::io::Write;

use crate::{Puzzle, build_puzzle};

mod construction;
mod controller;
mod slicing;

const ALL_IDS: &[&str] = &[
    "pyraminx", "skewb", "megaminx", "cube:2", "cube:3", "cube:2x3x4", "mirror:3", "void",
];

fn build(id: &str) -> Puzzle {
    let (puzzle, _) = time_it(format!("Building {id}"), || {
        build_puzzle(id).expect("bad puzzle ID")
    });
    puzzle
}

fn time_it<T>(task: impl fmt::Display, f: impl FnOnce() -> T) -> (T, std::time::Duration) {
    print!("{task} ...");
    std::io::stdout().flush().expect("error flushing stdout");
    let t1 = std::time::Instant::now();
    let ret = f();
    let elapsed = t1.elapsed();
    println!(" done in {elapsed:?}");
    (ret, elapsed)
}
