//! Generation and validation engines for printable logic-puzzle sheets.
//!
//! Every generator follows the same shape: build a random candidate, run a
//! puzzle-specific validator (usually an exhaustive or backtracking solver
//! proving uniqueness), and retry up to a fixed bound. The accepted artifact
//! is a `Puzzle` value holding the solution grid plus the public constraint
//! set; rendering it is the `puzzle-svg` crate's job.
//!
//! All randomized routines take `&mut impl rand::Rng` so callers can replay
//! a generation deterministically with a seeded generator.

pub mod attempt;
pub mod calcpuzzle;
pub mod countdown;
pub mod cryptarithm;
pub mod kenken;
pub mod latin;
pub mod matchstick;
pub mod maze;
pub mod minisudoku;
pub mod skyscraper;
pub mod sumpuzzle;

pub use attempt::{GenerateError, Outcome};
