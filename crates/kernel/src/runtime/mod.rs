pub mod unwind;
