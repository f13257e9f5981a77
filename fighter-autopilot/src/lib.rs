pub mod arena;
pub mod benchmark;
pub mod runner;
pub mod util;
