pub mod event;
pub mod job;
pub mod states;
pub mod trace;
