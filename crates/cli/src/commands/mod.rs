pub mod chat;
pub mod serve;

mod wiring;
