#[path = "../common/mod.rs"]
mod common;

mod casting;
mod codec;
mod config;
mod field_order;
mod paths;
mod pointers;
