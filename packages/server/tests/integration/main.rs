mod activity;
mod common;
