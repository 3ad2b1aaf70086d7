mod helpers;

mod micropost_test;
mod user_test;
