#![allow(unused_imports)]

pub use sharepush_test_utils::{builders, fakes, init_tracing, with_timeout};
