#![expect(clippy::expect_used, clippy::unwrap_used)]

mod nested_sets;
