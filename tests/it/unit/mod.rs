//! Unit tests for LotPlanner.

mod gesture_tests;
mod hit_testing_tests;
mod settings_watcher_tests;
mod store_tests;
mod viewport_tests;
