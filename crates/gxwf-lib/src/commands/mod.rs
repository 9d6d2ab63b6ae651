pub mod app;
pub mod dockstore_init;
pub mod lint;
pub mod run;
