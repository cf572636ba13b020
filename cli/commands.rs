pub mod completion;
pub mod diff;
pub mod files;
