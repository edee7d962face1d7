pub mod classify;
pub mod export;
pub mod optimize;
pub mod options;
pub mod view;
