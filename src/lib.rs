#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod history;
pub mod ir;
pub mod layout;
pub mod parser;
pub mod scene_dump;
pub mod text_metrics;
pub mod view;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use view::TreeView;
