pub mod cli;
pub mod config;
pub mod export;
pub mod github;
pub mod output;
pub mod run;
