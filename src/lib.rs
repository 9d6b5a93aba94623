pub mod actions;
pub mod best;
pub mod cli;
pub mod config;
pub mod evm;
pub mod fetch;
pub mod model;
pub mod oracle;
pub mod pools;
pub mod portfolio;
pub mod rates;
pub mod schema;
pub mod session;
pub mod view;
