//! Command line front end over the storefront library.

pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod logging;
