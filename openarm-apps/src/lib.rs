#![warn(rust_2018_idioms)]

mod config;
mod description;
mod error;
mod run;
pub mod utils;

pub use crate::{config::*, description::*, error::*, run::*};
