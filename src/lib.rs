extern crate bincode;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate thiserror;

pub mod activator;
pub mod config;
pub mod error;
pub mod layer;
pub mod matrix;
pub mod network;
pub mod params;
pub mod persist;
pub mod trainer;

mod utils;

pub use crate::activator::Activator;
pub use crate::config::NetworkConfig;
pub use crate::error::{Error, Result};
pub use crate::network::Network;
pub use crate::params::Parameters;
