//! Construction parameters for a `Network`.

use crate::activator::Activator;
use crate::error::{Error, Result};

/// The hyperparameters of a network, fixed once the network is built.
///
/// # Example
///
/// ```
/// use backprop::{Activator, NetworkConfig};
///
/// let config = NetworkConfig::new(&[5, 10, 10, 5])
///     .activator(Activator::ReLU)
///     .learning_rate(0.01)
///     .batch_size(10)
///     .momentum(0.9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    layer_sizes: Vec<usize>,
    activator: Activator,
    learning_rate: f64,
    batch_size: usize,
    momentum: f64,
}

impl NetworkConfig {
    /// Creates a new configuration.
    ///
    /// Arguments:
    ///  * `layer_sizes` - the number of neurons in each layer, starting with
    ///                    the input width. Must contain at least 2 elements.
    ///
    /// The configuration is initialized with some default values. These
    /// defaults are:
    ///
    /// * A ReLU activation function.
    /// * A learning rate of 0.1.
    /// * A mini-batch of a single sample.
    /// * No momentum.
    pub fn new(layer_sizes: &[usize]) -> Self {
        NetworkConfig {
            layer_sizes: layer_sizes.into(),
            activator: Activator::ReLU,
            learning_rate: 0.1,
            batch_size: 1,
            momentum: 0.0,
        }
    }

    /// Sets the activation function used by every layer.
    pub fn activator(mut self, activator: Activator) -> Self {
        self.activator = activator;
        self
    }

    /// Sets the learning rate scaling every accumulated gradient.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the number of samples per parameter update.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the momentum factor. `0` disables momentum.
    pub fn momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn layer_count(&self) -> usize {
        self.layer_sizes.len().saturating_sub(1)
    }

    pub fn get_activator(&self) -> Activator {
        self.activator
    }

    pub fn get_learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn get_batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn get_momentum(&self) -> f64 {
        self.momentum
    }

    /// Verifies that the configuration describes a trainable network,
    /// returning an error if something is wrong.
    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "need an input and an output layer, got {} layer sizes",
                self.layer_sizes.len()
            )));
        }
        if let Some(i) = self.layer_sizes.iter().position(|&n| n == 0) {
            return Err(Error::InvalidConfig(format!("layer {} is empty", i)));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch size must be at least 1".into()));
        }
        if !(self.momentum.is_finite() && self.momentum >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "momentum must be non-negative, got {}",
                self.momentum
            )));
        }
        Ok(())
    }
}
