//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) classifier,
//! trained by mini-batch gradient descent with optional momentum.
//!
//! # Example
//!
//! Let's train a network to tell which of two inputs is hot:
//!
//! ```
//! use backprop::{Activator, Network, NetworkConfig};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Side {
//!     Left,
//!     Right,
//! }
//!
//! let config = NetworkConfig::new(&[2, 4, 2])
//!     .activator(Activator::Sigmoid)
//!     .learning_rate(0.5)
//!     .batch_size(2);
//! let mut network = Network::new(config, vec![Side::Left, Side::Right]).unwrap();
//!
//! for _ in 0..100 {
//!     network.propagate(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
//!     network.back_propagate(&[Side::Left, Side::Right]).unwrap();
//! }
//! assert_eq!(network.guesses(), 200);
//!
//! // A single input runs through the first mini-batch slot.
//! let output = network.propagate(&[vec![1.0, 0.0]]).unwrap();
//! assert_eq!(output.len(), 2);
//! let _side: &Side = network.get_output();
//! ```

use crate::config::NetworkConfig;
use crate::error::{check_len, Error, Result};
use crate::layer::Layer;
use crate::params::Parameters;
use crate::persist::{self, Snapshot};
use crate::utils::{arg_max, Back, Front};

use rand::Rng;
use std::fmt::Debug;
use std::mem;
use std::path::Path;

/// A feedforward classifier over the labels `L`.
///
/// The network holds one row of layers per mini-batch slot, so every sample
/// of a batch keeps its own activations until back propagation. All rows
/// share the same `Parameters`, which are only changed by `apply` once the
/// whole batch has been accumulated.
#[derive(Debug)]
pub struct Network<L> {
    config: NetworkConfig,
    labels: Vec<L>,
    layers: Vec<Vec<Layer>>,
    params: Parameters,
    gradients: Parameters,
    previous_gradients: Parameters,
    outputs: Vec<Vec<f64>>,
    guesses: u64,
    right_guesses: u64,
    accuracy: f64,
}

impl<L> Network<L>
where
    L: Clone + PartialEq + Debug,
{
    /// Creates a new, untrained network with randomly initialized weights.
    ///
    /// Arguments:
    ///  * `config` - the network hyperparameters.
    ///  * `labels` - the label of each output neuron, in order.
    pub fn new(config: NetworkConfig, labels: Vec<L>) -> Result<Self> {
        Self::with_rng(config, labels, &mut rand::thread_rng())
    }

    /// Creates a new network, drawing the initial weights from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        config: NetworkConfig,
        labels: Vec<L>,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        let output_len = *config.layer_sizes().back();
        if labels.len() != output_len {
            return Err(Error::InvalidConfig(format!(
                "{} labels for {} output neurons",
                labels.len(),
                output_len
            )));
        }

        let params = Parameters::random(config.layer_sizes(), rng);
        let mut network = Network {
            layers: Vec::new(),
            gradients: Parameters::zeros(config.layer_sizes()),
            previous_gradients: Parameters::zeros(config.layer_sizes()),
            outputs: Vec::new(),
            params,
            labels,
            config,
            guesses: 0,
            right_guesses: 0,
            accuracy: 0.0,
        };
        network.build_layers();
        Ok(network)
    }

    /// Allocates a row of layers for every mini-batch slot and resets the
    /// gradient accumulators.
    fn build_layers(&mut self) {
        let sizes = self.config.layer_sizes();
        let activator = self.config.get_activator();
        let rate = self.config.get_learning_rate();
        let row: Vec<Layer> = sizes
            .windows(2)
            .enumerate()
            .map(|(l, w)| Layer::new(l, w[0], w[1], activator, rate))
            .collect();
        self.layers = vec![row; self.config.get_batch_size()];
        self.outputs = vec![vec![0.0; self.output_len()]; self.config.get_batch_size()];
        self.gradients = Parameters::zeros(sizes);
        self.previous_gradients = Parameters::zeros(sizes);
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        *self.config.layer_sizes().front()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        *self.config.layer_sizes().back()
    }

    pub fn batch_size(&self) -> usize {
        self.config.get_batch_size()
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Replaces the weights and biases, which must match the network's shape.
    pub fn set_parameters(&mut self, params: Parameters) -> Result<()> {
        if !self.params.same_shape(&params) {
            return Err(Error::ShapeMismatch {
                what: "parameters",
                expected: self.params.layer_count(),
                actual: params.layer_count(),
            });
        }
        self.params = params;
        Ok(())
    }

    /// The gradients accumulated since the last update.
    pub fn gradients(&self) -> &Parameters {
        &self.gradients
    }

    /// The gradients consumed by the last update.
    pub fn previous_gradients(&self) -> &Parameters {
        &self.previous_gradients
    }

    /// Feeds each input through its own mini-batch slot, returning the output
    /// of the first.
    ///
    /// Between one and `batch_size` inputs may be given; a single input is the
    /// usual way to classify one sample.
    pub fn propagate<I: AsRef<[f64]>>(&mut self, inputs: &[I]) -> Result<&[f64]> {
        if inputs.is_empty() || inputs.len() > self.batch_size() {
            return Err(Error::shape("input batch", self.batch_size(), inputs.len()));
        }
        for input in inputs {
            check_len("network input", self.input_len(), input.as_ref().len())?;
        }

        for ((input, row), output) in inputs.iter().zip(&mut self.layers).zip(&mut self.outputs) {
            let mut signal = input.as_ref().to_vec();
            for layer in row.iter_mut() {
                signal = layer.propagate(&self.params, &signal)?.to_vec();
            }
            *output = signal;
        }
        Ok(self.outputs.front().as_slice())
    }

    /// Trains on the last propagated mini-batch: accumulates the gradients
    /// for every slot against `targets`, then applies them.
    pub fn back_propagate(&mut self, targets: &[L]) -> Result<()> {
        self.accumulate(targets)?;
        self.apply();
        Ok(())
    }

    /// Back propagates every mini-batch slot against its target label,
    /// updating the running accuracy and accumulating gradients. The weights
    /// and biases are not changed.
    pub fn accumulate(&mut self, targets: &[L]) -> Result<()> {
        check_len("target batch", self.batch_size(), targets.len())?;
        let hot = targets
            .iter()
            .map(|t| self.label_index(t))
            .collect::<Result<Vec<_>>>()?;

        let mut signal = vec![0.0; self.output_len()];
        for (b, &target) in hot.iter().enumerate() {
            let predicted = arg_max(&self.outputs[b]);
            self.record_guess(predicted == target);
            error_signal(&self.outputs[b], target, &mut signal);

            let row = &mut self.layers[b];
            let last = row.len() - 1;
            row[last].back_propagate(&self.params, &signal, &mut self.gradients)?;
            for l in (0..last).rev() {
                let (head, tail) = row.split_at_mut(l + 1);
                head[l].back_propagate(&self.params, tail[0].next_chain(), &mut self.gradients)?;
            }
        }
        Ok(())
    }

    /// Applies the accumulated gradients and starts a new mini-batch.
    pub fn apply(&mut self) {
        self.update_weights();
        self.update_biases();
        self.clear_gradients();
        debug!(
            "mini-batch applied, accuracy {:.2}% over {} guesses",
            self.accuracy, self.guesses
        );
    }

    /// Descends every weight along the accumulated gradients.
    pub fn update_weights(&mut self) {
        self.params.descend_weights(
            &self.gradients,
            &self.previous_gradients,
            self.config.get_batch_size(),
            self.config.get_momentum(),
        );
    }

    /// Descends every bias along the accumulated gradients.
    pub fn update_biases(&mut self) {
        self.params.descend_biases(
            &self.gradients,
            &self.previous_gradients,
            self.config.get_batch_size(),
            self.config.get_momentum(),
        );
    }

    /// Keeps the current gradients as the previous ones and starts a fresh,
    /// zeroed accumulation.
    pub fn clear_gradients(&mut self) {
        let fresh = Parameters::zeros(self.config.layer_sizes());
        self.previous_gradients = mem::replace(&mut self.gradients, fresh);
    }

    /// Returns the label of the strongest output of the first mini-batch slot.
    pub fn get_output(&self) -> &L {
        &self.labels[arg_max(self.outputs.front())]
    }

    /// Returns the running accuracy, in percent.
    pub fn get_current_accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn guesses(&self) -> u64 {
        self.guesses
    }

    pub fn right_guesses(&self) -> u64 {
        self.right_guesses
    }

    /// Forgets all guesses made so far.
    pub fn reset_accuracy(&mut self) {
        self.guesses = 0;
        self.right_guesses = 0;
        self.accuracy = 0.0;
    }

    /// Writes a snapshot to `path` if the running accuracy beats the one
    /// already saved there. Returns true if a snapshot was written.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let saved = persist::saved_accuracy(path);
        if self.accuracy <= saved {
            return false;
        }
        match Snapshot::new(self.accuracy, self.params.clone()).write(path) {
            Ok(()) => {
                info!(
                    "saved network to {} ({:.2}% > {:.2}%)",
                    path.display(),
                    self.accuracy,
                    saved
                );
                true
            }
            Err(e) => {
                warn!("could not save network to {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Restores the weights and biases saved at `path`. Returns true on
    /// success.
    ///
    /// On any failure, including a snapshot for a differently shaped network,
    /// the current parameters are kept.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let path = path.as_ref();
        let result = Snapshot::read(path).and_then(|s| self.set_parameters(s.parameters));
        match result {
            Ok(()) => {
                info!("loaded network from {}", path.display());
                true
            }
            Err(e) => {
                warn!("could not load network from {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Returns the accuracy saved at `path`, or 0 if it cannot be read.
    pub fn get_saved_accuracy<P: AsRef<Path>>(&self, path: P) -> f64 {
        persist::saved_accuracy(path)
    }

    fn label_index(&self, label: &L) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| Error::UnknownLabel(format!("{:?}", label)))
    }

    fn record_guess(&mut self, correct: bool) {
        self.guesses += 1;
        if correct {
            self.right_guesses += 1;
        }
        self.accuracy = self.right_guesses as f64 / self.guesses as f64 * 100.0;
    }
}

/// Writes the derivative of the squared error between `outputs` and the
/// one-hot vector for `target` into `signal`.
fn error_signal(outputs: &[f64], target: usize, signal: &mut [f64]) {
    for (i, (s, &y)) in signal.iter_mut().zip(outputs).enumerate() {
        let expected = if i == target { 1.0 } else { 0.0 };
        *s = 2.0 * (y - expected);
    }
}
