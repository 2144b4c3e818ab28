//! Utilities for training classifiers.

use crate::error::{check_len, Error, Result};
use crate::network::Network;

use rand::seq::SliceRandom;
use std::fmt::Debug;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// A builder for training a `Network` on labelled examples.
///
/// Each epoch shuffles the examples, splits them into full mini-batches of
/// the network's batch size, and runs one update per mini-batch. A trailing
/// partial mini-batch is skipped.
#[derive(Debug)]
pub struct Trainer<L> {
    network: Network<L>,
    logging: Logging,
    stop_condition: StopCondition,
    checkpoint: Option<PathBuf>,
}

impl<L> Trainer<L>
where
    L: Clone + PartialEq + Debug,
{
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults are:
    ///
    /// * Stops after 1000 epochs.
    /// * Logs on training completion.
    /// * Saves no checkpoints.
    pub fn new(network: Network<L>) -> Self {
        Trainer {
            network,
            logging: Logging::Completion,
            stop_condition: StopCondition::Iterations(1000),
            checkpoint: None,
        }
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Saves the network to `path` after every epoch that improves on the
    /// accuracy already stored there.
    pub fn checkpoint<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.checkpoint = Some(path.into());
        self
    }

    /// Trains the network using the provided labelled data.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected label)`.
    ///
    /// Returns:
    ///   The trained network, or an error if an example does not fit it.
    pub fn train<I>(mut self, examples: &[(I, L)]) -> Result<Network<L>>
    where
        I: AsRef<[f64]>,
    {
        self.validate(examples)?;

        let batch_size = self.network.batch_size();
        let mut order: Vec<usize> = (0..examples.len()).collect();
        let mut rng = rand::thread_rng();
        let mut inputs: Vec<&[f64]> = Vec::with_capacity(batch_size);
        let mut targets: Vec<L> = Vec::with_capacity(batch_size);

        let start_time = Instant::now();
        let mut iteration = 0;
        loop {
            order.shuffle(&mut rng);
            for batch in order.chunks_exact(batch_size) {
                inputs.clear();
                targets.clear();
                for &i in batch {
                    inputs.push(examples[i].0.as_ref());
                    targets.push(examples[i].1.clone());
                }
                self.network.propagate(&inputs)?;
                self.network.back_propagate(&targets)?;
            }
            iteration += 1;

            let accuracy = self.network.get_current_accuracy();
            self.logging.iteration(iteration, accuracy);
            if let Some(ref path) = self.checkpoint {
                self.network.save(path);
            }
            if self
                .stop_condition
                .should_stop(iteration, accuracy, start_time)
            {
                break;
            }
        }
        self.logging.completion(
            iteration,
            self.network.get_current_accuracy(),
            start_time,
        );
        Ok(self.network)
    }

    /// Verifies that the examples fit the network, returning an error if
    /// something is wrong.
    fn validate<I>(&self, examples: &[(I, L)]) -> Result<()>
    where
        I: AsRef<[f64]>,
    {
        let batch_size = self.network.batch_size();
        if examples.len() < batch_size {
            return Err(Error::InvalidConfig(format!(
                "{} examples cannot fill a batch of {}",
                examples.len(),
                batch_size
            )));
        }
        for &(ref input, _) in examples {
            check_len("example input", self.network.input_len(), input.as_ref().len())?;
        }
        Ok(())
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be logged at completion
    Completion,
    /// A summary will be logged after every `n` epochs
    Iterations(usize),
}

impl Logging {
    /// Performs logging at the current `iteration` of training.
    fn iteration(&self, iteration: usize, accuracy: f64) {
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && iteration % freq == 0 {
                info!("Epoch {}:\taccuracy={:.2}%", iteration, accuracy);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, iterations: usize, accuracy: f64, start_time: Instant) {
        if let Logging::Silent = *self {
            return;
        }
        info!(
            "Ran {} epochs in {} ms, final accuracy {:.2}%",
            iterations,
            start_time.elapsed().as_millis(),
            accuracy
        );
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug)]
pub enum StopCondition {
    /// Stops after the provided number of epochs
    Iterations(usize),
    /// Stops once the running accuracy, in percent, reaches the threshold
    Accuracy(f64),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training is complete.
    fn should_stop(&self, iteration: usize, accuracy: f64, start_time: Instant) -> bool {
        match *self {
            StopCondition::Iterations(iterations) => iteration >= iterations,
            StopCondition::Accuracy(threshold) => accuracy >= threshold,
            StopCondition::Duration(duration) => start_time.elapsed() > duration,
        }
    }
}
