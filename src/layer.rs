use crate::activator::Activator;
use crate::error::{check_len, Result};
use crate::params::Parameters;

/// A single dense layer of the network, as seen by one mini-batch slot.
///
/// The weights and biases live in the network's shared `Parameters`; a layer
/// only knows its depth `index` into them. What it owns is the transient
/// state of the sample currently flowing through its slot: the inputs it last
/// saw, the activations it produced, and the error signals computed during
/// back propagation.
#[derive(Clone, Debug)]
pub struct Layer {
    index: usize,
    /// The activation function to be used for every neuron in the layer.
    activator: Activator,
    learning_rate: f64,
    neurons: Vec<f64>,
    pre_neurons: Vec<f64>,
    chain: Vec<f64>,
    next_chain: Vec<f64>,
}

impl Layer {
    /// Initializes the replica for depth `index`.
    ///
    /// Arguments:
    ///
    ///  * `index` - the depth of the layer, `0` being fed the network input.
    ///  * `inputs` - the number of inputs to this layer.
    ///  * `outputs` - the number of outputs from this layer.
    pub fn new(
        index: usize,
        inputs: usize,
        outputs: usize,
        activator: Activator,
        learning_rate: f64,
    ) -> Self {
        Layer {
            index,
            activator,
            learning_rate,
            neurons: vec![0.0; outputs],
            pre_neurons: vec![0.0; inputs],
            chain: vec![0.0; outputs],
            next_chain: vec![0.0; inputs],
        }
    }

    /// Returns the number of inputs to this layer.
    pub fn input_len(&self) -> usize {
        self.pre_neurons.len()
    }

    /// Returns the number of outputs from this layer.
    pub fn output_len(&self) -> usize {
        self.neurons.len()
    }

    /// The activations produced by the last call to `propagate`.
    pub fn neurons(&self) -> &[f64] {
        &self.neurons
    }

    /// The error signal for the previous layer, produced by the last call to
    /// `back_propagate`.
    pub fn next_chain(&self) -> &[f64] {
        &self.next_chain
    }

    /// The local error signal of the last call to `back_propagate`, after the
    /// activation derivative was applied.
    pub fn chain(&self) -> &[f64] {
        &self.chain
    }

    /// Feeds `input` forward through the layer, returning its activations.
    ///
    /// The input is retained for the matching `back_propagate` call.
    pub fn propagate(&mut self, params: &Parameters, input: &[f64]) -> Result<&[f64]> {
        check_len("layer input", self.input_len(), input.len())?;
        self.pre_neurons.copy_from_slice(input);
        for i in 0..self.neurons.len() {
            let z = self.weighted_sum(params, i);
            self.neurons[i] = self.activator.f(z);
        }
        Ok(&self.neurons)
    }

    /// Feeds the error signal `target` backwards through the layer.
    ///
    /// Computes the local chain and the signal for the previous layer, then
    /// adds this sample's gradients to `gradients`. The parameters themselves
    /// are left untouched; the network applies all gradients at once after
    /// the mini-batch.
    pub fn back_propagate(
        &mut self,
        params: &Parameters,
        target: &[f64],
        gradients: &mut Parameters,
    ) -> Result<()> {
        check_len("layer error signal", self.output_len(), target.len())?;
        for i in 0..self.chain.len() {
            let z = self.weighted_sum(params, i);
            self.chain[i] = target[i] * self.activator.derivative(z);
        }
        params
            .weights(self.index)
            .dot_transposed(&self.chain, &mut self.next_chain);
        gradients.accumulate(self.index, self.learning_rate, &self.chain, &self.pre_neurons);
        Ok(())
    }

    /// Recomputes the pre-activation sum of neuron `i` from the retained
    /// inputs.
    fn weighted_sum(&self, params: &Parameters, i: usize) -> f64 {
        params.weights(self.index).row_dot(i, &self.pre_neurons) + params.biases(self.index)[i]
    }
}
