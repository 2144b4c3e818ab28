//! Per-depth parameter storage shared by every layer replica.
//!
//! A `Parameters` value holds one weight matrix and one bias vector per layer
//! depth. The same type doubles as a gradient accumulator, since gradients
//! always mirror the shapes of the values they update.

use crate::error::{check_len, Result};
use crate::matrix::Mat;

use itertools::multizip;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    weights: Vec<Mat>,
    biases: Vec<Vec<f64>>,
}

impl Parameters {
    /// Returns zero-filled storage for a network with the given layer sizes.
    pub fn zeros(layer_sizes: &[usize]) -> Self {
        Parameters {
            weights: layer_sizes
                .windows(2)
                .map(|w| Mat::zeros(w[1], w[0]))
                .collect(),
            biases: layer_sizes[1..].iter().map(|&n| vec![0.0; n]).collect(),
        }
    }

    /// Returns storage with every weight and bias drawn uniformly from
    /// `[-1, 1]`.
    pub fn random<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Self {
        let uniform = Uniform::new_inclusive(-1.0, 1.0);
        let weights = layer_sizes
            .windows(2)
            .map(|w| Mat::random(uniform, w[1], w[0], rng))
            .collect();
        let biases = layer_sizes[1..]
            .iter()
            .map(|&n| uniform.sample_iter(&mut *rng).take(n).collect())
            .collect();
        Parameters { weights, biases }
    }

    /// Builds storage from nested arrays, `weights[l][i][j]` being the weight
    /// from input `j` to neuron `i` of depth `l`.
    pub fn from_rows(weights: Vec<Vec<Vec<f64>>>, biases: Vec<Vec<f64>>) -> Result<Self> {
        check_len("bias layer count", weights.len(), biases.len())?;
        let weights = weights
            .into_iter()
            .map(Mat::from_rows)
            .collect::<Result<Vec<_>>>()?;
        for (w, b) in weights.iter().zip(&biases) {
            check_len("bias vector", w.rows(), b.len())?;
        }
        for pair in weights.windows(2) {
            check_len("weight matrix columns", pair[0].rows(), pair[1].cols())?;
        }
        Ok(Parameters { weights, biases })
    }

    /// Checks that every matrix and bias vector is consistent with its
    /// neighbours, as decoded storage may not be.
    pub fn validate(&self) -> Result<()> {
        check_len("bias layer count", self.weights.len(), self.biases.len())?;
        for (w, b) in self.weights.iter().zip(&self.biases) {
            w.validate()?;
            check_len("bias vector", w.rows(), b.len())?;
        }
        for pair in self.weights.windows(2) {
            check_len("weight matrix columns", pair[0].rows(), pair[1].cols())?;
        }
        Ok(())
    }

    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self, layer: usize) -> &Mat {
        &self.weights[layer]
    }

    pub fn biases(&self, layer: usize) -> &[f64] {
        &self.biases[layer]
    }

    /// Returns the layer sizes, input width first.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.weights.len() + 1);
        if let Some(first) = self.weights.first() {
            sizes.push(first.cols());
        }
        sizes.extend(self.weights.iter().map(Mat::rows));
        sizes
    }

    /// Returns true if `other` has identical weight and bias shapes.
    pub fn same_shape(&self, other: &Parameters) -> bool {
        self.weights.len() == other.weights.len()
            && self.biases.len() == other.biases.len()
            && self
                .weights
                .iter()
                .zip(&other.weights)
                .all(|(a, b)| a.rows() == b.rows() && a.cols() == b.cols())
            && self
                .biases
                .iter()
                .zip(&other.biases)
                .all(|(a, b)| a.len() == b.len())
    }

    /// Accumulates one sample's contribution to the gradient of depth
    /// `layer`: `chain * inputs^T` into the weights and `chain` into the
    /// biases, both scaled by `rate`.
    pub fn accumulate(&mut self, layer: usize, rate: f64, chain: &[f64], inputs: &[f64]) {
        self.weights[layer].add_outer(rate, chain, inputs);
        for (b, c) in self.biases[layer].iter_mut().zip(chain) {
            *b += c * rate;
        }
    }

    /// Descends every weight along the accumulated `gradients`.
    ///
    /// `previous` holds the gradients consumed by the prior mini-batch.
    pub fn descend_weights(
        &mut self,
        gradients: &Parameters,
        previous: &Parameters,
        batch_size: usize,
        momentum: f64,
    ) {
        for (w, g, p) in multizip((
            self.weights.iter_mut(),
            gradients.weights.iter(),
            previous.weights.iter(),
        )) {
            descend(w.values_mut(), g.values(), p.values(), batch_size, momentum);
        }
    }

    /// Descends every bias along the accumulated `gradients`.
    pub fn descend_biases(
        &mut self,
        gradients: &Parameters,
        previous: &Parameters,
        batch_size: usize,
        momentum: f64,
    ) {
        for (b, g, p) in multizip((
            self.biases.iter_mut(),
            gradients.biases.iter(),
            previous.biases.iter(),
        )) {
            descend(b, g, p, batch_size, momentum);
        }
    }

    /// Flattens the weights into `weights[l][i][j]` nested arrays.
    #[cfg(test)]
    pub(crate) fn weight_rows(&self) -> Vec<Vec<Vec<f64>>> {
        self.weights.iter().map(Mat::to_rows).collect()
    }

    /// Returns true if every weight and bias is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.weights
            .iter()
            .flat_map(|w| w.values())
            .chain(self.biases.iter().flatten())
            .all(|&v| v == 0.0)
    }
}

/// Applies one descent step to `values`.
///
/// Without momentum this is the averaged gradient. With momentum, the step is
/// `previous * momentum + (gradient / n - previous / n)`, with `previous`
/// being the raw accumulation of the prior mini-batch.
fn descend(values: &mut [f64], gradient: &[f64], previous: &[f64], batch_size: usize, momentum: f64) {
    let n = batch_size as f64;
    for (v, &g, &p) in multizip((values.iter_mut(), gradient, previous)) {
        if momentum == 0.0 {
            *v -= g / n;
        } else {
            *v -= p * momentum + (g / n - p / n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shapes_follow_layer_sizes() {
        let sizes = [3, 5, 2];
        let mut rng = StdRng::seed_from_u64(1);
        for params in &[Parameters::zeros(&sizes), Parameters::random(&sizes, &mut rng)] {
            assert_eq!(params.layer_count(), 2);
            for l in 0..params.layer_count() {
                assert_eq!(params.weights(l).rows(), sizes[l + 1]);
                assert_eq!(params.weights(l).cols(), sizes[l]);
                assert_eq!(params.weights(l).values().len(), sizes[l + 1] * sizes[l]);
                assert_eq!(params.biases(l).len(), sizes[l + 1]);
            }
            assert_eq!(params.layer_sizes(), sizes.to_vec());
        }
    }

    #[test]
    fn random_values_are_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let params = Parameters::random(&[4, 8, 3], &mut rng);
        assert!(!params.is_zero());
        assert!(params
            .weight_rows()
            .iter()
            .flatten()
            .flatten()
            .chain(params.biases.iter().flatten())
            .all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn from_rows_rejects_inconsistent_shapes() {
        // bias length differs from neuron count
        assert!(Parameters::from_rows(vec![vec![vec![1.0, 0.0]]], vec![vec![0.0, 0.0]]).is_err());
        // second layer expects 3 inputs but the first produces 1
        assert!(Parameters::from_rows(
            vec![vec![vec![1.0, 0.0]], vec![vec![1.0, 1.0, 1.0]]],
            vec![vec![0.0], vec![0.0]]
        )
        .is_err());
        assert!(Parameters::from_rows(vec![vec![vec![1.0]]], vec![]).is_err());
    }

    #[test]
    fn accumulate_adds_scaled_outer_product() {
        let mut grads = Parameters::zeros(&[2, 2]);
        grads.accumulate(0, 0.1, &[0.0, 2.0], &[1.0, 1.0]);
        grads.accumulate(0, 0.1, &[0.0, 2.0], &[1.0, 1.0]);
        assert_eq!(grads.weight_rows()[0][0], vec![0.0, 0.0]);
        assert_abs_diff_eq!(grads.weights(0).get(1, 0), 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(grads.weights(0).get(1, 1), 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(grads.biases(0)[1], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn descent_without_momentum_averages_gradient() {
        let mut params =
            Parameters::from_rows(vec![vec![vec![1.0, 0.0], vec![0.0, 1.0]]], vec![vec![0.5, 0.5]])
                .unwrap();
        let grads =
            Parameters::from_rows(vec![vec![vec![0.4, 0.8], vec![0.0, -0.4]]], vec![vec![0.2, 0.6]])
                .unwrap();
        let previous = Parameters::zeros(&[2, 2]);
        params.descend_weights(&grads, &previous, 4, 0.0);
        params.descend_biases(&grads, &previous, 4, 0.0);
        assert_abs_diff_eq!(params.weights(0).get(0, 0), 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(params.weights(0).get(0, 1), -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(params.weights(0).get(1, 1), 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(params.biases(0)[0], 0.45, epsilon = 1e-12);
        assert_abs_diff_eq!(params.biases(0)[1], 0.35, epsilon = 1e-12);
    }

    #[test]
    fn descent_with_momentum_uses_raw_previous_gradient() {
        let mut params = Parameters::from_rows(vec![vec![vec![1.0]]], vec![vec![1.0]]).unwrap();
        let grads = Parameters::from_rows(vec![vec![vec![0.4]]], vec![vec![0.2]]).unwrap();
        let previous = Parameters::from_rows(vec![vec![vec![0.2]]], vec![vec![0.1]]).unwrap();
        params.descend_weights(&grads, &previous, 2, 0.9);
        params.descend_biases(&grads, &previous, 2, 0.9);
        // 1 - (0.2 * 0.9 + (0.4 / 2 - 0.2 / 2))
        assert_abs_diff_eq!(params.weights(0).get(0, 0), 0.72, epsilon = 1e-12);
        // 1 - (0.1 * 0.9 + (0.2 / 2 - 0.1 / 2))
        assert_abs_diff_eq!(params.biases(0)[0], 0.86, epsilon = 1e-12);
    }

    #[test]
    fn same_shape_ignores_values() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = Parameters::random(&[2, 3, 1], &mut rng);
        assert!(!params.is_zero());
        assert!(params.same_shape(&Parameters::zeros(&[2, 3, 1])));
        assert!(!params.same_shape(&Parameters::zeros(&[2, 4, 1])));

        let mut missing_bias = params.clone();
        missing_bias.biases.pop();
        assert!(!params.same_shape(&missing_bias));
    }

    #[test]
    fn validate_catches_inconsistent_storage() {
        let mut rng = StdRng::seed_from_u64(4);
        let params = Parameters::random(&[2, 3, 1], &mut rng);
        assert!(params.validate().is_ok());

        let mut missing_bias = params.clone();
        missing_bias.biases.pop();
        assert!(missing_bias.validate().is_err());

        let mut short_bias = params.clone();
        short_bias.biases[0].pop();
        assert!(short_bias.validate().is_err());

        let mut broken_chain = params;
        broken_chain.weights[1] = Mat::zeros(1, 4);
        assert!(broken_chain.validate().is_err());
    }
}
