//! Activation function types.

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Activator {
    /// Rectified Linear Unit
    ReLU,
    /// Leaky Rectified Linear Unit
    ///
    /// Takes an `alpha` value to use for negative inputs.
    LeakyReLU(f64),
    /// Sigmoid function
    Sigmoid,
    /// Hyperbolic tan function
    TanH,
}

impl Activator {
    /// Evaluates `f(z)` for the selected the activation function.
    pub fn f(&self, z: f64) -> f64 {
        match *self {
            Activator::ReLU => {
                if z > 0.0 {
                    z
                } else {
                    0.0
                }
            }
            Activator::LeakyReLU(alpha) => {
                if z > 0.0 {
                    z
                } else {
                    alpha * z
                }
            }
            Activator::Sigmoid => sigmoid(z),
            Activator::TanH => z.tanh(),
        }
    }

    /// Evaluates the derivative `f'(z)`.
    ///
    /// Unlike a derivative expressed through the activated output, this takes
    /// the weighted sum `z` from *before* activation. Layers recompute `z`
    /// from their retained inputs during back propagation.
    pub fn derivative(&self, z: f64) -> f64 {
        match *self {
            Activator::ReLU => {
                if z > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activator::LeakyReLU(alpha) => {
                if z > 0.0 {
                    1.0
                } else {
                    alpha
                }
            }
            Activator::Sigmoid => {
                let s = sigmoid(z);
                s * (1.0 - s)
            }
            Activator::TanH => {
                let t = z.tanh();
                1.0 - t * t
            }
        }
    }
}

impl Default for Activator {
    fn default() -> Self {
        Activator::ReLU
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
