//! Defines the two layer policy network
use cem_core::errors::Result;
use cem_core::model::{Evaluator, WeightUpdater};

use crate::layout::WeightLayout;

#[derive(Serialize, Deserialize, Clone, Debug, Copy, PartialEq)]
/// Defines the different types of functions between layers
pub enum NonLinearity {
    /// ReLu
    ReLu,

    /// Tanh.  Keeps outputs within [-1, 1]; an undefined pre-activation maps to 0
    Tanh,
}

impl NonLinearity {
    #[inline]
    /// Applies the specified function
    pub fn eval(&self, f: f32) -> f32 {
        use self::NonLinearity::*;
        match self {
            &ReLu => f.max(0f32),
            // inf - inf from overflowing hidden units
            &Tanh if f.is_nan() => 0f32,
            &Tanh => f.tanh(),
        }
    }
}

#[inline]
fn dot(v1: &[f32], v2: &[f32]) -> f32 {
    assert_eq!(v1.len(), v2.len());
    v1.iter().zip(v2.iter()).map(|(a, b)| a * b).sum()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
/// Represents a layer of a neural network
pub struct Layer {
    /// One row of input weights per output unit
    pub(crate) w: Vec<Vec<f32>>,
    /// The bias
    pub(crate) bias: Vec<f32>,
    /// The type of non-linearity to apply
    pub(crate) nl: NonLinearity,
}

impl Layer {
    /// Creates a new, zeroed layer
    pub fn new(input_dim: usize, output_dim: usize, nl: NonLinearity) -> Self {
        Layer {
            w: vec![vec![0f32; input_dim]; output_dim],
            bias: vec![0f32; output_dim],
            nl: nl,
        }
    }

    /// Gets the (input, output) dimensions of the layer
    pub fn dims(&self) -> (usize, usize) {
        (self.w.first().map(|r| r.len()).unwrap_or(0), self.bias.len())
    }

    /// Given a dense payload, applies the weights, bias, and non-linearity to it
    fn eval(&self, payload: &[f32], output: &mut [f32]) -> () {
        for (i, o) in output.iter_mut().enumerate().take(self.bias.len()) {
            *o = self.nl.eval(dot(&self.w[i], payload) + self.bias[i]);
        }
    }

    // Every row has the same width
    fn is_rectangular(&self) -> bool {
        self.w.len() == self.bias.len() && self.w.iter().all(|r| r.len() == self.dims().0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
/// A state -> hidden -> action network: ReLu on the hidden layer and tanh on the
/// output, so every action component lies in [-1, 1].
pub struct PolicyNetwork {
    s_size: usize,
    h_size: usize,
    a_size: usize,
    fc1: Layer,
    fc2: Layer,
}

impl PolicyNetwork {
    /// Initializes a zeroed network
    pub fn new(s_size: usize, h_size: usize, a_size: usize) -> Self {
        PolicyNetwork {
            s_size: s_size,
            h_size: h_size,
            a_size: a_size,
            fc1: Layer::new(s_size, h_size, NonLinearity::ReLu),
            fc2: Layer::new(h_size, a_size, NonLinearity::Tanh),
        }
    }

    /// Layout of the flat parameter vector for this network
    pub fn layout(&self) -> WeightLayout {
        WeightLayout::new(self.s_size, self.h_size, self.a_size)
    }

    /// Input layer
    pub fn fc1(&self) -> &Layer {
        &self.fc1
    }

    /// Output layer
    pub fn fc2(&self) -> &Layer {
        &self.fc2
    }

    pub(crate) fn layers_mut(&mut self) -> (&mut Layer, &mut Layer) {
        (&mut self.fc1, &mut self.fc2)
    }

    /// Whether the layer shapes agree with the stored sizes.  Only a hand edited or
    /// truncated checkpoint can break this.
    pub fn is_consistent(&self) -> bool {
        self.fc1.is_rectangular()
            && self.fc2.is_rectangular()
            && self.fc1.dims() == (self.s_size, self.h_size)
            && self.fc2.dims() == (self.h_size, self.a_size)
    }
}

impl Evaluator<[f32], Vec<f32>> for PolicyNetwork {
    fn evaluate(&self, payload: &[f32]) -> Vec<f32> {
        let mut hidden = vec![0f32; self.h_size];
        let mut action = vec![0f32; self.a_size];
        self.fc1.eval(payload, &mut hidden);
        self.fc2.eval(&hidden, &mut action);
        action
    }
}

impl WeightUpdater for PolicyNetwork {
    fn num_weights(&self) -> usize {
        self.layout().dims()
    }

    fn set_weights(&mut self, weights: &[f32]) -> Result<()> {
        self.layout().decode(weights, self)
    }

    fn get_weights(&self) -> Vec<f32> {
        self.layout().encode(self)
    }
}

#[cfg(test)]
mod test_nn {
    use super::*;
    use rand::distributions::{Distribution, Normal};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn test_forward_by_hand() {
        // s=2, h=2, a=1
        // W1 (s x h) = [[1, -1], [2, 0.5]], b1 = [0, -10], W2 (h x a) = [[0.5], [3]], b2 = [0.1]
        let mut network = PolicyNetwork::new(2, 2, 1);
        let weights = vec![1., -1., 2., 0.5, 0., -10., 0.5, 3., 0.1];
        network.set_weights(&weights).unwrap();

        // hidden = relu([1*1 + 2*2, -1*1 + 0.5*2 - 10]) = [5, 0]
        let action = network.evaluate(&[1., 2.][..]);
        let expected = (0.5f32 * 5. + 0.1).tanh();
        assert_eq!(action.len(), 1);
        assert!((action[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_action_bounds() {
        let mut rng = XorShiftRng::seed_from_u64(11);
        let n = Normal::new(0., 50.);
        let mut network = PolicyNetwork::new(2, 16, 3);
        for _ in 0..50 {
            let weights: Vec<f32> = (0..network.num_weights())
                .map(|_| n.sample(&mut rng) as f32)
                .collect();
            network.set_weights(&weights).unwrap();
            for scale in [1e-3f32, 1., 1e3, 1e30, 1e36].iter() {
                let state = vec![
                    n.sample(&mut rng) as f32 * scale,
                    n.sample(&mut rng) as f32 * scale,
                ];
                for a in network.evaluate(&state[..]) {
                    assert!(a >= -1. && a <= 1., "action out of bounds: {}", a);
                }
            }
        }
    }

    #[test]
    fn test_overflowing_hidden_units() {
        // Both hidden units overflow to +inf and the output weights cancel them
        let mut network = PolicyNetwork::new(2, 2, 1);
        network
            .set_weights(&[1., 1., 1., 1., 0., 0., 1., -1., 0.])
            .unwrap();
        let action = network.evaluate(&[3e38f32, 3e38][..]);
        assert_eq!(action, vec![0.]);

        let action = network.evaluate(&[f32::MAX, -f32::MAX][..]);
        assert!(action[0] >= -1. && action[0] <= 1., "{:?}", action);
    }

    #[test]
    fn test_tanh_nan() {
        assert_eq!(NonLinearity::Tanh.eval(std::f32::NAN), 0.);
        assert_eq!(NonLinearity::Tanh.eval(std::f32::INFINITY), 1.);
        assert_eq!(NonLinearity::ReLu.eval(-2.), 0.);
    }

    #[test]
    fn test_zero_network() {
        let network = PolicyNetwork::new(3, 4, 2);
        assert_eq!(network.evaluate(&[1., 2., 3.][..]), vec![0., 0.]);
        assert!(network.is_consistent());
    }
}
