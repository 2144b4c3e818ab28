extern crate backprop;
extern crate env_logger;
extern crate rand;

use backprop::{Activator, Network, NetworkConfig};
use rand::Rng;
use std::process;
use std::time::Instant;

const INPUTS: usize = 5;
const BATCH_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Action {
    One,
    Two,
    Three,
    Four,
    Five,
}

const ACTIONS: [Action; INPUTS] = [
    Action::One,
    Action::Two,
    Action::Three,
    Action::Four,
    Action::Five,
];

/// Fills a mini-batch with one-hot inputs, each labelled with the action
/// mirrored from its hot index.
fn generate_batch(inputs: &mut [Vec<f64>], targets: &mut [Action]) {
    let mut rng = rand::thread_rng();
    for (input, target) in inputs.iter_mut().zip(targets.iter_mut()) {
        let index = rng.gen_range(0..INPUTS);
        for (i, x) in input.iter_mut().enumerate() {
            *x = if i == index { 1.0 } else { 0.0 };
        }
        *target = ACTIONS[INPUTS - 1 - index];
    }
}

fn run() -> backprop::Result<()> {
    let config = NetworkConfig::new(&[INPUTS, 10, 10, INPUTS])
        .activator(Activator::ReLU)
        .learning_rate(0.01)
        .batch_size(BATCH_SIZE)
        .momentum(0.9);
    let mut network = Network::new(config, ACTIONS.to_vec())?;

    let mut inputs = vec![vec![0.0; INPUTS]; BATCH_SIZE];
    let mut targets = [Action::One; BATCH_SIZE];

    let start_time = Instant::now();
    for _ in 0..1000 {
        generate_batch(&mut inputs, &mut targets);
        network.propagate(&inputs)?;
        network.back_propagate(&targets)?;
    }
    println!("Finished: {}ms", start_time.elapsed().as_millis());

    println!("{:?}", network.propagate(&[[1.0, 0.0, 0.0, 0.0, 0.0]])?);
    println!("{}", network.get_current_accuracy());
    println!("{:?}", network.get_output());
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Training failed: {}", e);
        process::exit(1);
    }
}
