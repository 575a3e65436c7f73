#![cfg(test)]

use ndarray::{Array2, Axis, array};

use crate::{
    DataSet, Network,
    arch::{activations::ActFn, loss::Loss},
    config::{InputType, LayerConfig, NetworkConfig, OptimizerConfig},
};

fn softmax_output(n_out: usize) -> LayerConfig {
    LayerConfig::Output {
        n_out,
        act_fn: ActFn::Softmax,
        loss: Loss::NegativeLogLikelihood,
    }
}

fn predictions(network: &mut Network, data: &DataSet) -> Vec<usize> {
    let output = network.output(data.features()).unwrap();

    output
        .axis_iter(Axis(0))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f32::MIN), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
                .0
        })
        .collect()
}

fn train(network: &mut Network, data: &DataSet, epochs: usize) {
    for _ in 0..epochs {
        network.fit(data).unwrap();
    }
}

#[test]
fn test_ml_and2_gate_convergence() {
    let x = array![[0f32, 0.], [0., 1.], [1., 0.], [1., 1.]];
    let classes = [0, 0, 0, 1];
    let data = DataSet::new(x, DataSet::one_hot(&classes, 2).unwrap()).unwrap();

    let config = NetworkConfig::builder()
        .optimizer(OptimizerConfig::adam(0.05))
        .input_type(InputType::FeedForward { size: 2 })
        .layer(LayerConfig::Dense {
            n_out: 4,
            act_fn: Some(ActFn::Relu),
        })
        .layer(softmax_output(2))
        .build()
        .unwrap();

    let mut network = Network::init(config).unwrap();
    train(&mut network, &data, 500);

    assert_eq!(predictions(&mut network, &data), classes);
}

#[test]
fn test_ml_image_halves_convergence() {
    // Class 0 images are bright on the top half, class 1 images on the bottom half.
    let classes = [0, 1, 0, 1, 0, 1];
    let features = Array2::from_shape_fn((classes.len(), 36), |(i, j)| {
        let top = j / 6 < 3;
        let bright = (classes[i] == 0) == top;
        if bright { 0.5 + 0.1 * (i % 3) as f32 } else { 0. }
    });
    let data = DataSet::new(features, DataSet::one_hot(&classes, 2).unwrap()).unwrap();

    let config = NetworkConfig::builder()
        .optimizer(OptimizerConfig::adam(0.01))
        .input_type(InputType::Convolutional {
            height: 6,
            width: 6,
            channels: 1,
        })
        .layer(LayerConfig::Conv2d {
            filters: 2,
            kernel: (3, 3),
            stride: (1, 1),
            act_fn: None,
        })
        .layer(LayerConfig::MaxPool2d {
            kernel: (2, 2),
            stride: (2, 2),
        })
        .layer(softmax_output(2))
        .build()
        .unwrap();

    let mut network = Network::init(config).unwrap();
    let before = network.score(&data).unwrap();
    train(&mut network, &data, 200);

    assert!(network.score(&data).unwrap() < before);
    assert_eq!(predictions(&mut network, &data), classes);
}
