use mlp_trainer::{train_step, BinaryCrossEntropy, Linear, Matrix, Network, Result, Sigmoid};

fn main() -> Result<()> {
    // Constant initialization leaves every hidden unit identical, which cannot
    // represent XOR, so the first layer starts with opposite-signed columns.
    let mut hidden = Linear::new(2, 4);
    hidden.set_parameters(
        Matrix::new(vec![vec![1.0, -1.0, 0.5, -0.5], vec![-1.0, 1.0, 0.5, -0.5]])?,
        Matrix::filled(4, 1, 0.0)?,
    )?;
    let mut output = Linear::new(4, 1);
    output.set_parameters(
        Matrix::new(vec![vec![1.0], vec![1.0], vec![-1.0], vec![-1.0]])?,
        Matrix::filled(1, 1, 0.0)?,
    )?;

    let mut network = Network::new(vec![
        Box::new(hidden),
        Box::new(Sigmoid::new()),
        Box::new(output),
        Box::new(Sigmoid::new()),
    ]);

    let inputs = Matrix::new(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ])?;
    let targets = Matrix::new(vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]])?;

    let mut loss_fn = BinaryCrossEntropy::new();
    let epochs = 2000;

    for epoch in 0..epochs {
        let step = train_step(&mut network, &mut loss_fn, &inputs, &targets, 0.5)?;
        if epoch % 200 == 0 {
            println!("Epoch {epoch}: loss = {:.6}", step.loss);
        }
    }

    let predictions = network.predict(&inputs)?;
    for (i, p) in predictions.column(0).enumerate() {
        println!("Input: {:?} -> Output: {:.4}", inputs.row(i).collect::<Vec<_>>(), p);
    }
    Ok(())
}
