use std::{env, path::PathBuf, str::FromStr};

use anyhow::Context;
use log::info;
use sound_trainers::{synthetic, TrainerConfig};

const DEFAULT_EPOCHS: usize = 5;
const DEFAULT_SAMPLES: usize = 10;
const DATA_SEED: u64 = 7;

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid {key}: {value:?}")),
        Err(_) => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match env::var("TRAINER_CONFIG") {
        Ok(path) => TrainerConfig::from_json_file(&path)?,
        Err(_) => TrainerConfig::default(),
    };
    let epochs = env_or("EPOCHS", DEFAULT_EPOCHS)?;
    let samples = env_or("SAMPLES", DEFAULT_SAMPLES)?;
    let model_path = env::var("MODEL_PATH").ok().map(PathBuf::from);

    let mut trainer = config.build()?;
    let (features, classes) = match config {
        TrainerConfig::Mfcc(c) => (c.input_size, c.output_size),
        TrainerConfig::Spectrogram(c) => (c.height * c.width * c.channels, c.output_size),
    };

    let data = synthetic::random_dataset(samples, features, classes, DATA_SEED)?;
    trainer.train(&data, epochs)?;
    let score = trainer.evaluate(&data)?;
    info!("{} score after {epochs} epochs: {score}", trainer.kind());

    if let Some(path) = model_path {
        trainer.save_model(&path)?;

        let mut reloaded = config.build()?;
        reloaded.load_model(&path)?;
        info!("reloaded score: {}", reloaded.evaluate(&data)?);
    }

    println!("{score}");
    Ok(())
}
