use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use log::info;
use serde::{Deserialize, Serialize};

use super::Network;
use crate::{
    MlErr, Result,
    arch::{Model, Sequential},
    config::NetworkConfig,
    optimization::UpdaterState,
};

const FORMAT_VERSION: u32 = 1;

/// The JSON header of a model file.
///
/// A model file is laid out as `[u32 BE header length][header][f32 payload]`, where the
/// payload holds the parameters followed by every optimizer buffer, all native endian.
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    version: u32,
    config: NetworkConfig,
    num_params: usize,
    epoch_count: usize,
    updater: UpdaterState,
}

impl Network {
    /// Writes the network, optimizer state included, to `path`.
    ///
    /// The file is written in place, an interrupted save leaves a truncated file behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let header = serde_json::to_vec(&Header {
            version: FORMAT_VERSION,
            config: self.config.clone(),
            num_params: self.num_params(),
            epoch_count: self.epoch_count,
            updater: self.updater.state(),
        })?;

        let header_len = u32::try_from(header.len()).map_err(|_| {
            MlErr::MalformedModel(format!("header of {} bytes is too long", header.len()))
        })?;

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&header_len.to_be_bytes())?;
        writer.write_all(&header)?;
        writer.write_all(bytemuck::cast_slice(&self.params))?;

        for buffer in self.updater.buffers() {
            writer.write_all(bytemuck::cast_slice(buffer))?;
        }

        writer.flush()?;
        info!("saved network: path={} params={}", path.display(), self.num_params());
        Ok(())
    }

    /// Reads a network written by `save`.
    ///
    /// # Returns
    /// The network or an error if the file can't be read or doesn't hold a valid model.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;

        let (len, rest) = bytes
            .split_first_chunk::<4>()
            .ok_or_else(|| MlErr::MalformedModel("missing the header length".into()))?;

        let header_len = u32::from_be_bytes(*len) as usize;
        if rest.len() < header_len {
            return Err(MlErr::MalformedModel(format!(
                "header of {header_len} bytes but only {} bytes follow",
                rest.len()
            )));
        }

        let (header, payload) = rest.split_at(header_len);
        let header: Header = serde_json::from_slice(header)?;

        if header.version != FORMAT_VERSION {
            return Err(MlErr::MalformedModel(format!(
                "unsupported format version {}",
                header.version
            )));
        }

        let model = Sequential::new(header.config.resolve()?);
        if model.size() != header.num_params {
            return Err(MlErr::MalformedModel(format!(
                "the config needs {} parameters but the header declares {}",
                model.size(),
                header.num_params
            )));
        }

        let floats = decode_floats(payload)?;
        let n = header.num_params;
        if floats.len() < n {
            return Err(MlErr::MalformedModel(format!(
                "expected {n} parameters, found {}",
                floats.len()
            )));
        }

        let (params, buffers) = floats.split_at(n);

        let mut network = Self::from_parts(header.config, model, params.to_vec())?;
        let expected = network.updater.buffers().len() * n;

        if buffers.len() != expected {
            return Err(MlErr::MalformedModel(format!(
                "expected {expected} optimizer values, found {}",
                buffers.len()
            )));
        }

        let buffers: Vec<&[f32]> = buffers.chunks(n.max(1)).collect();
        network.updater.restore(header.updater, &buffers)?;
        network.epoch_count = header.epoch_count;

        info!("loaded network: path={} params={n}", path.display());
        Ok(network)
    }
}

fn decode_floats(payload: &[u8]) -> Result<Vec<f32>> {
    if payload.len() % size_of::<f32>() != 0 {
        return Err(MlErr::MalformedModel(format!(
            "payload of {} bytes isn't made of whole floats",
            payload.len()
        )));
    }

    Ok(payload
        .chunks_exact(size_of::<f32>())
        .map(bytemuck::pod_read_unaligned)
        .collect())
}
