use anyhow::Result;
use candle_core::{Device, IndexOp, Tensor};
use imagine_core::{error::ImagineError, generic_replay_buffer::BatchBase};

/// A batch of samples stored in a single [`Tensor`].
///
/// The first dimension of the tensor is the batch dimension. The tensor is
/// allocated on the first push, with the shape of the pushed data except for
/// the batch dimension, which is set to the capacity.
#[derive(Clone, Debug)]
pub struct TensorBatch {
    buf: Option<Tensor>,
    capacity: usize,
}

impl TensorBatch {
    /// Wraps a tensor whose first dimension is the batch dimension.
    pub fn from_tensor(t: Tensor) -> Self {
        let capacity = t.dims().first().copied().unwrap_or(0);
        Self {
            buf: Some(t),
            capacity,
        }
    }

    /// Returns the internal tensor, if allocated.
    pub fn tensor(&self) -> Option<&Tensor> {
        self.buf.as_ref()
    }
}

impl BatchBase for TensorBatch {
    fn new(capacity: usize) -> Self {
        Self {
            buf: None,
            capacity,
        }
    }

    fn push(&mut self, index: usize, data: Self) -> Result<()> {
        let data = match data.buf {
            None => return Ok(()),
            Some(t) => t,
        };
        let batch_size = data.dims()[0];
        if batch_size == 0 || self.capacity == 0 {
            return Ok(());
        }

        if self.buf.is_none() {
            let mut shape = data.dims().to_vec();
            shape[0] = self.capacity;
            self.buf = Some(Tensor::zeros(shape, data.dtype(), &Device::Cpu)?);
        }
        let buf = match self.buf.as_mut() {
            Some(buf) => buf,
            None => return Ok(()),
        };
        if buf.dims()[1..] != data.dims()[1..] {
            return Err(ImagineError::ShapeMismatch {
                expected: buf.dims()[1..].to_vec(),
                actual: data.dims()[1..].to_vec(),
            }
            .into());
        }
        let data = data.to_device(buf.device())?.to_dtype(buf.dtype())?;

        if index + batch_size > self.capacity {
            let n = self.capacity - index;
            buf.slice_set(&data.i((..n,))?, 0, index)?;
            buf.slice_set(&data.i((n..,))?, 0, 0)?;
        } else {
            buf.slice_set(&data, 0, index)?;
        }

        Ok(())
    }

    /// Gathers the samples at the given indices.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of the capacity.
    fn sample(&self, ixs: &Vec<usize>) -> Self {
        let capacity = ixs.len();
        let buf = self.buf.as_ref().map(|buf| {
            let ixs = ixs.iter().map(|x| *x as u32).collect::<Vec<_>>();
            Tensor::from_vec(ixs, &[capacity], buf.device())
                .and_then(|ixs| buf.index_select(&ixs, 0))
                .expect("Index out of the capacity of TensorBatch")
        });
        Self { buf, capacity }
    }
}

impl From<TensorBatch> for Tensor {
    /// # Panics
    ///
    /// Panics if nothing has been pushed into the batch.
    fn from(b: TensorBatch) -> Self {
        b.buf.expect("TensorBatch holds no tensor")
    }
}
