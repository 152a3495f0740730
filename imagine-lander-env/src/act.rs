use candle_core::Tensor;
use imagine_core::Act;

/// Discrete action of the lander, in `0..4`.
#[derive(Clone, Debug, PartialEq)]
pub struct LanderAct(pub i64);

impl Act for LanderAct {}

impl From<LanderAct> for Tensor {
    /// Returns an `i64` tensor of shape `[1, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if the tensor cannot be allocated.
    fn from(act: LanderAct) -> Tensor {
        Tensor::new(&[[act.0]], &candle_core::Device::Cpu).expect("Failed to create a tensor")
    }
}

impl From<Tensor> for LanderAct {
    /// Takes the first element of an integer tensor.
    ///
    /// # Panics
    ///
    /// Panics if the tensor is empty or not of an integer type.
    fn from(t: Tensor) -> Self {
        let v: Vec<i64> = t
            .flatten_all()
            .and_then(|t| t.to_vec1())
            .expect("Failed to convert a tensor to LanderAct");
        Self(v[0])
    }
}
