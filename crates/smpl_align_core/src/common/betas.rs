use ndarray as nd;

/// Number of shape coefficients the SMPL-X runtime exposes
pub const NUM_BETAS: usize = 10;

/// Shape coefficients of one body model
#[derive(Clone, Debug, PartialEq)]
pub struct Betas {
    pub betas: nd::Array1<f32>,
}
impl Default for Betas {
    fn default() -> Self {
        Self::new_empty(NUM_BETAS)
    }
}

impl Betas {
    pub fn new(betas: nd::Array1<f32>) -> Self {
        Self { betas }
    }

    pub fn new_empty(num_betas: usize) -> Self {
        let betas = nd::Array1::<f32>::zeros(num_betas);
        Self { betas }
    }

    pub fn num_betas(&self) -> usize {
        self.betas.len()
    }

    /// Contiguous view used as the model's writable coefficient slots
    pub fn as_slice_mut(&mut self) -> &mut [f32] {
        self.betas.as_slice_mut().expect("Betas are always stored contiguously")
    }
}
