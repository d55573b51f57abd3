use ndarray as nd;

/// Number of expression coefficients the SMPL-X runtime exposes
pub const NUM_EXPRESSIONS: usize = 10;

/// Facial expression coefficients of one body model
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    pub expr_coeffs: nd::Array1<f32>,
}
impl Default for Expression {
    fn default() -> Self {
        Self::new_empty(NUM_EXPRESSIONS)
    }
}

impl Expression {
    pub fn new(expr_coeffs: nd::Array1<f32>) -> Self {
        Self { expr_coeffs }
    }

    pub fn new_empty(num_coeffs: usize) -> Self {
        let expr_coeffs = nd::Array1::<f32>::zeros(num_coeffs);
        Self { expr_coeffs }
    }

    pub fn num_coeffs(&self) -> usize {
        self.expr_coeffs.len()
    }

    pub fn as_slice_mut(&mut self) -> &mut [f32] {
        self.expr_coeffs.as_slice_mut().expect("Expression coefficients are always stored contiguously")
    }
}
