use log::{error, info};

use crate::{common::body_model::BodyModel, errors::AlignError};

/// Writes shape coefficients into the model and recomputes its shape
/// blendshapes once. A vector of the wrong length is rejected untouched.
pub fn apply_shape<M: BodyModel>(model: &mut M, betas: &[f32]) -> Result<(), AlignError> {
    if betas.len() != M::NUM_BETAS {
        let err = AlignError::ShapeMismatch {
            expected: M::NUM_BETAS,
            actual: betas.len(),
        };
        error!("shape not applied: {err}");
        return Err(err);
    }
    model.betas_mut()[..M::NUM_BETAS].copy_from_slice(betas);
    model.set_beta_shapes();
    info!("applied {} betas", M::NUM_BETAS);
    Ok(())
}

/// Same as [`apply_shape`] for the expression space
pub fn apply_expression<M: BodyModel>(model: &mut M, expression: &[f32]) -> Result<(), AlignError> {
    if expression.len() != M::NUM_EXPRESSIONS {
        let err = AlignError::ExpressionMismatch {
            expected: M::NUM_EXPRESSIONS,
            actual: expression.len(),
        };
        error!("expression not applied: {err}");
        return Err(err);
    }
    model.expressions_mut()[..M::NUM_EXPRESSIONS].copy_from_slice(expression);
    model.set_expressions();
    info!("applied {} expression coefficients", M::NUM_EXPRESSIONS);
    Ok(())
}
