use std::fmt;
use crate::error::Error;
use crate::fields::Fields;




/// The signature of a right-hand-side evaluator. It receives the full buffer
/// of a patch (guard zones included) and the patch's cell spacing, and
/// returns a time derivative of the same shape.
pub type RightHandSide = dyn Fn(&Fields, f64) -> Fields + Send + Sync;




/**
 * Describes the system of equations solved on a hierarchy: the number of
 * scalar fields, their names, and a pure right-hand-side evaluator. A problem
 * is immutable once built and is shared by every patch solving the same
 * equation.
 *
 * The evaluator must return a buffer of the same shape as its input. It may
 * only write derivatives at slots whose stencil lies inside the buffer, and
 * leave the others at zero; filling guard zones is the job of the patch.
 */
pub struct FieldProblem {
    field_names: Vec<String>,
    rhs: Box<RightHandSide>,
}




// ============================================================================
impl FieldProblem {

    pub fn new<I, S, F>(field_names: I, rhs: F) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Fields, f64) -> Fields + Send + Sync + 'static,
    {
        let field_names: Vec<String> = field_names.into_iter().map(Into::into).collect();

        if field_names.is_empty() {
            return Err(Error::NoFields)
        }
        Ok(Self {
            field_names,
            rhs: Box::new(rhs),
        })
    }

    pub fn num_fields(&self) -> usize {
        self.field_names.len()
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /**
     * Evaluate the right-hand side on `state`. A result whose shape differs
     * from the input is reported rather than trusted.
     */
    pub fn derivative(&self, state: &Fields, spacing: f64) -> Result<Fields, Error> {
        let result = (self.rhs)(state, spacing);

        if result.shape() != state.shape() {
            Err(Error::ShapeMismatch {
                expected: state.shape(),
                found: result.shape(),
            })
        } else {
            Ok(result)
        }
    }
}

impl fmt::Debug for FieldProblem {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("FieldProblem")
            .field("field_names", &self.field_names)
            .finish()
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::FieldProblem;
    use crate::fields::Fields;

    #[test]
    fn a_problem_needs_a_field() {
        let empty: Vec<String> = Vec::new();
        assert!(FieldProblem::new(empty, |u: &Fields, _| u.clone()).is_err());
    }

    #[test]
    fn derivative_shape_is_checked() {
        let good = FieldProblem::new(vec!["u"], |u: &Fields, _| Fields::zeros(u.num_fields(), u.width())).unwrap();
        let bad = FieldProblem::new(vec!["u"], |u: &Fields, _| Fields::zeros(u.num_fields(), u.width() + 1)).unwrap();
        let state = Fields::zeros(1, 8);
        assert_eq!(good.num_fields(), 1);
        assert_eq!(good.field_names(), &["u".to_string()]);
        assert!(good.derivative(&state, 0.1).is_ok());
        assert!(bad.derivative(&state, 0.1).is_err());
    }
}
