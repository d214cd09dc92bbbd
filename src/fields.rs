use serde::{Deserialize, Serialize};
use crate::error::Error;




/**
 * A block of `num_fields` scalar fields sampled on `width` buffer slots. The
 * data is stored field-major: each field is a contiguous slice of length
 * `width`, so stencils along the grid run over unit-stride memory.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fields {
    num_fields: usize,
    width: usize,
    data: Vec<f64>,
}




// ============================================================================
impl Fields {

    /**
     * Return a zero-filled buffer of the given shape.
     */
    pub fn zeros(num_fields: usize, width: usize) -> Self {
        Self {
            num_fields,
            width,
            data: vec![0.0; num_fields * width],
        }
    }

    /**
     * Build a buffer from one vector per field. All the vectors must have
     * the same length.
     */
    pub fn from_fields(fields: Vec<Vec<f64>>) -> Result<Self, Error> {
        let num_fields = fields.len();
        let width = fields.first().map_or(0, |f| f.len());

        if let Some(f) = fields.iter().find(|f| f.len() != width) {
            return Err(Error::ShapeMismatch {
                expected: (num_fields, width),
                found: (num_fields, f.len()),
            });
        }
        Ok(Self {
            num_fields,
            width,
            data: fields.into_iter().flatten().collect(),
        })
    }

    pub fn num_fields(&self) -> usize {
        self.num_fields
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /**
     * Return the `(num_fields, width)` pair.
     */
    pub fn shape(&self) -> (usize, usize) {
        (self.num_fields, self.width)
    }

    pub fn field(&self, q: usize) -> &[f64] {
        &self.data[q * self.width..(q + 1) * self.width]
    }

    pub fn field_mut(&mut self, q: usize) -> &mut [f64] {
        &mut self.data[q * self.width..(q + 1) * self.width]
    }

    pub fn fields(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.width.max(1))
    }

    pub fn get(&self, q: usize, i: usize) -> f64 {
        self.data[q * self.width + i]
    }

    pub fn set(&mut self, q: usize, i: usize, value: f64) {
        self.data[q * self.width + i] = value
    }

    /**
     * Write the values of every field at slot `i` into `slice`, which must
     * have length `num_fields`.
     */
    pub fn read_slot(&self, i: usize, slice: &mut [f64]) {
        for (q, x) in slice.iter_mut().enumerate() {
            *x = self.get(q, i)
        }
    }

    /**
     * Store the values in `slice` (one per field) at slot `i`.
     */
    pub fn write_slot(&mut self, i: usize, slice: &[f64]) {
        for (q, x) in slice.iter().enumerate() {
            self.set(q, i, *x)
        }
    }

    /**
     * Perform `self += factor * other`. The two buffers must have the same
     * shape.
     */
    pub fn add_scaled(&mut self, other: &Self, factor: f64) -> Result<(), Error> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        for (u, du) in self.data.iter_mut().zip(&other.data) {
            *u += factor * du
        }
        Ok(())
    }

    /**
     * Return the largest absolute value over all fields and slots.
     */
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0, |a, x| a.max(x.abs()))
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::Fields;

    #[test]
    fn fields_are_stored_field_major() {
        let f = Fields::from_fields(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(f.shape(), (2, 3));
        assert_eq!(f.field(1), &[4.0, 5.0, 6.0]);
        assert_eq!(f.get(0, 2), 3.0);
        assert_eq!(f.fields().count(), 2);

        let mut slot = [0.0; 2];
        f.read_slot(1, &mut slot);
        assert_eq!(slot, [2.0, 5.0]);
    }

    #[test]
    fn ragged_fields_are_rejected() {
        assert!(Fields::from_fields(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn add_scaled_requires_matching_shapes() {
        let mut a = Fields::zeros(1, 4);
        let mut b = Fields::zeros(1, 4);
        b.field_mut(0).copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        a.add_scaled(&b, 0.5).unwrap();
        assert_eq!(a.field(0), &[0.5, 1.0, 1.5, 2.0]);
        assert_eq!(a.max_abs(), 2.0);
        assert!(a.add_scaled(&Fields::zeros(2, 4), 1.0).is_err());
    }
}
