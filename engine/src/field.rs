use serde::{Deserialize, Serialize};

use crate::api::{CaveError, Result};

/// Dense lattice of occupancy values. 2D fields have `depth == 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarField {
    width: usize,
    height: usize,
    depth: usize,
    values: Vec<u32>,
}

impl ScalarField {
    pub fn new_2d(width: usize, height: usize) -> Result<Self> {
        Self::new_3d(width, height, 1)
    }

    pub fn new_3d(width: usize, height: usize, depth: usize) -> Result<Self> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(CaveError::Config(format!(
                "field dimensions must be positive, got {width}x{height}x{depth}"
            )));
        }
        Ok(Self { width, height, depth, values: vec![0; width * height * depth] })
    }

    /// Builds a 2D field from rows indexed `[y][x]`; all rows must share one length.
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut field = Self::new_2d(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(CaveError::Config(format!("row {y} has {} values, expected {width}", row.len())));
            }
            for (x, &v) in row.iter().enumerate() {
                field.set(x, y, 0, v);
            }
        }
        Ok(field)
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn depth(&self) -> usize { self.depth }
    pub fn is_2d(&self) -> bool { self.depth == 1 }
    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }
    pub fn values(&self) -> &[u32] { &self.values }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        // x fastest, then y, then z
        (z * self.height + y) * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u32 {
        self.values[self.index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: u32) {
        let idx = self.index(x, y, z);
        self.values[idx] = value;
    }

    pub fn fill(&mut self, value: u32) {
        self.values.iter_mut().for_each(|v| *v = value);
    }

    /// Copy of a 2D field framed by `border` solid (1) cells on every side.
    pub fn with_border(&self, border: usize) -> Self {
        let width = self.width + border * 2;
        let height = self.height + border * 2;
        let mut out = Self { width, height, depth: 1, values: vec![1; width * height] };
        for y in 0..self.height {
            for x in 0..self.width {
                out.set(x + border, y + border, 0, self.get(x, y, 0));
            }
        }
        out
    }

    pub fn count_where(&self, pred: impl Fn(u32) -> bool) -> usize {
        self.values.iter().filter(|&&v| pred(v)).count()
    }

    /// One text row per `y`, top row first; `#` for solid, `.` for empty.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                out.push(if self.get(x, y, 0) >= 1 { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(ScalarField::new_2d(0, 4), Err(CaveError::Config(_))));
        assert!(matches!(ScalarField::new_3d(3, 3, 0), Err(CaveError::Config(_))));
    }

    #[test]
    fn border_wraps_original_values() {
        let field = ScalarField::from_rows(&[vec![0, 0], vec![0, 0]]).unwrap();
        let framed = field.with_border(2);
        assert_eq!((framed.width(), framed.height()), (6, 6));
        assert_eq!(framed.count_where(|v| v == 0), 4);
        assert_eq!(framed.get(2, 2, 0), 0);
        assert_eq!(framed.get(0, 5, 0), 1);
    }

    #[test]
    fn ragged_rows_fail() {
        assert!(ScalarField::from_rows(&[vec![1, 1], vec![1]]).is_err());
    }

    #[test]
    fn ascii_puts_top_row_first() {
        let field = ScalarField::from_rows(&[vec![1, 0], vec![0, 0]]).unwrap();
        assert_eq!(field.to_ascii(), "..\n#.\n");
    }
}
