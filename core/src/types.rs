use ndarray::Array2;

/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`, 0-indexed.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Board size of an array, `None` when a side does not fit [`Coord`].
pub(crate) fn array_size<T>(array: &Array2<T>) -> Option<Coord2> {
    let (rows, cols) = array.dim();
    Some((rows.try_into().ok()?, cols.try_into().ok()?))
}

/// The up to 8 cells around `center` that lie on a `rows x cols` board, row-major.
pub fn neighbors(center: Coord2, (rows, cols): Coord2) -> impl Iterator<Item = Coord2> {
    let (row, col) = center;
    (row.saturating_sub(1)..=row.saturating_add(1))
        .flat_map(move |r| (col.saturating_sub(1)..=col.saturating_add(1)).map(move |c| (r, c)))
        .filter(move |&pos| pos != center && pos.0 < rows && pos.1 < cols)
}
