//! Built-in grid layouts and their cells.
//!
//! Every layout is drawn on a 2×2 template: two rows, each holding either
//! two squares or one wide rectangle (two squares merged). Cells are listed
//! row-major, top row first, left to right; that order is the slot order.
//!
//! ```text
//!   FourSquares     BottomRectangle   TopRectangle
//!   ┌───┬───┐       ┌───┬───┐         ┌───────┐
//!   │ 0 │ 1 │       │ 0 │ 1 │         │   0   │
//!   ├───┼───┤       ├───┴───┤         ├───┬───┤
//!   │ 2 │ 3 │       │   2   │         │ 1 │ 2 │
//!   └───┴───┘       └───────┘         └───┴───┘
//! ```

use core::fmt;
use core::str::FromStr;

use crate::constraint::{Rect, Size};
use crate::error::GridError;

/// The template every layout tiles, in square units.
pub const TEMPLATE: Size = Size::new(2, 2);

/// Identifies one of the built-in layouts.
///
/// Declaration order is the order layouts appear in the picker.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LayoutId {
    /// Two squares on top, two below.
    #[default]
    FourSquares,
    /// Two squares on top, one wide rectangle below.
    BottomRectangle,
    /// One wide rectangle on top, two squares below.
    TopRectangle,
}

impl LayoutId {
    /// Picker position of this layout.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Layout at a picker position.
    pub fn from_index(index: usize) -> Result<Self, GridError> {
        list_layouts()
            .get(index)
            .copied()
            .ok_or(GridError::InvalidLayout)
    }

    /// Kebab-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::FourSquares => "four-squares",
            Self::BottomRectangle => "bottom-rectangle",
            Self::TopRectangle => "top-rectangle",
        }
    }

    /// Cells of this layout. Shorthand for [`cell_specs`].
    pub fn cells(self) -> &'static [CellSpec] {
        cell_specs(self)
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the kebab-case name or the picker index.
impl FromStr for LayoutId {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index);
        }
        list_layouts()
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or(GridError::InvalidLayout)
    }
}

/// Cell shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellShape {
    /// One template unit wide.
    Square,
    /// Two template units wide, one high.
    WideRectangle,
}

impl CellShape {
    /// Width in template units.
    pub const fn span(self) -> u32 {
        match self {
            Self::Square => 1,
            Self::WideRectangle => 2,
        }
    }
}

/// Template row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Row {
    Top,
    Bottom,
}

impl Row {
    pub const fn index(self) -> u32 {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
        }
    }
}

/// One cell of a layout, positioned on the [`TEMPLATE`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellSpec {
    pub shape: CellShape,
    pub row: Row,
    /// Left column (0 or 1).
    pub column: u32,
}

impl CellSpec {
    const fn square(row: Row, column: u32) -> Self {
        Self {
            shape: CellShape::Square,
            row,
            column,
        }
    }

    const fn wide(row: Row) -> Self {
        Self {
            shape: CellShape::WideRectangle,
            row,
            column: 0,
        }
    }

    /// Footprint on the template, in square units.
    pub const fn template_rect(&self) -> Rect {
        Rect::new(self.column, self.row.index(), self.shape.span(), 1)
    }
}

const FOUR_SQUARES: &[CellSpec] = &[
    CellSpec::square(Row::Top, 0),
    CellSpec::square(Row::Top, 1),
    CellSpec::square(Row::Bottom, 0),
    CellSpec::square(Row::Bottom, 1),
];

const BOTTOM_RECTANGLE: &[CellSpec] = &[
    CellSpec::square(Row::Top, 0),
    CellSpec::square(Row::Top, 1),
    CellSpec::wide(Row::Bottom),
];

const TOP_RECTANGLE: &[CellSpec] = &[
    CellSpec::wide(Row::Top),
    CellSpec::square(Row::Bottom, 0),
    CellSpec::square(Row::Bottom, 1),
];

const LAYOUTS: &[LayoutId] = &[
    LayoutId::FourSquares,
    LayoutId::BottomRectangle,
    LayoutId::TopRectangle,
];

/// All built-in layouts in picker order.
pub fn list_layouts() -> &'static [LayoutId] {
    LAYOUTS
}

/// Cells of a layout, in slot order.
pub fn cell_specs(id: LayoutId) -> &'static [CellSpec] {
    match id {
        LayoutId::FourSquares => FOUR_SQUARES,
        LayoutId::BottomRectangle => BOTTOM_RECTANGLE,
        LayoutId::TopRectangle => TOP_RECTANGLE,
    }
}

/// Why a cell list fails to tile the template.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TilingError {
    #[error("cell {0} extends past the template")]
    OutOfBounds(usize),
    #[error("cells {0} and {1} overlap")]
    Overlap(usize, usize),
    #[error("cells cover {covered} of {expected} template units")]
    Gap { covered: u64, expected: u64 },
}

/// Check that `cells` cover the [`TEMPLATE`] exactly once.
pub fn check_tiling(cells: &[CellSpec]) -> Result<(), TilingError> {
    let template = Rect::new(0, 0, TEMPLATE.width, TEMPLATE.height);
    let mut covered = 0u64;
    for (i, cell) in cells.iter().enumerate() {
        let r = cell.template_rect();
        if !template.contains(&r) {
            return Err(TilingError::OutOfBounds(i));
        }
        if let Some(j) = cells[..i]
            .iter()
            .position(|other| other.template_rect().overlaps(&r))
        {
            return Err(TilingError::Overlap(j, i));
        }
        covered += r.area();
    }
    if covered != TEMPLATE.area() {
        return Err(TilingError::Gap {
            covered,
            expected: TEMPLATE.area(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_layouts_tile_the_template() {
        for &id in list_layouts() {
            assert_eq!(check_tiling(cell_specs(id)), Ok(()), "{id}");
        }
    }

    #[test]
    fn cell_counts() {
        assert_eq!(cell_specs(LayoutId::FourSquares).len(), 4);
        assert_eq!(cell_specs(LayoutId::BottomRectangle).len(), 3);
        assert_eq!(cell_specs(LayoutId::TopRectangle).len(), 3);
    }

    #[test]
    fn cells_are_row_major() {
        for &id in list_layouts() {
            let cells = cell_specs(id);
            assert!(
                cells
                    .windows(2)
                    .all(|w| (w[0].row, w[0].column) < (w[1].row, w[1].column)),
                "{id}"
            );
        }
    }

    #[test]
    fn picker_order_matches_index() {
        for (i, &id) in list_layouts().iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(LayoutId::from_index(i), Ok(id));
        }
        assert_eq!(LayoutId::from_index(3), Err(GridError::InvalidLayout));
    }

    #[test]
    fn parse_by_name_or_index() {
        assert_eq!("top-rectangle".parse(), Ok(LayoutId::TopRectangle));
        assert_eq!("Four-Squares".parse(), Ok(LayoutId::FourSquares));
        assert_eq!("1".parse(), Ok(LayoutId::BottomRectangle));
        assert_eq!("7".parse::<LayoutId>(), Err(GridError::InvalidLayout));
        assert_eq!("hexagons".parse::<LayoutId>(), Err(GridError::InvalidLayout));
    }

    #[test]
    fn detects_gap_and_overlap() {
        let gap = &FOUR_SQUARES[..3];
        assert_eq!(
            check_tiling(gap),
            Err(TilingError::Gap {
                covered: 3,
                expected: 4
            })
        );

        let overlap = [CellSpec::wide(Row::Top), CellSpec::square(Row::Top, 1)];
        assert_eq!(check_tiling(&overlap), Err(TilingError::Overlap(0, 1)));

        let outside = [CellSpec::square(Row::Top, 2)];
        assert_eq!(check_tiling(&outside), Err(TilingError::OutOfBounds(0)));
    }
}
