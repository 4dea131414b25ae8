//! Physical sheets derived from the page list.
//!
//! A sheet carries two pages: the even-indexed page on its front and the
//! following odd-indexed page on its back. Sheets are projections of the
//! page list and are rebuilt on every access.

use crate::page::Page;

/// Stacking order assigned to the sheet at the open spread.
pub const TOP_Z_INDEX: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub sheet_index: usize,
    pub front: Page,
    pub back: Page,
}

pub fn total_sheets(page_count: usize) -> usize {
    page_count.div_ceil(2)
}

/// Sheet holding the page at `position`.
pub fn current_sheet_index(position: usize) -> usize {
    position / 2
}

/// Split pages into two-sided sheets. An empty book yields no sheets.
pub fn derive_sheets(pages: &[Page]) -> Vec<Sheet> {
    pages
        .chunks(2)
        .enumerate()
        .map(|(sheet_index, pair)| Sheet {
            sheet_index,
            front: pair[0].clone(),
            back: pair.get(1).cloned().unwrap_or_else(Page::placeholder),
        })
        .collect()
}

/// Sheets nearer the open spread stack above the ones further away.
pub fn sheet_z_index(sheet_index: usize, current_sheet: usize) -> i64 {
    TOP_Z_INDEX - sheet_index.abs_diff(current_sheet) as i64
}
