//! Column-aligned listing tables

use prettytable::format::{Alignment, consts::FORMAT_NO_LINESEP_WITH_TITLE};
use prettytable::{Cell, Row, Table};
use std::fmt;

/// Header and alignment of one listing column
#[derive(Debug, Clone, Copy)]
pub struct Column {
    title: &'static str,
    align: Alignment,
}

impl Column {
    /// Left-aligned text column
    pub const fn text(title: &'static str) -> Self {
        Self {
            title,
            align: Alignment::LEFT,
        }
    }

    /// Right-aligned column for sizes, offsets and counts
    pub const fn number(title: &'static str) -> Self {
        Self {
            title,
            align: Alignment::RIGHT,
        }
    }
}

/// Table of archive entries, cache files or download results
pub struct Listing {
    table: Table,
    aligns: Vec<Alignment>,
}

impl Listing {
    pub fn new(columns: &[Column]) -> Self {
        let mut table = Table::new();
        table.set_format(*FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(Row::new(
            columns
                .iter()
                .map(|column| {
                    let mut cell = Cell::new(column.title).style_spec("b");
                    cell.align(column.align);
                    cell
                })
                .collect(),
        ));

        Self {
            table,
            aligns: columns.iter().map(|column| column.align).collect(),
        }
    }

    /// Append a row; cells beyond the declared columns are dropped
    pub fn row<I>(&mut self, cells: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let cells = cells
            .into_iter()
            .zip(&self.aligns)
            .map(|(text, &align)| Cell::new_align(text.as_ref(), align))
            .collect();
        self.table.add_row(Row::new(cells));
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Print to stdout, styled when it is a terminal
    pub fn print(&self) {
        self.table.printstd();
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.table, f)
    }
}
