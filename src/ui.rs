use std::collections::HashMap;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Cell, Row, Table, Widget},
};
use tracing::trace;

use colprof::column::{ColumnStyle, ResolvedColumn};
use colprof::viewer::{LiveLayout, ViewerHost};

/// Space added to the content when a column is packed.
const PACK_PADDING: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Long(i64),
    Double(f64),
    Text(String),
}

pub type Record = HashMap<String, CellValue>;

/// A terminal table which shows the columns of a profile.
#[derive(Debug)]
pub struct TableUI {
    columns: Vec<ResolvedColumn>,
    /// Create indexes in display order.
    order: Vec<usize>,
    widths: Vec<u32>,
    records: Vec<Record>,
    is_redraw_enabled: bool,
    is_built: bool,
}

impl TableUI {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            columns: Vec::new(),
            order: Vec::new(),
            widths: Vec::new(),
            records,
            is_redraw_enabled: true,
            is_built: false,
        }
    }

    fn cell_text(column: &ResolvedColumn, record: &Record) -> String {
        match record.get(column.id()) {
            Some(CellValue::Long(value)) => column.print_long(*value, false),
            Some(CellValue::Double(value)) => column.print_double(*value, false),
            Some(CellValue::Text(text)) => text.clone(),
            None => String::new(),
        }
    }

    fn alignment(style: ColumnStyle) -> Alignment {
        match style {
            ColumnStyle::Lead => Alignment::Left,
            ColumnStyle::Center => Alignment::Center,
            ColumnStyle::Trail => Alignment::Right,
        }
    }

    fn displayed(&self) -> impl Iterator<Item = (usize, &ResolvedColumn)> {
        self.order
            .iter()
            .filter_map(|&idx| self.columns.get(idx).map(|c| (idx, c)))
    }

    /// Renders into a buffer of the given size, lines without trailing spaces.
    pub fn render_lines(&self, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        self.render(area, &mut buf);

        (0..height)
            .map(|y| {
                let line: String = (0..width).map(|x| buf[(x, y)].symbol()).collect();
                line.trim_end().to_string()
            })
            .collect()
    }
}

impl Widget for &TableUI {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_redraw_enabled {
            return;
        }

        let header = Row::new(self.displayed().map(|(_, column)| {
            Cell::from(
                Line::from(column.header.clone())
                    .alignment(TableUI::alignment(column.definition.style)),
            )
        }))
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.records.iter().map(|record| {
            Row::new(self.displayed().map(|(_, column)| {
                Cell::from(
                    Line::from(TableUI::cell_text(column, record))
                        .alignment(TableUI::alignment(column.definition.style)),
                )
            }))
        });

        let widths: Vec<Constraint> = self
            .displayed()
            .map(|(idx, _)| {
                let width = self.widths.get(idx).copied().unwrap_or(0);
                Constraint::Length(u16::try_from(width).unwrap_or(u16::MAX))
            })
            .collect();

        Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .render(area, buf);
    }
}

impl ViewerHost for TableUI {
    fn recreate_viewer(&mut self, columns: &[ResolvedColumn]) {
        trace!("Recreate table with {} columns", columns.len());
        self.columns = columns.to_vec();
        self.order = columns.iter().map(|c| c.create_index).collect();
        let mut widths = vec![0; columns.len()];
        for column in columns {
            if let Some(width) = widths.get_mut(column.create_index) {
                *width = column.width;
            }
        }
        self.widths = widths;
        self.is_built = true;
    }

    fn live_layout(&self) -> Option<LiveLayout> {
        if !self.is_built {
            return None;
        }
        Some(LiveLayout {
            order: self.order.clone(),
            widths: self.widths.clone(),
        })
    }

    fn update_column_header(&mut self, column: &ResolvedColumn) {
        if let Some(existing) = self.columns.get_mut(column.create_index) {
            *existing = column.clone();
        }
    }

    fn is_column0_visible(&self) -> bool {
        self.widths.first().is_some_and(|&w| w > 0)
    }

    fn set_redraw(&mut self, is_enabled: bool) {
        self.is_redraw_enabled = is_enabled;
    }

    fn pack_column(&mut self, create_index: usize) {
        let Some(column) = self.columns.get(create_index) else {
            return;
        };
        let content = self
            .records
            .iter()
            .map(|record| Self::cell_text(column, record).chars().count())
            .chain(std::iter::once(column.header.chars().count()))
            .max()
            .unwrap_or(0) as u32;
        self.set_column_width(create_index, content + PACK_PADDING);
    }

    fn set_column_width(&mut self, create_index: usize, width: u32) {
        if let Some(existing) = self.widths.get_mut(create_index) {
            *existing = width;
        }
    }
}
