use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::column::ResolvedColumn;

/// Column order and widths as the user currently sees them.
///
/// Both are keyed by the create index of the resolved columns the viewer was built with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiveLayout {
    /// Create indexes in display order.
    pub order: Vec<usize>,
    /// Width per create index.
    pub widths: Vec<u32>,
}

impl LiveLayout {
    pub fn width(&self, create_index: usize) -> u32 {
        self.widths.get(create_index).copied().unwrap_or(0)
    }
}

/// The widget side of a column manager.
///
/// The manager owns what is displayed, the host owns how. Everything but rebuilding and reading
/// back the layout is optional.
pub trait ViewerHost {
    /// Throws away the current widget and builds a new one with `columns` in this order.
    fn recreate_viewer(&mut self, columns: &[ResolvedColumn]);

    /// `None` when no widget is built.
    fn live_layout(&self) -> Option<LiveLayout>;

    /// The value format of a column changed.
    fn update_column_header(&mut self, _column: &ResolvedColumn) {}

    fn is_column0_visible(&self) -> bool {
        true
    }

    fn set_redraw(&mut self, _is_enabled: bool) {}

    /// Resizes a column to fit its content.
    fn pack_column(&mut self, _create_index: usize) {}

    fn set_column_width(&mut self, _create_index: usize, _width: u32) {}
}

/// Suspends redrawing of a host until the guard is dropped.
pub struct RedrawGuard<'a, H: ViewerHost> {
    host: &'a mut H,
}

impl<'a, H: ViewerHost> RedrawGuard<'a, H> {
    pub fn new(host: &'a mut H) -> Self {
        trace!("Suspend redraw");
        host.set_redraw(false);
        Self { host }
    }
}

impl<H: ViewerHost> Deref for RedrawGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: ViewerHost> DerefMut for RedrawGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: ViewerHost> Drop for RedrawGuard<'_, H> {
    fn drop(&mut self) {
        trace!("Resume redraw");
        self.host.set_redraw(true);
    }
}
