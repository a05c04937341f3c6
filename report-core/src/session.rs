//! Reference host: the roster page state that owns a report.

use chrono::NaiveDate;

use crate::content::ReportData;
use crate::document::ReportBuilderValue;
use crate::editor::ReportHost;
use crate::roster::{
    chart_buckets, filter_providers, pie_buckets, ChartBucket, ChartCategory, ColumnSelection,
    RosterColumn, RosterFilters, RosterProvider,
};

/// Callback invoked with every new document value.
pub type OnChangeCallback = Box<dyn Fn(&ReportBuilderValue) + Send + Sync>;

/// Roster page state: dataset, filters, chart category, column selection
/// and the report document.
pub struct ReportSession {
    value: ReportBuilderValue,
    roster: Vec<RosterProvider>,
    filters: RosterFilters,
    category: ChartCategory,
    selection: ColumnSelection,
    generated_on: NaiveDate,
    filtered: Vec<RosterProvider>,
    buckets: Vec<ChartBucket>,
    pie: Vec<ChartBucket>,
    on_change: Option<OnChangeCallback>,
}

impl std::fmt::Debug for ReportSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportSession")
            .field("value", &self.value)
            .field("filters", &self.filters)
            .field("category", &self.category)
            .field("selection", &self.selection)
            .field("rows", &self.filtered.len())
            .finish_non_exhaustive()
    }
}

impl ReportSession {
    /// Create a session over `roster`, seeded with the default layout.
    #[must_use]
    pub fn new(roster: Vec<RosterProvider>, generated_on: NaiveDate) -> Self {
        let mut session = Self {
            value: ReportBuilderValue::default_layout(),
            roster,
            filters: RosterFilters::default(),
            category: ChartCategory::default(),
            selection: ColumnSelection::default(),
            generated_on,
            filtered: Vec::new(),
            buckets: Vec::new(),
            pie: Vec::new(),
            on_change: None,
        };
        session.refresh();
        session
    }

    /// Replace the document.
    #[must_use]
    pub fn with_value(mut self, value: ReportBuilderValue) -> Self {
        self.value = value;
        self
    }

    /// Set the column selection.
    #[must_use]
    pub fn with_selection(mut self, selection: ColumnSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: RosterFilters) -> Self {
        self.set_filters(filters);
        self
    }

    /// Set the chart category.
    #[must_use]
    pub fn with_category(mut self, category: ChartCategory) -> Self {
        self.set_category(category);
        self
    }

    /// Register a callback for document changes.
    pub fn set_on_change<F>(&mut self, callback: F)
    where
        F: Fn(&ReportBuilderValue) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
    }

    /// Replace the filters and recompute the rows.
    pub fn set_filters(&mut self, filters: RosterFilters) {
        self.filters = filters;
        self.refresh();
    }

    /// Replace the chart category and recompute the buckets.
    pub fn set_category(&mut self, category: ChartCategory) {
        self.category = category;
        self.refresh();
    }

    /// Current filters.
    #[must_use]
    pub fn filters(&self) -> &RosterFilters {
        &self.filters
    }

    /// Current column selection.
    #[must_use]
    pub fn selection(&self) -> &ColumnSelection {
        &self.selection
    }

    /// Rows passing the current filters.
    #[must_use]
    pub fn rows(&self) -> &[RosterProvider] {
        &self.filtered
    }

    /// Ambient data for rendering blocks.
    #[must_use]
    pub fn data(&self) -> ReportData<'_> {
        ReportData {
            chart_category: self.category,
            chart_data: &self.buckets,
            chart_data_for_pie: &self.pie,
            selected_columns: &self.selection,
            rows: &self.filtered,
            generated_on: self.generated_on,
        }
    }

    fn refresh(&mut self) {
        self.filtered = filter_providers(&self.roster, &self.filters);
        self.buckets = chart_buckets(&self.filtered, self.category);
        self.pie = pie_buckets(&self.buckets);
        tracing::debug!(
            "Roster refreshed: {} of {} rows, {} buckets",
            self.filtered.len(),
            self.roster.len(),
            self.buckets.len()
        );
    }
}

impl ReportHost for ReportSession {
    fn value(&self) -> &ReportBuilderValue {
        &self.value
    }

    fn on_change(&mut self, value: ReportBuilderValue) {
        self.value = value;
        if let Some(callback) = &self.on_change {
            callback(&self.value);
        }
    }

    fn on_toggle_column(&mut self, column: RosterColumn) {
        self.selection.toggle(column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use crate::editor::ReportEditor;
    use crate::roster::{sample_roster, WorkStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn session() -> ReportSession {
        ReportSession::new(
            sample_roster(),
            NaiveDate::from_ymd_opt(2025, 3, 14).expect("date"),
        )
    }

    #[test]
    fn test_seeded_with_default_layout() {
        let session = session();
        assert_eq!(session.value().blocks.len(), 3);
        assert_eq!(session.rows().len(), 9);
        assert_eq!(session.data().row_count(), 9);
    }

    #[test]
    fn test_filters_drive_rows_and_buckets() {
        let session = session()
            .with_filters(RosterFilters {
                work_status: Some(WorkStatus::Prn),
                ..RosterFilters::default()
            })
            .with_category(ChartCategory::Type);
        let data = session.data();
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.chart_data.iter().map(|b| b.count).sum::<usize>(), 2);
        assert_eq!(data.chart_data_for_pie.len(), 1);
    }

    #[test]
    fn test_editor_changes_notify_callback() {
        let mut session = session();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        session.set_on_change(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let mut editor = ReportEditor::default();
        editor.add_block(&mut session, BlockKind::Text);
        editor.set_title(&mut session, "Night shift");
        editor.toggle_column(&mut session, RosterColumn::Phone);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.value().title, "Night shift");
        assert!(session.selection().contains(RosterColumn::Phone));
    }
}
