use std::collections::{BTreeSet, HashMap, HashSet};

use itertools::Itertools;
use stop_explorer_transit::{StopIdentifier, StopView};

use super::{Projection, RenderAdapter, ViewKind, or_na};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub id: StopIdentifier,
    pub name: String,
    pub street: String,
    pub locality: String,
    pub authority: String,
    pub lines: String,
    pub is_favorite: bool,
    pub visible: bool,
}

impl TableRow {
    fn for_stop(view: &StopView<'_>) -> Self {
        let record = view.record;
        Self {
            id: record.id().clone(),
            name: or_na(record.name()).to_string(),
            street: or_na(record.street()).to_string(),
            locality: or_na(record.locality()).to_string(),
            authority: or_na(record.authority().as_str()).to_string(),
            lines: or_na(record.lines()).to_string(),
            is_favorite: view.is_favorite,
            visible: true,
        }
    }

    pub fn star(&self) -> char {
        if self.is_favorite { '★' } else { '☆' }
    }

    fn cells(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.street.as_str(),
            self.locality.as_str(),
            self.authority.as_str(),
            self.lines.as_str(),
            or_na(self.id.as_str()),
        ]
    }
}

/// Table of stops, one row per identifier in load order.
///
/// Filtering only hides rows; it never reorders them.
#[derive(Clone, Debug, Default)]
pub struct TableView {
    rows: Vec<TableRow>,
    index: HashMap<StopIdentifier, usize>,
}

const HEADERS: [&str; 7] = ["Name", "Street", "Locality", "Authority", "Lines", "ATCO", "Fav"];

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self, id: &StopIdentifier) -> Option<&TableRow> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|row| row.visible)
    }

    /// Visible rows as aligned plain text, one line per row after a header.
    pub fn render_text(&self) -> String {
        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in self.visible_rows() {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let pad = |text: &str, width: usize| {
            let fill = width.saturating_sub(text.chars().count());
            format!("{text}{}", " ".repeat(fill))
        };

        let header = HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| pad(h, w))
            .join("  ");

        let lines = self.visible_rows().map(|row| {
            row.cells()
                .into_iter()
                .chain(std::iter::once(""))
                .zip(widths)
                .enumerate()
                .map(|(column, (cell, width))| {
                    if column == HEADERS.len() - 1 {
                        row.star().to_string()
                    } else {
                        pad(cell, width)
                    }
                })
                .join("  ")
        });

        std::iter::once(header)
            .chain(lines)
            .map(|line| line.trim_end().to_string())
            .join("\n")
    }
}

impl TableView {
    /// Rebuild the rows if the loaded stops differ from the ones on screen.
    fn sync_rows(&mut self, loaded: &[&StopView<'_>]) {
        let unchanged = self.rows.len() == loaded.len()
            && self.rows.iter().zip(loaded).all(|(row, view)| &row.id == view.id());
        if unchanged {
            return;
        }

        self.rows = loaded.iter().map(|view| TableRow::for_stop(view)).collect();
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id.clone(), i))
            .collect();
    }
}

impl RenderAdapter for TableView {
    fn view(&self) -> ViewKind {
        ViewKind::Table
    }

    fn apply(&mut self, projection: &Projection<'_>) {
        // Duplicate identifiers share the first row.
        let mut seen = HashSet::with_capacity(projection.all.len());
        let loaded: Vec<_> = projection
            .all
            .iter()
            .filter(|view| seen.insert(view.record.id()))
            .collect();
        self.sync_rows(&loaded);

        let shown: HashSet<_> = projection.stops.iter().map(|view| view.id()).collect();
        for (row, view) in self.rows.iter_mut().zip(&loaded) {
            row.is_favorite = view.is_favorite;
            row.visible = shown.contains(&row.id);
        }
    }

    fn visible(&self) -> BTreeSet<StopIdentifier> {
        self.visible_rows().map(|row| row.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use geo::Point;
    use stop_explorer_transit::{StopDetails, StopRecord};

    use super::*;

    fn stop(code: &str, name: &str) -> StopRecord {
        StopRecord::new(
            code,
            StopDetails {
                name: name.into(),
                street: "High St".into(),
                authority: "Bristol".into(),
                ..Default::default()
            },
            Point::new(-2.58, 51.45),
        )
    }

    /// `shown` lists the projected codes in projection order.
    fn projection<'a>(all: &'a [StopRecord], shown: &[&str], favorite: &[&str]) -> Projection<'a> {
        let view = |record: &'a StopRecord| StopView {
            record,
            is_favorite: favorite.contains(&record.id().as_str()),
        };
        Projection {
            all: all.iter().map(view).collect(),
            stops: shown
                .iter()
                .filter_map(|code| all.iter().find(|record| record.id().as_str() == *code))
                .map(view)
                .collect(),
            user_location: None,
        }
    }

    #[test]
    fn test_rows_stay_in_load_order() {
        let stops = vec![stop("a", "Alpha"), stop("b", "Beta"), stop("c", "Gamma")];
        let mut table = TableView::new();

        // First render from a distance-ordered projection.
        table.apply(&projection(&stops, &["c", "b"], &[]));
        let names: Vec<_> = table.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
        assert!(!table.row(&StopIdentifier::new("a")).unwrap().visible);

        table.apply(&projection(&stops, &["a", "b", "c"], &[]));
        let visible: Vec<_> = table.visible_rows().map(|r| r.id.as_str()).collect();
        assert_eq!(visible, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_codes_share_one_row() {
        let stops = vec![stop("a", "Alpha"), stop("b", "Beta"), stop("a", "Alpha again")];
        let mut table = TableView::new();
        table.apply(&projection(&stops, &["a", "b"], &[]));

        let names: Vec<_> = table.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_apply_twice_same_visible_set() {
        let stops = vec![stop("a", "Alpha"), stop("b", "Beta")];
        let mut table = TableView::new();
        let projection = projection(&stops, &["b"], &["b"]);

        table.apply(&projection);
        let once = table.visible();
        table.apply(&projection);
        assert_eq!(table.visible(), once);
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn test_star_follows_favorite_flag() {
        let stops = vec![stop("a", "Alpha")];
        let mut table = TableView::new();
        table.apply(&projection(&stops, &["a"], &[]));
        assert_eq!(table.rows()[0].star(), '☆');

        table.apply(&projection(&stops, &["a"], &["a"]));
        assert_eq!(table.rows()[0].star(), '★');
    }

    #[test]
    fn test_render_text() {
        let stops = vec![stop("0100BRP90123", "Temple Meads")];
        let mut table = TableView::new();
        table.apply(&projection(&stops, &["0100BRP90123"], &["0100BRP90123"]));

        let text = table.render_text();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Name"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("Temple Meads"));
        assert!(row.contains("N/A"));
        assert!(row.contains("0100BRP90123"));
        assert!(row.ends_with('★'));
        assert!(lines.next().is_none());
    }
}
