//! Mana Chart
//!
//! Column chart of drafted cards by mana cost. Costs are bucketed 0 through 6,
//! with everything 7 and above in a shared `7+` bucket.

use serde::Serialize;

/// Number of buckets in the chart
pub const BUCKET_COUNT: usize = 8;

/// Labels for each bucket, in order
pub const BUCKET_LABELS: [&str; BUCKET_COUNT] = ["0", "1", "2", "3", "4", "5", "6", "7+"];

/// Width in characters of a full-height bar
const BAR_WIDTH: usize = 20;

/// Display options for the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub title: String,
    pub background_color: String,
    pub axis_x_title: String,
    pub axis_y_title: String,
    pub axis_y_minimum: u32,
    pub axis_y_maximum: u32,
    pub series_type: String,
    pub series_color: String,
    pub animation_enabled: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Mana Breakdown".to_string(),
            background_color: "#eee".to_string(),
            axis_x_title: "Mana Cost".to_string(),
            axis_y_title: "# Cards".to_string(),
            axis_y_minimum: 0,
            axis_y_maximum: 10,
            series_type: "column".to_string(),
            series_color: "#000000".to_string(),
            animation_enabled: true,
        }
    }
}

/// One column of the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub y: u32,
}

/// Count cards per mana bucket
pub fn bucket_manas(manas: &[u32]) -> [u32; BUCKET_COUNT] {
    let mut buckets = [0u32; BUCKET_COUNT];
    for &mana in manas {
        let index = (mana as usize).min(BUCKET_COUNT - 1);
        buckets[index] += 1;
    }
    buckets
}

fn points_from_buckets(buckets: &[u32; BUCKET_COUNT]) -> Vec<DataPoint> {
    BUCKET_LABELS
        .iter()
        .zip(buckets.iter())
        .map(|(label, &y)| DataPoint {
            label: label.to_string(),
            y,
        })
        .collect()
}

/// The mana breakdown chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManaChart {
    options: ChartOptions,
    points: Vec<DataPoint>,
    render_count: u64,
}

impl ManaChart {
    /// Create a chart with all buckets at zero and render it once
    pub fn new(options: ChartOptions) -> Self {
        let mut chart = Self {
            options,
            points: points_from_buckets(&[0; BUCKET_COUNT]),
            render_count: 0,
        };
        chart.mark_rendered();
        chart
    }

    /// Replace every data point from a fresh list of mana costs and re-render
    pub fn update(&mut self, manas: &[u32]) {
        self.points = points_from_buckets(&bucket_manas(manas));
        self.mark_rendered();
    }

    fn mark_rendered(&mut self) {
        self.render_count += 1;
    }

    /// Draw the chart as text, one bar per bucket
    pub fn to_text(&self) -> String {
        let max = self.options.axis_y_maximum.max(1) as usize;
        let mut out = format!("{}\n", self.options.title);

        for point in &self.points {
            let clipped = (point.y as usize).min(max);
            let width = clipped * BAR_WIDTH / max;
            out.push_str(&format!(
                "{:>3} | {:<bar$} {}\n",
                point.label,
                "#".repeat(width),
                point.y,
                bar = BAR_WIDTH
            ));
        }

        out.push_str(&format!(
            "      {} (y: {}, {}..{})\n",
            self.options.axis_x_title,
            self.options.axis_y_title,
            self.options.axis_y_minimum,
            self.options.axis_y_maximum
        ));
        out
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// How many times the chart has been drawn
    pub fn render_count(&self) -> u64 {
        self.render_count
    }
}

impl Default for ManaChart {
    fn default() -> Self {
        Self::new(ChartOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_manas_clamps_high_costs() {
        let buckets = bucket_manas(&[0, 0, 1, 5, 3, 7, 9, 25]);
        assert_eq!(buckets, [2, 1, 0, 1, 0, 1, 0, 3]);
    }

    #[test]
    fn test_bucket_manas_empty() {
        assert_eq!(bucket_manas(&[]), [0; BUCKET_COUNT]);
    }

    #[test]
    fn test_new_chart_has_eight_zero_buckets() {
        let chart = ManaChart::default();
        assert_eq!(chart.points().len(), BUCKET_COUNT);
        assert!(chart.points().iter().all(|p| p.y == 0));
        assert_eq!(chart.points()[7].label, "7+");
        assert_eq!(chart.render_count(), 1);
    }

    #[test]
    fn test_update_replaces_all_points() {
        let mut chart = ManaChart::default();
        chart.update(&[2, 2, 2]);
        assert_eq!(chart.points()[2].y, 3);

        chart.update(&[4]);
        assert_eq!(chart.points()[2].y, 0);
        assert_eq!(chart.points()[4].y, 1);
        assert_eq!(chart.points().len(), BUCKET_COUNT);
        assert_eq!(chart.render_count(), 3);
    }

    #[test]
    fn test_default_options() {
        let options = ChartOptions::default();
        assert_eq!(options.title, "Mana Breakdown");
        assert_eq!(options.axis_y_maximum, 10);
        assert_eq!(options.series_type, "column");
    }

    #[test]
    fn test_text_bars_clip_at_axis_maximum() {
        let mut chart = ManaChart::default();
        chart.update(&[1; 15]);
        let text = chart.to_text();
        assert_eq!(chart.render_count(), 2);

        let line = text.lines().find(|l| l.trim_start().starts_with("1 |")).unwrap();
        assert!(line.contains(&"#".repeat(BAR_WIDTH)));
        assert!(line.ends_with("15"));
    }
}
