//! Yoga detection for a computed chart.

use kundali_base::yoga::{YogaMatch, YogaSnapshot, detect_yogas};

use crate::chart::ChartResult;
use crate::strength::StrengthReport;

/// Freeze the chart into the snapshot the yoga rules read.
pub fn yoga_snapshot(chart: &ChartResult, strengths: &StrengthReport) -> YogaSnapshot {
    let bodies: [(f64, bool); 9] = std::array::from_fn(|i| {
        let b = &chart.bodies[i];
        (b.sidereal_longitude_deg, b.is_retrograde())
    });
    YogaSnapshot::new(&chart.bhavas, &bodies, strengths.strong_flags())
}

/// Every catalog yoga present in the chart, in catalog order.
pub fn yogas(chart: &ChartResult, strengths: &StrengthReport) -> Vec<YogaMatch> {
    let matches = detect_yogas(&yoga_snapshot(chart, strengths));
    tracing::debug!(count = matches.len(), "yogas detected");
    matches
}
