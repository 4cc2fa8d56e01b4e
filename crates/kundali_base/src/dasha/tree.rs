//! Lazy Vimshottari period generation.
//!
//! Mahadashas are produced on demand from closed-form cycle arithmetic, so
//! the sequence is unbounded. Sub-periods are generated only for periods
//! that overlap the requested window and only down to the requested depth.
//! A parent that is expanded always receives all nine children, so child
//! durations sum to the parent's duration at every level.

use crate::error::BaseError;

use super::cycle::{
    BirthBalance, CYCLE_DAYS, CYCLE_YEARS, VIMSHOTTARI_CYCLE, allotment_days, birth_balance,
    cycle_position,
};
use super::types::{DashaLevel, DashaPeriod, MAX_DASHA_DEPTH, MAX_PERIODS};

/// Full 120-year cycles after the birth balance that queries may reach.
pub const HORIZON_CYCLES: u32 = 1_000;

/// The unbounded Mahadasha sequence of one birth.
#[derive(Debug, Clone, Copy)]
pub struct MahaSequence {
    birth_jd: f64,
    balance: BirthBalance,
}

impl MahaSequence {
    pub fn new(birth_jd: f64, moon_sidereal_lon: f64) -> Self {
        Self {
            birth_jd,
            balance: birth_balance(moon_sidereal_lon),
        }
    }

    pub fn balance(&self) -> &BirthBalance {
        &self.balance
    }

    fn start_of(&self, index: usize) -> f64 {
        if index == 0 {
            return self.birth_jd;
        }
        let m = index - 1;
        let (cycles, rem) = (m / 9, m % 9);
        let partial: f64 = (1..=rem)
            .map(|k| allotment_days(self.balance.start_position + k))
            .sum();
        self.birth_jd + self.balance.balance_days + cycles as f64 * CYCLE_DAYS + partial
    }

    /// The `index`-th Mahadasha (0 = the one running at birth).
    ///
    /// Each end is computed as the next start, so consecutive periods share
    /// their boundary exactly.
    pub fn period(&self, index: usize) -> DashaPeriod {
        DashaPeriod {
            ruler: VIMSHOTTARI_CYCLE[(self.balance.start_position + index) % 9].0,
            level: DashaLevel::Maha,
            start_jd: self.start_of(index),
            end_jd: self.start_of(index + 1),
        }
    }

    /// Last instant covered by [`Self::index_at`].
    pub fn horizon_jd(&self) -> f64 {
        self.birth_jd + self.balance.balance_days + f64::from(HORIZON_CYCLES) * CYCLE_DAYS
    }

    /// Index of the Mahadasha containing `jd`, `None` before birth or past
    /// [`Self::horizon_jd`].
    pub fn index_at(&self, jd: f64) -> Option<usize> {
        if jd.is_nan() || jd < self.birth_jd || jd > self.horizon_jd() {
            return None;
        }
        let t = jd - self.birth_jd;
        let mut idx = if t < self.balance.balance_days {
            0
        } else {
            let after = t - self.balance.balance_days;
            let cycles = (after / CYCLE_DAYS).floor();
            let mut rem = after - cycles * CYCLE_DAYS;
            let mut k = 0;
            while k < 8 && rem >= allotment_days(self.balance.start_position + k + 1) {
                rem -= allotment_days(self.balance.start_position + k + 1);
                k += 1;
            }
            1 + cycles as usize * 9 + k
        };
        // Settle rounding at boundaries against the exact period bounds.
        while idx > 0 && jd < self.start_of(idx) {
            idx -= 1;
        }
        while jd >= self.start_of(idx + 1) {
            idx += 1;
        }
        Some(idx)
    }

    pub fn iter_from(&self, index: usize) -> impl Iterator<Item = DashaPeriod> + '_ {
        (index..).map(move |i| self.period(i))
    }
}

/// The nine sub-periods of `parent`, starting with the parent's own ruler.
///
/// Each child gets `parent_duration × allotment / 120`; the last end is
/// pinned to the parent's end. `None` at the deepest level.
pub fn sub_periods(parent: &DashaPeriod) -> Option<[DashaPeriod; 9]> {
    let level = parent.level.child_level()?;
    let start_pos = cycle_position(parent.ruler);
    let duration = parent.duration_days();
    let mut cursor = parent.start_jd;
    let mut children = [*parent; 9];
    for (k, child) in children.iter_mut().enumerate() {
        let (ruler, years) = VIMSHOTTARI_CYCLE[(start_pos + k) % 9];
        let end = if k == 8 {
            parent.end_jd
        } else {
            cursor + duration * years / CYCLE_YEARS
        };
        *child = DashaPeriod {
            ruler,
            level,
            start_jd: cursor,
            end_jd: end,
        };
        cursor = end;
    }
    Some(children)
}

/// Index of the period containing `jd` in a contiguous, sorted slice.
fn find_active(periods: &[DashaPeriod], jd: f64) -> Option<usize> {
    let idx = periods.partition_point(|p| p.end_jd <= jd);
    periods.get(idx).filter(|p| p.contains(jd)).map(|_| idx)
}

/// One materialized period and the arena ids of its children.
#[derive(Debug, Clone, PartialEq)]
pub struct DashaNode {
    pub period: DashaPeriod,
    pub children: Vec<usize>,
}

/// Arena of periods materialized for a window.
#[derive(Debug, Clone)]
pub struct DashaTree {
    pub birth_jd: f64,
    pub balance: BirthBalance,
    pub max_depth: u8,
    pub window_start: f64,
    pub window_end: f64,
    nodes: Vec<DashaNode>,
    roots: Vec<usize>,
}

impl DashaTree {
    pub fn node(&self, id: usize) -> &DashaNode {
        &self.nodes[id]
    }

    pub fn root_ids(&self) -> &[usize] {
        &self.roots
    }

    pub fn roots(&self) -> impl Iterator<Item = &DashaNode> {
        self.roots.iter().map(|&id| &self.nodes[id])
    }

    pub fn children<'a>(&'a self, node: &'a DashaNode) -> impl Iterator<Item = &'a DashaNode> {
        node.children.iter().map(|&id| &self.nodes[id])
    }

    /// Every materialized period, parents before children.
    pub fn periods(&self) -> impl Iterator<Item = &DashaPeriod> {
        self.nodes.iter().map(|n| &n.period)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Chain of materialized periods active at `jd`, outermost first.
    pub fn active_chain(&self, jd: f64) -> Vec<DashaPeriod> {
        let mut chain = Vec::new();
        let mut level: Vec<DashaPeriod> = self.roots().map(|n| n.period).collect();
        let mut ids = self.roots.clone();
        while let Some(i) = find_active(&level, jd) {
            let node = &self.nodes[ids[i]];
            chain.push(node.period);
            level = self.children(node).map(|n| n.period).collect();
            ids = node.children.clone();
        }
        chain
    }
}

fn check_depth(depth: u8) -> Result<(), BaseError> {
    if depth == 0 || depth > MAX_DASHA_DEPTH {
        return Err(BaseError::DashaDepth {
            requested: depth,
            max: MAX_DASHA_DEPTH,
        });
    }
    Ok(())
}

/// Materialize the periods overlapping `[window_start, window_end)` down to
/// `max_depth` levels (1 = Mahadashas only).
pub fn dasha_tree(
    moon_sidereal_lon: f64,
    birth_jd: f64,
    max_depth: u8,
    window_start: f64,
    window_end: f64,
) -> Result<DashaTree, BaseError> {
    check_depth(max_depth)?;
    if !(window_start.is_finite() && window_end.is_finite()) {
        return Err(BaseError::DashaWindow("window bounds must be finite"));
    }
    if window_end <= window_start {
        return Err(BaseError::DashaWindow("window end must follow its start"));
    }

    let seq = MahaSequence::new(birth_jd, moon_sidereal_lon);
    if window_start > seq.horizon_jd() {
        return Err(BaseError::DashaWindow("window starts past the dasha horizon"));
    }
    let mut tree = DashaTree {
        birth_jd,
        balance: *seq.balance(),
        max_depth,
        window_start,
        window_end,
        nodes: Vec::new(),
        roots: Vec::new(),
    };
    if window_end <= birth_jd {
        return Ok(tree);
    }

    let first = seq.index_at(window_start.max(birth_jd)).unwrap_or(0);
    for maha in seq.iter_from(first) {
        if maha.start_jd >= window_end {
            break;
        }
        let id = push_node(&mut tree.nodes, maha)?;
        tree.roots.push(id);
        expand(&mut tree.nodes, id, max_depth, window_start, window_end)?;
    }
    Ok(tree)
}

fn push_node(nodes: &mut Vec<DashaNode>, period: DashaPeriod) -> Result<usize, BaseError> {
    if nodes.len() >= MAX_PERIODS {
        return Err(BaseError::DashaTooLarge { limit: MAX_PERIODS });
    }
    nodes.push(DashaNode {
        period,
        children: Vec::new(),
    });
    Ok(nodes.len() - 1)
}

fn expand(
    nodes: &mut Vec<DashaNode>,
    id: usize,
    max_depth: u8,
    window_start: f64,
    window_end: f64,
) -> Result<(), BaseError> {
    let parent = nodes[id].period;
    if parent.level as u8 + 1 >= max_depth {
        return Ok(());
    }
    let Some(children) = sub_periods(&parent) else {
        return Ok(());
    };
    let mut ids = Vec::with_capacity(9);
    for child in children {
        ids.push(push_node(nodes, child)?);
    }
    nodes[id].children = ids.clone();
    for child_id in ids {
        if nodes[child_id].period.overlaps(window_start, window_end) {
            expand(nodes, child_id, max_depth, window_start, window_end)?;
        }
    }
    Ok(())
}

/// Active period chain at `query_jd` without materializing a window.
///
/// Returns an empty chain before birth.
pub fn dasha_snapshot(
    moon_sidereal_lon: f64,
    birth_jd: f64,
    query_jd: f64,
    depth: u8,
) -> Result<Vec<DashaPeriod>, BaseError> {
    check_depth(depth)?;
    let seq = MahaSequence::new(birth_jd, moon_sidereal_lon);
    if !query_jd.is_finite() {
        return Err(BaseError::DashaWindow("query instant must be finite"));
    }
    if query_jd > seq.horizon_jd() {
        return Err(BaseError::DashaWindow("query instant past the dasha horizon"));
    }
    let Some(idx) = seq.index_at(query_jd) else {
        return Ok(Vec::new());
    };
    let mut chain = vec![seq.period(idx)];
    while chain.len() < usize::from(depth) {
        let Some(children) = chain.last().and_then(sub_periods) else {
            break;
        };
        match find_active(&children, query_jd) {
            Some(i) => chain.push(children[i]),
            None => break,
        }
    }
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dasha::types::DAYS_PER_YEAR;
    use crate::graha::Graha;
    use crate::nakshatra::NAKSHATRA_SPAN;

    const BIRTH: f64 = 2_451_545.0;

    #[test]
    fn first_maha_is_balance() {
        let seq = MahaSequence::new(BIRTH, NAKSHATRA_SPAN * 0.25);
        let p = seq.period(0);
        assert_eq!(p.ruler, Graha::Ketu);
        assert!((p.duration_days() - 7.0 * DAYS_PER_YEAR * 0.75).abs() < 1e-6);
        assert!(p.duration_days() < 7.0 * DAYS_PER_YEAR);
    }

    #[test]
    fn full_weight_at_nakshatra_start() {
        let seq = MahaSequence::new(BIRTH, 0.0);
        let p = seq.period(0);
        assert_eq!(p.ruler, Graha::Ketu);
        assert_eq!(p.duration_days(), 7.0 * DAYS_PER_YEAR);
    }

    #[test]
    fn sequence_is_contiguous_and_cyclic() {
        let seq = MahaSequence::new(BIRTH, 100.0);
        let periods: Vec<_> = seq.iter_from(0).take(30).collect();
        for w in periods.windows(2) {
            assert_eq!(w[0].end_jd, w[1].start_jd);
        }
        assert_eq!(periods[1].ruler, periods[10].ruler);
        assert!((periods[1].duration_days() - periods[10].duration_days()).abs() < 1e-6);
    }

    #[test]
    fn index_at_matches_periods() {
        let seq = MahaSequence::new(BIRTH, 200.0);
        for i in 0..25 {
            let p = seq.period(i);
            assert_eq!(seq.index_at(p.start_jd), Some(i));
            assert_eq!(seq.index_at(p.end_jd - 1e-3), Some(i));
        }
        assert_eq!(seq.index_at(BIRTH - 1.0), None);
    }

    #[test]
    fn children_start_with_parent_ruler_and_sum() {
        let seq = MahaSequence::new(BIRTH, 55.0);
        let parent = seq.period(2);
        let kids = sub_periods(&parent).unwrap();
        assert_eq!(kids[0].ruler, parent.ruler);
        assert_eq!(kids[0].start_jd, parent.start_jd);
        assert_eq!(kids[8].end_jd, parent.end_jd);
        let sum: f64 = kids.iter().map(DashaPeriod::duration_days).sum();
        assert!((sum - parent.duration_days()).abs() <= 1e-9 * parent.duration_days());
    }

    #[test]
    fn deha_has_no_children() {
        let p = DashaPeriod {
            ruler: Graha::Surya,
            level: DashaLevel::Deha,
            start_jd: 0.0,
            end_jd: 1.0,
        };
        assert!(sub_periods(&p).is_none());
    }

    #[test]
    fn window_limits_expansion() {
        let start = BIRTH + 10.0 * DAYS_PER_YEAR;
        let end = start + 365.0;
        let tree = dasha_tree(123.0, BIRTH, 3, start, end).unwrap();
        assert!(tree.roots().count() <= 2);
        for node in tree.roots() {
            assert!(node.period.overlaps(start, end));
            assert_eq!(node.children.len(), 9);
        }
        // Far fewer than the 9 × 9 × roots a full expansion would create.
        assert!(tree.len() < 200, "materialized {}", tree.len());
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(
            dasha_tree(0.0, BIRTH, 0, BIRTH, BIRTH + 1.0),
            Err(BaseError::DashaDepth { .. })
        ));
        assert!(matches!(
            dasha_tree(0.0, BIRTH, 7, BIRTH, BIRTH + 1.0),
            Err(BaseError::DashaDepth { .. })
        ));
        assert!(matches!(
            dasha_tree(0.0, BIRTH, 2, BIRTH + 1.0, BIRTH),
            Err(BaseError::DashaWindow(_))
        ));
    }

    #[test]
    fn far_queries_are_rejected() {
        assert!(matches!(
            dasha_snapshot(10.0, BIRTH, 1e300, 2),
            Err(BaseError::DashaWindow(_))
        ));
        assert!(matches!(
            dasha_snapshot(10.0, BIRTH, f64::INFINITY, 2),
            Err(BaseError::DashaWindow(_))
        ));
        assert!(matches!(
            dasha_tree(10.0, BIRTH, 1, 1e300, 2e300),
            Err(BaseError::DashaWindow(_))
        ));
        let seq = MahaSequence::new(BIRTH, 10.0);
        assert_eq!(seq.index_at(1e300), None);
        let last = seq.horizon_jd();
        let chain = dasha_snapshot(10.0, BIRTH, last, 1).unwrap();
        assert_eq!(chain.len(), 1);
        assert!(chain[0].contains(last));
    }

    #[test]
    fn oversized_request_is_capped() {
        let err = dasha_tree(0.0, BIRTH, 6, BIRTH, BIRTH + 200.0 * DAYS_PER_YEAR).unwrap_err();
        assert_eq!(err, BaseError::DashaTooLarge { limit: MAX_PERIODS });
    }

    #[test]
    fn snapshot_agrees_with_tree() {
        let query = BIRTH + 23.7 * DAYS_PER_YEAR;
        let tree = dasha_tree(77.7, BIRTH, 4, query - 30.0, query + 30.0).unwrap();
        let from_tree = tree.active_chain(query);
        let snap = dasha_snapshot(77.7, BIRTH, query, 4).unwrap();
        assert_eq!(from_tree.len(), 4);
        assert_eq!(from_tree, snap);
    }

    #[test]
    fn window_before_birth_is_empty() {
        let tree = dasha_tree(10.0, BIRTH, 2, BIRTH - 100.0, BIRTH - 1.0).unwrap();
        assert!(tree.is_empty());
        assert!(dasha_snapshot(10.0, BIRTH, BIRTH - 1.0, 3).unwrap().is_empty());
    }
}
