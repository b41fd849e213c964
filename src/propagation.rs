//! Fills unlabeled zones from agreeing neighbors until nothing changes.

use crate::label::ZoneLabel;
use crate::logging::LabelingObserver;
use crate::model::PageId;
use crate::neighbors::NeighborTable;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    pub iterations: usize,
    pub passes: usize,
    /// Zones that acquired a label.
    pub labeled: usize,
    /// Zones still unlabeled at the fixed point.
    pub remaining: usize,
}

pub struct PropagationEngine<'o> {
    observer: &'o dyn LabelingObserver,
}

fn agreeing(
    snapshot: &[Option<ZoneLabel>],
    first: Option<usize>,
    second: Option<usize>,
) -> Option<ZoneLabel> {
    let first = snapshot.get(first?).copied().flatten()?;
    let second = snapshot.get(second?).copied().flatten()?;
    (first == second).then_some(first)
}

impl<'o> PropagationEngine<'o> {
    pub fn new(observer: &'o dyn LabelingObserver) -> Self {
        Self { observer }
    }

    /// `labels` holds one entry per zone of `page`, in page order.
    pub fn run(
        &self,
        page: PageId,
        labels: &mut [Option<ZoneLabel>],
        neighbors: &NeighborTable,
    ) -> PropagationReport {
        let mut unlabeled: BTreeSet<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| label.is_none())
            .map(|(index, _)| index)
            .collect();
        let initial = unlabeled.len();
        let max_iterations = labels.len() + 1;

        let mut report = PropagationReport::default();
        while !unlabeled.is_empty() && report.iterations < max_iterations {
            let before = unlabeled.len();
            for _ in 0..2 {
                self.pass(labels, neighbors, &mut unlabeled);
                report.passes += 1;
                self.observer.propagation_pass(
                    page,
                    report.passes,
                    initial - unlabeled.len(),
                    unlabeled.len(),
                );
            }
            report.iterations += 1;
            if unlabeled.len() == before {
                break;
            }
        }

        report.labeled = initial - unlabeled.len();
        report.remaining = unlabeled.len();
        report
    }

    fn pass(
        &self,
        labels: &mut [Option<ZoneLabel>],
        neighbors: &NeighborTable,
        unlabeled: &mut BTreeSet<usize>,
    ) {
        let snapshot = labels.to_vec();
        let mut transitioned = Vec::new();

        for &index in unlabeled.iter() {
            let around = neighbors.get(index);
            let previous = index.checked_sub(1);
            let next = (index + 1 < snapshot.len()).then_some(index + 1);

            let adopted = agreeing(&snapshot, around.left, around.right)
                .or_else(|| agreeing(&snapshot, around.below, around.above))
                .or_else(|| agreeing(&snapshot, previous, next));

            if let Some(label) = adopted {
                labels[index] = Some(label);
                transitioned.push(index);
            }
        }

        for index in transitioned {
            unlabeled.remove(&index);
        }
    }
}
