//! Result materialization.
//!
//! Pure transformation of committed genes into persistable
//! [`TimetableEntry`] records. Deduplicated by requirement id with
//! last-writer-wins, sorted by requirement id: the same inputs always
//! yield the identical entry list.

use std::collections::HashMap;

use crate::loader::ProblemInstance;
use crate::models::{Gene, RequirementId, TimetableEntry};

/// Converts committed genes into timetable entries.
///
/// Input genes are the union of the GA's committed placements and the
/// repair pass's additions; the dedup guard keeps the later gene if both
/// stages somehow produced one for the same requirement. Genes whose
/// requirement is unknown to the instance are dropped.
pub fn materialize(
    instance: &ProblemInstance,
    genes: impl IntoIterator<Item = Gene>,
) -> Vec<TimetableEntry> {
    let mut by_requirement: HashMap<RequirementId, Gene> = HashMap::new();
    for gene in genes {
        by_requirement.insert(gene.requirement, gene);
    }

    let mut entries: Vec<TimetableEntry> = by_requirement
        .into_values()
        .filter_map(|gene| {
            let req = instance.requirement(gene.requirement)?;
            Some(TimetableEntry {
                requirement_id: req.id,
                class_id: req.class_id,
                course_id: req.course_id,
                lecturer: req.lecturer,
                day: gene.day,
                slot: gene.slot,
                room: gene.room,
                division_label: req.division_label.clone(),
                semester: instance.semester,
                academic_year: instance.academic_year.clone(),
            })
        })
        .collect();
    entries.sort_by_key(|e| e.requirement_id);
    entries
}
