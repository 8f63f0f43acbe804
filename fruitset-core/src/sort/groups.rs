use std::collections::BTreeMap;

use crate::foundation::capture::{CaptureName, Sequence};

/// One validated animation group, files in ascending sequence order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationGroup {
    /// Animation id shared by every file in the group.
    pub animation: String,
    /// File names sorted by sequence, terminal layers last.
    pub files: Vec<String>,
}

/// Outcome of grouping and validating a raw capture listing.
#[derive(Clone, Debug, Default)]
pub struct GroupingOutcome {
    /// Groups that passed validation, in animation-id order.
    pub accepted: Vec<AnimationGroup>,
    /// File names skipped because they do not parse as captures.
    pub skipped_files: Vec<String>,
    /// Animation ids rejected for a gap or a nonzero starting sequence.
    pub rejected_groups: Vec<String>,
}

/// Group raw capture file names by animation id and validate each group.
///
/// A group is accepted when its sorted sequences start at 0 and every step
/// increases by exactly 1, with terminal layers allowed only as a trailing
/// run. One bad step rejects the whole group; no partial acceptance.
pub fn group_captures<S: AsRef<str>>(file_names: &[S]) -> GroupingOutcome {
    let mut outcome = GroupingOutcome::default();
    let mut groups: BTreeMap<String, Vec<(Sequence, String)>> = BTreeMap::new();

    for name in file_names {
        let name = name.as_ref();
        let Some(capture) = CaptureName::parse(name) else {
            outcome.skipped_files.push(name.to_string());
            continue;
        };
        groups
            .entry(capture.animation)
            .or_default()
            .push((capture.sequence, name.to_string()));
    }

    for (animation, mut files) in groups {
        // Stable sort: equal sequences keep their listing order.
        files.sort_by_key(|(sequence, _)| *sequence);
        if is_contiguous(&files) {
            outcome.accepted.push(AnimationGroup {
                animation,
                files: files.into_iter().map(|(_, name)| name).collect(),
            });
        } else {
            outcome.rejected_groups.push(animation);
        }
    }

    outcome
}

fn is_contiguous(files: &[(Sequence, String)]) -> bool {
    let Some((first, _)) = files.first() else {
        return false;
    };
    if *first != Sequence::Index(0) {
        return false;
    }
    for pair in files.windows(2) {
        let step_ok = match (pair[0].0, pair[1].0) {
            (_, Sequence::Terminal) => true,
            (Sequence::Index(prev), Sequence::Index(next)) => prev.checked_add(1) == Some(next),
            (Sequence::Terminal, Sequence::Index(_)) => false,
        };
        if !step_ok {
            return false;
        }
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/sort/groups.rs"]
mod tests;
