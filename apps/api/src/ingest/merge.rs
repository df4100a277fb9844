//! Applies an import result onto the résumé being edited.

use crate::models::resume::{PartialResumeData, ResumeData};

/// Present basics fields overwrite, a non-empty website list replaces, and each
/// non-empty `work`/`education`/`skills` list replaces the current one.
/// Everything else in `current` is kept.
pub fn merge_partial(mut current: ResumeData, partial: PartialResumeData) -> ResumeData {
    let basics = partial.basics;
    let slots = [
        (basics.name, &mut current.basics.name),
        (basics.email, &mut current.basics.email),
        (basics.phone, &mut current.basics.phone),
        (basics.address, &mut current.basics.address),
        (basics.summary, &mut current.basics.summary),
    ];
    for (incoming, slot) in slots {
        if let Some(value) = incoming {
            *slot = value;
        }
    }

    replace_if_present(&mut current.basics.websites, basics.websites);
    replace_if_present(&mut current.work, partial.work);
    replace_if_present(&mut current.education, partial.education);
    replace_if_present(&mut current.skills, partial.skills);
    current
}

fn replace_if_present<T>(current: &mut Vec<T>, incoming: Vec<T>) {
    if !incoming.is_empty() {
        *current = incoming;
    }
}
