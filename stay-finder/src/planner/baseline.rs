//! Choosing the reference candidate for relative scores.

use std::collections::HashMap;

use super::aggregate::Candidate;

/// The candidate every other one is compared against.
///
/// The cheapest candidate (by total cost) at the destination group if it has
/// any. Otherwise the cheapest candidate of the group with the shortest
/// train time among groups that have candidates. `None` only when there
/// are no candidates at all.
pub fn select_baseline<'a>(candidates: &'a [Candidate], destination: &str) -> Option<&'a Candidate> {
    let mut groups: Vec<(&str, Vec<&'a Candidate>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for c in candidates {
        let slot = *index.entry(c.group.as_str()).or_insert_with(|| {
            groups.push((c.group.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(c);
    }

    if let Some(&slot) = index.get(destination) {
        return cheapest(&groups[slot].1);
    }

    // Stable sort keeps first-seen order among equally near groups.
    groups.sort_by_key(|(_, members)| members.iter().map(|c| c.train_minutes).min());
    groups
        .iter()
        .find(|(_, members)| !members.is_empty())
        .and_then(|(_, members)| cheapest(members))
}

/// Baseline for cost-performance scoring: within the group of `anchor`,
/// the candidate with the least train plus walking time, then the lowest
/// lodging price. Earlier candidates win full ties.
pub fn select_cospa_baseline<'a>(
    candidates: &'a [Candidate],
    anchor: &Candidate,
) -> Option<&'a Candidate> {
    candidates
        .iter()
        .filter(|c| c.group == anchor.group)
        .reduce(|best, c| {
            if (c.travel_minutes(), c.lodging.price) < (best.travel_minutes(), best.lodging.price) {
                c
            } else {
                best
            }
        })
}

// First minimum by total cost.
fn cheapest<'a>(members: &[&'a Candidate]) -> Option<&'a Candidate> {
    members
        .iter()
        .copied()
        .reduce(|best, c| if c.total_cost < best.total_cost { c } else { best })
}
