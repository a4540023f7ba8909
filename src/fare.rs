//! Direction-aware view of a vehicle's fare table.

use crate::model::{Direction, FareTariff};

/// Fares relevant to where the vehicle is heading.
///
/// An entry is kept when its destination and the direction label contain
/// one another. When nothing survives, the whole table is returned so the
/// rider still sees prices. An unknown direction keeps every entry.
pub fn fares_for_direction(tariffs: &[FareTariff], direction: &Direction) -> Vec<FareTariff> {
    let Some(heading) = direction.label() else {
        return tariffs.to_vec();
    };

    let matching: Vec<FareTariff> = tariffs
        .iter()
        .filter(|tariff| {
            heading.contains(tariff.destination_label.as_str())
                || tariff.destination_label.contains(heading)
        })
        .cloned()
        .collect();

    if matching.is_empty() {
        tariffs.to_vec()
    } else {
        matching
    }
}
