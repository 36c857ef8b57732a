use std::collections::HashMap;

use crate::domain::{AthleteId, Boat, SwapReport, SwappedAthlete};

/// Identifies athletes who moved between boats across a piece pair.
///
/// Athletes present in only one of the two pieces cannot be compared and are
/// reported in neither list.
pub fn detect_swaps(piece1_boats: &[Boat], piece2_boats: &[Boat]) -> SwapReport {
    let before = athlete_locations(piece1_boats);
    let after = athlete_locations(piece2_boats);

    let mut report = SwapReport::default();

    for boat in piece1_boats {
        for athlete in &boat.athletes {
            let Some(to_boat) = after.get(athlete) else {
                continue;
            };
            let from_boat = &before[athlete];

            if from_boat == to_boat {
                report.unchanged.push(*athlete);
            } else {
                report.swapped.push(SwappedAthlete {
                    athlete: *athlete,
                    from_boat: from_boat.clone(),
                    to_boat: to_boat.clone(),
                });
            }
        }
    }

    report
}

fn athlete_locations(boats: &[Boat]) -> HashMap<AthleteId, String> {
    let mut locations = HashMap::new();
    for boat in boats {
        for athlete in &boat.athletes {
            locations.insert(*athlete, boat.name.clone());
        }
    }
    locations
}
