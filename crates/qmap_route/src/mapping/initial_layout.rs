//! Initial layout seeding strategies (§4.3): Identity, Static, Dynamic.

use crate::layering::Layer;
use crate::mapping::state::MappingState;
use qmap_core::config::InitialLayout;
use qmap_core::types::HardwareProfile;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;

/// Builds the initial mapping state for a run. `seed` drives tie-breaking
/// among equally-good placement candidates in `Static` layout (§5); it has
/// no effect on `Identity`/`Dynamic`.
pub fn build_initial_layout(
    mode: InitialLayout,
    device: &HardwareProfile,
    num_logical: usize,
    layers: &[Layer],
    seed: u64,
) -> MappingState {
    match mode {
        InitialLayout::Identity => MappingState::identity(device.num_qubits, num_logical),
        InitialLayout::Static => static_layout(device, num_logical, layers, seed),
        InitialLayout::Dynamic => MappingState::unplaced(device.num_qubits, num_logical),
    }
}

/// Greedily places operands of the first few layers on adjacent physical
/// sites, then fills in any remaining logical qubits arbitrarily. Ties among
/// equally-valid candidate sites/pairs are broken by a seeded shuffle so the
/// result is reproducible per seed rather than hard-coded to index order.
fn static_layout(
    device: &HardwareProfile,
    num_logical: usize,
    layers: &[Layer],
    seed: u64,
) -> MappingState {
    let mut state = MappingState::unplaced(device.num_qubits, num_logical);
    let mut used_sites: HashSet<usize> = HashSet::new();
    let mut rng = StdRng::seed_from_u64(seed);

    for layer in layers {
        for (q1, q2) in layer.pairs() {
            let q1_placed = state.locations.get(q1).copied().flatten();
            let q2_placed = state.locations.get(q2).copied().flatten();

            match (q1_placed, q2_placed) {
                (Some(_), Some(_)) => continue,
                (Some(p1), None) => {
                    if let Some(p2) = free_neighbor(device, p1, &used_sites, &mut rng) {
                        state.place(q2, p2);
                        used_sites.insert(p2);
                    }
                }
                (None, Some(p2)) => {
                    if let Some(p1) = free_neighbor(device, p2, &used_sites, &mut rng) {
                        state.place(q1, p1);
                        used_sites.insert(p1);
                    }
                }
                (None, None) => {
                    if let Some((p1, p2)) = free_adjacent_pair(device, &used_sites, &mut rng) {
                        state.place(q1, p1);
                        state.place(q2, p2);
                        used_sites.insert(p1);
                        used_sites.insert(p2);
                    }
                }
            }
        }
    }

    // Any logical qubit not touched by an early layer gets whatever site is
    // left over, shuffled by the same seed.
    let mut free_sites: Vec<usize> = (0..device.num_qubits)
        .filter(|p| !used_sites.contains(p))
        .collect();
    free_sites.shuffle(&mut rng);
    let mut free_sites = free_sites.into_iter();
    for l in 0..num_logical {
        if state.locations[l].is_none() {
            if let Some(p) = free_sites.next() {
                state.place(l, p);
                used_sites.insert(p);
            }
        }
    }

    state
}

fn free_neighbor(
    device: &HardwareProfile,
    site: usize,
    used: &HashSet<usize>,
    rng: &mut StdRng,
) -> Option<usize> {
    let mut candidates: Vec<usize> = device
        .neighbors(site)
        .into_iter()
        .filter(|n| !used.contains(n))
        .collect();
    candidates.shuffle(rng);
    candidates.into_iter().next()
}

fn free_adjacent_pair(
    device: &HardwareProfile,
    used: &HashSet<usize>,
    rng: &mut StdRng,
) -> Option<(usize, usize)> {
    let mut candidates: Vec<(usize, usize)> = device
        .coupling_map()
        .iter()
        .map(|coupler| coupler.edge())
        .filter(|(a, b)| !used.contains(a) && !used.contains(b))
        .collect();
    candidates.shuffle(rng);
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmap_core::types::Gate;

    #[test]
    fn test_identity_layout() {
        let device = HardwareProfile::linear("t", 4);
        let state = build_initial_layout(InitialLayout::Identity, &device, 4, &[], 0);
        assert_eq!(state.site_of(2), Some(2));
    }

    #[test]
    fn test_dynamic_layout_leaves_everything_unplaced() {
        let device = HardwareProfile::linear("t", 4);
        let state = build_initial_layout(InitialLayout::Dynamic, &device, 4, &[], 0);
        assert!(state.locations.iter().all(|l| l.is_none()));
    }

    #[test]
    fn test_static_layout_places_first_layer_adjacent() {
        let device = HardwareProfile::linear("t", 4);
        let layer = Layer {
            two_qubit_gates: vec![Gate::CX(0, 1)],
            single_qubit_gates: vec![],
        };
        let state = build_initial_layout(InitialLayout::Static, &device, 4, &[layer], 7);
        let p0 = state.site_of(0).unwrap();
        let p1 = state.site_of(1).unwrap();
        assert!(device.are_connected(p0, p1) || device.are_connected(p1, p0));
    }

    #[test]
    fn test_static_layout_deterministic_per_seed() {
        let device = HardwareProfile::linear("t", 4);
        let layer = Layer {
            two_qubit_gates: vec![Gate::CX(0, 1)],
            single_qubit_gates: vec![],
        };
        let a = build_initial_layout(InitialLayout::Static, &device, 4, &[layer.clone()], 3);
        let b = build_initial_layout(InitialLayout::Static, &device, 4, &[layer], 3);
        assert_eq!(a, b);
    }
}
