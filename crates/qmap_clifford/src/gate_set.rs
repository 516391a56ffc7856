//! Single-qubit gate set validity (§4.6.1), grounded in the original
//! source's `GateSet` abstraction: the encoder only ever asserts
//! transition constraints for a gate set it has first checked is complete.

/// A single-qubit gate the encoder may choose to apply at a timestep.
/// Restricted to the generators the tableau's update rules (§4.5) define:
/// `SX`/`SXdg` are valid *members* of a configured gate set per §4.6.1 but
/// are not independently wired into the encoder's transition constraints,
/// since no row exists for them in the §4.5 table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleGateKind {
    I,
    H,
    X,
    Y,
    Z,
    S,
    Sdg,
    Sx,
    SxDg,
}

impl SingleGateKind {
    /// The full set of nine single-qubit members §4.6.1 recognizes as
    /// valid, for use by callers constructing a custom gate set to check.
    pub const ALL: [SingleGateKind; 9] = [
        SingleGateKind::I,
        SingleGateKind::H,
        SingleGateKind::X,
        SingleGateKind::Y,
        SingleGateKind::Z,
        SingleGateKind::S,
        SingleGateKind::Sdg,
        SingleGateKind::Sx,
        SingleGateKind::SxDg,
    ];
}

/// The fixed generator set the encoder builds transition constraints for:
/// every row §4.5's update-rule table defines, excluding `I` (a no-op, not
/// an encoder gate variable).
pub const ENCODER_GENERATORS: [SingleGateKind; 6] = [
    SingleGateKind::H,
    SingleGateKind::X,
    SingleGateKind::Y,
    SingleGateKind::Z,
    SingleGateKind::S,
    SingleGateKind::Sdg,
];

/// Checks that `set` is a valid single-qubit gate set: every member drawn
/// from the nine recognized kinds.
pub fn is_valid(set: &[SingleGateKind]) -> bool {
    !set.is_empty() && set.iter().all(|k| SingleGateKind::ALL.contains(k))
}

/// Checks that `set` is *complete*: can realize every single-qubit
/// Clifford. Per §4.6.1, that requires at least two of `{H, S-family,
/// SX-family}` present — any single one of the three alone is not enough,
/// but any two together are (the three two-way combinations `H`+`S-family`,
/// `H`+`SX-family`, and `S-family`+`SX-family` all suffice; `H` is not
/// required unconditionally).
pub fn is_complete(set: &[SingleGateKind]) -> bool {
    let has_h = set.contains(&SingleGateKind::H);
    let has_s_family = set.contains(&SingleGateKind::S) || set.contains(&SingleGateKind::Sdg);
    let has_sx_family = set.contains(&SingleGateKind::Sx) || set.contains(&SingleGateKind::SxDg);
    (has_h as u8 + has_s_family as u8 + has_sx_family as u8) >= 2
}

/// Validates `set` before any solver variables are created: rejects an
/// invalid or incomplete gate set eagerly (§4.6.1 — "cheaper than
/// discovering unsatisfiability from the solver").
pub fn validate(set: &[SingleGateKind]) -> crate::error::Result<()> {
    if !is_valid(set) {
        return Err(crate::error::CliffordError::IncompleteGateSet(
            "gate set contains a member outside {I,H,X,Y,Z,S,Sdg,SX,SXdg}".to_string(),
        ));
    }
    if !is_complete(set) {
        return Err(crate::error::CliffordError::IncompleteGateSet(
            "gate set has fewer than two of {H, S-family, SX-family}; cannot realize every \
             single-qubit Clifford"
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_generators_are_complete() {
        assert!(validate(&ENCODER_GENERATORS).is_ok());
    }

    #[test]
    fn test_missing_h_is_incomplete() {
        let set = [SingleGateKind::S, SingleGateKind::X];
        assert!(!is_complete(&set));
        assert!(validate(&set).is_err());
    }

    #[test]
    fn test_h_alone_is_incomplete() {
        let set = [SingleGateKind::H];
        assert!(!is_complete(&set));
    }

    #[test]
    fn test_h_with_sx_is_complete() {
        let set = [SingleGateKind::H, SingleGateKind::Sx];
        assert!(is_complete(&set));
    }

    #[test]
    fn test_s_and_sx_without_h_is_complete() {
        let set = [SingleGateKind::S, SingleGateKind::Sx];
        assert!(is_complete(&set));
        assert!(validate(&set).is_ok());
    }
}
