use once_cell::sync::Lazy;
use std::collections::BTreeSet;

use crate::core::error::MatchError;
use crate::models::BloodGroup;
use BloodGroup::*;

/// Which groups each blood group can donate to.
///
/// This literal is the only hand-maintained table; the receive-from side
/// is derived from it.
const DONATES_TO: [(BloodGroup, &[BloodGroup]); 8] = [
    (
        ONegative,
        &[APositive, ANegative, BPositive, BNegative, OPositive, ONegative, AbPositive, AbNegative],
    ),
    (OPositive, &[OPositive, APositive, BPositive, AbPositive]),
    (ANegative, &[ANegative, APositive, AbNegative, AbPositive]),
    (APositive, &[APositive, AbPositive]),
    (BNegative, &[BNegative, BPositive, AbNegative, AbPositive]),
    (BPositive, &[BPositive, AbPositive]),
    (AbNegative, &[AbNegative, AbPositive]),
    (AbPositive, &[AbPositive]),
];

static TABLE: Lazy<CompatibilityTable> = Lazy::new(CompatibilityTable::build);

/// Immutable donor/recipient compatibility table
#[derive(Debug)]
pub struct CompatibilityTable {
    recipients: [BTreeSet<BloodGroup>; 8],
    donors: [BTreeSet<BloodGroup>; 8],
}

impl CompatibilityTable {
    /// The process-wide table, built on first use
    pub fn global() -> &'static CompatibilityTable {
        &TABLE
    }

    fn build() -> Self {
        let mut recipients: [BTreeSet<BloodGroup>; 8] = Default::default();
        let mut donors: [BTreeSet<BloodGroup>; 8] = Default::default();

        for (donor, targets) in DONATES_TO {
            for &recipient in targets {
                recipients[donor.index()].insert(recipient);
                donors[recipient.index()].insert(donor);
            }
        }

        Self { recipients, donors }
    }

    /// Groups that can receive blood from `group`
    pub fn recipients(&self, group: BloodGroup) -> &BTreeSet<BloodGroup> {
        &self.recipients[group.index()]
    }

    /// Groups that `group` can receive blood from
    pub fn donors(&self, group: BloodGroup) -> &BTreeSet<BloodGroup> {
        &self.donors[group.index()]
    }

    pub fn can_donate(&self, donor: BloodGroup, recipient: BloodGroup) -> bool {
        self.recipients(donor).contains(&recipient)
    }
}

/// Groups that can receive blood from the given blood group tag
pub fn compatible_recipients(blood_group: &str) -> Result<&'static BTreeSet<BloodGroup>, MatchError> {
    let group: BloodGroup = blood_group.parse()?;
    Ok(CompatibilityTable::global().recipients(group))
}

/// Groups the given blood group tag can receive blood from
pub fn compatible_donors(blood_group: &str) -> Result<&'static BTreeSet<BloodGroup>, MatchError> {
    let group: BloodGroup = blood_group.parse()?;
    Ok(CompatibilityTable::global().donors(group))
}
