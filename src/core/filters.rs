use chrono::NaiveDate;

use crate::core::compatibility::CompatibilityTable;
use crate::models::{BloodGroup, Donor, Hospital};

/// Check whether a donor can be asked to donate on `today`
///
/// The donor must be marked available, and their last donation (if any)
/// must be at least `interval_days` days before `today`.
#[inline]
pub fn is_eligible_donor(donor: &Donor, today: NaiveDate, interval_days: u32) -> bool {
    if !donor.is_available {
        return false;
    }

    match donor.last_donation_date {
        Some(last) => (today - last).num_days() >= i64::from(interval_days),
        None => true,
    }
}

#[inline]
pub fn has_blood_group(donor: &Donor, group: BloodGroup) -> bool {
    donor.blood_group == group
}

/// Check whether a donor's blood can be given to a `recipient` group
#[inline]
pub fn can_donate_to(donor: &Donor, recipient: BloodGroup) -> bool {
    CompatibilityTable::global().can_donate(donor.blood_group, recipient)
}

/// Active hospitals that currently take donations
#[inline]
pub fn accepts_donations(hospital: &Hospital) -> bool {
    hospital.is_active && hospital.accepts_donations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn create_test_donor(group: BloodGroup, last_donation: Option<NaiveDate>) -> Donor {
        Donor {
            id: 1,
            full_name: "Test Donor".to_string(),
            blood_group: group,
            location: GeoPoint::new(27.7172, 85.3240),
            is_available: true,
            last_donation_date: last_donation,
            phone: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_never_donated_is_eligible() {
        let donor = create_test_donor(BloodGroup::OPositive, None);
        assert!(is_eligible_donor(&donor, date(2024, 6, 1), 90));
    }

    #[test]
    fn test_donation_interval() {
        let today = date(2024, 6, 1);

        let recent = create_test_donor(BloodGroup::OPositive, Some(date(2024, 5, 1)));
        assert!(!is_eligible_donor(&recent, today, 90));

        // Exactly 90 days ago
        let boundary = create_test_donor(BloodGroup::OPositive, Some(date(2024, 3, 3)));
        assert!(is_eligible_donor(&boundary, today, 90));

        let one_short = create_test_donor(BloodGroup::OPositive, Some(date(2024, 3, 4)));
        assert!(!is_eligible_donor(&one_short, today, 90));
    }

    #[test]
    fn test_unavailable_donor_filtered() {
        let mut donor = create_test_donor(BloodGroup::OPositive, None);
        donor.is_available = false;

        assert!(!is_eligible_donor(&donor, date(2024, 6, 1), 90));
    }

    #[test]
    fn test_blood_group_predicates() {
        let donor = create_test_donor(BloodGroup::ONegative, None);

        assert!(has_blood_group(&donor, BloodGroup::ONegative));
        assert!(!has_blood_group(&donor, BloodGroup::OPositive));
        assert!(can_donate_to(&donor, BloodGroup::AbPositive));

        let donor = create_test_donor(BloodGroup::AbPositive, None);
        assert!(!can_donate_to(&donor, BloodGroup::ONegative));
    }

    #[test]
    fn test_hospital_accepts_donations() {
        let mut hospital = Hospital {
            id: 1,
            name: "Bir Hospital".to_string(),
            address: None,
            location: GeoPoint::new(27.7050, 85.3133),
            is_active: true,
            accepts_donations: true,
            phone: None,
        };
        assert!(accepts_donations(&hospital));

        hospital.accepts_donations = false;
        assert!(!accepts_donations(&hospital));

        hospital.accepts_donations = true;
        hospital.is_active = false;
        assert!(!accepts_donations(&hospital));
    }
}
