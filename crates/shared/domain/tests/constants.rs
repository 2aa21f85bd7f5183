use ogs_domain::constants::{ACTIVE_GROUP, RFID_CARD, SCHOOL_GROUP, STAFF, STUDENT, VISIT};

#[test]
fn constants_match_table_names() {
    assert_eq!(STUDENT, "student");
    assert_eq!(STAFF, "staff");
    assert_eq!(RFID_CARD, "rfid_card");
    assert_eq!(SCHOOL_GROUP, "school_group");
    assert_eq!(ACTIVE_GROUP, "active_group");
    assert_eq!(VISIT, "visit");
}
